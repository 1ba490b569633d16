#![forbid(unsafe_code)]
//! QR code encoding functionality.
//!
//! This module turns segments into a finished symbol: version selection, the data
//! bit stream, function patterns, zig-zag codeword placement, and mask selection
//! with format and version information.
use core::convert::TryFrom;

use crate::capacity::{num_data_codewords, num_raw_data_modules, QrCodeEcc, Version};
use crate::ecc;
use crate::error::EncodingError;
use crate::segment::{BitBuffer, QrSegment};

/// State of a single module in the symbol.
///
/// `Function` and `Reserved` modules are never touched by masking; only `Data`
/// modules are. `Empty` exists only while a symbol is being built.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Module {
    Empty,
    /// Finder, separator, timing and alignment patterns plus the dark module.
    Function(bool),
    /// Format and version information.
    Reserved(bool),
    /// Codeword and remainder bits.
    Data(bool),
}

impl Module {
    pub fn is_dark(self) -> bool {
        matches!(self, Module::Function(true) | Module::Reserved(true) | Module::Data(true))
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    pub const ALL: [Mask; 8] = [Mask(0), Mask(1), Mask(2), Mask(3), Mask(4), Mask(5), Mask(6), Mask(7)];

    /// Creates a mask object from the given number, or `None` above 7.
    pub const fn new(mask: u8) -> Option<Self> {
        if mask <= 7 {
            Some(Self(mask))
        } else {
            None
        }
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether the data module at column `x`, row `y` is inverted by this mask.
    pub fn inverts(self, x: i32, y: i32) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => (x * y) % 2 + (x * y) % 3 == 0,
            6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            _ => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
        }
    }
}

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// Built by [`QrCode::encode_text`] or [`QrCode::encode_segments`]; immutable
/// afterwards.
///
/// # Example
///
/// ```rust
/// use qrforge::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Medium).unwrap();
/// assert_eq!(qr.version().value(), 1);
/// assert_eq!(qr.size(), 21);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,
    ecl: QrCodeEcc,
    mask: Mask,
    /// Width and height in modules, 4 * version + 17.
    size: i32,
    /// Row-major, `size * size` entries.
    modules: Vec<Module>,
}

impl QrCode {
    /// Encodes a text string at the given error correction level.
    ///
    /// The smallest version that holds the text is chosen, together with the
    /// cheapest split into numeric, alphanumeric and byte segments for that
    /// version. The level is never changed.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self, EncodingError> {
        if text.is_empty() {
            return Err(EncodingError::EmptyInput);
        }
        let (version, segs) = select_segments(text, ecl)?;
        Self::encode_at_version(&segs, version, ecl)
    }

    /// Encodes pre-built segments at the given error correction level.
    pub fn encode_segments(segs: &[QrSegment], ecl: QrCodeEcc) -> Result<Self, EncodingError> {
        let version = select_version(segs, ecl)?;
        Self::encode_at_version(segs, version, ecl)
    }

    fn encode_at_version(
        segs: &[QrSegment],
        version: Version,
        ecl: QrCodeEcc,
    ) -> Result<Self, EncodingError> {
        let datacodewords = encode_segments_to_codewords(segs, version, ecl)?;
        let allcodewords = ecc::add_ecc_and_interleave(&datacodewords, version, ecl)?;

        let mut result = Self::function_modules_marked(version, ecl);
        result.draw_codewords(&allcodewords)?;
        result.commit_best_mask();
        Ok(result)
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.ecl
    }

    /// Returns the committed mask.
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns `true` for a dark module. Coordinates outside the symbol are light.
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        self.module(x, y).is_some_and(Module::is_dark)
    }

    /// Returns the tagged module state, or `None` outside the symbol.
    pub fn module(&self, x: i32, y: i32) -> Option<Module> {
        let range = 0..self.size;
        if range.contains(&x) && range.contains(&y) {
            Some(self.modules[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn dark_module_count(&self) -> usize {
        self.modules.iter().filter(|m| m.is_dark()).count()
    }

    /// Penalty score of every candidate mask, recomputed from the committed symbol.
    ///
    /// The committed mask always holds the minimum of this array.
    pub fn mask_penalties(&self) -> [i32; 8] {
        let mut unmasked = self.clone();
        unmasked.apply_mask(self.mask);
        Mask::ALL.map(|m| unmasked.penalty_with_mask(m))
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.size + x) as usize
    }

    fn set(&mut self, x: i32, y: i32, module: Module) {
        let i = self.index(x, y);
        self.modules[i] = module;
    }

    fn set_unbounded(&mut self, x: i32, y: i32, module: Module) {
        let range = 0..self.size;
        if range.contains(&x) && range.contains(&y) {
            self.set(x, y, module);
        }
    }

    /*---- Function patterns ----*/

    fn function_modules_marked(version: Version, ecl: QrCodeEcc) -> Self {
        let size = version.size();
        let mut result = Self {
            version,
            ecl,
            mask: Mask(0),
            size,
            modules: vec![Module::Empty; (size * size) as usize],
        };

        result.draw_finder_pattern(3, 3);
        result.draw_finder_pattern(size - 4, 3);
        result.draw_finder_pattern(3, size - 4);

        for i in 0..size {
            if result.module(6, i) == Some(Module::Empty) {
                result.set(6, i, Module::Function(i % 2 == 0));
            }
            if result.module(i, 6) == Some(Module::Empty) {
                result.set(i, 6, Module::Function(i % 2 == 0));
            }
        }

        let alignpatpos = version.alignment_pattern_positions();
        let last = alignpatpos.len().saturating_sub(1);
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                // The three corners overlap finder patterns.
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                result.draw_alignment_pattern(pos0, pos1);
            }
        }

        result.set(8, size - 8, Module::Function(true));

        for (x, y) in format_positions(size).into_iter().flatten() {
            result.set(x, y, Module::Reserved(false));
        }
        if version.value() >= 7 {
            for (x, y) in version_positions(size).into_iter().flatten() {
                result.set(x, y, Module::Reserved(false));
            }
        }
        result
    }

    /// 7x7 finder plus its 1-module separator, clipped at the symbol edge.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist = dx.abs().max(dy.abs());
                self.set_unbounded(x + dx, y + dy, Module::Function(dist != 2 && dist != 4));
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                self.set(x + dx, y + dy, Module::Function(dx.abs().max(dy.abs()) != 1));
            }
        }
    }

    /*---- Data placement ----*/

    /// Places the channel bits in zig-zag order over every still-empty module.
    /// Modules left over after the last bit are the light remainder bits.
    fn draw_codewords(&mut self, data: &[u8]) -> Result<(), EncodingError> {
        let rawmodules = num_raw_data_modules(self.version);
        if data.len() != rawmodules / 8 {
            return Err(EncodingError::Internal("channel length does not match the symbol"));
        }
        let numbits = data.len() * 8;
        let size = self.size;
        let mut i: usize = 0;
        let mut right: i32 = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let y = if upward { size - 1 - vert } else { vert };
                for x in [right, right - 1] {
                    if self.module(x, y) == Some(Module::Empty) {
                        let bit = i < numbits && get_bit(data[i >> 3].into(), 7 - (i & 7) as u8);
                        self.set(x, y, Module::Data(bit));
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        if i != rawmodules {
            return Err(EncodingError::Internal("data module count does not match the layout"));
        }
        Ok(())
    }

    /*---- Masking ----*/

    fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let i = self.index(x, y);
                if let Module::Data(dark) = self.modules[i] {
                    self.modules[i] = Module::Data(dark ^ mask.inverts(x, y));
                }
            }
        }
    }

    fn penalty_with_mask(&mut self, mask: Mask) -> i32 {
        self.apply_mask(mask);
        self.draw_format_bits(mask);
        let penalty = self.get_penalty_score();
        self.apply_mask(mask); // XOR undoes it
        penalty
    }

    fn commit_best_mask(&mut self) {
        self.draw_version_bits();
        let mut best = Mask(0);
        let mut minpenalty = i32::MAX;
        for mask in Mask::ALL {
            let penalty = self.penalty_with_mask(mask);
            if penalty < minpenalty {
                best = mask;
                minpenalty = penalty;
            }
        }
        self.apply_mask(best);
        self.draw_format_bits(best);
        self.mask = best;
    }

    fn draw_format_bits(&mut self, mask: Mask) {
        let bits = format_info_bits(self.ecl, mask);
        for copy in format_positions(self.size) {
            for (i, (x, y)) in copy.into_iter().enumerate() {
                self.set(x, y, Module::Reserved(get_bit(bits, i as u8)));
            }
        }
    }

    fn draw_version_bits(&mut self) {
        if self.version.value() < 7 {
            return;
        }
        let bits = version_info_bits(self.version);
        for copy in version_positions(self.size) {
            for (i, (x, y)) in copy.into_iter().enumerate() {
                self.set(x, y, Module::Reserved(get_bit(bits, i as u8)));
            }
        }
    }

    /*---- Penalty scoring ----*/

    fn get_penalty_score(&self) -> i32 {
        let size = self.size;
        let mut result: i32 = 0;

        for y in 0..size {
            result += self.line_penalty(|x| self.get_module(x, y));
        }
        for x in 0..size {
            result += self.line_penalty(|y| self.get_module(x, y));
        }

        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color = self.get_module(x, y);
                if color == self.get_module(x + 1, y)
                    && color == self.get_module(x, y + 1)
                    && color == self.get_module(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        let dark = self.dark_module_count() as i32;
        let total = size * size;
        // Smallest k such that the dark share is within (5 + 5k)% of 50%
        let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result + k * PENALTY_N4
    }

    /// Run-length (N1) and finder-like (N3) penalties along one row or column.
    fn line_penalty(&self, get: impl Fn(i32) -> bool) -> i32 {
        let mut result = 0;
        let mut runcolor = false;
        let mut runlen: i32 = 0;
        let mut runhistory = FinderPenalty::new(self.size);
        for i in 0..self.size {
            let color = get(i);
            if color == runcolor {
                runlen += 1;
                if runlen == 5 {
                    result += PENALTY_N1;
                } else if runlen > 5 {
                    result += 1;
                }
            } else {
                runhistory.add_history(runlen);
                if !runcolor {
                    result += runhistory.count_patterns() * PENALTY_N3;
                }
                runcolor = color;
                runlen = 1;
            }
        }
        result + runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3
    }
}

/// Picks the smallest version whose data capacity at `ecl` holds `segs`.
pub fn select_version(segs: &[QrSegment], ecl: QrCodeEcc) -> Result<Version, EncodingError> {
    let mut bits = None;
    let mut capacity = 0;
    for version in Version::all() {
        capacity = num_data_codewords(version, ecl) * 8;
        bits = QrSegment::get_total_bits(segs, version);
        if bits.is_some_and(|n| n <= capacity) {
            return Ok(version);
        }
    }
    Err(EncodingError::DataTooLong { level: ecl, bits, capacity })
}

/// Picks the smallest version that holds `text` at `ecl`, along with the cheapest
/// segmentation of `text` for that version.
pub fn select_segments(
    text: &str,
    ecl: QrCodeEcc,
) -> Result<(Version, Vec<QrSegment>), EncodingError> {
    let mut bits = None;
    let mut capacity = 0;
    let mut segs = Vec::new();
    let mut class = None;
    for version in Version::all() {
        if class != Some(version.count_width_class()) {
            class = Some(version.count_width_class());
            segs = QrSegment::classify(text, version);
        }
        capacity = num_data_codewords(version, ecl) * 8;
        bits = QrSegment::get_total_bits(&segs, version);
        if bits.is_some_and(|n| n <= capacity) {
            return Ok((version, segs));
        }
    }
    Err(EncodingError::DataTooLong { level: ecl, bits, capacity })
}

/// Serializes `segs` into exactly `num_data_codewords(version, ecl)` bytes:
/// headers and payload, terminator, bit padding, then alternating pad bytes.
pub fn encode_segments_to_codewords(
    segs: &[QrSegment],
    version: Version,
    ecl: QrCodeEcc,
) -> Result<Vec<u8>, EncodingError> {
    let datacapacitybits = num_data_codewords(version, ecl) * 8;
    let mut bb = BitBuffer::with_capacity_bits(datacapacitybits);
    for seg in segs {
        let ccbits = seg.mode().num_char_count_bits(version);
        let numchars = u32::try_from(seg.num_chars())
            .ok()
            .filter(|&n| n >> ccbits == 0)
            .ok_or(EncodingError::Internal("character count overflows its indicator"))?;
        bb.append_bits(seg.mode().mode_bits(), 4);
        bb.append_bits(numchars, ccbits);
        for bit in seg.bits() {
            bb.append_bits(u32::from(bit), 1);
        }
    }
    if bb.len() > datacapacitybits {
        return Err(EncodingError::Internal("segments exceed the selected capacity"));
    }

    // Terminator, truncated when the symbol is nearly full
    let numzerobits = core::cmp::min(4, datacapacitybits - bb.len());
    bb.append_bits(0, numzerobits as u8);
    let numzerobits = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, numzerobits as u8);

    for &padbyte in [0xec, 0x11].iter().cycle() {
        if bb.len() >= datacapacitybits {
            break;
        }
        bb.append_bits(padbyte, 8);
    }

    let codewords = bb.into_bytes();
    if codewords.len() * 8 != datacapacitybits {
        return Err(EncodingError::Internal("codeword count does not match the capacity table"));
    }
    Ok(codewords)
}

/// 15-bit format information: level and mask under a BCH(15,5) code, XOR 0x5412.
pub(crate) fn format_info_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ 0x5412
}

/// 18-bit version information: version number under a BCH(18,6) code.
pub(crate) fn version_info_bits(version: Version) -> u32 {
    let ver = u32::from(version.value());
    let mut rem: u32 = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
    }
    (ver << 12) | rem
}

/// Both copies of the format information, indexed by bit (0 = least significant).
fn format_positions(size: i32) -> [[(i32, i32); 15]; 2] {
    let mut first = [(0, 0); 15];
    let mut second = [(0, 0); 15];
    for i in 0..15 {
        first[i as usize] = match i {
            0..=5 => (8, i),
            6 => (8, 7),
            7 => (8, 8),
            8 => (7, 8),
            _ => (14 - i, 8),
        };
        second[i as usize] = if i < 8 { (size - 1 - i, 8) } else { (8, size - 15 + i) };
    }
    [first, second]
}

/// Both copies of the version information, indexed by bit.
fn version_positions(size: i32) -> [[(i32, i32); 18]; 2] {
    let mut first = [(0, 0); 18];
    let mut second = [(0, 0); 18];
    for i in 0..18 {
        let a = size - 11 + i % 3;
        let b = i / 3;
        first[i as usize] = (a, b);
        second[i as usize] = (b, a);
    }
    [first, second]
}

struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    /// Pushes a run length; the first run absorbs the light border.
    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size;
        }
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = currentrunlength;
    }

    /// Number of 1:1:3:1:1 patterns (0 to 2) ending at the newest light run.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n) + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_bits(qr: &QrCode, positions: &[(i32, i32)]) -> u32 {
        positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| u32::from(qr.get_module(x, y)) << i)
            .sum()
    }

    #[test]
    fn test_hello_world_data_codewords() {
        let (version, segs) = select_segments("HELLO WORLD", QrCodeEcc::Medium).unwrap();
        assert_eq!(version.value(), 1);
        let codewords = encode_segments_to_codewords(&segs, version, QrCodeEcc::Medium).unwrap();
        assert_eq!(
            codewords,
            vec![
                0x20, 0x5B, 0x0B, 0x78, 0xD1, 0x72, 0xDC, 0x4D, 0x43, 0x40, 0xEC, 0x11, 0xEC, 0x11,
                0xEC, 0x11
            ]
        );
    }

    #[test]
    fn test_numeric_data_codewords() {
        let v1 = Version::new(1).unwrap();
        let segs = QrSegment::classify("01234567", v1);
        let codewords = encode_segments_to_codewords(&segs, v1, QrCodeEcc::Medium).unwrap();
        assert_eq!(&codewords[..6], &[0x10, 0x20, 0x0C, 0x56, 0x61, 0x80]);
        assert_eq!(codewords.len(), 16);
    }

    #[test]
    fn test_terminator_truncated_when_full() {
        // 17 bytes at 1-L: 4 + 8 + 136 = 148 bits of 152, only 4 bits of room.
        let segs = [QrSegment::make_bytes(b"abcdefghijklmnopq")];
        let v1 = Version::new(1).unwrap();
        assert_eq!(select_version(&segs, QrCodeEcc::Low).unwrap(), v1);
        let codewords = encode_segments_to_codewords(&segs, v1, QrCodeEcc::Low).unwrap();
        assert_eq!(codewords.len(), 19);
        assert_eq!(codewords[18] & 0x0f, 0);
    }

    #[test]
    fn test_format_and_version_constants() {
        assert_eq!(format_info_bits(QrCodeEcc::Medium, Mask(0)), 0x5412);
        assert_eq!(format_info_bits(QrCodeEcc::Low, Mask(0)), 0x77C4);
        assert_eq!(version_info_bits(Version::new(7).unwrap()), 0x07C94);
    }

    #[test]
    fn test_format_bits_written_in_both_copies() {
        let qr = QrCode::encode_text("format check", QrCodeEcc::Quartile).unwrap();
        let expected = format_info_bits(QrCodeEcc::Quartile, qr.mask());
        let [first, second] = format_positions(qr.size());
        assert_eq!(read_bits(&qr, &first), expected);
        assert_eq!(read_bits(&qr, &second), expected);
    }

    #[test]
    fn test_version_bits_written_from_version_7() {
        let text = "7".repeat(300);
        let qr = QrCode::encode_text(&text, QrCodeEcc::High).unwrap();
        assert!(qr.version().value() >= 7);
        let expected = version_info_bits(qr.version());
        let [first, second] = version_positions(qr.size());
        assert_eq!(read_bits(&qr, &first), expected);
        assert_eq!(read_bits(&qr, &second), expected);
    }

    #[test]
    fn test_function_patterns() {
        let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Medium).unwrap();
        let size = qr.size();
        // Finder corners and centers
        for (cx, cy) in [(3, 3), (size - 4, 3), (3, size - 4)] {
            assert!(qr.get_module(cx, cy));
            assert!(qr.get_module(cx - 3, cy - 3));
            assert!(!qr.get_module(cx - 2, cy - 2));
        }
        // Separators
        assert_eq!(qr.module(7, 0), Some(Module::Function(false)));
        assert_eq!(qr.module(0, 7), Some(Module::Function(false)));
        // Timing
        for i in 8..size - 8 {
            assert_eq!(qr.module(6, i), Some(Module::Function(i % 2 == 0)));
            assert_eq!(qr.module(i, 6), Some(Module::Function(i % 2 == 0)));
        }
        assert_eq!(qr.module(8, size - 8), Some(Module::Function(true)));
        assert!(matches!(qr.module(8, 0), Some(Module::Reserved(_))));
        assert_eq!(qr.module(size, 0), None);
    }

    #[test]
    fn test_alignment_pattern_stamped() {
        let qr = QrCode::encode_text("alignment pattern sample", QrCodeEcc::Medium).unwrap();
        assert!(qr.version().value() >= 2);
        let pos = qr.version().alignment_pattern_positions();
        let c = pos[pos.len() - 1];
        assert_eq!(qr.module(c, c), Some(Module::Function(true)));
        assert_eq!(qr.module(c + 1, c), Some(Module::Function(false)));
        assert_eq!(qr.module(c + 2, c + 2), Some(Module::Function(true)));
    }

    #[test]
    fn test_data_module_count_matches_layout() {
        let long = "x".repeat(400);
        for text in ["1", "HELLO WORLD", long.as_str()] {
            let qr = QrCode::encode_text(text, QrCodeEcc::Low).unwrap();
            let mut data = 0;
            for y in 0..qr.size() {
                for x in 0..qr.size() {
                    match qr.module(x, y) {
                        Some(Module::Data(_)) => data += 1,
                        Some(Module::Empty) | None => panic!("unfilled module at {x},{y}"),
                        _ => {}
                    }
                }
            }
            assert_eq!(data, num_raw_data_modules(qr.version()));
        }
    }

    #[test]
    fn test_mask_inverts() {
        assert!(Mask(0).inverts(0, 0));
        assert!(!Mask(0).inverts(1, 0));
        assert!(Mask(1).inverts(5, 2));
        assert!(Mask(2).inverts(3, 1));
        assert!(!Mask(4).inverts(3, 0));
        assert!(Mask(5).inverts(0, 7));
        assert!(Mask::new(8).is_none());
    }

    #[test]
    fn test_committed_mask_is_minimal() {
        let qr = QrCode::encode_text("https://example.com/path?q=1", QrCodeEcc::Medium).unwrap();
        let penalties = qr.mask_penalties();
        let committed = penalties[usize::from(qr.mask().value())];
        assert!(penalties.iter().all(|&p| committed <= p));
        let first_min = penalties.iter().position(|&p| p == committed).unwrap();
        assert_eq!(first_min, usize::from(qr.mask().value()));
    }

    #[test]
    fn test_finder_penalty_counts_each_padded_side() {
        // light border, 1:1:3:1:1, then four light modules: padded on both sides
        let mut fp = FinderPenalty::new(21);
        for run in [0, 1, 1, 3, 1, 1] {
            fp.add_history(run);
        }
        assert_eq!(fp.terminate_and_count(false, 4), 2);

        // two light modules after the pattern: only the bordered left side counts
        let mut fp = FinderPenalty::new(21);
        for run in [0, 1, 1, 3, 1, 1, 2] {
            fp.add_history(run);
        }
        assert_eq!(fp.count_patterns(), 1);

        // two light modules on each side, away from the border
        let mut fp = FinderPenalty::new(21);
        for run in [0, 5, 2, 1, 1, 3, 1, 1, 2] {
            fp.add_history(run);
        }
        assert_eq!(fp.count_patterns(), 0);
    }
}
