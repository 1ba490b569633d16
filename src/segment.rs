//! Segment classification and bit-level packing.
//!
//! Input text is split into numeric, alphanumeric and byte mode runs with the
//! lowest total bit cost, and each run is packed into its mode-specific bit
//! representation.

use crate::capacity::Version;

static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Encoding mode of a segment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl QrSegmentMode {
    /// The 4-bit mode indicator.
    pub(crate) fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
        }
    }

    /// Width of the character count indicator at the given version.
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        let widths: [u8; 3] = match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
        };
        widths[ver.count_width_class()]
    }
}

/// A run of input encoded in a single mode.
///
/// Segments are immutable once built; their payload is already packed into bits.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: Vec<u8>,
    bitlength: usize,
}

impl QrSegment {
    /// Splits `text` into the segments with the fewest total bits at `version`,
    /// headers included. Returns an empty list for empty text.
    ///
    /// A digit or alphanumeric run only gets its own segment when the bits it
    /// saves outweigh the extra header, so mixed text usually stays in one byte
    /// segment. The best split depends on the count indicator widths, which change
    /// at versions 10 and 27.
    pub fn classify(text: &str, version: Version) -> Vec<QrSegment> {
        if text.is_empty() {
            return Vec::new();
        }
        if Self::is_numeric(text) {
            return vec![Self::make_numeric(text)];
        }

        let modes = optimal_modes(text, version);
        let mut segs = Vec::new();
        let mut start = 0;
        for ((i, _), pair) in text.char_indices().skip(1).zip(modes.windows(2)) {
            if pair[0] != pair[1] {
                segs.push(Self::make(pair[0], &text[start..i]));
                start = i;
            }
        }
        if let Some(&last) = modes.last() {
            segs.push(Self::make(last, &text[start..]));
        }
        segs
    }

    fn make(mode: QrSegmentMode, run: &str) -> Self {
        match mode {
            QrSegmentMode::Numeric => Self::make_numeric(run),
            QrSegmentMode::Alphanumeric => Self::make_alphanumeric(run),
            QrSegmentMode::Byte => Self::make_bytes(run.as_bytes()),
        }
    }

    /// Creates a segment for binary data in byte mode.
    pub fn make_bytes(data: &[u8]) -> Self {
        Self {
            mode: QrSegmentMode::Byte,
            numchars: data.len(),
            data: data.to_vec(),
            bitlength: data.len() * 8,
        }
    }

    /// Creates a numeric mode segment. Non-digit characters are skipped.
    pub fn make_numeric(text: &str) -> Self {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        let mut numchars = 0;
        for b in text.bytes().filter(u8::is_ascii_digit) {
            accumdata = accumdata * 10 + u32::from(b - b'0');
            accumcount += 1;
            numchars += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        // 1 leftover digit -> 4 bits, 2 -> 7 bits
        if accumcount > 0 {
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        Self::from_buffer(QrSegmentMode::Numeric, numchars, bb)
    }

    /// Creates an alphanumeric mode segment. Characters outside the 45-symbol set are
    /// skipped.
    pub fn make_alphanumeric(text: &str) -> Self {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        let mut numchars = 0;
        for i in text.chars().filter_map(|c| ALPHANUMERIC_CHARSET.find(c)) {
            // find() returns a byte offset, equal to the index since the set is ASCII
            accumdata = accumdata * 45 + i as u32;
            accumcount += 1;
            numchars += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, 6);
        }
        Self::from_buffer(QrSegmentMode::Alphanumeric, numchars, bb)
    }

    fn from_buffer(mode: QrSegmentMode, numchars: usize, bb: BitBuffer) -> Self {
        Self {
            mode,
            numchars,
            bitlength: bb.len(),
            data: bb.into_bytes(),
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    pub fn bit_length(&self) -> usize {
        self.bitlength
    }

    /// Payload bits, MSB first, without mode or count indicator.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bitlength).map(move |i| (self.data[i >> 3] >> (7 - (i & 7))) & 1 != 0)
    }

    /// Total bits needed to encode `segs` at `version`, headers included.
    ///
    /// Returns `None` if a segment has too many characters for its count indicator.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if seg.numchars >= 1usize << ccbits {
                return None;
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.bitlength)?;
        }
        Some(result)
    }

    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }
}

const MODES: [QrSegmentMode; 3] = [QrSegmentMode::Byte, QrSegmentMode::Alphanumeric, QrSegmentMode::Numeric];

/// Mode for every character of `text` that minimizes the total bit count.
///
/// Costs are kept in sixths of a bit so that numeric (10/3 bits) and alphanumeric
/// (11/2 bits) characters stay integral. `steps[i][j]` is the mode character `i`
/// is encoded in on the cheapest path that leaves state `j` after it.
fn optimal_modes(text: &str, version: Version) -> Vec<QrSegmentMode> {
    let head = MODES.map(|m| (4 + usize::from(m.num_char_count_bits(version))) * 6);
    let mut prev = head;
    let mut steps: Vec<[QrSegmentMode; 3]> = Vec::with_capacity(text.len());

    for c in text.chars() {
        let mut cur = [usize::MAX; 3];
        let mut from = MODES;
        cur[0] = prev[0] + c.len_utf8() * 8 * 6;
        if ALPHANUMERIC_CHARSET.contains(c) {
            cur[1] = prev[1] + 33;
        }
        if c.is_ascii_digit() {
            cur[2] = prev[2] + 20;
        }

        // End the segment in mode k after this character, rounding up to whole bits,
        // and open a new one in mode j
        for j in 0..MODES.len() {
            for k in 0..MODES.len() {
                if cur[k] == usize::MAX {
                    continue;
                }
                let switched = cur[k].div_ceil(6) * 6 + head[j];
                if switched < cur[j] {
                    cur[j] = switched;
                    from[j] = MODES[k];
                }
            }
        }
        steps.push(from);
        prev = cur;
    }

    let mut state = (0..MODES.len()).min_by_key(|&j| prev[j]).unwrap_or(0);
    let mut result = vec![QrSegmentMode::Byte; steps.len()];
    for (slot, step) in result.iter_mut().zip(&steps).rev() {
        *slot = step[state];
        state = mode_index(*slot);
    }
    result
}

fn mode_index(mode: QrSegmentMode) -> usize {
    match mode {
        QrSegmentMode::Byte => 0,
        QrSegmentMode::Alphanumeric => 1,
        QrSegmentMode::Numeric => 2,
    }
}

/// An appendable sequence of bits, packed big-endian into bytes.
#[derive(Clone, Default, Debug)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_bits(bits: usize) -> Self {
        Self {
            data: Vec::with_capacity(bits.div_ceil(8)),
            length: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`, most significant first.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        debug_assert!(len <= 31 && (val >> len) == 0);
        for i in (0..len).rev() {
            let bit = ((val >> i) & 1) as u8;
            let shift = 7 - (self.length & 7) as u8;
            if shift == 7 {
                self.data.push(bit << shift);
            } else if let Some(last) = self.data.last_mut() {
                *last |= bit << shift;
            }
            self.length += 1;
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
