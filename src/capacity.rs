//! Versions, error correction levels and the codeword capacity tables.
//!
//! Everything in here is compile-time constant data plus a few arithmetic helpers
//! derived from it. The per-block layout for a (version, level) pair is computed on
//! demand from two small tables instead of being stored in full.

use std::str::FromStr;

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    pub const ALL: [QrCodeEcc; 4] = [Self::Low, Self::Medium, Self::Quartile, Self::High];

    /// Index into the capacity tables, in increasing order of redundancy.
    pub(crate) const fn ordinal(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::Quartile => 2,
            Self::High => 3,
        }
    }

    /// The 2-bit value written into the format information.
    pub(crate) const fn format_bits(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 0,
            Self::Quartile => 3,
            Self::High => 2,
        }
    }
}

impl FromStr for QrCodeEcc {
    type Err = ();

    /// Accepts `L`/`M`/`Q`/`H` or the full level name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            _ => Err(()),
        }
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number, or `None` outside [1, 40].
    pub const fn new(ver: u8) -> Option<Self> {
        if Version::MIN.0 <= ver && ver <= Version::MAX.0 {
            Some(Self(ver))
        } else {
            None
        }
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of the symbol in modules, 4 * version + 17.
    pub const fn size(self) -> i32 {
        self.0 as i32 * 4 + 17
    }

    /// Which character count indicator widths apply: 0 for 1-9, 1 for 10-26,
    /// 2 for 27-40.
    pub(crate) const fn count_width_class(self) -> usize {
        ((self.0 + 7) / 17) as usize
    }

    /// Iterates every version from 1 to 40 in ascending order.
    pub fn all() -> impl Iterator<Item = Version> {
        (Self::MIN.0..=Self::MAX.0).map(Version)
    }

    /// Column/row coordinates of the alignment pattern centers, ascending.
    /// Empty for version 1.
    pub fn alignment_pattern_positions(self) -> Vec<i32> {
        let ver = i32::from(self.0);
        if ver == 1 {
            return Vec::new();
        }
        let numalign = ver / 7 + 2;
        let step = if ver == 32 {
            26
        } else {
            ((ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2)) * 2
        };
        let mut result: Vec<i32> = (0..numalign - 1).map(|i| self.size() - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }
}

/// How the data codewords of one (version, level) pair are split into blocks.
///
/// Group 1 holds the short blocks, group 2 holds blocks with one extra data codeword.
/// Every block carries the same number of error correction codewords.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockLayout {
    pub ecc_per_block: usize,
    pub group1_blocks: usize,
    pub group1_data: usize,
    pub group2_blocks: usize,
    pub group2_data: usize,
}

impl BlockLayout {
    pub fn for_version(ver: Version, ecl: QrCodeEcc) -> Self {
        let numblocks = table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
        let ecc_per_block = table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
        let rawcodewords = num_raw_data_modules(ver) / 8;
        let group2_blocks = rawcodewords % numblocks;
        let group1_data = rawcodewords / numblocks - ecc_per_block;
        Self {
            ecc_per_block,
            group1_blocks: numblocks - group2_blocks,
            group1_data,
            group2_blocks,
            group2_data: group1_data + 1,
        }
    }

    pub fn num_blocks(&self) -> usize {
        self.group1_blocks + self.group2_blocks
    }

    pub fn data_codewords(&self) -> usize {
        self.group1_blocks * self.group1_data + self.group2_blocks * self.group2_data
    }

    pub fn total_codewords(&self) -> usize {
        self.data_codewords() + self.num_blocks() * self.ecc_per_block
    }

    /// Data codeword count of each block, in channel order.
    pub fn block_data_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        core::iter::repeat(self.group1_data)
            .take(self.group1_blocks)
            .chain(core::iter::repeat(self.group2_data).take(self.group2_blocks))
    }
}

/// Number of modules available for data and error correction, including
/// remainder bits, after all function patterns are placed.
pub fn num_raw_data_modules(ver: Version) -> usize {
    let ver = usize::from(ver.value());
    let mut result: usize = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let numalign: usize = ver / 7 + 2;
        result -= (25 * numalign - 10) * numalign - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    result
}

/// Number of 8-bit data codewords (excluding error correction) for the pair.
pub fn num_data_codewords(ver: Version, ecl: QrCodeEcc) -> usize {
    num_raw_data_modules(ver) / 8
        - table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl)
            * table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
}

fn table_get(table: &'static [[u8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
    usize::from(table[ecl.ordinal()][usize::from(ver.value())])
}

// Index 0 is unused padding so tables can be indexed by version number.
static ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[u8; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_version_bounds() {
        assert!(Version::new(0).is_none());
        assert!(Version::new(41).is_none());
        assert_eq!(v(1).size(), 21);
        assert_eq!(v(40).size(), 177);
        assert_eq!(Version::all().count(), 40);
    }

    #[test]
    fn test_data_codewords_known_values() {
        assert_eq!(num_data_codewords(v(1), QrCodeEcc::Low), 19);
        assert_eq!(num_data_codewords(v(1), QrCodeEcc::Medium), 16);
        assert_eq!(num_data_codewords(v(1), QrCodeEcc::Quartile), 13);
        assert_eq!(num_data_codewords(v(1), QrCodeEcc::High), 9);
        assert_eq!(num_data_codewords(v(10), QrCodeEcc::Medium), 216);
        assert_eq!(num_data_codewords(v(40), QrCodeEcc::Low), 2956);
        assert_eq!(num_data_codewords(v(40), QrCodeEcc::High), 1276);
    }

    #[test]
    fn test_block_layout_groups() {
        // 5-Q: 2 blocks of 15 data codewords, 2 blocks of 16, 18 ECC each.
        let layout = BlockLayout::for_version(v(5), QrCodeEcc::Quartile);
        assert_eq!(
            layout,
            BlockLayout {
                ecc_per_block: 18,
                group1_blocks: 2,
                group1_data: 15,
                group2_blocks: 2,
                group2_data: 16,
            }
        );
        assert_eq!(layout.total_codewords(), 134);
        assert_eq!(
            layout.block_data_lengths().collect::<Vec<_>>(),
            vec![15, 15, 16, 16]
        );
    }

    #[test]
    fn test_block_layout_matches_capacity_for_every_entry() {
        for ver in Version::all() {
            for ecl in QrCodeEcc::ALL {
                let layout = BlockLayout::for_version(ver, ecl);
                assert_eq!(layout.data_codewords(), num_data_codewords(ver, ecl));
                assert_eq!(layout.total_codewords(), num_raw_data_modules(ver) / 8);
            }
        }
    }

    #[test]
    fn test_alignment_positions() {
        assert!(v(1).alignment_pattern_positions().is_empty());
        assert_eq!(v(2).alignment_pattern_positions(), vec![6, 18]);
        assert_eq!(v(7).alignment_pattern_positions(), vec![6, 22, 38]);
        assert_eq!(v(32).alignment_pattern_positions(), vec![6, 34, 60, 86, 112, 138]);
        assert_eq!(
            v(40).alignment_pattern_positions(),
            vec![6, 30, 58, 86, 114, 142, 170]
        );
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("m".parse(), Ok(QrCodeEcc::Medium));
        assert_eq!("H".parse(), Ok(QrCodeEcc::High));
        assert_eq!("Quartile".parse(), Ok(QrCodeEcc::Quartile));
        assert!("X".parse::<QrCodeEcc>().is_err());
        assert!(QrCodeEcc::Low < QrCodeEcc::High);
    }
}
