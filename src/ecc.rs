//! Reed-Solomon error correction over GF(2^8) and block interleaving.
//!
//! The field uses the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D) with
//! generator element 2. Exponent and logarithm tables are built at compile time.

use crate::capacity::{BlockLayout, QrCodeEcc, Version};
use crate::error::EncodingError;

const PRIMITIVE: u16 = 0x11d;

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    // alpha^255 == alpha^0
    table[255] = 1;
    table
}

const fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const EXP: [u8; 256] = build_exp_table();

static EXP_TABLE: [u8; 256] = EXP;
static LOG_TABLE: [u8; 256] = build_log_table(&EXP);

/// GF(256) multiplication.
pub(crate) fn gf_mul(x: u8, y: u8) -> u8 {
    if x == 0 || y == 0 {
        return 0;
    }
    let sum = usize::from(LOG_TABLE[usize::from(x)]) + usize::from(LOG_TABLE[usize::from(y)]);
    EXP_TABLE[sum % 255]
}

/// Computes remainder codewords for data blocks with a fixed generator degree.
pub struct ReedSolomonGenerator {
    /// Generator polynomial coefficients, highest power first, leading 1 omitted.
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    /// Builds the generator polynomial (x - a^0)(x - a^1)...(x - a^(degree-1)).
    pub fn new(degree: usize) -> Self {
        debug_assert!((1..=255).contains(&degree), "Degree out of range");
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = gf_mul(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = gf_mul(root, 0x02);
        }
        Self { divisor }
    }

    pub fn degree(&self) -> usize {
        self.divisor.len()
    }

    /// Remainder of `data(x) * x^degree` divided by the generator polynomial.
    pub fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for &b in data {
            let factor = b ^ result[0];
            result.rotate_left(1);
            if let Some(last) = result.last_mut() {
                *last = 0;
            }
            for (x, &y) in result.iter_mut().zip(&self.divisor) {
                *x ^= gf_mul(y, factor);
            }
        }
        result
    }
}

/// Splits `data` into blocks, appends each block's remainder and interleaves
/// everything into final channel order.
pub fn add_ecc_and_interleave(
    data: &[u8],
    ver: Version,
    ecl: QrCodeEcc,
) -> Result<Vec<u8>, EncodingError> {
    let layout = BlockLayout::for_version(ver, ecl);
    if data.len() != layout.data_codewords() {
        return Err(EncodingError::Internal(
            "data codeword count does not match the capacity table",
        ));
    }

    let rs = ReedSolomonGenerator::new(layout.ecc_per_block);
    let mut blocks: Vec<(&[u8], Vec<u8>)> = Vec::with_capacity(layout.num_blocks());
    let mut rest = data;
    for datlen in layout.block_data_lengths() {
        let (dat, tail) = rest.split_at(datlen);
        blocks.push((dat, rs.compute_remainder(dat)));
        rest = tail;
    }

    let mut result = Vec::with_capacity(layout.total_codewords());
    for i in 0..layout.group2_data {
        // Short blocks have no codeword at the last data index.
        result.extend(blocks.iter().filter_map(|(dat, _)| dat.get(i)));
    }
    for i in 0..rs.degree() {
        result.extend(blocks.iter().map(|(_, ecc)| ecc[i]));
    }

    if result.len() != layout.total_codewords() {
        return Err(EncodingError::Internal("interleaved codeword count mismatch"));
    }
    Ok(result)
}
