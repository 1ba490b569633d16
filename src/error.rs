use thiserror::Error;

use crate::capacity::QrCodeEcc;

/// Errors returned by [`crate::encode`].
///
/// Ways to handle [`EncodingError::DataTooLong`]:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Change the text to fit the character set of a denser mode (digits, or uppercase
///   alphanumeric).
/// - Shorten the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("Input text is empty")]
    EmptyInput,

    /// `bits` is `None` when a segment's character count overflows its count
    /// indicator even at version 40.
    #[error("Data too long for level {level:?}: needs {} bits, max capacity {capacity} bits",
        .bits.map_or_else(|| "more than representable".to_string(), |b| b.to_string()))]
    DataTooLong {
        level: QrCodeEcc,
        bits: Option<usize>,
        capacity: usize,
    },

    /// An internal invariant was violated. This is a defect in the encoder, not
    /// a problem with the input.
    #[error("Internal encoder error: {0}")]
    Internal(&'static str),
}

/// Errors returned by [`crate::render`].
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported color value: {0:?}")]
    UnsupportedColor(String),

    #[error("Invalid dimensions: module size {module_size}, margin {margin}")]
    InvalidDimension { module_size: u32, margin: u32 },

    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}
