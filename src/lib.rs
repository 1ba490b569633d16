//! # qrforge
//!
//! A self-contained QR code encoder and renderer, plus a small HTTP service.
//!
//! `qrforge` encodes text into QR Code Model 2 symbols (versions 1 to 40, all four
//! error correction levels) and renders them as PNG images or SVG markup. The engine
//! is pure and synchronous: the same input always produces the same symbol and the
//! same image, and nothing is shared between calls.
//!
//! ## Features
//!
//! - Numeric, alphanumeric and byte mode segments, split automatically.
//! - Smallest-version selection that never weakens the requested error correction.
//! - Reed-Solomon error correction and block interleaving.
//! - Mask selection by the four standard penalty rules.
//! - Raster (RGBA, PNG) and vector (rectangle list, SVG) output with custom colors.
//!
//! ## Example
//!
//! ```rust
//! use qrforge::{encode, render, OutputKind, QrCodeEcc, RenderOptions};
//!
//! let qr = encode("https://example.com", QrCodeEcc::Medium).unwrap();
//! let options = RenderOptions::default().fit_width(300, &qr);
//! let png = render(&qr, &options).unwrap().to_bytes().unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//!
//! let svg = render(&qr, &options.kind(OutputKind::Vector)).unwrap();
//! assert_eq!(svg.content_type(), "image/svg+xml");
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Symbol construction, masking and format information.
//! - [`segment`]: Mode classification and bit packing.
//! - [`capacity`]: Versions, levels and codeword capacity tables.
//! - [`ecc`]: Reed-Solomon coding and interleaving.
//! - [`render`]: Raster and vector output.
//! - [`service`]: The HTTP front end.

pub mod capacity;
pub mod ecc;
pub mod error;
mod pages;
pub mod qrcode;
pub mod render;
pub mod segment;
pub mod service;

pub use capacity::{QrCodeEcc, Version};
pub use error::{EncodingError, RenderError};
pub use qrcode::{Mask, Module, QrCode};
pub use render::{ModuleRect, OutputImage, OutputKind, RenderOptions, VectorImage};

/// Encodes `text` into a QR symbol at error correction level `level`.
///
/// # Errors
///
/// [`EncodingError::EmptyInput`] for empty text, [`EncodingError::DataTooLong`]
/// when no version up to 40 can hold the text at `level`.
pub fn encode(text: &str, level: QrCodeEcc) -> Result<QrCode, EncodingError> {
    QrCode::encode_text(text, level)
}

/// Renders a finished symbol. See [`render::render`].
pub fn render(qr: &QrCode, options: &RenderOptions) -> Result<OutputImage, RenderError> {
    render::render(qr, options)
}
