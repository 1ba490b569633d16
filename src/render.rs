//! Rendering a finished [`QrCode`] to a raster or vector image.
//!
//! Raster output is an RGBA pixel grid (serialized as PNG); vector output is a
//! list of unit squares in module coordinates (serialized as SVG).

use std::fmt::Write as _;
use std::io::Cursor;
use std::str::FromStr;

use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};

use crate::error::RenderError;
use crate::qrcode::QrCode;

/// Largest canvas edge, in pixels, that [`render`] will produce.
pub const MAX_CANVAS_EDGE: u32 = 16_384;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OutputKind {
    /// Pixel grid, PNG when serialized.
    #[default]
    Raster,
    /// Rectangle list, SVG when serialized.
    Vector,
}

impl FromStr for OutputKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" | "raster" => Ok(Self::Raster),
            "svg" | "vector" => Ok(Self::Vector),
            _ => Err(()),
        }
    }
}

/// Options for [`render`].
///
/// `module_size` is given directly in pixels per module. Use
/// [`RenderOptions::fit_width`] to derive it from a target image width instead.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RenderOptions {
    pub module_size: u32,
    /// Quiet zone width in modules.
    pub margin: u32,
    pub dark_color: String,
    pub light_color: String,
    pub kind: OutputKind,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_size: 8,
            margin: 2,
            dark_color: "#000000".to_string(),
            light_color: "#FFFFFF".to_string(),
            kind: OutputKind::Raster,
        }
    }
}

impl RenderOptions {
    /// Sets the module size to the largest whole number of pixels that keeps the
    /// image, margin included, no wider than `width`. Never below 1.
    pub fn fit_width(mut self, width: u32, qr: &QrCode) -> Self {
        let modules = (qr.size() as u32).saturating_add(self.margin.saturating_mul(2));
        self.module_size = (width / modules).max(1);
        self
    }

    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn colors(mut self, dark: impl Into<String>, light: impl Into<String>) -> Self {
        self.dark_color = dark.into();
        self.light_color = light.into();
        self
    }

    pub fn kind(mut self, kind: OutputKind) -> Self {
        self.kind = kind;
        self
    }
}

/// One dark module, a 1x1 square with its top-left corner at (`x`, `y`) in
/// symbol coordinates (margin excluded).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModuleRect {
    pub x: u32,
    pub y: u32,
}

/// Vector rendering of a symbol, scaled by the consumer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VectorImage {
    /// Canvas edge in modules, margin included.
    pub dimension: u32,
    pub margin: u32,
    pub module_size: u32,
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
    /// Row-major.
    pub rects: Vec<ModuleRect>,
}

impl VectorImage {
    /// Canvas edge in pixels.
    pub fn pixel_size(&self) -> u32 {
        self.dimension * self.module_size
    }

    /// Returns SVG markup with a `viewBox` in module units. The string always uses
    /// Unix newlines.
    pub fn to_svg_string(&self) -> String {
        let mut result = String::new();
        result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
        let _ = writeln!(
            result,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" \
             viewBox=\"0 0 {1} {1}\" shape-rendering=\"crispEdges\" stroke=\"none\">",
            self.pixel_size(),
            self.dimension
        );
        let _ = writeln!(
            result,
            "\t<rect width=\"100%\" height=\"100%\" {}/>",
            svg_fill(self.light)
        );
        result += "\t<path d=\"";
        for (i, rect) in self.rects.iter().enumerate() {
            if i != 0 {
                result += " ";
            }
            let _ = write!(
                result,
                "M{},{}h1v1h-1z",
                rect.x + self.margin,
                rect.y + self.margin
            );
        }
        let _ = writeln!(result, "\" {}/>", svg_fill(self.dark));
        result += "</svg>\n";
        result
    }
}

fn svg_fill(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    let mut attr = format!("fill=\"#{r:02X}{g:02X}{b:02X}\"");
    if a != 255 {
        let _ = write!(attr, " fill-opacity=\"{:.3}\"", f32::from(a) / 255.0);
    }
    attr
}

/// A rendered symbol.
#[derive(Clone, Debug)]
pub enum OutputImage {
    Raster(RgbaImage),
    Vector(VectorImage),
}

impl OutputImage {
    /// Canvas edge in pixels.
    pub fn pixel_size(&self) -> u32 {
        match self {
            OutputImage::Raster(img) => img.width(),
            OutputImage::Vector(svg) => svg.pixel_size(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputImage::Raster(_) => "image/png",
            OutputImage::Vector(_) => "image/svg+xml",
        }
    }

    /// PNG bytes for raster output, UTF-8 SVG for vector output.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RenderError> {
        match self {
            OutputImage::Raster(img) => {
                let mut buf = Vec::new();
                img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
                Ok(buf)
            }
            OutputImage::Vector(svg) => Ok(svg.to_svg_string().into_bytes()),
        }
    }
}

/// Parses `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
pub fn parse_color(value: &str) -> Result<Rgba<u8>, RenderError> {
    let unsupported = || RenderError::UnsupportedColor(value.to_string());
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(unsupported());
    }
    let digits: Vec<u8> = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).map(|c| c as u8).collect(),
        6 | 8 => hex.bytes().collect(),
        _ => return Err(unsupported()),
    };
    let mut channels = [255u8; 4];
    for (channel, pair) in channels.iter_mut().zip(digits.chunks(2)) {
        let pair = std::str::from_utf8(pair).map_err(|_| unsupported())?;
        *channel = u8::from_str_radix(pair, 16).map_err(|_| unsupported())?;
    }
    Ok(Rgba(channels))
}

/// Renders `qr` according to `options`.
///
/// # Errors
///
/// [`RenderError::UnsupportedColor`] for an unparsable color,
/// [`RenderError::InvalidDimension`] for a zero module size or a canvas edge
/// above [`MAX_CANVAS_EDGE`].
pub fn render(qr: &QrCode, options: &RenderOptions) -> Result<OutputImage, RenderError> {
    let dark = parse_color(&options.dark_color)?;
    let light = parse_color(&options.light_color)?;

    let invalid = || RenderError::InvalidDimension {
        module_size: options.module_size,
        margin: options.margin,
    };
    if options.module_size == 0 {
        return Err(invalid());
    }
    let dimension = options
        .margin
        .checked_mul(2)
        .and_then(|m| m.checked_add(qr.size() as u32))
        .ok_or_else(invalid)?;
    let edge = dimension
        .checked_mul(options.module_size)
        .filter(|&e| e <= MAX_CANVAS_EDGE)
        .ok_or_else(invalid)?;

    let margin = options.margin as i32;
    match options.kind {
        OutputKind::Raster => {
            let module_size = options.module_size;
            let img = ImageBuffer::from_fn(edge, edge, |px, py| {
                let x = (px / module_size) as i32 - margin;
                let y = (py / module_size) as i32 - margin;
                if qr.get_module(x, y) {
                    dark
                } else {
                    light
                }
            });
            Ok(OutputImage::Raster(img))
        }
        OutputKind::Vector => {
            let size = qr.size();
            let rects = (0..size)
                .flat_map(|y| (0..size).map(move |x| (x, y)))
                .filter(|&(x, y)| qr.get_module(x, y))
                .map(|(x, y)| ModuleRect { x: x as u32, y: y as u32 })
                .collect();
            Ok(OutputImage::Vector(VectorImage {
                dimension,
                margin: options.margin,
                module_size: options.module_size,
                dark,
                light,
                rects,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::QrCodeEcc;

    fn hello() -> QrCode {
        QrCode::encode_text("HELLO WORLD", QrCodeEcc::Medium).unwrap()
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#000000").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_color("#FFF").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("ff8000").unwrap(), Rgba([255, 128, 0, 255]));
        assert_eq!(parse_color("#12345680").unwrap(), Rgba([0x12, 0x34, 0x56, 0x80]));
        assert_eq!(parse_color("#abcd").unwrap(), Rgba([0xaa, 0xbb, 0xcc, 0xdd]));
    }

    #[test]
    fn test_parse_color_rejects_garbage() {
        for bad in ["", "#", "black", "#12", "#12345", "#GGGGGG", "#ééé"] {
            assert!(
                matches!(parse_color(bad), Err(RenderError::UnsupportedColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_output_kind_from_str() {
        assert_eq!("png".parse::<OutputKind>(), Ok(OutputKind::Raster));
        assert_eq!("SVG".parse::<OutputKind>(), Ok(OutputKind::Vector));
        assert!("jpeg".parse::<OutputKind>().is_err());
    }

    #[test]
    fn test_raster_dimension_law() {
        let qr = hello();
        for module_size in [1, 3, 10] {
            for margin in [0, 2, 4] {
                let opts = RenderOptions { module_size, margin, ..RenderOptions::default() };
                let OutputImage::Raster(img) = render(&qr, &opts).unwrap() else {
                    panic!("expected raster output");
                };
                let expected = (21 + 2 * margin) * module_size;
                assert_eq!(img.dimensions(), (expected, expected));
            }
        }
    }

    #[test]
    fn test_raster_pixels_follow_modules() {
        let qr = hello();
        let opts = RenderOptions { module_size: 4, margin: 2, ..RenderOptions::default() };
        let OutputImage::Raster(img) = render(&qr, &opts).unwrap() else {
            panic!("expected raster output");
        };
        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);
        // margin
        assert_eq!(*img.get_pixel(0, 0), white);
        assert_eq!(*img.get_pixel(7, 7), white);
        // top-left finder corner spans pixels 8..12
        assert_eq!(*img.get_pixel(8, 8), black);
        assert_eq!(*img.get_pixel(11, 11), black);
        for y in 0..21 {
            for x in 0..21 {
                let expected = if qr.get_module(x, y) { black } else { white };
                let px = (x as u32 + 2) * 4 + 1;
                let py = (y as u32 + 2) * 4 + 2;
                assert_eq!(*img.get_pixel(px, py), expected);
            }
        }
    }

    #[test]
    fn test_custom_colors() {
        let qr = hello();
        let opts = RenderOptions::default().colors("#FF0000", "#00FF00");
        let OutputImage::Raster(img) = render(&qr, &opts).unwrap() else {
            panic!("expected raster output");
        };
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(16, 16), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_vector_rects_match_dark_modules() {
        let qr = hello();
        let opts = RenderOptions { module_size: 10, margin: 2, kind: OutputKind::Vector, ..Default::default() };
        let OutputImage::Vector(svg) = render(&qr, &opts).unwrap() else {
            panic!("expected vector output");
        };
        assert_eq!(svg.rects.len(), qr.dark_module_count());
        assert_eq!(svg.dimension, 25);
        assert_eq!(svg.pixel_size(), 250);
        assert_eq!(svg.rects[0], ModuleRect { x: 0, y: 0 });
        assert!(svg.rects.iter().all(|r| qr.get_module(r.x as i32, r.y as i32)));
    }

    #[test]
    fn test_svg_markup() {
        let qr = hello();
        let opts = RenderOptions::default().kind(OutputKind::Vector).colors("#112233", "#FFFFFF80");
        let out = render(&qr, &opts).unwrap();
        assert_eq!(out.content_type(), "image/svg+xml");
        let svg = String::from_utf8(out.to_bytes().unwrap()).unwrap();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("viewBox=\"0 0 25 25\""));
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("M2,2h1v1h-1z"));
        assert!(svg.contains("fill=\"#112233\""));
        assert!(svg.contains("fill=\"#FFFFFF\" fill-opacity=\"0.502\""));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_png_bytes() {
        let out = render(&hello(), &RenderOptions::default()).unwrap();
        assert_eq!(out.content_type(), "image/png");
        assert_eq!(out.pixel_size(), 200);
        let bytes = out.to_bytes().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_invalid_dimensions() {
        let qr = hello();
        let zero = RenderOptions { module_size: 0, ..Default::default() };
        assert!(matches!(render(&qr, &zero), Err(RenderError::InvalidDimension { .. })));
        let huge = RenderOptions { module_size: 1000, ..Default::default() };
        assert!(matches!(render(&qr, &huge), Err(RenderError::InvalidDimension { .. })));
        let wide = RenderOptions { margin: u32::MAX, ..Default::default() };
        assert!(matches!(render(&qr, &wide), Err(RenderError::InvalidDimension { .. })));
    }

    #[test]
    fn test_bad_color_reported_before_rendering() {
        let qr = hello();
        let opts = RenderOptions::default().colors("#000000", "white");
        match render(&qr, &opts) {
            Err(RenderError::UnsupportedColor(c)) => assert_eq!(c, "white"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_fit_width() {
        let qr = hello();
        // 300 / 25 = 12
        assert_eq!(RenderOptions::default().fit_width(300, &qr).module_size, 12);
        assert_eq!(RenderOptions::default().margin(0).fit_width(300, &qr).module_size, 14);
        assert_eq!(RenderOptions::default().fit_width(10, &qr).module_size, 1);
    }
}
