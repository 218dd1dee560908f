//! # QR Rendering
//!
//! Turns payload strings into QR images and puts them on the display.
//!
//! - [`QrRenderer`]: the rendering collaborator (payload + options → PNG)
//! - [`PngQrRenderer`]: the built-in renderer, `qrcode` + `image`
//! - [`RenderSerializer`]: one-at-a-time, submission-ordered rendering into
//!   a shared [`QrDisplay`]

pub mod qr;
pub mod serializer;

pub use qr::PngQrRenderer;
pub use serializer::{GENERATING_ALT, PendingRender, QrDisplay, RenderRequest, RenderSerializer};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::RenderError;

/// Appearance of the generated QR image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    /// Target image width in pixels
    pub width: u32,
    /// Quiet zone around the symbol, in modules
    pub margin: u32,
    /// RGBA of dark modules
    pub dark: [u8; 4],
    /// RGBA of light modules and margin
    pub light: [u8; 4],
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            width: 240,
            margin: 1,
            dark: [0x00, 0x00, 0x00, 0xff],
            light: [0xff, 0xff, 0xff, 0xff],
        }
    }
}

/// Parse a `#rrggbb` or `#rrggbbaa` color.
pub fn parse_color(s: &str) -> Result<[u8; 4], String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("Invalid color '{}': expected #rrggbb or #rrggbbaa", s));
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    let alpha = if hex.len() == 8 { channel(6) } else { 0xff };
    Ok([channel(0), channel(2), channel(4), alpha])
}

/// An encoded QR image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    /// PNG file bytes
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl QrImage {
    pub fn new(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self { png, width, height }
    }

    /// `data:image/png;base64,...` form, usable directly as an `<img src>`.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Rendering collaborator.
///
/// Implementations need not be reentrant: [`RenderSerializer`] never calls
/// `render` again before the previous call has finished.
#[async_trait]
pub trait QrRenderer: Send + Sync {
    async fn render(&self, payload: &str, options: &QrOptions) -> Result<QrImage, RenderError>;
}
