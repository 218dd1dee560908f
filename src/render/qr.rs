//! Built-in QR renderer.
//!
//! Lays the symbol out the way common QR libraries size a `width` option:
//! each module becomes a `scale × scale` block with
//! `scale = floor(width / (modules + 2 * margin))` (at least 1), so the
//! final image is at most `width` pixels wide unless the symbol is denser
//! than the target.

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, QrCode};
use std::io::Cursor;

use super::{QrImage, QrOptions, QrRenderer};
use crate::error::RenderError;

/// Renders payloads to PNG with `qrcode` and `image`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngQrRenderer;

#[async_trait]
impl QrRenderer for PngQrRenderer {
    async fn render(&self, payload: &str, options: &QrOptions) -> Result<QrImage, RenderError> {
        let payload = payload.to_string();
        let options = *options;

        // CPU-bound, run in separate thread
        tokio::task::spawn_blocking(move || render_png(&payload, &options))
            .await
            .map_err(|e| RenderError::Image(format!("Task error: {}", e)))?
    }
}

/// Encode `payload` as a QR symbol and rasterize it to PNG.
pub fn render_png(payload: &str, options: &QrOptions) -> Result<QrImage, RenderError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| RenderError::Encode(e.to_string()))?;

    let modules = code.width() as u32;
    let total = modules + 2 * options.margin;
    let scale = (options.width / total).max(1);
    let size = total * scale;

    let mut img = RgbaImage::from_pixel(size, size, Rgba(options.light));
    let dark = Rgba(options.dark);

    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx as usize, qy as usize)] != Color::Dark {
                continue;
            }
            let x0 = (qx + options.margin) * scale;
            let y0 = (qy + options.margin) * scale;
            for y in y0..y0 + scale {
                for x in x0..x0 + scale {
                    img.put_pixel(x, y, dark);
                }
            }
        }
    }

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RenderError::Image(format!("PNG encoding failed: {}", e)))?;

    Ok(QrImage::new(png, size, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_dimensions() {
        let options = QrOptions::default();
        let image = render_png("123*456*2024-01-06*00:03:00*12.50", &options).unwrap();

        assert_eq!(image.width, image.height);
        assert!(image.width <= options.width);
        assert!(image.width > options.width / 2);

        let decoded = image::load_from_memory(&image.png).unwrap();
        assert_eq!(decoded.width(), image.width);
    }

    #[test]
    fn test_margin_uses_light_color() {
        let options = QrOptions {
            light: [0xff, 0x00, 0x00, 0xff],
            ..QrOptions::default()
        };
        let image = render_png("hello", &options).unwrap();
        let decoded = image::load_from_memory(&image.png).unwrap().to_rgba8();

        assert_eq!(decoded.get_pixel(0, 0), &Rgba([0xff, 0x00, 0x00, 0xff]));
    }

    #[test]
    fn test_finder_pattern_is_dark() {
        let options = QrOptions::default();
        let image = render_png("hello", &options).unwrap();
        let decoded = image::load_from_memory(&image.png).unwrap().to_rgba8();

        // 21 modules + 2 margin = 23; scale = 240 / 23 = 10
        assert_eq!(image.width, 230);
        assert_eq!(decoded.get_pixel(10, 10), &Rgba(options.dark));
    }

    #[test]
    fn test_tiny_width_keeps_one_pixel_modules() {
        let options = QrOptions {
            width: 5,
            ..QrOptions::default()
        };
        let image = render_png("hello", &options).unwrap();
        assert_eq!(image.width, 23);
    }

    #[test]
    fn test_oversized_payload_fails() {
        let payload = "x".repeat(8000);
        let err = render_png(&payload, &QrOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::Encode(_)));
    }

    #[tokio::test]
    async fn test_async_render() {
        let image = PngQrRenderer
            .render("abc", &QrOptions::default())
            .await
            .unwrap();
        assert!(image.data_url().starts_with("data:image/png;base64,"));
    }
}
