//! QR code rendering.

use crate::errors::{CertificateError, Result};
use crate::traits::CodeRenderer;
use async_trait::async_trait;
use image::{ImageFormat, Rgba};
use qrcode::QrCode;
use std::io::Cursor;

/// Rendering options for the scannable artifact
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Minimum output width/height in pixels
    pub size: u32,
    /// Quiet-zone modules around the code; 0 disables the border
    pub margin: u32,
    /// Module color, `#rrggbb`
    pub dark_color: String,
    /// Background color, `#rrggbb`
    pub light_color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        // Matches the artifacts the institute has already put in circulation.
        Self {
            size: 300,
            margin: 2,
            dark_color: "#000000".to_string(),
            light_color: "#FFFFFF".to_string(),
        }
    }
}

/// In-process QR renderer producing PNG bytes
pub struct QrRenderer;

#[async_trait]
impl CodeRenderer for QrRenderer {
    async fn render(&self, text: &str, options: &RenderOptions) -> Result<Vec<u8>> {
        let code = QrCode::new(text.as_bytes())
            .map_err(|e| CertificateError::ArtifactIssuance(format!("QR encoding failed: {}", e)))?;

        let image = code
            .render::<Rgba<u8>>()
            .min_dimensions(options.size, options.size)
            .quiet_zone(options.margin > 0)
            .dark_color(parse_color(&options.dark_color)?)
            .light_color(parse_color(&options.light_color)?)
            .build();

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| CertificateError::ArtifactIssuance(format!("PNG encoding failed: {}", e)))?;

        Ok(bytes)
    }
}

fn parse_color(color: &str) -> Result<Rgba<u8>> {
    let raw = hex::decode(color.trim_start_matches('#'))
        .map_err(|_| CertificateError::ArtifactIssuance(format!("invalid color: {}", color)))?;

    if raw.len() != 3 {
        return Err(CertificateError::ArtifactIssuance(format!(
            "invalid color: {}",
            color
        )));
    }

    Ok(Rgba([raw[0], raw[1], raw[2], 0xFF]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

    #[tokio::test]
    async fn test_render_produces_png() {
        let renderer = QrRenderer;
        let bytes = renderer
            .render(
                "https://certificates.example/certificate/abc",
                &RenderOptions::default(),
            )
            .await
            .unwrap();

        assert!(bytes.starts_with(PNG_MAGIC));
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let renderer = QrRenderer;
        let options = RenderOptions::default();

        let first = renderer.render("same-input", &options).await.unwrap();
        let second = renderer.render("same-input", &options).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_invalid_color_rejected() {
        let renderer = QrRenderer;
        let options = RenderOptions {
            dark_color: "#zzzzzz".to_string(),
            ..Default::default()
        };

        let result = renderer.render("payload", &options).await;
        assert!(matches!(
            result,
            Err(CertificateError::ArtifactIssuance(_))
        ));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#000000").unwrap(), Rgba([0, 0, 0, 0xFF]));
        assert_eq!(
            parse_color("#FFFFFF").unwrap(),
            Rgba([0xFF, 0xFF, 0xFF, 0xFF])
        );
        assert!(parse_color("#FFF").is_err());
    }
}
