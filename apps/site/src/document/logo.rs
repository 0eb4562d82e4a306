//! Loading the organisation logo drawn in the document header.
//!
//! A logo that cannot be fetched or decoded aborts document generation; there is no
//! fallback drawing.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use printpdf::image_crate::{self, DynamicImage, Rgb, RgbImage};
use tracing::debug;

use crate::document::compose::LogoDims;
use crate::document::DocumentError;

/// Where the logo bytes come from. Carried by the renderer as `Arc<dyn LogoSource>`.
#[async_trait]
pub trait LogoSource: Send + Sync {
    /// URL or path reported in errors.
    fn location(&self) -> &str;

    async fn load(&self) -> Result<Bytes, DocumentError>;
}

/// Fetches the logo over HTTP(S).
pub struct HttpLogoSource {
    client: reqwest::Client,
    url: String,
}

impl HttpLogoSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl LogoSource for HttpLogoSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn load(&self) -> Result<Bytes, DocumentError> {
        let load_error = |reason: String| DocumentError::LogoLoad {
            url: self.url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| load_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(load_error(format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| load_error(e.to_string()))?;
        debug!(url = %self.url, size = bytes.len(), "logo fetched");
        Ok(bytes)
    }
}

/// Reads the logo from the local filesystem.
pub struct FileLogoSource {
    path: PathBuf,
    location: String,
}

impl FileLogoSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

#[async_trait]
impl LogoSource for FileLogoSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn load(&self) -> Result<Bytes, DocumentError> {
        tokio::fs::read(&self.path)
            .await
            .map(Bytes::from)
            .map_err(|e| DocumentError::LogoLoad {
                url: self.location.clone(),
                reason: e.to_string(),
            })
    }
}

/// Logo bytes already in memory, e.g. compiled into the binary.
pub struct StaticLogoSource {
    location: String,
    bytes: Bytes,
}

impl StaticLogoSource {
    pub fn new(location: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            location: location.into(),
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl LogoSource for StaticLogoSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn load(&self) -> Result<Bytes, DocumentError> {
        Ok(self.bytes.clone())
    }
}

/// Picks the source matching a configured location: `http(s)://` URLs are fetched,
/// anything else is read as a file path.
pub fn logo_source_for(location: &str) -> Arc<dyn LogoSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpLogoSource::new(location))
    } else {
        Arc::new(FileLogoSource::new(location))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Decoding
// ────────────────────────────────────────────────────────────────────────────

pub struct LogoImage {
    pub image: DynamicImage,
    pub dims: LogoDims,
}

/// Decodes the logo and flattens any transparency onto white, since the PDF page
/// background is white and the embedded image carries no alpha channel.
pub fn decode_logo(bytes: &[u8], location: &str) -> Result<LogoImage, DocumentError> {
    let decoded = image_crate::load_from_memory(bytes).map_err(|e| DocumentError::LogoDecode {
        url: location.to_string(),
        reason: e.to_string(),
    })?;

    let rgba = decoded.to_rgba8();
    let (width_px, height_px) = rgba.dimensions();
    let flattened = RgbImage::from_fn(width_px, height_px, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Rgb([blend(r), blend(g), blend(b)])
    });

    Ok(LogoImage {
        image: DynamicImage::ImageRgb8(flattened),
        dims: LogoDims {
            width_px,
            height_px,
        },
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use printpdf::image_crate::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// A small PNG with a transparent left half.
    pub(crate) fn sample_png() -> Vec<u8> {
        let image = RgbaImage::from_fn(8, 2, |x, _| {
            if x < 4 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([10, 40, 90, 255])
            }
        });
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_reports_dimensions_and_flattens_alpha() {
        let logo = decode_logo(&sample_png(), "memory://logo.png").unwrap();
        assert_eq!(
            logo.dims,
            LogoDims {
                width_px: 8,
                height_px: 2
            }
        );
        let rgb = logo.image.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(7, 1).0, [10, 40, 90]);
    }

    #[test]
    fn test_decode_garbage_names_location() {
        let err = decode_logo(b"not an image", "https://example.test/logo.png")
            .err()
            .unwrap();
        assert!(err.to_string().contains("https://example.test/logo.png"));
    }

    #[tokio::test]
    async fn test_missing_file_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.png");
        let source = FileLogoSource::new(&path);
        let err = source.load().await.unwrap_err();
        assert!(err.to_string().contains("absent.png"));
    }

    #[tokio::test]
    async fn test_file_source_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, sample_png()).unwrap();
        let bytes = FileLogoSource::new(&path).load().await.unwrap();
        assert_eq!(bytes.as_ref(), sample_png().as_slice());
    }

    #[test]
    fn test_source_selection_by_scheme() {
        assert_eq!(
            logo_source_for("https://cdn.example.test/logo.png").location(),
            "https://cdn.example.test/logo.png"
        );
        assert_eq!(
            logo_source_for("assets/logo.png").location(),
            "assets/logo.png"
        );
    }
}
