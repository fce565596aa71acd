//! Configuration types for PDF rasterisation.
//!
//! Everything that varies between runs lives in [`RasterConfig`], built via
//! [`RasterConfigBuilder`]. Policy values that must not vary (page ceiling,
//! JPEG quality) are plain constants so they can be audited in one place.

use crate::error::Pdf2ImgError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Documents with more pages than this are rejected before anything is written.
pub const MAX_PAGES: usize = 100;

/// Fixed JPEG quality for `jpg` output.
pub const JPEG_QUALITY: u8 = 95;

/// PDF user-space units per inch; `dpi / POINTS_PER_INCH` is the render scale.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Default rendering resolution.
pub const DEFAULT_DPI: u32 = 200;

/// Extensions (lower-case, without the dot) picked up by the archiver.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Configuration for one rasterisation run.
///
/// # Example
/// ```rust
/// use edgequake_pdf2img::{OutputFormat, RasterConfig};
///
/// let config = RasterConfig::builder()
///     .output_dir("out")
///     .format(OutputFormat::Jpg)
///     .dpi(150)
///     .build()
///     .unwrap();
/// assert_eq!(config.scale(), 150.0 / 72.0);
/// ```
#[derive(Clone)]
pub struct RasterConfig {
    /// Directory receiving `page_NNN.<ext>` files. Created if missing. Default: `images`.
    pub output_dir: PathBuf,

    /// Image encoding. Default: [`OutputFormat::Png`].
    pub format: OutputFormat,

    /// Rendering resolution; must be ≥ 1. Default: 200.
    ///
    /// No upper bound is enforced. Memory use grows with the square of the DPI,
    /// so very high values on large pages are the caller's responsibility.
    pub dpi: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("images"),
            format: OutputFormat::default(),
            dpi: DEFAULT_DPI,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RasterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterConfig")
            .field("output_dir", &self.output_dir)
            .field("format", &self.format)
            .field("dpi", &self.dpi)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn RasterProgressCallback>"),
            )
            .finish()
    }
}

impl RasterConfig {
    /// Create a new builder for `RasterConfig`.
    pub fn builder() -> RasterConfigBuilder {
        RasterConfigBuilder {
            config: Self::default(),
        }
    }

    /// Uniform render scale for both axes.
    pub fn scale(&self) -> f32 {
        scale_factor(self.dpi)
    }
}

/// `dpi / 72`. Exactly `1.0` at 72 DPI and `2.0` at 144 DPI.
pub fn scale_factor(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}

/// Builder for [`RasterConfig`].
#[derive(Debug)]
pub struct RasterConfigBuilder {
    config: RasterConfig,
}

impl RasterConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RasterConfig, Pdf2ImgError> {
        if self.config.dpi == 0 {
            return Err(Pdf2ImgError::InvalidConfig(
                "DPI must be a positive integer, got 0".into(),
            ));
        }
        if self.config.output_dir.as_os_str().is_empty() {
            return Err(Pdf2ImgError::InvalidConfig(
                "Output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Encoding of the written page images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless, default compression. (default)
    #[default]
    Png,
    /// Lossy at [`JPEG_QUALITY`].
    Jpg,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Pdf2ImgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" => Ok(OutputFormat::Jpg),
            other => Err(Pdf2ImgError::InvalidConfig(format!(
                "Unsupported image format '{other}' (expected png or jpg)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli() {
        let c = RasterConfig::default();
        assert_eq!(c.output_dir, PathBuf::from("images"));
        assert_eq!(c.format, OutputFormat::Png);
        assert_eq!(c.dpi, 200);
        assert!(c.password.is_none());
    }

    #[test]
    fn scale_is_dpi_over_72() {
        assert_eq!(scale_factor(72), 1.0);
        assert_eq!(scale_factor(144), 2.0);
        assert_eq!(scale_factor(36), 0.5);
    }

    #[test]
    fn zero_dpi_rejected() {
        let err = RasterConfig::builder().dpi(0).build().unwrap_err();
        assert!(matches!(err, Pdf2ImgError::InvalidConfig(_)));
    }

    #[test]
    fn high_dpi_accepted() {
        let c = RasterConfig::builder().dpi(1200).build().unwrap();
        assert_eq!(c.dpi, 1200);
    }

    #[test]
    fn format_parsing() {
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert!("gif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Jpg.extension(), "jpg");
    }

    #[test]
    fn debug_redacts_password() {
        let c = RasterConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
