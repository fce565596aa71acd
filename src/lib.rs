//! # edgequake-pdf2img
//!
//! Rasterise every page of a PDF to PNG or JPEG files, optionally bundling
//! them into a zip archive.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    path must exist (non-.pdf names only warn)
//!  ├─ 2. Open     pdfium document; > 100 pages is rejected up front
//!  ├─ 3. Render   each page at dpi / 72, strictly in page order
//!  ├─ 4. Encode   page_001.png … (PNG) or page_001.jpg … (JPEG q95)
//!  └─ 5. Archive  optional: every image in the directory → deflate zip
//! ```
//!
//! PDF parsing and rendering are pdfium's job; the library is located or
//! downloaded on first use by the `pdfium-auto` workspace crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2img::{archive, rasterize, OutputFormat, RasterConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RasterConfig::builder()
//!         .output_dir("images")
//!         .format(OutputFormat::Jpg)
//!         .dpi(150)
//!         .build()?;
//!     let output = rasterize("document.pdf", &config)?;
//!     println!("{}", output.preview(5));
//!
//!     let summary = archive("images", "images.zip")?;
//!     eprintln!("{} files, {:.2} MB", summary.entry_count, summary.size_mb());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    scale_factor, OutputFormat, RasterConfig, RasterConfigBuilder, DEFAULT_DPI, IMAGE_EXTENSIONS,
    JPEG_QUALITY, MAX_PAGES, POINTS_PER_INCH,
};
pub use convert::{inspect, rasterize, rasterize_async, rasterize_bytes, rasterize_with};
pub use error::Pdf2ImgError;
pub use output::{ArchiveSummary, DocumentMetadata, RasterOutput};
pub use pipeline::archive::{archive, archive_with_progress};
pub use pipeline::render::{page_filename, rasterize_source};
pub use pipeline::source::{PdfEngine, PdfSource, PdfiumSource};
pub use progress::{NoopProgressCallback, ProgressCallback, RasterProgressCallback};
