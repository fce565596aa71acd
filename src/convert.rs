//! Top-level entry points.
//!
//! [`rasterize`] is the one-call API: validate the input, bind pdfium, render
//! every page. [`rasterize_with`] and [`rasterize_bytes`] reuse a caller-owned
//! [`PdfEngine`], which matters when many documents are converted in one
//! process. [`rasterize_async`] moves the same blocking work onto tokio's
//! blocking pool for callers already inside a runtime.

use crate::config::RasterConfig;
use crate::error::Pdf2ImgError;
use crate::output::{DocumentMetadata, RasterOutput};
use crate::pipeline::{input, render, source::PdfEngine};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Rasterise every page of the PDF at `input_path`.
///
/// # Errors
/// - [`Pdf2ImgError::InputNotFound`] when the path does not exist.
/// - [`Pdf2ImgError::PdfiumBindingFailed`] when no pdfium library is available.
/// - Everything [`crate::pipeline::render::rasterize_source`] can return.
pub fn rasterize(
    input_path: impl AsRef<Path>,
    config: &RasterConfig,
) -> Result<RasterOutput, Pdf2ImgError> {
    let checked = input::validate_input(input_path)?;
    let engine = PdfEngine::bind()?;
    rasterize_with(&engine, &checked.path, config)
}

/// [`rasterize`] with an already-bound engine.
pub fn rasterize_with(
    engine: &PdfEngine,
    input_path: &Path,
    config: &RasterConfig,
) -> Result<RasterOutput, Pdf2ImgError> {
    info!("Starting rasterisation: {}", input_path.display());
    let start = Instant::now();

    let source = engine.open(input_path, config.password.as_deref())?;
    let files = render::rasterize_source(source, config)?;

    Ok(finish(files, config, start))
}

/// Rasterise a PDF held in memory.
pub fn rasterize_bytes(
    engine: &PdfEngine,
    bytes: &[u8],
    config: &RasterConfig,
) -> Result<RasterOutput, Pdf2ImgError> {
    info!("Starting rasterisation of {} in-memory bytes", bytes.len());
    let start = Instant::now();

    let source = engine.open_bytes(bytes, config.password.as_deref())?;
    let files = render::rasterize_source(source, config)?;

    Ok(finish(files, config, start))
}

/// [`rasterize`] on tokio's blocking thread pool.
///
/// pdfium is not async-aware, so the whole run happens on one blocking
/// thread; pages are still rendered one at a time.
pub async fn rasterize_async(
    input_path: impl Into<PathBuf>,
    config: &RasterConfig,
) -> Result<RasterOutput, Pdf2ImgError> {
    let path = input_path.into();
    let config = config.clone();

    tokio::task::spawn_blocking(move || rasterize(&path, &config))
        .await
        .map_err(|e| Pdf2ImgError::Internal(format!("Rasterise task panicked: {e}")))?
}

/// Read PDF metadata without rendering anything.
pub fn inspect(
    input_path: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2ImgError> {
    let checked = input::validate_input(input_path)?;
    let engine = PdfEngine::bind()?;
    engine.metadata(&checked.path, password)
}

fn finish(files: Vec<String>, config: &RasterConfig, start: Instant) -> RasterOutput {
    let output = RasterOutput {
        page_count: files.len(),
        files,
        output_dir: config.output_dir.clone(),
        format: config.format,
        dpi: config.dpi,
        scale: config.scale(),
        render_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Rasterisation complete: {} pages in {}ms",
        output.page_count, output.render_duration_ms
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_fails_before_binding_pdfium() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RasterConfig::builder()
            .output_dir(tmp.path().join("images"))
            .build()
            .unwrap();

        let err = rasterize(tmp.path().join("absent.pdf"), &config).unwrap_err();

        assert!(matches!(err, Pdf2ImgError::InputNotFound { .. }));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn inspect_missing_input() {
        let err = inspect("/definitely/not/a/real/file.pdf", None).unwrap_err();
        assert!(matches!(err, Pdf2ImgError::InputNotFound { .. }));
    }

    #[tokio::test]
    async fn async_wrapper_propagates_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RasterConfig::builder()
            .output_dir(tmp.path().join("images"))
            .build()
            .unwrap();

        let err = rasterize_async(tmp.path().join("absent.pdf"), &config)
            .await
            .unwrap_err();

        assert!(matches!(err, Pdf2ImgError::InputNotFound { .. }));
    }
}
