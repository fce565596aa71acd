//! Error type for the edgequake-pdf2img library.
//!
//! Every failure is fatal for the run: nothing is retried and there is no
//! per-page partial-success report. Pages written before a later page fails
//! stay on disk; the archive step never starts.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-pdf2img library.
#[derive(Debug, Error)]
pub enum Pdf2ImgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// Document has more pages than [`crate::config::MAX_PAGES`].
    #[error(
        "PDF has {pages} pages, more than the {limit}-page limit.\n\
         Split it into documents of at most {limit} pages and convert each one."
    )]
    PageLimitExceeded { pages: usize, limit: usize },

    /// pdfium could not parse the file as a PDF.
    #[error("Cannot open PDF '{path}': {detail}")]
    SourceOpen { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// A page could not be rasterised or encoded.
    #[error("Page {page} could not be rasterised: {detail}")]
    Encode { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the output directory or write a page image.
    #[error("Failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Archive errors ────────────────────────────────────────────────────
    /// The directory to archive does not exist.
    #[error("Image directory not found: '{path}'")]
    DirectoryNotFound { path: PathBuf },

    /// The directory holds no `.png/.jpg/.jpeg/.gif/.bmp` files.
    #[error("No image files found in '{dir}'")]
    NoImagesFound { dir: PathBuf },

    /// Creating or filling the archive failed.
    #[error("Failed to create archive '{path}': {detail}")]
    ArchiveWrite { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium is normally downloaded automatically on first run.\n\
If the auto-download failed, you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<pdfium_auto::PdfiumAutoError> for Pdf2ImgError {
    fn from(e: pdfium_auto::PdfiumAutoError) -> Self {
        Pdf2ImgError::PdfiumBindingFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_limit_display() {
        let e = Pdf2ImgError::PageLimitExceeded {
            pages: 150,
            limit: 100,
        };
        let msg = e.to_string();
        assert!(msg.contains("150 pages"), "got: {msg}");
        assert!(msg.contains("100-page limit"), "got: {msg}");
    }

    #[test]
    fn encode_display_names_page() {
        let e = Pdf2ImgError::Encode {
            page: 7,
            detail: "bad object".into(),
        };
        assert_eq!(e.to_string(), "Page 7 could not be rasterised: bad object");
    }

    #[test]
    fn output_write_keeps_source() {
        use std::error::Error as _;
        let e = Pdf2ImgError::OutputWriteFailed {
            path: "out/page_001.png".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("page_001.png"));
        assert!(e.source().is_some());
    }

    #[test]
    fn binding_error_converts() {
        let e: Pdf2ImgError = pdfium_auto::PdfiumAutoError::Download("offline".into()).into();
        assert!(matches!(e, Pdf2ImgError::PdfiumBindingFailed(_)));
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
