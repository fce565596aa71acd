//! Input validation: the path must exist; a non-`.pdf` extension is only
//! flagged so the caller can warn about it.
//!
//! Whether the bytes really are a PDF is left to pdfium, which reports
//! [`Pdf2ImgError::SourceOpen`] when it cannot parse them.

use crate::error::Pdf2ImgError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A validated input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedInput {
    pub path: PathBuf,
    /// `false` when the file name does not end in `.pdf` (case-insensitive).
    pub has_pdf_extension: bool,
}

/// `true` if `path` ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Check that `path` exists and note whether it looks like a PDF.
pub fn validate_input(path: impl AsRef<Path>) -> Result<CheckedInput, Pdf2ImgError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Pdf2ImgError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let has_pdf_extension = has_pdf_extension(path);
    debug!(
        "Validated input: {} (pdf extension: {})",
        path.display(),
        has_pdf_extension
    );
    Ok(CheckedInput {
        path: path.to_path_buf(),
        has_pdf_extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_input_not_found() {
        let err = validate_input("/definitely/not/a/real/file.pdf").unwrap_err();
        match err {
            Pdf2ImgError::InputNotFound { path } => {
                assert_eq!(path, PathBuf::from("/definitely/not/a/real/file.pdf"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_pdf_extension(Path::new("a.pdf")));
        assert!(has_pdf_extension(Path::new("dir/REPORT.PDF")));
        assert!(!has_pdf_extension(Path::new("notes.txt")));
        assert!(!has_pdf_extension(Path::new("pdf")));
    }

    #[test]
    fn non_pdf_extension_still_validates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scan.bin");
        std::fs::write(&file, b"%PDF-1.7").unwrap();

        let checked = validate_input(&file).unwrap();
        assert_eq!(checked.path, file);
        assert!(!checked.has_pdf_extension);
    }

    #[test]
    fn pdf_extension_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.pdf");
        std::fs::write(&file, b"%PDF-1.7").unwrap();
        assert!(validate_input(&file).unwrap().has_pdf_extension);
    }
}
