//! PDF sources: the [`PdfSource`] seam and its pdfium implementation.
//!
//! The page loop in [`super::render`] only needs a page count and a way to
//! turn one page into pixels. Keeping that behind a trait lets the loop be
//! tested without a pdfium library and keeps pdfium types out of the rest
//! of the crate.
//!
//! A `PdfiumSource` owns its `PdfDocument`; dropping the source closes the
//! document. `PdfEngine` owns the bound library and must outlive every
//! source it opens, which the borrow checker enforces.

use crate::error::Pdf2ImgError;
use crate::output::DocumentMetadata;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Anything that can be rasterised page by page.
pub trait PdfSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Render the 0-based page `index` at `scale` (applied to both axes).
    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2ImgError>;
}

/// A bound pdfium library.
pub struct PdfEngine {
    pdfium: Pdfium,
}

impl PdfEngine {
    /// Bind pdfium, downloading it on first use if necessary.
    pub fn bind() -> Result<Self, Pdf2ImgError> {
        let pdfium = pdfium_auto::bind_pdfium(None)?;
        Ok(Self { pdfium })
    }

    /// Wrap an already-bound pdfium instance.
    pub fn from_pdfium(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// The underlying pdfium handle.
    pub fn pdfium(&self) -> &Pdfium {
        &self.pdfium
    }

    /// Open a PDF file.
    pub fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<PdfiumSource<'a>, Pdf2ImgError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| open_error(path, password, e))?;
        Ok(PdfiumSource::new(document))
    }

    /// Open a PDF held in memory.
    pub fn open_bytes<'a>(
        &'a self,
        bytes: &'a [u8],
        password: Option<&'a str>,
    ) -> Result<PdfiumSource<'a>, Pdf2ImgError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, password)
            .map_err(|e| open_error(Path::new("<memory>"), password, e))?;
        Ok(PdfiumSource::new(document))
    }

    /// Read document metadata without rendering.
    pub fn metadata(
        &self,
        path: &Path,
        password: Option<&str>,
    ) -> Result<DocumentMetadata, Pdf2ImgError> {
        let source = self.open(path, password)?;
        let document = &source.document;
        let metadata = document.metadata();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata
                .get(tag)
                .map(|t| t.value().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(DocumentMetadata {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
            modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
            page_count: source.page_count(),
            pdf_version: format!("{:?}", document.version()),
        })
    }
}

/// Map a pdfium load failure, singling out password problems.
fn open_error(path: &Path, password: Option<&str>, e: PdfiumError) -> Pdf2ImgError {
    let detail = format!("{e:?}");
    let path = path.to_path_buf();
    if detail.to_ascii_lowercase().contains("password") {
        if password.is_some() {
            Pdf2ImgError::WrongPassword { path }
        } else {
            Pdf2ImgError::PasswordRequired { path }
        }
    } else {
        Pdf2ImgError::SourceOpen { path, detail }
    }
}

/// An open pdfium document.
pub struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSource<'a> {
    fn new(document: PdfDocument<'a>) -> Self {
        info!("PDF loaded: {} pages", document.pages().len());
        Self { document }
    }

    /// The wrapped pdfium document.
    pub fn document(&self) -> &PdfDocument<'a> {
        &self.document
    }
}

impl PdfSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2ImgError> {
        let encode_err = |e: PdfiumError| Pdf2ImgError::Encode {
            page: index + 1,
            detail: format!("{e:?}"),
        };

        let page = self.document.pages().get(index as u16).map_err(encode_err)?;
        let bitmap = page
            .render_with_config(&PdfRenderConfig::new().scale_page_by_factor(scale))
            .map_err(encode_err)?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

impl Drop for PdfiumSource<'_> {
    fn drop(&mut self) {
        debug!("Closing PDF document");
    }
}
