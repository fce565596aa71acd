//! Pipeline stages for PDF-to-image conversion.
//!
//! Each submodule implements exactly one step. Data only flows forward:
//!
//! ```text
//! input ──▶ source ──▶ render ──▶ encode ──▶ (archive)
//! (path)    (pdfium)   (loop)     (png/jpg)   (zip)
//! ```
//!
//! 1. [`input`]  : the path must exist; flag a non-`.pdf` name
//! 2. [`source`] : open the document behind the [`source::PdfSource`] trait
//! 3. [`render`] : page-limit check, then render pages in order at `dpi / 72`
//! 4. [`encode`] : PNG or JPEG (quality 95) bytes, written as `page_NNN.<ext>`
//! 5. [`archive`]: optionally zip every image in the output directory

pub mod archive;
pub mod encode;
pub mod input;
pub mod render;
pub mod source;
