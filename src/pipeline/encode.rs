//! Image encoding: `DynamicImage` → PNG or JPEG bytes → file.
//!
//! PNG uses the encoder's default compression. JPEG is always written at
//! [`JPEG_QUALITY`] from an RGB copy of the page, since JPEG has no alpha.

use crate::config::{OutputFormat, JPEG_QUALITY};
use crate::error::Pdf2ImgError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Encode a rendered page in `format`.
pub fn encode_page(img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        }
        OutputFormat::Jpg => {
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(&rgb)?;
        }
    }
    debug!("Encoded page → {} bytes {}", buf.len(), format);
    Ok(buf)
}

/// Encode page `page_num` (1-based) and write it to `path`.
pub fn write_page(
    img: &DynamicImage,
    format: OutputFormat,
    page_num: usize,
    path: &Path,
) -> Result<(), Pdf2ImgError> {
    let bytes = encode_page(img, format).map_err(|e| Pdf2ImgError::Encode {
        page: page_num,
        detail: format!("image encoding failed: {e}"),
    })?;

    std::fs::write(path, bytes).map_err(|e| Pdf2ImgError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
