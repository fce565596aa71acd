//! The page loop: render each page at `dpi / 72` and write `page_NNN.<ext>`.
//!
//! The source is taken by value, so the document is released when this
//! function returns, on success and on every error path alike.

use super::encode;
use super::source::PdfSource;
use crate::config::{OutputFormat, RasterConfig, MAX_PAGES};
use crate::error::Pdf2ImgError;
use tracing::info;

/// `page_{page_num:03}.{ext}` for a 1-based page number.
pub fn page_filename(page_num: usize, format: OutputFormat) -> String {
    format!("page_{page_num:03}.{}", format.extension())
}

/// Rasterise every page of `source` into `config.output_dir`.
///
/// # Returns
/// The written file names (not paths), in page order.
///
/// # Errors
/// - [`Pdf2ImgError::PageLimitExceeded`] when the document has more than
///   [`MAX_PAGES`] pages; nothing is written and the output directory is
///   not created.
/// - [`Pdf2ImgError::Encode`] when a page cannot be rendered or encoded.
///   Pages already written stay on disk.
/// - [`Pdf2ImgError::OutputWriteFailed`] for directory or file I/O errors.
pub fn rasterize_source<S: PdfSource>(
    source: S,
    config: &RasterConfig,
) -> Result<Vec<String>, Pdf2ImgError> {
    let total_pages = source.page_count();
    if total_pages > MAX_PAGES {
        return Err(Pdf2ImgError::PageLimitExceeded {
            pages: total_pages,
            limit: MAX_PAGES,
        });
    }

    std::fs::create_dir_all(&config.output_dir).map_err(|e| Pdf2ImgError::OutputWriteFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let scale = config.scale();
    info!(
        "Rasterising {} pages at {} DPI (scale {:.3})",
        total_pages, config.dpi, scale
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_rasterize_start(total_pages);
    }

    let mut files = Vec::with_capacity(total_pages);
    for index in 0..total_pages {
        let page_num = index + 1;
        let image = source.render_page(index, scale)?;

        let filename = page_filename(page_num, config.format);
        let path = config.output_dir.join(&filename);
        encode::write_page(&image, config.format, page_num, &path)?;

        info!("Converted page {}/{} -> {}", page_num, total_pages, filename);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_written(page_num, total_pages, &filename);
        }
        files.push(filename);
    }

    info!("Wrote {} images to {}", files.len(), config.output_dir.display());
    if let Some(ref cb) = config.progress_callback {
        cb.on_rasterize_complete(files.len());
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RasterProgressCallback;
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    /// In-memory document: every page is a 4×5 pt white rectangle.
    struct FakeSource {
        pages: usize,
        fail_at: Option<usize>,
        scales: Rc<RefCell<Vec<f32>>>,
        released: Rc<RefCell<bool>>,
    }

    impl FakeSource {
        fn new(pages: usize) -> Self {
            Self {
                pages,
                fail_at: None,
                scales: Rc::default(),
                released: Rc::default(),
            }
        }
    }

    impl PdfSource for FakeSource {
        fn page_count(&self) -> usize {
            self.pages
        }

        fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2ImgError> {
            if self.fail_at == Some(index) {
                return Err(Pdf2ImgError::Encode {
                    page: index + 1,
                    detail: "corrupt page object".into(),
                });
            }
            self.scales.borrow_mut().push(scale);
            let w = (4.0 * scale).round() as u32;
            let h = (5.0 * scale).round() as u32;
            Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                w,
                h,
                Rgb([255, 255, 255]),
            )))
        }
    }

    impl Drop for FakeSource {
        fn drop(&mut self) {
            *self.released.borrow_mut() = true;
        }
    }

    fn config_in(dir: &std::path::Path, format: OutputFormat, dpi: u32) -> RasterConfig {
        RasterConfig::builder()
            .output_dir(dir.join("images"))
            .format(format)
            .dpi(dpi)
            .build()
            .unwrap()
    }

    #[test]
    fn filenames_are_one_based_and_padded() {
        assert_eq!(page_filename(1, OutputFormat::Png), "page_001.png");
        assert_eq!(page_filename(42, OutputFormat::Jpg), "page_042.jpg");
        assert_eq!(page_filename(100, OutputFormat::Png), "page_100.png");
    }

    #[test]
    fn writes_one_file_per_page_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), OutputFormat::Jpg, 150);

        let files = rasterize_source(FakeSource::new(3), &config).unwrap();

        assert_eq!(files, vec!["page_001.jpg", "page_002.jpg", "page_003.jpg"]);
        let mut on_disk: Vec<String> = std::fs::read_dir(&config.output_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        on_disk.sort();
        assert_eq!(on_disk, files);
    }

    #[test]
    fn exactly_max_pages_is_allowed() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), OutputFormat::Png, 72);

        let files = rasterize_source(FakeSource::new(MAX_PAGES), &config).unwrap();

        assert_eq!(files.len(), MAX_PAGES);
        assert_eq!(files.last().unwrap(), "page_100.png");
    }

    #[test]
    fn over_limit_writes_nothing_and_releases_source() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), OutputFormat::Png, 200);
        let source = FakeSource::new(150);
        let released = Rc::clone(&source.released);
        let scales = Rc::clone(&source.scales);

        let err = rasterize_source(source, &config).unwrap_err();

        assert!(matches!(
            err,
            Pdf2ImgError::PageLimitExceeded {
                pages: 150,
                limit: 100
            }
        ));
        assert!(*released.borrow(), "document must be released");
        assert!(scales.borrow().is_empty(), "no page may be rendered");
        assert!(!config.output_dir.exists(), "output dir must not be created");
    }

    #[test]
    fn render_failure_keeps_earlier_pages_and_releases_source() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), OutputFormat::Png, 72);
        let mut source = FakeSource::new(4);
        source.fail_at = Some(2);
        let released = Rc::clone(&source.released);

        let err = rasterize_source(source, &config).unwrap_err();

        assert!(matches!(err, Pdf2ImgError::Encode { page: 3, .. }));
        assert!(*released.borrow());
        assert!(config.output_dir.join("page_001.png").is_file());
        assert!(config.output_dir.join("page_002.png").is_file());
        assert!(!config.output_dir.join("page_003.png").exists());
    }

    #[test]
    fn scale_follows_dpi() {
        let tmp = tempfile::tempdir().unwrap();
        let source = FakeSource::new(2);
        let scales = Rc::clone(&source.scales);

        rasterize_source(source, &config_in(tmp.path(), OutputFormat::Png, 144)).unwrap();

        assert_eq!(*scales.borrow(), vec![2.0, 2.0]);
        let img = image::open(tmp.path().join("images/page_001.png")).unwrap();
        assert_eq!(img.dimensions(), (8, 10));
    }

    #[test]
    fn existing_output_dir_is_fine() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), OutputFormat::Png, 72);
        std::fs::create_dir_all(&config.output_dir).unwrap();
        std::fs::write(config.output_dir.join("keep.txt"), b"x").unwrap();

        rasterize_source(FakeSource::new(1), &config).unwrap();

        assert!(config.output_dir.join("keep.txt").is_file());
        assert!(config.output_dir.join("page_001.png").is_file());
    }

    #[test]
    fn nested_output_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RasterConfig::builder()
            .output_dir(tmp.path().join("a/b/c"))
            .dpi(72)
            .build()
            .unwrap();

        rasterize_source(FakeSource::new(1), &config).unwrap();
        assert!(tmp.path().join("a/b/c/page_001.png").is_file());
    }

    #[test]
    fn progress_events_fire_per_page() {
        #[derive(Default)]
        struct Log(Mutex<Vec<String>>);
        impl RasterProgressCallback for Log {
            fn on_rasterize_start(&self, total: usize) {
                self.0.lock().unwrap().push(format!("start {total}"));
            }
            fn on_page_written(&self, n: usize, total: usize, filename: &str) {
                self.0.lock().unwrap().push(format!("{n}/{total} {filename}"));
            }
            fn on_rasterize_complete(&self, written: usize) {
                self.0.lock().unwrap().push(format!("done {written}"));
            }
        }

        let tmp = tempfile::tempdir().unwrap();
        let log = Arc::new(Log::default());
        let config = RasterConfig::builder()
            .output_dir(tmp.path())
            .dpi(72)
            .progress_callback(log.clone())
            .build()
            .unwrap();

        rasterize_source(FakeSource::new(2), &config).unwrap();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec!["start 2", "1/2 page_001.png", "2/2 page_002.png", "done 2"]
        );
    }
}
