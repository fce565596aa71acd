//! Progress-callback trait for per-page rasterisation events.
//!
//! Inject an [`Arc<dyn RasterProgressCallback>`] via
//! [`crate::config::RasterConfigBuilder::progress_callback`] to be told
//! about each page as it lands on disk. The CLI uses this to drive its
//! progress bar; library callers can forward events anywhere they like.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2img::{RasterConfig, RasterProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct Counter(AtomicUsize);
//!
//! impl RasterProgressCallback for Counter {
//!     fn on_page_written(&self, page_num: usize, total: usize, filename: &str) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{page_num}/{total} -> {filename}");
//!     }
//! }
//!
//! let config = RasterConfig::builder()
//!     .progress_callback(Arc::new(Counter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the rasteriser and archiver as they work.
///
/// Pages are processed strictly in order on a single thread; the
/// `Send + Sync` bound only exists so a config can be moved into
/// [`crate::convert::rasterize_async`]. All methods default to no-ops.
pub trait RasterProgressCallback: Send + Sync {
    /// Called once after the page count passed the limit check.
    fn on_rasterize_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page file has been written.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number
    /// * `total_pages`: total pages in the document
    /// * `filename`   : base name of the written file, e.g. `page_001.png`
    fn on_page_written(&self, page_num: usize, total_pages: usize, filename: &str) {
        let _ = (page_num, total_pages, filename);
    }

    /// Called once when every page has been written.
    fn on_rasterize_complete(&self, written: usize) {
        let _ = written;
    }

    /// Called for each entry added to an archive.
    fn on_archive_entry(&self, name: &str) {
        let _ = name;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RasterProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RasterConfig`].
pub type ProgressCallback = Arc<dyn RasterProgressCallback>;
