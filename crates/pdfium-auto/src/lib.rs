//! # pdfium-auto
//!
//! Find a usable [PDFium](https://pdfium.googlesource.com/pdfium/) shared
//! library for `pdfium-render`, downloading and caching it on first use.
//!
//! ## Resolution order
//!
//! 1. `PDFIUM_LIB_PATH`, when it points at an existing file.
//! 2. The per-version cache directory (see [`pdfium_cache_dir`]).
//! 3. *(binding only)* a system-wide pdfium found by the dynamic loader.
//! 4. A download of the matching asset from
//!    [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries),
//!    unpacked into the cache directory.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pdfium_auto::{bind_pdfium, ensure_pdfium_library};
//!
//! // Bind, downloading silently if needed.
//! let pdfium = bind_pdfium(None).expect("PDFium unavailable");
//!
//! // Or fetch with progress first.
//! let path = ensure_pdfium_library(Some(&|done, total| {
//!     if let Some(t) = total {
//!         eprint!("\r{done}/{t} bytes");
//!     }
//! }))
//! .expect("download failed");
//! ```

mod cache;
mod fetch;
mod platform;

use pdfium_render::prelude::Pdfium;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

pub use cache::{
    cached_pdfium_path, env_library_path, is_pdfium_cached, pdfium_cache_dir, CACHE_DIR_ENV,
    LIB_PATH_ENV,
};
pub use platform::Platform;

/// The pdfium-binaries release tag used for downloads.
pub const PDFIUM_VERSION: &str = "7690";

/// Download progress callback: `(bytes_so_far, content_length)`.
pub type DownloadProgress<'a> = &'a dyn Fn(u64, Option<u64>);

/// Errors returned by pdfium-auto.
#[derive(Error, Debug)]
pub enum PdfiumAutoError {
    /// No release asset exists for this OS/architecture.
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// The cache directory could not be created.
    #[error("Cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    /// Network download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// gzip/tar extraction failed.
    #[error("Archive extraction failed: {0}")]
    Extract(String),

    /// The dynamic loader rejected the library.
    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

static RESOLVED: OnceLock<PathBuf> = OnceLock::new();

/// Make sure a pdfium library exists on disk and return its path.
///
/// Downloads at most once per process; later calls return the cached path.
pub fn ensure_pdfium_library(
    on_progress: Option<DownloadProgress<'_>>,
) -> Result<PathBuf, PdfiumAutoError> {
    if let Some(path) = RESOLVED.get() {
        return Ok(path.clone());
    }

    let path = match cached_pdfium_path() {
        Some(path) => path,
        None => download_to_cache(on_progress)?,
    };

    Ok(RESOLVED.get_or_init(|| path).clone())
}

/// Bind to pdfium using the resolution order in the crate docs.
pub fn bind_pdfium(on_progress: Option<DownloadProgress<'_>>) -> Result<Pdfium, PdfiumAutoError> {
    if let Some(path) = RESOLVED.get().cloned().or_else(cached_pdfium_path) {
        return bind_pdfium_from_path(&path);
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound to system pdfium");
            return Ok(Pdfium::new(bindings));
        }
        Err(e) => debug!("No system pdfium ({e}); falling back to download"),
    }

    let path = ensure_pdfium_library(on_progress)?;
    bind_pdfium_from_path(&path)
}

/// Bind to the library at `path` without consulting the cache.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, PdfiumAutoError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| PdfiumAutoError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn download_to_cache(
    on_progress: Option<DownloadProgress<'_>>,
) -> Result<PathBuf, PdfiumAutoError> {
    if let Some(p) = std::env::var_os(LIB_PATH_ENV) {
        warn!(
            "{LIB_PATH_ENV}='{}' does not exist; downloading instead",
            Path::new(&p).display()
        );
    }

    let platform = Platform::current()?;
    let dir = pdfium_cache_dir();
    std::fs::create_dir_all(&dir).map_err(PdfiumAutoError::CacheDir)?;

    let tgz = fetch::download(&platform.download_url(), on_progress)?;
    let dest = cache::cache_slot(&platform);
    fetch::unpack_member(&tgz, platform.member, &dest)?;

    Ok(dest)
}
