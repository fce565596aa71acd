//! On-disk cache layout and environment overrides.

use crate::platform::Platform;
use crate::PDFIUM_VERSION;
use std::path::PathBuf;

/// Points at an existing pdfium library; skips the cache and the download.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Replaces the platform cache root.
pub const CACHE_DIR_ENV: &str = "PDFIUM_AUTO_CACHE_DIR";

/// Per-version cache directory for the pdfium library.
///
/// - **macOS**: `~/Library/Caches/pdf2img/pdfium-{VERSION}/`
/// - **Linux**: `~/.cache/pdf2img/pdfium-{VERSION}/`
/// - **Windows**: `%LOCALAPPDATA%\pdf2img\pdfium-{VERSION}\`
///
/// With `PDFIUM_AUTO_CACHE_DIR` set, the versioned directory is placed
/// directly under it.
pub fn pdfium_cache_dir() -> PathBuf {
    let version_dir = format!("pdfium-{PDFIUM_VERSION}");

    match std::env::var_os(CACHE_DIR_ENV) {
        Some(root) if !root.is_empty() => PathBuf::from(root).join(version_dir),
        _ => dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .unwrap_or_else(std::env::temp_dir)
            .join("pdf2img")
            .join(version_dir),
    }
}

/// `PDFIUM_LIB_PATH`, if it is set and the file exists.
pub fn env_library_path() -> Option<PathBuf> {
    std::env::var_os(LIB_PATH_ENV)
        .map(PathBuf::from)
        .filter(|p| p.is_file())
}

/// Path of the cached library for `platform`, whether or not it exists yet.
pub(crate) fn cache_slot(platform: &Platform) -> PathBuf {
    pdfium_cache_dir().join(platform.file_name)
}

/// The library path that would be used without touching the network.
pub fn cached_pdfium_path() -> Option<PathBuf> {
    env_library_path().or_else(|| {
        let platform = Platform::current().ok()?;
        Some(cache_slot(&platform)).filter(|p| p.is_file())
    })
}

/// `true` when no download is needed.
pub fn is_pdfium_cached() -> bool {
    cached_pdfium_path().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests in this module mutate process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn cache_dir_is_versioned() {
        let _g = ENV_LOCK.lock().unwrap();
        std::env::remove_var(CACHE_DIR_ENV);
        let d = pdfium_cache_dir();
        assert_eq!(d, pdfium_cache_dir());
        let s = d.to_string_lossy();
        assert!(s.contains("pdf2img"), "got: {s}");
        assert!(s.ends_with(&format!("pdfium-{PDFIUM_VERSION}")), "got: {s}");
    }

    #[test]
    fn cache_dir_override() {
        let _g = ENV_LOCK.lock().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        std::env::set_var(CACHE_DIR_ENV, tmp.path());
        let d = pdfium_cache_dir();
        std::env::remove_var(CACHE_DIR_ENV);
        assert_eq!(d, tmp.path().join(format!("pdfium-{PDFIUM_VERSION}")));
    }

    #[test]
    fn env_library_path_requires_existing_file() {
        let _g = ENV_LOCK.lock().unwrap();
        let tmp = tempfile::tempdir().unwrap();

        std::env::set_var(LIB_PATH_ENV, tmp.path().join("missing.so"));
        assert!(env_library_path().is_none());

        let lib = tmp.path().join("libpdfium.so");
        std::fs::write(&lib, b"stub").unwrap();
        std::env::set_var(LIB_PATH_ENV, &lib);
        assert_eq!(env_library_path(), Some(lib.clone()));
        assert_eq!(cached_pdfium_path(), Some(lib));

        std::env::remove_var(LIB_PATH_ENV);
    }
}
