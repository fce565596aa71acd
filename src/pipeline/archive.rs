//! Pack the images in a directory into a deflate-compressed zip archive.
//!
//! The scan is non-recursive and picks up every regular file whose name ends
//! in one of [`IMAGE_EXTENSIONS`] (case-insensitive), including files that
//! were already there before this run. Entries are sorted by name and stored
//! under their base name only.
//!
//! The archive is assembled in a temp file beside `archive_path` and renamed
//! into place once complete, so a failed run never leaves a truncated zip at
//! the target path. The finished file has the same mode a plain
//! `File::create` would give it.

use crate::config::IMAGE_EXTENSIONS;
use crate::error::Pdf2ImgError;
use crate::output::ArchiveSummary;
use crate::progress::RasterProgressCallback;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// `true` if `name` ends with a recognised image extension, ignoring case.
pub fn is_image_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| {
        lower
            .strip_suffix(*ext)
            .is_some_and(|rest| rest.ends_with('.'))
    })
}

/// Sorted base names of the image files directly inside `dir`.
pub fn collect_images(dir: &Path) -> Result<Vec<String>, Pdf2ImgError> {
    if !dir.is_dir() {
        return Err(Pdf2ImgError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let scan_err = |e: io::Error| Pdf2ImgError::ArchiveWrite {
        path: dir.to_path_buf(),
        detail: format!("cannot read directory: {e}"),
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        let Ok(name) = entry.file_name().into_string() else {
            warn!("Skipping non-UTF-8 file name in {}", dir.display());
            continue;
        };
        if !is_image_name(&name) {
            continue;
        }
        // Follows symlinks, so a link to an image counts as a file.
        if !entry.path().is_file() {
            debug!("Skipping non-file entry {name}");
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}

/// Archive every image in `images_dir` into `archive_path`.
///
/// # Errors
/// - [`Pdf2ImgError::DirectoryNotFound`] if `images_dir` is missing.
/// - [`Pdf2ImgError::NoImagesFound`] if it holds no image; no archive is created.
/// - [`Pdf2ImgError::ArchiveWrite`] for any I/O or zip failure.
pub fn archive(
    images_dir: impl AsRef<Path>,
    archive_path: impl AsRef<Path>,
) -> Result<ArchiveSummary, Pdf2ImgError> {
    archive_with_progress(images_dir, archive_path, None)
}

/// [`archive`], reporting each entry to `progress`.
pub fn archive_with_progress(
    images_dir: impl AsRef<Path>,
    archive_path: impl AsRef<Path>,
    progress: Option<&dyn RasterProgressCallback>,
) -> Result<ArchiveSummary, Pdf2ImgError> {
    let images_dir = images_dir.as_ref();
    let archive_path = archive_path.as_ref();
    info!("Creating archive {}", archive_path.display());

    let entries = collect_images(images_dir)?;
    if entries.is_empty() {
        return Err(Pdf2ImgError::NoImagesFound {
            dir: images_dir.to_path_buf(),
        });
    }

    let write_err = |detail: String| Pdf2ImgError::ArchiveWrite {
        path: archive_path.to_path_buf(),
        detail,
    };

    let parent = match archive_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| write_err(e.to_string()))?;

    // Dropped (and deleted) on any early return below.
    let mut staging =
        staging_file(&parent, archive_path).map_err(|e| write_err(e.to_string()))?;
    write_entries(staging.as_file_mut(), images_dir, &entries, progress)
        .map_err(write_err)?;
    staging
        .persist(archive_path)
        .map_err(|e| write_err(e.error.to_string()))?;

    let byte_size = std::fs::metadata(archive_path)
        .map_err(|e| write_err(e.to_string()))?
        .len();

    info!(
        "Archive {} written: {} files, {} bytes",
        archive_path.display(),
        entries.len(),
        byte_size
    );

    Ok(ArchiveSummary {
        path: archive_path.to_path_buf(),
        entry_count: entries.len(),
        entries,
        byte_size,
    })
}

/// Temp file beside `target` with the mode a plain `File::create` would
/// give it, or the mode of the archive it is about to replace.
fn staging_file(parent: &Path, target: &Path) -> io::Result<NamedTempFile> {
    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // tempfile defaults to 0600; 0666 lets the umask decide instead.
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let staging = builder.tempfile_in(parent)?;

    if let Ok(existing) = std::fs::metadata(target) {
        if existing.is_file() {
            staging.as_file().set_permissions(existing.permissions())?;
        }
    }
    Ok(staging)
}

fn write_entries(
    file: &mut File,
    images_dir: &Path,
    entries: &[String],
    progress: Option<&dyn RasterProgressCallback>,
) -> Result<(), String> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(BufWriter::new(file));

    for name in entries {
        let src = images_dir.join(name);
        let mut input = File::open(&src).map_err(|e| format!("{}: {e}", src.display()))?;

        zip.start_file(name.as_str(), options)
            .map_err(|e| format!("{name}: {e}"))?;
        io::copy(&mut input, &mut zip).map_err(|e| format!("{name}: {e}"))?;

        debug!("Added {name}");
        if let Some(cb) = progress {
            cb.on_archive_entry(name);
        }
    }

    let mut out = zip.finish().map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())?;
    Ok(())
}
