//! Download a release tarball and unpack the shared library from it.

use crate::{DownloadProgress, PdfiumAutoError};
use flate2::read::GzDecoder;
use std::io::{self, Read};
use std::path::Path;
use tar::Archive;
use tracing::{debug, info};

/// Forwards every read to the progress callback.
struct ProgressReader<'a, R> {
    inner: R,
    read: u64,
    total: Option<u64>,
    on_progress: Option<DownloadProgress<'a>>,
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n as u64;
        if let Some(cb) = self.on_progress {
            cb(self.read, self.total);
        }
        Ok(n)
    }
}

/// GET `url` into memory.
pub(crate) fn download(
    url: &str,
    on_progress: Option<DownloadProgress<'_>>,
) -> Result<Vec<u8>, PdfiumAutoError> {
    info!("Downloading pdfium from {url}");

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| PdfiumAutoError::Download(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| PdfiumAutoError::Download(format!("GET {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PdfiumAutoError::Download(format!("HTTP {status} for {url}")));
    }

    let total = response.content_length();
    let mut reader = ProgressReader {
        inner: response,
        read: 0,
        total,
        on_progress,
    };

    let mut buf = Vec::with_capacity(total.unwrap_or(32 << 20) as usize);
    reader
        .read_to_end(&mut buf)
        .map_err(|e| PdfiumAutoError::Download(format!("read error: {e}")))?;

    debug!("Downloaded {} bytes", buf.len());
    Ok(buf)
}

/// Unpack `member` from a gzipped tarball to `dest`.
///
/// The file is first unpacked next to `dest` and renamed into place, so a
/// concurrent reader never sees a half-written library.
pub(crate) fn unpack_member(
    tgz: &[u8],
    member: &str,
    dest: &Path,
) -> Result<(), PdfiumAutoError> {
    let extract = |e: io::Error| PdfiumAutoError::Extract(e.to_string());

    let mut archive = Archive::new(GzDecoder::new(tgz));
    let mut entries = archive.entries().map_err(extract)?;

    let mut entry = loop {
        let Some(entry) = entries.next() else {
            return Err(PdfiumAutoError::Extract(format!(
                "'{member}' not found in archive"
            )));
        };
        let entry = entry.map_err(extract)?;
        if entry.path().map_err(extract)?.to_string_lossy() == member {
            break entry;
        }
    };

    let staging = dest.with_extension("partial");
    entry.unpack(&staging).map_err(extract)?;
    std::fs::rename(&staging, dest).map_err(extract)?;

    debug!("Unpacked {member} → {}", dest.display());
    Ok(())
}
