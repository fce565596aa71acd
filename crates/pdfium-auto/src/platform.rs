//! Release-asset naming for the `bblanchon/pdfium-binaries` builds.

use crate::{PdfiumAutoError, PDFIUM_VERSION};

/// GitHub release download root.
const RELEASE_ROOT: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Where the shared library lives for one OS/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    os_tag: &'static str,
    arch_tag: &'static str,
    /// Path of the library inside the release tarball.
    pub member: &'static str,
    /// File name the library is stored under in the cache.
    pub file_name: &'static str,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Result<Self, PdfiumAutoError> {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map an `std::env::consts` OS/arch pair to a release asset.
    pub fn for_target(os: &str, arch: &str) -> Result<Self, PdfiumAutoError> {
        let unsupported = || PdfiumAutoError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        };

        let (os_tag, member, file_name) = match os {
            "macos" => ("mac", "lib/libpdfium.dylib", "libpdfium.dylib"),
            "linux" => ("linux", "lib/libpdfium.so", "libpdfium.so"),
            "windows" => ("win", "bin/pdfium.dll", "pdfium.dll"),
            _ => return Err(unsupported()),
        };

        let arch_tag = match (os, arch) {
            (_, "x86_64") => "x64",
            (_, "aarch64") => "arm64",
            ("windows", "x86") => "x86",
            _ => return Err(unsupported()),
        };

        Ok(Self {
            os_tag,
            arch_tag,
            member,
            file_name,
        })
    }

    /// Release asset name, e.g. `pdfium-linux-x64.tgz`.
    pub fn asset_name(&self) -> String {
        format!("pdfium-{}-{}.tgz", self.os_tag, self.arch_tag)
    }

    /// Full download URL for the pinned [`PDFIUM_VERSION`].
    pub fn download_url(&self) -> String {
        format!(
            "{RELEASE_ROOT}/chromium%2F{PDFIUM_VERSION}/{}",
            self.asset_name()
        )
    }
}
