//! Result types returned by the rasteriser, the archiver and `inspect`.

use crate::config::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of a successful rasterisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterOutput {
    /// Base names of the written files, in page order.
    pub files: Vec<String>,
    /// Directory the files were written to.
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub dpi: u32,
    /// Render scale applied on both axes (`dpi / 72`).
    pub scale: f32,
    /// Pages in the source document (equals `files.len()`).
    pub page_count: usize,
    pub render_duration_ms: u64,
}

impl RasterOutput {
    /// First `n` file names joined with `", "`, with `...` appended when
    /// more files exist.
    pub fn preview(&self, n: usize) -> String {
        let shown = self.files.iter().take(n).cloned().collect::<Vec<_>>().join(", ");
        if self.files.len() > n {
            format!("{shown}...")
        } else {
            shown
        }
    }
}

/// Outcome of a successful archive run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveSummary {
    /// Archive file written.
    pub path: PathBuf,
    /// Entry names in archive order (sorted).
    pub entries: Vec<String>,
    pub entry_count: usize,
    /// Size of the finished archive on disk.
    pub byte_size: u64,
}

impl ArchiveSummary {
    /// Archive size in MiB.
    pub fn size_mb(&self) -> f64 {
        self.byte_size as f64 / (1024.0 * 1024.0)
    }
}

/// PDF document metadata, read without rendering any page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_with(n: usize) -> RasterOutput {
        RasterOutput {
            files: (1..=n).map(|i| format!("page_{i:03}.png")).collect(),
            output_dir: "images".into(),
            format: OutputFormat::Png,
            dpi: 200,
            scale: 200.0 / 72.0,
            page_count: n,
            render_duration_ms: 0,
        }
    }

    #[test]
    fn preview_short_list_has_no_ellipsis() {
        assert_eq!(output_with(2).preview(5), "page_001.png, page_002.png");
        assert_eq!(output_with(5).preview(5).matches(", ").count(), 4);
        assert!(!output_with(5).preview(5).ends_with("..."));
    }

    #[test]
    fn preview_truncates_after_five() {
        let p = output_with(7).preview(5);
        assert!(p.starts_with("page_001.png, "));
        assert!(p.ends_with("page_005.png..."), "got: {p}");
        assert!(!p.contains("page_006"));
    }

    #[test]
    fn size_mb() {
        let s = ArchiveSummary {
            path: "images.zip".into(),
            entries: vec![],
            entry_count: 0,
            byte_size: 3 * 1024 * 1024 / 2,
        };
        assert_eq!(s.size_mb(), 1.5);
    }

    #[test]
    fn output_serialises_format_lowercase() {
        let json = serde_json::to_string(&output_with(1)).unwrap();
        assert!(json.contains("\"format\":\"png\""), "got: {json}");
    }
}
