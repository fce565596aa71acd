//! CLI binary for edgequake-pdf2img.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RasterConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2img::pipeline::input::validate_input;
use edgequake_pdf2img::{
    archive_with_progress, rasterize_with, ArchiveSummary, OutputFormat, PdfEngine, RasterConfig,
    RasterOutput, RasterProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Files listed in the success summary before it is truncated.
const PREVIEW_LEN: usize = 5;

const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per written page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// The bar starts as a spinner; `on_rasterize_start` gives it a length.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(SPINNER_TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Rendering");
        self.bar.reset_eta();
    }
}

impl RasterProgressCallback for CliProgressCallback {
    fn on_rasterize_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Rasterising {total_pages} pages…"))
        ));
    }

    fn on_page_written(&self, page_num: usize, total_pages: usize, filename: &str) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(filename),
        ));
        self.bar.inc(1);
    }

    fn on_rasterize_complete(&self, written: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages rendered",
            green("✔"),
            bold(&written.to_string())
        );
    }
}

// A run that fails before `on_rasterize_start` would otherwise leave the
// spinner line above the error message.
impl Drop for CliProgressCallback {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Prints one line per archive entry.
struct ArchiveProgress;

impl RasterProgressCallback for ArchiveProgress {
    fn on_archive_entry(&self, name: &str) {
        eprintln!("  {} {}", cyan("+"), dim(name));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page to images/page_001.png, images/page_002.png, ...
  pdf2img --input document.pdf

  # JPEG at 150 DPI, then bundle the directory into images.zip
  pdf2img --input document.pdf --image-format jpg --dpi 150 --zip

  # Custom locations
  pdf2img --input scan.pdf --output-dir out/pages --zip --zip-output out/pages.zip

  # Inspect PDF metadata without rendering
  pdf2img --input document.pdf --inspect-only

LIMITS:
  Documents with more than 100 pages are rejected before anything is written.
  Scale is dpi / 72 on both axes; JPEG output uses quality 95.

ENVIRONMENT VARIABLES:
  RUST_LOG                Override the log filter (e.g. RUST_LOG=debug)
  PDFIUM_LIB_PATH         Path to an existing libpdfium, skips auto-download
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory

SETUP:
  PDFium (~30 MB) is downloaded automatically on first run unless a system
  copy is found, and cached in ~/.cache/pdf2img/pdfium-7690/.
"#;

/// Rasterise PDF pages to PNG or JPEG images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Rasterise PDF pages to PNG or JPEG images, optionally zipped",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file.
    #[arg(long)]
    input: PathBuf,

    /// Directory the page images are written to (created if missing).
    #[arg(long, default_value = "images")]
    output_dir: PathBuf,

    /// Image format: png or jpg.
    #[arg(long, value_enum, default_value = "png")]
    image_format: FormatArg,

    /// Rendering DPI; pages are scaled by dpi / 72.
    #[arg(long, default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Bundle every image in the output directory into a zip archive.
    #[arg(long)]
    zip: bool,

    /// Archive path used with --zip.
    #[arg(long, default_value = "images.zip")]
    zip_output: PathBuf,

    /// PDF user password for encrypted documents.
    #[arg(long)]
    password: Option<String>,

    /// Print PDF metadata only, no rendering.
    #[arg(long)]
    inspect_only: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpg,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpg => OutputFormat::Jpg,
        }
    }
}

/// `--json` payload.
#[derive(Serialize)]
struct RunReport<'a> {
    output: &'a RasterOutput,
    archive: Option<&'a ArchiveSummary>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", red("error:"));
            ExitCode::FAILURE
        }
    }
}

/// Suppress INFO-level library logs while the progress bar is active.
fn init_logging(cli: &Cli) {
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress(cli) {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

fn show_progress(cli: &Cli) -> bool {
    !cli.quiet && !cli.no_progress && !cli.json
}

fn run(cli: &Cli) -> Result<()> {
    // ── Validate input ──────────────────────────────────────────────────
    // Before pdfium is touched, so a bad path never triggers a download.
    let checked = validate_input(&cli.input).context("Invalid input")?;
    if !checked.has_pdf_extension && !cli.quiet {
        eprintln!(
            "{} '{}' may not be a PDF file",
            yellow("warning:"),
            cli.input.display()
        );
    }

    let engine = bind_engine(cli.quiet)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = engine
            .metadata(&checked.path, cli.password.as_deref())
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Rasterise ────────────────────────────────────────────────────────
    let config = build_config(cli)?;
    let output = rasterize_with(&engine, &checked.path, &config).context("PDF conversion failed")?;

    if !cli.quiet && !cli.json {
        println!("{} Conversion complete", green("✔"));
        println!("   Images saved to: {}", bold(&output.output_dir.display().to_string()));
        println!("   Generated files: {}", output.preview(PREVIEW_LEN));
    }

    // ── Archive ──────────────────────────────────────────────────────────
    let summary = if cli.zip {
        let progress: Option<&dyn RasterProgressCallback> = if show_progress(cli) {
            Some(&ArchiveProgress)
        } else {
            None
        };
        let summary = archive_with_progress(&output.output_dir, &cli.zip_output, progress)
            .context("ZIP archive creation failed")?;

        if !cli.quiet && !cli.json {
            println!(
                "{} ZIP archive created: {}",
                green("✔"),
                bold(&summary.path.display().to_string())
            );
            println!("   Files: {}", summary.entry_count);
            println!("   Size:  {:.2} MB", summary.size_mb());
        }
        Some(summary)
    } else {
        None
    };

    if cli.json {
        let report = RunReport {
            output: &output,
            archive: summary.as_ref(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise output")?
        );
    }

    Ok(())
}

/// Bind pdfium, showing a download bar if the library has to be fetched.
fn bind_engine(quiet: bool) -> Result<PdfEngine> {
    if quiet || pdfium_auto::is_pdfium_cached() {
        return PdfEngine::bind().context("Failed to load PDFium engine");
    }

    let dl_bar = ProgressBar::new(0);
    dl_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(SPINNER_TICKS),
    );
    dl_bar.set_prefix("PDF engine");
    dl_bar.set_message("Locating…");
    dl_bar.enable_steady_tick(Duration::from_millis(80));

    // A system pdfium is tried before any download, so the bar may
    // never move.
    let bar = dl_bar.clone();
    let result = pdfium_auto::bind_pdfium(Some(&|downloaded, total| {
        if let Some(t) = total {
            if bar.length().unwrap_or(0) != t {
                bar.set_length(t);
            }
        }
        bar.set_position(downloaded);
    }));
    dl_bar.finish_and_clear();

    let pdfium = result.context("Failed to load PDFium engine")?;
    Ok(PdfEngine::from_pdfium(pdfium))
}

/// Map CLI args to `RasterConfig`.
fn build_config(cli: &Cli) -> Result<RasterConfig> {
    let mut builder = RasterConfig::builder()
        .output_dir(&cli.output_dir)
        .format(cli.image_format.into())
        .dpi(cli.dpi);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if show_progress(cli) {
        builder = builder.progress_callback(CliProgressCallback::new_dynamic());
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_an_unstarted_callback_clears_the_spinner() {
        let cb = CliProgressCallback::new_dynamic();
        let bar = cb.bar.clone();
        assert!(!bar.is_finished());

        drop(cb);

        assert!(bar.is_finished());
    }

    #[test]
    fn completed_callback_stays_finished_on_drop() {
        let cb = CliProgressCallback::new_dynamic();
        let bar = cb.bar.clone();
        cb.on_rasterize_start(2);
        cb.on_page_written(1, 2, "page_001.png");
        cb.on_page_written(2, 2, "page_002.png");
        cb.on_rasterize_complete(2);

        drop(cb);

        assert!(bar.is_finished());
        assert_eq!(bar.position(), 2);
    }

    #[test]
    fn format_arg_maps_to_output_format() {
        assert_eq!(OutputFormat::from(FormatArg::Png), OutputFormat::Png);
        assert_eq!(OutputFormat::from(FormatArg::Jpg), OutputFormat::Jpg);
    }
}
