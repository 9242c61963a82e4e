//! CLI binary for edgequake-office2png.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_office2png::{convert, ConversionConfig, ConversionProgressCallback, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while LibreOffice runs, then a
/// page bar while pdfium renders.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Start as a spinner; `on_render_start` turns it into a bar once the
    /// page count is known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Resolving input…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_office_conversion_start(&self, input: &Path) {
        self.bar.set_prefix("LibreOffice");
        self.bar.set_message(format!(
            "converting {} to PDF…",
            input.file_name().unwrap_or_default().to_string_lossy()
        ));
    }

    fn on_office_conversion_complete(&self, pdf: &Path, elapsed_ms: u64) {
        self.bar.println(format!(
            "{} {}  {}",
            cyan("◆"),
            bold(&format!("PDF ready: {}", pdf.display())),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.set_prefix("Opening");
        self.bar.set_message("loading PDF…");
    }

    fn on_render_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
        self.bar.reset_eta();
    }

    fn on_page_written(&self, page_num: usize, _total_pages: usize, path: &Path) {
        self.bar.set_message(format!("page {page_num}"));
        self.bar.set_position(page_num as u64);
        tracing::debug!("wrote {}", path.display());
    }

    fn on_render_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages rendered",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Slides to PNG at 150 DPI
  office2png --input slides.pptx --outdir ./pages --dpi 150

  # A PDF is rendered directly, LibreOffice is not needed
  office2png --input report.pdf --outdir ./report-pages

  # Give LibreOffice more time for a large spreadsheet
  office2png --input budget.xlsx --outdir ./budget --timeout-s 600

  # Machine-readable result
  office2png --input memo.docx --outdir ./memo --json

OUTPUT:
  Pages are written as page_0001.png, page_0002.png, … (RGB, no alpha).
  The output directory is created if needed and never cleared.
  On success a single line is printed: ok pages=<N> outdir=<path>

ENVIRONMENT VARIABLES:
  OFFICE2PNG_SOFFICE      LibreOffice executable (default: libreoffice/soffice on PATH)
  PDFIUM_LIB_PATH         pdfium library file or directory
  OFFICE2PNG_TEMP_DIR     Parent directory for the per-run temp directory
  RUST_LOG                Override the log filter (e.g. edgequake_office2png=debug)
"#;

/// Convert office documents and PDFs to per-page PNG images.
#[derive(Parser, Debug)]
#[command(
    name = "office2png",
    version,
    about = "Convert office documents and PDFs to per-page PNG images",
    long_about = "Convert an office document (docx, pptx, xlsx, odt, …) or a PDF into one PNG \
per page. Non-PDF input is converted to PDF with LibreOffice in headless mode; pages are \
rendered with pdfium.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file (docx, pptx, xlsx, pdf, …).
    #[arg(long)]
    input: PathBuf,

    /// Output directory for page_XXXX.png files.
    #[arg(long)]
    outdir: PathBuf,

    /// Render DPI.
    #[arg(long, env = "OFFICE2PNG_DPI", default_value_t = 200)]
    dpi: u32,

    /// LibreOffice conversion timeout in seconds.
    #[arg(long = "timeout-s", env = "OFFICE2PNG_TIMEOUT_S", default_value_t = 120,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout_s: u64,

    /// LibreOffice executable to use instead of searching PATH.
    #[arg(long, env = "OFFICE2PNG_SOFFICE")]
    soffice: Option<PathBuf>,

    /// pdfium shared library, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Parent directory for the temporary conversion directory.
    #[arg(long, env = "OFFICE2PNG_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Print the result as JSON instead of the summary line.
    #[arg(long, env = "OFFICE2PNG_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "OFFICE2PNG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OFFICE2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "OFFICE2PNG_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress = show_progress.then(CliProgressCallback::new_dynamic);
    let progress_cb: Option<ProgressCallback> = progress
        .clone()
        .map(|cb| cb as Arc<dyn ConversionProgressCallback>);

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let result = convert(&cli.input, &cli.outdir, &config).await;

    // Zero-page documents and failures never reach `on_render_complete`.
    if let Some(cb) = progress {
        cb.bar.finish_and_clear();
    }
    let output = result.context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        println!("{output}");
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .dpi(cli.dpi)
        .timeout_secs(cli.timeout_s);

    if let Some(ref soffice) = cli.soffice {
        builder = builder.office_binary(soffice);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }
    if let Some(ref dir) = cli.temp_dir {
        builder = builder.temp_root(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["office2png", "--input", "a.docx", "--outdir", "out"]).unwrap();
        assert_eq!(cli.dpi, 200);
        assert_eq!(cli.timeout_s, 120);
        assert!(!cli.json);

        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.dpi, 200);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn cli_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "office2png",
            "--input",
            "slide.pptx",
            "--outdir",
            "pages",
            "--dpi",
            "150",
            "--timeout-s",
            "30",
            "--soffice",
            "/opt/lo/soffice",
            "--temp-dir",
            "/var/tmp",
        ])
        .unwrap();

        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.dpi, 150);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.tool_locator.describe(), "/opt/lo/soffice");
        assert_eq!(config.temp_root, Some(PathBuf::from("/var/tmp")));
    }

    #[test]
    fn input_and_outdir_are_required() {
        assert!(Cli::try_parse_from(["office2png", "--input", "a.docx"]).is_err());
        assert!(Cli::try_parse_from(["office2png", "--outdir", "out"]).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected_by_parser() {
        let res = Cli::try_parse_from([
            "office2png",
            "--input",
            "a.docx",
            "--outdir",
            "out",
            "--timeout-s",
            "0",
        ]);
        assert!(res.is_err());
    }
}
