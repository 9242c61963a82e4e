//! Conversion entry points: one input document → a directory of page PNGs.
//!
//! The run is strictly sequential:
//!
//! ```text
//! Start ─┬─ .pdf ──────────────────────┬─▶ Rasterize ─▶ Cleanup ─▶ Done | Failed
//!        └─ other ─▶ office suite ─────┘
//! ```
//!
//! The temporary directory created by the office-suite stage is removed after
//! rasterisation whether it succeeded or not. Cleanup problems are logged and
//! never replace the error that ended the run.

use crate::config::ConversionConfig;
use crate::error::Office2PngError;
use crate::output::{ConversionOutput, ConversionStats, PdfSource};
use crate::pipeline::input::{self, ResolvedPdf};
use crate::pipeline::{office, render};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert an office document or PDF into `page_NNNN.png` files in `outdir`.
///
/// # Arguments
/// * `document` — path to the input; `~` is expanded, relative paths are
///   resolved against the current directory
/// * `outdir`   — output directory, created if absent and never cleared
/// * `config`   — conversion configuration
///
/// # Errors
/// * [`Office2PngError::InputNotFound`] — `document` does not exist
/// * [`Office2PngError::ToolNotFound`] — no office suite for a non-PDF input
/// * [`Office2PngError::ConversionFailed`] — the office suite failed
/// * [`Office2PngError::RasterizationFailed`] — the PDF could not be rendered
///   or a PNG could not be written; pages already written stay on disk
pub async fn convert(
    document: impl AsRef<Path>,
    outdir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Office2PngError> {
    let total_start = Instant::now();

    // ── Step 1: Resolve paths ────────────────────────────────────────────
    let input_path = input::resolve_input(document)?;
    let outdir = input::normalize_path(outdir);
    info!(
        "Starting conversion: {} → {}",
        input_path.display(),
        outdir.display()
    );

    // ── Step 2: Obtain a PDF ─────────────────────────────────────────────
    let (resolved, source, conversion_duration_ms) = if input::is_pdf(&input_path) {
        debug!("Input is already a PDF; skipping office conversion");
        (ResolvedPdf::Original(input_path.clone()), PdfSource::Original, 0)
    } else {
        if let Some(ref cb) = config.progress_callback {
            cb.on_office_conversion_start(&input_path);
        }
        let convert_start = Instant::now();
        let resolved = office::office_to_pdf(&input_path, config).await?;
        let elapsed_ms = convert_start.elapsed().as_millis() as u64;
        if let Some(ref cb) = config.progress_callback {
            cb.on_office_conversion_complete(resolved.path(), elapsed_ms);
        }
        (resolved, PdfSource::Converted, elapsed_ms)
    };

    // ── Step 3: Rasterise ────────────────────────────────────────────────
    let render_start = Instant::now();
    let rendered = render::render_pages(resolved.path(), &outdir, config).await;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    // ── Step 4: Cleanup, regardless of the render outcome ────────────────
    resolved.cleanup();
    let pages = rendered?;

    let stats = ConversionStats {
        conversion_duration_ms,
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {} pages in {}ms",
        pages.len(),
        stats.total_duration_ms
    );

    Ok(ConversionOutput {
        input: input_path,
        outdir,
        page_count: pages.len(),
        source,
        pages,
        stats,
    })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    document: impl AsRef<Path>,
    outdir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Office2PngError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Office2PngError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(document, outdir, config))
}
