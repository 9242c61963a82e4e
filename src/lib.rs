//! # edgequake-office2png
//!
//! Convert office documents (docx, pptx, xlsx, odt, …) and PDFs into one PNG
//! per page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document
//!  │
//!  ├─ 1. Input   resolve paths; `.pdf` skips step 2
//!  ├─ 2. Office  LibreOffice --headless --convert-to pdf (temp dir, timeout)
//!  ├─ 3. Render  rasterise pages via pdfium (spawn_blocking)
//!  ├─ 4. Encode  flatten to RGB, PNG → outdir/page_NNNN.png
//!  └─ 5. Cleanup remove the temp dir, success or failure
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_office2png::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().dpi(150).build()?;
//!     let output = convert("slides.pptx", "./pages", &config).await?;
//!     println!("{output}"); // ok pages=12 outdir=/abs/path/pages
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `office2png` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## External requirements
//!
//! * LibreOffice (`libreoffice` or `soffice` on `PATH`) for non-PDF input.
//! * A pdfium shared library (working directory, system path, or
//!   `PDFIUM_LIB_PATH`).

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_sync};
pub use error::{ConversionFailure, ErrorKind, Office2PngError, RasterFailure};
pub use output::{ConversionOutput, ConversionStats, PdfSource, RenderedPage};
pub use pipeline::office::{ExplicitLocator, SearchPathLocator, ToolLocator};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
