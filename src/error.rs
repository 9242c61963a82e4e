//! Error types for the edgequake-office2png library.
//!
//! Every failure is terminal for the current run: there are no retries and no
//! partial recovery. [`Office2PngError`] is the single error returned by the
//! top-level `convert*` functions. The two stages that talk to external
//! collaborators carry a nested cause so callers can tell *why* a stage failed:
//!
//! * [`ConversionFailure`] — the office suite could not produce a PDF.
//! * [`RasterFailure`] — PDFium or the file system failed while writing PNGs.
//!
//! [`Office2PngError::kind`] collapses everything onto a coarse
//! [`ErrorKind`] for callers that only need to branch on the failure class.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// All fatal errors returned by the edgequake-office2png library.
#[derive(Debug, Error)]
pub enum Office2PngError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("input not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    // ── Office-suite errors ───────────────────────────────────────────────
    /// No office-suite executable could be located.
    #[error(
        "LibreOffice/soffice not found (looked for: {searched})\n\
Install LibreOffice or point --soffice at the executable."
    )]
    ToolNotFound { searched: String },

    /// The office suite ran but did not yield a usable PDF.
    #[error("Conversion of '{input}' to PDF failed: {source}")]
    ConversionFailed {
        input: PathBuf,
        #[source]
        source: ConversionFailure,
    },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// Opening, rendering, encoding or writing pages failed.
    #[error("Rasterisation of '{pdf}' failed: {source}")]
    RasterizationFailed {
        pdf: PathBuf,
        #[source]
        source: RasterFailure,
    },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium must be available as a shared library. You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or its directory).\n\
  • Place the platform library in the working directory.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why the office suite failed to produce a PDF.
#[derive(Debug, Error)]
pub enum ConversionFailure {
    /// The per-run temporary directory could not be created.
    #[error("could not create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),

    /// The executable could not be started.
    #[error("could not start office suite: {0}")]
    Spawn(#[source] std::io::Error),

    /// The executable did not finish in time and was killed.
    #[error("office suite timed out after {secs:.1}s")]
    Timeout { secs: f64 },

    /// The executable exited unsuccessfully.
    #[error("office suite exited with {status}: {stderr}")]
    ExitStatus { status: ExitStatus, stderr: String },

    /// The executable succeeded but left no PDF behind.
    #[error("no PDF produced in '{dir}'")]
    NoPdfProduced { dir: PathBuf },

    /// The expected file was missing and several candidates exist.
    #[error("ambiguous output: {candidates} PDF files in '{dir}'")]
    AmbiguousOutput { dir: PathBuf, candidates: usize },
}

/// Why rasterising a PDF failed.
#[derive(Debug, Error)]
pub enum RasterFailure {
    #[error("could not create output directory '{path}': {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read PDF: {0}")]
    ReadPdf(#[source] std::io::Error),

    /// pdfium rejected the document (corrupt, encrypted, not a PDF).
    #[error("could not open PDF: {0}")]
    OpenPdf(String),

    #[error("page {page}: render failed: {detail}")]
    RenderPage { page: usize, detail: String },

    #[error("page {page}: PNG encoding failed: {source}")]
    EncodePage {
        page: usize,
        #[source]
        source: image::ImageError,
    },

    #[error("could not write '{path}': {source}")]
    WritePage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse failure class of an [`Office2PngError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputNotFound,
    ToolNotFound,
    ConversionFailed,
    RasterizationFailed,
    InvalidConfig,
    Internal,
}

impl Office2PngError {
    /// The failure class, with pdfium binding problems counted as rasterisation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Office2PngError::InputNotFound { .. } => ErrorKind::InputNotFound,
            Office2PngError::ToolNotFound { .. } => ErrorKind::ToolNotFound,
            Office2PngError::ConversionFailed { .. } => ErrorKind::ConversionFailed,
            Office2PngError::RasterizationFailed { .. }
            | Office2PngError::PdfiumBindingFailed(_) => ErrorKind::RasterizationFailed,
            Office2PngError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Office2PngError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_not_found_display() {
        let e = Office2PngError::InputNotFound {
            path: PathBuf::from("/tmp/missing.docx"),
        };
        assert!(e.to_string().contains("/tmp/missing.docx"));
        assert_eq!(e.kind(), ErrorKind::InputNotFound);
    }

    #[test]
    fn tool_not_found_lists_searched_names() {
        let e = Office2PngError::ToolNotFound {
            searched: "libreoffice, soffice on $PATH".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("libreoffice, soffice"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::ToolNotFound);
    }

    #[test]
    fn timeout_display() {
        let e = Office2PngError::ConversionFailed {
            input: PathBuf::from("slide.pptx"),
            source: ConversionFailure::Timeout { secs: 120.0 },
        };
        let msg = e.to_string();
        assert!(msg.contains("slide.pptx"), "got: {msg}");
        assert!(msg.contains("timed out after 120.0s"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::ConversionFailed);
    }

    #[test]
    fn ambiguous_output_display() {
        let e = ConversionFailure::AmbiguousOutput {
            dir: PathBuf::from("/tmp/office_to_png_x"),
            candidates: 2,
        };
        assert!(e.to_string().starts_with("ambiguous output: 2 PDF files"));
    }

    #[test]
    fn render_failure_keeps_page_number() {
        let e = Office2PngError::RasterizationFailed {
            pdf: PathBuf::from("report.pdf"),
            source: RasterFailure::RenderPage {
                page: 7,
                detail: "boom".into(),
            },
        };
        assert!(e.to_string().contains("page 7"));
        assert_eq!(e.kind(), ErrorKind::RasterizationFailed);
    }

    #[test]
    fn binding_failure_counts_as_rasterisation() {
        let e = Office2PngError::PdfiumBindingFailed("no library".into());
        assert_eq!(e.kind(), ErrorKind::RasterizationFailed);
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
