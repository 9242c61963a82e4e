//! Input resolution: normalise user-supplied paths and decide the branch.
//!
//! A `.pdf` input is rasterised in place and never touched otherwise. Any
//! other document is first converted by the office suite into a PDF that
//! lives in a per-run [`TempDir`]; [`ResolvedPdf`] keeps that directory alive
//! until rasterisation has finished and then removes it exactly once.

use crate::error::Office2PngError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// The PDF to rasterise, and who owns it.
#[derive(Debug)]
pub enum ResolvedPdf {
    /// Input was already a PDF. Borrowed from the user; never deleted.
    Original(PathBuf),
    /// PDF produced by the office suite inside a temporary directory.
    Converted { path: PathBuf, temp_dir: TempDir },
}

impl ResolvedPdf {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedPdf::Original(p) => p,
            ResolvedPdf::Converted { path, .. } => path,
        }
    }

    /// The temporary directory holding a converted PDF, if any.
    pub fn temp_dir(&self) -> Option<&Path> {
        match self {
            ResolvedPdf::Original(_) => None,
            ResolvedPdf::Converted { temp_dir, .. } => Some(temp_dir.path()),
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, ResolvedPdf::Converted { .. })
    }

    /// Remove the temporary directory, if one was created.
    ///
    /// Failures are logged and swallowed so they never mask the outcome of
    /// the run. An original input is left untouched.
    pub fn cleanup(self) {
        if let ResolvedPdf::Converted { temp_dir, .. } = self {
            let dir = temp_dir.path().to_path_buf();
            match temp_dir.close() {
                Ok(()) => debug!("Removed temporary directory {}", dir.display()),
                Err(e) => warn!(
                    "Failed to remove temporary directory {}: {}",
                    dir.display(),
                    e
                ),
            }
        }
    }
}

/// Expand a leading `~` and make the path absolute.
///
/// Symlinks are not resolved and the path need not exist. If the current
/// directory cannot be determined the expanded path is returned as-is.
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let expanded = expand_tilde(path.as_ref());
    std::path::absolute(&expanded).unwrap_or(expanded)
}

/// Replace a leading `~` component with the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// `true` when the extension is `pdf`, ignoring case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Normalise the input path and verify it exists.
pub fn resolve_input(input: impl AsRef<Path>) -> Result<PathBuf, Office2PngError> {
    let path = normalize_path(input);
    if !path.exists() {
        return Err(Office2PngError::InputNotFound { path });
    }
    debug!("Resolved input: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("report.pdf")));
        assert!(is_pdf(Path::new("/a/b/REPORT.PDF")));
        assert!(is_pdf(Path::new("scan.Pdf")));
        assert!(!is_pdf(Path::new("slide.pptx")));
        assert!(!is_pdf(Path::new("pdf")));
        assert!(!is_pdf(Path::new("archive.pdf.zip")));
    }

    #[test]
    fn normalize_makes_relative_paths_absolute() {
        let p = normalize_path("some/dir/file.docx");
        assert!(p.is_absolute());
        assert!(p.ends_with("some/dir/file.docx"));
    }

    #[test]
    fn normalize_keeps_absolute_paths() {
        let p = normalize_path("/tmp/x/file.docx");
        assert_eq!(p, PathBuf::from("/tmp/x/file.docx"));
    }

    #[test]
    fn normalize_expands_home() {
        let Some(home) = dirs::home_dir() else {
            println!("SKIP — no home directory");
            return;
        };
        assert_eq!(normalize_path("~/docs/a.pdf"), home.join("docs/a.pdf"));
        assert_eq!(normalize_path("~"), home);
    }

    #[test]
    fn tilde_inside_a_name_is_literal() {
        let p = normalize_path("/tmp/~backup.docx");
        assert_eq!(p, PathBuf::from("/tmp/~backup.docx"));
    }

    #[test]
    fn missing_input_is_reported() {
        let err = resolve_input("/definitely/not/a/real/file.docx").unwrap_err();
        assert!(matches!(err, Office2PngError::InputNotFound { .. }));
    }

    #[test]
    fn original_pdf_survives_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("report.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();

        let resolved = ResolvedPdf::Original(pdf.clone());
        assert!(resolved.temp_dir().is_none());
        assert!(!resolved.is_converted());
        resolved.cleanup();
        assert!(pdf.exists());
    }

    #[test]
    fn converted_pdf_cleanup_removes_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir_path = temp_dir.path().to_path_buf();
        let pdf = dir_path.join("slide.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();

        let resolved = ResolvedPdf::Converted {
            path: pdf,
            temp_dir,
        };
        assert_eq!(resolved.temp_dir(), Some(dir_path.as_path()));
        resolved.cleanup();
        assert!(!dir_path.exists());
    }
}
