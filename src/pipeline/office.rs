//! Office-suite conversion: any document LibreOffice can open → PDF.
//!
//! LibreOffice is driven in headless mode and writes `<stem>.pdf` into a
//! fresh temporary directory. The run is bounded by the configured timeout;
//! when it elapses the child's whole process group is killed (the `soffice`
//! launcher forks `soffice.bin`) and the directory is removed before the
//! error is returned.
//!
//! Locating the executable goes through [`ToolLocator`] so tests and callers
//! can point the pipeline at a specific binary instead of searching `PATH`.

use crate::config::ConversionConfig;
use crate::error::{ConversionFailure, Office2PngError};
use crate::pipeline::input::ResolvedPdf;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Executable names tried in order on the search path.
pub const OFFICE_BINARIES: &[&str] = &["libreoffice", "soffice"];

/// Prefix of the per-run temporary directory.
pub const TEMP_DIR_PREFIX: &str = "office_to_png_";

/// Finds the office-suite executable.
pub trait ToolLocator: Send + Sync {
    /// Path to the executable, or `None` when it is not available.
    fn locate(&self) -> Option<PathBuf>;

    /// Human-readable description of where `locate` looked, used in
    /// [`Office2PngError::ToolNotFound`].
    fn describe(&self) -> String;
}

/// Searches the directories in `PATH` for [`OFFICE_BINARIES`].
#[derive(Debug, Clone, Default)]
pub struct SearchPathLocator;

impl ToolLocator for SearchPathLocator {
    fn locate(&self) -> Option<PathBuf> {
        locate_in(&std::env::var_os("PATH")?)
    }

    fn describe(&self) -> String {
        format!("{} on $PATH", OFFICE_BINARIES.join(", "))
    }
}

/// Uses exactly the given executable.
#[derive(Debug, Clone)]
pub struct ExplicitLocator {
    path: PathBuf,
}

impl ExplicitLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ToolLocator for ExplicitLocator {
    fn locate(&self) -> Option<PathBuf> {
        self.path.is_file().then(|| self.path.clone())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// First of [`OFFICE_BINARIES`] found in `dirs`, in name order.
fn locate_in(dirs: &OsStr) -> Option<PathBuf> {
    OFFICE_BINARIES
        .iter()
        .find_map(|name| find_in_path(name, dirs))
}

/// First executable file named `name` in the `PATH`-style list `dirs`.
fn find_in_path(name: &str, dirs: &OsStr) -> Option<PathBuf> {
    let file_name = format!("{name}{}", std::env::consts::EXE_SUFFIX);
    std::env::split_paths(dirs)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(&file_name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Convert `input` to PDF with the office suite.
///
/// On success the returned [`ResolvedPdf::Converted`] owns the temporary
/// directory; the caller must call [`ResolvedPdf::cleanup`] (or drop it)
/// once the PDF is no longer needed. On failure no directory is left behind.
pub async fn office_to_pdf(
    input: &Path,
    config: &ConversionConfig,
) -> Result<ResolvedPdf, Office2PngError> {
    let locator = &config.tool_locator;
    let tool = locator
        .locate()
        .ok_or_else(|| Office2PngError::ToolNotFound {
            searched: locator.describe(),
        })?;
    info!("Converting {} to PDF with {}", input.display(), tool.display());

    let fail = |source: ConversionFailure| Office2PngError::ConversionFailed {
        input: input.to_path_buf(),
        source,
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_DIR_PREFIX);
    let temp_dir = match config.temp_root.as_deref() {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
    .map_err(|e| fail(ConversionFailure::TempDir(e)))?;
    debug!("Temporary directory: {}", temp_dir.path().display());

    // From here on every early return drops `temp_dir`, which removes it.
    run_office_suite(&tool, input, temp_dir.path(), config)
        .await
        .map_err(fail)?;

    let path = find_output_pdf(temp_dir.path(), input).map_err(fail)?;
    info!("Office suite produced {}", path.display());
    Ok(ResolvedPdf::Converted { path, temp_dir })
}

/// Run `<tool> --headless … --convert-to pdf --outdir <outdir> <input>`.
async fn run_office_suite(
    tool: &Path,
    input: &Path,
    outdir: &Path,
    config: &ConversionConfig,
) -> Result<(), ConversionFailure> {
    let mut cmd = Command::new(tool);
    cmd.args([
        "--headless",
        "--safe-mode",
        "--nologo",
        "--norestore",
        "--convert-to",
        "pdf",
        "--outdir",
    ])
    .arg(outdir)
    .arg(input)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);
    debug!("Running {:?}", cmd.as_std());

    let start = Instant::now();
    let child = cmd.spawn().map_err(ConversionFailure::Spawn)?;
    let pid = child.id();

    let output = match tokio::time::timeout(config.timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(ConversionFailure::Spawn)?,
        Err(_) => {
            warn!(
                "Office suite timed out after {:?}; killing it",
                config.timeout
            );
            kill_process_group(pid).await;
            return Err(ConversionFailure::Timeout {
                secs: config.timeout.as_secs_f64(),
            });
        }
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        return Err(ConversionFailure::ExitStatus {
            status: output.status,
            stderr,
        });
    }
    if !stderr.is_empty() {
        debug!("Office suite stderr: {}", stderr);
    }
    debug!("Office suite finished in {}ms", elapsed_ms);
    Ok(())
}

/// Kill every process in the group led by `pid`.
///
/// The group id equals the child's pid because it was spawned with
/// `process_group(0)`. The direct child is also covered by `kill_on_drop`.
#[cfg(unix)]
async fn kill_process_group(pid: Option<u32>) {
    let Some(pid) = pid else { return };
    let status = Command::new("kill")
        .args(["-KILL", "--", &format!("-{pid}")])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(s) if s.success() => debug!("Killed process group {}", pid),
        Ok(s) => debug!("kill for process group {} exited with {}", pid, s),
        Err(e) => warn!("Could not kill process group {}: {}", pid, e),
    }
}

#[cfg(not(unix))]
async fn kill_process_group(_pid: Option<u32>) {}

/// Locate the PDF written into `dir` for `input`.
///
/// LibreOffice names its output `<stem>.pdf`. If that file is missing the
/// directory must contain exactly one PDF; anything else is an error.
pub fn find_output_pdf(dir: &Path, input: &Path) -> Result<PathBuf, ConversionFailure> {
    if let Some(stem) = input.file_stem() {
        let mut name = stem.to_os_string();
        name.push(".pdf");
        let expected = dir.join(name);
        if expected.is_file() {
            return Ok(expected);
        }
        debug!(
            "Expected {} not found; scanning {}",
            expected.display(),
            dir.display()
        );
    }

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|_| ConversionFailure::NoPdfProduced {
            dir: dir.to_path_buf(),
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && crate::pipeline::input::is_pdf(p))
        .collect();

    match candidates.len() {
        0 => Err(ConversionFailure::NoPdfProduced {
            dir: dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        n => Err(ConversionFailure::AmbiguousOutput {
            dir: dir.to_path_buf(),
            candidates: n,
        }),
    }
}
