//! Configuration types for office-to-PNG conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the plain CLI
//! behaviour: 200 DPI, a two-minute office-suite timeout, LibreOffice looked
//! up on `PATH`, and pdfium bound from the working directory or the system.

use crate::error::Office2PngError;
use crate::pipeline::office::{ExplicitLocator, SearchPathLocator, ToolLocator};
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default render resolution.
pub const DEFAULT_DPI: u32 = 200;

/// Default office-suite timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for one conversion run.
///
/// # Example
/// ```rust
/// use edgequake_office2png::ConversionConfig;
/// use std::time::Duration;
///
/// let config = ConversionConfig::builder()
///     .dpi(150)
///     .timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 150);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI. Default: 200.
    ///
    /// Converted to a scale of `dpi / 72`, floored at 0.1, so every value is
    /// accepted. Very high values produce very large bitmaps.
    pub dpi: u32,

    /// Maximum time the office suite may run before it is killed. Default: 120 s.
    pub timeout: Duration,

    /// How the office-suite executable is found. Default: [`SearchPathLocator`].
    pub tool_locator: Arc<dyn ToolLocator>,

    /// Parent directory for the per-run temporary directory.
    /// If None, uses the system temporary directory.
    pub temp_root: Option<PathBuf>,

    /// pdfium shared library, or a directory containing it.
    /// If None, tries the working directory and then the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Optional progress callback for per-stage and per-page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            tool_locator: Arc::new(SearchPathLocator),
            temp_root: None,
            pdfium_lib_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("timeout", &self.timeout)
            .field("tool_locator", &self.tool_locator.describe())
            .field("temp_root", &self.temp_root)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    pub fn tool_locator(mut self, locator: Arc<dyn ToolLocator>) -> Self {
        self.config.tool_locator = locator;
        self
    }

    /// Use exactly this office-suite executable instead of searching `PATH`.
    pub fn office_binary(self, path: impl Into<PathBuf>) -> Self {
        self.tool_locator(Arc::new(ExplicitLocator::new(path)))
    }

    pub fn temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_root = Some(dir.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Office2PngError> {
        if self.config.timeout.is_zero() {
            return Err(Office2PngError::InvalidConfig(
                "office-suite timeout must be greater than zero".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.dpi, 200);
        assert_eq!(c.timeout, Duration::from_secs(120));
        assert!(c.temp_root.is_none());
        assert!(c.pdfium_lib_path.is_none());
        assert!(c.progress_callback.is_none());
        assert!(c.tool_locator.describe().contains("$PATH"));
    }

    #[test]
    fn builder_sets_fields() {
        let c = ConversionConfig::builder()
            .dpi(72)
            .timeout_secs(5)
            .temp_root("/var/tmp")
            .pdfium_lib_path("/opt/pdfium/lib")
            .office_binary("/opt/libreoffice/program/soffice")
            .build()
            .unwrap();
        assert_eq!(c.dpi, 72);
        assert_eq!(c.timeout, Duration::from_secs(5));
        assert_eq!(c.temp_root, Some(PathBuf::from("/var/tmp")));
        assert_eq!(c.pdfium_lib_path, Some(PathBuf::from("/opt/pdfium/lib")));
        assert_eq!(
            c.tool_locator.describe(),
            "/opt/libreoffice/program/soffice"
        );
    }

    #[test]
    fn zero_dpi_is_accepted() {
        assert!(ConversionConfig::builder().dpi(0).build().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ConversionConfig::builder().timeout_secs(0).build().unwrap_err();
        assert!(matches!(err, Office2PngError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_callback() {
        let dbg = format!("{:?}", ConversionConfig::default());
        assert!(dbg.contains("dpi: 200"));
        assert!(dbg.contains("progress_callback: None"));
    }
}
