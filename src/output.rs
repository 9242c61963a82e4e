//! Result types returned by a conversion run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where the rasterised PDF came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfSource {
    /// The input was already a PDF and was rendered in place.
    Original,
    /// The office suite converted the input first.
    Converted,
}

/// One PNG written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Absolute path of the written `page_NNNN.png`.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Size of the PNG file in bytes.
    pub bytes: usize,
}

/// Timing for a run, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Time spent in the office suite; 0 for PDF input.
    pub conversion_duration_ms: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Normalised input path.
    pub input: PathBuf,
    /// Normalised output directory.
    pub outdir: PathBuf,
    pub page_count: usize,
    pub source: PdfSource,
    pub pages: Vec<RenderedPage>,
    pub stats: ConversionStats,
}

/// Renders the summary line printed by the CLI: `ok pages=<N> outdir=<path>`.
impl fmt::Display for ConversionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ok pages={} outdir={}",
            self.page_count,
            self.outdir.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConversionOutput {
        ConversionOutput {
            input: PathBuf::from("/in/slide.pptx"),
            outdir: PathBuf::from("/out"),
            page_count: 3,
            source: PdfSource::Converted,
            pages: Vec::new(),
            stats: ConversionStats::default(),
        }
    }

    #[test]
    fn summary_line() {
        assert_eq!(sample().to_string(), "ok pages=3 outdir=/out");
    }

    #[test]
    fn json_uses_lowercase_source() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["source"], "converted");
        assert_eq!(json["page_count"], 3);
    }
}
