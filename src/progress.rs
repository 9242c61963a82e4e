//! Progress-callback trait for conversion and per-page render events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline runs.
//!
//! Page events fire on the blocking-pool thread that runs pdfium, so
//! implementations must be `Send + Sync`.
//!
//! # Example
//!
//! ```rust
//! use edgequake_office2png::{ConversionProgressCallback, ConversionConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_written(&self, page_num: usize, total_pages: usize, path: &Path) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} → {}", page_num, total_pages, path.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { written: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it moves through its stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in order from a single thread at a
/// time, but not necessarily the thread that started the conversion.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called before the office suite is started. Not called for PDF input.
    fn on_office_conversion_start(&self, input: &Path) {
        let _ = input;
    }

    /// Called once the office suite has produced a PDF.
    fn on_office_conversion_complete(&self, pdf: &Path, elapsed_ms: u64) {
        let _ = (pdf, elapsed_ms);
    }

    /// Called once the PDF is open and has at least one page.
    fn on_render_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each PNG has been written.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages in the document
    /// * `path`        — the file just written
    fn on_page_written(&self, page_num: usize, total_pages: usize, path: &Path) {
        let _ = (page_num, total_pages, path);
    }

    /// Called after the last page has been written.
    fn on_render_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        written: Mutex<Vec<usize>>,
        completed_total: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_render_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_written(&self, page_num: usize, _total_pages: usize, _path: &Path) {
            self.written.lock().unwrap().push(page_num);
        }

        fn on_render_complete(&self, total_pages: usize) {
            self.completed_total.store(total_pages, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_office_conversion_start(Path::new("slide.pptx"));
        cb.on_office_conversion_complete(Path::new("/tmp/slide.pdf"), 10);
        cb.on_render_start(5);
        cb.on_page_written(1, 5, Path::new("page_0001.png"));
        cb.on_render_complete(5);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_render_start(2);
        tracker.on_page_written(1, 2, Path::new("page_0001.png"));
        tracker.on_page_written(2, 2, Path::new("page_0002.png"));
        tracker.on_render_complete(2);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(*tracker.written.lock().unwrap(), vec![1, 2]);
        assert_eq!(tracker.completed_total.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_render_start(10);
        cb.on_page_written(1, 10, Path::new("page_0001.png"));
    }
}
