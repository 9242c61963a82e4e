//! Pipeline stages for office-to-PNG conversion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ office ──▶ render ──▶ encode
//! (paths)   (soffice)  (pdfium)   (RGB PNG)
//! ```
//!
//! 1. [`input`]  — normalise paths, pick the branch, own the temp directory
//! 2. [`office`] — run LibreOffice headless with a timeout; skipped for PDFs
//! 3. [`render`] — rasterise every page; runs in `spawn_blocking` because
//!    pdfium is not async-safe
//! 4. [`encode`] — flatten to opaque RGB and PNG-encode each page

pub mod encode;
pub mod input;
pub mod office;
pub mod render;
