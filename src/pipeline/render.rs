//! PDF rasterisation: render every page to `page_NNNN.png` via pdfium.
//!
//! ## Threading
//!
//! pdfium calls are blocking and not async-safe, so the whole render loop
//! runs inside `tokio::task::spawn_blocking`.
//!
//! ## Scale
//!
//! PDF user space is 72 units per inch, so `dpi / 72` maps page points to
//! pixels. The factor is floored at [`MIN_RENDER_SCALE`] so a tiny DPI never
//! asks pdfium for a zero-sized bitmap.

use crate::config::ConversionConfig;
use crate::error::{Office2PngError, RasterFailure};
use crate::output::RenderedPage;
use crate::pipeline::encode;
use crate::progress::ProgressCallback;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lower bound of the render scale factor.
pub const MIN_RENDER_SCALE: f32 = 0.1;

/// Resolution at which one PDF point is one pixel.
pub const BASE_DPI: f32 = 72.0;

/// Render scale for `dpi`, floored at [`MIN_RENDER_SCALE`].
pub fn render_scale(dpi: u32) -> f32 {
    (dpi as f32 / BASE_DPI).max(MIN_RENDER_SCALE)
}

/// Output file name for a 1-based page number: `page_0001.png`.
pub fn page_file_name(page_num: usize) -> String {
    format!("page_{page_num:04}.png")
}

/// Bind to a pdfium shared library.
///
/// `lib_path` may name the library file itself or a directory containing the
/// platform library. Without it, the working directory is tried first and
/// then the system library search path.
pub fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, Office2PngError> {
    let bindings = match lib_path {
        Some(dir) if dir.is_dir() => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        }
        Some(file) => Pdfium::bind_to_library(file),
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| Office2PngError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Rasterise every page of `pdf_path` into `outdir`.
///
/// Runs inside `spawn_blocking`. Returns one [`RenderedPage`] per page, in
/// page order; an empty vector for a document without pages.
pub async fn render_pages(
    pdf_path: &Path,
    outdir: &Path,
    config: &ConversionConfig,
) -> Result<Vec<RenderedPage>, Office2PngError> {
    let pdf = pdf_path.to_path_buf();
    let out = outdir.to_path_buf();
    let dpi = config.dpi;
    let lib_path = config.pdfium_lib_path.clone();
    let progress = config.progress_callback.clone();

    tokio::task::spawn_blocking(move || {
        render_pages_blocking(&pdf, &out, dpi, lib_path.as_deref(), progress.as_ref())
    })
    .await
    .map_err(|e| Office2PngError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of page rendering.
fn render_pages_blocking(
    pdf_path: &Path,
    outdir: &Path,
    dpi: u32,
    lib_path: Option<&Path>,
    progress: Option<&ProgressCallback>,
) -> Result<Vec<RenderedPage>, Office2PngError> {
    let fail = |source: RasterFailure| Office2PngError::RasterizationFailed {
        pdf: pdf_path.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(outdir).map_err(|e| {
        fail(RasterFailure::CreateOutputDir {
            path: outdir.to_path_buf(),
            source: e,
        })
    })?;

    let pdfium = bind_pdfium(lib_path)?;
    let bytes = std::fs::read(pdf_path).map_err(|e| fail(RasterFailure::ReadPdf(e)))?;

    // The document is closed when it drops, on every return path below.
    let document = pdfium
        .load_pdf_from_byte_vec(bytes, None)
        .map_err(|e| fail(RasterFailure::OpenPdf(format!("{:?}", e))))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);
    if total_pages == 0 {
        return Ok(Vec::new());
    }

    let scale = render_scale(dpi);
    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
    debug!("Rendering at {} DPI (scale {:.3})", dpi, scale);

    if let Some(cb) = progress {
        cb.on_render_start(total_pages);
    }

    let mut results = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            fail(RasterFailure::RenderPage {
                page: page_num,
                detail: format!("{:?}", e),
            })
        })?;

        let rgb = encode::flatten_to_rgb(bitmap.as_image());
        let (width, height) = rgb.dimensions();
        let png = encode::encode_png(rgb).map_err(|e| {
            fail(RasterFailure::EncodePage {
                page: page_num,
                source: e,
            })
        })?;

        let path: PathBuf = outdir.join(page_file_name(page_num));
        std::fs::write(&path, &png).map_err(|e| {
            fail(RasterFailure::WritePage {
                path: path.clone(),
                source: e,
            })
        })?;
        debug!(
            "Rendered page {} → {}x{} px, {} bytes",
            page_num,
            width,
            height,
            png.len()
        );

        if let Some(cb) = progress {
            cb.on_page_written(page_num, total_pages, &path);
        }

        results.push(RenderedPage {
            page_num,
            path,
            width,
            height,
            bytes: png.len(),
        });
    }

    if let Some(cb) = progress {
        cb.on_render_complete(total_pages);
    }

    Ok(results)
}
