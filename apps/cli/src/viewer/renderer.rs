#![allow(dead_code)]

//! PDF engine seam. Decoding and rasterization are delegated entirely to
//! external libraries; the workflow only ever talks to the `PdfRenderer`
//! trait, and test code scripts it.

use lopdf::Document;
use pdfium_render::prelude::{PdfBitmapFormat, PdfRenderConfig, Pdfium};
use thiserror::Error;

/// Summary returned by a successful document open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSummary {
    pub page_count: u32,
    /// Always 1 — the viewer starts on the first page.
    pub initial_page: u32,
}

/// One painted page: RGBA8, row-major, `width * 4` byte stride.
#[derive(Debug, Clone)]
pub struct PageSurface {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("empty input")]
    Empty,

    #[error("not a well-formed PDF: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
#[error("page paint failed: {0}")]
pub struct RenderError(pub String);

/// Rendering seam between the viewer state machine and the PDF libraries.
pub trait PdfRenderer: Send + Sync {
    /// Decodes the document far enough to count pages. Retains no state.
    fn open(&self, bytes: &[u8]) -> Result<DocumentSummary, LoadError>;

    /// Paints one page (1-based) at the given scale factor.
    fn render_page(
        &self,
        bytes: &[u8],
        page_number: u32,
        scale: f32,
    ) -> Result<PageSurface, RenderError>;
}

/// The shipped engine: lopdf for document structure, pdfium for raster.
///
/// Pdfium handles are not Send, so the library is bound per call and never
/// stored; that keeps the engine shareable across await points.
#[derive(Debug, Default)]
pub struct PdfEngine;

impl PdfEngine {
    pub fn new() -> Self {
        Self
    }
}

impl PdfRenderer for PdfEngine {
    fn open(&self, bytes: &[u8]) -> Result<DocumentSummary, LoadError> {
        let document = Document::load_mem(bytes).map_err(|e| LoadError::Decode(e.to_string()))?;
        let page_count = document.get_pages().len() as u32;
        if page_count == 0 {
            return Err(LoadError::Decode("document has no pages".to_string()));
        }
        Ok(DocumentSummary {
            page_count,
            initial_page: 1,
        })
    }

    fn render_page(
        &self,
        bytes: &[u8],
        page_number: u32,
        scale: f32,
    ) -> Result<PageSurface, RenderError> {
        let pdfium = bind_pdfium().map_err(RenderError)?;
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| RenderError(e.to_string()))?;

        let index = u16::try_from(page_number.saturating_sub(1))
            .map_err(|_| RenderError(format!("page {page_number} out of range")))?;
        let page = document
            .pages()
            .get(index)
            .map_err(|e| RenderError(e.to_string()))?;

        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(scale)
            .render_form_data(false)
            .render_annotations(false)
            .set_format(PdfBitmapFormat::BGRA);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| RenderError(e.to_string()))?;

        let width = bitmap.width().max(0) as usize;
        let height = bitmap.height().max(0) as usize;
        let src = bitmap.as_raw_bytes();
        let src_stride = if height == 0 { 0 } else { src.len() / height };

        // BGRA → RGBA
        let mut pixels = Vec::with_capacity(width.saturating_mul(height).saturating_mul(4));
        for y in 0..height {
            let base = y.saturating_mul(src_stride);
            for x in 0..width {
                let idx = base.saturating_add(x.saturating_mul(4));
                let b = src.get(idx).copied().unwrap_or(255);
                let g = src.get(idx + 1).copied().unwrap_or(255);
                let r = src.get(idx + 2).copied().unwrap_or(255);
                let a = src.get(idx + 3).copied().unwrap_or(255);
                pixels.extend_from_slice(&[r, g, b, a]);
            }
        }

        Ok(PageSurface {
            width: width as u32,
            height: height as u32,
            pixels,
        })
    }
}

fn bind_pdfium() -> Result<Pdfium, String> {
    if let Ok(path) = std::env::var("VITAE_PDFIUM_LIB_PATH") {
        let bindings = Pdfium::bind_to_library(&path)
            .map_err(|e| format!("failed to load pdfium from VITAE_PDFIUM_LIB_PATH={path}: {e}"))?;
        return Ok(Pdfium::new(bindings));
    }

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| {
            format!("pdfium library not found (install it system-wide or set VITAE_PDFIUM_LIB_PATH): {e}")
        })?;
    Ok(Pdfium::new(bindings))
}
