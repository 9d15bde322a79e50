#![allow(dead_code)]

//! Local viewing state machine: current document, page, zoom, and the
//! painted surface, driving the rendering seam.

pub mod renderer;

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::viewer::renderer::{DocumentSummary, LoadError, PageSurface, PdfRenderer, RenderError};

/// Zoom applied on every successful load.
pub const DEFAULT_SCALE: f32 = 1.5;
/// Zoom bounds; requests outside are ignored.
pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 3.0;

/// Invariant: `page_number` ∈ [1, page_count] whenever a document is held;
/// `scale` always within bounds.
pub struct ViewerState {
    renderer: Arc<dyn PdfRenderer>,
    document: Option<Bytes>,
    page_number: u32,
    page_count: u32,
    scale: f32,
    file_name: String,
    busy: bool,
    surface: Option<PageSurface>,
}

impl ViewerState {
    pub fn new(renderer: Arc<dyn PdfRenderer>) -> Self {
        Self {
            renderer,
            document: None,
            page_number: 1,
            page_count: 0,
            scale: DEFAULT_SCALE,
            file_name: String::new(),
            busy: false,
            surface: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn surface(&self) -> Option<&PageSurface> {
        self.surface.as_ref()
    }

    /// Loads a document for local viewing. On success the viewer shows
    /// page 1 at the default scale; on any failure the prior state is
    /// kept. The busy flag is reset on every path.
    pub async fn load_local(
        &mut self,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<DocumentSummary, LoadError> {
        self.busy = true;
        let outcome = self.load_inner(file_name, bytes).await;
        self.busy = false;
        outcome
    }

    async fn load_inner(
        &mut self,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<DocumentSummary, LoadError> {
        if bytes.is_empty() {
            return Err(LoadError::Empty);
        }
        let summary = self.renderer.open(&bytes)?;

        // Replacing the handle drops any previously loaded document.
        self.document = Some(bytes);
        self.page_number = summary.initial_page;
        self.page_count = summary.page_count;
        self.scale = DEFAULT_SCALE;
        self.file_name = file_name.to_string();
        self.surface = None;

        if let Err(e) = self.render_current_page().await {
            warn!("initial render of {file_name} failed: {e}");
        }
        Ok(summary)
    }

    /// Repaints the active page at the active scale into the surface slot.
    /// Page and scale are left untouched when the paint fails; with no
    /// document loaded this is a no-op.
    pub async fn render_current_page(&mut self) -> Result<(), RenderError> {
        let Some(bytes) = self.document.clone() else {
            return Ok(());
        };
        let surface = self
            .renderer
            .render_page(&bytes, self.page_number, self.scale)?;
        self.surface = Some(surface);
        Ok(())
    }

    /// Moves to page `n` (1-based). Out-of-range requests and requests
    /// with no document loaded are silently ignored.
    pub async fn go_to_page(&mut self, n: u32) {
        if self.document.is_none() || n < 1 || n > self.page_count {
            debug!("ignoring go_to_page({n})");
            return;
        }
        self.page_number = n;
        if let Err(e) = self.render_current_page().await {
            warn!("render after page change failed: {e}");
        }
    }

    /// Sets the zoom scale. Out-of-range or non-finite requests and
    /// requests with no document loaded are silently ignored.
    pub async fn set_scale(&mut self, s: f32) {
        if self.document.is_none() || !s.is_finite() || !(MIN_SCALE..=MAX_SCALE).contains(&s) {
            debug!("ignoring set_scale({s})");
            return;
        }
        self.scale = s;
        if let Err(e) = self.render_current_page().await {
            warn!("render after scale change failed: {e}");
        }
    }

    /// Releases the document and resets every field to its default.
    /// Idempotent.
    pub fn clear(&mut self) {
        self.document = None;
        self.page_number = 1;
        self.page_count = 0;
        self.scale = DEFAULT_SCALE;
        self.file_name.clear();
        self.busy = false;
        self.surface = None;
    }

    #[cfg(test)]
    pub(crate) fn mark_busy(&mut self) {
        self.busy = true;
    }
}
