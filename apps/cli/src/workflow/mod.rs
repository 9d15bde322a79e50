#![allow(dead_code)]

//! Workflow shell — pure state-driven selection over the three display
//! modes, composing the state containers for one session.

pub mod coordinator;
pub mod results;

use std::sync::Arc;

use tracing::info;

use crate::extraction::ResumeExtractor;
use crate::models::ExtractionResult;
use crate::viewer::renderer::{DocumentSummary, LoadError, PdfRenderer};
use crate::viewer::ViewerState;
use crate::workflow::coordinator::{
    ConnectionError, FileUpload, ProcessingError, UploadCoordinator,
};
use crate::workflow::results::ResultsState;

/// The single active top-level view. Exactly one at a time; transitions
/// are user- or event-triggered, never concurrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Upload,
    Viewer,
    Results,
}

/// Owns every state container for one session — created on session start,
/// torn down on session end, no ambient globals.
pub struct WorkflowShell {
    viewer: ViewerState,
    results: ResultsState,
    coordinator: UploadCoordinator,
    mode: DisplayMode,
}

impl WorkflowShell {
    pub fn new(renderer: Arc<dyn PdfRenderer>, extractor: Arc<dyn ResumeExtractor>) -> Self {
        Self {
            viewer: ViewerState::new(renderer),
            results: ResultsState::default(),
            coordinator: UploadCoordinator::new(extractor),
            mode: DisplayMode::default(),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn results(&self) -> &ResultsState {
        &self.results
    }

    /// Explicit user navigation back to the upload view.
    pub fn show_upload(&mut self) {
        self.mode = DisplayMode::Upload;
    }

    /// Local-view flow; switches to the viewer when a document loads.
    pub async fn open_local(
        &mut self,
        upload: &FileUpload,
    ) -> Result<Option<DocumentSummary>, LoadError> {
        let summary = self
            .coordinator
            .upload_for_local_view(&mut self.viewer, upload)
            .await?;
        if summary.is_some() {
            self.mode = DisplayMode::Viewer;
        }
        Ok(summary)
    }

    /// Remote-processing flow; switches to the results view on success.
    pub async fn process_remote(
        &mut self,
        upload: &FileUpload,
    ) -> Result<ExtractionResult, ProcessingError> {
        let result = self
            .coordinator
            .upload_for_processing(&mut self.results, upload)
            .await?;
        info!(
            "processed {:?}, generated document at {}",
            upload.file_name, result.document_url
        );
        self.mode = DisplayMode::Results;
        Ok(result)
    }

    /// Connectivity probe passthrough; purely diagnostic.
    pub async fn check_service(&self) -> Result<(), ConnectionError> {
        self.coordinator.test_connection().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionError;
    use crate::viewer::renderer::{PageSurface, RenderError};
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::json;

    struct FakeRenderer;

    impl PdfRenderer for FakeRenderer {
        fn open(&self, _bytes: &[u8]) -> Result<DocumentSummary, LoadError> {
            Ok(DocumentSummary {
                page_count: 2,
                initial_page: 1,
            })
        }

        fn render_page(
            &self,
            _bytes: &[u8],
            _page_number: u32,
            _scale: f32,
        ) -> Result<PageSurface, RenderError> {
            Ok(PageSurface {
                width: 1,
                height: 1,
                pixels: vec![0; 4],
            })
        }
    }

    struct FakeExtractor {
        fail: bool,
    }

    #[async_trait]
    impl ResumeExtractor for FakeExtractor {
        async fn process(
            &self,
            _file_name: &str,
            _bytes: Bytes,
        ) -> Result<ExtractionResult, ExtractionError> {
            if self.fail {
                return Err(ExtractionError::Api {
                    status: 500,
                    message: "Error processing resume".to_string(),
                });
            }
            Ok(ExtractionResult {
                record: json!({"first_name": "Grace", "skills": "compilers"}),
                document_url: "http://localhost:8000/static/grace.pdf".to_string(),
                original_filename: Some("grace.pdf".to_string()),
                processed_at: Some("2025-01-01T00:00:00".to_string()),
            })
        }

        async fn probe(&self) -> Result<(), ExtractionError> {
            Ok(())
        }

        async fn fetch_document(&self, _url: &str) -> Result<Bytes, ExtractionError> {
            Ok(Bytes::new())
        }
    }

    fn shell(fail_processing: bool) -> WorkflowShell {
        WorkflowShell::new(
            Arc::new(FakeRenderer),
            Arc::new(FakeExtractor {
                fail: fail_processing,
            }),
        )
    }

    fn upload(name: &str, media_type: &str) -> FileUpload {
        FileUpload::new(
            name,
            Some(media_type.to_string()),
            Bytes::from_static(b"%PDF-1.7 fake"),
        )
    }

    #[test]
    fn a_new_session_starts_on_the_upload_view() {
        assert_eq!(shell(false).mode(), DisplayMode::Upload);
    }

    #[tokio::test]
    async fn successful_local_load_switches_to_the_viewer() {
        let mut shell = shell(false);
        let summary = shell
            .open_local(&upload("cv.pdf", "application/pdf"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.page_count, 2);
        assert_eq!(shell.mode(), DisplayMode::Viewer);
        assert_eq!(shell.viewer().page_number(), 1);
    }

    #[tokio::test]
    async fn rejected_local_upload_keeps_the_upload_view() {
        let mut shell = shell(false);
        let summary = shell
            .open_local(&upload("notes.txt", "text/plain"))
            .await
            .unwrap();
        assert!(summary.is_none());
        assert_eq!(shell.mode(), DisplayMode::Upload);
        assert!(!shell.viewer().is_loaded());
    }

    #[tokio::test]
    async fn successful_processing_switches_to_results_with_the_payload() {
        let mut shell = shell(false);
        shell
            .process_remote(&upload("cv.pdf", "application/pdf"))
            .await
            .unwrap();
        assert_eq!(shell.mode(), DisplayMode::Results);

        let stored = shell.results().last().unwrap();
        assert_eq!(stored.record["first_name"], "Grace");
        assert_eq!(stored.document_url, "http://localhost:8000/static/grace.pdf");
    }

    #[tokio::test]
    async fn failed_processing_changes_neither_mode_nor_results() {
        let mut shell = shell(true);
        let err = shell
            .process_remote(&upload("cv.pdf", "application/pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::Service(_)));
        assert_eq!(shell.mode(), DisplayMode::Upload);
        assert!(shell.results().last().is_none());
    }

    #[tokio::test]
    async fn show_upload_navigates_home_from_results() {
        let mut shell = shell(false);
        shell
            .process_remote(&upload("cv.pdf", "application/pdf"))
            .await
            .unwrap();
        shell.show_upload();
        assert_eq!(shell.mode(), DisplayMode::Upload);
        // Navigation alone never clears the stored result.
        assert!(shell.results().last().is_some());
    }
}
