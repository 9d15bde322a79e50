#![allow(dead_code)]

//! Upload coordination — the two independent upload flows, each
//! single-flight, with the busy flag reset on every path.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use crate::extraction::{ExtractionError, ResumeExtractor};
use crate::models::ExtractionResult;
use crate::viewer::renderer::{DocumentSummary, LoadError};
use crate::viewer::ViewerState;
use crate::workflow::results::ResultsState;

/// A file handed in by the user, with the metadata pickers provide.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub media_type: Option<String>,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, media_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        }
    }

    /// Declared as PDF either by media type or by file extension.
    pub fn is_pdf(&self) -> bool {
        if let Some(media_type) = &self.media_type {
            if media_type.eq_ignore_ascii_case("application/pdf") {
                return true;
            }
        }
        self.file_name.to_ascii_lowercase().ends_with(".pdf")
    }
}

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("a processing upload is already in flight")]
    InFlight,

    #[error("resume processing failed: {0}")]
    Service(#[from] ExtractionError),
}

#[derive(Debug, Error)]
#[error("resume service unreachable: {0}")]
pub struct ConnectionError(#[from] pub ExtractionError);

/// Coordinates the two upload flows. The viewer's own busy flag guards
/// local loads; `processing` guards the remote call. Neither flow can
/// cancel an operation once started.
pub struct UploadCoordinator {
    extractor: Arc<dyn ResumeExtractor>,
    processing: bool,
}

impl UploadCoordinator {
    pub fn new(extractor: Arc<dyn ResumeExtractor>) -> Self {
        Self {
            extractor,
            processing: false,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Local-view flow. Non-PDF uploads and uploads issued while a load is
    /// in flight are dropped without touching the viewer.
    pub async fn upload_for_local_view(
        &mut self,
        viewer: &mut ViewerState,
        upload: &FileUpload,
    ) -> Result<Option<DocumentSummary>, LoadError> {
        if !upload.is_pdf() {
            debug!("ignoring non-PDF upload {:?}", upload.file_name);
            return Ok(None);
        }
        if viewer.is_busy() {
            warn!("local load already in flight, dropping {:?}", upload.file_name);
            return Ok(None);
        }
        viewer
            .load_local(&upload.file_name, upload.bytes.clone())
            .await
            .map(Some)
    }

    /// Remote-processing flow. Any file type is accepted here; the service
    /// does its own validation. On success the result is stored for
    /// display; on failure the stored result is left untouched.
    pub async fn upload_for_processing(
        &mut self,
        results: &mut ResultsState,
        upload: &FileUpload,
    ) -> Result<ExtractionResult, ProcessingError> {
        if self.processing {
            return Err(ProcessingError::InFlight);
        }
        self.processing = true;
        let outcome = self
            .extractor
            .process(&upload.file_name, upload.bytes.clone())
            .await;
        self.processing = false;

        let result = outcome?;
        results.set(result.clone());
        Ok(result)
    }

    /// Reachability probe; reports only, changes nothing.
    pub async fn test_connection(&self) -> Result<(), ConnectionError> {
        self.extractor.probe().await.map_err(ConnectionError)
    }

    #[cfg(test)]
    pub(crate) fn mark_processing(&mut self) {
        self.processing = true;
    }
}
