pub mod record;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a successful remote processing run, held by `ResultsState`
/// until the user clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Structured record extracted from the resume. The service's output
    /// shape is not contractually fixed, so this stays a tagged value.
    pub record: Value,
    /// Absolute address of the reformatted PDF the service generated.
    pub document_url: String,
    pub original_filename: Option<String>,
    pub processed_at: Option<String>,
}
