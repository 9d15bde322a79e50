#![allow(dead_code)]

use crate::models::ExtractionResult;

/// Holds the last extraction result for display until the user clears it.
#[derive(Debug, Default)]
pub struct ResultsState {
    last: Option<ExtractionResult>,
}

impl ResultsState {
    pub fn set(&mut self, result: ExtractionResult) {
        self.last = Some(result);
    }

    pub fn last(&self) -> Option<&ExtractionResult> {
        self.last.as_ref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
