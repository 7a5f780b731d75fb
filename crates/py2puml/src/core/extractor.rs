//! Extraction seam between source text and the structural model

use super::error::Py2PumlError;
use super::model::ExtractedModule;

/// Failed extraction, optionally with whatever could be recovered
#[derive(Debug)]
pub struct ExtractionFailure {
    pub error: Py2PumlError,
    /// Module built from the parts of the source that did parse
    pub partial: Option<ExtractedModule>,
}

impl ExtractionFailure {
    pub fn new(error: Py2PumlError) -> Self {
        Self {
            error,
            partial: None,
        }
    }

    pub fn with_partial(error: Py2PumlError, partial: ExtractedModule) -> Self {
        Self {
            error,
            partial: Some(partial),
        }
    }
}

impl std::fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for ExtractionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Turns source text into the raw structural model
pub trait Extractor {
    fn extract(&self, source: &str) -> Result<ExtractedModule, ExtractionFailure>;

    /// Get the name of this extractor
    fn name(&self) -> &'static str;
}
