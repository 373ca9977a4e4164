//! Extraction errors.

use std::fmt;
use thiserror::Error;

/// Which end of a marker pair is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Start => f.write_str("Start"),
            Boundary::End => f.write_str("End"),
        }
    }
}

/// Malformed marker annotations. Every variant names the marker involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnippetError {
    #[error("{boundary} marker not found: {marker}")]
    MarkerNotFound { marker: String, boundary: Boundary },

    #[error("Duplicate markers found: {marker}")]
    DuplicateMarker { marker: String },

    #[error("Duplicate cut-start markers without cut-end in \"{marker}\" snippet")]
    DuplicateCutStart { marker: String },

    #[error("Duplicate cut-end marker without matching cut-start in \"{marker}\" snippet")]
    UnmatchedCutEnd { marker: String },

    #[error("Missing cut-end marker for cut-start in \"{marker}\" snippet")]
    UnclosedCutRegion { marker: String },
}

impl SnippetError {
    /// Name of the marker the error refers to.
    pub fn marker(&self) -> &str {
        match self {
            SnippetError::MarkerNotFound { marker, .. }
            | SnippetError::DuplicateMarker { marker }
            | SnippetError::DuplicateCutStart { marker }
            | SnippetError::UnmatchedCutEnd { marker }
            | SnippetError::UnclosedCutRegion { marker } => marker,
        }
    }
}
