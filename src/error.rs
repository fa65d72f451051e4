// ⚠️ Error Types - Load and query failures
//
// Load errors are fatal to the load that raised them.
// Query errors are per-query and never fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type LoadResult<T> = Result<T, LoadError>;

// ============================================================================
// LOAD ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Source not found: {}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to read source: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to split line: {source}")]
    Split {
        #[from]
        source: csv::Error,
    },
}

/// A data line that could not be turned into a BusinessRecord
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: {kind}")]
pub struct ParseError {
    /// 1-based physical line in the source (the header is line 1)
    pub line: u64,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: u64, kind: ParseErrorKind) -> Self {
        ParseError { line, kind }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("expected 8 or 9 fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid {field} '{value}' (expected MM/DD/YYYY)")]
    InvalidDate { field: &'static str, value: String },
}

// ============================================================================
// QUERY ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The classification code never appeared in the dataset
    #[error("No businesses found for NAICS code {code}")]
    NotFound { code: String },
}
