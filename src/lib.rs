// Business Registry Analyzer - Core Library
// Exposes the record store, loader and aggregation engine for the shell and tests

pub mod business;
pub mod error;
pub mod store;
pub mod loader;
pub mod aggregation;
pub mod shell;

// Re-export commonly used types
pub use business::{BusinessRecord, parse_date, DATE_FORMAT};
pub use error::{LoadError, LoadResult, ParseError, ParseErrorKind, QueryError};
pub use store::{RecordStore, ClassificationGroup};
pub use loader::{
    LoadOutcome, LoadPolicy, LoaderConfig,
    load_store, load_store_with, load_from_reader, parse_record,
};
pub use aggregation::{
    AggregationEngine, Clock, SystemClock, FixedClock,
    PostalCodeSummary, ClassificationSummary, GeneralSummary,
    is_closed, is_new_within_year, one_year_before,
    summary_by_postal_code, summary_by_classification_code, general_summary,
};
pub use shell::{Command, OutputFormat, Shell};
