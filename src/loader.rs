// 📥 Loader - Delimited registry file → RecordStore
//
// Header line is skipped without validation. Each data line carries
// 8 or 9 fields:
//   name, address, city, state, postal_code, classification_code,
//   neighborhood, start_date, [closure_date]
//
// Quoted fields may contain the delimiter. Every field is trimmed.

use crate::business::{parse_date, BusinessRecord};
use crate::error::{LoadError, LoadResult, ParseError, ParseErrorKind};
use crate::store::RecordStore;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

/// Fields every data line must have (closure date is optional)
pub const REQUIRED_FIELDS: usize = 8;
/// Fields a data line may have
pub const MAX_FIELDS: usize = 9;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// What to do with a data line that fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// First bad line fails the whole load
    #[default]
    Abort,
    /// Skip bad lines, report them in LoadOutcome::skipped
    SkipInvalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub delimiter: u8,
    pub policy: LoadPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            delimiter: b',',
            policy: LoadPolicy::Abort,
        }
    }
}

impl LoaderConfig {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Result of a successful load
#[derive(Debug)]
pub struct LoadOutcome {
    pub store: RecordStore,
    /// Lines dropped under LoadPolicy::SkipInvalid (always empty under Abort)
    pub skipped: Vec<ParseError>,
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Load a registry file with the default configuration (comma, abort on error)
pub fn load_store(path: &Path) -> LoadResult<RecordStore> {
    load_store_with(path, &LoaderConfig::default()).map(|outcome| outcome.store)
}

/// Load a registry file with an explicit configuration
pub fn load_store_with(path: &Path, config: &LoaderConfig) -> LoadResult<LoadOutcome> {
    let file = File::open(path).map_err(|source| LoadError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "Loading business registry");
    load_from_reader(file, config)
}

/// Load from any reader (first line is the header)
///
/// Each physical line is split on its own, so an unbalanced quote only
/// breaks the line it appears on.
pub fn load_from_reader<R: Read>(reader: R, config: &LoaderConfig) -> LoadResult<LoadOutcome> {
    let splitter = line_splitter(config.delimiter);

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (idx, result) in BufReader::new(reader).lines().enumerate() {
        let text = result?;
        let line = idx as u64 + 1;

        // header and blank lines
        if line == 1 || text.trim().is_empty() {
            continue;
        }

        let raw = split_line(&splitter, &text)?;

        match parse_record(&raw, line) {
            Ok(record) => records.push(record),
            Err(err) => match config.policy {
                LoadPolicy::Abort => return Err(LoadError::Parse(err)),
                LoadPolicy::SkipInvalid => {
                    warn!(line = err.line, error = %err.kind, "Skipping malformed line");
                    skipped.push(err);
                }
            },
        }
    }

    let store = RecordStore::from_records(records);
    info!(
        records = store.len(),
        groups = store.group_count(),
        skipped = skipped.len(),
        "Business registry loaded"
    );

    Ok(LoadOutcome { store, skipped })
}

// ============================================================================
// LINE PARSING
// ============================================================================

fn line_splitter(delimiter: u8) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter);
    builder
}

/// Quote-aware split of a single line
fn split_line(splitter: &ReaderBuilder, text: &str) -> LoadResult<StringRecord> {
    let mut reader = splitter.from_reader(text.as_bytes());
    let mut raw = StringRecord::new();
    reader.read_record(&mut raw)?;
    Ok(raw)
}

/// Turn one split, trimmed line into a BusinessRecord
///
/// Empty fields past the ninth are ignored, so `...,01/15/2020,,` still
/// loads.
pub fn parse_record(raw: &StringRecord, line: u64) -> Result<BusinessRecord, ParseError> {
    let mut found = raw.len();
    while found > MAX_FIELDS && raw.get(found - 1) == Some("") {
        found -= 1;
    }
    if !(REQUIRED_FIELDS..=MAX_FIELDS).contains(&found) {
        return Err(ParseError::new(line, ParseErrorKind::FieldCount { found }));
    }

    let field = |idx: usize| raw.get(idx).unwrap_or("");

    let start_date = required_date(field(7), "start_date", line)?;
    let closure_date = match field(8) {
        "" => None,
        value => Some(required_date(value, "closure_date", line)?),
    };

    let mut record = BusinessRecord::new(
        field(0),
        field(1),
        field(2),
        field(3),
        field(4),
        field(5),
        field(6),
        start_date,
    )
    .with_line_number(line);
    record.closure_date = closure_date;

    Ok(record)
}

fn required_date(
    value: &str,
    field: &'static str,
    line: u64,
) -> Result<chrono::NaiveDate, ParseError> {
    parse_date(value).ok_or_else(|| {
        ParseError::new(
            line,
            ParseErrorKind::InvalidDate {
                field,
                value: value.to_string(),
            },
        )
    })
}

// ============================================================================
// TESTS
// ============================================================================
