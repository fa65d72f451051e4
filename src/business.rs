// 🏢 Business Record - One row of the registry
//
// Immutable once built. Dates are calendar dates, no time component.

use chrono::NaiveDate;

/// Date format used by the registry: MM/DD/YYYY
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// BusinessRecord - A parsed registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRecord {
    // ========================================================================
    // IDENTITY & LOCATION
    // ========================================================================
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,

    // ========================================================================
    // CLASSIFICATION
    // ========================================================================
    /// Industry code (NAICS in the source data)
    pub classification_code: String,
    pub neighborhood: String,

    // ========================================================================
    // LIFECYCLE
    // ========================================================================
    pub start_date: NaiveDate,

    /// None = still operating
    pub closure_date: Option<NaiveDate>,

    // ========================================================================
    // PROVENANCE
    // ========================================================================
    /// Physical line in the source file (0 when not loaded from a file)
    pub line_number: u64,
}

impl BusinessRecord {
    /// Create a record with the required fields and no closure date
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
        classification_code: impl Into<String>,
        neighborhood: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        BusinessRecord {
            name: name.into(),
            address: address.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            classification_code: classification_code.into(),
            neighborhood: neighborhood.into(),
            start_date,
            closure_date: None,
            line_number: 0,
        }
    }

    /// Builder pattern: add closure date
    pub fn with_closure_date(mut self, closure_date: NaiveDate) -> Self {
        self.closure_date = Some(closure_date);
        self
    }

    /// Builder pattern: record source line
    pub fn with_line_number(mut self, line_number: u64) -> Self {
        self.line_number = line_number;
        self
    }
}

/// Parse a strict MM/DD/YYYY date
///
/// chrono alone accepts single-digit months and days, so the shape is
/// checked first: exactly 10 chars, `/` at positions 2 and 5, digits elsewhere.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 {
        return None;
    }

    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b'/',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
