// 📊 Aggregation Engine - Summary views over the RecordStore
//
// Read-only. Every query is a pure function of (store, today, args).
// "Today" is always passed in; Clock supplies it at the boundary.

use crate::business::BusinessRecord;
use crate::error::QueryError;
use crate::store::RecordStore;
use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

// ============================================================================
// CLOCK
// ============================================================================

/// Source of the current calendar date
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Constant date, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// ============================================================================
// SUMMARY TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostalCodeSummary {
    pub total_count: usize,
    pub distinct_classification_code_count: usize,
    pub distinct_neighborhood_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub code: String,
    pub total_count: usize,
    pub distinct_postal_code_count: usize,
    pub distinct_neighborhood_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneralSummary {
    pub total_businesses: usize,
    pub closed_businesses: usize,
    pub new_businesses_last_year: usize,
}

// ============================================================================
// DERIVED PREDICATES
// ============================================================================

/// Closed = closure date present and strictly before `today`
pub fn is_closed(record: &BusinessRecord, today: NaiveDate) -> bool {
    match record.closure_date {
        Some(closure_date) => closure_date < today,
        None => false,
    }
}

/// Same month/day one calendar year before `today` (Feb 29 → Feb 28)
pub fn one_year_before(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN)
}

/// Opened strictly after the date one year before `today`
pub fn is_new_within_year(record: &BusinessRecord, today: NaiveDate) -> bool {
    record.start_date > one_year_before(today)
}

// ============================================================================
// AGGREGATION ENGINE
// ============================================================================

pub struct AggregationEngine<'a> {
    store: &'a RecordStore,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        AggregationEngine { store }
    }

    pub fn store(&self) -> &'a RecordStore {
        self.store
    }

    /// Linear scan over all records, exact match on postal code
    pub fn summary_by_postal_code(&self, code: &str) -> PostalCodeSummary {
        let mut total_count = 0;
        let mut classification_codes: HashSet<&str> = HashSet::new();
        let mut neighborhoods: HashSet<&str> = HashSet::new();

        for record in self.store.records().iter().filter(|r| r.postal_code == code) {
            total_count += 1;
            classification_codes.insert(&record.classification_code);
            neighborhoods.insert(&record.neighborhood);
        }

        debug!(postal_code = code, total_count, "Postal code summary");

        PostalCodeSummary {
            total_count,
            distinct_classification_code_count: classification_codes.len(),
            distinct_neighborhood_count: neighborhoods.len(),
        }
    }

    /// Index lookup on the trimmed code; NotFound if the code was never loaded
    pub fn summary_by_classification_code(
        &self,
        code: &str,
    ) -> Result<ClassificationSummary, QueryError> {
        let code = code.trim();
        let group = self
            .store
            .classification_group(code)
            .ok_or_else(|| QueryError::NotFound {
                code: code.to_string(),
            })?;

        let mut postal_codes: HashSet<&str> = HashSet::new();
        let mut neighborhoods: HashSet<&str> = HashSet::new();
        for record in group.iter() {
            postal_codes.insert(&record.postal_code);
            neighborhoods.insert(&record.neighborhood);
        }

        debug!(classification_code = code, total_count = group.len(), "Classification summary");

        Ok(ClassificationSummary {
            code: code.to_string(),
            total_count: group.len(),
            distinct_postal_code_count: postal_codes.len(),
            distinct_neighborhood_count: neighborhoods.len(),
        })
    }

    /// Totals, closures as of `today`, and openings in the year before `today`
    pub fn general_summary(&self, today: NaiveDate) -> GeneralSummary {
        let mut summary = GeneralSummary::default();

        for group in self.store.classification_groups() {
            summary.total_businesses += group.len();
            for record in group.iter() {
                if is_closed(record, today) {
                    summary.closed_businesses += 1;
                }
                if is_new_within_year(record, today) {
                    summary.new_businesses_last_year += 1;
                }
            }
        }

        debug_assert_eq!(summary.total_businesses, self.store.len());
        debug!(
            %today,
            total = summary.total_businesses,
            closed = summary.closed_businesses,
            new = summary.new_businesses_last_year,
            "General summary"
        );

        summary
    }

    /// general_summary with today taken from `clock`
    pub fn general_summary_now(&self, clock: &dyn Clock) -> GeneralSummary {
        self.general_summary(clock.today())
    }
}

// ============================================================================
// FREE-FUNCTION API
// ============================================================================

pub fn summary_by_postal_code(store: &RecordStore, code: &str) -> PostalCodeSummary {
    AggregationEngine::new(store).summary_by_postal_code(code)
}

pub fn summary_by_classification_code(
    store: &RecordStore,
    code: &str,
) -> Result<ClassificationSummary, QueryError> {
    AggregationEngine::new(store).summary_by_classification_code(code)
}

pub fn general_summary(store: &RecordStore, today: NaiveDate) -> GeneralSummary {
    AggregationEngine::new(store).general_summary(today)
}

// ============================================================================
// TESTS
// ============================================================================
