use chrono::NaiveDate;
use tracing::info;

use crate::data::AggregatedCase;

/// Drops cases dated before a cutoff.
///
/// The source system records unknown occurrence dates as placeholder dates
/// such as `1900-01-01`; those cases can hold thousands of unrelated reports.
/// Cases dated exactly on the cutoff are kept.
#[derive(Clone, Copy, Debug)]
pub struct CaseFilter {
    cutoff: NaiveDate,
}

impl CaseFilter {
    /// Create a filter that keeps cases dated on or after `cutoff`.
    pub fn new(cutoff: NaiveDate) -> Self {
        Self { cutoff }
    }

    /// True when `case` survives the cutoff.
    pub fn keeps(&self, case: &AggregatedCase) -> bool {
        case.occurrence_date >= self.cutoff
    }

    /// Keep the surviving cases, in input order, without modifying them.
    pub fn apply(&self, cases: Vec<AggregatedCase>) -> Vec<AggregatedCase> {
        let before = cases.len();
        let kept: Vec<AggregatedCase> = cases.into_iter().filter(|case| self.keeps(case)).collect();
        info!(
            "[oversight:filter] dropped {} of {} cases dated before {}",
            before - kept.len(),
            before,
            self.cutoff
        );
        kept
    }
}
