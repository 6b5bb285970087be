//! Complaint loading and the badge-number join against the identity registry.

use tracing::{debug, info};

use crate::constants::complaints as cols;
use crate::data::{NormalizedComplaintRecord, RawComplaintRecord};
use crate::errors::ImportError;
use crate::identity::IdentityIndex;
use crate::metrics::JoinStats;
use crate::source::Table;
use crate::utils::NullSentinels;

/// Decode complaint rows, applying null-sentinel normalization once.
///
/// Every column in `REQUIRED_COLUMNS` must be present in the header.
pub fn load_complaints(
    table: &Table,
    nulls: &NullSentinels,
) -> Result<Vec<RawComplaintRecord>, ImportError> {
    let badge = table.column(cols::COL_BADGE_NUMBER)?;
    let file_number = table.column(cols::COL_FILE_NUMBER)?;
    let occurred = table.column(cols::COL_OCCURRED_DATE)?;
    let precinct = table.column(cols::COL_PRECINCT)?;
    let sector = table.column(cols::COL_SECTOR)?;
    let beat = table.column(cols::COL_BEAT)?;
    let source = table.column(cols::COL_SOURCE)?;
    let incident_type = table.column(cols::COL_INCIDENT_TYPE)?;
    let allegation = table.column(cols::COL_ALLEGATION)?;
    let disposition = table.column(cols::COL_DISPOSITION)?;
    let discipline = table.column(cols::COL_DISCIPLINE)?;
    let case_status = table.column(cols::COL_CASE_STATUS)?;
    let finding = table.column(cols::COL_FINDING)?;
    let unique_id = table.column(cols::COL_UNIQUE_ID)?;

    let records: Vec<RawComplaintRecord> = table
        .rows()
        .map(|row| RawComplaintRecord {
            unique_report_id: row.value(unique_id, nulls),
            file_number: row.value(file_number, nulls),
            occurrence_date: row.value(occurred, nulls),
            precinct: row.value(precinct, nulls),
            sector: row.value(sector, nulls),
            beat: row.value(beat, nulls),
            source: row.value(source, nulls),
            incident_type: row.value(incident_type, nulls),
            allegation: row.value(allegation, nulls),
            disposition: row.value(disposition, nulls),
            discipline: row.value(discipline, nulls),
            case_status: row.value(case_status, nulls),
            finding: row.value(finding, nulls),
            badge_number: row.value(badge, nulls),
        })
        .collect();
    info!(
        "[oversight:normalize] loaded {} complaint reports",
        records.len()
    );
    Ok(records)
}

/// Output of the identity join.
#[derive(Clone, Debug, Default)]
pub struct NormalizedComplaints {
    /// Joined reports, in input order.
    pub records: Vec<NormalizedComplaintRecord>,
    /// Reports with no registry match, in input order.
    pub missing: Vec<RawComplaintRecord>,
    /// Join counts.
    pub stats: JoinStats,
}

/// Joins complaint reports to officers by badge number.
///
/// Unmatched reports are not errors: they are excluded from `records` and
/// collected in `missing` for manual remediation.
pub struct ComplaintNormalizer<'a> {
    index: &'a IdentityIndex,
}

impl<'a> ComplaintNormalizer<'a> {
    /// Create a normalizer over a built identity index.
    pub fn new(index: &'a IdentityIndex) -> Self {
        Self { index }
    }

    /// Join every report; a report matching several registry rows is emitted once per row.
    pub fn normalize(&self, reports: Vec<RawComplaintRecord>) -> NormalizedComplaints {
        let mut out = NormalizedComplaints {
            stats: JoinStats {
                total: reports.len(),
                ..JoinStats::default()
            },
            ..NormalizedComplaints::default()
        };
        for report in reports {
            let matches = report
                .badge_number
                .as_deref()
                .map(|badge| self.index.lookup(badge))
                .unwrap_or_default();
            if matches.is_empty() {
                out.missing.push(report);
                continue;
            }
            out.stats.matched += 1;
            for identity in matches {
                out.records.push(NormalizedComplaintRecord {
                    report: report.clone(),
                    internal_id: identity.internal_id.clone(),
                    display_name: identity.display_name.clone(),
                });
            }
        }
        out.stats.missing = out.missing.len();
        out.stats.emitted = out.records.len();
        info!(
            "[oversight:normalize] matched {}/{} reports to officers ({:.1}%), {} unmatched",
            out.stats.matched,
            out.stats.total,
            out.stats.match_rate() * 100.0,
            out.stats.missing
        );
        if out.stats.fan_out() > 0 {
            debug!(
                "[oversight:normalize] shared badge numbers added {} joined rows",
                out.stats.fan_out()
            );
        }
        out
    }
}
