use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ComplaintField;

pub use crate::types::{BadgeNumber, CaseKey, FileNumber, LinkUrl, OfficerId, ReportId};

/// One officer from the identity registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Stable internal officer id.
    pub internal_id: OfficerId,
    /// Whitespace-trimmed badge number.
    pub badge_number: BadgeNumber,
    /// Display name, when the registry carries one.
    pub display_name: Option<String>,
}

/// One disciplinary sub-report as loaded from the complaint dataset.
///
/// Every cell has already passed through null-sentinel normalization, so
/// `None` is the only representation of a missing value. Serializes with the
/// source column headers, in `REQUIRED_COLUMNS` order, so unmatched rows can be written back out verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawComplaintRecord {
    /// Officer badge number the report names.
    #[serde(rename = "ID #")]
    pub badge_number: Option<BadgeNumber>,
    /// OPA case file number shared by every sub-report of a case.
    #[serde(rename = "File Number")]
    pub file_number: Option<FileNumber>,
    /// Occurrence date as written in the source.
    #[serde(rename = "Occurred Date")]
    pub occurrence_date: Option<String>,
    /// Precinct of the incident.
    #[serde(rename = "Incident Precinct")]
    pub precinct: Option<String>,
    /// Sector within the precinct.
    #[serde(rename = "Incident Sector")]
    pub sector: Option<String>,
    /// Patrol beat.
    #[serde(rename = "Incident Beat")]
    pub beat: Option<String>,
    /// Who raised the complaint.
    #[serde(rename = "Source")]
    pub source: Option<String>,
    /// Incident category.
    #[serde(rename = "Incident Type")]
    pub incident_type: Option<String>,
    /// Allegation text.
    #[serde(rename = "Allegation")]
    pub allegation: Option<String>,
    /// Disposition of the allegation.
    #[serde(rename = "Disposition")]
    pub disposition: Option<String>,
    /// Discipline imposed, if any.
    #[serde(rename = "Discipline")]
    pub discipline: Option<String>,
    /// Case status.
    #[serde(rename = "Case Status")]
    pub case_status: Option<String>,
    /// Finding for the allegation.
    #[serde(rename = "Finding")]
    pub finding: Option<String>,
    /// Dataset-unique sub-report id.
    #[serde(rename = "Unique Id")]
    pub unique_report_id: Option<ReportId>,
}

impl RawComplaintRecord {
    /// Value of a report-level field. Identity-sourced fields are always `None`.
    pub fn field(&self, field: ComplaintField) -> Option<&str> {
        let value = match field {
            ComplaintField::UniqueId => &self.unique_report_id,
            ComplaintField::Precinct => &self.precinct,
            ComplaintField::Sector => &self.sector,
            ComplaintField::Beat => &self.beat,
            ComplaintField::Source => &self.source,
            ComplaintField::IncidentType => &self.incident_type,
            ComplaintField::Allegation => &self.allegation,
            ComplaintField::Disposition => &self.disposition,
            ComplaintField::Discipline => &self.discipline,
            ComplaintField::CaseStatus => &self.case_status,
            ComplaintField::Finding => &self.finding,
            ComplaintField::BadgeNumber => &self.badge_number,
            ComplaintField::OfficerId | ComplaintField::OfficerName => return None,
        };
        value.as_deref()
    }

    fn set_field(&mut self, field: ComplaintField, value: Option<String>) {
        let slot = match field {
            ComplaintField::UniqueId => &mut self.unique_report_id,
            ComplaintField::Precinct => &mut self.precinct,
            ComplaintField::Sector => &mut self.sector,
            ComplaintField::Beat => &mut self.beat,
            ComplaintField::Source => &mut self.source,
            ComplaintField::IncidentType => &mut self.incident_type,
            ComplaintField::Allegation => &mut self.allegation,
            ComplaintField::Disposition => &mut self.disposition,
            ComplaintField::Discipline => &mut self.discipline,
            ComplaintField::CaseStatus => &mut self.case_status,
            ComplaintField::Finding => &mut self.finding,
            ComplaintField::BadgeNumber => &mut self.badge_number,
            ComplaintField::OfficerId | ComplaintField::OfficerName => return,
        };
        *slot = value;
    }
}

/// A complaint sub-report joined to its officer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedComplaintRecord {
    /// The source report.
    pub report: RawComplaintRecord,
    /// Internal id of the matched officer.
    pub internal_id: OfficerId,
    /// Display name of the matched officer.
    pub display_name: Option<String>,
}

impl NormalizedComplaintRecord {
    /// Value of any aggregatable field, including identity-sourced ones.
    pub fn field(&self, field: ComplaintField) -> Option<&str> {
        match field {
            ComplaintField::OfficerId => Some(self.internal_id.as_str()),
            ComplaintField::OfficerName => self.display_name.as_deref(),
            other => self.report.field(other),
        }
    }
}

/// Folded value of one field across a case's sub-reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// First-seen value.
    Scalar(Option<String>),
    /// Every sub-report's value, in input order.
    List(Vec<Option<String>>),
}

/// One case: every normalized report sharing (file number, occurrence date).
///
/// Every `FieldValue::List` holds exactly `sub_report_count` entries, and index
/// `i` of each list refers to the same sub-report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedCase {
    /// Zero-based position of the case in aggregation order.
    pub case_index: usize,
    /// Case file number.
    pub file_number: FileNumber,
    /// Parsed occurrence date.
    pub occurrence_date: NaiveDate,
    /// Occurrence date exactly as it appeared in the group key.
    pub raw_occurrence_date: String,
    /// Number of sub-reports folded into this case.
    pub sub_report_count: usize,
    /// Folded per-field values.
    pub fields: IndexMap<ComplaintField, FieldValue>,
}

impl AggregatedCase {
    /// Case-level value of `field`; lists yield their first entry.
    pub fn scalar(&self, field: ComplaintField) -> Option<&str> {
        match self.fields.get(&field)? {
            FieldValue::Scalar(value) => value.as_deref(),
            FieldValue::List(values) => values.first().and_then(|value| value.as_deref()),
        }
    }

    /// Value of `field` for sub-report `idx`; scalars apply to every sub-report.
    pub fn value_at(&self, field: ComplaintField, idx: usize) -> Option<&str> {
        match self.fields.get(&field)? {
            FieldValue::Scalar(value) => value.as_deref(),
            FieldValue::List(values) => values.get(idx).and_then(|value| value.as_deref()),
        }
    }

    /// Per-sub-report values of `field`, always `sub_report_count` long.
    pub fn values(&self, field: ComplaintField) -> Vec<Option<&str>> {
        (0..self.sub_report_count)
            .map(|idx| self.value_at(field, idx))
            .collect()
    }

    /// True when every list field has one entry per sub-report.
    pub fn lists_are_aligned(&self) -> bool {
        self.fields.values().all(|value| match value {
            FieldValue::Scalar(_) => true,
            FieldValue::List(values) => values.len() == self.sub_report_count,
        })
    }

    /// Distinct internal officer ids in first-seen order.
    pub fn officer_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.values(ComplaintField::OfficerId).into_iter().flatten() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Expand the case back into one normalized record per sub-report.
    ///
    /// Scalar fields are repeated on every record, so re-aggregating the
    /// output reproduces this case.
    pub fn flatten(&self) -> Vec<NormalizedComplaintRecord> {
        (0..self.sub_report_count)
            .map(|idx| {
                let mut report = RawComplaintRecord {
                    file_number: Some(self.file_number.clone()),
                    occurrence_date: Some(self.raw_occurrence_date.clone()),
                    ..RawComplaintRecord::default()
                };
                for field in self.fields.keys() {
                    report.set_field(*field, self.value_at(*field, idx).map(str::to_string));
                }
                NormalizedComplaintRecord {
                    report,
                    internal_id: self
                        .value_at(ComplaintField::OfficerId, idx)
                        .unwrap_or_default()
                        .to_string(),
                    display_name: self
                        .value_at(ComplaintField::OfficerName, idx)
                        .map(str::to_string),
                }
            })
            .collect()
    }
}

/// Narrative fields derived from one case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseNarrative {
    /// Pseudo-address built from precinct, sector, and beat.
    pub address: String,
    /// HTML narrative covering every sub-report.
    pub description: String,
}

/// One row of the case import file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutputRecord {
    /// Report-number label, e.g. `OPA Case 2021OPA-0100`.
    pub report_number: String,
    /// Occurrence date as `YYYY-MM-DD`.
    pub date: String,
    /// Pseudo-address.
    pub street_name: String,
    /// Narrative description.
    pub description: String,
    /// Distinct officer ids joined by `|`.
    pub officer_ids: String,
    /// Synthetic row id, e.g. `#12`.
    pub id: String,
    /// Department name constant.
    pub department_name: String,
    /// City constant.
    pub city: String,
    /// State constant.
    pub state: String,
}

/// One row of the link import file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseLinkRecord {
    /// Published case-document URL.
    pub url: LinkUrl,
    /// Link title.
    pub title: String,
    /// Synthetic id of the linked case row.
    #[serde(rename = "incident_ids")]
    pub case_reference: String,
    /// Officer ids carried over from the case row.
    pub officer_ids: String,
    /// Link type constant.
    pub link_type: String,
    /// Author constant.
    pub author: String,
    /// Left empty so the importer assigns one.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case_with(fields: Vec<(ComplaintField, FieldValue)>, count: usize) -> AggregatedCase {
        AggregatedCase {
            case_index: 0,
            file_number: "2021OPA-0100".to_string(),
            occurrence_date: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
            raw_occurrence_date: "2021-05-01".to_string(),
            sub_report_count: count,
            fields: fields.into_iter().collect(),
        }
    }

    #[test]
    fn scalar_values_broadcast_to_every_sub_report() {
        let case = case_with(
            vec![
                (
                    ComplaintField::Source,
                    FieldValue::Scalar(Some("Internal".into())),
                ),
                (
                    ComplaintField::Allegation,
                    FieldValue::List(vec![Some("A".into()), None]),
                ),
            ],
            2,
        );
        assert_eq!(
            case.values(ComplaintField::Source),
            vec![Some("Internal"), Some("Internal")]
        );
        assert_eq!(case.values(ComplaintField::Allegation), vec![Some("A"), None]);
        assert_eq!(case.scalar(ComplaintField::Allegation), Some("A"));
        assert_eq!(case.scalar(ComplaintField::Finding), None);
        assert!(case.lists_are_aligned());
    }

    #[test]
    fn officer_ids_are_distinct_in_first_seen_order() {
        let case = case_with(
            vec![(
                ComplaintField::OfficerId,
                FieldValue::List(vec![Some("9".into()), Some("7".into()), Some("9".into())]),
            )],
            3,
        );
        assert_eq!(case.officer_ids(), vec!["9", "7"]);
    }

    #[test]
    fn misaligned_lists_are_detected() {
        let case = case_with(
            vec![(
                ComplaintField::Finding,
                FieldValue::List(vec![Some("Sustained".into())]),
            )],
            2,
        );
        assert!(!case.lists_are_aligned());
    }

    #[test]
    fn flatten_restores_group_key_and_identity() {
        let case = case_with(
            vec![
                (
                    ComplaintField::OfficerId,
                    FieldValue::List(vec![Some("7".into()), Some("8".into())]),
                ),
                (
                    ComplaintField::OfficerName,
                    FieldValue::List(vec![Some("Ann Lee".into()), None]),
                ),
                (
                    ComplaintField::Beat,
                    FieldValue::Scalar(Some("B2".into())),
                ),
            ],
            2,
        );
        let flat = case.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[1].internal_id, "8");
        assert_eq!(flat[1].display_name, None);
        assert_eq!(flat[0].display_name.as_deref(), Some("Ann Lee"));
        assert_eq!(flat[1].report.beat.as_deref(), Some("B2"));
        assert_eq!(flat[0].report.file_number.as_deref(), Some("2021OPA-0100"));
        assert_eq!(flat[0].report.occurrence_date.as_deref(), Some("2021-05-01"));
    }
}
