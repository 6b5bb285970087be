//! Fold joined reports into one record per case.
//!
//! A case is keyed by the exact (file number, occurrence date) strings; no
//! case folding or trimming is applied to the key. Within a case, each field
//! folds according to the `AggregationPolicy`: `OrderedList` fields collect
//! every report's value in input order, `FirstValue` fields keep the first
//! non-missing value among the case's reports. Cases are emitted in the order
//! their key first appears.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, info};

use crate::config::{AggregationPolicy, ComplaintField, FieldPolicy};
use crate::data::{AggregatedCase, FieldValue, NormalizedComplaintRecord};
use crate::errors::ImportError;
use crate::source::dates::parse_occurrence_date;
use crate::types::FileNumber;

type GroupKey = (FileNumber, String);

/// Result of one aggregation pass.
#[derive(Clone, Debug, Default)]
pub struct AggregationOutput {
    /// One case per distinct key, in first-appearance order.
    pub cases: Vec<AggregatedCase>,
    /// Reports dropped because their file number or occurrence date is missing.
    pub unkeyed_reports: usize,
}

/// Groups normalized reports by case key under a field policy table.
pub struct CaseAggregator<'a> {
    policy: &'a AggregationPolicy,
}

struct Accumulator {
    fields: IndexMap<ComplaintField, FieldValue>,
    count: usize,
}

impl Accumulator {
    fn start(policy: &AggregationPolicy, record: &NormalizedComplaintRecord) -> Self {
        let fields = ComplaintField::ALL
            .iter()
            .map(|field| {
                let value = record.field(*field).map(str::to_string);
                let folded = match policy.policy(*field) {
                    FieldPolicy::FirstValue => FieldValue::Scalar(value),
                    FieldPolicy::OrderedList => FieldValue::List(vec![value]),
                };
                (*field, folded)
            })
            .collect();
        Self { fields, count: 1 }
    }

    fn absorb(&mut self, record: &NormalizedComplaintRecord) {
        for (field, folded) in self.fields.iter_mut() {
            match folded {
                FieldValue::List(values) => values.push(record.field(*field).map(str::to_string)),
                FieldValue::Scalar(slot @ None) => {
                    *slot = record.field(*field).map(str::to_string);
                }
                FieldValue::Scalar(Some(_)) => {}
            }
        }
        self.count += 1;
    }
}

impl<'a> CaseAggregator<'a> {
    /// Create an aggregator that folds fields per `policy`.
    pub fn new(policy: &'a AggregationPolicy) -> Self {
        Self { policy }
    }

    /// Fold `records` into cases and parse each case's occurrence date.
    ///
    /// Fails with `MalformedDate` on the first case whose date matches no
    /// known layout.
    pub fn aggregate(
        &self,
        records: &[NormalizedComplaintRecord],
    ) -> Result<AggregationOutput, ImportError> {
        let mut groups: IndexMap<GroupKey, Accumulator> = IndexMap::new();
        let mut unkeyed_reports = 0usize;
        for record in records {
            let (Some(file_number), Some(occurred)) = (
                record.report.file_number.as_ref(),
                record.report.occurrence_date.as_ref(),
            ) else {
                unkeyed_reports += 1;
                continue;
            };
            match groups.entry((file_number.clone(), occurred.clone())) {
                Entry::Occupied(mut entry) => entry.get_mut().absorb(record),
                Entry::Vacant(entry) => {
                    entry.insert(Accumulator::start(self.policy, record));
                }
            }
        }
        if unkeyed_reports > 0 {
            debug!(
                "[oversight:aggregate] skipped {unkeyed_reports} reports without a file number or occurrence date"
            );
        }

        let mut cases = Vec::with_capacity(groups.len());
        for (case_index, ((file_number, raw_date), acc)) in groups.into_iter().enumerate() {
            let occurrence_date =
                parse_occurrence_date(&raw_date).ok_or_else(|| ImportError::MalformedDate {
                    file_number: file_number.clone(),
                    value: raw_date.clone(),
                })?;
            cases.push(AggregatedCase {
                case_index,
                file_number,
                occurrence_date,
                raw_occurrence_date: raw_date,
                sub_report_count: acc.count,
                fields: acc.fields,
            });
        }
        info!(
            "[oversight:aggregate] folded {} reports into {} cases",
            records.len() - unkeyed_reports,
            cases.len()
        );
        Ok(AggregationOutput {
            cases,
            unkeyed_reports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawComplaintRecord;

    fn record(file: &str, date: &str, officer: &str, allegation: &str) -> NormalizedComplaintRecord {
        NormalizedComplaintRecord {
            report: RawComplaintRecord {
                file_number: Some(file.into()),
                occurrence_date: Some(date.into()),
                allegation: Some(allegation.into()),
                precinct: Some(format!("precinct-{allegation}")),
                badge_number: Some("123".into()),
                ..RawComplaintRecord::default()
            },
            internal_id: officer.into(),
            display_name: None,
        }
    }

    #[test]
    fn groups_share_key_and_preserve_input_order() {
        let policy = AggregationPolicy::default();
        let out = CaseAggregator::new(&policy)
            .aggregate(&[
                record("2021OPA-0100", "2021-05-01", "7", "A"),
                record("2021OPA-0200", "2021-06-01", "8", "X"),
                record("2021OPA-0100", "2021-05-01", "9", "B"),
            ])
            .unwrap();
        assert_eq!(out.cases.len(), 2);
        let first = &out.cases[0];
        assert_eq!(first.file_number, "2021OPA-0100");
        assert_eq!(first.case_index, 0);
        assert_eq!(first.sub_report_count, 2);
        assert_eq!(
            first.values(ComplaintField::Allegation),
            vec![Some("A"), Some("B")]
        );
        assert_eq!(
            first.values(ComplaintField::OfficerId),
            vec![Some("7"), Some("9")]
        );
        assert_eq!(out.cases[1].case_index, 1);
    }

    #[test]
    fn first_value_fields_keep_the_first_report() {
        let policy = AggregationPolicy::default();
        let out = CaseAggregator::new(&policy)
            .aggregate(&[
                record("F-1", "2021-05-01", "7", "A"),
                record("F-1", "2021-05-01", "7", "B"),
            ])
            .unwrap();
        let case = &out.cases[0];
        assert_eq!(
            case.fields.get(&ComplaintField::Precinct),
            Some(&FieldValue::Scalar(Some("precinct-A".to_string())))
        );
    }

    #[test]
    fn first_value_fields_skip_missing_leading_values() {
        let policy = AggregationPolicy::default();
        let mut sparse = record("F-1", "2021-05-01", "7", "A");
        sparse.report.precinct = None;
        let mut full = record("F-1", "2021-05-01", "8", "B");
        full.report.source = Some("Internal".into());
        let mut late = record("F-1", "2021-05-01", "9", "C");
        late.report.source = Some("Complainant".into());
        let out = CaseAggregator::new(&policy)
            .aggregate(&[sparse, full, late])
            .unwrap();
        let case = &out.cases[0];
        assert_eq!(case.scalar(ComplaintField::Precinct), Some("precinct-B"));
        assert_eq!(case.scalar(ComplaintField::Source), Some("Internal"));
        assert_eq!(case.scalar(ComplaintField::Beat), None);
        assert_eq!(
            case.values(ComplaintField::OfficerId),
            vec![Some("7"), Some("8"), Some("9")]
        );

        let again = CaseAggregator::new(&policy)
            .aggregate(&case.flatten())
            .unwrap();
        assert_eq!(&again.cases[0], case);
    }

    #[test]
    fn same_file_number_on_different_dates_forms_separate_cases() {
        let policy = AggregationPolicy::default();
        let out = CaseAggregator::new(&policy)
            .aggregate(&[
                record("F-1", "2021-05-01", "7", "A"),
                record("F-1", "2021-05-02", "7", "B"),
            ])
            .unwrap();
        assert_eq!(out.cases.len(), 2);
    }

    #[test]
    fn key_match_is_byte_exact() {
        let policy = AggregationPolicy::default();
        let out = CaseAggregator::new(&policy)
            .aggregate(&[
                record("2021OPA-0100", "2021-05-01", "7", "A"),
                record("2021opa-0100", "2021-05-01", "7", "B"),
            ])
            .unwrap();
        assert_eq!(out.cases.len(), 2);
    }

    #[test]
    fn every_list_field_has_one_entry_per_report() {
        let policy = AggregationPolicy::default();
        let records: Vec<_> = (0..5)
            .map(|i| record("F-1", "2021-05-01", &i.to_string(), "A"))
            .collect();
        let out = CaseAggregator::new(&policy).aggregate(&records).unwrap();
        let case = &out.cases[0];
        assert!(case.lists_are_aligned());
        for field in policy.list_fields() {
            match case.fields.get(&field) {
                Some(FieldValue::List(values)) => assert_eq!(values.len(), 5),
                other => panic!("{} not folded as list: {other:?}", field.as_str()),
            }
        }
    }

    #[test]
    fn policy_table_controls_folding() {
        let policy = AggregationPolicy::all_first();
        let out = CaseAggregator::new(&policy)
            .aggregate(&[
                record("F-1", "2021-05-01", "7", "A"),
                record("F-1", "2021-05-01", "8", "B"),
            ])
            .unwrap();
        let case = &out.cases[0];
        assert_eq!(case.sub_report_count, 2);
        assert_eq!(
            case.fields.get(&ComplaintField::Allegation),
            Some(&FieldValue::Scalar(Some("A".to_string())))
        );
    }

    #[test]
    fn reports_without_key_parts_are_counted_and_skipped() {
        let policy = AggregationPolicy::default();
        let mut unkeyed = record("F-1", "2021-05-01", "7", "A");
        unkeyed.report.occurrence_date = None;
        let out = CaseAggregator::new(&policy)
            .aggregate(&[unkeyed, record("F-2", "2021-05-01", "7", "A")])
            .unwrap();
        assert_eq!(out.unkeyed_reports, 1);
        assert_eq!(out.cases.len(), 1);
    }

    #[test]
    fn malformed_dates_fail_the_pass() {
        let policy = AggregationPolicy::default();
        let err = CaseAggregator::new(&policy)
            .aggregate(&[record("F-1", "sometime in May", "7", "A")])
            .unwrap_err();
        match err {
            ImportError::MalformedDate { file_number, value } => {
                assert_eq!(file_number, "F-1");
                assert_eq!(value, "sometime in May");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn date_layouts_parse_to_calendar_dates() {
        let policy = AggregationPolicy::default();
        let out = CaseAggregator::new(&policy)
            .aggregate(&[record("F-1", "05/01/2021 12:00:00 AM", "7", "A")])
            .unwrap();
        assert_eq!(
            out.cases[0].occurrence_date,
            chrono::NaiveDate::from_ymd_opt(2021, 5, 1).unwrap()
        );
        assert_eq!(out.cases[0].raw_occurrence_date, "05/01/2021 12:00:00 AM");
    }
}
