//! Case rows and the three output files written per run.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::OutputConstants;
use crate::constants::complaints::REQUIRED_COLUMNS;
use crate::constants::output::{
    DATE_FORMAT, INCIDENTS_SUFFIX, LINKS_SUFFIX, MISSING_SUFFIX, OFFICER_ID_DELIMITER,
};
use crate::data::{
    AggregatedCase, CaseLinkRecord, CaseNarrative, CaseOutputRecord, RawComplaintRecord,
};
use crate::errors::ImportError;
use crate::transport::fs::{TableRow, suffixed_output_path, write_table};

impl TableRow for CaseOutputRecord {
    const COLUMNS: &'static [&'static str] = &[
        "report_number",
        "date",
        "street_name",
        "description",
        "officer_ids",
        "id",
        "department_name",
        "city",
        "state",
    ];
}

impl TableRow for CaseLinkRecord {
    const COLUMNS: &'static [&'static str] = &[
        "url",
        "title",
        "incident_ids",
        "officer_ids",
        "link_type",
        "author",
        "id",
    ];
}

impl TableRow for RawComplaintRecord {
    const COLUMNS: &'static [&'static str] = &REQUIRED_COLUMNS;
}

/// Reduce one case and its narrative to an output row.
pub fn case_row(
    case: &AggregatedCase,
    narrative: CaseNarrative,
    constants: &OutputConstants,
) -> CaseOutputRecord {
    CaseOutputRecord {
        report_number: format!("{}{}", constants.report_number_prefix, case.file_number),
        date: case.occurrence_date.format(DATE_FORMAT).to_string(),
        street_name: narrative.address,
        description: narrative.description,
        officer_ids: case.officer_ids().join(OFFICER_ID_DELIMITER),
        id: format!("#{}", case.case_index),
        department_name: constants.department_name.clone(),
        city: constants.city.clone(),
        state: constants.state.clone(),
    }
}

/// Files produced by one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    /// Case import file.
    pub incidents: PathBuf,
    /// Link import file.
    pub links: PathBuf,
    /// Unmatched complaint reports.
    pub missing: PathBuf,
}

impl OutputPaths {
    /// Derive the three sibling paths from a base output path.
    pub fn from_base(base: &Path) -> Result<Self, ImportError> {
        Ok(Self {
            incidents: suffixed_output_path(base, INCIDENTS_SUFFIX)?,
            links: suffixed_output_path(base, LINKS_SUFFIX)?,
            missing: suffixed_output_path(base, MISSING_SUFFIX)?,
        })
    }
}

/// Writes the case, link, and missing tables next to a base path.
///
/// Existing files at the derived paths are overwritten. Every file gets its
/// header row even when it has no data rows.
#[derive(Clone, Debug)]
pub struct OutputPartitioner {
    paths: OutputPaths,
}

impl OutputPartitioner {
    /// Resolve the output paths for `base`.
    pub fn new(base: &Path) -> Result<Self, ImportError> {
        Ok(Self {
            paths: OutputPaths::from_base(base)?,
        })
    }

    /// Paths this partitioner writes to.
    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// Write all three tables.
    pub fn write(
        &self,
        cases: &[CaseOutputRecord],
        links: &[CaseLinkRecord],
        missing: &[RawComplaintRecord],
    ) -> Result<&OutputPaths, ImportError> {
        write_table(&self.paths.incidents, cases)?;
        write_table(&self.paths.links, links)?;
        write_table(&self.paths.missing, missing)?;
        info!(
            "[oversight:output] wrote {} cases to {}, {} links to {}, {} unmatched reports to {}",
            cases.len(),
            self.paths.incidents.display(),
            links.len(),
            self.paths.links.display(),
            missing.len(),
            self.paths.missing.display()
        );
        Ok(&self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComplaintField;
    use crate::data::FieldValue;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn sample_case() -> AggregatedCase {
        AggregatedCase {
            case_index: 12,
            file_number: "2021OPA-0100".into(),
            occurrence_date: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
            raw_occurrence_date: "05/01/2021 12:00:00 AM".into(),
            sub_report_count: 3,
            fields: [(
                ComplaintField::OfficerId,
                FieldValue::List(vec![Some("9".into()), Some("7".into()), Some("9".into())]),
            )]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn case_row_derives_label_date_ids_and_constants() {
        let narrative = CaseNarrative {
            address: "West - D2".into(),
            description: "<h4>Allegation </h4>".into(),
        };
        let row = case_row(&sample_case(), narrative, &OutputConstants::default());
        assert_eq!(row.report_number, "OPA Case 2021OPA-0100");
        assert_eq!(row.date, "2021-05-01");
        assert_eq!(row.street_name, "West - D2");
        assert_eq!(row.officer_ids, "9|7");
        assert_eq!(row.id, "#12");
        assert_eq!(row.department_name, "Seattle Police Department");
        assert_eq!(row.city, "Seattle");
        assert_eq!(row.state, "WA");
    }

    #[test]
    fn partitioner_writes_three_files_with_headers() {
        let temp = tempdir().unwrap();
        let partitioner = OutputPartitioner::new(&temp.path().join("opa.csv")).unwrap();
        let paths = partitioner.write(&[], &[], &[]).unwrap();
        assert_eq!(paths.incidents, temp.path().join("opa__incidents.csv"));
        assert_eq!(paths.links, temp.path().join("opa__links.csv"));
        assert_eq!(paths.missing, temp.path().join("opa__missing.csv"));
        assert_eq!(
            fs::read_to_string(&paths.incidents).unwrap(),
            "report_number,date,street_name,description,officer_ids,id,department_name,city,state\n"
        );
        assert_eq!(
            fs::read_to_string(&paths.links).unwrap(),
            "url,title,incident_ids,officer_ids,link_type,author,id\n"
        );
        assert!(
            fs::read_to_string(&paths.missing)
                .unwrap()
                .starts_with("ID #,File Number,Occurred Date,")
        );
    }

    #[test]
    fn missing_rows_render_absent_cells_empty() {
        let temp = tempdir().unwrap();
        let partitioner = OutputPartitioner::new(&temp.path().join("run")).unwrap();
        let report = RawComplaintRecord {
            badge_number: Some("999".into()),
            file_number: Some("2021OPA-0300".into()),
            unique_report_id: Some("u-9".into()),
            ..RawComplaintRecord::default()
        };
        let paths = partitioner.write(&[], &[], &[report]).unwrap();
        let text = fs::read_to_string(&paths.missing).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "999,2021OPA-0300,,,,,,,,,,,,u-9");
    }
}
