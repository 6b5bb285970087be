//! End-to-end run: fetch, join, aggregate, narrate, filter, link, write.
//!
//! Every input is fetched and validated before any output file is touched,
//! so a failed run never leaves a partial set of outputs behind.

use std::path::Path;

use tracing::{debug, info};

use crate::aggregate::CaseAggregator;
use crate::config::PipelineConfig;
use crate::constants::{case_summaries, complaints, employee_mapping, identity};
use crate::data::{CaseLinkRecord, CaseOutputRecord, RawComplaintRecord};
use crate::errors::ImportError;
use crate::filter::CaseFilter;
use crate::identity::IdentityIndex;
use crate::links::{LinkMapping, LinkMatcher};
use crate::metrics::JoinStats;
use crate::narrative::NarrativeComposer;
use crate::normalize::{ComplaintNormalizer, load_complaints};
use crate::output::{OutputPartitioner, OutputPaths, case_row};
use crate::source::{DatasetFetcher, DatasetLocation, Table};
use crate::utils::NullSentinels;

const LINK_MAPPING_DATASET: &str = "case link mapping";

/// Where each input dataset is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineInputs {
    /// Officer identity registry (CSV).
    pub identity: DatasetLocation,
    /// Complaint dataset (CSV).
    pub complaints: DatasetLocation,
    /// Named-employee mapping (CSV) inner-joined onto the complaints on their shared columns.
    pub employee_mapping: Option<DatasetLocation>,
    /// JSON object of case name to published document URL.
    pub link_mapping: Option<DatasetLocation>,
    /// Closed-case-summary listing (CSV) used as a secondary link source.
    pub case_summaries: Option<DatasetLocation>,
}

/// Row counts for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Indexed identity records.
    pub identity_records: usize,
    /// Complaint rows loaded, after the employee-mapping join when one is given.
    pub complaint_reports: usize,
    /// Complaint rows identical in every column, removed before the identity join.
    pub duplicate_reports: usize,
    /// Identity join counts.
    pub join: JoinStats,
    /// Joined reports skipped for lacking a file number or occurrence date.
    pub unkeyed_reports: usize,
    /// Cases formed by aggregation.
    pub aggregated_cases: usize,
    /// Cases removed by the date cutoff.
    pub filtered_cases: usize,
    /// Case rows in the output.
    pub case_rows: usize,
    /// Link rows in the output.
    pub link_rows: usize,
    /// Files written, once the run has reached the output stage.
    pub paths: Option<OutputPaths>,
}

/// The three output tables, before they are written.
#[derive(Clone, Debug, Default)]
pub struct PipelineTables {
    /// Case import rows.
    pub cases: Vec<CaseOutputRecord>,
    /// Link import rows.
    pub links: Vec<CaseLinkRecord>,
    /// Reports without an identity match.
    pub missing: Vec<RawComplaintRecord>,
}

/// Run every transformation stage over loaded tables.
///
/// When `employee_mapping` is given it is inner-joined onto the complaints on
/// their shared columns before duplicate removal and loading.
pub fn process(
    identity_table: &Table,
    complaint_table: &Table,
    employee_mapping: Option<&Table>,
    links: &LinkMapping,
    config: &PipelineConfig,
) -> Result<(PipelineTables, PipelineReport), ImportError> {
    let nulls = NullSentinels::new(&config.null_sentinels);
    let mut report = PipelineReport::default();

    let index = IdentityIndex::from_table(identity_table, &nulls)?;
    report.identity_records = index.len();

    let mut complaint_table = match employee_mapping {
        Some(mapping) => {
            let joined = complaint_table.natural_join(mapping)?;
            info!(
                "[oversight:pipeline] employee mapping joined {} complaint rows into {}",
                complaint_table.len(),
                joined.len()
            );
            joined
        }
        None => complaint_table.clone(),
    };
    report.complaint_reports = complaint_table.len();
    if config.drop_duplicate_reports {
        report.duplicate_reports = complaint_table.dedup_rows(&nulls);
        if report.duplicate_reports > 0 {
            debug!(
                "[oversight:pipeline] dropped {} duplicate complaint rows",
                report.duplicate_reports
            );
        }
    }
    let reports = load_complaints(&complaint_table, &nulls)?;

    let normalized = ComplaintNormalizer::new(&index).normalize(reports);
    report.join = normalized.stats;

    let aggregated = CaseAggregator::new(&config.aggregation).aggregate(&normalized.records)?;
    report.unkeyed_reports = aggregated.unkeyed_reports;
    report.aggregated_cases = aggregated.cases.len();

    let composer = NarrativeComposer::new(&config.legend_url);
    let kept = CaseFilter::new(config.cutoff_date).apply(aggregated.cases);
    report.filtered_cases = report.aggregated_cases - kept.len();

    let cases: Vec<CaseOutputRecord> = kept
        .iter()
        .map(|case| case_row(case, composer.compose(case), &config.output))
        .collect();
    let link_rows = LinkMatcher::new(links, &config.output).match_links(&cases);
    report.case_rows = cases.len();
    report.link_rows = link_rows.len();

    Ok((
        PipelineTables {
            cases,
            links: link_rows,
            missing: normalized.missing,
        },
        report,
    ))
}

/// Fetch the link sources named in `inputs`; JSON mapping entries win over
/// case-summary entries for the same case.
pub fn load_link_mapping(
    fetcher: &dyn DatasetFetcher,
    inputs: &PipelineInputs,
    nulls: &NullSentinels,
) -> Result<LinkMapping, ImportError> {
    let primary = match &inputs.link_mapping {
        Some(location) => {
            LinkMapping::from_json(&fetcher.fetch(LINK_MAPPING_DATASET, location)?)?
        }
        None => LinkMapping::default(),
    };
    let secondary = match &inputs.case_summaries {
        Some(location) => {
            let text = fetcher.fetch(case_summaries::DATASET_NAME, location)?;
            let table = Table::from_csv_text(case_summaries::DATASET_NAME, &text)?;
            LinkMapping::from_case_summaries(&table, nulls)?
        }
        None => LinkMapping::default(),
    };
    Ok(primary.merged_with(secondary))
}

/// Fetch all inputs, process them, and write the output files next to `output_base`.
pub fn run_pipeline(
    fetcher: &dyn DatasetFetcher,
    inputs: &PipelineInputs,
    config: &PipelineConfig,
    output_base: &Path,
) -> Result<PipelineReport, ImportError> {
    let partitioner = OutputPartitioner::new(output_base)?;
    let nulls = NullSentinels::new(&config.null_sentinels);

    info!("[oversight:pipeline] reading identity registry from {}", inputs.identity);
    let identity_text = fetcher.fetch(identity::DATASET_NAME, &inputs.identity)?;
    let identity_table = Table::from_csv_text(identity::DATASET_NAME, &identity_text)?;

    info!("[oversight:pipeline] reading complaints from {}", inputs.complaints);
    let complaint_text = fetcher.fetch(complaints::DATASET_NAME, &inputs.complaints)?;
    let complaint_table = Table::from_csv_text(complaints::DATASET_NAME, &complaint_text)?;

    let mapping_table = match &inputs.employee_mapping {
        Some(location) => {
            info!("[oversight:pipeline] reading employee mapping from {location}");
            let text = fetcher.fetch(employee_mapping::DATASET_NAME, location)?;
            Some(Table::from_csv_text(employee_mapping::DATASET_NAME, &text)?)
        }
        None => None,
    };

    let links = load_link_mapping(fetcher, inputs, &nulls)?;

    let (tables, mut report) = process(
        &identity_table,
        &complaint_table,
        mapping_table.as_ref(),
        &links,
        config,
    )?;
    let paths = partitioner.write(&tables.cases, &tables.links, &tables.missing)?;
    report.paths = Some(paths.clone());
    info!(
        "[oversight:pipeline] finished: {} cases, {} links, {} unmatched reports",
        report.case_rows, report.link_rows, report.join.missing
    );
    Ok(report)
}
