use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::constants::defaults;

/// Per-report field that participates in case aggregation.
///
/// The case grouping key (`File Number`, `Occurred Date`) is not listed here:
/// it is always carried as a typed scalar on the aggregated case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComplaintField {
    /// Dataset-unique sub-report id.
    UniqueId,
    /// Incident precinct.
    Precinct,
    /// Incident sector.
    Sector,
    /// Incident beat.
    Beat,
    /// Complaint source.
    Source,
    /// Incident type.
    IncidentType,
    /// Alleged violation.
    Allegation,
    /// Disposition of the allegation.
    Disposition,
    /// Discipline imposed.
    Discipline,
    /// Case status.
    CaseStatus,
    /// Finding of the allegation.
    Finding,
    /// Badge number of the named employee.
    BadgeNumber,
    /// Internal officer id attached by the identity join.
    OfficerId,
    /// Officer display name attached by the identity join.
    OfficerName,
}

impl ComplaintField {
    /// Every aggregatable field, in canonical order.
    pub const ALL: [ComplaintField; 14] = [
        ComplaintField::UniqueId,
        ComplaintField::Precinct,
        ComplaintField::Sector,
        ComplaintField::Beat,
        ComplaintField::Source,
        ComplaintField::IncidentType,
        ComplaintField::Allegation,
        ComplaintField::Disposition,
        ComplaintField::Discipline,
        ComplaintField::CaseStatus,
        ComplaintField::Finding,
        ComplaintField::BadgeNumber,
        ComplaintField::OfficerId,
        ComplaintField::OfficerName,
    ];

    /// Stable snake_case label used in logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComplaintField::UniqueId => "unique_id",
            ComplaintField::Precinct => "precinct",
            ComplaintField::Sector => "sector",
            ComplaintField::Beat => "beat",
            ComplaintField::Source => "source",
            ComplaintField::IncidentType => "incident_type",
            ComplaintField::Allegation => "allegation",
            ComplaintField::Disposition => "disposition",
            ComplaintField::Discipline => "discipline",
            ComplaintField::CaseStatus => "case_status",
            ComplaintField::Finding => "finding",
            ComplaintField::BadgeNumber => "badge_number",
            ComplaintField::OfficerId => "officer_id",
            ComplaintField::OfficerName => "officer_name",
        }
    }
}

/// How a field is folded when several reports share one case key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Keep the first non-missing value in the group.
    FirstValue,
    /// Keep every report's value, in input order.
    OrderedList,
}

/// Field-to-policy table consumed by the case aggregator.
///
/// Fields absent from the table fold as `FirstValue`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregationPolicy {
    policies: IndexMap<ComplaintField, FieldPolicy>,
}

impl AggregationPolicy {
    /// Build a table where every field takes its first value.
    pub fn all_first() -> Self {
        Self {
            policies: ComplaintField::ALL
                .iter()
                .map(|field| (*field, FieldPolicy::FirstValue))
                .collect(),
        }
    }

    /// Override the policy of one field.
    pub fn with(mut self, field: ComplaintField, policy: FieldPolicy) -> Self {
        self.policies.insert(field, policy);
        self
    }

    /// Policy applied to `field`.
    pub fn policy(&self, field: ComplaintField) -> FieldPolicy {
        self.policies
            .get(&field)
            .copied()
            .unwrap_or(FieldPolicy::FirstValue)
    }

    /// Fields folded into ordered lists.
    pub fn list_fields(&self) -> Vec<ComplaintField> {
        ComplaintField::ALL
            .iter()
            .copied()
            .filter(|field| self.policy(*field) == FieldPolicy::OrderedList)
            .collect()
    }
}

impl Default for AggregationPolicy {
    /// Per-allegation fields and officer identity become lists; case-level
    /// location, source, and status take the first value.
    fn default() -> Self {
        [
            ComplaintField::IncidentType,
            ComplaintField::Allegation,
            ComplaintField::Disposition,
            ComplaintField::Discipline,
            ComplaintField::Finding,
            ComplaintField::UniqueId,
            ComplaintField::BadgeNumber,
            ComplaintField::OfficerId,
            ComplaintField::OfficerName,
        ]
        .into_iter()
        .fold(Self::all_first(), |policy, field| {
            policy.with(field, FieldPolicy::OrderedList)
        })
    }
}

/// Constant columns written to every case and link row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputConstants {
    /// Department recorded on case rows.
    pub department_name: String,
    /// City recorded on case rows.
    pub city: String,
    /// State recorded on case rows.
    pub state: String,
    /// Prefix prepended to file numbers to form report numbers.
    pub report_number_prefix: String,
    /// Prefix prepended to report numbers to form link titles.
    pub link_title_prefix: String,
    /// Link type recorded on link rows.
    pub link_type: String,
    /// Author recorded on link rows.
    pub link_author: String,
}

impl Default for OutputConstants {
    fn default() -> Self {
        Self {
            department_name: defaults::DEPARTMENT_NAME.to_string(),
            city: defaults::CITY.to_string(),
            state: defaults::STATE.to_string(),
            report_number_prefix: defaults::REPORT_NUMBER_PREFIX.to_string(),
            link_title_prefix: defaults::LINK_TITLE_PREFIX.to_string(),
            link_type: defaults::LINK_TYPE.to_string(),
            link_author: defaults::LINK_AUTHOR.to_string(),
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Cases with an occurrence date before this are dropped.
    pub cutoff_date: NaiveDate,
    /// Cell values treated as missing at ingestion.
    pub null_sentinels: Vec<String>,
    /// Per-field fold policy used by the case aggregator.
    pub aggregation: AggregationPolicy,
    /// Constant output columns.
    pub output: OutputConstants,
    /// Legend link appended to every narrative.
    pub legend_url: String,
    /// Collapse complaint rows equal in every column before the identity join.
    pub drop_duplicate_reports: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let (year, month, day) = defaults::CUTOFF_DATE;
        Self {
            cutoff_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN),
            null_sentinels: defaults::NULL_SENTINELS
                .iter()
                .map(|token| token.to_string())
                .collect(),
            aggregation: AggregationPolicy::default(),
            output: OutputConstants::default(),
            legend_url: defaults::LEGEND_URL.to_string(),
            drop_duplicate_reports: true,
        }
    }
}

impl PipelineConfig {
    /// Override the cutoff date.
    pub fn with_cutoff_date(mut self, cutoff_date: NaiveDate) -> Self {
        self.cutoff_date = cutoff_date;
        self
    }

    /// Replace the null-sentinel token set.
    pub fn with_null_sentinels<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_sentinels = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the aggregation policy table.
    pub fn with_aggregation(mut self, aggregation: AggregationPolicy) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Replace the constant output columns.
    pub fn with_output_constants(mut self, output: OutputConstants) -> Self {
        self.output = output;
        self
    }

    /// Override the narrative legend link.
    pub fn with_legend_url(mut self, legend_url: impl Into<String>) -> Self {
        self.legend_url = legend_url.into();
        self
    }

    /// Toggle duplicate complaint row removal.
    pub fn with_drop_duplicate_reports(mut self, drop: bool) -> Self {
        self.drop_duplicate_reports = drop;
        self
    }
}
