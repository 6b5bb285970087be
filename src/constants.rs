/// Column headers of the identity registry export.
pub mod identity {
    /// Internal officer id column.
    pub const COL_ID: &str = "id";
    /// Badge number column used as the join key.
    pub const COL_BADGE_NUMBER: &str = "badge number";
    /// Optional pre-joined display name column.
    pub const COL_NAME: &str = "name";
    /// Optional first-name column.
    pub const COL_FIRST_NAME: &str = "first name";
    /// Optional last-name column.
    pub const COL_LAST_NAME: &str = "last name";
    /// Dataset label used in errors and logs.
    pub const DATASET_NAME: &str = "identity registry";
}

/// Column headers of the public complaint dataset.
pub mod complaints {
    /// Badge number of the named employee.
    pub const COL_BADGE_NUMBER: &str = "ID #";
    /// Case file number.
    pub const COL_FILE_NUMBER: &str = "File Number";
    /// Occurrence date of the incident.
    pub const COL_OCCURRED_DATE: &str = "Occurred Date";
    /// Precinct where the incident occurred.
    pub const COL_PRECINCT: &str = "Incident Precinct";
    /// Sector where the incident occurred.
    pub const COL_SECTOR: &str = "Incident Sector";
    /// Beat where the incident occurred.
    pub const COL_BEAT: &str = "Incident Beat";
    /// Complaint source.
    pub const COL_SOURCE: &str = "Source";
    /// Incident type of the sub-report.
    pub const COL_INCIDENT_TYPE: &str = "Incident Type";
    /// Alleged violation.
    pub const COL_ALLEGATION: &str = "Allegation";
    /// Disposition of the allegation.
    pub const COL_DISPOSITION: &str = "Disposition";
    /// Discipline imposed.
    pub const COL_DISCIPLINE: &str = "Discipline";
    /// Status of the case.
    pub const COL_CASE_STATUS: &str = "Case Status";
    /// Finding of the allegation.
    pub const COL_FINDING: &str = "Finding";
    /// Dataset-unique sub-report id.
    pub const COL_UNIQUE_ID: &str = "Unique Id";
    /// Dataset label used in errors and logs.
    pub const DATASET_NAME: &str = "complaints";

    /// Every column the complaint loader requires, in missing-output order.
    pub const REQUIRED_COLUMNS: [&str; 14] = [
        COL_BADGE_NUMBER,
        COL_FILE_NUMBER,
        COL_OCCURRED_DATE,
        COL_PRECINCT,
        COL_SECTOR,
        COL_BEAT,
        COL_SOURCE,
        COL_INCIDENT_TYPE,
        COL_ALLEGATION,
        COL_DISPOSITION,
        COL_DISCIPLINE,
        COL_CASE_STATUS,
        COL_FINDING,
        COL_UNIQUE_ID,
    ];
}

/// Named-employee mapping joined onto complaints before loading.
///
/// The table shares one or more columns with the complaint export (usually
/// `Unique Id`) and supplies the columns the export lacks, such as `ID #`.
pub mod employee_mapping {
    /// Dataset label used in errors and logs.
    pub const DATASET_NAME: &str = "named employee mapping";
}

/// Column headers and constants of the closed-case-summary link table.
pub mod case_summaries {
    /// Combined `<case> (<url>)` column.
    pub const COL_CASE: &str = "Case #";
    /// Dataset label used in errors and logs.
    pub const DATASET_NAME: &str = "closed case summaries";
}

/// Defaults applied to every pipeline run unless overridden in `PipelineConfig`.
pub mod defaults {
    /// Public OPA complaint dataset export.
    pub const COMPLAINTS_URL: &str =
        "https://data.seattle.gov/api/views/99yi-dthu/rows.csv?accessType=DOWNLOAD";
    /// Public closed-case-summary listing export.
    pub const CASE_SUMMARIES_URL: &str =
        "https://data.seattle.gov/api/views/m33m-84uk/rows.csv?accessType=DOWNLOAD";
    /// Placeholder occurrence dates before this cutoff mean "unknown".
    pub const CUTOFF_DATE: (i32, u32, u32) = (1950, 1, 1);
    /// Tokens treated as missing values in source tables.
    pub const NULL_SENTINELS: [&str; 8] = ["", "-", "NaN", "nan", "NULL", "null", "N/A", "#N/A"];
    /// Prefix prepended to each file number to form the report number.
    pub const REPORT_NUMBER_PREFIX: &str = "OPA Case ";
    /// Department recorded on every case row.
    pub const DEPARTMENT_NAME: &str = "Seattle Police Department";
    /// City recorded on every case row.
    pub const CITY: &str = "Seattle";
    /// State recorded on every case row.
    pub const STATE: &str = "WA";
    /// Prefix prepended to each report number to form the link title.
    pub const LINK_TITLE_PREFIX: &str = "Closed Case Summary ";
    /// Link type understood by the importer.
    pub const LINK_TYPE: &str = "Link";
    /// Author recorded on every link row.
    pub const LINK_AUTHOR: &str = "Seattle Office of Police Accountability";
    /// Legend link appended to every case narrative.
    pub const LEGEND_URL: &str = "https://sea-scanners.wiki/police/opa-case-legend";
}

/// Tokens stripped from report numbers when deriving case-name keys.
pub mod case_key {
    /// Leading report-number label, stripped once.
    pub const REPORT_LABEL_TOKEN: &str = "OPA Case ";
    /// Office token removed everywhere it appears.
    pub const OFFICE_TOKEN: &str = "OPA";
}

/// Output file naming and serialization constants.
pub mod output {
    /// Suffix of the case table file.
    pub const INCIDENTS_SUFFIX: &str = "incidents";
    /// Suffix of the link table file.
    pub const LINKS_SUFFIX: &str = "links";
    /// Suffix of the unmatched-report file.
    pub const MISSING_SUFFIX: &str = "missing";
    /// Separator between the output stem and a suffix.
    pub const SUFFIX_SEPARATOR: &str = "__";
    /// Extension of every output file.
    pub const EXTENSION: &str = "csv";
    /// Delimiter used to serialize officer id sets.
    pub const OFFICER_ID_DELIMITER: &str = "|";
    /// Format of the `date` output column.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Narrative markup fragments.
pub mod narrative {
    /// Separator between address components.
    pub const ADDRESS_SEPARATOR: &str = " - ";
    /// Separator between a block number and its allegation text.
    pub const LABEL_DASH: &str = "— ";
}
