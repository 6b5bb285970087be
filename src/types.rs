/// Badge number used to join complaint reports to the identity registry.
/// Examples: `123`, `7654`
pub type BadgeNumber = String;
/// Stable internal officer identifier from the identity registry.
/// Examples: `7`, `#4521`
pub type OfficerId = String;
/// Accountability-office file number shared by every sub-report of a case.
/// Example: `2021OPA-0100`
pub type FileNumber = String;
/// Dataset-unique identifier of one sub-report row.
/// Example: `2021OPA-0100-1234-Allegation 1`
pub type ReportId = String;
/// Column header as it appears in a source table.
/// Examples: `File Number`, `badge number`
pub type ColumnName = String;
/// Human-readable name of an input dataset, used in errors and logs.
/// Examples: `identity registry`, `complaints`
pub type DatasetName = String;
/// Normalized case-name key used to join cases to published case documents.
/// Example: `2021-0100`
pub type CaseKey = String;
/// Published case-document URL.
/// Example: `https://www.seattle.gov/documents/Departments/OPA/ClosedCaseSummaries/2021OPA-0100ccs.pdf`
pub type LinkUrl = String;
