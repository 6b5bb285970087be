#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Case aggregation by (file number, occurrence date).
pub mod aggregate;
/// Command-line runner used by the `opa_import` binary.
pub mod cli;
/// Pipeline configuration and the aggregation policy table.
pub mod config;
/// Column names, default URLs, and output constants.
pub mod constants;
/// Record types passed between pipeline stages.
pub mod data;
/// Occurrence-date cutoff.
pub mod filter;
/// Badge-number index over the identity registry.
pub mod identity;
/// Case-document link mapping and matching.
pub mod links;
/// Join counters.
pub mod metrics;
/// Address and HTML narrative composition.
pub mod narrative;
/// Complaint loading, deduplication, and the identity join.
pub mod normalize;
/// Output rows and the three-file writer.
pub mod output;
/// End-to-end orchestration.
pub mod pipeline;
/// Dataset locations, fetchers, and CSV tables.
pub mod source;
/// Input and output transports (filesystem and HTTP).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Cell normalization and case-key helpers.
pub mod utils;

mod errors;

pub use aggregate::{AggregationOutput, CaseAggregator};
pub use config::{AggregationPolicy, ComplaintField, FieldPolicy, OutputConstants, PipelineConfig};
pub use data::{
    AggregatedCase, CaseLinkRecord, CaseNarrative, CaseOutputRecord, FieldValue, IdentityRecord,
    NormalizedComplaintRecord, RawComplaintRecord,
};
pub use errors::ImportError;
pub use filter::CaseFilter;
pub use identity::IdentityIndex;
pub use links::{LinkMapping, LinkMatcher};
pub use metrics::JoinStats;
pub use narrative::NarrativeComposer;
pub use normalize::{ComplaintNormalizer, NormalizedComplaints};
pub use output::{OutputPartitioner, OutputPaths};
pub use pipeline::{PipelineInputs, PipelineReport, PipelineTables, process, run_pipeline};
pub use source::{DatasetFetcher, DatasetLocation, DefaultFetcher, InMemoryFetcher, Table};
pub use types::{BadgeNumber, CaseKey, FileNumber, LinkUrl, OfficerId, ReportId};
pub use utils::NullSentinels;
