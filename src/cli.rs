use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, error::ErrorKind};
use tracing_subscriber::EnvFilter;

use crate::config::PipelineConfig;
use crate::constants::defaults;
use crate::pipeline::{PipelineInputs, PipelineReport, run_pipeline};
use crate::source::dates::parse_iso_date;
use crate::source::{DatasetLocation, DefaultFetcher};

#[derive(Debug, Parser)]
#[command(
    name = "opa_import",
    disable_help_subcommand = true,
    about = "Build incident and link import files from OPA complaint data",
    long_about = "Join public OPA complaint reports to an officer identity registry, fold them into one row per case with an HTML narrative, and write incident, link, and unmatched-report CSV files.",
    after_help = "Dataset arguments accept either a local path or an http(s) URL. Set RUST_LOG to adjust log verbosity (default: info)."
)]
/// CLI for `opa_import`.
///
/// Common usage:
/// - `opa_import officers.csv links.json out/opa.csv` writes `out/opa__incidents.csv`,
///   `out/opa__links.csv`, and `out/opa__missing.csv`
/// - Add `--case-summaries <URL>` to fill links from the closed-case-summary listing
struct OpaImportCli {
    #[arg(value_name = "IDENTITY", help = "Officer identity registry CSV")]
    identity: String,
    #[arg(
        value_name = "LINKS",
        help = "JSON object mapping case names to published document URLs"
    )]
    links: Option<String>,
    #[arg(
        value_name = "OUTPUT",
        help = "Base output path; the three files are written next to it"
    )]
    output: Option<PathBuf>,
    #[arg(
        long,
        value_name = "PATH_OR_URL",
        default_value = defaults::COMPLAINTS_URL,
        help = "Complaint dataset CSV"
    )]
    complaints: String,
    #[arg(
        long = "employee-mapping",
        value_name = "PATH_OR_URL",
        help = "CSV joined onto the complaints on their shared columns, e.g. Unique Id to ID #"
    )]
    employee_mapping: Option<String>,
    #[arg(
        long = "case-summaries",
        value_name = "PATH_OR_URL",
        help = "Closed-case-summary CSV used as a secondary link source"
    )]
    case_summaries: Option<String>,
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        value_parser = parse_cutoff_arg,
        help = "Drop cases that occurred before this date [default: 1950-01-01]"
    )]
    cutoff: Option<NaiveDate>,
    #[arg(
        long = "keep-duplicates",
        help = "Keep complaint rows identical in every column instead of collapsing them"
    )]
    keep_duplicates: bool,
}

/// Parse `args_iter` (without the program name), run the import, and print a summary.
pub fn run_opa_import<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let Some(cli) = parse_cli::<OpaImportCli, _>(
        std::iter::once("opa_import".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let inputs = PipelineInputs {
        identity: DatasetLocation::parse(&cli.identity),
        complaints: DatasetLocation::parse(&cli.complaints),
        employee_mapping: cli.employee_mapping.as_deref().map(DatasetLocation::parse),
        link_mapping: cli.links.as_deref().map(DatasetLocation::parse),
        case_summaries: cli.case_summaries.as_deref().map(DatasetLocation::parse),
    };
    let mut config = PipelineConfig::default().with_drop_duplicate_reports(!cli.keep_duplicates);
    if let Some(cutoff) = cli.cutoff {
        config = config.with_cutoff_date(cutoff);
    }
    let output = cli.output.unwrap_or_else(|| PathBuf::from("opa.csv"));

    let report = run_pipeline(&DefaultFetcher, &inputs, &config, &output)?;
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &PipelineReport) {
    println!("=== opa import ===");
    println!("identity records   : {}", report.identity_records);
    println!(
        "complaint reports  : {} ({} duplicates dropped)",
        report.complaint_reports, report.duplicate_reports
    );
    println!(
        "matched reports    : {} of {} ({:.1}%)",
        report.join.matched,
        report.join.total,
        report.join.match_rate() * 100.0
    );
    println!(
        "cases              : {} ({} before cutoff dropped)",
        report.case_rows, report.filtered_cases
    );
    println!("links              : {}", report.link_rows);
    if let Some(paths) = &report.paths {
        println!("incidents file     : {}", paths.incidents.display());
        println!("links file         : {}", paths.links.display());
        println!("missing file       : {}", paths.missing.display());
    }
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_cutoff_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_iso_date(raw)
        .ok_or_else(|| format!("Could not parse --cutoff value '{raw}' as YYYY-MM-DD"))
}
