//! Address and narrative text for aggregated cases.
//!
//! The markup is consumed verbatim by the downstream importer, so the tags,
//! labels, and blank lines here are part of the output contract.

use crate::config::ComplaintField;
use crate::constants::narrative::{ADDRESS_SEPARATOR, LABEL_DASH};
use crate::data::{AggregatedCase, CaseNarrative};
use crate::utils::or_empty;

/// Builds the address and description of a case.
#[derive(Clone, Debug)]
pub struct NarrativeComposer<'a> {
    legend_url: &'a str,
}

impl<'a> NarrativeComposer<'a> {
    /// Create a composer that links every narrative to `legend_url`.
    pub fn new(legend_url: &'a str) -> Self {
        Self { legend_url }
    }

    /// Derive both narrative fields of `case`.
    pub fn compose(&self, case: &AggregatedCase) -> CaseNarrative {
        CaseNarrative {
            address: compose_address(case),
            description: compose_description(case, self.legend_url),
        }
    }
}

/// Join precinct, sector, and beat with `" - "`, skipping missing parts.
pub fn compose_address(case: &AggregatedCase) -> String {
    [
        ComplaintField::Precinct,
        ComplaintField::Sector,
        ComplaintField::Beat,
    ]
    .into_iter()
    .filter_map(|field| case.scalar(field))
    .filter(|part| !part.trim().is_empty())
    .collect::<Vec<_>>()
    .join(ADDRESS_SEPARATOR)
}

/// Render one block per sub-report followed by the case-level trailer.
///
/// Block headings are numbered only when the case has more than one
/// sub-report. Missing values render as empty strings.
pub fn compose_description(case: &AggregatedCase, legend_url: &str) -> String {
    let count = case.sub_report_count;
    let mut desc = String::new();
    for idx in 0..count {
        let value = |field: ComplaintField| or_empty(case.value_at(field, idx));
        let allegation = value(ComplaintField::Allegation);
        let mut label = if count > 1 {
            format!("{} ", idx + 1)
        } else {
            " ".to_string()
        };
        if !allegation.is_empty() {
            label.push_str(LABEL_DASH);
        }
        desc.push_str(&format!("<h4>Allegation {label}{allegation}</h4>"));
        desc.push_str(&format!(
            "<b>Name:</b> {}\n<b>Badge #:</b> {}\n<b>Disposition:</b> {}\n<b>Discipline:</b> {}\n<b>Incident Type:</b> {}\n<b>Finding:</b> {}\n\n",
            value(ComplaintField::OfficerName),
            value(ComplaintField::BadgeNumber),
            value(ComplaintField::Disposition),
            value(ComplaintField::Discipline),
            value(ComplaintField::IncidentType),
            value(ComplaintField::Finding),
        ));
    }
    desc.push_str(&format!(
        "<b>Source:</b> {}\n<b>Case Status:</b> {}\n<a href=\"{legend_url}\" target=\"_blank\" rel=\"noopener noreferrer\"><i>Legend</i></a>\n",
        or_empty(case.scalar(ComplaintField::Source)),
        or_empty(case.scalar(ComplaintField::CaseStatus)),
    ));
    desc.trim().to_string()
}
