//! Published case-document links and their join to case rows.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::OutputConstants;
use crate::constants::case_summaries as cols;
use crate::data::{CaseLinkRecord, CaseOutputRecord};
use crate::errors::ImportError;
use crate::source::Table;
use crate::types::{CaseKey, LinkUrl};
use crate::utils::{NullSentinels, case_name_key};

/// Case-name key to document URL, in source order.
///
/// Keys are stored already normalized with `case_name_key`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkMapping {
    links: IndexMap<CaseKey, LinkUrl>,
}

impl LinkMapping {
    /// Build a mapping from (case name, url) pairs; later duplicates of a key are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<LinkUrl>,
    {
        let mut links = IndexMap::new();
        for (name, url) in pairs {
            links.entry(case_name_key(name)).or_insert_with(|| url.into());
        }
        Self { links }
    }

    /// Parse a flat JSON object of case name to URL.
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| ImportError::LinkMapping(format!("not valid JSON: {err}")))?;
        let Value::Object(entries) = value else {
            return Err(ImportError::LinkMapping(
                "expected a JSON object of case name to URL".to_string(),
            ));
        };
        let mut pairs = Vec::with_capacity(entries.len());
        for (name, url) in entries {
            match url {
                Value::String(url) => pairs.push((name, url)),
                other => {
                    return Err(ImportError::LinkMapping(format!(
                        "URL for case '{name}' is not a string: {other}"
                    )));
                }
            }
        }
        let mapping = Self::from_pairs(pairs);
        info!(
            "[oversight:links] loaded {} case links from JSON mapping",
            mapping.len()
        );
        Ok(mapping)
    }

    /// Build a mapping from the closed-case-summary listing.
    ///
    /// The `Case #` column holds `<case> (<url>)`: the case is the first
    /// whitespace-separated word and the URL is the last word without its
    /// parentheses. Rows without both parts are skipped.
    pub fn from_case_summaries(table: &Table, nulls: &NullSentinels) -> Result<Self, ImportError> {
        let case_col = table.column(cols::COL_CASE)?;
        let mut skipped = 0usize;
        let mut pairs = Vec::with_capacity(table.len());
        for row in table.rows() {
            match row.value(case_col, nulls).as_deref().and_then(split_case_cell) {
                Some(pair) => pairs.push(pair),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("[oversight:links] skipped {skipped} case summary rows without a case and link");
        }
        let mapping = Self::from_pairs(pairs);
        info!(
            "[oversight:links] loaded {} case links from case summaries",
            mapping.len()
        );
        Ok(mapping)
    }

    /// Combine two mappings; entries of `self` win on shared keys.
    pub fn merged_with(mut self, other: LinkMapping) -> Self {
        for (key, url) in other.links {
            self.links.entry(key).or_insert(url);
        }
        self
    }

    /// URL registered for a normalized key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.links.get(key).map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when no link is registered.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

fn split_case_cell(cell: &str) -> Option<(String, String)> {
    let mut words = cell.split_whitespace();
    let case = words.next()?;
    let url = words.next_back()?;
    let url: String = url.chars().filter(|ch| !matches!(ch, '(' | ')')).collect();
    if url.is_empty() {
        return None;
    }
    Some((case.to_string(), url))
}

/// Inner-joins case rows to a link mapping on the normalized case-name key.
pub struct LinkMatcher<'a> {
    mapping: &'a LinkMapping,
    constants: &'a OutputConstants,
}

impl<'a> LinkMatcher<'a> {
    /// Create a matcher over `mapping`, stamping rows with `constants`.
    pub fn new(mapping: &'a LinkMapping, constants: &'a OutputConstants) -> Self {
        Self { mapping, constants }
    }

    /// One link row per case whose key is in the mapping, in case order.
    ///
    /// Cases without a mapping entry or without any officer id yield nothing.
    pub fn match_links(&self, cases: &[CaseOutputRecord]) -> Vec<CaseLinkRecord> {
        let links: Vec<CaseLinkRecord> = cases
            .iter()
            .filter(|case| !case.officer_ids.is_empty())
            .filter_map(|case| {
                let url = self.mapping.get(&case_name_key(&case.report_number))?;
                Some(CaseLinkRecord {
                    url: url.to_string(),
                    title: format!("{}{}", self.constants.link_title_prefix, case.report_number),
                    case_reference: case.id.clone(),
                    officer_ids: case.officer_ids.clone(),
                    link_type: self.constants.link_type.clone(),
                    author: self.constants.link_author.clone(),
                    id: String::new(),
                })
            })
            .collect();
        info!(
            "[oversight:links] matched {} of {} cases to {} published links",
            links.len(),
            cases.len(),
            self.mapping.len()
        );
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(report_number: &str, id: &str, officer_ids: &str) -> CaseOutputRecord {
        CaseOutputRecord {
            report_number: report_number.to_string(),
            date: "2021-05-01".to_string(),
            street_name: String::new(),
            description: String::new(),
            officer_ids: officer_ids.to_string(),
            id: id.to_string(),
            department_name: "Seattle Police Department".to_string(),
            city: "Seattle".to_string(),
            state: "WA".to_string(),
        }
    }

    #[test]
    fn json_mapping_requires_string_values() {
        assert!(LinkMapping::from_json(r#"{"0100": "https://example/0100"}"#).is_ok());
        assert!(matches!(
            LinkMapping::from_json(r#"{"0100": 5}"#),
            Err(ImportError::LinkMapping(_))
        ));
        assert!(matches!(
            LinkMapping::from_json(r#"["0100"]"#),
            Err(ImportError::LinkMapping(_))
        ));
        assert!(matches!(
            LinkMapping::from_json("{not json"),
            Err(ImportError::LinkMapping(_))
        ));
    }

    #[test]
    fn matched_case_receives_exactly_one_link() {
        let mapping = LinkMapping::from_json(r#"{"0100": "https://example/0100"}"#).unwrap();
        let constants = OutputConstants::default();
        let links = LinkMatcher::new(&mapping, &constants).match_links(&[
            case("OPA Case 0100", "#0", "7"),
            case("OPA Case 9999", "#1", "8"),
        ]);
        assert_eq!(links.len(), 1);
        let link = &links[0];
        assert_eq!(link.url, "https://example/0100");
        assert_eq!(link.title, "Closed Case Summary OPA Case 0100");
        assert_eq!(link.case_reference, "#0");
        assert_eq!(link.officer_ids, "7");
        assert_eq!(link.link_type, "Link");
        assert_eq!(link.author, "Seattle Office of Police Accountability");
        assert_eq!(link.id, "");
    }

    #[test]
    fn mapping_keys_and_report_numbers_normalize_alike() {
        let mapping = LinkMapping::from_pairs([("2021OPA-0100", "https://example/a")]);
        assert_eq!(mapping.get("2021-0100"), Some("https://example/a"));
        let constants = OutputConstants::default();
        let links = LinkMatcher::new(&mapping, &constants)
            .match_links(&[case("OPA Case 2021OPA-0100", "#3", "7|9")]);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].officer_ids, "7|9");
    }

    #[test]
    fn cases_without_officers_are_not_linked() {
        let mapping = LinkMapping::from_pairs([("0100", "https://example/0100")]);
        let constants = OutputConstants::default();
        let links =
            LinkMatcher::new(&mapping, &constants).match_links(&[case("OPA Case 0100", "#0", "")]);
        assert!(links.is_empty());
    }

    #[test]
    fn cases_sharing_a_key_each_get_a_row() {
        let mapping = LinkMapping::from_pairs([("0100", "https://example/0100")]);
        let constants = OutputConstants::default();
        let links = LinkMatcher::new(&mapping, &constants).match_links(&[
            case("OPA Case 0100", "#0", "7"),
            case("OPA Case 0100", "#4", "8"),
        ]);
        let refs: Vec<_> = links.iter().map(|l| l.case_reference.as_str()).collect();
        assert_eq!(refs, vec!["#0", "#4"]);
    }

    #[test]
    fn case_summary_cells_split_into_case_and_url() {
        let table = Table::from_csv_text(
            "closed case summaries",
            "Case #,Posted Date\n\"2021OPA-0100 (https://example/ccs/0100.pdf)\",01/02/2022\n-,01/03/2022\n2021OPA-0200,01/04/2022\n",
        )
        .unwrap();
        let mapping =
            LinkMapping::from_case_summaries(&table, &NullSentinels::new(["-"])).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("2021-0100"), Some("https://example/ccs/0100.pdf"));
        assert_eq!(mapping.get("2021-0200"), None);
    }

    #[test]
    fn merged_mapping_prefers_primary_entries() {
        let primary = LinkMapping::from_pairs([("0100", "https://primary/0100")]);
        let secondary = LinkMapping::from_pairs([
            ("0100", "https://secondary/0100"),
            ("0200", "https://secondary/0200"),
        ]);
        let merged = primary.merged_with(secondary);
        assert_eq!(merged.get("0100"), Some("https://primary/0100"));
        assert_eq!(merged.get("0200"), Some("https://secondary/0200"));
        assert_eq!(merged.len(), 2);
    }
}
