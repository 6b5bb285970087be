//! Badge-number lookup over the officer identity registry.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::constants::identity as cols;
use crate::data::IdentityRecord;
use crate::errors::ImportError;
use crate::source::Table;
use crate::types::BadgeNumber;
use crate::utils::{NullSentinels, normalize_badge};

/// Lookup from trimmed badge number to every registry row carrying it.
///
/// Rows that share a badge number are all kept, in registry order. A join
/// against such a badge yields one output row per registry row.
#[derive(Clone, Debug, Default)]
pub struct IdentityIndex {
    by_badge: HashMap<BadgeNumber, Vec<IdentityRecord>>,
    record_count: usize,
}

impl IdentityIndex {
    /// Index prebuilt identity records.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = IdentityRecord>,
    {
        let mut index = Self::default();
        for mut record in records {
            let Some(badge) = normalize_badge(&record.badge_number) else {
                continue;
            };
            record.badge_number = badge.clone();
            index.by_badge.entry(badge).or_default().push(record);
            index.record_count += 1;
        }
        index
    }

    /// Load and index the registry table.
    ///
    /// Requires the `id` and `badge number` columns. The display name comes
    /// from `name` when present, otherwise from `first name` + `last name`.
    pub fn from_table(table: &Table, nulls: &NullSentinels) -> Result<Self, ImportError> {
        let records = load_identity_records(table, nulls)?;
        let loaded = records.len();
        let index = Self::from_records(records);
        info!(
            "[oversight:identity] indexed {} officers under {} badge numbers ({} registry rows)",
            index.record_count,
            index.badge_count(),
            table.len()
        );
        if loaded < table.len() {
            info!(
                "[oversight:identity] skipped {} registry rows without an id or badge number",
                table.len() - loaded
            );
        }
        let ambiguous = index.ambiguous_badges();
        if !ambiguous.is_empty() {
            warn!(
                "[oversight:identity] {} badge numbers map to more than one officer; joins on them will repeat reports",
                ambiguous.len()
            );
        }
        Ok(index)
    }

    /// Registry rows carrying `badge`; whitespace around `badge` is ignored.
    pub fn lookup(&self, badge: &str) -> &[IdentityRecord] {
        self.by_badge
            .get(badge.trim())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of indexed registry rows.
    pub fn len(&self) -> usize {
        self.record_count
    }

    /// True when no registry row was indexed.
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Number of distinct badge numbers.
    pub fn badge_count(&self) -> usize {
        self.by_badge.len()
    }

    /// Badge numbers shared by more than one registry row, sorted.
    pub fn ambiguous_badges(&self) -> Vec<&str> {
        let mut badges: Vec<&str> = self
            .by_badge
            .iter()
            .filter(|(_, records)| records.len() > 1)
            .map(|(badge, _)| badge.as_str())
            .collect();
        badges.sort_unstable();
        badges
    }
}

/// Decode registry rows; rows missing an id or a badge number are skipped.
pub fn load_identity_records(
    table: &Table,
    nulls: &NullSentinels,
) -> Result<Vec<IdentityRecord>, ImportError> {
    let id_col = table.column(cols::COL_ID)?;
    let badge_col = table.column(cols::COL_BADGE_NUMBER)?;
    let name_col = table.optional_column(cols::COL_NAME);
    let first_col = table.optional_column(cols::COL_FIRST_NAME);
    let last_col = table.optional_column(cols::COL_LAST_NAME);

    let mut records = Vec::with_capacity(table.len());
    for row in table.rows() {
        let Some(internal_id) = row.value(id_col, nulls) else {
            continue;
        };
        let Some(badge_number) = row.value(badge_col, nulls).and_then(normalize_badge) else {
            continue;
        };
        let display_name = row.optional_value(name_col, nulls).or_else(|| {
            let parts: Vec<String> = [first_col, last_col]
                .into_iter()
                .filter_map(|col| row.optional_value(col, nulls))
                .map(|part| part.trim().to_string())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        });
        records.push(IdentityRecord {
            internal_id: internal_id.trim().to_string(),
            badge_number,
            display_name,
        });
    }
    Ok(records)
}
