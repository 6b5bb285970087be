use std::collections::{HashMap, HashSet};
use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use super::RowView;
use crate::errors::ImportError;
use crate::types::{ColumnName, DatasetName};
use crate::utils::NullSentinels;

/// Position of a validated column within a `Table`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnIndex(pub(crate) usize);

/// Fully materialized CSV table with a validated header.
///
/// Columns are addressed by header name. Resolve required columns once with
/// `column` before iterating rows, so schema drift fails at load time.
#[derive(Clone, Debug)]
pub struct Table {
    dataset: DatasetName,
    headers: Vec<ColumnName>,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Parse CSV text with a header row.
    pub fn from_csv_text(dataset: impl Into<DatasetName>, text: &str) -> Result<Self, ImportError> {
        Self::from_reader(dataset, text.as_bytes())
    }

    /// Parse CSV from any reader with a header row.
    pub fn from_reader<R: Read>(
        dataset: impl Into<DatasetName>,
        reader: R,
    ) -> Result<Self, ImportError> {
        let dataset = dataset.into();
        let mut csv = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = csv
            .headers()
            .map_err(|err| ImportError::MalformedRow {
                dataset: dataset.clone(),
                row: 0,
                reason: format!("unreadable header: {err}"),
            })?
            .iter()
            .map(clean_header)
            .collect();
        let mut rows = Vec::new();
        for (idx, record) in csv.records().enumerate() {
            let record = record.map_err(|err| ImportError::MalformedRow {
                dataset: dataset.clone(),
                row: idx + 1,
                reason: err.to_string(),
            })?;
            rows.push(record);
        }
        Ok(Self {
            dataset,
            headers,
            rows,
        })
    }

    /// Dataset label used in errors.
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Header names in file order.
    pub fn headers(&self) -> &[ColumnName] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a required column, failing with `MissingColumn` when absent.
    pub fn column(&self, name: &str) -> Result<ColumnIndex, ImportError> {
        self.optional_column(name)
            .ok_or_else(|| ImportError::MissingColumn {
                dataset: self.dataset.clone(),
                column: name.to_string(),
            })
    }

    /// Resolve a column that may legitimately be absent.
    pub fn optional_column(&self, name: &str) -> Option<ColumnIndex> {
        self.headers
            .iter()
            .position(|header| header == name)
            .map(ColumnIndex)
    }

    /// Inner-join `other` on every column the two tables share.
    ///
    /// The result keeps this table's dataset label and headers, followed by
    /// the columns only `other` has. Rows follow this table's order; a row
    /// matching several rows of `other` is repeated once per match.
    pub fn natural_join(&self, other: &Table) -> Result<Table, ImportError> {
        let shared: Vec<(usize, usize)> = self
            .headers
            .iter()
            .enumerate()
            .filter_map(|(left, name)| {
                other
                    .headers
                    .iter()
                    .position(|header| header == name)
                    .map(|right| (left, right))
            })
            .collect();
        if shared.is_empty() {
            return Err(ImportError::Configuration(format!(
                "'{}' and '{}' share no columns to join on",
                self.dataset, other.dataset
            )));
        }
        let extra: Vec<usize> = (0..other.headers.len())
            .filter(|idx| !shared.iter().any(|(_, right)| right == idx))
            .collect();

        let mut by_key: HashMap<Vec<&str>, Vec<&StringRecord>> = HashMap::new();
        for record in &other.rows {
            let key = shared
                .iter()
                .map(|(_, right)| record.get(*right).unwrap_or_default())
                .collect();
            by_key.entry(key).or_default().push(record);
        }

        let mut headers = self.headers.clone();
        headers.extend(extra.iter().map(|idx| other.headers[*idx].clone()));
        let mut rows = Vec::with_capacity(self.rows.len());
        for record in &self.rows {
            let key: Vec<&str> = shared
                .iter()
                .map(|(left, _)| record.get(*left).unwrap_or_default())
                .collect();
            let Some(matches) = by_key.get(&key) else {
                continue;
            };
            for matched in matches {
                let mut joined = record.clone();
                for idx in &extra {
                    joined.push_field(matched.get(*idx).unwrap_or_default());
                }
                rows.push(joined);
            }
        }
        Ok(Table {
            dataset: self.dataset.clone(),
            headers,
            rows,
        })
    }

    /// Remove rows equal to an earlier row in every column, comparing cells
    /// after null-sentinel normalization. Returns the number removed.
    pub fn dedup_rows(&mut self, nulls: &NullSentinels) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(before);
        self.rows.retain(|record| {
            let cells = record.iter().map(|cell| nulls.normalize(cell)).collect();
            seen.insert(cells)
        });
        before - self.rows.len()
    }

    /// Borrow rows in file order.
    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, record)| RowView::new(index, record))
    }
}

fn clean_header(raw: &str) -> ColumnName {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}
