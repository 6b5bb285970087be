use csv::StringRecord;

use super::ColumnIndex;
use crate::utils::NullSentinels;

/// Borrowed view of one table row.
#[derive(Clone, Copy, Debug)]
pub struct RowView<'a> {
    index: usize,
    record: &'a StringRecord,
}

impl<'a> RowView<'a> {
    pub(crate) fn new(index: usize, record: &'a StringRecord) -> Self {
        Self { index, record }
    }

    /// Zero-based data-row position in the source table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw cell text; an out-of-range column reads as empty.
    pub fn cell(&self, column: ColumnIndex) -> &'a str {
        self.record.get(column.0).unwrap_or_default()
    }

    /// Cell text with null spellings mapped to `None`.
    pub fn value(&self, column: ColumnIndex, nulls: &NullSentinels) -> Option<String> {
        nulls.normalize(self.cell(column))
    }

    /// Like `value`, for a column that may be absent from the table.
    pub fn optional_value(
        &self,
        column: Option<ColumnIndex>,
        nulls: &NullSentinels,
    ) -> Option<String> {
        column.and_then(|column| self.value(column, nulls))
    }
}
