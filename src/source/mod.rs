//! Dataset locations, fetchers, and validated tabular views.
//!
//! Ownership model:
//! - `DatasetFetcher` turns a `DatasetLocation` into raw tabular text. It is the
//!   only place the pipeline touches the network or the filesystem for input.
//! - `Table` owns the parsed rows of one dataset and validates its header.
//! - `RowView` borrows a single row for column-addressed access.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::errors::ImportError;
use crate::transport::{fs, http};

/// Occurrence-date parsing helpers.
pub mod dates;
/// Borrowed per-row access.
pub mod row_view;
/// Header-validated CSV tables.
pub mod table;

pub use row_view::RowView;
pub use table::{ColumnIndex, Table};

/// Where an input dataset lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DatasetLocation {
    /// Fetched with a single unauthenticated HTTP GET.
    Url(String),
    /// Read from the local filesystem.
    Path(PathBuf),
}

impl DatasetLocation {
    /// Interpret `value` as a URL when it has an http(s) scheme, otherwise as a path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DatasetLocation::Url(trimmed.to_string())
        } else {
            DatasetLocation::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetLocation::Url(url) => write!(f, "{url}"),
            DatasetLocation::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Retrieves raw dataset text.
///
/// A fetch failure is fatal for the run: implementations must not retry or
/// return partial content.
pub trait DatasetFetcher {
    /// Fetch the full text of `dataset` from `location`.
    fn fetch(&self, dataset: &str, location: &DatasetLocation) -> Result<String, ImportError>;
}

/// Fetcher that reads paths from disk and URLs over HTTP.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFetcher;

impl DatasetFetcher for DefaultFetcher {
    fn fetch(&self, dataset: &str, location: &DatasetLocation) -> Result<String, ImportError> {
        match location {
            DatasetLocation::Url(url) => http::fetch_text(dataset, url),
            DatasetLocation::Path(path) => fs::read_text(dataset, path),
        }
    }
}

/// Fetcher backed by prebuilt documents, keyed by location.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFetcher {
    documents: HashMap<DatasetLocation, String>,
}

impl InMemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the text returned for `location`.
    pub fn with_document(mut self, location: DatasetLocation, text: impl Into<String>) -> Self {
        self.documents.insert(location, text.into());
        self
    }
}

impl DatasetFetcher for InMemoryFetcher {
    fn fetch(&self, dataset: &str, location: &DatasetLocation) -> Result<String, ImportError> {
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| ImportError::DatasetUnavailable {
                dataset: dataset.to_string(),
                reason: format!("no document registered for {location}"),
            })
    }
}
