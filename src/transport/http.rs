use tracing::info;

use crate::errors::ImportError;

/// Upper bound on a downloaded dataset body.
const MAX_BODY_BYTES: u64 = 512 * 1024 * 1024;

/// Fetch a dataset with one unauthenticated HTTP GET.
///
/// No retry and no partial results: any transport or status failure is
/// returned as `DatasetUnavailable` and aborts the run.
pub fn fetch_text(dataset: &str, url: &str) -> Result<String, ImportError> {
    info!("[oversight:http] fetching {dataset} from {url}");
    let response = ureq::get(url)
        .call()
        .map_err(|err| ImportError::DatasetUnavailable {
            dataset: dataset.to_string(),
            reason: format!("request to {url} failed: {err}"),
        })?;
    let mut body = response.into_body();
    body.with_config()
        .limit(MAX_BODY_BYTES)
        .read_to_string()
        .map_err(|err| ImportError::DatasetUnavailable {
            dataset: dataset.to_string(),
            reason: format!("failed reading response body from {url}: {err}"),
        })
}
