use thiserror::Error;

/// Failures that abort one school's collection. The caller records them and
/// moves on to the next school; nothing here terminates the whole run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("blocked by remote site (status {0})")]
    Blocked(reqwest::StatusCode),

    #[error("malformed {field} value {value:?} on detail page")]
    BadNumber {
        field: &'static str,
        value: String,
    },
}
