//! Failures of the bounded request executor.
//!
//! A non-2xx answer is not a [`SubmitError`]: it arrives as a
//! [`Reply`](super::Reply) and is judged by the classifier. Only the three
//! ways the exchange itself can go wrong live here.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    /// No complete answer before the deadline; the request was dropped.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// DNS, connection or TLS failure, or the body stream broke.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered but the body is not the expected JSON.
    #[error("unparseable response (status {status}): {source}")]
    Parse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}
