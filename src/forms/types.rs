//! Wire types for the form-processing endpoint.
//!
//! [`Submission`] is the JSON body posted for a waitlist signup and
//! [`FormsResponse`] is what the service answers. [`Reply`] pairs the parsed
//! body with the HTTP status so callers can reject non-2xx answers even when
//! the body claims success.

use serde::{Deserialize, Serialize};

/// Body of a waitlist signup POST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Credential identifying the receiving form.
    pub access_key: String,
    /// Visitor address, already validated and trimmed.
    pub email: String,
    /// Subject line of the notification e-mail sent by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Sender name shown in that e-mail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    /// Tag describing where the signup came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Honeypot. Humans never fill it; the service drops submissions where
    /// it is non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub botcheck: Option<String>,
}

/// JSON answer of the form service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Machine-readable error code, when the service provides one.
    #[serde(default)]
    pub code: Option<String>,
}

/// A response that made it through transport and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: FormsResponse,
}

impl Reply {
    /// A signup only counts when both the status and the body agree.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.body.success
    }
}
