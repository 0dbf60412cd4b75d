use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::classifier::ErrorCategory;

/// How long a result stays on screen when nobody dismisses it.
pub const DEFAULT_DISPLAY: Duration = Duration::from_secs(6);

/// Where a form instance stands in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl Status {
    /// `true` for the two states that show a message and carry an expiry.
    pub fn is_displayed(self) -> bool {
        matches!(self, Status::Succeeded | Status::Failed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "IDLE"),
            Status::Pending => write!(f, "PENDING"),
            Status::Succeeded => write!(f, "SUCCEEDED"),
            Status::Failed => write!(f, "FAILED"),
        }
    }
}

/// The submission state of one form instance.
#[derive(Debug, Clone)]
pub struct Notice {
    pub status: Status,
    /// Fixed user-facing text; only set while a result is displayed.
    pub message: Option<String>,
    /// Failure category while `Failed`.
    pub category: Option<ErrorCategory>,
    pub updated_at: DateTime<Utc>,
    /// Auto-clear deadline while a result is displayed.
    pub expires_at: Option<Instant>,
    pub display_for: Duration,
    /// Statuses left behind, oldest first.
    pub history: Vec<Status>,
}

impl Notice {
    pub fn new(display_for: Duration) -> Self {
        Self {
            status: Status::Idle,
            message: None,
            category: None,
            updated_at: Utc::now(),
            expires_at: None,
            display_for,
            history: Vec::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Whether the displayed result should have been cleared by `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY)
    }
}
