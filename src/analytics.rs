//! Analytics side channel fired after a successful signup.

use std::collections::BTreeMap;

/// Event name recorded for every accepted signup.
pub const WAITLIST_SUBMIT: &str = "waitlist_submit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub name: String,
    pub params: BTreeMap<String, String>,
}

impl AnalyticsEvent {
    pub fn waitlist_submit() -> Self {
        Self {
            name: WAITLIST_SUBMIT.to_string(),
            params: BTreeMap::from([("method".to_string(), "form".to_string())]),
        }
    }
}

/// Receives named events. Failures inside a sink must not affect the caller.
pub trait AnalyticsSink {
    fn track(&self, event: &AnalyticsEvent);
}

/// Records events as structured `tracing` records under the `analytics` target.
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn track(&self, event: &AnalyticsEvent) {
        let params = event
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        tracing::info!(target: "analytics", event = %event.name, %params, "analytics event");
    }
}

/// Drops every event.
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn track(&self, _event: &AnalyticsEvent) {}
}
