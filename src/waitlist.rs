use std::cell::{Cell, RefCell};

use tokio::time::{Instant, sleep_until};
use tracing::Instrument;
use uuid::Uuid;

use crate::analytics::{AnalyticsEvent, AnalyticsSink, NoopSink};
use crate::classifier::{ErrorCategory, Failure, classify};
use crate::config::WaitlistConfig;
use crate::forms::{FormSender, Submission};
use crate::notification::{Event, Notice, StateMachine, Transition};
use crate::validator::is_valid_email;

/// Per-form values sent with every submission.
#[derive(Debug, Clone, Default)]
pub struct FormSettings {
    /// `None` or blank disables the form before any request is made.
    pub access_key: Option<String>,
    pub subject: Option<String>,
    pub from_name: Option<String>,
    pub source: Option<String>,
    pub honeypot: bool,
}

impl From<&WaitlistConfig> for FormSettings {
    fn from(config: &WaitlistConfig) -> Self {
        Self {
            access_key: config.access_key.clone(),
            subject: config.subject.clone(),
            from_name: config.from_name.clone(),
            source: config.source.clone(),
            honeypot: config.honeypot,
        }
    }
}

/// How a call to [`WaitlistForm::submit`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(ErrorCategory),
    /// Another submission on this form was still pending; nothing was sent.
    Ignored,
}

/// One waitlist form instance: validation, one bounded request, classification
/// and the notification it leaves behind.
///
/// The notice lives in a `RefCell`: the form is driven from a single task and
/// no borrow is held across an await.
pub struct WaitlistForm<S: FormSender> {
    sender: S,
    settings: FormSettings,
    analytics: Box<dyn AnalyticsSink>,
    notice: RefCell<Notice>,
    config_reported: Cell<bool>,
}

impl<S: FormSender> WaitlistForm<S> {
    pub fn new(sender: S, settings: FormSettings, notice: Notice) -> Self {
        Self {
            sender,
            settings,
            analytics: Box::new(NoopSink),
            notice: RefCell::new(notice),
            config_reported: Cell::new(false),
        }
    }

    pub fn with_analytics(mut self, sink: Box<dyn AnalyticsSink>) -> Self {
        self.analytics = sink;
        self
    }

    /// Snapshot of the current notification state.
    pub fn notice(&self) -> Notice {
        self.notice.borrow().clone()
    }

    fn apply(&self, event: Event) -> Transition {
        StateMachine::next(&mut self.notice.borrow_mut(), event, Instant::now())
    }

    fn access_key(&self) -> Option<&str> {
        self.settings
            .access_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    /// Run one submission for `email`.
    pub async fn submit(&self, email: &str) -> SubmitOutcome {
        if self.notice.borrow().is_pending() {
            tracing::debug!("submission already pending, ignoring");
            return SubmitOutcome::Ignored;
        }

        let email = email.trim();
        if !is_valid_email(email) {
            return self.fail(Failure::InvalidEmail);
        }

        let Some(access_key) = self.access_key() else {
            if !self.config_reported.replace(true) {
                tracing::error!("form access key is not configured, submissions are disabled");
            }
            return self.fail(Failure::MissingCredential);
        };

        let submission = Submission {
            access_key: access_key.to_string(),
            email: email.to_string(),
            subject: self.settings.subject.clone(),
            from_name: self.settings.from_name.clone(),
            source: self.settings.source.clone(),
            botcheck: self.settings.honeypot.then(String::new),
        };

        let span = tracing::info_span!("submission", id = %Uuid::new_v4());
        async {
            if let Transition::Ignored(_) = self.apply(Event::Submit) {
                return SubmitOutcome::Ignored;
            }

            match self.sender.send(&submission).await {
                Ok(reply) if reply.is_success() => {
                    self.apply(Event::Succeed);
                    self.analytics.track(&AnalyticsEvent::waitlist_submit());
                    tracing::info!(status = reply.status, "signup accepted");
                    SubmitOutcome::Accepted
                }
                Ok(reply) => {
                    tracing::warn!(
                        status = reply.status,
                        message = ?reply.body.message,
                        code = ?reply.body.code,
                        "signup rejected"
                    );
                    self.fail(Failure::from(reply))
                }
                Err(e) => {
                    tracing::warn!(error.cause_chain = ?e, error.message = %e, "signup failed");
                    self.fail(Failure::from(&e))
                }
            }
        }
        .instrument(span)
        .await
    }

    fn fail(&self, failure: Failure) -> SubmitOutcome {
        let category = classify(&failure);
        self.apply(Event::Fail(category));
        SubmitOutcome::Rejected(category)
    }

    /// Close the displayed result now, cancelling its auto-clear.
    pub fn dismiss(&self) -> Transition {
        self.apply(Event::Dismiss)
    }

    /// Wait for the displayed result's deadline and clear it.
    ///
    /// Returns `false` without waiting when nothing is displayed, and `false`
    /// after waiting when the result was dismissed or replaced meanwhile.
    pub async fn expire_when_due(&self) -> bool {
        let Some(deadline) = self.notice.borrow().expires_at else {
            return false;
        };
        sleep_until(deadline).await;
        matches!(self.apply(Event::Expire(deadline)), Transition::Entered(_))
    }
}
