use chrono::Utc;
use tokio::time::Instant;

use super::notice::{Notice, Status};
use crate::classifier::{ErrorCategory, SUCCESS_MESSAGE};

/// Inputs that move a [`Notice`] through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A submission was started.
    Submit,
    /// The service accepted the signup.
    Succeed,
    /// The attempt failed, locally or remotely.
    Fail(ErrorCategory),
    /// The visitor closed the notification.
    Dismiss,
    /// A display deadline elapsed. Carries the deadline it was armed for so a
    /// timer outliving its notification cannot clear a newer one.
    Expire(Instant),
}

/// The result of feeding an [`Event`] to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The notice moved to a new status.
    Entered(Status),
    /// The event does not apply in the current status; nothing changed.
    Ignored(Status),
}

/// Drives a [`Notice`] through `Idle → Pending → Succeeded | Failed → Idle`.
pub struct StateMachine;

impl StateMachine {
    /// Apply `event` to `notice` at time `now`.
    ///
    /// - `Submit` is ignored while pending; from any other status it starts a
    ///   new attempt and cancels a running display deadline.
    /// - `Succeed` only applies to a pending attempt.
    /// - `Fail` applies everywhere: local failures skip `Pending`.
    /// - `Dismiss` and `Expire` only clear a displayed result, and `Expire`
    ///   only when its deadline is the current one and has passed.
    pub fn next(notice: &mut Notice, event: Event, now: Instant) -> Transition {
        let from = notice.status;
        let target = match event {
            Event::Submit if from == Status::Pending => None,
            Event::Submit => Some(Status::Pending),
            Event::Succeed if from == Status::Pending => Some(Status::Succeeded),
            Event::Succeed => None,
            Event::Fail(_) => Some(Status::Failed),
            Event::Dismiss if from.is_displayed() => Some(Status::Idle),
            Event::Dismiss => None,
            Event::Expire(deadline)
                if from.is_displayed()
                    && notice.expires_at == Some(deadline)
                    && notice.is_due(now) =>
            {
                Some(Status::Idle)
            }
            Event::Expire(_) => None,
        };

        let Some(to) = target else {
            return Transition::Ignored(from);
        };

        notice.history.push(from);
        notice.status = to;
        notice.updated_at = Utc::now();
        match (to, event) {
            (Status::Succeeded, _) => {
                notice.message = Some(SUCCESS_MESSAGE.to_string());
                notice.category = None;
                notice.expires_at = Some(now + notice.display_for);
            }
            (Status::Failed, Event::Fail(category)) => {
                notice.message = Some(category.message().to_string());
                notice.category = Some(category);
                notice.expires_at = Some(now + notice.display_for);
            }
            _ => {
                notice.message = None;
                notice.category = None;
                notice.expires_at = None;
            }
        }

        Transition::Entered(to)
    }
}
