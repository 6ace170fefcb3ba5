//! Notification Channel.
//!
//! A single slot holding the most recent message. Each notification starts an
//! expiry timer in the [`NOTIFICATION_TIMER`] slot, so a newer notification
//! aborts the timer of the one it replaces. Expiries also carry the
//! generation they were scheduled for and are ignored once stale.

use crate::config::StorefrontConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storefront_core::{
    SmallVec, cancellable, delay,
    effect::{Effect, EffectId},
    reducer::Reducer,
    smallvec,
};

/// Cancellation slot for the expiry timer
pub const NOTIFICATION_TIMER: EffectId = EffectId::new("notification-timer");

/// Severity of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something worked
    Success,
    /// Something was rejected
    Error,
}

/// A transient message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Text shown to the user
    pub message: String,
    /// Severity
    pub kind: NotificationKind,
    /// Lifetime once shown
    pub expires_after: Duration,
}

/// Current notification, if any
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationState {
    current: Option<Notification>,
    generation: u64,
}

impl NotificationState {
    /// Creates an empty channel
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            generation: 0,
        }
    }

    /// The live notification
    #[must_use]
    pub const fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Number of notifications shown so far; identifies the live one
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Notification Channel inputs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationAction {
    /// Show a message, replacing the current one
    Notify {
        /// Text
        message: String,
        /// Severity
        kind: NotificationKind,
    },
    /// Timer fired for the given generation
    Expire {
        /// Generation the timer was started for
        generation: u64,
    },
    /// Hide the current message now
    Dismiss,
}

impl NotificationAction {
    /// Success notification
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Notify {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    /// Error notification
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Notify {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }
}

/// Reducer for the Notification Channel
#[derive(Clone, Debug, Default)]
pub struct NotificationReducer;

impl NotificationReducer {
    /// Creates a new `NotificationReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for NotificationReducer {
    type State = NotificationState;
    type Action = NotificationAction;
    type Environment = StorefrontConfig;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        config: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            NotificationAction::Notify { message, kind } => {
                state.generation += 1;
                state.current = Some(Notification {
                    message,
                    kind,
                    expires_after: config.notification_ttl,
                });

                smallvec![cancellable! {
                    id: NOTIFICATION_TIMER,
                    effect: delay! {
                        duration: config.notification_ttl,
                        action: NotificationAction::Expire {
                            generation: state.generation,
                        }
                    }
                }]
            },
            NotificationAction::Expire { generation } => {
                if generation == state.generation {
                    state.current = None;
                } else {
                    tracing::debug!(
                        generation,
                        live = state.generation,
                        "Ignoring stale notification expiry"
                    );
                }
                SmallVec::new()
            },
            NotificationAction::Dismiss => {
                state.current = None;
                smallvec![Effect::Cancel(NOTIFICATION_TIMER)]
            },
        }
    }
}
