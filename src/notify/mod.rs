//! Local notification capability
//!
//! Timers never talk to a platform API directly. They receive a [`Notifier`]
//! and go through [`request_permission_if_undecided`] at mount and
//! [`notify_if_permitted`] at each phase completion.

pub mod log_notifier;

use serde::{Deserialize, Serialize};

pub use log_notifier::{LogNotifier, NoopNotifier};

/// Permission to show local notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not decided yet; a request may change it
    Default,
    Granted,
    Denied,
}

/// Best-effort notification primitive
pub trait Notifier: Send + Sync {
    fn query_permission(&self) -> Permission;

    /// Ask for permission. Fire-and-forget: callers never wait on the answer.
    fn request_permission(&self);

    fn notify(&self, text: &str);
}

/// Request permission only while it is still undecided
pub fn request_permission_if_undecided(notifier: &dyn Notifier) {
    if notifier.query_permission() == Permission::Default {
        notifier.request_permission();
    }
}

/// Show `text` if permission was granted. Returns whether it was shown.
pub fn notify_if_permitted(notifier: &dyn Notifier, text: &str) -> bool {
    if notifier.query_permission() != Permission::Granted {
        tracing::debug!("Notification skipped, permission not granted: {}", text);
        return false;
    }
    notifier.notify(text);
    true
}
