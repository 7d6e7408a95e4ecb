//! Notifier implementations backed by tracing

use std::sync::Mutex;

use tracing::{info, warn};

use super::{Notifier, Permission};

/// Shows notifications as `info` events on the `notification` target.
///
/// The permission flag is process-wide; share one instance between timers.
#[derive(Debug)]
pub struct LogNotifier {
    permission: Mutex<Permission>,
    grant_on_request: bool,
}

impl LogNotifier {
    pub fn new(initial: Permission, grant_on_request: bool) -> Self {
        Self {
            permission: Mutex::new(initial),
            grant_on_request,
        }
    }
}

impl Notifier for LogNotifier {
    fn query_permission(&self) -> Permission {
        match self.permission.lock() {
            Ok(permission) => *permission,
            Err(e) => {
                warn!("Notification permission lock poisoned: {}", e);
                Permission::Denied
            }
        }
    }

    fn request_permission(&self) {
        let Ok(mut permission) = self.permission.lock() else {
            return;
        };
        if *permission == Permission::Default {
            *permission = if self.grant_on_request {
                Permission::Granted
            } else {
                Permission::Denied
            };
            info!("Notification permission resolved to {:?}", *permission);
        }
    }

    fn notify(&self, text: &str) {
        info!(target: "notification", "{}", text);
    }
}

/// Never allowed to show anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn query_permission(&self) -> Permission {
        Permission::Denied
    }

    fn request_permission(&self) {}

    fn notify(&self, _text: &str) {}
}
