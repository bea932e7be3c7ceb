use crate::domain::ports::{Notification, Notifier};

/// Sends notifications to the log instead of a toast.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => tracing::info!("✅ {}", message),
            Notification::Error(message) => tracing::error!("❌ {}", message),
        }
    }
}
