use crate::domain::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Keeps the most recent notification for the status bar.
#[derive(Debug, Default)]
pub struct Toasts {
    latest: Option<Toast>,
}

impl Toasts {
    pub fn latest(&self) -> Option<&Toast> {
        self.latest.as_ref()
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }

    fn push(&mut self, level: ToastLevel, message: &str) {
        self.latest = Some(Toast { level, message: message.to_string() });
    }
}

impl Notifier for Toasts {
    fn notify_success(&mut self, message: &str) {
        self.push(ToastLevel::Success, message);
    }

    fn notify_error(&mut self, message: &str) {
        self.push(ToastLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_notification_wins() {
        let mut toasts = Toasts::default();
        assert!(toasts.latest().is_none());

        toasts.notify_error("Failed to load submissions");
        toasts.notify_success("Status updated successfully");

        let latest = toasts.latest().unwrap();
        assert_eq!(latest.level, ToastLevel::Success);
        assert_eq!(latest.message, "Status updated successfully");

        toasts.clear();
        assert!(toasts.latest().is_none());
    }
}
