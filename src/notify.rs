use serde::Serialize;
use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::{Arc, Mutex};

const MAX_PENDING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub severity: Severity,
    pub dismissible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_text: Option<String>,
}

impl Notification {
    pub fn neutral(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: None,
            severity: Severity::Neutral,
            dismissible: true,
            dismiss_text: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: None,
            severity: Severity::Success,
            dismissible: true,
            dismiss_text: Some("Done".to_string()),
        }
    }

    pub fn danger(message: impl Into<String>, error: impl Display) -> Self {
        Self {
            message: message.into(),
            description: Some(format!("Error details: {error}")),
            severity: Severity::Danger,
            dismissible: true,
            dismiss_text: None,
        }
    }
}

/// Fire-and-forget notification feed shared by the stores and drained by the
/// notifications endpoint. Oldest entries are dropped once the queue is full.
#[derive(Clone, Default)]
pub struct Notifier {
    pending: Arc<Mutex<VecDeque<Notification>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: Notification) {
        let mut pending = self.pending.lock().unwrap_or_else(|err| err.into_inner());
        if pending.len() == MAX_PENDING {
            pending.pop_front();
        }
        pending.push_back(notification);
    }

    pub fn drain(&self) -> Vec<Notification> {
        let mut pending = self.pending.lock().unwrap_or_else(|err| err.into_inner());
        pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_feed_in_order() {
        let notifier = Notifier::new();
        notifier.push(Notification::neutral("first"));
        notifier.push(Notification::success("second"));

        let drained = notifier.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].message, "second");
        assert!(notifier.drain().is_empty());
    }

    #[test]
    fn clones_share_the_same_feed() {
        let notifier = Notifier::new();
        let other = notifier.clone();
        other.push(Notification::neutral("shared"));

        assert_eq!(notifier.drain().len(), 1);
    }

    #[test]
    fn overflow_drops_the_oldest_entry() {
        let notifier = Notifier::new();
        for index in 0..MAX_PENDING + 1 {
            notifier.push(Notification::neutral(format!("note {index}")));
        }

        let drained = notifier.drain();
        assert_eq!(drained.len(), MAX_PENDING);
        assert_eq!(drained[0].message, "note 1");
    }

    #[test]
    fn constructors_fix_severity_and_dismissal() {
        let success = Notification::success("saved");
        assert_eq!(success.severity, Severity::Success);
        assert!(success.dismissible);
        assert_eq!(success.dismiss_text.as_deref(), Some("Done"));

        let danger = Notification::danger("failed", "boom");
        assert_eq!(danger.severity, Severity::Danger);
        assert_eq!(danger.description.as_deref(), Some("Error details: boom"));
        assert!(danger.dismiss_text.is_none());

        let neutral = Notification::neutral("done");
        assert_eq!(neutral.severity, Severity::Neutral);
        assert!(neutral.description.is_none());
    }
}
