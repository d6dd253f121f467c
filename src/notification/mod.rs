//! Desktop notifications for timer events.
//!
//! The countdown engine talks to a [`Notifier`]; every failure is logged by
//! the caller and never interrupts the timer.
//!
//! # Example
//!
//! ```rust,no_run
//! use tomato_focus::notification::{DesktopNotifier, Notifier};
//! use tomato_focus::types::TimerMode;
//!
//! let notifier = DesktopNotifier::new();
//! if let Err(e) = notifier.notify_complete(TimerMode::Focus) {
//!     eprintln!("{}", e);
//! }
//! ```

pub mod error;

use std::sync::Mutex;

use notify_rust::Notification;
use tracing::debug;

use crate::types::TimerMode;

pub use self::error::NotificationError;

/// Application name shown by the notification daemon.
pub const APP_NAME: &str = "tomato-focus";

/// Title and body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: &'static str,
    pub body: &'static str,
}

impl NotificationContent {
    /// Content announcing that `finished` has ended.
    pub fn completed(finished: TimerMode) -> Self {
        match finished {
            TimerMode::Focus => Self {
                title: "Focus session complete!",
                body: "Time for a break. Nice work!",
            },
            TimerMode::ShortBreak => Self {
                title: "Break is over",
                body: "Ready to focus again?",
            },
            TimerMode::LongBreak => Self {
                title: "Long break is over",
                body: "Let's start a fresh round of focus!",
            },
        }
    }

    /// Content announcing that `mode` has started.
    pub fn started(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Focus => Self {
                title: "Focus started",
                body: "Stay with one task until the timer rings.",
            },
            TimerMode::ShortBreak => Self {
                title: "Short break started",
                body: "Stand up and stretch.",
            },
            TimerMode::LongBreak => Self {
                title: "Long break started",
                body: "Step away from the screen for a while.",
            },
        }
    }
}

/// Dispatches timer notifications.
pub trait Notifier: Send + Sync {
    /// Announces that `finished` has run to zero.
    fn notify_complete(&self, finished: TimerMode) -> Result<(), NotificationError>;

    /// Announces that a countdown in `mode` has started.
    fn notify_start(&self, mode: TimerMode) -> Result<(), NotificationError>;
}

// ============================================================================
// DesktopNotifier
// ============================================================================

/// Sends notifications through the platform notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn show(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        Notification::new()
            .summary(content.title)
            .body(content.body)
            .appname(APP_NAME)
            .show()
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;
        debug!("Notification sent: {}", content.title);
        Ok(())
    }
}

impl Notifier for DesktopNotifier {
    fn notify_complete(&self, finished: TimerMode) -> Result<(), NotificationError> {
        self.show(&NotificationContent::completed(finished))
    }

    fn notify_start(&self, mode: TimerMode) -> Result<(), NotificationError> {
        self.show(&NotificationContent::started(mode))
    }
}

/// A notifier that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify_complete(&self, _finished: TimerMode) -> Result<(), NotificationError> {
        Ok(())
    }

    fn notify_start(&self, _mode: TimerMode) -> Result<(), NotificationError> {
        Ok(())
    }
}

// ============================================================================
// Mock
// ============================================================================

/// A notification recorded by [`MockNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentNotification {
    Started(TimerMode),
    Completed(TimerMode),
}

#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<SentNotification>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Modes whose completion was announced, in order.
    #[must_use]
    pub fn completed(&self) -> Vec<TimerMode> {
        self.sent()
            .into_iter()
            .filter_map(|n| match n {
                SentNotification::Completed(mode) => Some(mode),
                SentNotification::Started(_) => None,
            })
            .collect()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn record(&self, notification: SentNotification) -> Result<(), NotificationError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
        Ok(())
    }
}

impl Notifier for MockNotifier {
    fn notify_complete(&self, finished: TimerMode) -> Result<(), NotificationError> {
        self.record(SentNotification::Completed(finished))
    }

    fn notify_start(&self, mode: TimerMode) -> Result<(), NotificationError> {
        self.record(SentNotification::Started(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_content_per_mode() {
        assert_eq!(
            NotificationContent::completed(TimerMode::Focus).title,
            "Focus session complete!"
        );
        assert_eq!(
            NotificationContent::completed(TimerMode::ShortBreak).title,
            "Break is over"
        );
        assert_eq!(
            NotificationContent::completed(TimerMode::LongBreak).title,
            "Long break is over"
        );
    }

    #[test]
    fn test_content_is_distinct() {
        for mode in TimerMode::ALL {
            assert_ne!(
                NotificationContent::completed(mode),
                NotificationContent::started(mode)
            );
        }
    }

    #[test]
    fn test_mock_records_in_order() {
        let mock = MockNotifier::new();
        mock.notify_start(TimerMode::Focus).unwrap();
        mock.notify_complete(TimerMode::Focus).unwrap();

        assert_eq!(
            mock.sent(),
            vec![
                SentNotification::Started(TimerMode::Focus),
                SentNotification::Completed(TimerMode::Focus),
            ]
        );
        assert_eq!(mock.completed(), vec![TimerMode::Focus]);
        assert_eq!(mock.notification_count(), 2);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockNotifier::new();
        mock.set_should_fail(true);

        assert!(mock.notify_complete(TimerMode::ShortBreak).is_err());
        assert_eq!(mock.notification_count(), 0);
    }

    #[test]
    fn test_null_notifier_accepts_everything() {
        let notifier = NullNotifier;
        assert!(notifier.notify_start(TimerMode::LongBreak).is_ok());
        assert!(notifier.notify_complete(TimerMode::LongBreak).is_ok());
    }
}
