//! User-facing notifications.
//!
//! The core never renders anything itself. It classifies outcomes into
//! [`Notice`]s and hands them to a [`Notifier`] owned by the UI layer.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// An operation completed.
    Success,
    /// An operation was refused because of user input.
    Warning,
    /// An operation failed.
    Error,
}

/// A notification for the user.
///
/// # Examples
///
/// ```
/// use tripboard_protocol::{Notice, NoticeLevel};
///
/// let notice = Notice::success("List reordered");
/// assert_eq!(notice.level, NoticeLevel::Success);
/// assert_eq!(notice.title.as_deref(), Some("List reordered"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity of the notice.
    pub level: NoticeLevel,
    /// Short headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notice {
    /// Creates a success notice with a title.
    #[must_use]
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: Some(title.into()),
            description: None,
        }
    }

    /// Creates a warning notice with a description.
    #[must_use]
    pub fn warning(description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: None,
            description: Some(description.into()),
        }
    }

    /// Creates an error notice with a description.
    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: None,
            description: Some(description.into()),
        }
    }

    /// Sets the title, returning the notice.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Receives notices for display.
pub trait Notifier: Send + Sync {
    /// Delivers one notice.
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        let title = notice.title.as_deref().unwrap_or_default();
        let description = notice.description.as_deref().unwrap_or_default();
        match notice.level {
            NoticeLevel::Success => info!(title, description, "notice"),
            NoticeLevel::Warning => warn!(title, description, "notice"),
            NoticeLevel::Error => error!(title, description, "notice"),
        }
    }
}

/// Collects notices in memory.
///
/// # Examples
///
/// ```
/// use tripboard_protocol::{Notice, Notifier, RecordingNotifier};
///
/// let notifier = RecordingNotifier::default();
/// notifier.notify(Notice::warning("Pick an end date"));
/// assert_eq!(notifier.notices().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Returns a copy of every notice received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    /// Returns the notices of the given level.
    #[must_use]
    pub fn with_level(&self, level: NoticeLevel) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == level)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
