//! Error reporting sink.
//!
//! The engine's only contract with whatever presents failures to the player is
//! "notify with (title, message)". How a notification is rendered is the sink's
//! business. Debug mode toggles the sink's visibility, mirroring the alert panel
//! that is only shown while debugging.

use uuid::Uuid;

pub trait ErrorSink {
    fn notify(&mut self, title: &str, message: &str);

    /// Show or hide the presentation of notifications. Sinks without a visual
    /// presentation ignore this.
    fn set_visible(&mut self, _visible: bool) {}
}

/// Forwards every notification to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn notify(&mut self, title: &str, message: &str) {
        log::error!("{title}: {message}");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
}

/// In-memory notification list. Entries stay until dismissed.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
    hidden: bool,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.entries.last()
    }

    /// Remove a notification by id. Returns false when no such entry exists.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl ErrorSink for NotificationLog {
    fn notify(&mut self, title: &str, message: &str) {
        log::warn!("{title}: {message}");
        self.entries.push(Notification {
            id: Uuid::new_v4(),
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn set_visible(&mut self, visible: bool) {
        self.hidden = !visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_appends_with_unique_ids() {
        let mut log = NotificationLog::new();
        log.notify("Error", "first");
        log.notify("Error", "second");
        assert_eq!(log.len(), 2);
        assert_ne!(log.notifications()[0].id, log.notifications()[1].id);
        assert_eq!(log.last().expect("entry").message, "second");
    }

    #[test]
    fn dismiss_removes_only_matching_entry() {
        let mut log = NotificationLog::new();
        log.notify("Error", "keep");
        log.notify("Error", "drop");
        let drop_id = log.notifications()[1].id;

        assert!(log.dismiss(drop_id));
        assert_eq!(log.len(), 1);
        assert_eq!(log.notifications()[0].message, "keep");
        assert!(!log.dismiss(drop_id), "second dismiss is a no-op");
    }

    #[test]
    fn visibility_follows_set_visible() {
        let mut log = NotificationLog::new();
        assert!(!log.is_hidden());
        log.set_visible(false);
        assert!(log.is_hidden());
        log.set_visible(true);
        assert!(!log.is_hidden());
    }
}
