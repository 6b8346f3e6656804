use std::cell::RefCell;

use trellis_common::{LogNotifier, Notification, NotificationQueue, Notifier};

/// Logs every notification and keeps the recent ones for the window title.
#[derive(Debug, Default)]
pub(super) struct OperatorNotifier {
    queue: RefCell<NotificationQueue>,
}

impl OperatorNotifier {
    /// The most recent notification that has not expired.
    pub(super) fn latest(&self) -> Option<Notification> {
        self.queue.borrow_mut().visible().last().map(|n| (*n).clone())
    }
}

impl Notifier for OperatorNotifier {
    fn notify(&self, notification: Notification) {
        LogNotifier.notify(notification.clone());
        self.queue.notify(notification);
    }
}

/// Window title for `name`, with the latest notification appended.
pub(super) fn window_title(name: &str, latest: Option<&Notification>) -> String {
    match latest {
        Some(n) => format!("{name} | {}: {}", n.title, n.body),
        None => name.to_string(),
    }
}
