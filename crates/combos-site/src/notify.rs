//! # Notifications
//!
//! Transient user-facing messages (the admin "snackbar"). Producers hold a
//! cloneable [`Notifier`]; whatever renders notices owns the receiver.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    /// Creates a notifier and the receiving end for the notice renderer.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => warn!(message = %notice.message, "Notice"),
            _ => info!(message = %notice.message, "Notice"),
        }
        if self.sender.send(notice).is_err() {
            debug!("No notice receiver; dropping notice");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notice::new(NoticeLevel::Success, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Notice::new(NoticeLevel::Info, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notice::new(NoticeLevel::Error, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_arrive_in_order() {
        let (notifier, mut receiver) = Notifier::channel();

        notifier.success("Saved");
        notifier.error("Nope");

        assert_eq!(
            receiver.try_recv().unwrap(),
            Notice::new(NoticeLevel::Success, "Saved")
        );
        assert_eq!(receiver.try_recv().unwrap().level, NoticeLevel::Error);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_is_not_an_error() {
        let (notifier, receiver) = Notifier::channel();
        drop(receiver);

        notifier.info("Nobody listening");
    }
}
