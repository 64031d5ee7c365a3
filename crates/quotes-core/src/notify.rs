//! Transient user notifications.

use std::time::Duration;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Short-lived message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// How long a front-end should keep the notice visible
    pub ttl: Duration,
}

impl Notice {
    pub fn info(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            ttl,
        }
    }

    pub fn warning(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            ttl,
        }
    }
}

/// Sink for notices; implemented by front-ends
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!("{}", notice.message),
            NoticeLevel::Warning => tracing::warn!("{}", notice.message),
        }
    }
}
