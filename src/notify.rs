use std::time::Duration;
use tracing::debug;

pub const AUTO_DISMISS: Duration = Duration::from_millis(5000);
pub const SLIDE_OUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl NotificationKind {
    /// Background colour as rgb.
    pub fn accent(&self) -> (u8, u8, u8) {
        match self {
            NotificationKind::Success => (0x4C, 0xAF, 0x50),
            NotificationKind::Error => (0xF4, 0x43, 0x36),
            NotificationKind::Info => (0x21, 0x96, 0xF3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub leaving: bool,
}

/// Toast area holding at most one notification. Showing a new one replaces
/// whatever is on screen; timers for replaced notifications are harmless
/// because every follow-up is keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    next_id: u64,
    current: Option<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Show `message`, replacing any existing notification. Returns the new
    /// id and the delay before it dismisses itself.
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) -> (u64, Duration) {
        self.next_id += 1;
        let message = message.into();
        debug!(id = self.next_id, %kind, %message, "notification shown");
        self.current = Some(Notification {
            id: self.next_id,
            message,
            kind,
            leaving: false,
        });
        (self.next_id, AUTO_DISMISS)
    }

    /// Begin sliding `id` out. Returns the delay before removal, or `None`
    /// if it is already gone or already leaving.
    pub fn dismiss(&mut self, id: u64) -> Option<Duration> {
        let n = self.current.as_mut().filter(|n| n.id == id && !n.leaving)?;
        n.leaving = true;
        Some(SLIDE_OUT)
    }

    /// Close control on whatever is showing.
    pub fn close(&mut self) -> Option<(u64, Duration)> {
        let id = self.current.as_ref()?.id;
        self.dismiss(id).map(|d| (id, d))
    }

    pub fn remove(&mut self, id: u64) {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
        }
    }
}
