//! Transient toast notifications

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// CSS class for the toast element
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "toast toast-success",
            NoticeKind::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub kind: NoticeKind,
    pub message: String,
    /// Wall-clock time (ms) after which the toast disappears
    pub expires_at_ms: f64,
}

/// How long a toast stays visible
pub const TOAST_DURATION_MS: f64 = 4000.0;

/// Queue of visible toasts, oldest first
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    notices: Vec<Notice>,
    next_id: u32,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NoticeKind, message: impl Into<String>, now_ms: f64) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.notices.push(Notice {
            id,
            kind,
            message: message.into(),
            expires_at_ms: now_ms + TOAST_DURATION_MS,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>, now_ms: f64) -> u32 {
        self.push(NoticeKind::Success, message, now_ms)
    }

    pub fn error(&mut self, message: impl Into<String>, now_ms: f64) -> u32 {
        self.push(NoticeKind::Error, message, now_ms)
    }

    /// Drop expired toasts. Returns true if anything was removed.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.expires_at_ms > now_ms);
        self.notices.len() != before
    }

    pub fn dismiss(&mut self, id: u32) {
        self.notices.retain(|n| n.id != id);
    }

    pub fn visible(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
