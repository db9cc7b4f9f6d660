#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
    tone: StatusTone,
}

pub const READY_STATUS: &str = "Ready. Press Enter to open a point, Ctrl+N to add one.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
            tone: StatusTone::Info,
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
        self.tone = StatusTone::Info;
    }

    pub fn ready(&mut self) {
        *self = Self::default();
    }

    pub fn editing(&mut self, label: &str) {
        self.set_raw(format!("Editing {label}"));
    }

    pub fn saved(&mut self, label: &str) {
        self.set_raw(format!("Saved {label}"));
    }

    pub fn deleted(&mut self, label: &str) {
        self.set_raw(format!("Deleted {label}"));
    }

    pub fn sorted(&mut self, label: &str) {
        self.set_raw(format!("Sorted by {label}"));
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
        self.tone = StatusTone::Error;
    }

    pub fn pending_exit(&mut self) {
        self.set_raw("An editor is open. Press Ctrl+Q again to quit and drop the draft.");
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tone(&self) -> StatusTone {
        self.tone
    }
}
