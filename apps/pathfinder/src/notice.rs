use std::fmt;

use serde::Serialize;

/// Severity of a user-facing notice (the toast colour in the web client).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Danger => "danger",
        }
    }
}

/// Where the front end should send the user after showing a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeAction {
    Login,
    CompleteProfile,
    Reload,
    EditProfile,
}

impl NoticeAction {
    pub fn hint(&self) -> &'static str {
        match self {
            NoticeAction::Login => "run `pathfinder login` first",
            NoticeAction::CompleteProfile => "complete your profile with `pathfinder show` / `save-section`",
            NoticeAction::Reload => "reload the profile and try again",
            NoticeAction::EditProfile => "enter edit mode to change saved sections",
        }
    }
}

/// A transient message for the user: success confirmations, warnings and surfaced errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub action: Option<NoticeAction>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            action: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }

    pub fn with_action(mut self, action: NoticeAction) -> Self {
        self.action = Some(action);
        self
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)?;
        if let Some(action) = self.action {
            write!(f, " ({})", action.hint())?;
        }
        Ok(())
    }
}
