use thiserror::Error;

use crate::notice::{Notice, NoticeAction, NoticeLevel};
use crate::profile::models::SectionName;

/// Client-level error type.
/// Every variant maps onto a user-facing `Notice` via [`AppError::notice`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    AuthRequired,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Profile incomplete")]
    ProfileIncomplete,

    #[error("Profile not loaded")]
    ProfileNotLoaded,

    #[error("Section '{0}' is locked")]
    SectionLocked(SectionName),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AuthRequired => "AUTH_REQUIRED",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Server { .. } => "SERVER_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ProfileIncomplete => "PROFILE_INCOMPLETE",
            AppError::ProfileNotLoaded => "PROFILE_NOT_LOADED",
            AppError::SectionLocked(_) => "SECTION_LOCKED",
            AppError::Parse(_) => "PARSE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Converts the error into the toast/inline message shown to the user.
    pub fn notice(&self) -> Notice {
        let (level, message, action) = match self {
            AppError::AuthRequired => (
                NoticeLevel::Warning,
                "Please login first".to_string(),
                Some(NoticeAction::Login),
            ),
            AppError::Network(e) => {
                tracing::error!("Network error: {e}");
                (
                    NoticeLevel::Danger,
                    "Network or server error during request".to_string(),
                    None,
                )
            }
            AppError::Server { message, .. } => (NoticeLevel::Danger, message.clone(), None),
            AppError::Validation(msg) => (NoticeLevel::Warning, msg.clone(), None),
            AppError::NotFound(msg) => (NoticeLevel::Info, msg.clone(), None),
            AppError::ProfileIncomplete => (
                NoticeLevel::Danger,
                "Complete your full info first.".to_string(),
                Some(NoticeAction::CompleteProfile),
            ),
            AppError::ProfileNotLoaded => (
                NoticeLevel::Danger,
                "Profile not loaded yet. Please refresh the page.".to_string(),
                Some(NoticeAction::Reload),
            ),
            AppError::SectionLocked(section) => (
                NoticeLevel::Warning,
                format!("{} is already saved", section.title()),
                Some(NoticeAction::EditProfile),
            ),
            AppError::Parse(e) => {
                tracing::error!("Parse error: {e}");
                (
                    NoticeLevel::Danger,
                    "The server sent a response that could not be read".to_string(),
                    None,
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Session storage error: {e}");
                (
                    NoticeLevel::Danger,
                    "Could not access the local session store".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    NoticeLevel::Danger,
                    "Something went wrong".to_string(),
                    None,
                )
            }
        };

        let notice = Notice::new(level, message);
        match action {
            Some(action) => notice.with_action(action),
            None => notice,
        }
    }
}
