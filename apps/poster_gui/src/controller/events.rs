//! Backend-to-UI events and error modeling for the poster GUI.

use shared::{domain::GeneratedImage, error::SubmitFailure};
use uuid::Uuid;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    PosterFinished {
        submission_id: Uuid,
        outcome: Result<GeneratedImage, SubmitFailure>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Settings,
    Submit,
    Photo,
    Download,
    General,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Server => "Poster service",
        UiErrorCategory::Validation => "Check the form",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
    retryable: bool,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("required")
            || message_lower.contains("missing")
            || message_lower.contains("invalid")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timed out")
            || message_lower.contains("timeout")
            || message_lower.contains("connect")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("http 5") || message_lower.contains("returned 5") {
            UiErrorCategory::Server
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
            retryable: false,
        }
    }

    pub fn from_submit_failure(failure: &SubmitFailure) -> Self {
        let category = match failure {
            SubmitFailure::Transport(_) => UiErrorCategory::Transport,
            SubmitFailure::HttpStatus { status, .. } if (400..500).contains(status) => {
                UiErrorCategory::Validation
            }
            SubmitFailure::HttpStatus { .. } | SubmitFailure::MalformedResponse(_) => {
                UiErrorCategory::Server
            }
            SubmitFailure::MissingImage => UiErrorCategory::Server,
        };
        Self {
            category,
            context: UiErrorContext::Submit,
            message: failure.user_message(),
            retryable: failure.is_retryable(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    /// Submit failures where sending the same form again may succeed.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn banner_text(&self) -> String {
        format!("{}: {}", err_label(self.category), self.message)
    }
}
