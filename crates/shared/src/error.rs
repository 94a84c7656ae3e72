use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    HttpStatus,
    MalformedResponse,
    MissingImage,
}

/// Why a poster submission did not produce an image.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SubmitFailure {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("poster service returned {status}: {detail}")]
    HttpStatus { status: u16, detail: String },
    #[error("malformed poster response: {0}")]
    MalformedResponse(String),
    #[error("poster response did not contain an image")]
    MissingImage,
}

impl SubmitFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            SubmitFailure::Transport(_) => FailureKind::Transport,
            SubmitFailure::HttpStatus { .. } => FailureKind::HttpStatus,
            SubmitFailure::MalformedResponse(_) => FailureKind::MalformedResponse,
            SubmitFailure::MissingImage => FailureKind::MissingImage,
        }
    }

    /// Wording shown next to the form after a failed attempt.
    pub fn user_message(&self) -> String {
        match self {
            SubmitFailure::Transport(reason) => {
                format!("Could not reach the poster service ({reason}). Check your connection and try again.")
            }
            SubmitFailure::HttpStatus { status, detail } if detail.is_empty() => {
                format!("The poster service rejected the request (HTTP {status}).")
            }
            SubmitFailure::HttpStatus { status, detail } => {
                format!("The poster service rejected the request (HTTP {status}): {detail}")
            }
            SubmitFailure::MalformedResponse(_) => {
                "The poster service sent a response that could not be read. Please try again."
                    .to_string()
            }
            SubmitFailure::MissingImage => {
                "No poster was produced. Adjust the details and try again.".to_string()
            }
        }
    }

    /// Whether sending the same form again may succeed without edits.
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitFailure::Transport(_) | SubmitFailure::MissingImage => true,
            SubmitFailure::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            SubmitFailure::MalformedResponse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_and_detail() {
        let json = serde_json::to_value(SubmitFailure::Transport("refused".into()))
            .expect("serialize transport");
        assert_eq!(
            json,
            serde_json::json!({ "kind": "transport", "detail": "refused" })
        );

        let json = serde_json::to_value(SubmitFailure::MissingImage).expect("serialize missing");
        assert_eq!(json, serde_json::json!({ "kind": "missing_image" }));
    }

    #[test]
    fn every_variant_survives_json() {
        let failures = [
            SubmitFailure::Transport("connection refused".into()),
            SubmitFailure::HttpStatus {
                status: 502,
                detail: "bad gateway".into(),
            },
            SubmitFailure::MalformedResponse("expected value at line 1".into()),
            SubmitFailure::MissingImage,
        ];
        for failure in failures {
            let json = serde_json::to_string(&failure).expect("serialize");
            let back: SubmitFailure = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, failure);
        }
    }

    #[test]
    fn server_side_and_throttled_failures_are_retryable() {
        let status = |status| SubmitFailure::HttpStatus {
            status,
            detail: String::new(),
        };
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(!status(422).is_retryable());
        assert!(SubmitFailure::Transport("timed out".into()).is_retryable());
        assert!(!SubmitFailure::MalformedResponse("html".into()).is_retryable());
    }
}
