use serde::{Deserialize, Serialize};

use crate::domain::GeneratedImage;

pub const GENERATE_POSTER_PATH: &str = "/generate_webinar_poster";
pub const SPEAKER_PHOTO_PART: &str = "speaker_photo";

const MAX_ERROR_DETAIL_CHARS: usize = 240;

/// Success body of `POST /generate_webinar_poster`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePosterResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl GeneratePosterResponse {
    /// An empty `image` string counts as no poster.
    pub fn into_image(self) -> Option<GeneratedImage> {
        self.image
            .filter(|image| !image.trim().is_empty())
            .map(GeneratedImage::new)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Best-effort human readable detail from an error response body.
pub fn error_detail_from_body(body: &str) -> String {
    let body = body.trim();
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let detail = match parsed.detail {
            Some(serde_json::Value::String(text)) => Some(text),
            Some(other) => Some(other.to_string()),
            None => None,
        };
        if let Some(text) = detail.or(parsed.error).or(parsed.message) {
            return truncate_detail(&text);
        }
    }
    truncate_detail(body)
}

fn truncate_detail(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_DETAIL_CHARS {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_image_and_ignores_unknown_fields() {
        let parsed: GeneratePosterResponse =
            serde_json::from_str(r#"{"image":"QQ==","elapsed_ms":812}"#).expect("response");
        assert_eq!(
            parsed.into_image().map(GeneratedImage::into_inner),
            Some("QQ==".to_string())
        );
    }

    #[test]
    fn empty_object_has_no_image() {
        let parsed: GeneratePosterResponse = serde_json::from_str("{}").expect("response");
        assert!(parsed.into_image().is_none());
    }

    #[test]
    fn blank_image_string_has_no_image() {
        let parsed: GeneratePosterResponse =
            serde_json::from_str(r#"{"image":"  "}"#).expect("response");
        assert!(parsed.into_image().is_none());
    }

    #[test]
    fn error_detail_prefers_detail_field() {
        assert_eq!(
            error_detail_from_body(r#"{"detail":"speaker_photo is required"}"#),
            "speaker_photo is required"
        );
        assert_eq!(error_detail_from_body(r#"{"error":"boom"}"#), "boom");
        assert_eq!(error_detail_from_body("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn error_detail_is_truncated() {
        let long = "x".repeat(1000);
        let detail = error_detail_from_body(&long);
        assert_eq!(detail.chars().count(), MAX_ERROR_DETAIL_CHARS + 1);
        assert!(detail.ends_with('…'));
    }
}
