use serde::{Deserialize, Serialize};

pub const FORM_TITLE: &str = "ME Webinar Poster Generator";
pub const FORM_NOTE: &str = "note: add a \"/\" whenever you want a newline";

/// MIME type assumed for every generated poster.
pub const POSTER_MIME_TYPE: &str = "image/png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    BgPrompt,
    WebinarTitle,
    WebinarDescription,
    WebinarDateTime,
    SpeakerName,
    SpeakerDesignation,
}

impl FieldName {
    /// Form order, which is also the multipart part order.
    pub const ALL: [FieldName; 6] = [
        FieldName::BgPrompt,
        FieldName::WebinarTitle,
        FieldName::WebinarDescription,
        FieldName::WebinarDateTime,
        FieldName::SpeakerName,
        FieldName::SpeakerDesignation,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            FieldName::BgPrompt => "bg_prompt",
            FieldName::WebinarTitle => "webinar_title",
            FieldName::WebinarDescription => "webinar_description",
            FieldName::WebinarDateTime => "webinar_date_time",
            FieldName::SpeakerName => "speaker_name",
            FieldName::SpeakerDesignation => "speaker_designation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldName::BgPrompt => "Background Image Prompt",
            FieldName::WebinarTitle => "Webinar Title",
            FieldName::WebinarDescription => "Webinar Description",
            FieldName::WebinarDateTime => "Webinar Date & Time",
            FieldName::SpeakerName => "Speaker Name",
            FieldName::SpeakerDesignation => "Speaker Designation",
        }
    }

    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            FieldName::WebinarTitle => Some("ME/WEBINAR"),
            FieldName::WebinarDateTime => Some("WEDNESDAY/21 FEB 2024/8:00 PM"),
            _ => None,
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, FieldName::WebinarDescription)
    }

}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub bg_prompt: String,
    pub webinar_title: String,
    pub webinar_description: String,
    pub webinar_date_time: String,
    pub speaker_name: String,
    pub speaker_designation: String,
}

impl FormFields {
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::BgPrompt => &self.bg_prompt,
            FieldName::WebinarTitle => &self.webinar_title,
            FieldName::WebinarDescription => &self.webinar_description,
            FieldName::WebinarDateTime => &self.webinar_date_time,
            FieldName::SpeakerName => &self.speaker_name,
            FieldName::SpeakerDesignation => &self.speaker_designation,
        }
    }

    pub fn get_mut(&mut self, field: FieldName) -> &mut String {
        match field {
            FieldName::BgPrompt => &mut self.bg_prompt,
            FieldName::WebinarTitle => &mut self.webinar_title,
            FieldName::WebinarDescription => &mut self.webinar_description,
            FieldName::WebinarDateTime => &mut self.webinar_date_time,
            FieldName::SpeakerName => &mut self.speaker_name,
            FieldName::SpeakerDesignation => &mut self.speaker_designation,
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Required fields that are empty or whitespace-only, in form order.
    pub fn missing(&self) -> Vec<FieldName> {
        FieldName::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// `(wire_name, value)` pairs in form order.
    pub fn wire_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        FieldName::ALL
            .into_iter()
            .map(move |field| (field.wire_name(), self.get(field)))
    }
}

/// Base64 poster payload as returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedImage(String);

impl GeneratedImage {
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    /// Embeds the payload exactly as received; no trimming or re-encoding.
    pub fn data_url(&self) -> String {
        format!("data:{POSTER_MIME_TYPE};base64,{}", self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for GeneratedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_pairs_follow_form_order() {
        let mut fields = FormFields::default();
        fields.set(FieldName::SpeakerName, "Ana");
        let names: Vec<&str> = fields.wire_pairs().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            [
                "bg_prompt",
                "webinar_title",
                "webinar_description",
                "webinar_date_time",
                "speaker_name",
                "speaker_designation",
            ]
        );
        assert_eq!(fields.wire_pairs().nth(4), Some(("speaker_name", "Ana")));
    }

    #[test]
    fn whitespace_only_values_count_as_missing() {
        let mut fields = FormFields::default();
        fields.set(FieldName::BgPrompt, "neon city skyline");
        fields.set(FieldName::WebinarTitle, "   ");
        let missing = fields.missing();
        assert!(!missing.contains(&FieldName::BgPrompt));
        assert_eq!(missing.first(), Some(&FieldName::WebinarTitle));
        assert_eq!(missing.len(), 5);
    }

    #[test]
    fn data_url_embeds_payload_verbatim() {
        let image = GeneratedImage::new("QQ==");
        assert_eq!(image.data_url(), "data:image/png;base64,QQ==");

        let padded = GeneratedImage::new("QQ==\n");
        assert_eq!(padded.data_url(), "data:image/png;base64,QQ==\n");
    }
}
