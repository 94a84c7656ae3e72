//! Form capture: six text fields, one speaker photo, and the submission state machine.

use std::{fs, io, path::Path, sync::Arc};

use shared::{
    domain::{FieldName, FormFields, GeneratedImage},
    error::SubmitFailure,
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::preview::{PreviewRef, PreviewRegistry};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerPhoto {
    file_name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SpeakerPhoto {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: Arc::from(bytes),
        }
    }

    /// MIME type is guessed from the file extension.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_raw()
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();
        Self::new(file_name, mime_type, bytes)
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "speaker_photo".to_string());
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug)]
struct AttachedPhoto {
    photo: SpeakerPhoto,
    preview: PreviewRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(SubmitFailure),
}

impl SubmissionState {
    pub fn failure(&self) -> Option<&SubmitFailure> {
        match self {
            SubmissionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Snapshot of the form taken when a submission begins.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub fields: FormFields,
    pub photo: SpeakerPhoto,
}

/// One-shot ticket for the submission currently in flight.
///
/// Not `Clone`: completing consumes it, so an attempt resolves exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingSubmission {
    id: Uuid,
}

impl PendingSubmission {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("a poster submission is already in progress")]
    SubmissionInFlight,
    #[error("required fields are empty: {}", join_fields(.0))]
    MissingFields(Vec<FieldName>),
    #[error("a speaker photo is required")]
    MissingPhoto,
    #[error("submission ticket does not match the submission in progress")]
    StaleSubmission,
}

fn join_fields(fields: &[FieldName]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Default)]
pub struct FormCapture {
    fields: FormFields,
    photo: Option<AttachedPhoto>,
    previews: PreviewRegistry,
    state: SubmissionState,
    in_flight: Option<Uuid>,
}

impl FormCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn field(&self, name: FieldName) -> &str {
        self.fields.get(name)
    }

    pub fn update_field(&mut self, name: FieldName, value: impl Into<String>) {
        self.fields.set(name, value);
    }

    /// Replaces any current photo; the previous preview reference is released.
    pub fn select_photo(&mut self, photo: SpeakerPhoto) -> PreviewRef {
        self.release_current_preview();
        let preview = self.previews.register(Arc::clone(&photo.bytes));
        info!(
            file_name = photo.file_name(),
            mime_type = photo.mime_type(),
            size_bytes = photo.len(),
            "speaker photo selected"
        );
        self.photo = Some(AttachedPhoto {
            photo,
            preview: preview.clone(),
        });
        preview
    }

    /// Returns `false` when there was no photo to clear.
    pub fn clear_photo(&mut self) -> bool {
        let cleared = self.release_current_preview();
        self.photo = None;
        cleared
    }

    fn release_current_preview(&mut self) -> bool {
        match self.photo.take() {
            Some(attached) => {
                self.previews.release(&attached.preview);
                true
            }
            None => false,
        }
    }

    pub fn photo(&self) -> Option<&SpeakerPhoto> {
        self.photo.as_ref().map(|attached| &attached.photo)
    }

    pub fn preview(&self) -> Option<&PreviewRef> {
        self.photo.as_ref().map(|attached| &attached.preview)
    }

    pub fn resolve_preview(&self, preview: &PreviewRef) -> Option<Arc<[u8]>> {
        self.previews.resolve(preview)
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    pub fn missing_fields(&self) -> Vec<FieldName> {
        self.fields.missing()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.photo.is_some() && self.missing_fields().is_empty()
    }

    pub fn begin_submission(&mut self) -> Result<(PendingSubmission, SubmissionPayload), FormError> {
        if self.is_submitting() {
            return Err(FormError::SubmissionInFlight);
        }
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }
        let Some(attached) = &self.photo else {
            return Err(FormError::MissingPhoto);
        };

        let payload = SubmissionPayload {
            fields: self.fields.clone(),
            photo: attached.photo.clone(),
        };
        let pending = PendingSubmission { id: Uuid::new_v4() };
        self.in_flight = Some(pending.id);
        self.state = SubmissionState::Submitting;
        info!(submission_id = %pending.id, "poster submission started");
        Ok((pending, payload))
    }

    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        outcome: &Result<GeneratedImage, SubmitFailure>,
    ) -> Result<(), FormError> {
        if self.in_flight != Some(pending.id) {
            return Err(FormError::StaleSubmission);
        }
        self.in_flight = None;
        self.state = match outcome {
            Ok(_) => {
                info!(submission_id = %pending.id, "poster submission succeeded");
                SubmissionState::Succeeded
            }
            Err(reason) => {
                warn!(submission_id = %pending.id, "poster submission failed: {reason}");
                SubmissionState::Failed(reason.clone())
            }
        };
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
