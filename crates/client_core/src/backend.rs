use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::GeneratedImage,
    error::SubmitFailure,
    protocol::{error_detail_from_body, GeneratePosterResponse, GENERATE_POSTER_PATH, SPEAKER_PHOTO_PART},
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::{
    config::{ClientSettings, SettingsError},
    form::SubmissionPayload,
};

const FALLBACK_PART_MIME: &str = "application/octet-stream";

#[async_trait]
pub trait PosterBackend: Send + Sync {
    async fn generate_poster(
        &self,
        payload: SubmissionPayload,
    ) -> Result<GeneratedImage, SubmitFailure>;
}

#[derive(Debug, Error)]
pub enum BackendInitError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct HttpPosterBackend {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpPosterBackend {
    pub fn new(settings: &ClientSettings) -> Result<Self, BackendInitError> {
        let endpoint = endpoint_for(settings.backend_url()?)?;
        let timeout = settings.request_timeout();
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn describe_transport_error(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else if err.is_connect() {
            format!("failed to connect to {}: {err}", self.endpoint)
        } else {
            err.to_string()
        }
    }
}

/// Appends the generate path to the base path. Query string is kept, fragment dropped.
fn endpoint_for(mut base: Url) -> Result<Url, SettingsError> {
    base.set_fragment(None);
    let shown = base.to_string();
    match base.path_segments_mut() {
        Ok(mut segments) => {
            segments
                .pop_if_empty()
                .extend(GENERATE_POSTER_PATH.split('/').filter(|segment| !segment.is_empty()));
        }
        Err(()) => return Err(SettingsError::UnsupportedScheme(shown)),
    }
    Ok(base)
}

/// Multipart body: six text parts in form order, then the `speaker_photo` file part.
pub fn build_multipart(payload: &SubmissionPayload) -> Result<Form, SubmitFailure> {
    let mut form = Form::new();
    for (name, value) in payload.fields.wire_pairs() {
        form = form.text(name, value.to_string());
    }

    let photo = &payload.photo;
    let mime = if photo.mime_type().parse::<mime_guess::Mime>().is_ok() {
        photo.mime_type()
    } else {
        FALLBACK_PART_MIME
    };
    let part = Part::bytes(photo.bytes().to_vec())
        .file_name(photo.file_name().to_string())
        .mime_str(mime)
        .map_err(|err| SubmitFailure::Transport(format!("invalid photo content type: {err}")))?;
    Ok(form.part(SPEAKER_PHOTO_PART, part))
}

/// Maps a completed HTTP exchange onto the poster outcome.
pub fn interpret_response(status: u16, body: &str) -> Result<GeneratedImage, SubmitFailure> {
    if !(200..300).contains(&status) {
        return Err(SubmitFailure::HttpStatus {
            status,
            detail: error_detail_from_body(body),
        });
    }
    let parsed: GeneratePosterResponse = serde_json::from_str(body)
        .map_err(|err| SubmitFailure::MalformedResponse(err.to_string()))?;
    parsed.into_image().ok_or(SubmitFailure::MissingImage)
}

#[async_trait]
impl PosterBackend for HttpPosterBackend {
    async fn generate_poster(
        &self,
        payload: SubmissionPayload,
    ) -> Result<GeneratedImage, SubmitFailure> {
        let form = build_multipart(&payload)?;
        info!(
            endpoint = %self.endpoint,
            speaker_photo = payload.photo.file_name(),
            "requesting webinar poster"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                let reason = self.describe_transport_error(&err);
                warn!("poster request failed: {reason}");
                SubmitFailure::Transport(reason)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            let reason = self.describe_transport_error(&err);
            warn!(status, "failed to read poster response body: {reason}");
            SubmitFailure::Transport(reason)
        })?;

        let outcome = interpret_response(status, &body);
        match &outcome {
            Ok(image) => info!(
                status,
                payload_len = image.as_base64().len(),
                "poster generated"
            ),
            Err(reason) => warn!(status, "poster generation unsuccessful: {reason}"),
        }
        outcome
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
