use super::*;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use shared::domain::FieldName;

use crate::form::{SpeakerPhoto, SubmissionState};

struct TestPosterBackend {
    outcome: Result<GeneratedImage, SubmitFailure>,
    calls: AtomicUsize,
    last_payload: Mutex<Option<SubmissionPayload>>,
}

impl TestPosterBackend {
    fn ok(image: &str) -> Self {
        Self::with_outcome(Ok(GeneratedImage::new(image)))
    }

    fn failing(reason: SubmitFailure) -> Self {
        Self::with_outcome(Err(reason))
    }

    fn with_outcome(outcome: Result<GeneratedImage, SubmitFailure>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
        }
    }
}

#[async_trait]
impl PosterBackend for TestPosterBackend {
    async fn generate_poster(
        &self,
        payload: SubmissionPayload,
    ) -> Result<GeneratedImage, SubmitFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().expect("lock") = Some(payload);
        self.outcome.clone()
    }
}

fn ready_session(settings: &ClientSettings) -> PosterSession {
    let mut session = PosterSession::new(settings);
    let form = session.form_mut();
    for field in FieldName::ALL {
        form.update_field(field, format!("{} text", field.label()));
    }
    form.select_photo(SpeakerPhoto::from_bytes("speaker.png", b"png".to_vec()));
    session
}

#[tokio::test]
async fn successful_submit_stores_image_and_navigates() {
    let settings = ClientSettings::default();
    let mut session = ready_session(&settings);
    let backend = TestPosterBackend::ok("QQ==");

    let route = session.submit(&backend).await.expect("submit");

    assert_eq!(route, Route::PosterDisplay);
    assert_eq!(session.route(), Route::PosterDisplay);
    assert_eq!(session.store().read(), Some(GeneratedImage::new("QQ==")));
    assert_eq!(session.form().state(), &SubmissionState::Succeeded);
    let source = session.display().image_source().expect("image");
    assert!(source.contains("QQ=="));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_image_keeps_route_and_store() {
    let settings = ClientSettings::default();
    let mut session = ready_session(&settings);
    session.store().write(GeneratedImage::new("cHJldmlvdXM="));

    let backend = TestPosterBackend::failing(SubmitFailure::MissingImage);
    let err = session.submit(&backend).await.expect_err("no image");

    assert_eq!(err, SessionError::Submit(SubmitFailure::MissingImage));
    assert_eq!(session.route(), Route::Create);
    assert_eq!(
        session.store().read(),
        Some(GeneratedImage::new("cHJldmlvdXM="))
    );
    assert_eq!(
        session.form().state().failure(),
        Some(&SubmitFailure::MissingImage)
    );
}

#[tokio::test]
async fn incomplete_form_never_reaches_backend() {
    let settings = ClientSettings::default();
    let mut session = PosterSession::new(&settings);
    let backend = TestPosterBackend::ok("QQ==");

    let err = session.submit(&backend).await.expect_err("incomplete");

    assert!(matches!(err, SessionError::Form(FormError::MissingFields(_))));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.form().state(), &SubmissionState::Idle);
}

#[tokio::test]
async fn backend_receives_form_snapshot() {
    let settings = ClientSettings::default();
    let mut session = ready_session(&settings);
    let backend = TestPosterBackend::ok("QQ==");

    session.submit(&backend).await.expect("submit");

    let payload = backend
        .last_payload
        .lock()
        .expect("lock")
        .clone()
        .expect("payload");
    assert_eq!(&payload.fields, session.form().fields());
    assert_eq!(payload.photo.bytes(), b"png");
}

#[test]
fn split_submission_rejects_second_begin() {
    let settings = ClientSettings::default();
    let mut session = ready_session(&settings);

    let (pending, _payload) = session.begin_submission().expect("begin");
    assert_eq!(
        session.begin_submission().err(),
        Some(FormError::SubmissionInFlight)
    );

    let outcome = session
        .complete_submission(pending, Ok(GeneratedImage::new("QQ==")))
        .expect("complete");
    assert_eq!(outcome, Ok(Route::PosterDisplay));
}

#[test]
fn retry_keeps_image_by_default() {
    let settings = ClientSettings::default();
    let mut session = ready_session(&settings);
    session.store().write(GeneratedImage::new("QQ=="));
    session.navigate(Route::PosterDisplay);

    assert_eq!(session.retry(), Route::Create);
    assert_eq!(session.store().read(), Some(GeneratedImage::new("QQ==")));
    assert_eq!(session.form().field(FieldName::SpeakerName), "Speaker Name text");
}

#[test]
fn retry_clears_image_when_configured() {
    let settings = ClientSettings {
        clear_image_on_retry: true,
        ..ClientSettings::default()
    };
    let mut session = ready_session(&settings);
    session.store().write(GeneratedImage::new("QQ=="));
    session.navigate(Route::PosterDisplay);

    session.retry();
    assert!(session.store().read().is_none());
    assert!(!session.display().has_poster());
}

#[test]
fn sessions_can_share_an_external_store() {
    let settings = ClientSettings::default();
    let store = ImageHandoffStore::new();
    let mut session = PosterSession::with_store(&settings, store.clone());
    session.form_mut().update_field(FieldName::BgPrompt, "x");
    store.write(GeneratedImage::new("QQ=="));
    assert!(session.display().has_poster());
}
