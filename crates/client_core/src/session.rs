//! Application-level state: the form, the handoff store, and the current screen.

use shared::{domain::GeneratedImage, error::SubmitFailure};
use tracing::info;

use crate::{
    backend::PosterBackend,
    config::ClientSettings,
    display::PosterDisplay,
    form::{FormCapture, FormError, PendingSubmission, SubmissionPayload},
    route::Route,
    store::ImageHandoffStore,
};

#[derive(Debug)]
pub struct PosterSession {
    form: FormCapture,
    store: ImageHandoffStore,
    route: Route,
    clear_image_on_retry: bool,
}

impl PosterSession {
    pub fn new(settings: &ClientSettings) -> Self {
        Self::with_store(settings, ImageHandoffStore::new())
    }

    pub fn with_store(settings: &ClientSettings, store: ImageHandoffStore) -> Self {
        Self {
            form: FormCapture::new(),
            store,
            route: Route::Create,
            clear_image_on_retry: settings.clear_image_on_retry,
        }
    }

    pub fn form(&self) -> &FormCapture {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormCapture {
        &mut self.form
    }

    pub fn store(&self) -> &ImageHandoffStore {
        &self.store
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            info!(from = %self.route, to = %route, "navigating");
            self.route = route;
        }
    }

    pub fn begin_submission(&mut self) -> Result<(PendingSubmission, SubmissionPayload), FormError> {
        self.form.begin_submission()
    }

    /// On success the poster is stored and the display screen becomes current.
    /// On failure the route and the store are left untouched.
    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<GeneratedImage, SubmitFailure>,
    ) -> Result<Result<Route, SubmitFailure>, FormError> {
        self.form.complete_submission(pending, &outcome)?;
        Ok(match outcome {
            Ok(image) => {
                self.store.write(image);
                self.navigate(Route::PosterDisplay);
                Ok(self.route)
            }
            Err(reason) => Err(reason),
        })
    }

    /// Runs one submission end to end. `&mut self` is held across the request,
    /// so a second submit cannot start until this one resolves.
    pub async fn submit<B>(&mut self, backend: &B) -> Result<Route, SessionError>
    where
        B: PosterBackend + ?Sized,
    {
        let (pending, payload) = self.begin_submission()?;
        let outcome = backend.generate_poster(payload).await;
        self.complete_submission(pending, outcome)?
            .map_err(SessionError::Submit)
    }

    pub fn display(&self) -> PosterDisplay {
        PosterDisplay::from_store(&self.store)
    }

    pub fn retry(&mut self) -> Route {
        if self.clear_image_on_retry {
            self.store.clear();
        }
        self.navigate(Route::Create);
        self.route
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Submit(#[from] SubmitFailure),
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
