//! Client side of the webinar poster generator: form capture, the poster
//! handoff between screens, and the HTTP call to the generation service.

pub mod backend;
pub mod config;
pub mod display;
pub mod form;
pub mod preview;
pub mod route;
pub mod session;
pub mod store;

pub use backend::{BackendInitError, HttpPosterBackend, PosterBackend};
pub use config::{load_settings, load_settings_from, ClientSettings, SettingsError};
pub use display::{DisplayError, PosterDisplay, PosterDownload};
pub use form::{
    FormCapture, FormError, PendingSubmission, SpeakerPhoto, SubmissionPayload, SubmissionState,
};
pub use preview::{PreviewRef, PreviewRegistry};
pub use route::Route;
pub use session::{PosterSession, SessionError};
pub use store::ImageHandoffStore;
