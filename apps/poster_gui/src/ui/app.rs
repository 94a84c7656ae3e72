use std::time::Duration;

use client_core::{
    display::decode_poster, FormError, PendingSubmission, PosterDisplay, PosterSession,
    PreviewRef, Route, SpeakerPhoto,
};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use shared::error::SubmitFailure;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::images::{decode_for_texture, DecodedImage};
use crate::ui::{create_screen, display_screen};

const PHOTO_PREVIEW_MAX_SIDE: u32 = 320;
const POSTER_MAX_SIDE: u32 = 2048;

pub struct PhotoPreview {
    pub preview: PreviewRef,
    pub texture: Option<egui::TextureHandle>,
    pub error: Option<String>,
}

/// Decoded state of whatever the handoff store held last time it was read.
pub struct PosterView {
    pub display: PosterDisplay,
    pub texture: Option<egui::TextureHandle>,
    pub decoded: Option<DecodedImage>,
    pub error: Option<String>,
    decoded_version: Option<u64>,
}

pub struct PosterGuiApp {
    pub session: PosterSession,
    pending: Option<PendingSubmission>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    pub status: String,
    pub banner: Option<UiError>,
    pub photo_preview: Option<PhotoPreview>,
    pub poster: PosterView,
    worker_alive: bool,
}

impl PosterGuiApp {
    pub fn new(
        session: PosterSession,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup_banner: Option<UiError>,
    ) -> Self {
        let display = session.display();
        Self {
            session,
            pending: None,
            cmd_tx,
            ui_rx,
            status: "Ready".to_string(),
            banner: startup_banner,
            photo_preview: None,
            poster: PosterView {
                display,
                texture: None,
                decoded: None,
                error: None,
                decoded_version: None,
            },
            worker_alive: true,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.session.form().is_submitting()
    }

    pub fn attach_photo(&mut self, photo: SpeakerPhoto) {
        let preview = self.session.form_mut().select_photo(photo);
        self.photo_preview = Some(PhotoPreview {
            preview,
            texture: None,
            error: None,
        });
    }

    pub fn clear_photo(&mut self) {
        self.session.form_mut().clear_photo();
        self.photo_preview = None;
    }

    pub fn submit(&mut self) {
        let (pending, payload) = match self.session.begin_submission() {
            Ok(started) => started,
            Err(err) => {
                self.show_form_error(&err);
                return;
            }
        };
        self.banner = None;
        let submission_id = pending.id();
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::GeneratePoster {
                submission_id,
                payload,
            },
            &mut self.status,
        );
        if queued {
            self.status = "Generating poster...".to_string();
            self.pending = Some(pending);
        } else {
            self.finish_submission(
                pending,
                Err(SubmitFailure::Transport(
                    "backend worker unavailable".to_string(),
                )),
            );
        }
    }

    pub fn retry(&mut self) {
        self.session.retry();
        self.banner = None;
        self.status = "Ready".to_string();
    }

    pub fn process_ui_events(&mut self) {
        loop {
            match self.ui_rx.try_recv() {
                Ok(UiEvent::Info(message)) => {
                    tracing::info!("{message}");
                    self.status = message;
                }
                Ok(UiEvent::Error(err)) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status = err.banner_text();
                    self.banner = Some(err);
                }
                Ok(UiEvent::PosterFinished {
                    submission_id,
                    outcome,
                }) => match self.pending.take() {
                    Some(pending) if pending.id() == submission_id => {
                        self.finish_submission(pending, outcome);
                    }
                    other => {
                        tracing::warn!(%submission_id, "ignoring result for a submission that is no longer pending");
                        self.pending = other;
                    }
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.worker_alive {
                        self.worker_alive = false;
                        tracing::error!("backend event channel disconnected");
                    }
                    if let Some(pending) = self.pending.take() {
                        self.finish_submission(
                            pending,
                            Err(SubmitFailure::Transport(
                                "backend worker stopped before replying".to_string(),
                            )),
                        );
                    }
                    break;
                }
            }
        }
    }

    fn finish_submission(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<shared::domain::GeneratedImage, SubmitFailure>,
    ) {
        match self.session.complete_submission(pending, outcome) {
            Ok(Ok(_route)) => {
                self.banner = None;
                self.status = "Poster ready".to_string();
            }
            Ok(Err(reason)) => {
                let err = UiError::from_submit_failure(&reason);
                self.status = err.banner_text();
                self.banner = Some(err);
            }
            Err(err) => self.show_form_error(&err),
        }
    }

    fn show_form_error(&mut self, err: &FormError) {
        let ui_err = UiError::from_message(UiErrorContext::Submit, err.to_string());
        self.status = ui_err.banner_text();
        self.banner = Some(ui_err);
    }

    /// Re-reads the handoff store and decodes the poster if it changed.
    pub fn sync_poster(&mut self) {
        let store = self.session.store();
        self.poster.display.refresh(store);
        let version = store.version();
        if self.poster.decoded_version == Some(version) {
            return;
        }
        self.poster.decoded_version = Some(version);
        self.poster.texture = None;
        self.poster.decoded = None;
        self.poster.error = None;

        let Some(image) = self.poster.display.image() else {
            return;
        };
        let decoded = decode_poster(image)
            .map_err(|err| err.to_string())
            .and_then(|bytes| decode_for_texture(&bytes, POSTER_MAX_SIDE));
        match decoded {
            Ok(decoded) => self.poster.decoded = Some(decoded),
            Err(err) => {
                tracing::warn!("generated poster could not be decoded: {err}");
                self.poster.error = Some(err);
            }
        }
    }

    fn ensure_textures(&mut self, ctx: &egui::Context) {
        if let Some(preview) = &mut self.photo_preview {
            if preview.texture.is_none() && preview.error.is_none() {
                let bytes = self.session.form().resolve_preview(&preview.preview);
                match bytes.map(|bytes| decode_for_texture(&bytes, PHOTO_PREVIEW_MAX_SIDE)) {
                    Some(Ok(decoded)) => {
                        preview.texture = Some(ctx.load_texture(
                            preview.preview.as_url(),
                            decoded.to_color_image(),
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                    Some(Err(err)) => preview.error = Some(err),
                    None => preview.error = Some("preview released".to_string()),
                }
            }
        }

        if self.session.route() == Route::PosterDisplay {
            self.sync_poster();
            if self.poster.texture.is_none() {
                if let Some(decoded) = &self.poster.decoded {
                    self.poster.texture = Some(ctx.load_texture(
                        "generated-poster",
                        decoded.to_color_image(),
                        egui::TextureOptions::LINEAR,
                    ));
                }
            }
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.is_submitting() {
                    ui.add(egui::Spinner::new());
                }
                ui.small(&self.status);
            });
        });
    }
}

impl eframe::App for PosterGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.ensure_textures(ctx);
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.session.route() {
                    Route::Create => create_screen::show(self, ui),
                    Route::PosterDisplay => display_screen::show(self, ui),
                });
        });

        if self.is_submitting() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
