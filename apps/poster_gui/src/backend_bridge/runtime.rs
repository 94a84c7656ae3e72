//! Runtime bridge between UI command queue and the poster service.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, HttpPosterBackend, PosterBackend};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: ClientSettings,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let backend: Arc<dyn PosterBackend> = match HttpPosterBackend::new(&settings) {
            Ok(backend) => {
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "Poster service: {}",
                    backend.endpoint()
                )));
                Arc::new(backend)
            }
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: {err}"),
                )));
                tracing::error!("failed to build poster backend: {err}");
                return;
            }
        };

        serve_commands(&runtime, backend, cmd_rx, ui_tx);
        tracing::info!("backend command queue closed; worker exiting");
    })
}

/// Drains `cmd_rx` until every UI sender is gone. Requests run concurrently on
/// `runtime`; each one reports back through exactly one `PosterFinished` event.
pub fn serve_commands(
    runtime: &tokio::runtime::Runtime,
    backend: Arc<dyn PosterBackend>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::GeneratePoster {
                submission_id,
                payload,
            } => {
                let backend = Arc::clone(&backend);
                let ui_tx = ui_tx.clone();
                runtime.spawn(async move {
                    tracing::debug!(%submission_id, "generating poster");
                    let outcome = backend.generate_poster(payload).await;
                    if let Err(err) = &outcome {
                        tracing::warn!(%submission_id, kind = ?err.kind(), "poster generation failed");
                    }
                    if ui_tx
                        .send(UiEvent::PosterFinished {
                            submission_id,
                            outcome,
                        })
                        .is_err()
                    {
                        tracing::warn!(%submission_id, "ui closed before poster result arrived");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use async_trait::async_trait;
    use client_core::{SpeakerPhoto, SubmissionPayload};
    use crossbeam_channel::bounded;
    use shared::{
        domain::{FieldName, FormFields, GeneratedImage},
        error::SubmitFailure,
    };
    use uuid::Uuid;

    struct EchoTitleBackend;

    #[async_trait]
    impl PosterBackend for EchoTitleBackend {
        async fn generate_poster(
            &self,
            payload: SubmissionPayload,
        ) -> Result<GeneratedImage, SubmitFailure> {
            let title = payload.fields.get(FieldName::WebinarTitle);
            if title.is_empty() {
                Err(SubmitFailure::MissingImage)
            } else {
                Ok(GeneratedImage::new(title))
            }
        }
    }

    fn command(title: &str) -> (Uuid, BackendCommand) {
        let mut fields = FormFields::default();
        fields.set(FieldName::WebinarTitle, title);
        let id = Uuid::new_v4();
        (
            id,
            BackendCommand::GeneratePoster {
                submission_id: id,
                payload: SubmissionPayload {
                    fields,
                    photo: SpeakerPhoto::from_bytes("s.png", vec![0]),
                },
            },
        )
    }

    #[test]
    fn each_command_reports_its_own_outcome() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("runtime");
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(4);

        let (ok_id, ok_cmd) = command("QQ==");
        let (empty_id, empty_cmd) = command("");
        cmd_tx.send(ok_cmd).expect("queue");
        cmd_tx.send(empty_cmd).expect("queue");
        drop(cmd_tx);

        serve_commands(&runtime, Arc::new(EchoTitleBackend), cmd_rx, ui_tx);

        let mut seen = Vec::new();
        for _ in 0..2 {
            match ui_rx.recv_timeout(Duration::from_secs(5)).expect("event") {
                UiEvent::PosterFinished {
                    submission_id,
                    outcome,
                } => seen.push((submission_id, outcome)),
                _ => panic!("unexpected event"),
            }
        }
        seen.sort_by_key(|(id, _)| *id != ok_id);
        assert_eq!(seen[0], (ok_id, Ok(GeneratedImage::new("QQ=="))));
        assert_eq!(seen[1], (empty_id, Err(SubmitFailure::MissingImage)));
    }
}
