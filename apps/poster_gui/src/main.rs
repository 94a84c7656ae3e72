mod backend_bridge;
mod controller;
mod ui;

use std::path::{Path, PathBuf};

use client_core::{
    config::DEFAULT_SETTINGS_FILE, load_settings_from, ClientSettings, PosterSession,
};
use crossbeam_channel::bounded;
use shared::domain::FORM_TITLE;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::app::PosterGuiApp;

const CONFIG_DIR_NAME: &str = "webinar_poster";

/// `./poster.toml` wins; otherwise `<config dir>/webinar_poster/poster.toml` when present.
fn settings_file(cwd_file: &Path, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    if cwd_file.is_file() {
        return Some(cwd_file.to_path_buf());
    }
    config_dir
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(DEFAULT_SETTINGS_FILE))
        .filter(|path| path.is_file())
}

fn resolve_settings() -> (ClientSettings, Option<UiError>) {
    let path = settings_file(Path::new(DEFAULT_SETTINGS_FILE), dirs::config_dir());
    match load_settings_from(path.as_deref()) {
        Ok(settings) => (settings, None),
        Err(err) => {
            tracing::error!("invalid settings, falling back to defaults: {err}");
            let banner = UiError::from_message(
                UiErrorContext::Settings,
                format!("invalid settings ({err}); using defaults"),
            );
            (ClientSettings::default(), Some(banner))
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (settings, startup_banner) = resolve_settings();
    tracing::info!(
        backend = %settings.backend_base_url,
        timeout_secs = settings.request_timeout_secs,
        "starting poster gui"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let session = PosterSession::new(&settings);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(FORM_TITLE)
            .with_inner_size([760.0, 860.0])
            .with_min_inner_size([560.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        FORM_TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(PosterGuiApp::new(
                session,
                cmd_tx,
                ui_rx,
                startup_banner,
            )))
        }),
    )
}
