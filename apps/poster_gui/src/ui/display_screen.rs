//! Result screen: the generated poster plus download, copy and retry actions.

use chrono::Local;

use crate::controller::events::{UiError, UiErrorContext};
use crate::ui::app::PosterGuiApp;
use crate::ui::create_screen::show_banner;
use crate::ui::images::{human_readable_bytes, suggested_poster_file_name, write_clipboard_image};

enum DisplayAction {
    None,
    Download,
    Copy,
    Retry,
}

pub fn show(app: &mut PosterGuiApp, ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.heading("Generated Poster");
    });
    ui.add_space(8.0);
    show_banner(app, ui, false);

    let mut action = DisplayAction::None;
    let poster = &app.poster;

    if let Some(message) = poster.display.placeholder_message() {
        ui.vertical_centered(|ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("Try Again").clicked() {
                action = DisplayAction::Retry;
            }
        });
    } else {
        match (&poster.texture, &poster.error) {
            (Some(texture), _) => {
                let max_width = ui.available_width().min(900.0);
                ui.vertical_centered(|ui| {
                    ui.add(egui::Image::new(texture).max_width(max_width));
                });
            }
            (None, Some(err)) => {
                ui.colored_label(
                    egui::Color32::from_rgb(220, 90, 90),
                    format!("The poster could not be shown: {err}"),
                );
            }
            (None, None) => {
                ui.add(egui::Spinner::new());
            }
        }
        if let Some(decoded) = &poster.decoded {
            ui.vertical_centered(|ui| {
                ui.small(format!(
                    "{} x {} px, {}",
                    decoded.width,
                    decoded.height,
                    human_readable_bytes(poster_payload_len(app) as u64)
                ));
            });
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Download Poster").clicked() {
                action = DisplayAction::Download;
            }
            if ui
                .add_enabled(poster.decoded.is_some(), egui::Button::new("Copy image"))
                .clicked()
            {
                action = DisplayAction::Copy;
            }
            if ui.button("Try Again").clicked() {
                action = DisplayAction::Retry;
            }
        });
    }

    match action {
        DisplayAction::None => {}
        DisplayAction::Retry => app.retry(),
        DisplayAction::Download => download(app),
        DisplayAction::Copy => copy_to_clipboard(app),
    }
}

/// Approximate decoded size from the base64 length.
fn poster_payload_len(app: &PosterGuiApp) -> usize {
    app.poster
        .display
        .image()
        .map(|image| image.as_base64().trim().len() / 4 * 3)
        .unwrap_or(0)
}

fn download(app: &mut PosterGuiApp) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(suggested_poster_file_name(Local::now()))
        .add_filter("PNG image", &["png"])
        .save_file()
    else {
        return;
    };
    match app.poster.display.save_to(&path) {
        Ok(download) => {
            app.status = format!(
                "Saved {} to {}",
                human_readable_bytes(download.bytes.len() as u64),
                path.display()
            );
        }
        Err(err) => report(app, UiErrorContext::Download, err.to_string()),
    }
}

fn copy_to_clipboard(app: &mut PosterGuiApp) {
    let Some(decoded) = &app.poster.decoded else {
        return;
    };
    match write_clipboard_image(decoded) {
        Ok(()) => app.status = "Poster copied to clipboard".to_string(),
        Err(err) => report(
            app,
            UiErrorContext::General,
            format!("clipboard unavailable: {err}"),
        ),
    }
}

fn report(app: &mut PosterGuiApp, context: UiErrorContext, message: String) {
    let err = UiError::from_message(context, message);
    tracing::warn!(context = ?err.context(), "{}", err.message());
    app.status = err.banner_text();
    app.banner = Some(err);
}
