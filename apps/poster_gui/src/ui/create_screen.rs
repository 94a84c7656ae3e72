//! Form screen: six text fields, the speaker photo picker and the submit button.

use client_core::SpeakerPhoto;
use shared::domain::{FieldName, FORM_NOTE, FORM_TITLE};

use crate::controller::events::{UiError, UiErrorContext};
use crate::ui::app::PosterGuiApp;
use crate::ui::images::human_readable_bytes;

const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

enum PhotoAction {
    None,
    Pick,
    Clear,
}

/// What the create screen body shows for the current submission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateView {
    /// A request is in flight; the form is replaced by a busy indicator.
    Busy,
    Form,
}

pub fn create_view(app: &PosterGuiApp) -> CreateView {
    if app.is_submitting() {
        CreateView::Busy
    } else {
        CreateView::Form
    }
}

pub fn show(app: &mut PosterGuiApp, ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.heading(FORM_TITLE);
        ui.small(FORM_NOTE);
    });
    ui.add_space(8.0);

    let can_retry = app.session.form().can_submit();
    if show_banner(app, ui, can_retry) {
        app.submit();
    }

    if create_view(app) == CreateView::Busy {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.add(egui::Spinner::new().size(32.0));
            ui.label("Generating poster...");
        });
        return;
    }

    let mut photo_action = PhotoAction::None;

    egui::Grid::new("poster_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            for field in FieldName::ALL {
                ui.label(field.label());
                let mut value = app.session.form().field(field).to_string();
                let mut edit = (if field.is_multiline() {
                    egui::TextEdit::multiline(&mut value).desired_rows(4)
                } else {
                    egui::TextEdit::singleline(&mut value)
                })
                .desired_width(420.0);
                if let Some(placeholder) = field.placeholder() {
                    edit = edit.hint_text(placeholder);
                }
                if ui.add(edit).changed() {
                    app.session.form_mut().update_field(field, value);
                }
                ui.end_row();
            }

            ui.label("Speaker Photo");
            ui.horizontal(|ui| {
                if ui.button("Choose photo...").clicked() {
                    photo_action = PhotoAction::Pick;
                }
                if let Some(photo) = app.session.form().photo() {
                    ui.label(format!(
                        "{} ({})",
                        photo.file_name(),
                        human_readable_bytes(photo.len() as u64)
                    ));
                    if ui.button("Clear Photo").clicked() {
                        photo_action = PhotoAction::Clear;
                    }
                } else {
                    ui.weak("No photo selected");
                }
            });
            ui.end_row();
        });

    if let Some(preview) = &app.photo_preview {
        ui.add_space(6.0);
        match (&preview.texture, &preview.error) {
            (Some(texture), _) => {
                ui.add(egui::Image::new(texture).max_width(240.0));
            }
            (None, Some(err)) => {
                ui.weak(format!("Preview unavailable: {err}"));
            }
            (None, None) => {}
        }
    }

    ui.add_space(12.0);
    let missing = app.session.form().missing_fields();
    let has_photo = app.session.form().photo().is_some();
    let button = egui::Button::new("Generate Poster");
    if ui.add_enabled(app.session.form().can_submit(), button).clicked() {
        app.submit();
    }
    if !missing.is_empty() || !has_photo {
        let mut pending: Vec<&str> = missing.iter().map(|field| field.label()).collect();
        if !has_photo {
            pending.push("Speaker Photo");
        }
        ui.weak(format!("Still needed: {}", pending.join(", ")));
    }

    match photo_action {
        PhotoAction::None => {}
        PhotoAction::Clear => app.clear_photo(),
        PhotoAction::Pick => pick_photo(app),
    }
}

fn pick_photo(app: &mut PosterGuiApp) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Images", PHOTO_EXTENSIONS)
        .pick_file()
    else {
        return;
    };
    match SpeakerPhoto::from_path(&path) {
        Ok(photo) => app.attach_photo(photo),
        Err(err) => {
            let err = UiError::from_message(
                UiErrorContext::Photo,
                format!("could not read '{}': {err}", path.display()),
            );
            app.status = err.banner_text();
            app.banner = Some(err);
        }
    }
}

/// Returns `true` when the user asked to send the form again.
pub fn show_banner(app: &mut PosterGuiApp, ui: &mut egui::Ui, can_retry: bool) -> bool {
    let Some(banner) = &app.banner else {
        return false;
    };
    let text = banner.banner_text();
    let offer_retry = can_retry && banner.is_retryable();
    let mut dismissed = false;
    let mut retry = false;
    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(120, 36, 36))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Dismiss").clicked() {
                        dismissed = true;
                    }
                    if offer_retry && ui.button("Try Again").clicked() {
                        retry = true;
                    }
                });
            });
        });
    if dismissed {
        app.banner = None;
    }
    ui.add_space(8.0);
    retry
}
