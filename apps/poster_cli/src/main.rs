use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    load_settings_from, HttpPosterBackend, PosterSession, SessionError, SpeakerPhoto,
};
use shared::domain::FieldName;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate a webinar poster from the command line.
#[derive(Parser, Debug)]
#[command(name = "poster_cli", version)]
struct Args {
    /// Settings file (defaults to ./poster.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured poster service base URL.
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[arg(long)]
    bg_prompt: String,
    #[arg(long)]
    webinar_title: String,
    #[arg(long)]
    webinar_description: String,
    #[arg(long)]
    webinar_date_time: String,
    #[arg(long)]
    speaker_name: String,
    #[arg(long)]
    speaker_designation: String,
    #[arg(long)]
    speaker_photo: PathBuf,

    /// Where the generated poster is written.
    #[arg(long, short, default_value = "webinar-poster.png")]
    output: PathBuf,
}

impl Args {
    fn field_values(&self) -> [(FieldName, &str); 6] {
        [
            (FieldName::BgPrompt, self.bg_prompt.as_str()),
            (FieldName::WebinarTitle, self.webinar_title.as_str()),
            (FieldName::WebinarDescription, self.webinar_description.as_str()),
            (FieldName::WebinarDateTime, self.webinar_date_time.as_str()),
            (FieldName::SpeakerName, self.speaker_name.as_str()),
            (FieldName::SpeakerDesignation, self.speaker_designation.as_str()),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(args.config.as_deref())?;
    if let Some(url) = &args.backend_url {
        settings.backend_base_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = secs;
    }

    let backend = HttpPosterBackend::new(&settings)?;
    info!(endpoint = %backend.endpoint(), "using poster service");

    let photo = SpeakerPhoto::from_path(&args.speaker_photo).with_context(|| {
        format!(
            "failed to read speaker photo '{}'",
            args.speaker_photo.display()
        )
    })?;

    let mut session = PosterSession::new(&settings);
    let form = session.form_mut();
    for (field, value) in args.field_values() {
        form.update_field(field, value);
    }
    form.select_photo(photo);

    match session.submit(&backend).await {
        Ok(route) => info!(route = %route, "poster ready"),
        Err(SessionError::Submit(reason)) => bail!(reason.user_message()),
        Err(err) => return Err(err.into()),
    }

    let download = session.display().save_to(&args.output)?;
    println!(
        "Saved poster ({} bytes) to {}",
        download.bytes.len(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "poster_cli",
            "--bg-prompt",
            "mountains",
            "--webinar-title",
            "ME/WEBINAR",
            "--webinar-description",
            "line one/line two",
            "--webinar-date-time",
            "WEDNESDAY/21 FEB 2024/8:00 PM",
            "--speaker-name",
            "Kai",
            "--speaker-designation",
            "CTO",
            "--speaker-photo",
            "kai.jpg",
        ]
    }

    #[test]
    fn parses_all_form_fields_in_order() {
        let args = Args::try_parse_from(base_args()).expect("args");
        let values = args.field_values();
        assert_eq!(values[0], (FieldName::BgPrompt, "mountains"));
        assert_eq!(values[5], (FieldName::SpeakerDesignation, "CTO"));
        assert_eq!(args.output, PathBuf::from("webinar-poster.png"));
        assert!(args.backend_url.is_none());
    }

    #[test]
    fn speaker_photo_is_required() {
        let mut argv = base_args();
        argv.truncate(argv.len() - 2);
        assert!(Args::try_parse_from(argv).is_err());
    }
}
