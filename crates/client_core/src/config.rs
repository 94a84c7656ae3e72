use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "poster.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("backend url '{url}' is invalid: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("backend url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub backend_base_url: String,
    pub request_timeout_secs: u64,
    pub clear_image_on_retry: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_base_url: "http://127.0.0.1:8000".into(),
            request_timeout_secs: 180,
            clear_image_on_retry: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    request_timeout_secs: Option<u64>,
    clear_image_on_retry: Option<bool>,
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Parsed base URL with trailing slashes removed from the path.
    pub fn backend_url(&self) -> Result<Url, SettingsError> {
        let raw = self.backend_base_url.trim().trim_end_matches('/');
        let url = Url::parse(raw).map_err(|source| SettingsError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SettingsError::UnsupportedScheme(raw.to_string()));
        }
        Ok(url)
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.backend_url {
            self.backend_base_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.clear_image_on_retry {
            self.clear_image_on_retry = v;
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("NEXT_PUBLIC_BACKEND_URL") {
            self.backend_base_url = v;
        }
        if let Some(v) = non_empty("POSTER_BACKEND_URL") {
            self.backend_base_url = v;
        }
        if let Some(v) = non_empty("APP__BACKEND_URL") {
            self.backend_base_url = v;
        }

        if let Some(v) = non_empty("APP__REQUEST_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(err) => warn!("ignoring APP__REQUEST_TIMEOUT_SECS={v}: {err}"),
            }
        }

        if let Some(v) = non_empty("APP__CLEAR_IMAGE_ON_RETRY") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.clear_image_on_retry = true,
                "0" | "false" | "no" | "off" => self.clear_image_on_retry = false,
                _ => warn!("ignoring APP__CLEAR_IMAGE_ON_RETRY={v}: expected a boolean"),
            }
        }
    }
}

/// Defaults, then `poster.toml` in the working directory (if any), then environment.
pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    load_settings_from(None)
}

/// Like [`load_settings`], but an explicit `path` must exist and parse.
pub fn load_settings_from(path: Option<&Path>) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            settings.apply_file(parse_file_settings(path, &raw)?);
            info!("loaded settings from {}", path.display());
        }
        None => {
            let path = Path::new(DEFAULT_SETTINGS_FILE);
            if let Ok(raw) = fs::read_to_string(path) {
                settings.apply_file(parse_file_settings(path, &raw)?);
                info!("loaded settings from {}", path.display());
            }
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

fn parse_file_settings(path: &Path, raw: &str) -> Result<FileSettings, SettingsError> {
    toml::from_str::<FileSettings>(raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
