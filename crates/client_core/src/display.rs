use std::{fs, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::domain::GeneratedImage;
use thiserror::Error;
use tracing::info;

use crate::store::ImageHandoffStore;

pub const DOWNLOAD_FILE_NAME: &str = "webinar-poster.png";
pub const EMPTY_POSTER_MESSAGE: &str = "No poster generated yet. Fill in the form to create one.";

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("no poster has been generated yet")]
    NoPoster,
    #[error("poster payload is not valid base64: {0}")]
    InvalidPayload(String),
    #[error("failed to write poster to '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Read-only view over whatever the handoff store held when it was built.
#[derive(Debug, Clone)]
pub struct PosterDisplay {
    image: Option<GeneratedImage>,
    store_version: u64,
}

impl PosterDisplay {
    pub fn from_store(store: &ImageHandoffStore) -> Self {
        Self {
            store_version: store.version(),
            image: store.read(),
        }
    }

    /// Re-reads the store only when it changed since this view was built.
    pub fn refresh(&mut self, store: &ImageHandoffStore) -> bool {
        if store.version() == self.store_version {
            return false;
        }
        *self = Self::from_store(store);
        true
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        self.image.as_ref()
    }

    pub fn has_poster(&self) -> bool {
        self.image.is_some()
    }

    /// `None` means the image element and download action are omitted.
    pub fn image_source(&self) -> Option<String> {
        self.image.as_ref().map(GeneratedImage::data_url)
    }

    pub fn placeholder_message(&self) -> Option<&'static str> {
        if self.has_poster() {
            None
        } else {
            Some(EMPTY_POSTER_MESSAGE)
        }
    }

    pub fn download(&self) -> Result<PosterDownload, DisplayError> {
        let image = self.image.as_ref().ok_or(DisplayError::NoPoster)?;
        Ok(PosterDownload {
            file_name: DOWNLOAD_FILE_NAME.to_string(),
            bytes: decode_poster(image)?,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<PosterDownload, DisplayError> {
        let download = self.download()?;
        fs::write(path, &download.bytes).map_err(|source| DisplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(
            path = %path.display(),
            size_bytes = download.bytes.len(),
            "saved generated poster"
        );
        Ok(download)
    }
}

/// Decodes a poster payload, tolerating surrounding and embedded line whitespace.
pub fn decode_poster(image: &GeneratedImage) -> Result<Vec<u8>, DisplayError> {
    let compact: String = image
        .as_base64()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| DisplayError::InvalidPayload(err.to_string()))
}
