use std::sync::{Arc, PoisonError, RwLock};

use shared::domain::GeneratedImage;
use tracing::info;

#[derive(Debug, Default)]
struct Slot {
    image: Option<GeneratedImage>,
    version: u64,
}

/// Single-slot handoff of the latest generated poster between screens.
///
/// Clones share the same slot. Writes replace the value; there is no merge.
#[derive(Debug, Clone, Default)]
pub struct ImageHandoffStore {
    slot: Arc<RwLock<Slot>>,
}

impl ImageHandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, image: GeneratedImage) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.image = Some(image);
        slot.version += 1;
        info!(version = slot.version, "stored generated poster");
    }

    pub fn read(&self) -> Option<GeneratedImage> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .image
            .clone()
    }

    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.image.take().is_some() {
            slot.version += 1;
            info!(version = slot.version, "cleared generated poster");
        }
    }

    /// Bumped on every change; lets a screen re-read only when something moved.
    pub fn version(&self) -> u64 {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = ImageHandoffStore::new();
        assert!(store.read().is_none());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn repeated_reads_are_stable() {
        let store = ImageHandoffStore::new();
        store.write(GeneratedImage::new("QQ=="));
        assert_eq!(store.read(), store.read());
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn last_write_wins_across_clones() {
        let store = ImageHandoffStore::new();
        let display_side = store.clone();
        store.write(GeneratedImage::new("first"));
        store.write(GeneratedImage::new("second"));
        assert_eq!(display_side.read(), Some(GeneratedImage::new("second")));
        assert_eq!(display_side.version(), 2);
    }

    #[test]
    fn clearing_an_empty_store_keeps_version() {
        let store = ImageHandoffStore::new();
        store.clear();
        assert_eq!(store.version(), 0);

        store.write(GeneratedImage::new("QQ=="));
        store.clear();
        assert!(store.read().is_none());
        assert_eq!(store.version(), 2);
    }
}
