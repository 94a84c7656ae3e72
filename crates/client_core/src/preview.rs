//! Transient preview references for in-memory files.
//!
//! A [`PreviewRef`] resolves to the bytes it was registered with until it is
//! released. Every reference is released at most once.

use std::{collections::HashMap, fmt, sync::Arc};

use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewRef(Uuid);

impl PreviewRef {
    pub fn as_url(&self) -> String {
        format!("preview:{}", self.0)
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview:{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: HashMap<PreviewRef, Arc<[u8]>>,
    created: u64,
    released: u64,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, bytes: Arc<[u8]>) -> PreviewRef {
        let preview = PreviewRef(Uuid::new_v4());
        self.live.insert(preview.clone(), bytes);
        self.created += 1;
        debug!(preview = %preview, "registered preview reference");
        preview
    }

    pub fn resolve(&self, preview: &PreviewRef) -> Option<Arc<[u8]>> {
        self.live.get(preview).cloned()
    }

    /// Returns `false` when the reference was already released.
    pub fn release(&mut self, preview: &PreviewRef) -> bool {
        if self.live.remove(preview).is_some() {
            self.released += 1;
            debug!(preview = %preview, "released preview reference");
            true
        } else {
            false
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created_count(&self) -> u64 {
        self.created
    }

    pub fn released_count(&self) -> u64 {
        self.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_until_released() {
        let mut registry = PreviewRegistry::new();
        let preview = registry.register(Arc::from(&b"jpeg"[..]));
        assert_eq!(registry.resolve(&preview).as_deref(), Some(&b"jpeg"[..]));
        assert!(preview.as_url().starts_with("preview:"));

        assert!(registry.release(&preview));
        assert!(registry.resolve(&preview).is_none());
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn double_release_is_a_no_op() {
        let mut registry = PreviewRegistry::new();
        let preview = registry.register(Arc::from(&b"png"[..]));
        assert!(registry.release(&preview));
        assert!(!registry.release(&preview));
        assert_eq!(registry.released_count(), 1);
    }
}
