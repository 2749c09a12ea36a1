//! Display references handed to the presentation layer.
//!
//! Every accepted file gets an [ImageRef] bound to its bytes, the same role an object
//! URL plays in a browser. References are allocated and released through a
//! [ReferenceStore] so that anything left live after an item leaves the collection is
//! visible rather than silently leaked.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Stable identifier of an allocated reference
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefId(u64);

/// A handle to one file's bytes, valid until released
#[derive(Clone)]
pub struct ImageRef {
    id: RefId,
    bytes: Arc<[u8]>,
}

impl ImageRef {
    pub fn id(&self) -> RefId {
        self.id
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// A URL-like string a presentation layer can use as a key or source
    pub fn url(&self) -> String {
        format!("blob:images-to-pdf/{}", self.id.0)
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRef")
            .field("id", &self.id)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct ReferenceStore {
    live: HashSet<RefId>,
    next_id: u64,
}

impl ReferenceStore {
    pub fn new() -> ReferenceStore {
        ReferenceStore::default()
    }

    pub fn allocate(&mut self, bytes: Arc<[u8]>) -> ImageRef {
        let id = RefId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        ImageRef { id, bytes }
    }

    /// Releases a reference. Returns `false` if it was already released.
    pub fn release(&mut self, reference: &ImageRef) -> bool {
        self.live.remove(&reference.id)
    }

    pub fn is_live(&self, reference: &ImageRef) -> bool {
        self.live.contains(&reference.id)
    }

    /// Number of references allocated and not yet released
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_release() {
        let mut store = ReferenceStore::new();
        let a = store.allocate(Arc::from(&b"a"[..]));
        let b = store.allocate(Arc::from(&b"b"[..]));
        assert_ne!(a.id(), b.id());
        assert_ne!(a.url(), b.url());
        assert_eq!(store.live_count(), 2);

        assert!(store.release(&a));
        assert!(!store.is_live(&a));
        assert!(store.is_live(&b));
        assert!(!store.release(&a));
        assert_eq!(store.live_count(), 1);
    }
}
