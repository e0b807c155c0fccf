//! In-memory LRU cache for video thumbnails.
//!
//! Thumbnails are small and disposable, so they live in process memory
//! instead of object storage. Eviction means the client re-uploads; a
//! restart empties the cache the same way.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;
use lru::LruCache;
use uuid::Uuid;

/// A cached thumbnail image with the media type it was uploaded as.
#[derive(Debug, Clone)]
pub struct CachedThumbnail {
    pub media_type: String,
    pub bytes: Bytes,
}

/// LRU thumbnail cache keyed by video id. Reads count as use, so serving
/// a thumbnail keeps it resident.
pub struct ThumbnailStore {
    cache: Mutex<LruCache<Uuid, CachedThumbnail>>,
}

impl ThumbnailStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    // A poisoned lock only means another thread panicked mid-insert; the
    // cache stays usable.
    fn lock(&self) -> MutexGuard<'_, LruCache<Uuid, CachedThumbnail>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, id: Uuid, thumbnail: CachedThumbnail) {
        self.lock().put(id, thumbnail);
    }

    pub fn get(&self, id: &Uuid) -> Option<CachedThumbnail> {
        self.lock().get(id).cloned()
    }

    pub fn remove(&self, id: &Uuid) {
        self.lock().pop(id);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
