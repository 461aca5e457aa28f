//! In-memory media buffers addressable by `blob:` handles.
//!
//! A `BufferHandle` owns its registry entry; dropping the handle frees the
//! buffer, so closing or replacing a viewer releases fetched media.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const HANDLE_PREFIX: &str = "blob:movstream/";

/// A fetched resource tagged with the content type it should be played as.
#[derive(Debug)]
pub struct MediaBuffer {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct Entries {
    next_id: u64,
    buffers: HashMap<String, Arc<MediaBuffer>>,
}

/// Shared table of live buffers. Clones refer to the same table.
#[derive(Clone, Default)]
pub struct BufferRegistry {
    entries: Arc<Mutex<Entries>>,
}

impl BufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `bytes` and returns the handle that keeps them alive.
    pub fn register(&self, bytes: Vec<u8>, content_type: impl Into<String>) -> BufferHandle {
        let buffer = Arc::new(MediaBuffer {
            content_type: content_type.into(),
            bytes,
        });
        let mut entries = self.lock();
        entries.next_id += 1;
        let url = format!("{}{}", HANDLE_PREFIX, entries.next_id);
        entries.buffers.insert(url.clone(), Arc::clone(&buffer));
        tracing::debug!(
            "registered {} ({} bytes, {})",
            url,
            buffer.bytes.len(),
            buffer.content_type
        );
        BufferHandle {
            url,
            buffer,
            registry: self.clone(),
        }
    }

    /// Looks up a live buffer by handle URL.
    pub fn resolve(&self, url: &str) -> Option<Arc<MediaBuffer>> {
        self.lock().buffers.get(url).cloned()
    }

    pub fn is_handle(url: &str) -> bool {
        url.starts_with(HANDLE_PREFIX)
    }

    /// Number of live buffers.
    pub fn len(&self) -> usize {
        self.lock().buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, url: &str) {
        if self.lock().buffers.remove(url).is_some() {
            tracing::debug!("released {}", url);
        }
    }
}

/// Addressable handle to a registered buffer. Releases the buffer on drop.
pub struct BufferHandle {
    url: String,
    buffer: Arc<MediaBuffer>,
    registry: BufferRegistry,
}

impl BufferHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn content_type(&self) -> &str {
        &self.buffer.content_type
    }

    pub fn size(&self) -> usize {
        self.buffer.bytes.len()
    }
}

impl std::fmt::Debug for BufferHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferHandle")
            .field("url", &self.url)
            .field("content_type", &self.buffer.content_type)
            .field("size", &self.buffer.bytes.len())
            .finish()
    }
}

impl Drop for BufferHandle {
    fn drop(&mut self) {
        self.registry.release(&self.url);
    }
}
