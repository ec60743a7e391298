// Handles and buffers exchanged with the call engine

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

use super::Metadata_Structs::MetadataMap;

/// Identity under which a batch is retrieved from a completion queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u64);

// 0 is left free so a zeroed tag never aliases a live batch
static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

impl Tag {
    /// Draw a process-unique tag.
    pub fn next() -> Self {
        Tag(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque reference to an engine-side call object.
///
/// The engine creates and destroys these; the batching layer only borrows them.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RawCall {
    id: u64,
}

impl RawCall {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Engine byte buffer holding one serialized message.
///
/// Dropping the buffer releases it.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ByteBuffer {
    data: Bytes,
}

impl ByteBuffer {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(data),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Release the buffer. Equivalent to dropping it.
    pub fn destroy(self) {}
}

/// Client-side state of one call that receive ops write into.
#[derive(Debug, Default)]
pub struct ClientContext {
    pub(crate) send_initial_metadata: MetadataMap,
    pub(crate) recv_initial_metadata: MetadataMap,
    pub(crate) trailing_metadata: MetadataMap,
    pub(crate) initial_metadata_received: bool,
}

impl ClientContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key/value pair for the call's outgoing initial metadata.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<Bytes>) {
        self.send_initial_metadata.insert(key, value);
    }

    pub fn send_initial_metadata(&self) -> &MetadataMap {
        &self.send_initial_metadata
    }

    /// Initial metadata from the server. Only meaningful once a receive batch completed.
    pub fn recv_initial_metadata(&self) -> &MetadataMap {
        &self.recv_initial_metadata
    }

    pub fn trailing_metadata(&self) -> &MetadataMap {
        &self.trailing_metadata
    }

    /// Whether a batch has asked for the server's initial metadata.
    pub fn initial_metadata_received(&self) -> bool {
        self.initial_metadata_received
    }
}
