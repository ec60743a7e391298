use thiserror::Error;

/// Errors surfaced by the batching layer and the engines behind it.
///
/// Failures that happen while a batch completes are not errors here: they
/// are folded into the batch's status flag and the per-op results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// A message could not be turned into a byte buffer.
    #[error("serialization failed: {0}")]
    Serialize(String),
    /// A received buffer could not be parsed into the destination message.
    #[error("deserialization failed: {0}")]
    Deserialize(String),
    /// A received message exceeds the negotiated limit.
    #[error("message too large ({size} > {limit})")]
    MessageTooLarge { size: usize, limit: usize },
    /// The engine refused to start the batch (e.g. the call already ended).
    #[error("start batch: {0}")]
    StartBatch(String),
    /// No free slot in the completion queue.
    #[error("completion queue full")]
    QueueFull,
    /// The completion queue has been shut down.
    #[error("completion queue shut down")]
    Shutdown,
    /// Queue capacity must be a non-zero power of two.
    #[error("invalid capacity {0}: must be a power of two and greater than zero")]
    InvalidCapacity(usize),
}
