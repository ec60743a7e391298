use super::completion_queue::CompletionQueue;
use crate::error::CallError;

pub struct CompletionQueueBuilder {
    capacity: usize,
}

impl Default for CompletionQueueBuilder {
    fn default() -> Self {
        Self {
            capacity: 1024, // 1024 in-flight completions
        }
    }
}

impl CompletionQueueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completions the queue can hold. Must be a power of two.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn build(self) -> Result<CompletionQueue, CallError> {
        CompletionQueue::new(self.capacity)
    }
}
