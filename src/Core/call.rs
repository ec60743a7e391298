use log::debug;

use crate::error::CallError;
use crate::Batch::CallOpSetInterface;
use crate::Core::completion_queue::CompletionQueue;
use crate::Structs::RawCall;

/// Implemented by whatever owns calls (channels, servers) to start batches.
pub trait CallHook {
    /// Populate `ops`, start them on the engine under `ops.tag()` and arrange
    /// for the completion to be posted to `call.cq()`.
    ///
    /// Returns once the batch has been handed over. An error means the
    /// engine refused the batch and no completion will follow.
    fn perform_ops_on_call(&self, ops: &mut dyn CallOpSetInterface, call: &Call<'_>) -> Result<(), CallError>;
}

/// Wrapping of an engine call together with where its batches go.
///
/// The raw call is owned by the caller and must outlive this handle.
pub struct Call<'a> {
    call: &'a RawCall,
    call_hook: &'a dyn CallHook,
    cq: &'a CompletionQueue,
    max_message_size: Option<usize>,
}

impl<'a> Call<'a> {
    /// A call with no receive size limit.
    pub fn new(call: &'a RawCall, call_hook: &'a dyn CallHook, cq: &'a CompletionQueue) -> Self {
        Self::with_max_message_size(call, call_hook, cq, None)
    }

    pub fn with_max_message_size(
        call: &'a RawCall,
        call_hook: &'a dyn CallHook,
        cq: &'a CompletionQueue,
        max_message_size: Option<usize>,
    ) -> Self {
        Self {
            call,
            call_hook,
            cq,
            max_message_size,
        }
    }

    /// Start `ops` on this call.
    ///
    /// The batch is stamped with this call's max message size first.
    pub fn perform_ops(&self, ops: &mut dyn CallOpSetInterface) -> Result<(), CallError> {
        ops.set_max_message_size(self.max_message_size);
        debug!("call {}: performing batch {:?}", self.call.id(), ops.tag());
        self.call_hook.perform_ops_on_call(ops, self)
    }

    pub fn call(&self) -> &RawCall {
        self.call
    }

    pub fn cq(&self) -> &CompletionQueue {
        self.cq
    }

    pub fn max_message_size(&self) -> Option<usize> {
        self.max_message_size
    }
}
