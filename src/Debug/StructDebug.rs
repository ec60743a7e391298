use std::fmt;
use std::sync::atomic::Ordering;

use crate::Batch::{CallOpSet, OpArray};
use crate::Core::call::Call;
use crate::Core::completion_queue::CompletionQueue;
use crate::Structs::ByteBuffer;

/// Debug function for CompletionQueue
///
/// Shows capacity, shutdown state and how many completions are stashed by
/// pluckers. Slot contents are never read.
pub fn debug_completion_queue(cq: &CompletionQueue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CompletionQueue")
        .field("capacity", &cq.capacity())
        .field("shutdown", &cq.shutdown.load(Ordering::Relaxed))
        .field("signal", &cq.signal.load(Ordering::Relaxed))
        .field("stashed", &cq.stashed.lock().len())
        .finish()
}

/// Debug function for Call
pub fn debug_call(call: &Call<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Call")
        .field("call", &call.call().id())
        .field("cq", &format_args!("{:p}", call.cq()))
        .field("max_message_size", &call.max_message_size())
        .finish_non_exhaustive()
}

/// Debug function for CallOpSet
///
/// Only the batch identity; the composed ops may borrow caller state.
pub fn debug_call_op_set<Op1, Op2, Op3, Op4, Op5, Op6>(
    ops: &CallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.debug_struct("CallOpSet")
        .field("tag", &ops.tag)
        .field("return_tag", &ops.return_tag)
        .field("max_message_size", &ops.max_message_size)
        .finish_non_exhaustive()
}

/// Debug function for OpArray
pub fn debug_op_array(ops: &OpArray, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(ops.iter().map(|op| op.kind())).finish()
}

/// Debug function for ByteBuffer
///
/// Length only, message bytes stay out of logs.
pub fn debug_byte_buffer(buffer: &ByteBuffer, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ByteBuffer").field("len", &buffer.len()).finish()
}
