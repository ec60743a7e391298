use std::fmt;

use super::call::Call;
use super::completion_queue::CompletionQueue;
use crate::Batch::{CallOpSet, Completion, OpArray, SilentCallOpSet};
use crate::Debug::StructDebug;
use crate::Structs::ByteBuffer;

// Debug proxy implementations that call the standalone debug functions
impl fmt::Debug for CompletionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_completion_queue(self, f)
    }
}

impl fmt::Debug for Call<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_call(self, f)
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> fmt::Debug for CallOpSet<Op1, Op2, Op3, Op4, Op5, Op6> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_call_op_set(self, f)
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> fmt::Debug for SilentCallOpSet<Op1, Op2, Op3, Op4, Op5, Op6> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SilentCallOpSet").field(&self.inner).finish()
    }
}

impl fmt::Debug for OpArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_op_array(self, f)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("tag", &self.tag)
            .field("ok", &self.ok)
            .field("ops", &self.ops)
            .finish()
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_byte_buffer(self, f)
    }
}
