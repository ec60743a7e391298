// Batches of call ops and the completion-tag contract they implement.

use super::layout::{Completion, OpArray};
use crate::Ops::CallNoOp;
use crate::Structs::Tag;

/// Anything that can be retrieved from a completion queue.
pub trait CompletionQueueTag {
    /// Identity this object is started under on the engine.
    fn tag(&self) -> Tag;

    /// Called exactly once when this object's completion is retrieved.
    ///
    /// May downgrade `completion.ok` and rewrite `completion.tag`. Returns
    /// `true` if the completion should be surfaced to whoever is waiting on
    /// the queue, `false` to swallow it.
    fn finalize_result(&mut self, completion: &mut Completion) -> bool;
}

/// A batch as seen by the code that starts it on the engine.
pub trait CallOpSetInterface: CompletionQueueTag {
    /// Populate the low-level ops for this batch.
    fn fill_ops(&mut self, ops: &mut OpArray);

    fn set_max_message_size(&mut self, max_message_size: Option<usize>);

    fn max_message_size(&self) -> Option<usize>;
}

/// Up to six call ops composed into one batch.
///
/// Slots run in order 1 through 6 on populate and again on finalize, so a
/// later slot always sees the status produced by the earlier ones. Put
/// status receivers last.
///
/// ```rust,ignore
/// let mut ops: CallOpSet<CallOpSendMessage, CallOpClientRecvStatus> = CallOpSet::new();
/// ops.op1_mut().send_message(&request)?;
/// ops.op2_mut().client_recv_status(&mut context, &mut status);
/// call.perform_ops(&mut ops)?;
/// cq.pluck(&mut ops);
/// ```
pub struct CallOpSet<
    Op1 = CallNoOp,
    Op2 = CallNoOp,
    Op3 = CallNoOp,
    Op4 = CallNoOp,
    Op5 = CallNoOp,
    Op6 = CallNoOp,
> {
    pub(crate) tag: Tag,
    pub(crate) return_tag: Tag,
    pub(crate) max_message_size: Option<usize>,
    pub(crate) op1: Op1,
    pub(crate) op2: Op2,
    pub(crate) op3: Op3,
    pub(crate) op4: Op4,
    pub(crate) op5: Op5,
    pub(crate) op6: Op6,
}

/// A batch whose completion is never surfaced to queue waiters.
///
/// It still finalizes fully (buffers released, results written); only the
/// final return value of `finalize_result` differs. Used for internal
/// fire-and-forget batches.
pub struct SilentCallOpSet<
    Op1 = CallNoOp,
    Op2 = CallNoOp,
    Op3 = CallNoOp,
    Op4 = CallNoOp,
    Op5 = CallNoOp,
    Op6 = CallNoOp,
> {
    pub(crate) inner: CallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>,
}
