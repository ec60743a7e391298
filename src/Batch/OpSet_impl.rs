use std::ops::{Deref, DerefMut};

use log::{debug, trace};

use super::layout::{Completion, OpArray};
use super::OpSet::{CallOpSet, CallOpSetInterface, CompletionQueueTag, SilentCallOpSet};
use crate::Ops::CallOp;
use crate::Structs::Tag;

impl<Op1, Op2, Op3, Op4, Op5, Op6> CallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>
where
    Op1: CallOp + Default,
    Op2: CallOp + Default,
    Op3: CallOp + Default,
    Op4: CallOp + Default,
    Op5: CallOp + Default,
    Op6: CallOp + Default,
{
    /// Create an empty batch with a fresh tag that is also its return tag.
    pub fn new() -> Self {
        let tag = Tag::next();
        Self {
            tag,
            return_tag: tag,
            max_message_size: None,
            op1: Op1::default(),
            op2: Op2::default(),
            op3: Op3::default(),
            op4: Op4::default(),
            op5: Op5::default(),
            op6: Op6::default(),
        }
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> Default for CallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>
where
    Op1: CallOp + Default,
    Op2: CallOp + Default,
    Op3: CallOp + Default,
    Op4: CallOp + Default,
    Op5: CallOp + Default,
    Op6: CallOp + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> CallOpSet<Op1, Op2, Op3, Op4, Op5, Op6> {
    /// Report completions of this batch under `return_tag` instead of its own tag.
    pub fn set_output_tag(&mut self, return_tag: Tag) {
        self.return_tag = return_tag;
    }

    /// Tag reported after finalize.
    pub fn output_tag(&self) -> Tag {
        self.return_tag
    }

    pub fn op1(&self) -> &Op1 {
        &self.op1
    }

    pub fn op1_mut(&mut self) -> &mut Op1 {
        &mut self.op1
    }

    pub fn op2(&self) -> &Op2 {
        &self.op2
    }

    pub fn op2_mut(&mut self) -> &mut Op2 {
        &mut self.op2
    }

    pub fn op3(&self) -> &Op3 {
        &self.op3
    }

    pub fn op3_mut(&mut self) -> &mut Op3 {
        &mut self.op3
    }

    pub fn op4(&self) -> &Op4 {
        &self.op4
    }

    pub fn op4_mut(&mut self) -> &mut Op4 {
        &mut self.op4
    }

    pub fn op5(&self) -> &Op5 {
        &self.op5
    }

    pub fn op5_mut(&mut self) -> &mut Op5 {
        &mut self.op5
    }

    pub fn op6(&self) -> &Op6 {
        &self.op6
    }

    pub fn op6_mut(&mut self) -> &mut Op6 {
        &mut self.op6
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> CompletionQueueTag for CallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>
where
    Op1: CallOp,
    Op2: CallOp,
    Op3: CallOp,
    Op4: CallOp,
    Op5: CallOp,
    Op6: CallOp,
{
    fn tag(&self) -> Tag {
        self.tag
    }

    fn finalize_result(&mut self, completion: &mut Completion) -> bool {
        let max_message_size = self.max_message_size;
        let ops = &mut completion.ops;
        let status = &mut completion.ok;
        let engine_ok = *status;

        self.op1.finish_op(ops, status, max_message_size);
        self.op2.finish_op(ops, status, max_message_size);
        self.op3.finish_op(ops, status, max_message_size);
        self.op4.finish_op(ops, status, max_message_size);
        self.op5.finish_op(ops, status, max_message_size);
        self.op6.finish_op(ops, status, max_message_size);

        debug!(
            "finalized batch {:?} -> {:?} (engine ok: {}, final ok: {})",
            self.tag, self.return_tag, engine_ok, *status
        );
        completion.tag = self.return_tag;
        true
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> CallOpSetInterface for CallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>
where
    Op1: CallOp,
    Op2: CallOp,
    Op3: CallOp,
    Op4: CallOp,
    Op5: CallOp,
    Op6: CallOp,
{
    fn fill_ops(&mut self, ops: &mut OpArray) {
        self.op1.add_op(ops);
        self.op2.add_op(ops);
        self.op3.add_op(ops);
        self.op4.add_op(ops);
        self.op5.add_op(ops);
        self.op6.add_op(ops);
        trace!("batch {:?} populated {} ops", self.tag, ops.len());
    }

    fn set_max_message_size(&mut self, max_message_size: Option<usize>) {
        self.max_message_size = max_message_size;
    }

    fn max_message_size(&self) -> Option<usize> {
        self.max_message_size
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> SilentCallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>
where
    Op1: CallOp + Default,
    Op2: CallOp + Default,
    Op3: CallOp + Default,
    Op4: CallOp + Default,
    Op5: CallOp + Default,
    Op6: CallOp + Default,
{
    pub fn new() -> Self {
        Self {
            inner: CallOpSet::new(),
        }
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> Default for SilentCallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>
where
    Op1: CallOp + Default,
    Op2: CallOp + Default,
    Op3: CallOp + Default,
    Op4: CallOp + Default,
    Op5: CallOp + Default,
    Op6: CallOp + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> Deref for SilentCallOpSet<Op1, Op2, Op3, Op4, Op5, Op6> {
    type Target = CallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> DerefMut for SilentCallOpSet<Op1, Op2, Op3, Op4, Op5, Op6> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> CompletionQueueTag for SilentCallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>
where
    Op1: CallOp,
    Op2: CallOp,
    Op3: CallOp,
    Op4: CallOp,
    Op5: CallOp,
    Op6: CallOp,
{
    fn tag(&self) -> Tag {
        self.inner.tag
    }

    fn finalize_result(&mut self, completion: &mut Completion) -> bool {
        self.inner.finalize_result(completion);
        false
    }
}

impl<Op1, Op2, Op3, Op4, Op5, Op6> CallOpSetInterface for SilentCallOpSet<Op1, Op2, Op3, Op4, Op5, Op6>
where
    Op1: CallOp,
    Op2: CallOp,
    Op3: CallOp,
    Op4: CallOp,
    Op5: CallOp,
    Op6: CallOp,
{
    fn fill_ops(&mut self, ops: &mut OpArray) {
        self.inner.fill_ops(ops);
    }

    fn set_max_message_size(&mut self, max_message_size: Option<usize>) {
        self.inner.set_max_message_size(max_message_size);
    }

    fn max_message_size(&self) -> Option<usize> {
        self.inner.max_message_size
    }
}
