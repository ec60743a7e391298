pub mod layout;
pub mod OpSet;
mod OpSet_impl;

pub use layout::{Completion, Op, OpArray, OpKind, MAX_OPS}; // re-export for stable path
pub use OpSet::{CallOpSet, CallOpSetInterface, CompletionQueueTag, SilentCallOpSet};
