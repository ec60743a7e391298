//! Statically composed call-operation batches for RPC calls.
//!
//! A batch ([`CallOpSet`]) combines up to six independent call ops (send
//! metadata, send/receive a message, half-close, send/receive status) into
//! one unit that a [`CallHook`] starts on the call engine in a single step.
//! When the engine posts the batch's completion, [`CompletionQueue::pluck`]
//! finalizes every op in slot order and the typed results become readable.
//!
//! ```rust,ignore
//! let engine = LoopbackEngine::new();
//! let cq = CompletionQueueBuilder::new().build()?;
//! let raw = RawCall::new(1);
//! let call = Call::new(&raw, &engine, &cq);
//!
//! let mut context = ClientContext::new();
//! let mut status = Status::ok();
//! let mut ops: CallOpSet<CallOpSendMessage, CallOpClientSendClose, CallOpClientRecvStatus> =
//!     CallOpSet::new();
//! ops.op1_mut().send_message(&"hello".to_string())?;
//! ops.op2_mut().client_send_close();
//! ops.op3_mut().client_recv_status(&mut context, &mut status);
//! call.perform_ops(&mut ops)?;
//! let result = cq.pluck(&mut ops);
//! ```

// Module naming follows project convention
#![allow(non_snake_case)]

pub mod Batch;
pub mod Core;
pub mod Ops;
pub mod Structs;
pub mod error;

mod Debug {
    pub mod StructDebug;
}

pub use Batch::{CallOpSet, CallOpSetInterface, Completion, CompletionQueueTag, Op, OpArray, OpKind, SilentCallOpSet};
pub use Core::{Call, CallHook, CompletionQueue, CompletionQueueBuilder, LoopbackEngine, PluckResult, SerializationTraits};
pub use Ops::{
    CallNoOp, CallOp, CallOpClientRecvStatus, CallOpClientSendClose, CallOpGenericRecvMessage,
    CallOpRecvInitialMetadata, CallOpRecvMessage, CallOpSendInitialMetadata, CallOpSendMessage,
    CallOpServerSendStatus,
};
pub use Structs::{ByteBuffer, ClientContext, MetadataArray, MetadataMap, RawCall, Status, StatusCode, Tag};
pub use error::CallError;
