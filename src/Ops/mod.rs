// Composable call operations.
//
// Each op contributes at most one engine op to a batch (add_op) and turns
// the engine's answer into typed results (finish_op). Ops know nothing about
// each other; CallOpSet runs them in slot order.

mod client_recv_status;
mod client_send_close;
mod recv_initial_metadata;
mod recv_message;
mod send_initial_metadata;
mod send_message;
mod server_send_status;

pub use client_recv_status::CallOpClientRecvStatus;
pub use client_send_close::CallOpClientSendClose;
pub use recv_initial_metadata::CallOpRecvInitialMetadata;
pub use recv_message::{CallOpGenericRecvMessage, CallOpRecvMessage};
pub use send_initial_metadata::CallOpSendInitialMetadata;
pub use send_message::CallOpSendMessage;
pub use server_send_status::CallOpServerSendStatus;

use crate::Batch::layout::OpArray;

/// Populate/finalize contract every composable op implements.
pub trait CallOp {
    /// Append zero or one op to `ops`.
    fn add_op(&mut self, ops: &mut OpArray);

    /// Consume this op's result from the completed array.
    ///
    /// `status` is the batch outcome so far. Implementations may turn it from
    /// `true` to `false` but never the other way.
    fn finish_op(&mut self, ops: &mut OpArray, status: &mut bool, max_message_size: Option<usize>);
}

/// Filler for unused composition slots.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallNoOp;

impl CallOp for CallNoOp {
    #[inline]
    fn add_op(&mut self, _ops: &mut OpArray) {}

    #[inline]
    fn finish_op(&mut self, _ops: &mut OpArray, _status: &mut bool, _max_message_size: Option<usize>) {}
}
