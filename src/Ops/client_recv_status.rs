use log::trace;

use crate::Batch::layout::{Op, OpArray};
use crate::Core::metadata::fill_metadata_map;
use crate::Structs::{ClientContext, MetadataMap, Status};

use super::CallOp;

/// Receives trailing metadata and the final status on the client.
///
/// Once attached, finalize always writes a status, whatever the batch outcome.
#[derive(Debug, Default)]
pub struct CallOpClientRecvStatus<'a> {
    recv_trailing_metadata: Option<&'a mut MetadataMap>,
    recv_status: Option<&'a mut Status>,
    index: Option<usize>,
}

impl<'a> CallOpClientRecvStatus<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_recv_status(&mut self, context: &'a mut ClientContext, status: &'a mut Status) {
        self.recv_trailing_metadata = Some(&mut context.trailing_metadata);
        self.recv_status = Some(status);
    }
}

impl<'a> CallOp for CallOpClientRecvStatus<'a> {
    fn add_op(&mut self, ops: &mut OpArray) {
        if self.recv_status.is_none() {
            return;
        }
        self.index = Some(ops.push(Op::recv_status_on_client()));
    }

    fn finish_op(&mut self, ops: &mut OpArray, _status: &mut bool, _max_message_size: Option<usize>) {
        let Some(recv_status) = self.recv_status.as_deref_mut() else {
            return;
        };
        let op = self.index.take().and_then(|i| ops.take(i));
        let Some(Op::RecvStatusOnClient {
            trailing_metadata,
            status,
            status_details,
            status_details_capacity,
        }) = op
        else {
            // nothing came back; report the engine's default rather than stale data
            *recv_status = Status::from_raw(Default::default(), None);
            return;
        };

        if let Some(dest) = self.recv_trailing_metadata.as_deref_mut() {
            *dest = fill_metadata_map(trailing_metadata);
        }
        trace!(
            "client_recv_status: {} (details capacity {})",
            status,
            status_details_capacity
        );
        *recv_status = Status::from_raw(status, status_details.as_deref());
    }
}
