use bytes::Bytes;
use log::trace;

use crate::Batch::layout::{Op, OpArray};
use crate::Core::metadata::fill_metadata_array;
use crate::Structs::{MetadataArray, MetadataMap, Status, StatusCode};

use super::CallOp;

/// Sends trailing metadata and the final status from the server.
///
/// Unlike the other ops this one populates unconditionally: a batch that
/// composes it always carries a send-status op, even if
/// [`server_send_status`](Self::server_send_status) was never called. In that
/// case the op reports `OK` with no metadata and no details.
///
/// Populating hands the attached status to the engine and resets the op, so a
/// second populate without a new `server_send_status` sends that default.
#[derive(Debug, Default)]
pub struct CallOpServerSendStatus {
    send_status_available: bool,
    send_status_code: StatusCode,
    send_status_details: Bytes,
    trailing_metadata_count: usize,
    trailing_metadata: Option<MetadataArray>,
}

impl CallOpServerSendStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server_send_status(&mut self, trailing_metadata: &MetadataMap, status: &Status) {
        self.trailing_metadata_count = trailing_metadata.len();
        self.trailing_metadata = Some(fill_metadata_array(trailing_metadata));
        self.send_status_available = true;
        self.send_status_code = status.code();
        self.send_status_details = Bytes::copy_from_slice(status.details());
    }

    /// Whether a status is attached and waiting to be populated.
    pub fn is_status_available(&self) -> bool {
        self.send_status_available
    }

    pub fn trailing_metadata_count(&self) -> usize {
        self.trailing_metadata_count
    }
}

impl CallOp for CallOpServerSendStatus {
    fn add_op(&mut self, ops: &mut OpArray) {
        if !std::mem::take(&mut self.send_status_available) {
            trace!("server_send_status: populating without an attached status");
        }
        let details = std::mem::take(&mut self.send_status_details);
        self.trailing_metadata_count = 0;
        ops.push(Op::SendStatusFromServer {
            trailing_metadata: self.trailing_metadata.take().unwrap_or_default(),
            status: std::mem::take(&mut self.send_status_code),
            status_details: if details.is_empty() { None } else { Some(details) },
        });
    }

    fn finish_op(&mut self, _ops: &mut OpArray, _status: &mut bool, _max_message_size: Option<usize>) {}
}
