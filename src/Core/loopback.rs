// In-process engine that plays both ends of a call.
//
// What one batch sends becomes what a later batch receives: initial metadata
// is echoed once, messages queue up FIFO, and a server status becomes the
// client's trailing status. Useful for exercising batches without a network.

use std::collections::VecDeque;
use std::ffi::CString;

use bytes::Bytes;
use log::debug;
use parking_lot::Mutex;

use crate::error::CallError;
use crate::Batch::{CallOpSetInterface, Completion, Op, OpArray, OpKind};
use crate::Core::call::{Call, CallHook};
use crate::Structs::{ByteBuffer, MetadataArray, StatusCode};

#[derive(Default)]
struct LoopbackState {
    terminated: bool,
    fail_next: bool,
    half_closed: bool,
    initial_metadata: Option<MetadataArray>,
    messages: VecDeque<ByteBuffer>,
    status: Option<(MetadataArray, StatusCode, Option<Bytes>)>,
    history: Vec<Vec<OpKind>>,
}

#[derive(Default)]
pub struct LoopbackEngine {
    state: Mutex<LoopbackState>,
}

impl LoopbackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete the next batch with `ok = false`.
    ///
    /// Queued messages are still delivered to that batch's receive slot, the
    /// way a real engine may hand over a buffer on a failed batch.
    pub fn fail_next_batch(&self) {
        self.state.lock().fail_next = true;
    }

    /// Queue a message as if the peer had sent it.
    pub fn inject_message(&self, message: ByteBuffer) {
        self.state.lock().messages.push_back(message);
    }

    /// Refuse every later batch, as an engine does for a finished call.
    pub fn terminate(&self) {
        self.state.lock().terminated = true;
    }

    pub fn half_closed(&self) -> bool {
        self.state.lock().half_closed
    }

    /// Messages sent but not yet received.
    pub fn pending_messages(&self) -> usize {
        self.state.lock().messages.len()
    }

    /// Op kinds of every started batch, in start order.
    pub fn history(&self) -> Vec<Vec<OpKind>> {
        self.state.lock().history.clone()
    }

    fn run_sends(state: &mut LoopbackState, ops: &OpArray) {
        for op in ops.iter() {
            match op {
                Op::SendInitialMetadata(metadata) => {
                    state.initial_metadata = Some(metadata.clone());
                }
                Op::SendMessage(buffer) => state.messages.push_back(buffer.clone()),
                Op::SendCloseFromClient => state.half_closed = true,
                Op::SendStatusFromServer {
                    trailing_metadata,
                    status,
                    status_details,
                } => {
                    state.status = Some((trailing_metadata.clone(), *status, status_details.clone()));
                }
                _ => {}
            }
        }
    }

    fn run_receives(state: &mut LoopbackState, ops: &mut OpArray, ok: bool) {
        for op in ops.iter_mut() {
            match op {
                Op::RecvInitialMetadata(slot) if ok => {
                    *slot = state.initial_metadata.take().unwrap_or_default();
                }
                Op::RecvMessage(slot) => *slot = state.messages.pop_front(),
                Op::RecvStatusOnClient {
                    trailing_metadata,
                    status,
                    status_details,
                    status_details_capacity,
                } => {
                    let (metadata, code, details) = match &state.status {
                        Some((metadata, code, details)) => (metadata.clone(), *code, details.clone()),
                        None if ok => (MetadataArray::new(), StatusCode::Ok, None),
                        None => (
                            MetadataArray::new(),
                            StatusCode::Cancelled,
                            Some(Bytes::from_static(b"batch failed")),
                        ),
                    };
                    *trailing_metadata = metadata;
                    *status = code;
                    *status_details = details.and_then(|d| CString::new(d.to_vec()).ok());
                    *status_details_capacity = status_details
                        .as_ref()
                        .map_or(0, |d| d.as_bytes_with_nul().len());
                }
                _ => {}
            }
        }
    }
}

impl CallHook for LoopbackEngine {
    fn perform_ops_on_call(&self, ops: &mut dyn CallOpSetInterface, call: &Call<'_>) -> Result<(), CallError> {
        let mut ops_array = OpArray::new();
        let ok = {
            let mut state = self.state.lock();
            if state.terminated {
                return Err(CallError::StartBatch(format!(
                    "call {} already terminated",
                    call.call().id()
                )));
            }
            ops.fill_ops(&mut ops_array);
            state.history.push(ops_array.kinds());

            let ok = !std::mem::take(&mut state.fail_next);
            Self::run_sends(&mut state, &ops_array);
            Self::run_receives(&mut state, &mut ops_array, ok);
            ok
        };

        debug!(
            "loopback call {}: batch {:?} with {} ops, ok: {}",
            call.call().id(),
            ops.tag(),
            ops_array.len(),
            ok
        );
        call.cq().post(Completion::new(ops.tag(), ok, ops_array))
    }
}
