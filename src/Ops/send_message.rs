use log::trace;

use crate::error::CallError;
use crate::Batch::layout::{Op, OpArray};
use crate::Core::serialization::SerializationTraits;
use crate::Structs::ByteBuffer;

use super::CallOp;

/// Sends one serialized message.
#[derive(Debug, Default)]
pub struct CallOpSendMessage {
    send_buf: Option<ByteBuffer>,
    index: Option<usize>,
}

impl CallOpSendMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `message` for sending.
    ///
    /// On error nothing is queued and the batch must not be started.
    #[must_use = "a failed serialization leaves the batch without a message"]
    pub fn send_message<M: SerializationTraits>(&mut self, message: &M) -> Result<(), CallError> {
        self.send_buf = None;
        let buffer = message.serialize()?;
        trace!("send_message: serialized {} bytes", buffer.len());
        self.send_buf = Some(buffer);
        Ok(())
    }

    /// Whether a serialized message is waiting to be populated.
    pub fn has_message(&self) -> bool {
        self.send_buf.is_some()
    }
}

impl CallOp for CallOpSendMessage {
    fn add_op(&mut self, ops: &mut OpArray) {
        if let Some(buffer) = self.send_buf.take() {
            self.index = Some(ops.push(Op::SendMessage(buffer)));
        }
    }

    fn finish_op(&mut self, ops: &mut OpArray, _status: &mut bool, _max_message_size: Option<usize>) {
        let Some(index) = self.index.take() else {
            return;
        };
        // the engine has copied what it needed
        if let Some(Op::SendMessage(buffer)) = ops.take(index) {
            buffer.destroy();
        }
    }
}
