use log::{trace, warn};

use crate::error::CallError;
use crate::Batch::layout::{Op, OpArray};
use crate::Core::serialization::SerializationTraits;
use crate::Structs::ByteBuffer;

use super::CallOp;

type Deserializer<'a> = Box<dyn FnMut(ByteBuffer, Option<usize>) -> Result<(), CallError> + 'a>;

/// Receives one message into a destination of a type known at compile time.
pub struct CallOpRecvMessage<'a, R> {
    message: Option<&'a mut R>,
    got_message: bool,
    index: Option<usize>,
}

impl<'a, R> Default for CallOpRecvMessage<'a, R> {
    fn default() -> Self {
        Self {
            message: None,
            got_message: false,
            index: None,
        }
    }
}

impl<'a, R: SerializationTraits> CallOpRecvMessage<'a, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recv_message(&mut self, message: &'a mut R) {
        self.message = Some(message);
    }

    /// True once finalize parsed a message into the destination.
    pub fn got_message(&self) -> bool {
        self.got_message
    }
}

impl<'a, R: SerializationTraits> CallOp for CallOpRecvMessage<'a, R> {
    fn add_op(&mut self, ops: &mut OpArray) {
        if self.message.is_none() {
            return;
        }
        self.index = Some(ops.push(Op::RecvMessage(None)));
    }

    fn finish_op(&mut self, ops: &mut OpArray, status: &mut bool, max_message_size: Option<usize>) {
        let Some(message) = self.message.as_deref_mut() else {
            return;
        };
        let received = take_received(ops, self.index.take());
        self.got_message = finish_recv(received, status, |buffer| {
            R::deserialize(buffer, message, max_message_size)
        });
    }
}

/// Receives one message into a destination chosen at run time.
///
/// The destination's deserializer is captured when the op is attached, so
/// forwarding code can hold this op without naming the message type.
#[derive(Default)]
pub struct CallOpGenericRecvMessage<'a> {
    deserialize: Option<Deserializer<'a>>,
    got_message: bool,
    index: Option<usize>,
}

impl<'a> CallOpGenericRecvMessage<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recv_message<R: SerializationTraits + 'a>(&mut self, message: &'a mut R) {
        self.deserialize = Some(Box::new(
            move |buffer: ByteBuffer, max_message_size: Option<usize>| {
                R::deserialize(buffer, &mut *message, max_message_size)
            },
        ));
    }

    pub fn got_message(&self) -> bool {
        self.got_message
    }
}

impl<'a> CallOp for CallOpGenericRecvMessage<'a> {
    fn add_op(&mut self, ops: &mut OpArray) {
        if self.deserialize.is_none() {
            return;
        }
        self.index = Some(ops.push(Op::RecvMessage(None)));
    }

    fn finish_op(&mut self, ops: &mut OpArray, status: &mut bool, max_message_size: Option<usize>) {
        let Some(deserialize) = self.deserialize.as_mut() else {
            return;
        };
        let received = take_received(ops, self.index.take());
        self.got_message = finish_recv(received, status, |buffer| {
            deserialize(buffer, max_message_size)
        });
    }
}

fn take_received(ops: &mut OpArray, index: Option<usize>) -> Option<ByteBuffer> {
    match index.and_then(|i| ops.take(i)) {
        Some(Op::RecvMessage(buffer)) => buffer,
        _ => None,
    }
}

/// Shared receive finalization. Returns the new `got_message` flag.
fn finish_recv(
    received: Option<ByteBuffer>,
    status: &mut bool,
    deserialize: impl FnOnce(ByteBuffer) -> Result<(), CallError>,
) -> bool {
    match received {
        Some(buffer) if *status => match deserialize(buffer) {
            Ok(()) => true,
            Err(e) => {
                warn!("recv_message: {}", e);
                *status = false;
                false
            }
        },
        Some(buffer) => {
            trace!("recv_message: batch failed, dropping {} bytes", buffer.len());
            buffer.destroy();
            false
        }
        None => {
            // success without a buffer must not look like a fresh message
            if *status {
                warn!("recv_message: no message delivered, failing batch");
            }
            *status = false;
            false
        }
    }
}
