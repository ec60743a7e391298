use crate::Batch::layout::{Op, OpArray};

use super::CallOp;

/// Half-closes the client's send side.
#[derive(Debug, Default)]
pub struct CallOpClientSendClose {
    send: bool,
}

impl CallOpClientSendClose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_send_close(&mut self) {
        self.send = true;
    }

    pub fn is_active(&self) -> bool {
        self.send
    }
}

impl CallOp for CallOpClientSendClose {
    fn add_op(&mut self, ops: &mut OpArray) {
        if !self.send {
            return;
        }
        ops.push(Op::SendCloseFromClient);
    }

    fn finish_op(&mut self, _ops: &mut OpArray, _status: &mut bool, _max_message_size: Option<usize>) {}
}
