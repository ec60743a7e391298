use crate::Batch::layout::{Op, OpArray};
use crate::Core::metadata::fill_metadata_map;
use crate::Structs::{ClientContext, MetadataMap};

use super::CallOp;

/// Receives the server's initial metadata into a client context.
#[derive(Debug, Default)]
pub struct CallOpRecvInitialMetadata<'a> {
    recv_initial_metadata: Option<&'a mut MetadataMap>,
    index: Option<usize>,
}

impl<'a> CallOpRecvInitialMetadata<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recv_initial_metadata(&mut self, context: &'a mut ClientContext) {
        context.initial_metadata_received = true;
        self.recv_initial_metadata = Some(&mut context.recv_initial_metadata);
    }
}

impl<'a> CallOp for CallOpRecvInitialMetadata<'a> {
    fn add_op(&mut self, ops: &mut OpArray) {
        if self.recv_initial_metadata.is_none() {
            return;
        }
        self.index = Some(ops.push(Op::RecvInitialMetadata(Default::default())));
    }

    fn finish_op(&mut self, ops: &mut OpArray, _status: &mut bool, _max_message_size: Option<usize>) {
        let Some(dest) = self.recv_initial_metadata.as_deref_mut() else {
            return;
        };
        let array = match self.index.take().and_then(|i| ops.take(i)) {
            Some(Op::RecvInitialMetadata(array)) => array,
            _ => Default::default(),
        };
        *dest = fill_metadata_map(array);
    }
}
