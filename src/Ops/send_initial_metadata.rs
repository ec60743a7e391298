use crate::Batch::layout::{Op, OpArray};
use crate::Core::metadata::fill_metadata_array;
use crate::Structs::{MetadataArray, MetadataMap};

use super::CallOp;

/// Sends the call's initial metadata.
#[derive(Debug, Default)]
pub struct CallOpSendInitialMetadata {
    send: bool,
    initial_metadata_count: usize,
    initial_metadata: Option<MetadataArray>,
}

impl CallOpSendInitialMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send_initial_metadata(&mut self, metadata: &MetadataMap) {
        self.send = true;
        self.initial_metadata_count = metadata.len();
        self.initial_metadata = Some(fill_metadata_array(metadata));
    }

    /// Whether metadata is attached and waiting to be populated.
    pub fn is_active(&self) -> bool {
        self.send
    }

    /// Number of entries handed to the engine.
    pub fn initial_metadata_count(&self) -> usize {
        self.initial_metadata_count
    }
}

impl CallOp for CallOpSendInitialMetadata {
    fn add_op(&mut self, ops: &mut OpArray) {
        // the engine owns the array from here on; populate once per attach
        let Some(metadata) = self.initial_metadata.take() else {
            return;
        };
        self.send = false;
        ops.push(Op::SendInitialMetadata(metadata));
    }

    fn finish_op(&mut self, _ops: &mut OpArray, _status: &mut bool, _max_message_size: Option<usize>) {}
}
