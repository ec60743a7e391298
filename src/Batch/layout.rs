// Low-level operation layout handed to the call engine.
//
// An OpArray is filled by a batch, moved to the engine when the batch
// starts, and comes back inside a Completion with its receive slots filled.

use std::ffi::CString;

use bytes::Bytes;

use crate::Structs::{ByteBuffer, MetadataArray, StatusCode, Tag};

/// Maximum number of ops a single batch can populate.
/// One per composition slot.
pub const MAX_OPS: usize = 6;

/// Kind of a primitive engine operation, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpKind {
    SendInitialMetadata = 0,
    SendMessage = 1,
    SendCloseFromClient = 2,
    SendStatusFromServer = 3,
    RecvInitialMetadata = 4,
    RecvMessage = 5,
    RecvStatusOnClient = 6,
}

/// One primitive engine operation plus its payload.
///
/// Send variants own what they send. Receive variants are slots: they are
/// populated empty and the engine fills them before completing the batch.
#[derive(Debug)]
pub enum Op {
    SendInitialMetadata(MetadataArray),
    SendMessage(ByteBuffer),
    SendCloseFromClient,
    SendStatusFromServer {
        trailing_metadata: MetadataArray,
        status: StatusCode,
        /// `None` when there are no details to send.
        status_details: Option<Bytes>,
    },
    RecvInitialMetadata(MetadataArray),
    RecvMessage(Option<ByteBuffer>),
    RecvStatusOnClient {
        trailing_metadata: MetadataArray,
        status: StatusCode,
        /// `None` when the engine reported no details.
        status_details: Option<CString>,
        /// Bytes the engine allocated for `status_details`.
        status_details_capacity: usize,
    },
}

impl Op {
    pub fn kind(&self) -> OpKind {
        match self {
            Op::SendInitialMetadata(_) => OpKind::SendInitialMetadata,
            Op::SendMessage(_) => OpKind::SendMessage,
            Op::SendCloseFromClient => OpKind::SendCloseFromClient,
            Op::SendStatusFromServer { .. } => OpKind::SendStatusFromServer,
            Op::RecvInitialMetadata(_) => OpKind::RecvInitialMetadata,
            Op::RecvMessage(_) => OpKind::RecvMessage,
            Op::RecvStatusOnClient { .. } => OpKind::RecvStatusOnClient,
        }
    }

    /// Empty client status slot.
    pub fn recv_status_on_client() -> Self {
        Op::RecvStatusOnClient {
            trailing_metadata: MetadataArray::new(),
            status: StatusCode::Ok,
            status_details: None,
            status_details_capacity: 0,
        }
    }
}

/// Fixed-capacity array of ops populated by one batch.
///
/// Indices are stable: an op pushed at index `i` is found at `i` when the
/// array comes back from the engine, so each mixin can reclaim exactly the
/// op it produced.
#[derive(Default)]
pub struct OpArray {
    ops: [Option<Op>; MAX_OPS],
    len: usize,
}

impl OpArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an op and return its index.
    ///
    /// # Panics
    /// If more than [`MAX_OPS`] ops are pushed. A batch has six slots, each
    /// contributing at most one op, so this only fires on a broken mixin.
    pub fn push(&mut self, op: Op) -> usize {
        assert!(self.len < MAX_OPS, "op array overflow ({} ops)", MAX_OPS);
        let index = self.len;
        self.ops[index] = Some(op);
        self.len += 1;
        index
    }

    /// Number of ops populated so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<&Op> {
        self.ops.get(index).and_then(|op| op.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Op> {
        self.ops.get_mut(index).and_then(|op| op.as_mut())
    }

    /// Move the op at `index` out, leaving the slot empty.
    pub fn take(&mut self, index: usize) -> Option<Op> {
        self.ops.get_mut(index).and_then(|op| op.take())
    }

    /// Ops still present, in populate order.
    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops[..self.len].iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Op> {
        self.ops[..self.len].iter_mut().flatten()
    }

    /// Kinds of the ops still present, in populate order.
    pub fn kinds(&self) -> Vec<OpKind> {
        self.iter().map(Op::kind).collect()
    }
}

/// What an engine reports when a batch finishes.
pub struct Completion {
    /// Identity the batch was started under; rewritten to the return tag on finalize.
    pub tag: Tag,
    /// Overall batch outcome; finalizers may downgrade it.
    pub ok: bool,
    /// The batch's ops, receive slots filled in.
    pub ops: OpArray,
}

impl Completion {
    pub fn new(tag: Tag, ok: bool, ops: OpArray) -> Self {
        Self { tag, ok, ops }
    }
}
