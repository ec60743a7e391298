// Each call op driven by hand: populate, play the engine on the op array,
// then finalize.

use std::ffi::CString;

use dmxp_callops::{
    ByteBuffer, CallError, CallOp, CallOpClientRecvStatus, CallOpClientSendClose, CallOpGenericRecvMessage,
    CallOpRecvInitialMetadata, CallOpRecvMessage, CallOpSendInitialMetadata, CallOpSendMessage,
    CallOpServerSendStatus, ClientContext, MetadataArray, MetadataMap, Op, OpArray, OpKind, SerializationTraits,
    Status, StatusCode,
};

/// A message whose codec always refuses to serialize.
struct Unserializable;

impl SerializationTraits for Unserializable {
    fn serialize(&self) -> Result<ByteBuffer, CallError> {
        Err(CallError::Serialize("refused".into()))
    }

    fn deserialize(_: ByteBuffer, _: &mut Self, _: Option<usize>) -> Result<(), CallError> {
        Ok(())
    }
}

fn deliver_message(ops: &mut OpArray, index: usize, payload: Option<&[u8]>) {
    match ops.get_mut(index) {
        Some(Op::RecvMessage(slot)) => *slot = payload.map(ByteBuffer::copy_from_slice),
        other => panic!("expected RecvMessage at {index}, got {other:?}"),
    }
}

#[test]
fn send_initial_metadata_only_when_attached() {
    let mut op = CallOpSendInitialMetadata::new();
    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    assert!(ops.is_empty());

    let mut metadata = MetadataMap::new();
    metadata.insert("x-user", "alice");
    metadata.insert("x-user", "bob");
    op.send_initial_metadata(&metadata);
    assert!(op.is_active());
    assert_eq!(op.initial_metadata_count(), 2);

    op.add_op(&mut ops);
    assert_eq!(ops.kinds(), vec![OpKind::SendInitialMetadata]);
    match ops.get(0) {
        Some(Op::SendInitialMetadata(array)) => assert_eq!(array.count(), 2),
        other => panic!("unexpected op {other:?}"),
    }

    let mut status = true;
    op.finish_op(&mut ops, &mut status, None);
    assert!(status);
}

#[test]
fn send_initial_metadata_populates_once_per_attach() {
    let mut metadata = MetadataMap::new();
    metadata.insert("x-user", "alice");

    let mut op = CallOpSendInitialMetadata::new();
    op.send_initial_metadata(&metadata);

    let mut first = OpArray::new();
    op.add_op(&mut first);
    assert_eq!(first.len(), 1);
    assert!(!op.is_active());

    let mut second = OpArray::new();
    op.add_op(&mut second);
    assert!(second.is_empty());

    // attaching again re-arms it
    op.send_initial_metadata(&metadata);
    let mut third = OpArray::new();
    op.add_op(&mut third);
    assert_eq!(third.kinds(), vec![OpKind::SendInitialMetadata]);
}

#[test]
fn send_message_moves_buffer_and_releases_it() {
    let mut op = CallOpSendMessage::new();
    op.send_message(&"hello".to_string()).unwrap();
    assert!(op.has_message());

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    assert!(!op.has_message());
    match ops.get(0) {
        Some(Op::SendMessage(buffer)) => assert_eq!(buffer.as_slice(), b"hello"),
        other => panic!("unexpected op {other:?}"),
    }

    let mut status = true;
    op.finish_op(&mut ops, &mut status, None);
    assert!(status);
    assert!(ops.get(0).is_none());
}

#[test]
fn send_message_serialization_failure_emits_nothing() {
    let mut op = CallOpSendMessage::new();
    let err = op.send_message(&Unserializable).unwrap_err();
    assert_eq!(err, CallError::Serialize("refused".into()));
    assert!(!op.has_message());

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    assert!(ops.is_empty());
}

#[test]
fn recv_message_success() {
    let mut dest = String::new();
    let mut op = CallOpRecvMessage::new();
    op.recv_message(&mut dest);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    assert_eq!(ops.kinds(), vec![OpKind::RecvMessage]);
    deliver_message(&mut ops, 0, Some(&b"pong"[..]));

    let mut status = true;
    op.finish_op(&mut ops, &mut status, None);
    assert!(status);
    assert!(op.got_message());
    drop(op);
    assert_eq!(dest, "pong");
}

#[test]
fn recv_message_missing_buffer_forces_failure() {
    let mut dest = String::from("previous");
    let mut op = CallOpRecvMessage::new();
    op.recv_message(&mut dest);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    deliver_message(&mut ops, 0, None);

    let mut status = true;
    op.finish_op(&mut ops, &mut status, None);
    assert!(!status);
    assert!(!op.got_message());
    drop(op);
    assert_eq!(dest, "previous");
}

#[test]
fn recv_message_on_failed_batch_leaves_destination_alone() {
    let mut dest = vec![9u8];
    let mut op = CallOpRecvMessage::new();
    op.recv_message(&mut dest);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    deliver_message(&mut ops, 0, Some(&b"late"[..]));

    let mut status = false;
    op.finish_op(&mut ops, &mut status, None);
    assert!(!status);
    assert!(!op.got_message());
    drop(op);
    assert_eq!(dest, vec![9u8]);
    // the delivered buffer was taken and released
    assert!(ops.get(0).is_none());
}

#[test]
fn recv_message_deserialization_failure_downgrades_status() {
    let mut dest = String::new();
    let mut op = CallOpRecvMessage::new();
    op.recv_message(&mut dest);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    deliver_message(&mut ops, 0, Some(&[0xffu8, 0xfe][..]));

    let mut status = true;
    op.finish_op(&mut ops, &mut status, None);
    assert!(!status);
    assert!(!op.got_message());
}

#[test]
fn recv_message_respects_max_message_size() {
    let mut dest = Vec::new();
    let mut op = CallOpRecvMessage::new();
    op.recv_message(&mut dest);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    deliver_message(&mut ops, 0, Some(&[1u8, 2, 3, 4, 5][..]));

    let mut status = true;
    op.finish_op(&mut ops, &mut status, Some(4));
    assert!(!status);
    assert!(!op.got_message());
}

#[test]
fn recv_message_unattached_is_inert() {
    let mut op: CallOpRecvMessage<'_, String> = CallOpRecvMessage::new();
    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    assert!(ops.is_empty());

    let mut status = true;
    op.finish_op(&mut ops, &mut status, None);
    assert!(status);
    assert!(!op.got_message());
}

#[test]
fn generic_recv_message_dispatches_to_captured_type() {
    let mut dest: Vec<u8> = Vec::new();
    let mut op = CallOpGenericRecvMessage::new();
    op.recv_message(&mut dest);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    deliver_message(&mut ops, 0, Some(&[0xdeu8, 0xad][..]));

    let mut status = true;
    op.finish_op(&mut ops, &mut status, Some(16));
    assert!(status);
    assert!(op.got_message());
    drop(op);
    assert_eq!(dest, vec![0xde, 0xad]);
}

#[test]
fn generic_recv_message_failure_paths() {
    let mut dest = String::from("keep");
    let mut op = CallOpGenericRecvMessage::new();
    op.recv_message(&mut dest);

    // failed batch with a buffer
    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    deliver_message(&mut ops, 0, Some(&b"ignored"[..]));
    let mut status = false;
    op.finish_op(&mut ops, &mut status, None);
    assert!(!status);
    assert!(!op.got_message());

    // successful batch without a buffer
    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    let mut status = true;
    op.finish_op(&mut ops, &mut status, None);
    assert!(!status);
    assert!(!op.got_message());

    drop(op);
    assert_eq!(dest, "keep");
}

#[test]
fn client_send_close() {
    let mut op = CallOpClientSendClose::new();
    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    assert!(ops.is_empty());

    op.client_send_close();
    op.add_op(&mut ops);
    assert_eq!(ops.kinds(), vec![OpKind::SendCloseFromClient]);
}

#[test]
fn server_send_status_populates_even_when_unattached() {
    let mut op = CallOpServerSendStatus::new();
    assert!(!op.is_status_available());

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    match ops.get(0) {
        Some(Op::SendStatusFromServer {
            trailing_metadata,
            status,
            status_details,
        }) => {
            assert!(trailing_metadata.is_empty());
            assert_eq!(*status, StatusCode::Ok);
            assert!(status_details.is_none());
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn server_send_status_carries_status_and_trailers() {
    let mut trailers = MetadataMap::new();
    trailers.insert("x-cost", "7");

    let mut op = CallOpServerSendStatus::new();
    op.server_send_status(&trailers, &Status::new(StatusCode::NotFound, "no row"));
    assert!(op.is_status_available());
    assert_eq!(op.trailing_metadata_count(), 1);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    match ops.get(0) {
        Some(Op::SendStatusFromServer {
            trailing_metadata,
            status,
            status_details,
        }) => {
            assert_eq!(trailing_metadata.count(), 1);
            assert_eq!(*status, StatusCode::NotFound);
            assert_eq!(status_details.as_deref(), Some(&b"no row"[..]));
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn server_send_status_resets_after_populate() {
    let mut trailers = MetadataMap::new();
    trailers.insert("x-cost", "7");

    let mut op = CallOpServerSendStatus::new();
    op.server_send_status(&trailers, &Status::new(StatusCode::Aborted, "conflict"));

    let mut first = OpArray::new();
    op.add_op(&mut first);
    assert!(!op.is_status_available());
    assert_eq!(op.trailing_metadata_count(), 0);

    // a second populate sends the unattached default, not stale leftovers
    let mut second = OpArray::new();
    op.add_op(&mut second);
    match second.get(0) {
        Some(Op::SendStatusFromServer {
            trailing_metadata,
            status,
            status_details,
        }) => {
            assert!(trailing_metadata.is_empty());
            assert_eq!(*status, StatusCode::Ok);
            assert!(status_details.is_none());
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn server_send_status_keeps_binary_details() {
    let mut op = CallOpServerSendStatus::new();
    op.server_send_status(&MetadataMap::new(), &Status::new(StatusCode::Internal, vec![0xc3u8, 0x28]));

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    match ops.get(0) {
        Some(Op::SendStatusFromServer { status_details, .. }) => {
            assert_eq!(status_details.as_deref(), Some(&[0xc3u8, 0x28][..]));
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn recv_initial_metadata_copies_into_context() {
    let mut context = ClientContext::new();
    let mut op = CallOpRecvInitialMetadata::new();
    op.recv_initial_metadata(&mut context);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    assert_eq!(ops.kinds(), vec![OpKind::RecvInitialMetadata]);
    if let Some(Op::RecvInitialMetadata(slot)) = ops.get_mut(0) {
        slot.push(&b"server"[..], &b"loopback"[..]);
        slot.push(&b"server"[..], &b"again"[..]);
    }

    let mut status = false;
    op.finish_op(&mut ops, &mut status, None);
    assert!(!status);
    drop(op);

    assert!(context.initial_metadata_received());
    assert_eq!(
        context.recv_initial_metadata().get_all("server").collect::<Vec<_>>(),
        vec![&b"loopback"[..], &b"again"[..]]
    );
}

#[test]
fn client_recv_status_always_produces_status() {
    let mut context = ClientContext::new();
    let mut status = Status::new(StatusCode::Unknown, "stale");
    let mut op = CallOpClientRecvStatus::new();
    op.client_recv_status(&mut context, &mut status);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);
    assert_eq!(ops.kinds(), vec![OpKind::RecvStatusOnClient]);
    if let Some(Op::RecvStatusOnClient {
        trailing_metadata,
        status,
        status_details,
        status_details_capacity,
    }) = ops.get_mut(0)
    {
        let mut trailers = MetadataArray::new();
        trailers.push(&b"x-retry"[..], &b"no"[..]);
        *trailing_metadata = trailers;
        *status = StatusCode::Unavailable;
        *status_details = Some(CString::new("connection reset").unwrap());
        *status_details_capacity = 32;
    }

    let mut batch_ok = false;
    op.finish_op(&mut ops, &mut batch_ok, None);
    assert!(!batch_ok);
    drop(op);

    assert_eq!(status, Status::new(StatusCode::Unavailable, "connection reset"));
    assert_eq!(context.trailing_metadata().get_str("x-retry"), Some("no"));
}

#[test]
fn client_recv_status_without_details() {
    let mut context = ClientContext::new();
    let mut status = Status::new(StatusCode::Unknown, "stale");
    let mut op = CallOpClientRecvStatus::new();
    op.client_recv_status(&mut context, &mut status);

    let mut ops = OpArray::new();
    op.add_op(&mut ops);

    let mut batch_ok = true;
    op.finish_op(&mut ops, &mut batch_ok, None);
    assert!(batch_ok);
    drop(op);
    assert_eq!(status, Status::ok());
}
