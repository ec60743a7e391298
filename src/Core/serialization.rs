// Message codecs used by the send/receive message ops.

use bytes::Bytes;

use crate::error::CallError;
use crate::Structs::ByteBuffer;

/// Per-message-type serialization capability.
///
/// The codec decides the buffer format. Once a buffer crosses into the
/// engine or back out of it, the batching layer owns its lifetime.
pub trait SerializationTraits {
    fn serialize(&self) -> Result<ByteBuffer, CallError>;

    /// Parse `buffer` into `message`, rejecting buffers over `max_message_size`.
    ///
    /// On error the contents of `message` are unspecified.
    fn deserialize(
        buffer: ByteBuffer,
        message: &mut Self,
        max_message_size: Option<usize>,
    ) -> Result<(), CallError>;
}

/// Enforce the negotiated receive limit. `None` means unlimited.
pub fn check_message_size(buffer: &ByteBuffer, max_message_size: Option<usize>) -> Result<(), CallError> {
    match max_message_size {
        Some(limit) if buffer.len() > limit => Err(CallError::MessageTooLarge {
            size: buffer.len(),
            limit,
        }),
        _ => Ok(()),
    }
}

impl SerializationTraits for ByteBuffer {
    fn serialize(&self) -> Result<ByteBuffer, CallError> {
        Ok(self.clone())
    }

    fn deserialize(
        buffer: ByteBuffer,
        message: &mut Self,
        max_message_size: Option<usize>,
    ) -> Result<(), CallError> {
        check_message_size(&buffer, max_message_size)?;
        *message = buffer;
        Ok(())
    }
}

impl SerializationTraits for Bytes {
    fn serialize(&self) -> Result<ByteBuffer, CallError> {
        Ok(ByteBuffer::new(self.clone()))
    }

    fn deserialize(
        buffer: ByteBuffer,
        message: &mut Self,
        max_message_size: Option<usize>,
    ) -> Result<(), CallError> {
        check_message_size(&buffer, max_message_size)?;
        *message = buffer.into_bytes();
        Ok(())
    }
}

impl SerializationTraits for Vec<u8> {
    fn serialize(&self) -> Result<ByteBuffer, CallError> {
        Ok(ByteBuffer::copy_from_slice(self))
    }

    fn deserialize(
        buffer: ByteBuffer,
        message: &mut Self,
        max_message_size: Option<usize>,
    ) -> Result<(), CallError> {
        check_message_size(&buffer, max_message_size)?;
        message.clear();
        message.extend_from_slice(buffer.as_slice());
        Ok(())
    }
}

impl SerializationTraits for String {
    fn serialize(&self) -> Result<ByteBuffer, CallError> {
        Ok(ByteBuffer::copy_from_slice(self.as_bytes()))
    }

    fn deserialize(
        buffer: ByteBuffer,
        message: &mut Self,
        max_message_size: Option<usize>,
    ) -> Result<(), CallError> {
        check_message_size(&buffer, max_message_size)?;
        let text = std::str::from_utf8(buffer.as_slice())
            .map_err(|e| CallError::Deserialize(format!("invalid utf-8: {e}")))?;
        message.clear();
        message.push_str(text);
        Ok(())
    }
}
