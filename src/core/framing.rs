//! Tokio codec for carrying sync messages over byte streams.
//!
//! The wire format is self-delimiting, so no extra length header is added:
//! the codec parses the message's own tag and length prefix straight out of
//! the stream buffer. Partial input yields `Ok(None)` without consuming
//! anything; a length claim beyond the configured cap is rejected before any
//! buffer is grown for it.
//!
//! The decode loop and handler dispatch stay synchronous per stream; this
//! codec only adapts the buffer boundary to `AsyncRead`/`AsyncWrite`
//! transports via `tokio_util::codec::Framed`.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec;

use crate::config::MAX_MESSAGE_SIZE;
use crate::core::encoding::Decoder;
use crate::error::{Namespace, ProtocolError};
use crate::protocol::message::{SyncMessage, SyncTag};

/// Frames [`SyncMessage`]s over a byte stream.
#[derive(Debug, Clone)]
pub struct SyncMessageCodec {
    max_message_size: usize,
}

impl SyncMessageCodec {
    pub fn new() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    /// Codec with a custom message size cap (see
    /// [`ProtocolConfig`](crate::config::ProtocolConfig)).
    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self { max_message_size }
    }
}

impl Default for SyncMessageCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl codec::Decoder for SyncMessageCodec {
    type Item = SyncMessage;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<SyncMessage>, ProtocolError> {
        if src.is_empty() {
            return Ok(None);
        }

        // Peek the header without committing the buffer. Truncation here
        // only means the stream has more to deliver; a malformed varuint is
        // fatal, since waiting for more bytes can never repair it.
        let mut cursor = Decoder::new(&src[..]);
        let wire_tag = match cursor.read_uint() {
            Ok(tag) => tag,
            Err(ProtocolError::TruncatedInput) => return Ok(None),
            Err(err) => return Err(err),
        };
        let tag = SyncTag::from_wire(wire_tag).ok_or(ProtocolError::UnknownMessageType {
            namespace: Namespace::Sync,
            tag: wire_tag,
        })?;
        let payload_len = match cursor.read_uint() {
            Ok(len) => len,
            Err(ProtocolError::TruncatedInput) => return Ok(None),
            Err(err) => return Err(err),
        };

        let payload_len = usize::try_from(payload_len)
            .map_err(|_| ProtocolError::OversizedMessage(usize::MAX))?;
        let header_len = cursor.position();
        if header_len.saturating_add(payload_len) > self.max_message_size {
            return Err(ProtocolError::OversizedMessage(header_len + payload_len));
        }
        if cursor.remaining() < payload_len {
            // Known total size: reserve once instead of growing piecemeal.
            src.reserve(header_len + payload_len - src.len());
            return Ok(None);
        }

        src.advance(header_len);
        let payload = src.split_to(payload_len).to_vec();
        Ok(Some(match tag {
            SyncTag::SyncStep1 => SyncMessage::SyncStep1(payload),
            SyncTag::SyncStep2 => SyncMessage::SyncStep2(payload),
            SyncTag::Update => SyncMessage::Update(payload),
        }))
    }
}

impl codec::Encoder<SyncMessage> for SyncMessageCodec {
    type Error = ProtocolError;

    fn encode(&mut self, message: SyncMessage, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let encoded = message.to_bytes();
        if encoded.len() > self.max_message_size {
            return Err(ProtocolError::OversizedMessage(encoded.len()));
        }
        dst.reserve(encoded.len());
        dst.put_slice(&encoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::codec::{Decoder as _, Encoder as _};

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut codec = SyncMessageCodec::new();
        let message = SyncMessage::Update(vec![1, 2, 3]);

        let mut buffer = BytesMut::new();
        codec.encode(message.clone(), &mut buffer).unwrap();

        let decoded = codec.decode(&mut buffer).unwrap();
        assert_eq!(decoded, Some(message));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_partial_input_preserves_buffer() {
        let mut codec = SyncMessageCodec::new();
        let bytes = SyncMessage::SyncStep2(vec![9; 64]).to_bytes();

        // Feed everything but the last byte.
        let mut buffer = BytesMut::from(&bytes[..bytes.len() - 1]);
        let before = buffer.len();
        assert!(codec.decode(&mut buffer).unwrap().is_none());
        assert_eq!(buffer.len(), before);

        // Completing the message makes it decode.
        buffer.extend_from_slice(&bytes[bytes.len() - 1..]);
        assert_eq!(
            codec.decode(&mut buffer).unwrap(),
            Some(SyncMessage::SyncStep2(vec![9; 64]))
        );
    }

    #[test]
    fn test_concatenated_messages_decode_in_order() {
        let mut codec = SyncMessageCodec::new();
        let mut buffer = BytesMut::new();
        codec
            .encode(SyncMessage::SyncStep1(vec![1]), &mut buffer)
            .unwrap();
        codec
            .encode(SyncMessage::Update(vec![2, 2]), &mut buffer)
            .unwrap();

        assert_eq!(
            codec.decode(&mut buffer).unwrap(),
            Some(SyncMessage::SyncStep1(vec![1]))
        );
        assert_eq!(
            codec.decode(&mut buffer).unwrap(),
            Some(SyncMessage::Update(vec![2, 2]))
        );
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
    }

    #[test]
    fn test_oversized_claim_rejected_before_allocation() {
        let mut codec = SyncMessageCodec::with_max_message_size(1024);

        // Header claims a 1 MB payload; only the header is present.
        let mut header = crate::core::encoding::Encoder::new();
        header.write_uint(2);
        header.write_uint(1024 * 1024);
        let mut buffer = BytesMut::from(&header.into_bytes()[..]);

        assert!(matches!(
            codec.decode(&mut buffer),
            Err(ProtocolError::OversizedMessage(_))
        ));
    }

    #[test]
    fn test_unknown_tag_is_fatal_for_stream() {
        let mut codec = SyncMessageCodec::new();
        let mut encoder = crate::core::encoding::Encoder::new();
        encoder.write_uint(9);
        encoder.write_bytes(&[0]);
        let mut buffer = BytesMut::from(&encoder.into_bytes()[..]);

        assert!(matches!(
            codec.decode(&mut buffer),
            Err(ProtocolError::UnknownMessageType {
                namespace: Namespace::Sync,
                tag: 9,
            })
        ));
    }

    #[test]
    fn test_endless_continuation_header_is_fatal_not_partial() {
        // A peer streaming 0xff forever never produces a valid tag. The
        // codec must fail the stream rather than report partial input and
        // buffer the bytes indefinitely.
        let mut codec = SyncMessageCodec::new();
        let mut buffer = BytesMut::from(&[0xff; 64][..]);
        assert!(matches!(
            codec.decode(&mut buffer),
            Err(ProtocolError::MalformedVaruint)
        ));
    }

    #[test]
    fn test_oversized_encode_rejected() {
        let mut codec = SyncMessageCodec::with_max_message_size(16);
        let mut buffer = BytesMut::new();
        let result = codec.encode(SyncMessage::Update(vec![0; 64]), &mut buffer);
        assert!(matches!(result, Err(ProtocolError::OversizedMessage(_))));
        assert!(buffer.is_empty());
    }
}
