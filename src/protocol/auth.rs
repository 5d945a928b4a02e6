//! Access-control rejection signaling.
//!
//! One message type, one valid tag, no state machine: a PermissionDenied is
//! a one-shot notification, not a negotiated exchange. The engine handle
//! passed to the handler is for context and logging only; no document
//! mutation is required on denial.

use tracing::debug;

use crate::core::encoding::{Decoder, Encoder};
use crate::error::{Namespace, ProtocolError, Result};
use crate::protocol::message::MESSAGE_PERMISSION_DENIED;

/// Encode a PermissionDenied carrying a human-readable reason.
pub fn write_permission_denied(encoder: &mut Encoder, reason: &str) {
    encoder.write_uint(MESSAGE_PERMISSION_DENIED);
    encoder.write_string(reason);
}

/// Decode one auth message and invoke `on_denied` with the engine handle and
/// the reason, exactly once.
///
/// Returns the tag read. Unknown tags fail the same way as in the sync
/// namespace: fatal for the message, cursor poisoned.
pub fn read_auth_message<E, F>(decoder: &mut Decoder<'_>, engine: &E, mut on_denied: F) -> Result<u64>
where
    F: FnMut(&E, &str),
{
    let tag = decoder.read_uint()?;
    match tag {
        MESSAGE_PERMISSION_DENIED => {
            let reason = decoder.read_string()?;
            debug!(reason, "permission denied by peer");
            on_denied(engine, reason);
            Ok(tag)
        }
        _ => Err(ProtocolError::UnknownMessageType {
            namespace: Namespace::Auth,
            tag,
        }),
    }
}
