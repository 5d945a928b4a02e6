//! Sync message writers and the decode dispatch.
//!
//! The free functions here are the protocol's whole surface for the sync
//! namespace: three writers (one per variant) and [`read_sync_message`],
//! which reads one tag and routes the payload. Replies are produced into a
//! caller-supplied encoder synchronously, before the function returns;
//! whether the surrounding system sends them immediately or queues them is
//! its own business, as long as replies to one peer stay in processing order.

use tracing::{trace, warn};

use crate::core::encoding::{Decoder, Encoder};
use crate::error::{Namespace, ProtocolError, Result};
use crate::protocol::engine::DocumentEngine;
use crate::protocol::message::{SyncMessage, SyncTag};

/// Encode a SyncStep1 announcing the engine's current state vector.
///
/// Either endpoint may send this at any time, typically on connect.
pub fn write_sync_step1<E: DocumentEngine>(encoder: &mut Encoder, engine: &E) {
    SyncMessage::SyncStep1(engine.state_vector()).encode(encoder);
}

/// Encode a SyncStep2 carrying everything the engine has that is missing
/// from `remote_state_vector`, deletions included.
pub fn write_sync_step2<E: DocumentEngine>(
    encoder: &mut Encoder,
    engine: &E,
    remote_state_vector: &[u8],
) {
    SyncMessage::SyncStep2(engine.update_since(remote_state_vector)).encode(encoder);
}

/// Encode an incremental Update.
pub fn write_update(encoder: &mut Encoder, update: &[u8]) {
    SyncMessage::Update(update.to_vec()).encode(encoder);
}

/// Handle an incoming SyncStep1: immediately answer with SyncStep2.
///
/// The reply is a pure function of (local document state, remote state
/// vector); no waiting, no buffering.
fn read_sync_step1<E: DocumentEngine>(
    decoder: &mut Decoder<'_>,
    reply: &mut Encoder,
    engine: &E,
) -> Result<()> {
    let remote_state_vector = decoder.read_bytes()?;
    write_sync_step2(reply, engine, remote_state_vector);
    Ok(())
}

/// Handle an incoming SyncStep2 or Update: apply the delta.
///
/// An engine apply failure (e.g. a misbehaving downstream observer) is
/// logged and swallowed here so it cannot abort the surrounding read loop
/// or corrupt the decode cursor. Decode failures still propagate.
fn read_sync_step2<E: DocumentEngine>(
    decoder: &mut Decoder<'_>,
    engine: &mut E,
    origin: SyncTag,
) -> Result<()> {
    let update = decoder.read_bytes()?;
    if let Err(err) = engine.apply_update(update, origin) {
        warn!(%origin, error = %err, "document engine rejected update");
    }
    Ok(())
}

/// Decode one sync message from the cursor and act on it.
///
/// - SyncStep1: computes a SyncStep2 reply into `reply`
/// - SyncStep2 / Update: applies the delta to `engine` (same path for both;
///   the tags differ only in intent, not in apply semantics)
///
/// Returns the tag read so callers can log or branch without re-parsing.
/// The cursor is left at the next message on success; on error it is
/// poisoned and must not be reused.
pub fn read_sync_message<E: DocumentEngine>(
    decoder: &mut Decoder<'_>,
    reply: &mut Encoder,
    engine: &mut E,
) -> Result<SyncTag> {
    let wire_tag = decoder.read_uint()?;
    let tag = SyncTag::from_wire(wire_tag).ok_or(ProtocolError::UnknownMessageType {
        namespace: Namespace::Sync,
        tag: wire_tag,
    })?;
    trace!(%tag, "decoding sync message");
    match tag {
        SyncTag::SyncStep1 => read_sync_step1(decoder, reply, engine)?,
        SyncTag::SyncStep2 | SyncTag::Update => read_sync_step2(decoder, engine, tag)?,
    }
    Ok(tag)
}
