//! Message variants and their byte layout.
//!
//! Two tag namespaces share one varuint tag encoding but are never mixed on
//! the same decode call: the sync namespace (three variants) and the auth
//! namespace (one variant). Tags are stable across versions.
//!
//! | Message          | Tag (namespace) | Payload                              |
//! |------------------|-----------------|--------------------------------------|
//! | SyncStep1        | 0 (sync)        | length-prefixed state-vector bytes   |
//! | SyncStep2        | 1 (sync)        | length-prefixed update bytes         |
//! | Update           | 2 (sync)        | length-prefixed update bytes         |
//! | PermissionDenied | 0 (auth)        | length-prefixed UTF-8 reason string  |
//!
//! The tag is always the first field of a message; decoding is impossible
//! without reading it first.

use crate::core::encoding::{Decoder, Encoder};
use crate::error::{Namespace, ProtocolError, Result};

/// Sync namespace: announce known state.
pub const MESSAGE_SYNC_STEP_1: u64 = 0;
/// Sync namespace: reply with the missing delta.
pub const MESSAGE_SYNC_STEP_2: u64 = 1;
/// Sync namespace: incremental delta.
pub const MESSAGE_UPDATE: u64 = 2;
/// Auth namespace: access-control rejection.
pub const MESSAGE_PERMISSION_DENIED: u64 = 0;

/// Tag of a successfully decoded sync message.
///
/// Returned by [`read_sync_message`](crate::protocol::sync::read_sync_message)
/// so callers can log and branch without re-parsing, and passed to the
/// document engine as the origin of an applied update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTag {
    SyncStep1,
    SyncStep2,
    Update,
}

impl SyncTag {
    /// Map a wire tag into the closed set, `None` for anything unknown.
    pub fn from_wire(tag: u64) -> Option<Self> {
        match tag {
            MESSAGE_SYNC_STEP_1 => Some(SyncTag::SyncStep1),
            MESSAGE_SYNC_STEP_2 => Some(SyncTag::SyncStep2),
            MESSAGE_UPDATE => Some(SyncTag::Update),
            _ => None,
        }
    }

    pub fn as_wire(self) -> u64 {
        match self {
            SyncTag::SyncStep1 => MESSAGE_SYNC_STEP_1,
            SyncTag::SyncStep2 => MESSAGE_SYNC_STEP_2,
            SyncTag::Update => MESSAGE_UPDATE,
        }
    }
}

impl std::fmt::Display for SyncTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncTag::SyncStep1 => write!(f, "sync-step-1"),
            SyncTag::SyncStep2 => write!(f, "sync-step-2"),
            SyncTag::Update => write!(f, "update"),
        }
    }
}

/// A message in the sync namespace.
///
/// State vectors and updates are opaque to the protocol; they are produced
/// and consumed only by the external document engine. `SyncStep2` and
/// `Update` carry identical payload shapes; the tag alone disambiguates
/// initial sync from incremental broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncMessage {
    /// Announce local state as an opaque state vector.
    SyncStep1(Vec<u8>),
    /// Reply with every operation missing from the announced state, plus the
    /// full delete set.
    SyncStep2(Vec<u8>),
    /// Incremental delta, broadcast outside the handshake.
    Update(Vec<u8>),
}

impl SyncMessage {
    pub fn tag(&self) -> SyncTag {
        match self {
            SyncMessage::SyncStep1(_) => SyncTag::SyncStep1,
            SyncMessage::SyncStep2(_) => SyncTag::SyncStep2,
            SyncMessage::Update(_) => SyncTag::Update,
        }
    }

    /// Opaque payload bytes, whatever the variant.
    pub fn payload(&self) -> &[u8] {
        match self {
            SyncMessage::SyncStep1(payload)
            | SyncMessage::SyncStep2(payload)
            | SyncMessage::Update(payload) => payload,
        }
    }

    /// Append the wire form of this message to `encoder`.
    pub fn encode(&self, encoder: &mut Encoder) {
        encoder.write_uint(self.tag().as_wire());
        encoder.write_bytes(self.payload());
    }

    /// Convenience: encode into a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut encoder = Encoder::with_capacity(self.payload().len() + 11);
        self.encode(&mut encoder);
        encoder.into_bytes()
    }

    /// Decode one sync message from the cursor, leaving the cursor positioned
    /// at the next message.
    ///
    /// # Errors
    /// `UnknownMessageType` for tags outside `{0, 1, 2}`; `TruncatedInput`
    /// if the buffer ends mid-field. Either failure poisons the cursor.
    pub fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let tag = decoder.read_uint()?;
        match SyncTag::from_wire(tag) {
            Some(SyncTag::SyncStep1) => Ok(SyncMessage::SyncStep1(decoder.read_bytes()?.to_vec())),
            Some(SyncTag::SyncStep2) => Ok(SyncMessage::SyncStep2(decoder.read_bytes()?.to_vec())),
            Some(SyncTag::Update) => Ok(SyncMessage::Update(decoder.read_bytes()?.to_vec())),
            None => Err(ProtocolError::UnknownMessageType {
                namespace: Namespace::Sync,
                tag,
            }),
        }
    }
}

/// A message in the auth namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMessage {
    /// One-shot notification that the peer denied access; carries a
    /// human-readable reason. Not a negotiated exchange.
    PermissionDenied(String),
}

impl AuthMessage {
    pub fn encode(&self, encoder: &mut Encoder) {
        match self {
            AuthMessage::PermissionDenied(reason) => {
                encoder.write_uint(MESSAGE_PERMISSION_DENIED);
                encoder.write_string(reason);
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        self.encode(&mut encoder);
        encoder.into_bytes()
    }

    pub fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let tag = decoder.read_uint()?;
        match tag {
            MESSAGE_PERMISSION_DENIED => {
                Ok(AuthMessage::PermissionDenied(decoder.read_string()?.to_owned()))
            }
            _ => Err(ProtocolError::UnknownMessageType {
                namespace: Namespace::Auth,
                tag,
            }),
        }
    }
}
