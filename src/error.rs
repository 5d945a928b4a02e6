//! # Error Types
//!
//! Error taxonomy for the sync protocol core.
//!
//! Decode failures fall into two classes:
//! - **Hard failures** ([`ProtocolError::TruncatedInput`],
//!   [`ProtocolError::MalformedText`], [`ProtocolError::UnknownMessageType`]):
//!   after one of these the decoder cursor is no longer trustworthy and must
//!   not be reused for further reads. Fatal for the message, not necessarily
//!   for the connection.
//! - **Apply failures**: errors raised by the external document engine while
//!   applying an update are *not* represented here. They are caught and logged
//!   at the single apply call site (see [`crate::protocol::sync`]) so that one
//!   misbehaving update cannot poison the read loop.
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// Tag namespace a message was decoded under.
///
/// Sync and auth messages share the same varuint tag encoding but live in
/// separate namespaces; a tag is only meaningful within its namespace, and the
/// two are never mixed on the same decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Document synchronization messages (SyncStep1 / SyncStep2 / Update)
    Sync,
    /// Access-control signaling messages (PermissionDenied)
    Auth,
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::Sync => write!(f, "sync"),
            Namespace::Auth => write!(f, "auth"),
        }
    }
}

/// Primary error type for all protocol operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The input buffer ended in the middle of a field.
    #[error("truncated input: buffer ended mid-field")]
    TruncatedInput,

    /// A varuint ran past ten bytes or carried bits beyond u64.
    ///
    /// Unlike [`TruncatedInput`](ProtocolError::TruncatedInput), this can
    /// never be cured by more bytes arriving: the encoding itself is bad.
    #[error("malformed varuint: encoding overflows u64")]
    MalformedVaruint,

    /// A string field did not contain valid UTF-8.
    #[error("malformed text: {0}")]
    MalformedText(#[from] std::str::Utf8Error),

    /// The message tag is not in the known set for the active namespace.
    #[error("unknown message type: tag {tag} in {namespace} namespace")]
    UnknownMessageType { namespace: Namespace, tag: u64 },

    /// A length prefix claimed more bytes than the configured maximum.
    #[error("message too large: {0} bytes")]
    OversizedMessage(usize),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error from the framing layer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
