//! # Sync Protocol
//!
//! Compact, self-describing wire protocol core for synchronizing a replicated,
//! conflict-free document between two peers, plus an auxiliary sub-protocol for
//! signaling access-control rejections over the same channel.
//!
//! The crate is transport-agnostic and engine-agnostic: it defines how messages
//! are tagged, ordered, and interpreted, and delegates all document state to an
//! external [`DocumentEngine`]. Bytes in, bytes out.
//!
//! ## Components
//! - **Codec** ([`core`]): varuint + length-prefixed byte-string encoding and
//!   the byte layout of each message variant
//! - **Handshake Controller** ([`protocol`]): decides what to send back for each
//!   incoming message and applies payloads to the local document engine
//!
//! ## Wire Format
//! ```text
//! [Tag(varuint)] [Length(varuint)] [Payload(N)]
//! ```
//! Messages are self-delimiting, so they can be concatenated or embedded in
//! larger frames without external length markers.
//!
//! ## Example
//! ```ignore
//! use sync_protocol::{Decoder, Encoder, read_sync_message};
//!
//! // Initiator side: announce what we already have.
//! let mut encoder = Encoder::new();
//! sync_protocol::write_sync_step1(&mut encoder, &engine);
//! transport.send(encoder.into_bytes());
//!
//! // Read loop: decode, apply, and collect any replies.
//! let mut decoder = Decoder::new(&incoming);
//! let mut reply = Encoder::new();
//! let tag = read_sync_message(&mut decoder, &mut reply, &mut engine)?;
//! if !reply.is_empty() {
//!     transport.send(reply.into_bytes());
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;

pub use crate::core::encoding::{Decoder, Encoder};
pub use crate::core::framing::SyncMessageCodec;
pub use crate::error::{Namespace, ProtocolError, Result};
pub use crate::protocol::auth::{read_auth_message, write_permission_denied};
pub use crate::protocol::engine::{ApplyError, DocumentEngine};
pub use crate::protocol::handshake::{HandshakeRole, SyncHandshake, SyncPhase};
pub use crate::protocol::message::{AuthMessage, SyncMessage, SyncTag};
pub use crate::protocol::sync::{
    read_sync_message, write_sync_step1, write_sync_step2, write_update,
};
