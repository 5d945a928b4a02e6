//! # Core Codec Components
//!
//! Low-level encoding primitives and stream framing.
//!
//! This module provides the foundation for the protocol: the shared varuint and
//! length-prefixed byte-string encoding every message is built from, and a
//! tokio codec for carrying the self-delimiting messages over byte streams.
//!
//! ## Components
//! - **Encoding**: single-pass [`Encoder`](encoding::Encoder) buffer and
//!   [`Decoder`](encoding::Decoder) cursor
//! - **Framing**: [`SyncMessageCodec`](framing::SyncMessageCodec) for
//!   `AsyncRead`/`AsyncWrite` transports
//!
//! ## Wire Format
//! ```text
//! [Tag(varuint)] [Length(varuint)] [Payload(N)]
//! ```
//!
//! ## Security
//! - Length prefixes are validated against the remaining input before any
//!   payload is materialized
//! - The framing layer additionally caps message size (default 16MB) to
//!   prevent memory exhaustion from hostile length claims

pub mod encoding;
pub mod framing;
