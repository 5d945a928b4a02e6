//! Per-connection handshake tracking.
//!
//! The base wire protocol has no explicit sync-done message: a peer is
//! "synced" once it has both sent and received a SyncStep2. That bookkeeping
//! is an integrating-layer concern, so it lives here as an explicit state
//! object owned by the connection, never inside the codec. The codec and the
//! [`sync`](crate::protocol::sync) dispatch stay stateless.
//!
//! State machine per logical connection: `Idle → AwaitingStep2 → Synced`.
//!
//! Topology convention (supported here, not enforced by the protocol): the
//! initiating side sends SyncStep1 first; the receiving side replies with
//! SyncStep2 immediately followed by its own SyncStep1, so both sides
//! converge without either having to initiate twice.

use tracing::debug;

use crate::core::encoding::{Decoder, Encoder};
use crate::error::Result;
use crate::protocol::engine::DocumentEngine;
use crate::protocol::message::SyncTag;
use crate::protocol::sync::{read_sync_message, write_sync_step1};

/// Which side of the connection this endpoint plays.
///
/// The roles are a usage convention: either endpoint may emit SyncStep1 at
/// any time, but in the client–server topology the initiator speaks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeRole {
    /// Sends the first SyncStep1 (typically the connecting client).
    Initiator,
    /// Waits for a SyncStep1, then answers SyncStep2 + its own SyncStep1.
    Responder,
}

/// Handshake progress for one logical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No handshake traffic yet.
    Idle,
    /// SyncStep1 sent, SyncStep2 not yet exchanged in both directions.
    AwaitingStep2,
    /// A SyncStep2 has been both sent and received.
    Synced,
}

/// Connection-scoped handshake state.
///
/// One instance per logical connection, owned by the integrating layer.
/// Tracks whether a SyncStep2 has gone out and come in; everything else
/// (document state, clocks) belongs to the engine.
#[derive(Debug)]
pub struct SyncHandshake {
    role: HandshakeRole,
    step1_sent: bool,
    step2_sent: bool,
    step2_received: bool,
}

impl SyncHandshake {
    pub fn new(role: HandshakeRole) -> Self {
        Self {
            role,
            step1_sent: false,
            step2_sent: false,
            step2_received: false,
        }
    }

    pub fn role(&self) -> HandshakeRole {
        self.role
    }

    /// Current phase, inferred from what has been sent and received.
    pub fn phase(&self) -> SyncPhase {
        if self.step2_sent && self.step2_received {
            SyncPhase::Synced
        } else if self.step1_sent {
            SyncPhase::AwaitingStep2
        } else {
            SyncPhase::Idle
        }
    }

    pub fn is_synced(&self) -> bool {
        self.phase() == SyncPhase::Synced
    }

    /// Open the handshake: encode a SyncStep1 announcing the local state
    /// vector. Typically called on connect by the initiator.
    pub fn start<E: DocumentEngine>(&mut self, engine: &E) -> Vec<u8> {
        let mut encoder = Encoder::new();
        write_sync_step1(&mut encoder, engine);
        self.step1_sent = true;
        encoder.into_bytes()
    }

    /// Process one incoming buffer, which may hold several concatenated sync
    /// messages, and return the reply bytes to send back (if any).
    ///
    /// Messages are processed strictly in order; an apply failure inside the
    /// engine is swallowed by the dispatch and does not stop later messages
    /// in the same buffer. A hard decode failure stops processing of the
    /// buffer and propagates, and the partial reply is discarded — so
    /// handshake progress is committed only once the whole buffer has
    /// decoded. The tracker must never record a SyncStep2 as sent when its
    /// bytes were never surfaced to the caller.
    pub fn handle<E: DocumentEngine>(
        &mut self,
        data: &[u8],
        engine: &mut E,
    ) -> Result<Option<Vec<u8>>> {
        let mut decoder = Decoder::new(data);
        let mut reply = Encoder::new();
        let mut step1_sent = self.step1_sent;
        let mut step2_sent = self.step2_sent;
        let mut step2_received = self.step2_received;
        while decoder.has_remaining() {
            let tag = read_sync_message(&mut decoder, &mut reply, engine)?;
            match tag {
                SyncTag::SyncStep1 => {
                    // read_sync_message already queued our SyncStep2.
                    step2_sent = true;
                    if !step1_sent {
                        write_sync_step1(&mut reply, engine);
                        step1_sent = true;
                    }
                }
                SyncTag::SyncStep2 => step2_received = true,
                SyncTag::Update => {}
            }
        }
        self.step1_sent = step1_sent;
        self.step2_sent = step2_sent;
        self.step2_received = step2_received;
        if self.is_synced() {
            debug!(role = ?self.role, "handshake complete, peers converged");
        }
        Ok(if reply.is_empty() {
            None
        } else {
            Some(reply.into_bytes())
        })
    }
}
