//! Interface boundary to the external replicated-document engine.
//!
//! The protocol never inspects state vectors or updates; it only moves them.
//! Everything with a lifecycle longer than a single message exchange (the
//! document, its clocks, its operation log) lives behind this trait.

use crate::protocol::message::SyncTag;

/// Error returned by the engine when applying a delta.
///
/// The protocol never propagates this through the read loop; it is caught
/// and logged at the apply call site.
pub type ApplyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The external conflict-free document engine.
///
/// Contract the protocol relies on:
/// - `apply_update` is atomic from the engine's perspective: the document is
///   never observed in a partially-applied state by concurrent readers.
/// - Updates are idempotent: re-applying a delta already seen must not
///   corrupt state. Deltas are self-contained and applicable independent of
///   arrival order.
/// - When one engine instance is shared across many connections, the engine
///   serializes its own mutation; the protocol layer adds no locking.
pub trait DocumentEngine {
    /// Opaque summary of the latest known clock per replica.
    fn state_vector(&self) -> Vec<u8>;

    /// Every operation not represented in `peer_state_vector`, plus the full
    /// delete set.
    fn update_since(&self, peer_state_vector: &[u8]) -> Vec<u8>;

    /// Apply a delta. `origin` is the wire tag the delta arrived under
    /// (SyncStep2 or Update), for the engine's own bookkeeping or logging;
    /// both origins carry identical apply semantics.
    fn apply_update(&mut self, update: &[u8], origin: SyncTag) -> Result<(), ApplyError>;
}
