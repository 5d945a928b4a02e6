//! Shared test fixture: a miniature per-replica clock engine.
//!
//! Real enough to exercise the protocol end to end: state vectors summarize
//! the highest clock seen per replica, diffs carry the operations above the
//! peer's clocks plus the full delete set, and applies are idempotent. The
//! opaque blobs use the crate's own varuint encoding for convenience; the
//! protocol never looks inside them.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use sync_protocol::{ApplyError, Decoder, DocumentEngine, Encoder, SyncTag};

#[derive(Debug, Default)]
pub struct ClockEngine {
    ops: BTreeMap<(u64, u64), Vec<u8>>,
    deleted: BTreeSet<(u64, u64)>,
    pub apply_calls: usize,
    pub fail_next_apply: bool,
}

impl ClockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a local operation `(replica, clock)` with a payload.
    pub fn insert_op(&mut self, replica: u64, clock: u64, payload: &[u8]) {
        self.ops.insert((replica, clock), payload.to_vec());
    }

    /// Tombstone an operation.
    pub fn delete_op(&mut self, replica: u64, clock: u64) {
        self.deleted.insert((replica, clock));
    }

    /// Observable document state, for convergence assertions.
    pub fn contents(&self) -> (BTreeMap<(u64, u64), Vec<u8>>, BTreeSet<(u64, u64)>) {
        (self.ops.clone(), self.deleted.clone())
    }

    fn clocks(&self) -> BTreeMap<u64, u64> {
        let mut clocks = BTreeMap::new();
        for &(replica, clock) in self.ops.keys() {
            let entry = clocks.entry(replica).or_insert(0);
            *entry = (*entry).max(clock);
        }
        clocks
    }

    fn decode_state_vector(state_vector: &[u8]) -> BTreeMap<u64, u64> {
        let mut decoder = Decoder::new(state_vector);
        let mut clocks = BTreeMap::new();
        let count = match decoder.read_uint() {
            Ok(count) => count,
            Err(_) => return clocks,
        };
        for _ in 0..count {
            match (decoder.read_uint(), decoder.read_uint()) {
                (Ok(replica), Ok(clock)) => {
                    clocks.insert(replica, clock);
                }
                _ => return clocks,
            }
        }
        clocks
    }
}

impl DocumentEngine for ClockEngine {
    fn state_vector(&self) -> Vec<u8> {
        let clocks = self.clocks();
        let mut encoder = Encoder::new();
        encoder.write_uint(clocks.len() as u64);
        for (replica, clock) in clocks {
            encoder.write_uint(replica);
            encoder.write_uint(clock);
        }
        encoder.into_bytes()
    }

    fn update_since(&self, peer_state_vector: &[u8]) -> Vec<u8> {
        let peer_clocks = Self::decode_state_vector(peer_state_vector);
        let missing: Vec<_> = self
            .ops
            .iter()
            .filter(|((replica, clock), _)| peer_clocks.get(replica).copied().unwrap_or(0) < *clock)
            .collect();

        let mut encoder = Encoder::new();
        encoder.write_uint(missing.len() as u64);
        for ((replica, clock), payload) in missing {
            encoder.write_uint(*replica);
            encoder.write_uint(*clock);
            encoder.write_bytes(payload);
        }
        // The full delete set rides along with every diff.
        encoder.write_uint(self.deleted.len() as u64);
        for (replica, clock) in &self.deleted {
            encoder.write_uint(*replica);
            encoder.write_uint(*clock);
        }
        encoder.into_bytes()
    }

    fn apply_update(&mut self, update: &[u8], _origin: SyncTag) -> Result<(), ApplyError> {
        if self.fail_next_apply {
            self.fail_next_apply = false;
            return Err("simulated observer failure".into());
        }
        self.apply_calls += 1;

        let mut decoder = Decoder::new(update);
        let op_count = decoder.read_uint().map_err(|e| -> ApplyError { e.into() })?;
        for _ in 0..op_count {
            let replica = decoder.read_uint().map_err(|e| -> ApplyError { e.into() })?;
            let clock = decoder.read_uint().map_err(|e| -> ApplyError { e.into() })?;
            let payload = decoder.read_bytes().map_err(|e| -> ApplyError { e.into() })?;
            // Map insert makes re-application a no-op.
            self.ops.insert((replica, clock), payload.to_vec());
        }
        let tombstone_count = decoder.read_uint().map_err(|e| -> ApplyError { e.into() })?;
        for _ in 0..tombstone_count {
            let replica = decoder.read_uint().map_err(|e| -> ApplyError { e.into() })?;
            let clock = decoder.read_uint().map_err(|e| -> ApplyError { e.into() })?;
            self.deleted.insert((replica, clock));
        }
        Ok(())
    }
}
