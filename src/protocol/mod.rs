//! # Protocol Layer
//!
//! Message definitions and the handshake controller.
//!
//! ## Components
//! - **Message**: the closed tagged unions for the sync and auth namespaces
//! - **Sync**: message writers and the tag-dispatching decoder
//! - **Auth**: one-shot PermissionDenied signaling
//! - **Handshake**: per-connection `Idle → AwaitingStep2 → Synced` tracking
//! - **Engine**: the interface boundary to the external document engine

pub mod auth;
pub mod engine;
pub mod handshake;
pub mod message;
pub mod sync;
