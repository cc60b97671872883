//! Consensus-layer access
//!
//! - Slot/epoch arithmetic for sync committee windows
//! - Beacon REST response types
//! - REST client for headers, blocks and sync committees

pub mod client;
pub mod timing;
pub mod types;

pub use client::ConsensusClient;
pub use timing::CommitteeWindow;
