//! Rift Replay Library
//!
//! Deterministic reconstruction of per-participant match state from
//! timeline events, validated against the authoritative end-of-match
//! summary. Fetching, persistence, and aggregation live with callers;
//! this crate takes two JSON documents and an item catalog and produces
//! compacted snapshots plus a validation verdict.

pub mod catalog;
pub mod replay;

// Re-export the common entry points at crate root
pub use catalog::{CatalogError, ItemCatalog, ItemEntry};
pub use replay::{
    EngineConfig, ItemRules, ItemRulesConfig, MatchDocument, MatchReplay, MatchSummary,
    ReplayEngine, ReplayError, Snapshot, Timeline, ValidationConfig, Verdict,
};
