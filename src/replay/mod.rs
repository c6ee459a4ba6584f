//! Match Replay Engine
//!
//! Deterministic event-replay-with-reconciliation for ranked match data.
//! Reconstructs every participant's time-evolving state from the match
//! timeline, keeps the snapshots worth keeping, and proves the result
//! against the authoritative end-of-match summary.
//!
//! # Architecture
//!
//! ```text
//!  Timeline (frames)                MatchSummary (ground truth)
//!        │                                  │
//!        ▼                                  │ identity + final build
//! ┌─────────────────┐                       ▼
//! │ EventNormalizer │ typed evts   ┌──────────────────┐
//! │ (per frame)     │─────────────▶│ StateAccumulator │◀── ItemRules
//! └─────────────────┘              │ (ordered fold)   │    (lifecycle)
//!                                  └────────┬─────────┘
//!                                           │ snapshot per frame
//!                                           ▼
//!                                  ┌──────────────────┐
//!                                  │ compact_snapshots│
//!                                  │ (initial/keep/   │
//!                                  │  final)          │
//!                                  └────────┬─────────┘
//!                                           │ retained sequence
//!                                           ▼
//!                              ┌──────────────────────┐
//!                              │ ConsistencyValidator │◀── MatchSummary
//!                              │ (never mutates)      │
//!                              └──────────┬───────────┘
//!                                         ▼
//!                                      Verdict
//! ```
//!
//! # Determinism Guarantees
//!
//! - **Fold order**: frames in input order, events in input order within a frame
//! - **Containers**: `BTreeMap`/`BTreeSet` everywhere state is keyed or serialized
//! - **No ambient state**: each match owns its accumulator; nothing survives a match
//! - **No clocks, no RNG, no I/O**: output is a pure function of the two inputs
//! - **Parallelism**: across matches only, never inside one timeline

pub mod accumulator;
pub mod compact;
pub mod engine;
pub mod error;
pub mod events;
pub mod item_rules;
pub mod normalize;
pub mod state;
// Raw wire formats for the two input documents
pub mod summary;
pub mod timeline;
pub mod validate;
#[cfg(test)]
mod item_rules_tests;

// Re-exports for convenience
pub use accumulator::{AccumulatorStats, StateAccumulator};
pub use compact::{compact_snapshots, CompactionStats};
pub use engine::{
    BatchReport, BatchStats, EngineConfig, MatchDocument, MatchOutcome, MatchReplay, ReplayEngine,
};
pub use error::ReplayError;
pub use events::{
    is_tracked_participant, ChampionId, Event, ItemId, Millis, MonsterType, ParticipantId, TeamId,
    TimedEvent, FIRST_PARTICIPANT, LAST_PARTICIPANT,
};
pub use item_rules::{ChampionException, ItemRules, ItemRulesConfig};
pub use normalize::{EventNormalizer, NormalizerStats};
pub use state::{
    Lane, ObjectiveCounters, ParticipantMeta, ParticipantState, SkillPoints, Snapshot, LANE_ORDER,
};
pub use summary::{MatchSummary, ParticipantSummary, SUMMONERS_RIFT_MAP_ID};
pub use timeline::{Frame, FrameCounters, Timeline};
pub use validate::{
    ConsistencyValidator, FeatureMismatch, MismatchKind, ValidationConfig, Verdict,
};
