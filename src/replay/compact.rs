//! Snapshot Compaction
//!
//! Filters the full snapshot sequence down to the frames that matter for
//! item timing: the initial snapshot, every must-keep snapshot, and the
//! final snapshot. The final one is retained regardless of its flag since
//! the validator compares it against the authoritative summary.
//!
//! Flags were already computed during the fold; this pass only filters, so
//! there is no index-shift hazard from mutating while scanning.

use crate::replay::state::Snapshot;
use serde::Serialize;
use tracing::debug;

/// Outcome counts for one compaction pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CompactionStats {
    pub input: usize,
    pub retained: usize,
    pub dropped: usize,
}

/// Retain initial, must-keep, and final snapshots; drop the rest.
pub fn compact_snapshots(snapshots: Vec<Snapshot>) -> (Vec<Snapshot>, CompactionStats) {
    let input = snapshots.len();
    if input == 0 {
        return (snapshots, CompactionStats::default());
    }

    let last = input - 1;
    let retained: Vec<Snapshot> = snapshots
        .into_iter()
        .enumerate()
        .filter(|(i, snapshot)| *i == 0 || *i == last || snapshot.must_keep)
        .map(|(_, snapshot)| snapshot)
        .collect();

    let stats = CompactionStats {
        input,
        retained: retained.len(),
        dropped: input - retained.len(),
    };
    debug!(
        input = stats.input,
        retained = stats.retained,
        dropped = stats.dropped,
        "Compacted snapshot sequence"
    );
    (retained, stats)
}
