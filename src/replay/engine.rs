//! Replay Engine
//!
//! Ties the stages together for one match: normalize each frame's events,
//! fold them through the accumulator, compact the snapshot sequence, then
//! validate the final state against the authoritative summary. Every run
//! owns its state outright, so batches fan out across matches with rayon
//! while each match stays strictly sequential inside.

use crate::catalog::ItemCatalog;
use crate::replay::accumulator::{AccumulatorStats, StateAccumulator};
use crate::replay::compact::{compact_snapshots, CompactionStats};
use crate::replay::error::ReplayError;
use crate::replay::item_rules::ItemRules;
use crate::replay::normalize::{EventNormalizer, NormalizerStats};
use crate::replay::state::Snapshot;
use crate::replay::summary::{MatchSummary, SUMMONERS_RIFT_MAP_ID};
use crate::replay::timeline::Timeline;
use crate::replay::validate::{ConsistencyValidator, ValidationConfig, Verdict};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Validator thresholds.
    pub validation: ValidationConfig,
    /// Treat a failed verdict as a fatal error instead of a flag.
    pub hard_validation_gate: bool,
    /// Reject matches whose map id is present and not Summoner's Rift.
    pub require_classic_rift: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validation: ValidationConfig::default(),
            hard_validation_gate: false,
            require_classic_rift: true,
        }
    }
}

/// Serializable replay output for one match: the compacted snapshot
/// sequence plus enough metadata to key and date the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDocument {
    pub match_id: Option<String>,
    pub game_creation: Option<DateTime<Utc>>,
    pub game_duration_secs: Option<i64>,
    pub game_version: Option<String>,
    pub snapshots: Vec<Snapshot>,
}

/// Full result of replaying one match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReplay {
    pub document: MatchDocument,
    pub verdict: Verdict,
    pub normalizer: NormalizerStats,
    pub accumulator: AccumulatorStats,
    pub compaction: CompactionStats,
}

/// Batch roll-up counts.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BatchStats {
    pub total: usize,
    /// Replayed and validated clean.
    pub passed: usize,
    /// Replayed but the verdict failed.
    pub flagged: usize,
    /// Aborted by a fatal per-match error.
    pub skipped: usize,
}

/// One match's outcome within a batch.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub match_id: Option<String>,
    pub result: Result<MatchReplay, ReplayError>,
}

#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<MatchOutcome>,
    pub stats: BatchStats,
}

/// Per-process replay engine. Holds only immutable configuration, so one
/// instance serves any number of concurrent matches.
pub struct ReplayEngine {
    rules: ItemRules,
    config: EngineConfig,
}

impl ReplayEngine {
    pub fn new(rules: ItemRules, config: EngineConfig) -> Self {
        Self { rules, config }
    }

    pub fn with_defaults(catalog: ItemCatalog) -> Self {
        Self::new(ItemRules::with_defaults(catalog), EngineConfig::default())
    }

    pub fn rules(&self) -> &ItemRules {
        &self.rules
    }

    /// Replay one match end to end. A fatal error aborts only this match.
    pub fn replay_match(
        &self,
        timeline: &Timeline,
        summary: &MatchSummary,
    ) -> Result<MatchReplay, ReplayError> {
        if self.config.require_classic_rift {
            // A summary without a map id still replays; only a known
            // foreign map is rejected.
            if let Some(map_id) = summary.map_id {
                if map_id != SUMMONERS_RIFT_MAP_ID {
                    return Err(ReplayError::UnsupportedMap { map_id });
                }
            }
        }

        let mut normalizer = EventNormalizer::new();
        let mut accumulator = StateAccumulator::new(&self.rules, summary.metas());
        for frame in &timeline.frames {
            let events = normalizer.normalize_frame(frame.timestamp, &frame.events)?;
            accumulator.apply_frame(frame, &events)?;
        }

        let accumulator_stats = *accumulator.stats();
        let (retained, compaction) = compact_snapshots(accumulator.finish());

        let final_snapshot = retained
            .last()
            .expect("snapshot sequence always contains the initial snapshot");
        let validator = ConsistencyValidator::new(&self.rules, self.config.validation.clone());
        let verdict = validator.validate(final_snapshot, summary);

        if self.config.hard_validation_gate && !verdict.passed {
            return Err(ReplayError::ValidationRejected {
                mismatches: verdict.mismatches.len(),
                report: verdict.report(),
            });
        }

        debug!(
            match_id = ?summary.match_id,
            frames = accumulator_stats.frames_folded,
            retained = compaction.retained,
            passed = verdict.passed,
            "Replayed match"
        );

        let document = MatchDocument {
            match_id: summary
                .match_id
                .clone()
                .or_else(|| timeline.match_id.clone()),
            game_creation: summary.game_creation_utc(),
            game_duration_secs: summary.game_duration_secs,
            game_version: summary.game_version.clone(),
            snapshots: retained,
        };
        Ok(MatchReplay {
            document,
            verdict,
            normalizer: *normalizer.stats(),
            accumulator: accumulator_stats,
            compaction,
        })
    }

    /// Convenience entry point from raw JSON documents.
    pub fn replay_json(
        &self,
        timeline_json: &str,
        summary_json: &str,
    ) -> Result<MatchReplay, ReplayError> {
        let timeline = Timeline::from_json_str(timeline_json)?;
        let summary = MatchSummary::from_json_str(summary_json)?;
        self.replay_match(&timeline, &summary)
    }

    /// Replay many matches in parallel. Matches are independent; a fatal
    /// error skips that match and never aborts the batch. Output order
    /// matches input order.
    pub fn replay_batch(&self, inputs: &[(Timeline, MatchSummary)]) -> BatchReport {
        let outcomes: Vec<MatchOutcome> = inputs
            .par_iter()
            .map(|(timeline, summary)| {
                let match_id = summary
                    .match_id
                    .clone()
                    .or_else(|| timeline.match_id.clone());
                let result = self.replay_match(timeline, summary);
                if let Err(e) = &result {
                    warn!(match_id = ?match_id, error = %e, "Skipping match");
                }
                MatchOutcome { match_id, result }
            })
            .collect();

        let mut stats = BatchStats {
            total: outcomes.len(),
            ..BatchStats::default()
        };
        for outcome in &outcomes {
            match &outcome.result {
                Ok(replay) if replay.verdict.passed => stats.passed += 1,
                Ok(_) => stats.flagged += 1,
                Err(_) => stats.skipped += 1,
            }
        }
        info!(
            total = stats.total,
            passed = stats.passed,
            flagged = stats.flagged,
            skipped = stats.skipped,
            "Replayed match batch"
        );
        BatchReport { outcomes, stats }
    }
}
