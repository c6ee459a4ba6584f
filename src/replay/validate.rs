//! Consistency Validation
//!
//! Compares the final retained snapshot against the authoritative summary
//! and reports every disagreement, per participant and per feature. The
//! validator never corrects state; it only flags. Whether a failed verdict
//! discards the match is the caller's call.
//!
//! Scalar counters must match exactly. Item sets tolerate a small number
//! of discrepancies, counted globally across all participants, before the
//! verdict flips to fail.

use crate::replay::events::{ItemId, ParticipantId};
use crate::replay::item_rules::ItemRules;
use crate::replay::state::{ParticipantState, Snapshot};
use crate::replay::summary::{MatchSummary, ParticipantSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Validator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Item discrepancies tolerated before the verdict fails. The counter
    /// runs globally across all participants, not per participant.
    pub item_mismatch_threshold: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            item_mismatch_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MismatchKind {
    Scalar,
    Item,
}

/// One disagreeing feature for one participant.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureMismatch {
    pub participant_id: ParticipantId,
    pub champion_name: String,
    pub kind: MismatchKind,
    pub feature: &'static str,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for FeatureMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "participant {} ({}): {} expected {}, reconstructed {}",
            self.participant_id, self.champion_name, self.feature, self.expected, self.actual
        )
    }
}

/// Match-level validation outcome with full diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub passed: bool,
    pub scalar_mismatches: usize,
    pub item_mismatches: usize,
    pub mismatches: Vec<FeatureMismatch>,
}

impl Verdict {
    /// Human-readable diagnostic, one line per disagreeing feature.
    pub fn report(&self) -> String {
        if self.mismatches.is_empty() {
            return "all features reconciled".to_string();
        }
        let lines: Vec<String> = self.mismatches.iter().map(|m| format!("{}", m)).collect();
        lines.join("\n")
    }
}

/// Compares reconstructed final state to the authoritative summary.
pub struct ConsistencyValidator<'a> {
    rules: &'a ItemRules,
    config: ValidationConfig,
}

impl<'a> ConsistencyValidator<'a> {
    pub fn new(rules: &'a ItemRules, config: ValidationConfig) -> Self {
        Self { rules, config }
    }

    /// Validate one match. Collects every diagnostic rather than stopping
    /// at the first disagreement, so a failed verdict is fully explained.
    pub fn validate(&self, final_snapshot: &Snapshot, summary: &MatchSummary) -> Verdict {
        let mut mismatches = Vec::new();
        let mut scalar_mismatches = 0usize;
        let mut item_mismatches = 0usize;

        for (participant_id, expected) in &summary.participants {
            let state = match final_snapshot.participant(*participant_id) {
                Some(state) => state,
                None => {
                    scalar_mismatches += 1;
                    mismatches.push(FeatureMismatch {
                        participant_id: *participant_id,
                        champion_name: expected.champion_name.clone(),
                        kind: MismatchKind::Scalar,
                        feature: "participant",
                        expected: "present".to_string(),
                        actual: "missing".to_string(),
                    });
                    continue;
                }
            };

            scalar_mismatches += compare_scalars(expected, state, &mut mismatches);

            let skip_items = self
                .rules
                .exception_for(&expected.champion_name)
                .map(|e| e.skip_item_validation)
                .unwrap_or(false);
            if !skip_items {
                item_mismatches += self.compare_items(expected, state, &mut mismatches);
            }
        }

        let passed =
            scalar_mismatches == 0 && item_mismatches < self.config.item_mismatch_threshold;
        if !passed {
            warn!(
                scalar_mismatches,
                item_mismatches, "Replay disagrees with authoritative summary"
            );
        }
        Verdict {
            passed,
            scalar_mismatches,
            item_mismatches,
            mismatches,
        }
    }

    /// Symmetric difference between the reconstructed set and the
    /// tracked-filtered authoritative build.
    fn compare_items(
        &self,
        expected: &ParticipantSummary,
        state: &ParticipantState,
        out: &mut Vec<FeatureMismatch>,
    ) -> usize {
        let want: BTreeSet<ItemId> = expected
            .items
            .iter()
            .copied()
            .filter(|&id| self.rules.is_tracked(id))
            .collect();

        let mut count = 0;
        for &missing in want.difference(&state.items) {
            count += 1;
            out.push(FeatureMismatch {
                participant_id: expected.participant_id,
                champion_name: expected.champion_name.clone(),
                kind: MismatchKind::Item,
                feature: "items",
                expected: format!("holds {}", missing),
                actual: "absent".to_string(),
            });
        }
        for &extra in state.items.difference(&want) {
            count += 1;
            out.push(FeatureMismatch {
                participant_id: expected.participant_id,
                champion_name: expected.champion_name.clone(),
                kind: MismatchKind::Item,
                feature: "items",
                expected: "absent".to_string(),
                actual: format!("holds {}", extra),
            });
        }
        count
    }
}

fn compare_scalars(
    expected: &ParticipantSummary,
    state: &ParticipantState,
    out: &mut Vec<FeatureMismatch>,
) -> usize {
    let pairs: [(&'static str, i64, i64); 6] = [
        ("kills", expected.kills as i64, state.kills as i64),
        ("deaths", expected.deaths as i64, state.deaths as i64),
        ("assists", expected.assists as i64, state.assists as i64),
        ("goldEarned", expected.gold_earned, state.total_gold),
        ("champLevel", expected.champ_level as i64, state.level as i64),
        (
            "minionsKilled",
            expected.minions_killed as i64,
            state.minions_killed as i64,
        ),
    ];

    let mut count = 0;
    for (feature, want, got) in pairs {
        if want != got {
            count += 1;
            out.push(FeatureMismatch {
                participant_id: expected.participant_id,
                champion_name: expected.champion_name.clone(),
                kind: MismatchKind::Scalar,
                feature,
                expected: format!("{}", want),
                actual: format!("{}", got),
            });
        }
    }
    count
}
