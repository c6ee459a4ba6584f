//! State Accumulation
//!
//! Folds normalized events frame by frame into per-participant state and
//! freezes a `Snapshot` after every frame. Each frame first overwrites
//! gold, level, and minion counts from the frame's authoritative counters,
//! then replays the frame's events in input order. Nothing here looks at a
//! later frame; every snapshot is a pure function of what came before it.
//!
//! A frame is flagged must-keep only when an item transaction genuinely
//! changed a tracked item set. Kills, skill-ups, and objectives in the same
//! frame do not set the flag.

use crate::replay::error::ReplayError;
use crate::replay::events::{Event, ParticipantId, TimedEvent};
use crate::replay::item_rules::ItemRules;
use crate::replay::state::{ParticipantMeta, ParticipantState, Snapshot};
use crate::replay::timeline::Frame;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Counters for one match's fold.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AccumulatorStats {
    pub frames_folded: u64,
    pub events_applied: u64,
    /// Item transactions whose actor had no state row.
    pub unmatched_actors: u64,
    /// Events that actually changed a tracked item set.
    pub item_set_changes: u64,
}

/// Chronological fold over one match's frames.
///
/// Owns all mutable per-match state. Nothing is shared across matches,
/// which is what makes cross-match batches embarrassingly parallel.
pub struct StateAccumulator<'a> {
    rules: &'a ItemRules,
    states: BTreeMap<ParticipantId, ParticipantState>,
    snapshots: Vec<Snapshot>,
    stats: AccumulatorStats,
}

impl<'a> StateAccumulator<'a> {
    /// Seed zeroed state for every participant and record the synthetic
    /// initial snapshot.
    pub fn new(rules: &'a ItemRules, metas: Vec<ParticipantMeta>) -> Self {
        let initial = Snapshot::initial(metas);
        let states = initial.participants.clone();
        Self {
            rules,
            states,
            snapshots: vec![initial],
            stats: AccumulatorStats::default(),
        }
    }

    pub fn stats(&self) -> &AccumulatorStats {
        &self.stats
    }

    /// Fold one frame: overwrite authoritative counters, replay its events,
    /// freeze a snapshot. Frames must arrive in ascending timestamp order.
    pub fn apply_frame(
        &mut self,
        frame: &Frame,
        events: &[TimedEvent],
    ) -> Result<(), ReplayError> {
        for (participant_id, state) in self.states.iter_mut() {
            let counters = frame.counters.get(participant_id).ok_or(
                ReplayError::MissingParticipantFrame {
                    participant_id: *participant_id,
                    timestamp: frame.timestamp,
                },
            )?;
            state.current_gold = counters.current_gold;
            state.total_gold = counters.total_gold;
            state.level = counters.level;
            state.minions_killed = counters.minions_total();
        }

        let mut must_keep = false;
        for timed in events {
            self.stats.events_applied += 1;
            must_keep |= self.apply_event(&timed.event);
        }

        self.snapshots.push(Snapshot {
            timestamp: frame.timestamp,
            must_keep,
            participants: self.states.clone(),
        });
        self.stats.frames_folded += 1;
        Ok(())
    }

    /// Consume the fold and return the full snapshot sequence, initial
    /// snapshot first.
    pub fn finish(self) -> Vec<Snapshot> {
        self.snapshots
    }

    /// Returns true when the event changed a tracked item set.
    fn apply_event(&mut self, event: &Event) -> bool {
        match event {
            Event::ItemPurchased { participant_id, .. }
            | Event::ItemSold { participant_id, .. }
            | Event::ItemUndo { participant_id, .. }
            | Event::ItemDestroyed { participant_id, .. } => {
                match self.states.get_mut(participant_id) {
                    Some(state) => {
                        let changed = self.rules.apply(state, event);
                        if changed {
                            self.stats.item_set_changes += 1;
                        }
                        changed
                    }
                    None => {
                        self.stats.unmatched_actors += 1;
                        debug!(
                            kind = event.kind(),
                            participant_id = *participant_id,
                            "Item transaction for participant without a state row"
                        );
                        false
                    }
                }
            }

            Event::ChampionKill {
                killer_id,
                victim_id,
                assisting,
            } => {
                // Killer 0 is an execution; no row exists so no kill lands.
                if let Some(killer) = self.states.get_mut(killer_id) {
                    killer.kills += 1;
                }
                if let Some(victim) = self.states.get_mut(victim_id) {
                    victim.deaths += 1;
                }
                for assist_id in assisting {
                    if let Some(assistant) = self.states.get_mut(assist_id) {
                        assistant.assists += 1;
                    }
                }
                false
            }

            Event::SkillLevelUp {
                participant_id,
                skill_slot,
            } => {
                if let Some(state) = self.states.get_mut(participant_id) {
                    state.skills.level_up(*skill_slot);
                }
                false
            }

            Event::EliteMonsterKill {
                killer_team_id,
                monster,
            } => {
                // Epic monsters credit the whole killing team.
                for state in self.states.values_mut() {
                    if state.meta.team_id == *killer_team_id {
                        state.objectives.increment(*monster);
                    }
                }
                false
            }

            Event::BuildingKill { team_id } => {
                // The event carries the owning team; credit the opposite side.
                for state in self.states.values_mut() {
                    if state.meta.team_id != *team_id {
                        state.structures_killed += 1;
                    }
                }
                false
            }
        }
    }
}
