//! Event Normalization
//!
//! Converts one frame's raw event records into typed `TimedEvent`s.
//! Item transactions whose actor sits outside the 1..=10 participant range
//! come from neutral or system actors and are dropped (counted, never
//! errored). Unknown event types and unknown monster types are ignored so
//! new upstream record kinds cannot break a replay. A recognized type
//! missing one of its required fields is malformed input and fails the
//! whole match.
//!
//! Output preserves input order. A frame's events arrive chronologically and
//! are never re-sorted.

use crate::replay::error::ReplayError;
use crate::replay::events::{
    is_tracked_participant, Event, ItemId, Millis, MonsterType, ParticipantId, TeamId, TimedEvent,
};
use crate::replay::timeline::RawEvent;
use serde::Serialize;
use tracing::debug;

/// Running counters for one normalization pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NormalizerStats {
    /// Raw records inspected.
    pub events_seen: u64,
    /// Typed events emitted.
    pub events_emitted: u64,
    /// Item transactions dropped for an out-of-range actor.
    pub dropped_foreign_actor: u64,
    /// Records ignored for an unrecognized `type`.
    pub unknown_types: u64,
    /// Elite-monster records ignored for an unrecognized monster type.
    pub unknown_monsters: u64,
}

/// Frame-by-frame event normalizer.
#[derive(Debug, Default)]
pub struct EventNormalizer {
    stats: NormalizerStats,
}

impl EventNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &NormalizerStats {
        &self.stats
    }

    /// Reset counters for a new match.
    pub fn reset(&mut self) {
        self.stats = NormalizerStats::default();
    }

    /// Normalize one frame's raw events, preserving order.
    /// `frame_timestamp` backfills records that omit their own timestamp.
    pub fn normalize_frame(
        &mut self,
        frame_timestamp: Millis,
        raw_events: &[RawEvent],
    ) -> Result<Vec<TimedEvent>, ReplayError> {
        let mut out = Vec::with_capacity(raw_events.len());
        for raw in raw_events {
            self.stats.events_seen += 1;
            if let Some(timed) = self.normalize_one(frame_timestamp, raw)? {
                self.stats.events_emitted += 1;
                out.push(timed);
            }
        }
        Ok(out)
    }

    fn normalize_one(
        &mut self,
        frame_timestamp: Millis,
        raw: &RawEvent,
    ) -> Result<Option<TimedEvent>, ReplayError> {
        let timestamp = raw.timestamp.unwrap_or(frame_timestamp);

        let event = match raw.kind.as_str() {
            "ITEM_PURCHASED" | "ITEM_SOLD" | "ITEM_UNDO" | "ITEM_DESTROYED" => {
                let actor = require(raw.participant_id, raw, "participantId", timestamp)?;
                if !is_tracked_participant(actor) {
                    self.stats.dropped_foreign_actor += 1;
                    debug!(
                        kind = %raw.kind,
                        participant_id = actor,
                        timestamp,
                        "Dropping item transaction from non-participant actor"
                    );
                    return Ok(None);
                }
                let participant_id = actor as ParticipantId;
                match raw.kind.as_str() {
                    "ITEM_PURCHASED" => Event::ItemPurchased {
                        participant_id,
                        item_id: require(raw.item_id, raw, "itemId", timestamp)? as ItemId,
                    },
                    "ITEM_SOLD" => Event::ItemSold {
                        participant_id,
                        item_id: require(raw.item_id, raw, "itemId", timestamp)? as ItemId,
                    },
                    "ITEM_UNDO" => Event::ItemUndo {
                        participant_id,
                        before_id: raw.before_id.unwrap_or(0) as ItemId,
                        after_id: raw.after_id.unwrap_or(0) as ItemId,
                    },
                    _ => Event::ItemDestroyed {
                        participant_id,
                        item_id: require(raw.item_id, raw, "itemId", timestamp)? as ItemId,
                    },
                }
            }

            "CHAMPION_KILL" => Event::ChampionKill {
                killer_id: require(raw.killer_id, raw, "killerId", timestamp)? as ParticipantId,
                victim_id: require(raw.victim_id, raw, "victimId", timestamp)? as ParticipantId,
                assisting: raw
                    .assisting_participant_ids
                    .iter()
                    .map(|&a| a as ParticipantId)
                    .collect(),
            },

            "SKILL_LEVEL_UP" => Event::SkillLevelUp {
                participant_id: require(raw.participant_id, raw, "participantId", timestamp)?
                    as ParticipantId,
                skill_slot: require(raw.skill_slot, raw, "skillSlot", timestamp)? as u8,
            },

            "ELITE_MONSTER_KILL" => {
                let killer_team_id =
                    require(raw.killer_team_id, raw, "killerTeamId", timestamp)? as TeamId;
                let raw_monster = raw.monster_type.as_deref().ok_or_else(|| {
                    ReplayError::MalformedEvent {
                        kind: raw.kind.clone(),
                        field: "monsterType",
                        timestamp,
                    }
                })?;
                match MonsterType::from_raw(raw_monster) {
                    Some(monster) => Event::EliteMonsterKill {
                        killer_team_id,
                        monster,
                    },
                    None => {
                        self.stats.unknown_monsters += 1;
                        debug!(
                            monster = %raw_monster,
                            timestamp,
                            "Ignoring unrecognized elite monster type"
                        );
                        return Ok(None);
                    }
                }
            }

            "BUILDING_KILL" => Event::BuildingKill {
                team_id: require(raw.team_id, raw, "teamId", timestamp)? as TeamId,
            },

            other => {
                self.stats.unknown_types += 1;
                debug!(kind = %other, timestamp, "Ignoring unrecognized event type");
                return Ok(None);
            }
        };

        Ok(Some(TimedEvent::new(timestamp, event)))
    }
}

fn require(
    value: Option<i64>,
    raw: &RawEvent,
    field: &'static str,
    timestamp: Millis,
) -> Result<i64, ReplayError> {
    value.ok_or_else(|| ReplayError::MalformedEvent {
        kind: raw.kind.clone(),
        field,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: &str) -> RawEvent {
        RawEvent {
            kind: kind.to_string(),
            timestamp: Some(1_000),
            participant_id: None,
            item_id: None,
            before_id: None,
            after_id: None,
            killer_id: None,
            victim_id: None,
            assisting_participant_ids: Vec::new(),
            skill_slot: None,
            monster_type: None,
            killer_team_id: None,
            team_id: None,
        }
    }

    #[test]
    fn test_purchase_normalizes() {
        let mut normalizer = EventNormalizer::new();
        let mut record = raw("ITEM_PURCHASED");
        record.participant_id = Some(3);
        record.item_id = Some(3031);

        let events = normalizer.normalize_frame(0, &[record]).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, 1_000);
        assert_eq!(
            events[0].event,
            Event::ItemPurchased {
                participant_id: 3,
                item_id: 3031
            }
        );
        assert_eq!(normalizer.stats().events_emitted, 1);
    }

    #[test]
    fn test_foreign_actor_dropped_for_item_events_only() {
        let mut normalizer = EventNormalizer::new();

        let mut purchase = raw("ITEM_PURCHASED");
        purchase.participant_id = Some(0);
        purchase.item_id = Some(3031);

        // Executions keep killer 0; kill events are never range-filtered.
        let mut kill = raw("CHAMPION_KILL");
        kill.killer_id = Some(0);
        kill.victim_id = Some(7);

        let events = normalizer.normalize_frame(0, &[purchase, kill]).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].event,
            Event::ChampionKill {
                killer_id: 0,
                victim_id: 7,
                assisting: vec![]
            }
        );
        assert_eq!(normalizer.stats().dropped_foreign_actor, 1);
    }

    #[test]
    fn test_unknown_type_ignored_and_counted() {
        let mut normalizer = EventNormalizer::new();
        let events = normalizer
            .normalize_frame(0, &[raw("WARD_PLACED"), raw("PAUSE_END")])
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(normalizer.stats().unknown_types, 2);
        assert_eq!(normalizer.stats().events_seen, 2);

        normalizer.reset();
        assert_eq!(normalizer.stats().events_seen, 0);
        assert_eq!(normalizer.stats().unknown_types, 0);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let mut normalizer = EventNormalizer::new();
        let mut record = raw("ITEM_PURCHASED");
        record.participant_id = Some(3);
        // itemId deliberately absent

        let result = normalizer.normalize_frame(0, &[record]);
        match result {
            Err(ReplayError::MalformedEvent { kind, field, .. }) => {
                assert_eq!(kind, "ITEM_PURCHASED");
                assert_eq!(field, "itemId");
            }
            other => panic!("expected MalformedEvent, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_monster_ignored() {
        let mut normalizer = EventNormalizer::new();
        let mut record = raw("ELITE_MONSTER_KILL");
        record.killer_team_id = Some(100);
        record.monster_type = Some("SPACE_WHALE".to_string());

        let events = normalizer.normalize_frame(0, &[record]).unwrap();
        assert!(events.is_empty());
        assert_eq!(normalizer.stats().unknown_monsters, 1);
    }

    #[test]
    fn test_undo_defaults_missing_sides_to_zero() {
        let mut normalizer = EventNormalizer::new();
        let mut record = raw("ITEM_UNDO");
        record.participant_id = Some(5);
        record.before_id = Some(3003);

        let events = normalizer.normalize_frame(0, &[record]).unwrap();
        assert_eq!(
            events[0].event,
            Event::ItemUndo {
                participant_id: 5,
                before_id: 3003,
                after_id: 0
            }
        );
    }

    #[test]
    fn test_order_preserved_and_timestamp_backfilled() {
        let mut normalizer = EventNormalizer::new();

        let mut first = raw("SKILL_LEVEL_UP");
        first.participant_id = Some(1);
        first.skill_slot = Some(1);
        first.timestamp = None; // backfilled from the frame

        let mut second = raw("ITEM_PURCHASED");
        second.participant_id = Some(1);
        second.item_id = Some(1055);
        second.timestamp = Some(59_999);

        let events = normalizer.normalize_frame(60_000, &[first, second]).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, 60_000);
        assert!(matches!(events[0].event, Event::SkillLevelUp { .. }));
        assert_eq!(events[1].timestamp, 59_999);
        assert!(matches!(events[1].event, Event::ItemPurchased { .. }));
    }
}
