//! Participant State
//!
//! The mutable per-participant record the accumulator folds events into,
//! plus the immutable `Snapshot` type that freezes all ten records at a
//! frame boundary. Identity fields (`ParticipantMeta`) are set once from
//! the end-of-match summary and never touched by the fold; everything else
//! starts at zero and only moves through `apply_frame`.
//!
//! Containers are ordered (`BTreeMap`, `BTreeSet`) so serialized snapshots
//! are byte-stable across runs.

use crate::replay::events::{ChampionId, ItemId, Millis, MonsterType, ParticipantId, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// LANES
// ============================================================================

/// Assigned position on Summoner's Rift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lane {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility,
    /// Position the upstream data could not determine.
    Invalid,
}

/// Display order for a team's five positions, top to support.
pub const LANE_ORDER: [Lane; 5] = [
    Lane::Top,
    Lane::Jungle,
    Lane::Middle,
    Lane::Bottom,
    Lane::Utility,
];

impl Lane {
    /// Parse the `individualPosition` field. Unknown strings map to
    /// `Invalid`, matching the upstream sentinel.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "TOP" => Lane::Top,
            "JUNGLE" => Lane::Jungle,
            "MIDDLE" => Lane::Middle,
            "BOTTOM" => Lane::Bottom,
            "UTILITY" => Lane::Utility,
            _ => Lane::Invalid,
        }
    }

    /// Index into `LANE_ORDER`; `Invalid` sorts last.
    pub fn sort_index(&self) -> usize {
        match self {
            Lane::Top => 0,
            Lane::Jungle => 1,
            Lane::Middle => 2,
            Lane::Bottom => 3,
            Lane::Utility => 4,
            Lane::Invalid => 5,
        }
    }
}

// ============================================================================
// SKILLS AND OBJECTIVES
// ============================================================================

/// Points spent per ability slot (Q/W/E/R as slots 1..=4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPoints {
    pub points: [u32; 4],
}

impl SkillPoints {
    /// Record one point in `slot`. Slots outside 1..=4 are ignored.
    pub fn level_up(&mut self, slot: u8) {
        if let Some(p) = self.points.get_mut(slot.wrapping_sub(1) as usize) {
            *p += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.points.iter().sum()
    }
}

/// Team-wide epic monster credit, mirrored onto every member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveCounters {
    pub dragons: u32,
    pub barons: u32,
    pub heralds: u32,
    pub void_grubs: u32,
    pub atakhans: u32,
}

impl ObjectiveCounters {
    pub fn increment(&mut self, monster: MonsterType) {
        match monster {
            MonsterType::Dragon => self.dragons += 1,
            MonsterType::Baron => self.barons += 1,
            MonsterType::Herald => self.heralds += 1,
            MonsterType::VoidGrub => self.void_grubs += 1,
            MonsterType::Atakhan => self.atakhans += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.dragons + self.barons + self.heralds + self.void_grubs + self.atakhans
    }
}

// ============================================================================
// PARTICIPANT STATE
// ============================================================================

/// Identity fields for one participant, fixed for the whole match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantMeta {
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub puuid: Option<String>,
    pub champion_id: ChampionId,
    pub champion_name: String,
    pub team_id: TeamId,
    pub lane: Lane,
    /// Ranked tier, filled in after the fact when player data is merged.
    #[serde(default)]
    pub tier: Option<String>,
    /// Player region or account origin, merged alongside `tier`.
    #[serde(default)]
    pub origin: Option<String>,
    /// Rune page selection, kept opaque.
    #[serde(default)]
    pub perks: Option<serde_json::Value>,
    /// Final inventory from the summary, used to gate support completions.
    #[serde(default)]
    pub final_items: Vec<ItemId>,
}

/// Everything known about one participant at a point in time.
///
/// `items` holds tracked items only; component churn is filtered out by the
/// item rules before it reaches this set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantState {
    pub meta: ParticipantMeta,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub items: BTreeSet<ItemId>,
    pub skills: SkillPoints,
    /// Spendable gold, overwritten from each frame.
    pub current_gold: i64,
    /// Cumulative gold earned, overwritten from each frame.
    pub total_gold: i64,
    pub level: u32,
    /// Lane plus jungle creeps combined.
    pub minions_killed: u32,
    pub objectives: ObjectiveCounters,
    /// Enemy structures destroyed, credited team-wide.
    pub structures_killed: u32,
}

impl ParticipantState {
    /// Zeroed state at match start. Level starts at 0 and is corrected by
    /// the first frame overwrite.
    pub fn new(meta: ParticipantMeta) -> Self {
        Self {
            meta,
            kills: 0,
            deaths: 0,
            assists: 0,
            items: BTreeSet::new(),
            skills: SkillPoints::default(),
            current_gold: 0,
            total_gold: 0,
            level: 0,
            minions_killed: 0,
            objectives: ObjectiveCounters::default(),
            structures_killed: 0,
        }
    }
}

// ============================================================================
// SNAPSHOTS
// ============================================================================

/// All participant states frozen at one frame boundary.
///
/// Snapshots live in a `Vec`, not a timestamp-keyed map: the synthetic
/// initial snapshot and a real frame can share timestamp 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: Millis,
    /// True when a tracked item set changed during this frame. Compaction
    /// never drops a flagged snapshot.
    pub must_keep: bool,
    pub participants: BTreeMap<ParticipantId, ParticipantState>,
}

impl Snapshot {
    /// Synthetic pre-game snapshot with all counters at zero.
    pub fn initial(metas: Vec<ParticipantMeta>) -> Self {
        let participants = metas
            .into_iter()
            .map(|meta| (meta.participant_id, ParticipantState::new(meta)))
            .collect();
        Self {
            timestamp: 0,
            must_keep: false,
            participants,
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&ParticipantState> {
        self.participants.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: ParticipantId) -> ParticipantMeta {
        ParticipantMeta {
            participant_id: id,
            puuid: None,
            champion_id: 266,
            champion_name: "Aatrox".to_string(),
            team_id: 100,
            lane: Lane::Top,
            tier: None,
            origin: None,
            perks: None,
            final_items: Vec::new(),
        }
    }

    #[test]
    fn test_lane_round_trip_and_sentinel() {
        assert_eq!(Lane::from_raw("JUNGLE"), Lane::Jungle);
        assert_eq!(Lane::from_raw("Invalid"), Lane::Invalid);
        assert_eq!(Lane::from_raw("ARAM_NONSENSE"), Lane::Invalid);
        for (i, lane) in LANE_ORDER.iter().enumerate() {
            assert_eq!(lane.sort_index(), i);
        }
        assert_eq!(Lane::Invalid.sort_index(), 5);
    }

    #[test]
    fn test_skill_points_ignore_bad_slots() {
        let mut skills = SkillPoints::default();
        skills.level_up(1);
        skills.level_up(4);
        skills.level_up(0);
        skills.level_up(9);
        assert_eq!(skills.points, [1, 0, 0, 1]);
        assert_eq!(skills.total(), 2);
    }

    #[test]
    fn test_objective_counters_cover_all_monsters() {
        let mut objectives = ObjectiveCounters::default();
        for monster in [
            MonsterType::Dragon,
            MonsterType::Baron,
            MonsterType::Herald,
            MonsterType::VoidGrub,
            MonsterType::Atakhan,
        ] {
            objectives.increment(monster);
        }
        assert_eq!(objectives.total(), 5);
        assert_eq!(objectives.dragons, 1);
        assert_eq!(objectives.atakhans, 1);
    }

    #[test]
    fn test_initial_snapshot_is_zeroed() {
        let snapshot = Snapshot::initial(vec![meta(1), meta(2)]);
        assert_eq!(snapshot.timestamp, 0);
        assert!(!snapshot.must_keep);
        assert_eq!(snapshot.participants.len(), 2);
        let p1 = snapshot.participant(1).unwrap();
        assert_eq!(p1.kills, 0);
        assert_eq!(p1.total_gold, 0);
        assert!(p1.items.is_empty());
        assert!(snapshot.participant(3).is_none());
    }
}
