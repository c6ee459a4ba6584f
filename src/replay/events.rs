//! Event Model
//!
//! Canonical gameplay event types for match replay. Raw timeline records are
//! parsed into one tagged variant per event kind, each carrying only the
//! fields that kind uses. Events keep their millisecond timestamp relative to
//! match start; within a frame the input order is already chronological and
//! is never re-sorted.

use serde::{Deserialize, Serialize};

/// Milliseconds since match start (timeline-relative).
pub type Millis = i64;

/// Participant slot within a match.
pub type ParticipantId = u8;

/// Item identifier from static item data.
pub type ItemId = u32;

/// Team identifier (100 = blue, 200 = red).
pub type TeamId = u16;

/// Champion identifier from static champion data.
pub type ChampionId = i32;

/// Lowest participant slot attributable to a tracked player.
pub const FIRST_PARTICIPANT: ParticipantId = 1;

/// Highest participant slot attributable to a tracked player.
pub const LAST_PARTICIPANT: ParticipantId = 10;

/// True when a raw actor id belongs to a tracked participant slot.
/// Raw records use 0 (and occasionally larger ids) for neutral/system actors.
#[inline]
pub fn is_tracked_participant(id: i64) -> bool {
    id >= FIRST_PARTICIPANT as i64 && id <= LAST_PARTICIPANT as i64
}

/// Elite monster classification from ELITE_MONSTER_KILL records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterType {
    Dragon,
    Baron,
    Herald,
    VoidGrub,
    Atakhan,
}

impl MonsterType {
    /// Map a raw `monsterType` string to a counter-backed type. Unknown
    /// strings return `None` and the record is ignored, so newly added
    /// monsters never break a replay.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "DRAGON" => Some(Self::Dragon),
            "BARON_NASHOR" => Some(Self::Baron),
            "RIFTHERALD" => Some(Self::Herald),
            "HORDE" => Some(Self::VoidGrub),
            "ATAKHAN" => Some(Self::Atakhan),
            _ => None,
        }
    }
}

/// Canonical gameplay events consumed by the state fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Participant bought an item from the shop.
    ItemPurchased {
        participant_id: ParticipantId,
        item_id: ItemId,
    },

    /// Participant sold an item back to the shop.
    ItemSold {
        participant_id: ParticipantId,
        item_id: ItemId,
    },

    /// Participant pressed undo in the shop. `before_id` is the item the
    /// undo takes away, `after_id` the item it restores; zero means no item
    /// on that side.
    ItemUndo {
        participant_id: ParticipantId,
        before_id: ItemId,
        after_id: ItemId,
    },

    /// Item consumed or transmuted by gameplay, not by a shop action.
    ItemDestroyed {
        participant_id: ParticipantId,
        item_id: ItemId,
    },

    /// A champion died. `killer_id` 0 denotes an execution with no credited
    /// killer.
    ChampionKill {
        killer_id: ParticipantId,
        victim_id: ParticipantId,
        assisting: Vec<ParticipantId>,
    },

    /// Participant put a point into an ability slot (1 = Q .. 4 = R).
    SkillLevelUp {
        participant_id: ParticipantId,
        skill_slot: u8,
    },

    /// An epic monster died to `killer_team_id`.
    EliteMonsterKill {
        killer_team_id: TeamId,
        monster: MonsterType,
    },

    /// A structure owned by `team_id` was destroyed.
    BuildingKill { team_id: TeamId },
}

impl Event {
    /// Whether this event is an item transaction, i.e. subject to the
    /// participant-range filter and the item lifecycle rules.
    #[inline]
    pub fn is_item_transaction(&self) -> bool {
        matches!(
            self,
            Event::ItemPurchased { .. }
                | Event::ItemSold { .. }
                | Event::ItemUndo { .. }
                | Event::ItemDestroyed { .. }
        )
    }

    /// The acting participant for single-actor events.
    pub fn participant_id(&self) -> Option<ParticipantId> {
        match self {
            Event::ItemPurchased { participant_id, .. }
            | Event::ItemSold { participant_id, .. }
            | Event::ItemUndo { participant_id, .. }
            | Event::ItemDestroyed { participant_id, .. }
            | Event::SkillLevelUp { participant_id, .. } => Some(*participant_id),
            _ => None,
        }
    }

    /// Short name matching the raw `type` field, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ItemPurchased { .. } => "ITEM_PURCHASED",
            Event::ItemSold { .. } => "ITEM_SOLD",
            Event::ItemUndo { .. } => "ITEM_UNDO",
            Event::ItemDestroyed { .. } => "ITEM_DESTROYED",
            Event::ChampionKill { .. } => "CHAMPION_KILL",
            Event::SkillLevelUp { .. } => "SKILL_LEVEL_UP",
            Event::EliteMonsterKill { .. } => "ELITE_MONSTER_KILL",
            Event::BuildingKill { .. } => "BUILDING_KILL",
        }
    }
}

/// Event plus its timeline timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Milliseconds since match start.
    pub timestamp: Millis,
    pub event: Event,
}

impl TimedEvent {
    #[inline]
    pub fn new(timestamp: Millis, event: Event) -> Self {
        Self { timestamp, event }
    }
}
