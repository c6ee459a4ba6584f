//! Authoritative Match Summary
//!
//! Parses the end-of-match result document into typed per-participant
//! records. This is the ground truth the validator compares against; the
//! fold never reads from it except to seed identity fields and the final
//! build used by the support-quest rule.
//!
//! Parsing is permissive on match metadata and strict on the participant
//! stats the validator needs. A participant record missing a stat field is
//! malformed input and fails the match.

use crate::replay::error::ReplayError;
use crate::replay::events::{ChampionId, ItemId, ParticipantId, TeamId};
use crate::replay::state::{Lane, ParticipantMeta};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map id for classic Summoner's Rift.
pub const SUMMONERS_RIFT_MAP_ID: i32 = 11;

// ============================================================================
// RAW WIRE FORMAT
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    #[serde(default)]
    pub metadata: Option<RawMatchMetadata>,
    pub info: RawMatchInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchMetadata {
    #[serde(default)]
    pub match_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchInfo {
    #[serde(default)]
    pub game_creation: Option<i64>,
    #[serde(default)]
    pub game_duration: Option<i64>,
    #[serde(default)]
    pub game_version: Option<String>,
    #[serde(default)]
    pub map_id: Option<i32>,
    #[serde(default)]
    pub queue_id: Option<i32>,
    #[serde(default)]
    pub platform_id: Option<String>,
    pub participants: Vec<RawParticipant>,
}

/// One participant's final stats. Stat fields are required; absence means
/// the document is unusable for validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParticipant {
    pub participant_id: i64,
    #[serde(default)]
    pub puuid: Option<String>,
    pub champion_id: ChampionId,
    pub champion_name: String,
    pub team_id: i64,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub gold_earned: i64,
    pub champ_level: u32,
    pub total_minions_killed: u32,
    pub neutral_minions_killed: u32,
    #[serde(default)]
    pub individual_position: Option<String>,
    #[serde(default)]
    pub perks: Option<serde_json::Value>,
    #[serde(default)]
    pub item0: ItemId,
    #[serde(default)]
    pub item1: ItemId,
    #[serde(default)]
    pub item2: ItemId,
    #[serde(default)]
    pub item3: ItemId,
    #[serde(default)]
    pub item4: ItemId,
    #[serde(default)]
    pub item5: ItemId,
    #[serde(default)]
    pub item6: ItemId,
}

// ============================================================================
// TYPED SUMMARY
// ============================================================================

/// Final reported stats and identity for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant_id: ParticipantId,
    pub puuid: Option<String>,
    pub champion_id: ChampionId,
    pub champion_name: String,
    pub team_id: TeamId,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub gold_earned: i64,
    pub champ_level: u32,
    /// Lane plus jungle creeps combined, matching the replay counter.
    pub minions_killed: u32,
    pub lane: Lane,
    /// Ranked tier, absent until merged from player data.
    pub tier: Option<String>,
    /// Account origin tag, absent until merged from player data.
    pub origin: Option<String>,
    pub perks: Option<serde_json::Value>,
    /// Final build slots with empty slots (id 0) removed. Untracked items
    /// are still present here; the validator filters.
    pub items: Vec<ItemId>,
}

impl ParticipantSummary {
    fn from_raw(raw: RawParticipant) -> Self {
        let items = [
            raw.item0, raw.item1, raw.item2, raw.item3, raw.item4, raw.item5, raw.item6,
        ]
        .into_iter()
        .filter(|&id| id != 0)
        .collect();
        let lane = match raw.individual_position.as_deref() {
            Some(position) => Lane::from_raw(position),
            None => Lane::Invalid,
        };
        Self {
            participant_id: raw.participant_id as ParticipantId,
            puuid: raw.puuid,
            champion_id: raw.champion_id,
            champion_name: raw.champion_name,
            team_id: raw.team_id as TeamId,
            win: raw.win,
            kills: raw.kills,
            deaths: raw.deaths,
            assists: raw.assists,
            gold_earned: raw.gold_earned,
            champ_level: raw.champ_level,
            minions_killed: raw.total_minions_killed + raw.neutral_minions_killed,
            lane,
            tier: None,
            origin: None,
            perks: raw.perks,
            items,
        }
    }

    /// Identity fields for seeding the fold. `final_items` feeds the
    /// support-quest rule.
    pub fn meta(&self) -> ParticipantMeta {
        ParticipantMeta {
            participant_id: self.participant_id,
            puuid: self.puuid.clone(),
            champion_id: self.champion_id,
            champion_name: self.champion_name.clone(),
            team_id: self.team_id,
            lane: self.lane,
            tier: self.tier.clone(),
            origin: self.origin.clone(),
            perks: self.perks.clone(),
            final_items: self.items.clone(),
        }
    }
}

/// The whole authoritative summary for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: Option<String>,
    pub map_id: Option<i32>,
    pub queue_id: Option<i32>,
    pub platform_id: Option<String>,
    pub game_creation_ms: Option<i64>,
    pub game_duration_secs: Option<i64>,
    pub game_version: Option<String>,
    pub participants: BTreeMap<ParticipantId, ParticipantSummary>,
}

impl MatchSummary {
    pub fn from_json_str(json: &str) -> Result<Self, ReplayError> {
        let raw: RawMatch = serde_json::from_str(json).map_err(|e| ReplayError::SummaryJson {
            detail: format!("{}", e),
        })?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: RawMatch) -> Self {
        let participants = raw
            .info
            .participants
            .into_iter()
            .map(ParticipantSummary::from_raw)
            .map(|p| (p.participant_id, p))
            .collect();
        Self {
            match_id: raw.metadata.and_then(|m| m.match_id),
            map_id: raw.info.map_id,
            queue_id: raw.info.queue_id,
            platform_id: raw.info.platform_id,
            game_creation_ms: raw.info.game_creation,
            game_duration_secs: raw.info.game_duration,
            game_version: raw.info.game_version,
            participants,
        }
    }

    /// True only when the map id is known and is classic Summoner's Rift.
    pub fn is_classic_rift(&self) -> bool {
        self.map_id == Some(SUMMONERS_RIFT_MAP_ID)
    }

    pub fn game_creation_utc(&self) -> Option<DateTime<Utc>> {
        let ms = self.game_creation_ms?;
        Utc.timestamp_millis_opt(ms).single()
    }

    /// Attach ranked tier and origin to the participant with `puuid`.
    /// Returns false when no participant matches.
    pub fn merge_player_info(
        &mut self,
        puuid: &str,
        tier: Option<&str>,
        origin: Option<&str>,
    ) -> bool {
        for participant in self.participants.values_mut() {
            if participant.puuid.as_deref() == Some(puuid) {
                participant.tier = tier.map(|t| t.to_string());
                participant.origin = origin.map(|o| o.to_string());
                return true;
            }
        }
        false
    }

    /// One team's participants in lane order, top through support.
    pub fn participants_by_lane(&self, team_id: TeamId) -> Vec<&ParticipantSummary> {
        let mut members: Vec<&ParticipantSummary> = self
            .participants
            .values()
            .filter(|p| p.team_id == team_id)
            .collect();
        members.sort_by_key(|p| (p.lane.sort_index(), p.participant_id));
        members
    }

    /// Identity records for all participants, in participant-id order.
    pub fn metas(&self) -> Vec<ParticipantMeta> {
        self.participants.values().map(|p| p.meta()).collect()
    }
}
