//! Timeline Documents
//!
//! Serde mirror of the match-v5 timeline payload and its conversion to the
//! typed `Timeline`/`Frame` the fold consumes. The raw event layer is
//! permissive (every payload field optional, string-keyed counter maps); the
//! typed layer is strict and fails the match on anything the fold cannot
//! work with.

use crate::replay::error::ReplayError;
use crate::replay::events::{Millis, ParticipantId};
use serde::Deserialize;
use std::collections::BTreeMap;

// ============================================================================
// RAW LAYER
// ============================================================================

/// Raw timeline document: `{ metadata: { matchId }, info: { frames } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimeline {
    #[serde(default)]
    pub metadata: Option<RawTimelineMetadata>,
    pub info: RawTimelineInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimelineMetadata {
    #[serde(default)]
    pub match_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimelineInfo {
    /// Milliseconds between frames as reported by the document.
    #[serde(default)]
    pub frame_interval: Option<i64>,
    pub frames: Vec<RawFrame>,
}

/// One raw frame: counters keyed by participant id as a string, plus the
/// frame's event records. All three keys are required; a frame without them
/// is malformed and fails the whole document parse.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFrame {
    pub timestamp: Millis,
    pub participant_frames: BTreeMap<String, RawParticipantFrame>,
    pub events: Vec<RawEvent>,
}

/// Raw per-participant counters captured upstream independently of the event
/// stream. Required fields: their absence is a data defect, not a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParticipantFrame {
    pub total_gold: i64,
    pub current_gold: i64,
    pub level: u32,
    pub minions_killed: u32,
    pub jungle_minions_killed: u32,
}

/// One raw event record. Everything except `type` is optional here; the
/// normalizer enforces per-kind field requirements.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: Option<Millis>,
    #[serde(default)]
    pub participant_id: Option<i64>,
    #[serde(default)]
    pub item_id: Option<i64>,
    #[serde(default)]
    pub before_id: Option<i64>,
    #[serde(default)]
    pub after_id: Option<i64>,
    #[serde(default)]
    pub killer_id: Option<i64>,
    #[serde(default)]
    pub victim_id: Option<i64>,
    #[serde(default)]
    pub assisting_participant_ids: Vec<i64>,
    #[serde(default)]
    pub skill_slot: Option<i64>,
    #[serde(default)]
    pub monster_type: Option<String>,
    #[serde(default)]
    pub killer_team_id: Option<i64>,
    #[serde(default)]
    pub team_id: Option<i64>,
}

// ============================================================================
// TYPED LAYER
// ============================================================================

/// Authoritative per-frame counters for one participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounters {
    pub total_gold: i64,
    pub current_gold: i64,
    pub level: u32,
    pub minions_killed: u32,
    pub jungle_minions_killed: u32,
}

impl FrameCounters {
    /// Lane plus jungle minions, the figure the replay tracks.
    #[inline]
    pub fn minions_total(&self) -> u32 {
        self.minions_killed + self.jungle_minions_killed
    }
}

/// One typed frame: counters per participant plus that frame's raw events.
#[derive(Debug, Clone)]
pub struct Frame {
    pub timestamp: Millis,
    pub counters: BTreeMap<ParticipantId, FrameCounters>,
    pub events: Vec<RawEvent>,
}

impl Frame {
    fn from_raw(raw: RawFrame) -> Self {
        let mut counters = BTreeMap::new();
        for (key, pf) in raw.participant_frames {
            // Non-numeric keys are alien records; the fold errors later if a
            // participant it needs has no row.
            if let Ok(pid) = key.parse::<ParticipantId>() {
                counters.insert(
                    pid,
                    FrameCounters {
                        total_gold: pf.total_gold,
                        current_gold: pf.current_gold,
                        level: pf.level,
                        minions_killed: pf.minions_killed,
                        jungle_minions_killed: pf.jungle_minions_killed,
                    },
                );
            }
        }
        Self {
            timestamp: raw.timestamp,
            counters,
            events: raw.events,
        }
    }
}

/// Parsed timeline ready for the fold.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub match_id: Option<String>,
    pub frame_interval: Option<i64>,
    pub frames: Vec<Frame>,
}

impl Timeline {
    /// Parse a raw match-v5 timeline JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ReplayError> {
        let raw: RawTimeline = serde_json::from_str(json).map_err(|e| {
            ReplayError::TimelineJson {
                detail: e.to_string(),
            }
        })?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: RawTimeline) -> Self {
        Self {
            match_id: raw.metadata.and_then(|m| m.match_id),
            frame_interval: raw.info.frame_interval,
            frames: raw.info.frames.into_iter().map(Frame::from_raw).collect(),
        }
    }
}
