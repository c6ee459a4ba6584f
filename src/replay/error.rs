//! Replay Errors
//!
//! The fatal-per-match failure taxonomy. Locally recoverable conditions
//! (idempotent item no-ops, unknown event types, unknown monsters) never
//! surface here; the normalizer and resolver absorb them. Everything in this
//! enum aborts exactly one match and leaves the rest of a batch running.

use crate::replay::events::{Millis, ParticipantId};

/// Failures that abort a single match's replay.
#[derive(Debug, Clone)]
pub enum ReplayError {
    /// Timeline document failed to parse.
    TimelineJson { detail: String },

    /// Match document failed to parse.
    SummaryJson { detail: String },

    /// A recognized event type is missing a required field.
    MalformedEvent {
        kind: String,
        field: &'static str,
        timestamp: Millis,
    },

    /// A frame carries no raw counter row for a seeded participant.
    MissingParticipantFrame {
        participant_id: ParticipantId,
        timestamp: Millis,
    },

    /// The match was not played on the supported map.
    UnsupportedMap { map_id: i32 },

    /// Reconciliation failed and the engine is configured as a hard gate.
    ValidationRejected { mismatches: usize, report: String },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimelineJson { detail } => {
                write!(f, "timeline document did not parse: {}", detail)
            }
            Self::SummaryJson { detail } => {
                write!(f, "match document did not parse: {}", detail)
            }
            Self::MalformedEvent {
                kind,
                field,
                timestamp,
            } => write!(
                f,
                "{} event at {}ms is missing required field `{}`",
                kind, timestamp, field
            ),
            Self::MissingParticipantFrame {
                participant_id,
                timestamp,
            } => write!(
                f,
                "frame at {}ms has no counters for participant {}",
                timestamp, participant_id
            ),
            Self::UnsupportedMap { map_id } => {
                write!(f, "match was played on unsupported map {}", map_id)
            }
            Self::ValidationRejected { mismatches, report } => write!(
                f,
                "reconciliation rejected with {} mismatches:\n{}",
                mismatches, report
            ),
        }
    }
}

impl std::error::Error for ReplayError {}
