//! Compiled score type definitions
//!
//! These are the values handed to a [`Backend`](super::Backend) for realization.

use crate::error::Warning;
use serde::Serialize;

/// One realized phrase: the encoded pitches sounding together for `duration` ticks.
///
/// A bare note gives one pitch, a chord one pitch per note. A phrase muted by a line
/// selector keeps its cardinality with every pitch set to `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub pitches: Vec<i64>,
    pub duration: i64,
}

/// A track's configuration together with its full event stream.
///
/// # Fields
/// - `track_number`: 1-based, increasing across sections
/// - `channel`: always `track_number - 1`
/// - `pitch_shift`: `octave * 12`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSpec {
    pub track_number: usize,
    pub instrument_id: i64,
    pub instrument_name: String,
    pub channel: usize,
    pub pitch_shift: i64,
    pub volume: i64,
    pub events: Vec<Event>,
}

impl TrackSpec {
    /// Title the track is created under.
    pub fn title(&self) -> String {
        format!("Track {}", self.track_number)
    }

    /// Total length of the track in ticks, saturating at `i64::MAX`.
    pub fn length(&self) -> i64 {
        self.events
            .iter()
            .fold(0i64, |total, e| total.saturating_add(e.duration))
    }
}

/// Output of the compiler.
///
/// # Fields
/// - `tempo`: product of the two intro integers
/// - `track_count`: number of track slots allocated, including declarations whose
///   streams were never scheduled
/// - `tracks`: scheduled tracks, in the order their ids were first realized
/// - `warnings`: skipped characters and unresolved instrument codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledScore {
    pub tempo: i64,
    pub track_count: usize,
    pub tracks: Vec<TrackSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl CompiledScore {
    /// The scheduled track for an instrument id, if any.
    pub fn track_for(&self, instrument_id: i64) -> Option<&TrackSpec> {
        self.tracks.iter().find(|t| t.instrument_id == instrument_id)
    }
}
