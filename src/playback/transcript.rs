//! A backend that records the calls it receives.

use super::backend::Backend;
use super::types::Event;
use serde::Serialize;
use std::convert::Infallible;
use std::fmt;

/// One call made on a [`Transcript`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "kebab-case")]
pub enum BackendCall {
    Prepare {
        track_count: usize,
    },
    SetTempo {
        tempo: i64,
    },
    CreateTrack {
        index: usize,
        name: String,
    },
    Configure {
        index: usize,
        instrument_name: String,
        channel: usize,
        pitch_shift: i64,
        volume: i64,
    },
    AppendEvents {
        index: usize,
        events: Vec<Event>,
    },
    Play,
}

impl fmt::Display for BackendCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendCall::Prepare { track_count } => write!(f, "tracks {}", track_count),
            BackendCall::SetTempo { tempo } => write!(f, "tempo {}", tempo),
            BackendCall::CreateTrack { index, name } => write!(f, "track {} \"{}\"", index, name),
            BackendCall::Configure {
                index,
                instrument_name,
                channel,
                pitch_shift,
                volume,
            } => write!(
                f,
                "configure {} \"{}\" channel={} pitch_shift={} volume={}",
                index, instrument_name, channel, pitch_shift, volume
            ),
            BackendCall::AppendEvents { index, events } => {
                write!(f, "events {}", index)?;
                for event in events {
                    let pitches: Vec<String> = event.pitches.iter().map(i64::to_string).collect();
                    write!(f, " [{}]x{}", pitches.join(","), event.duration)?;
                }
                Ok(())
            }
            BackendCall::Play => write!(f, "play"),
        }
    }
}

/// In-memory backend; tracks are identified by their track number.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    calls: Vec<BackendCall>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// One call per line.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for call in &self.calls {
            out.push_str(&call.to_string());
            out.push('\n');
        }
        out
    }
}

impl Backend for Transcript {
    type Track = usize;
    type Error = Infallible;

    fn prepare(&mut self, track_count: usize) -> Result<(), Infallible> {
        self.calls.push(BackendCall::Prepare { track_count });
        Ok(())
    }

    fn set_tempo(&mut self, tempo: i64) -> Result<(), Infallible> {
        self.calls.push(BackendCall::SetTempo { tempo });
        Ok(())
    }

    fn create_track(&mut self, index: usize, name: &str) -> Result<usize, Infallible> {
        self.calls.push(BackendCall::CreateTrack {
            index,
            name: name.to_string(),
        });
        Ok(index)
    }

    fn configure(
        &mut self,
        track: &mut usize,
        instrument_name: &str,
        channel: usize,
        pitch_shift: i64,
        volume: i64,
    ) -> Result<(), Infallible> {
        self.calls.push(BackendCall::Configure {
            index: *track,
            instrument_name: instrument_name.to_string(),
            channel,
            pitch_shift,
            volume,
        });
        Ok(())
    }

    fn append_events(&mut self, track: &mut usize, events: &[Event]) -> Result<(), Infallible> {
        self.calls.push(BackendCall::AppendEvents {
            index: *track,
            events: events.to_vec(),
        });
        Ok(())
    }

    fn play(&mut self) -> Result<(), Infallible> {
        self.calls.push(BackendCall::Play);
        Ok(())
    }
}
