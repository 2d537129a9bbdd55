//! The boundary between a compiled score and whatever realizes it.

use super::types::{CompiledScore, Event};

/// Something that can realize a compiled score: a MIDI writer, a synthesizer, or a
/// recorder such as [`Transcript`](super::Transcript).
///
/// Tracks are referred to by the handle returned from [`Backend::create_track`].
pub trait Backend {
    type Track;
    type Error;

    /// Called once before anything else with the number of track slots the score allocated.
    fn prepare(&mut self, _track_count: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_tempo(&mut self, tempo: i64) -> Result<(), Self::Error>;

    fn create_track(&mut self, index: usize, name: &str) -> Result<Self::Track, Self::Error>;

    fn configure(
        &mut self,
        track: &mut Self::Track,
        instrument_name: &str,
        channel: usize,
        pitch_shift: i64,
        volume: i64,
    ) -> Result<(), Self::Error>;

    fn append_events(&mut self, track: &mut Self::Track, events: &[Event])
        -> Result<(), Self::Error>;

    fn play(&mut self) -> Result<(), Self::Error>;
}

/// Walk a compiled score through a backend.
///
/// The tempo is set once, then every scheduled track is created, configured and filled
/// in order, and finally the backend is asked to play.
pub fn perform<B: Backend>(score: &CompiledScore, backend: &mut B) -> Result<(), B::Error> {
    backend.prepare(score.track_count)?;
    backend.set_tempo(score.tempo)?;
    for spec in &score.tracks {
        let mut track = backend.create_track(spec.track_number, &spec.title())?;
        backend.configure(
            &mut track,
            &spec.instrument_name,
            spec.channel,
            spec.pitch_shift,
            spec.volume,
        )?;
        backend.append_events(&mut track, &spec.events)?;
    }
    backend.play()
}
