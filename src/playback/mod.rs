//! # Playback Module
//!
//! The emission side of the compiler: what a compiled score looks like and how it is
//! handed to something that can play it.
//!
//! ## Sub-modules
//! - `types` - CompiledScore, TrackSpec, Event
//! - `backend` - the Backend trait and [`perform()`]
//! - `transcript` - a recording backend with a plain-text listing
//!
//! ## Example
//! ```rust
//! use trackscore::compile;
//! use trackscore::playback::{perform, Transcript};
//!
//! let score = compile("tempo = (120, 2)\ninstrument = piano\n[4] 0 2 4\n").unwrap();
//!
//! let mut transcript = Transcript::new();
//! perform(&score, &mut transcript).unwrap();
//! assert_eq!(
//!     transcript.listing(),
//!     "tracks 1\n\
//!      tempo 240\n\
//!      track 1 \"Track 1\"\n\
//!      configure 1 \"piano\" channel=0 pitch_shift=0 volume=100\n\
//!      events 1 [60]x4 [62]x4 [64]x4\n\
//!      play\n"
//! );
//! ```

mod backend;
mod transcript;
mod types;


pub use backend::{perform, Backend};
pub use transcript::{BackendCall, Transcript};
pub use types::{CompiledScore, Event, TrackSpec};
