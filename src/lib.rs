pub mod api;
pub mod ast;
pub mod error;
pub mod instruments;
pub mod lexer;
pub mod parser;
pub mod playback;
pub mod semantic;

pub use api::{compile, compile_file, compile_with_instruments};
pub use ast::*;
pub use error::*;
pub use instruments::InstrumentTable;
pub use parser::parse;
pub use playback::{perform, Backend, CompiledScore, Event, TrackSpec};
pub use semantic::assign;
