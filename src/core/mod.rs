//! Core simulation engine: criteria matching, formula resolution, step-trace
//! generation, playback, and the sort/filter lab.

pub mod criteria;
pub mod playback;
pub mod resolver;
pub mod sort;
pub mod text;
pub mod trace;

pub use playback::{PlaybackController, PlaybackEvent, PlaybackStatus, Speed};
pub use resolver::{resolve, ColumnRef, FormulaArgs, FormulaKind};
pub use trace::{generate_trace, Trace, TraceStep};
