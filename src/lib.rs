//! V-Lab - interactive spreadsheet formula simulator
//!
//! This library is the engine behind an educational tool that teaches
//! spreadsheet formulas by animating how they execute. Given a formula
//! invocation, it computes the result against fixed teaching datasets
//! (including the real error codes: #N/A, #REF!, #VALUE!) and produces an
//! ordered trace of human-readable steps that a playback controller reveals
//! one at a time.
//!
//! # Features
//!
//! - Lookup & reference functions: VLOOKUP, HLOOKUP, MATCH, INDEX, CHOOSE
//! - Conditional aggregates: COUNTIF, SUMIF, COUNTIFS, SUMIFS
//! - Text functions: UPPER, LOWER, PROPER, LEFT, RIGHT, MID, LEN, TEXT
//! - Step-trace generation with per-step cell highlighting
//! - Timer-driven playback with pause/resume/reset and speed presets
//! - Sort & filter lab and a JSON progress store
//!
//! # Example
//!
//! ```
//! use vlab::core::resolver::{resolve, FormulaArgs};
//! use vlab::core::trace::generate_trace;
//! use vlab::data::{SimulationMode, Workbook};
//!
//! let args = FormulaArgs::VLookup {
//!     lookup_value: "K02".to_string(),
//!     col_index: 3,
//!     exact: false,
//! };
//! let book = Workbook::for_kind(args.kind(), SimulationMode::Simple);
//!
//! let eval = resolve(&args, &book);
//! assert_eq!(eval.outcome.display(), "12000");
//!
//! let (trace, eval) = generate_trace(&args, &book);
//! assert_eq!(
//!     trace.final_step().map(|s| s.display.render()),
//!     Some(eval.outcome.display())
//! );
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod progress;
pub mod types;

// Re-export commonly used types
pub use error::{VlabError, VlabResult};
pub use types::{CellCoord, ErrorKind, Evaluation, Outcome, TableId, Value};
