//! Fill crossword grids by treating them as a constraint satisfaction problem.
//!
//! Each run of two or more white cells is a slot ([`Variable`]), each slot's domain starts as the
//! vocabulary, and every pair of crossing slots must agree on their shared cell. A fill is found
//! by node consistency, AC-3, and then backtracking search that maintains arc consistency after
//! every choice.
//!
//! ```
//! use crossfill::{find_fill, render_grid, Crossword, SolverConfig, Template};
//!
//! let template = Template::parse("
//!     ...
//!     .#.
//!     ...
//! ")?;
//! let crossword = Crossword::from_template(&template, ["tot", "tat", "abc"])?;
//!
//! let fill = find_fill(&crossword, SolverConfig::default()).expect("fillable");
//! assert_eq!(render_grid(&crossword, &fill.assignment), "TOT\nO#O\nTOT");
//! # Ok::<(), crossfill::CrosswordError>(())
//! ```

pub mod consistency;
pub mod crossword;
pub mod domains;
pub mod edits;
pub mod errors;
pub mod grid;
pub mod log;
pub mod render;
pub mod search;
pub mod worker;

pub use crossword::{Crossword, Overlap, Word};
pub use edits::{apply_letter_edits, LetterEdit, Solution};
pub use errors::CrosswordError;
pub use grid::{Direction, PriorAssignment, Template, Variable};
pub use render::{letter_grid, render_grid};
pub use search::{find_fill, Assignment, FillFailure, FillSuccess, SearchBudget, SolverConfig, Statistics};
pub use worker::{spawn_fill, FillHandle};

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a given slot, based on its index in the Crossword's `variables()`.
pub type VariableId = usize;

/// An identifier for a given word, based on its index in the Crossword's word table.
pub type WordId = usize;

/// Zero-indexed (row, col) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);
