//! Fill a crossword grid from a word list by treating it as a constraint-satisfaction problem.
//!
//! Each across or down run of fillable cells is a variable whose domain is the set of words that
//! could go there. We make every domain node-consistent (right length) and arc-consistent
//! (AC-3 over the crossings), then run a backtracking search ordered by the
//! minimum-remaining-values, degree and least-constraining-value heuristics.

pub mod assignment;
pub mod consistency;
pub mod crossword;
pub mod dictionary;
pub mod domains;
pub mod error;
pub mod solver;

pub use assignment::{is_consistent, Assignment};
pub use consistency::{ac3, revise, Ac3Failure, ArcPair};
pub use crossword::{Crossing, Crossword, Direction, Variable, DEFAULT_BLOCKED_GLYPH};
pub use dictionary::{Dictionary, Word};
pub use domains::{DomainIter, Domains};
pub use error::PuzzleError;
pub use solver::{CrosswordSolver, SolveFailure, Solution, SolverConfig, Statistics};

/// The expected maximum length for a single slot. Longer slots still work, they just spill out of
/// the inline storage.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a given variable, based on its index in the Crossword's `variables` field.
pub type VariableId = usize;

/// An identifier for a given word, based on its index in the Dictionary's `words` field.
pub type WordId = usize;

/// Zero-indexed (row, col) coords for a cell in the grid, where row = 0 is the top row.
pub type GridCoord = (usize, usize);

#[cfg(test)]
mod tests {
    use crate::*;
    use std::sync::*;

    #[test]
    fn test_glob_import_leaves_std_arc_usable() {
        let shared = Arc::new(Mutex::new(vec![(0, 1)]));
        let arcs: Vec<ArcPair> = shared.lock().unwrap().clone();

        assert_eq!(arcs, vec![(0, 1)]);
    }
}
