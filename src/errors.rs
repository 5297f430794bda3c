//! Construction-time errors.
//!
//! Everything in here means the puzzle as described cannot even be set up: the grid and its
//! stated dimensions disagree, a slot runs off the board, or a prior fill names a slot that the
//! grid doesn't have. An unfillable puzzle is *not* an error; see
//! [`FillFailure`](crate::FillFailure) for that.

use crate::grid::Variable;

/// Malformed puzzle input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrosswordError {
    #[error("structure has {actual} rows, expected {expected}")]
    HeightMismatch { expected: usize, actual: usize },

    #[error("structure row {row} has {actual} cells, expected {expected}")]
    WidthMismatch { row: usize, expected: usize, actual: usize },

    #[error("block number {block} is outside a {height}x{width} grid")]
    BlockOutOfRange { block: usize, height: usize, width: usize },

    #[error("template line {line} has {actual} cells, expected {expected}")]
    RaggedTemplate { line: usize, expected: usize, actual: usize },

    #[error("template character {found:?} at line {line} is not a block, blank or single-cell letter")]
    InvalidTemplateChar { line: usize, found: char },

    #[error("slot {variable} does not fit inside a {height}x{width} grid")]
    SlotOutOfBounds { variable: Variable, height: usize, width: usize },

    #[error("slot {variable} is listed more than once")]
    DuplicateSlot { variable: Variable },

    #[error("no slot {variable} in this grid")]
    UnknownVariable { variable: Variable },

    #[error("slot {variable} has {expected} cells but {actual} letters were given")]
    LetterCountMismatch { variable: Variable, expected: usize, actual: usize },

    #[error("cell index {index} is outside slot {variable}")]
    CellOutOfRange { variable: Variable, index: usize },
}

impl CrosswordError {
    /// Stable code for this error variant.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            CrosswordError::HeightMismatch { .. } => "C001",
            CrosswordError::WidthMismatch { .. } => "C002",
            CrosswordError::BlockOutOfRange { .. } => "C003",
            CrosswordError::RaggedTemplate { .. } => "C004",
            CrosswordError::InvalidTemplateChar { .. } => "C005",
            CrosswordError::SlotOutOfBounds { .. } => "C006",
            CrosswordError::DuplicateSlot { .. } => "C007",
            CrosswordError::UnknownVariable { .. } => "C008",
            CrosswordError::LetterCountMismatch { .. } => "C009",
            CrosswordError::CellOutOfRange { .. } => "C010",
        }
    }

    /// A hint for fixing the input, where there's something useful to say.
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            CrosswordError::BlockOutOfRange { .. } => {
                Some("Blocks are numbered from 1, row by row: row * width + col + 1")
            }
            CrosswordError::RaggedTemplate { .. } => {
                Some("Every template line must have the same number of cells")
            }
            CrosswordError::InvalidTemplateChar { .. } => {
                Some("Use '#' for blocks, '.' or '_' for empty cells, and letters for fixed cells. Letters like 'ß' that upper-case to more than one letter can't fill a single cell")
            }
            CrosswordError::UnknownVariable { .. } => {
                Some("Prior fills must use the (row, col, direction, length) of an existing slot")
            }
            _ => None,
        }
    }

    /// Formats the error with its code and help text, for the CLI.
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self.help() {
            Some(help) => format!("{}: {self}\n  help: {help}", self.code()),
            None => format!("{}: {self}", self.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;

    #[test]
    fn test_detailed_display_includes_code_and_help() {
        let err = CrosswordError::UnknownVariable {
            variable: Variable::new(1, 2, Direction::Across, 3),
        };

        let text = err.display_detailed();
        assert!(text.starts_with("C008: no slot (1, 2, across, 3)"));
        assert!(text.contains("help:"));
    }

    #[test]
    fn test_detailed_display_without_help() {
        let err = CrosswordError::HeightMismatch { expected: 3, actual: 2 };
        assert_eq!(err.display_detailed(), "C001: structure has 2 rows, expected 3");
    }
}
