//! Grid geometry: slot variables and the decomposition of a block pattern into slots.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};

use smallvec::SmallVec;

use crate::errors::CrosswordError;
use crate::{GridCoord, MAX_SLOT_LENGTH};

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A single word slot: where it starts, which way it runs, and how long it is.
///
/// Two variables are the same slot iff all four fields match, so this is safe to use as a map
/// key for values that were built independently (e.g. a prior fill coming back from a caller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Variable {
        Variable { row, col, direction, length }
    }

    /// Generate the coords for each cell of this slot, in reading order.
    pub fn cells(&self) -> SmallVec<[GridCoord; MAX_SLOT_LENGTH]> {
        (0..self.length).map(|cell_idx| self.cell(cell_idx)).collect()
    }

    /// The coord of the `cell_idx`-th cell. Doesn't check `cell_idx` against `length`.
    pub fn cell(&self, cell_idx: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.row, self.col + cell_idx),
            Direction::Down => (self.row + cell_idx, self.col),
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.row, self.col, self.direction, self.length)
    }
}

/// Letters already known for each slot, with `None` for the gaps.
pub type PriorAssignment = HashMap<Variable, Vec<Option<char>>>;

/// Find every maximal run of two or more fillable cells. Slots are listed row-major, and a down
/// slot comes before an across slot starting in the same cell.
pub fn decompose(structure: &[Vec<bool>]) -> Vec<Variable> {
    let height = structure.len();
    let mut variables = vec![];

    for (i, row) in structure.iter().enumerate() {
        for (j, &fillable) in row.iter().enumerate() {
            if !fillable {
                continue;
            }

            // Vertical words
            if i == 0 || !structure[i - 1][j] {
                let length = (i..height).take_while(|&k| structure[k][j]).count();
                if length > 1 {
                    variables.push(Variable::new(i, j, Direction::Down, length));
                }
            }

            // Horizontal words
            if j == 0 || !row[j - 1] {
                let length = row[j..].iter().take_while(|&&cell| cell).count();
                if length > 1 {
                    variables.push(Variable::new(i, j, Direction::Across, length));
                }
            }
        }
    }

    variables
}

/// Check that `structure` really is `height` rows of `width` cells.
pub fn validate_structure(
    height: usize,
    width: usize,
    structure: &[Vec<bool>],
) -> Result<(), CrosswordError> {
    if structure.len() != height {
        return Err(CrosswordError::HeightMismatch { expected: height, actual: structure.len() });
    }

    for (row, cells) in structure.iter().enumerate() {
        if cells.len() != width {
            return Err(CrosswordError::WidthMismatch { row, expected: width, actual: cells.len() });
        }
    }

    Ok(())
}

/// Build a fillable-cell matrix from a list of blocked cells. Blocks are numbered from 1 in
/// reading order, so cell (i, j) is block `i * width + j + 1`.
pub fn structure_from_blocks(
    height: usize,
    width: usize,
    blocks: &[usize],
) -> Result<Vec<Vec<bool>>, CrosswordError> {
    let mut structure = vec![vec![true; width]; height];

    for &block in blocks {
        let (i, j) = block_coord(height, width, block)?;
        structure[i][j] = false;
    }

    Ok(structure)
}

/// Close a block list under 180° rotation, so the resulting grid is symmetric the way most
/// published crosswords are. The result is sorted and free of duplicates.
pub fn symmetric_blocks(
    height: usize,
    width: usize,
    blocks: &[usize],
) -> Result<Vec<usize>, CrosswordError> {
    let mut result = BTreeSet::new();

    for &block in blocks {
        result.insert(block);
        result.insert(mirror_block(height, width, block)?);
    }

    Ok(result.into_iter().collect())
}

/// The inverse clean-up of [`symmetric_blocks`]: drop every block whose 180° mirror isn't
/// blocked too. The result is sorted and free of duplicates.
pub fn remove_asymmetric_blocks(
    height: usize,
    width: usize,
    blocks: &[usize],
) -> Result<Vec<usize>, CrosswordError> {
    let present: BTreeSet<usize> = blocks.iter().copied().collect();
    let mut result = Vec::with_capacity(present.len());

    for &block in &present {
        if present.contains(&mirror_block(height, width, block)?) {
            result.push(block);
        }
    }

    Ok(result)
}

fn mirror_block(height: usize, width: usize, block: usize) -> Result<usize, CrosswordError> {
    let (i, j) = block_coord(height, width, block)?;
    Ok((height - 1 - i) * width + (width - 1 - j) + 1)
}

fn block_coord(height: usize, width: usize, block: usize) -> Result<GridCoord, CrosswordError> {
    if block == 0 || block > height.saturating_mul(width) {
        return Err(CrosswordError::BlockOutOfRange { block, height, width });
    }

    Ok(((block - 1) / width, (block - 1) % width))
}

/// Upper-case the letter for one cell. `None` if its upper-case form takes more than one
/// character, like 'ß' becoming "SS".
pub fn uppercase_letter(c: char) -> Option<char> {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(letter), None) => Some(letter),
        _ => None,
    }
}

/// A grid parsed from a text template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub height: usize,
    pub width: usize,
    pub structure: Vec<Vec<bool>>,

    /// Pre-filled letters, upper-cased. `None` for blocks and empty cells.
    pub letters: Vec<Vec<Option<char>>>,
}

impl Template {
    /// Parse a template with `#` representing blocks, `.` or `_` representing empty cells, and
    /// letters representing themselves. Blank lines and indentation are ignored.
    pub fn parse(template: &str) -> Result<Template, CrosswordError> {
        let rows: Vec<Vec<char>> = template
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect())
            .collect();

        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut structure = Vec::with_capacity(rows.len());
        let mut letters = Vec::with_capacity(rows.len());

        for (line, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(CrosswordError::RaggedTemplate { line, expected: width, actual: row.len() });
            }

            let mut structure_row = Vec::with_capacity(width);
            let mut letters_row = Vec::with_capacity(width);

            for &cell in row {
                match cell {
                    '#' => {
                        structure_row.push(false);
                        letters_row.push(None);
                    }
                    '.' | '_' => {
                        structure_row.push(true);
                        letters_row.push(None);
                    }
                    c if c.is_alphabetic() && uppercase_letter(c).is_some() => {
                        structure_row.push(true);
                        letters_row.push(uppercase_letter(c));
                    }
                    found => return Err(CrosswordError::InvalidTemplateChar { line, found }),
                }
            }

            structure.push(structure_row);
            letters.push(letters_row);
        }

        Ok(Template { height: rows.len(), width, structure, letters })
    }

    /// Collect the pre-filled letters of every slot that has at least one.
    pub fn prior_assignment(&self) -> PriorAssignment {
        decompose(&self.structure)
            .into_iter()
            .filter_map(|variable| {
                let letters: Vec<Option<char>> =
                    variable.cells().iter().map(|&(i, j)| self.letters[i][j]).collect();

                if letters.iter().any(Option::is_some) {
                    Some((variable, letters))
                } else {
                    None
                }
            })
            .collect()
    }
}
