//! Letter-by-letter edits to a fill, as made by someone typing into the grid.

use crate::crossword::Crossword;
use crate::errors::CrosswordError;
use crate::grid::{uppercase_letter, PriorAssignment, Variable};
use crate::search::Assignment;

/// Every slot with its letters, `None` marking an empty cell.
pub type Solution = Vec<(Variable, Vec<Option<char>>)>;

/// Set (`Some`) or erase (`None`) the letter in one cell of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterEdit {
    pub variable: Variable,
    pub cell: usize,
    pub letter: Option<char>,
}

/// The letters of every slot in the crossword, filled from `assignment` where it has a word.
pub fn solution_from_assignment(crossword: &Crossword, assignment: &Assignment) -> Solution {
    crossword
        .variables()
        .iter()
        .enumerate()
        .map(|(id, variable)| {
            let letters: Vec<Option<char>> = match assignment.get(id) {
                Some(word_id) => crossword.word(word_id).glyphs.iter().copied().map(Some).collect(),
                None => vec![None; variable.length],
            };
            (*variable, letters)
        })
        .collect()
}

/// Apply `edits` in order to a copy of `solution`. Letters are upper-cased. An edit naming a slot
/// that isn't in the solution, or a cell past the end of its slot, is an error and nothing is
/// applied.
///
/// Edits only touch the slot they name; a host editing a cell where two slots cross sends one
/// edit per slot.
pub fn apply_letter_edits(
    solution: &[(Variable, Vec<Option<char>>)],
    edits: &[LetterEdit],
) -> Result<Solution, CrosswordError> {
    let mut updated = solution.to_vec();

    for edit in edits {
        let letters = updated
            .iter_mut()
            .find(|(variable, _)| *variable == edit.variable)
            .map(|(_, letters)| letters)
            .ok_or(CrosswordError::UnknownVariable { variable: edit.variable })?;

        let cell = letters
            .get_mut(edit.cell)
            .ok_or(CrosswordError::CellOutOfRange { variable: edit.variable, index: edit.cell })?;

        *cell = edit.letter.map(|c| uppercase_letter(c).unwrap_or(c));
    }

    Ok(updated)
}

/// Use the letters of a solution as the prior fill for a new crossword. Slots without any
/// letters are left out.
pub fn prior_from_solution(solution: &[(Variable, Vec<Option<char>>)]) -> PriorAssignment {
    solution
        .iter()
        .filter(|(_, letters)| letters.iter().any(Option::is_some))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction::{Across, Down};

    fn sample() -> Solution {
        vec![
            (Variable::new(0, 0, Across, 3), vec![Some('C'), Some('A'), Some('T')]),
            (Variable::new(0, 0, Down, 3), vec![Some('C'), None, None]),
        ]
    }

    #[test]
    fn test_apply_letter_edits_sets_and_erases() {
        let solution = sample();
        let edits = [
            LetterEdit { variable: Variable::new(0, 0, Down, 3), cell: 1, letter: Some('o') },
            LetterEdit { variable: Variable::new(0, 0, Across, 3), cell: 2, letter: None },
        ];

        let updated = apply_letter_edits(&solution, &edits).unwrap();
        assert_eq!(updated[0].1, vec![Some('C'), Some('A'), None]);
        assert_eq!(updated[1].1, vec![Some('C'), Some('O'), None]);

        // The input is left alone.
        assert_eq!(solution, sample());

        // No single-letter upper case, so it stays as typed instead of becoming 'S'.
        let edits = [LetterEdit { variable: Variable::new(0, 0, Down, 3), cell: 2, letter: Some('ß') }];
        let updated = apply_letter_edits(&solution, &edits).unwrap();
        assert_eq!(updated[1].1[2], Some('ß'));
    }

    #[test]
    fn test_apply_letter_edits_rejects_bad_edits() {
        let unknown = Variable::new(2, 0, Across, 3);
        let edits = [LetterEdit { variable: unknown, cell: 0, letter: Some('x') }];
        assert_eq!(
            apply_letter_edits(&sample(), &edits),
            Err(CrosswordError::UnknownVariable { variable: unknown }),
        );

        let across = Variable::new(0, 0, Across, 3);
        let edits = [LetterEdit { variable: across, cell: 3, letter: Some('x') }];
        assert_eq!(
            apply_letter_edits(&sample(), &edits),
            Err(CrosswordError::CellOutOfRange { variable: across, index: 3 }),
        );
    }

    #[test]
    fn test_solution_round_trips_into_prior_fill() {
        let structure = vec![vec![true; 3], vec![true, false, false], vec![true, false, false]];
        let crossword = Crossword::new(3, 3, structure, ["cat", "cow"]).unwrap();

        let mut assignment = Assignment::new(2);
        assignment.assign(1, 0);
        let solution = solution_from_assignment(&crossword, &assignment);

        assert_eq!(solution, vec![
            (Variable::new(0, 0, Down, 3), vec![None, None, None]),
            (Variable::new(0, 0, Across, 3), vec![Some('C'), Some('A'), Some('T')]),
        ]);

        let prior = prior_from_solution(&solution);
        assert_eq!(prior.len(), 1);
        assert_eq!(prior[&Variable::new(0, 0, Across, 3)], vec![Some('C'), Some('A'), Some('T')]);
    }
}
