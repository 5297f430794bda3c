//! Turning an assignment back into cells.

use crate::crossword::Crossword;
use crate::search::Assignment;

/// The letter in every cell, or `None` for blocks and cells no assigned word covers.
pub fn letter_grid(crossword: &Crossword, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; crossword.width]; crossword.height];

    for (id, word_id) in assignment.iter() {
        let variable = crossword.variable(id);

        for (cell_idx, &glyph) in crossword.word(word_id).glyphs.iter().enumerate() {
            let (i, j) = variable.cell(cell_idx);
            if let Some(cell) = letters.get_mut(i).and_then(|row| row.get_mut(j)) {
                *cell = Some(glyph);
            }
        }
    }

    letters
}

/// Turn the given crossword and assignment into a rendered string, with `#` for blocks and `.`
/// for cells that are still empty.
pub fn render_grid(crossword: &Crossword, assignment: &Assignment) -> String {
    let letters = letter_grid(crossword, assignment);

    crossword
        .structure
        .iter()
        .zip(&letters)
        .map(|(structure_row, letters_row)| {
            structure_row
                .iter()
                .zip(letters_row)
                .map(|(&fillable, letter)| match (fillable, letter) {
                    (false, _) => '#',
                    (true, Some(letter)) => *letter,
                    (true, None) => '.',
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
