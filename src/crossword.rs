//! The static puzzle: geometry, vocabulary, and the overlap graph between slots.

use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};

use log::debug;
use smallvec::SmallVec;

use crate::errors::CrosswordError;
use crate::grid::{
    decompose, uppercase_letter, validate_structure, Direction, PriorAssignment, Template, Variable,
};
use crate::{VariableId, WordId, MAX_SLOT_LENGTH};

/// A word that can be chosen for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    fn new(string: String) -> Word {
        let glyphs = string.chars().collect();
        Word { string, glyphs }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Where two slots cross: the `first`-th cell of one is the `second`-th cell of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub first: usize,
    pub second: usize,
}

/// The aspects of a puzzle that are static during filling.
pub struct Crossword {
    pub height: usize,
    pub width: usize,
    pub structure: Vec<Vec<bool>>,

    /// The vocabulary followed by any seed words that weren't already in it. Domains refer to
    /// words by their index in here.
    words: Vec<Word>,
    vocabulary_len: usize,

    variables: Vec<Variable>,
    ids_by_variable: HashMap<Variable, VariableId>,

    /// Row-major `variables.len()` square matrix, indexed by `[v1 * n + v2]`.
    overlaps: Vec<Option<Overlap>>,
    neighbors: Vec<SmallVec<[VariableId; MAX_SLOT_LENGTH]>>,

    /// Words fixed by the prior fill, for slots whose letters were all known.
    seeds: Vec<Option<WordId>>,

    /// Known letters of partially fixed slots.
    partial_letters: Vec<Option<Vec<Option<char>>>>,
}

impl Debug for Crossword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossword")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("variables", &self.variables)
            .field("words", &format!("({} entries)", self.words.len()))
            .finish()
    }
}

/// Upper-case, trim and de-duplicate a word list, keeping first-occurrence order.
pub fn normalize_vocabulary<I, S>(vocabulary: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();

    vocabulary
        .into_iter()
        .filter_map(|word| {
            let word = word.as_ref().trim().to_uppercase();
            if word.is_empty() || !seen.insert(word.clone()) {
                None
            } else {
                Some(word)
            }
        })
        .collect()
}

impl Crossword {
    /// Build a crossword from a fillable-cell matrix, where `true` is a white cell.
    pub fn new<I, S>(
        height: usize,
        width: usize,
        structure: Vec<Vec<bool>>,
        vocabulary: I,
    ) -> Result<Crossword, CrosswordError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Crossword::with_prior(height, width, structure, vocabulary, &PriorAssignment::new())
    }

    /// Like [`Crossword::new`], with some letters already filled in.
    pub fn with_prior<I, S>(
        height: usize,
        width: usize,
        structure: Vec<Vec<bool>>,
        vocabulary: I,
        prior: &PriorAssignment,
    ) -> Result<Crossword, CrosswordError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_structure(height, width, &structure)?;
        let variables = decompose(&structure);

        Crossword::build(height, width, structure, variables, vocabulary, prior)
    }

    /// Build a crossword from a parsed text template, using its letters as the prior fill.
    pub fn from_template<I, S>(template: &Template, vocabulary: I) -> Result<Crossword, CrosswordError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Crossword::with_prior(
            template.height,
            template.width,
            template.structure.clone(),
            vocabulary,
            &template.prior_assignment(),
        )
    }

    /// Build a crossword from an explicit slot list rather than a block pattern. The structure
    /// is the union of the slots' cells. Slots must lie inside the grid and be distinct, but may
    /// otherwise overlap however the caller likes.
    pub fn from_slots<I, S>(
        height: usize,
        width: usize,
        slots: Vec<Variable>,
        vocabulary: I,
        prior: &PriorAssignment,
    ) -> Result<Crossword, CrosswordError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut structure = vec![vec![false; width]; height];

        for variable in &slots {
            let fits = variable.length > 0 && match variable.direction {
                Direction::Across => {
                    variable.row < height
                        && variable.col.checked_add(variable.length).map_or(false, |end| end <= width)
                }
                Direction::Down => {
                    variable.col < width
                        && variable.row.checked_add(variable.length).map_or(false, |end| end <= height)
                }
            };
            if !fits {
                return Err(CrosswordError::SlotOutOfBounds { variable: *variable, height, width });
            }

            for (i, j) in variable.cells() {
                structure[i][j] = true;
            }
        }

        Crossword::build(height, width, structure, slots, vocabulary, prior)
    }

    fn build<I, S>(
        height: usize,
        width: usize,
        structure: Vec<Vec<bool>>,
        variables: Vec<Variable>,
        vocabulary: I,
        prior: &PriorAssignment,
    ) -> Result<Crossword, CrosswordError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids_by_variable = HashMap::with_capacity(variables.len());
        for (id, &variable) in variables.iter().enumerate() {
            if ids_by_variable.insert(variable, id).is_some() {
                return Err(CrosswordError::DuplicateSlot { variable });
            }
        }

        let mut words: Vec<Word> = normalize_vocabulary(vocabulary).into_iter().map(Word::new).collect();
        let vocabulary_len = words.len();

        let (overlaps, neighbors) = build_overlaps(&variables);

        let mut seeds: Vec<Option<WordId>> = vec![None; variables.len()];
        let mut partial_letters: Vec<Option<Vec<Option<char>>>> = vec![None; variables.len()];

        // Sort so that seed words get appended to the word table in a reproducible order.
        let mut prior_entries: Vec<_> = prior.iter().collect();
        prior_entries.sort_by_key(|(variable, _)| **variable);

        for (variable, letters) in prior_entries {
            let id = *ids_by_variable
                .get(variable)
                .ok_or(CrosswordError::UnknownVariable { variable: *variable })?;

            if letters.len() != variable.length {
                return Err(CrosswordError::LetterCountMismatch {
                    variable: *variable,
                    expected: variable.length,
                    actual: letters.len(),
                });
            }

            let letters: Vec<Option<char>> = letters
                .iter()
                .map(|letter| letter.map(|c| uppercase_letter(c).unwrap_or(c)))
                .collect();

            if letters.iter().all(Option::is_some) {
                let seed: String = letters.iter().flatten().collect();
                let word_id = match words.iter().position(|word| word.string == seed) {
                    Some(word_id) => word_id,
                    None => {
                        // Either a seed or a theme entry, so it has to be usable even though
                        // it's not in the word list.
                        words.push(Word::new(seed));
                        words.len() - 1
                    }
                };
                seeds[id] = Some(word_id);
            } else if letters.iter().any(Option::is_some) {
                partial_letters[id] = Some(letters);
            }
        }

        debug!(
            "Built {}x{} crossword with {} slots and {} words ({} seeded)",
            height,
            width,
            variables.len(),
            words.len(),
            seeds.iter().filter(|seed| seed.is_some()).count(),
        );

        Ok(Crossword {
            height,
            width,
            structure,
            words,
            vocabulary_len,
            variables,
            ids_by_variable,
            overlaps,
            neighbors,
            seeds,
            partial_letters,
        })
    }

    /// All slots, in canonical order. A slot's position in here is its [`VariableId`].
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id]
    }

    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.ids_by_variable.get(variable).copied()
    }

    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id]
    }

    /// Number of words in the word table, seeds included.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// The normalized vocabulary, without seed words that weren't in it.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.words[..self.vocabulary_len].iter().map(|word| word.string.as_str())
    }

    /// The overlap between two slots, or `None` if they share no cell (or are the same slot).
    pub fn overlap(&self, v1: VariableId, v2: VariableId) -> Option<Overlap> {
        self.overlaps[v1 * self.variables.len() + v2]
    }

    /// Like [`Crossword::overlap`], for callers holding `Variable` values.
    pub fn overlap_between(&self, v1: &Variable, v2: &Variable) -> Option<Overlap> {
        self.overlap(self.variable_id(v1)?, self.variable_id(v2)?)
    }

    /// Slots sharing a cell with `id`.
    pub fn neighbors(&self, id: VariableId) -> &[VariableId] {
        &self.neighbors[id]
    }

    pub fn degree(&self, id: VariableId) -> usize {
        self.neighbors[id].len()
    }

    /// Every ordered pair of slots that has an overlap, in canonical order.
    pub fn arcs(&self) -> Vec<(VariableId, VariableId)> {
        (0..self.variables.len())
            .flat_map(|x| self.neighbors[x].iter().map(move |&y| (x, y)))
            .collect()
    }

    pub fn seed(&self, id: VariableId) -> Option<WordId> {
        self.seeds[id]
    }

    pub fn partial_letters(&self, id: VariableId) -> Option<&[Option<char>]> {
        self.partial_letters[id].as_deref()
    }
}

/// Compute the overlap matrix and neighbor lists. When two slots share several cells (which a
/// grid built from a block pattern never does) the first shared cell in the first slot's order
/// wins.
fn build_overlaps(
    variables: &[Variable],
) -> (Vec<Option<Overlap>>, Vec<SmallVec<[VariableId; MAX_SLOT_LENGTH]>>) {
    let n = variables.len();
    let cells: Vec<_> = variables.iter().map(Variable::cells).collect();

    let mut overlaps = vec![None; n * n];
    let mut neighbors: Vec<SmallVec<[VariableId; MAX_SLOT_LENGTH]>> = vec![SmallVec::new(); n];

    for v1 in 0..n {
        for v2 in 0..n {
            if v1 == v2 {
                continue;
            }

            let overlap = cells[v1].iter().enumerate().find_map(|(first, cell)| {
                cells[v2].iter().position(|other| other == cell).map(|second| Overlap { first, second })
            });

            if overlap.is_some() {
                overlaps[v1 * n + v2] = overlap;
                neighbors[v1].push(v2);
            }
        }
    }

    (overlaps, neighbors)
}
