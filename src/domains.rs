//! Per-slot candidate lists, the only state that changes while solving.

use crate::crossword::Crossword;
use crate::{VariableId, WordId};

/// The current candidate words of every slot, plus a stack of saved copies for backtracking.
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: Vec<Vec<WordId>>,
    snapshots: Vec<Vec<Vec<WordId>>>,
}

impl DomainStore {
    /// Initial domains: a seeded slot gets just its seed word, anything else gets the whole
    /// vocabulary. With `constrain_partial_entries`, a slot with some known letters only gets
    /// the words agreeing with them.
    pub fn new(crossword: &Crossword, constrain_partial_entries: bool) -> DomainStore {
        let vocabulary_len = crossword.vocabulary().count();

        let domains = (0..crossword.variables().len())
            .map(|id| {
                if let Some(seed) = crossword.seed(id) {
                    return vec![seed];
                }

                match crossword.partial_letters(id) {
                    Some(letters) if constrain_partial_entries => (0..vocabulary_len)
                        .filter(|&word_id| {
                            let glyphs = &crossword.word(word_id).glyphs;
                            glyphs.len() == letters.len()
                                && letters.iter().zip(glyphs).all(|(letter, glyph)| {
                                    letter.map(|letter| letter == *glyph).unwrap_or(true)
                                })
                        })
                        .collect(),
                    _ => (0..vocabulary_len).collect(),
                }
            })
            .collect();

        DomainStore { domains, snapshots: vec![] }
    }

    #[cfg(test)]
    fn from_domains(domains: Vec<Vec<WordId>>) -> DomainStore {
        DomainStore { domains, snapshots: vec![] }
    }

    pub fn get(&self, id: VariableId) -> &[WordId] {
        &self.domains[id]
    }

    pub fn len(&self, id: VariableId) -> usize {
        self.domains[id].len()
    }

    pub fn is_empty(&self, id: VariableId) -> bool {
        self.domains[id].is_empty()
    }

    pub fn set(&mut self, id: VariableId, words: Vec<WordId>) {
        self.domains[id] = words;
    }

    /// Keep only the words of `id`'s domain matching `keep`. Returns whether anything was
    /// removed.
    pub fn retain<F>(&mut self, id: VariableId, keep: F) -> bool
    where
        F: FnMut(&WordId) -> bool,
    {
        let before = self.domains[id].len();
        self.domains[id].retain(keep);
        self.domains[id].len() < before
    }

    /// Save a copy of every domain. Pair with [`DomainStore::pop_snapshot`].
    pub fn push_snapshot(&mut self) {
        self.snapshots.push(self.domains.clone());
    }

    /// Restore the most recently saved domains. Returns false if there was nothing to restore.
    pub fn pop_snapshot(&mut self) -> bool {
        match self.snapshots.pop() {
            Some(domains) => {
                self.domains = domains;
                true
            }
            None => false,
        }
    }

    pub fn snapshot_depth(&self) -> usize {
        self.snapshots.len()
    }

    /// The current domains, without the snapshot stack.
    pub fn domains(&self) -> &[Vec<WordId>] {
        &self.domains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Direction, PriorAssignment, Variable};

    #[test]
    fn test_snapshots_restore_in_stack_order() {
        let mut store = DomainStore::from_domains(vec![vec![0, 1, 2], vec![3, 4]]);

        store.push_snapshot();
        assert!(store.retain(0, |&word| word != 1));
        store.push_snapshot();
        store.set(1, vec![]);

        assert_eq!(store.snapshot_depth(), 2);
        assert!(store.pop_snapshot());
        assert_eq!(store.domains(), &[vec![0, 2], vec![3, 4]]);
        assert!(store.pop_snapshot());
        assert_eq!(store.domains(), &[vec![0, 1, 2], vec![3, 4]]);
        assert!(!store.pop_snapshot());
    }

    #[test]
    fn test_retain_reports_shrinkage() {
        let mut store = DomainStore::from_domains(vec![vec![0, 1]]);
        assert!(!store.retain(0, |_| true));
        assert!(store.retain(0, |&word| word == 0));
        assert_eq!(store.get(0), &[0]);
    }

    #[test]
    fn test_initial_domains_from_prior_fill() {
        let across = Variable::new(0, 0, Direction::Across, 3);
        let down = Variable::new(0, 0, Direction::Down, 3);
        let prior = PriorAssignment::from([
            (across, vec![Some('c'), Some('o'), Some('d')]),
            (down, vec![Some('c'), None, Some('t')]),
        ]);
        let structure = vec![vec![true; 3]; 3];
        let crossword =
            Crossword::with_prior(3, 3, structure, ["cat", "cod", "cot", "dog"], &prior).unwrap();

        let across_id = crossword.variable_id(&across).unwrap();
        let down_id = crossword.variable_id(&down).unwrap();

        let loose = DomainStore::new(&crossword, false);
        assert_eq!(loose.get(across_id), &[1]);
        assert_eq!(loose.get(down_id), &[0, 1, 2, 3]);

        let strict = DomainStore::new(&crossword, true);
        assert_eq!(strict.get(across_id), &[1]);
        assert_eq!(strict.get(down_id), &[0, 2]);
    }
}
