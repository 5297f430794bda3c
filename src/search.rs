//! Backtracking search with maintained arc consistency.
//!
//! Slots are chosen by minimum remaining values, with ties going to the slot crossing the most
//! others, and words are tried least-constraining first. After every tentative choice we rerun
//! AC-3 on the arcs pointing into the chosen slot, and any slot left with a single candidate is
//! filled in on the spot. The domains are snapshotted before each choice and restored if the
//! branch fails.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use instant::{Duration, Instant};
use log::{debug, trace};

use crate::consistency::{ac3, enforce_node_consistency};
use crate::crossword::Crossword;
use crate::domains::DomainStore;
use crate::grid::Variable;
use crate::{VariableId, WordId};

/// Limits on how long a single solve may run. Running out is reported as
/// [`FillFailure::BudgetExhausted`], which says nothing about whether a fill exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_duration: Option<Duration>,

    /// Maximum number of search states (calls to `backtrack`).
    pub max_states: Option<u64>,
}

/// Options for a fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Forbid the same word in two different slots.
    pub distinct_words: bool,

    /// Restrict slots with some prefilled letters to words agreeing with them. Otherwise only
    /// completely prefilled slots are fixed.
    pub constrain_partial_entries: bool,

    pub budget: SearchBudget,
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub duration: Duration,
}

/// A (possibly partial) mapping from slots to words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    choices: Vec<Option<WordId>>,
}

impl Assignment {
    /// An empty assignment for a grid with `slot_count` slots.
    pub fn new(slot_count: usize) -> Assignment {
        Assignment { choices: vec![None; slot_count] }
    }

    pub fn get(&self, id: VariableId) -> Option<WordId> {
        self.choices[id]
    }

    pub fn is_assigned(&self, id: VariableId) -> bool {
        self.choices[id].is_some()
    }

    pub fn assign(&mut self, id: VariableId, word_id: WordId) {
        self.choices[id] = Some(word_id);
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.choices.iter().filter(|choice| choice.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assigned slots and their words, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, WordId)> + '_ {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(id, choice)| choice.map(|word_id| (id, word_id)))
    }

    /// The word chosen for `variable`, if any.
    pub fn word<'a>(&self, crossword: &'a Crossword, variable: &Variable) -> Option<&'a str> {
        let word_id = self.get(crossword.variable_id(variable)?)?;
        Some(crossword.word(word_id).string.as_str())
    }

    /// Resolve ids into slot and word values.
    pub fn entries(&self, crossword: &Crossword) -> Vec<(Variable, String)> {
        self.iter()
            .map(|(id, word_id)| (*crossword.variable(id), crossword.word(word_id).string.clone()))
            .collect()
    }
}

/// A successful fill.
#[derive(Debug, Clone)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

/// Why no fill was returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FillFailure {
    #[error("no fill exists for this grid and word list")]
    Unsatisfiable,

    #[error("search budget exhausted before a fill was found")]
    BudgetExhausted,
}

/// The live state of one solve. Owns its domains, so one solver must never be shared between
/// concurrent searches.
pub struct Solver<'a> {
    crossword: &'a Crossword,
    domains: DomainStore,
    config: SolverConfig,
    statistics: Statistics,
    start: Instant,
}

impl<'a> Solver<'a> {
    pub fn new(crossword: &'a Crossword, config: SolverConfig) -> Solver<'a> {
        Solver {
            crossword,
            domains: DomainStore::new(crossword, config.constrain_partial_entries),
            config,
            statistics: Statistics::default(),
            start: Instant::now(),
        }
    }

    pub fn domains(&self) -> &DomainStore {
        &self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Enforce node and arc consistency, then search.
    pub fn solve(mut self) -> Result<FillSuccess, FillFailure> {
        self.start = Instant::now();
        let slot_count = self.crossword.variables().len();

        enforce_node_consistency(self.crossword, &mut self.domains);
        if !ac3(self.crossword, &mut self.domains, None) {
            debug!("Initial arc consistency emptied a domain; no fill possible");
            return Err(FillFailure::Unsatisfiable);
        }
        debug!(
            "Starting search over {} slots with {} candidates left",
            slot_count,
            self.domains.domains().iter().map(Vec::len).sum::<usize>(),
        );

        let result = self.backtrack(Assignment::new(slot_count));
        self.statistics.duration = self.start.elapsed();
        debug!("Search finished: {:?}", self.statistics);

        match result? {
            Some(assignment) => Ok(FillSuccess { statistics: self.statistics, assignment }),
            None => Err(FillFailure::Unsatisfiable),
        }
    }

    /// True if every slot has a word.
    pub fn complete(&self, assignment: &Assignment) -> bool {
        (0..self.crossword.variables().len()).all(|id| assignment.is_assigned(id))
    }

    /// True if every assigned word fits its slot and agrees with every assigned crossing word
    /// (and, when configured, no word is used twice).
    pub fn consistent(&self, assignment: &Assignment) -> bool {
        let crossword = self.crossword;

        for (id, word_id) in assignment.iter() {
            if crossword.word(word_id).len() != crossword.variable(id).length {
                return false;
            }
        }

        for (x, word_x) in assignment.iter() {
            for &y in crossword.neighbors(x) {
                let word_y = match assignment.get(y) {
                    Some(word_y) => word_y,
                    None => continue,
                };

                if let Some(overlap) = crossword.overlap(x, y) {
                    let glyph_x = crossword.word(word_x).glyphs.get(overlap.first);
                    let glyph_y = crossword.word(word_y).glyphs.get(overlap.second);
                    if glyph_x != glyph_y {
                        return false;
                    }
                }
            }
        }

        if self.config.distinct_words {
            let mut seen: HashSet<WordId> = HashSet::with_capacity(assignment.len());
            if !assignment.iter().all(|(_, word_id)| seen.insert(word_id)) {
                return false;
            }
        }

        true
    }

    /// Pick the unassigned slot with the fewest remaining candidates, preferring slots that
    /// cross more others, then the earliest slot.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<VariableId> {
        (0..self.crossword.variables().len())
            .filter(|&id| !assignment.is_assigned(id))
            .min_by_key(|&id| (self.domains.len(id), Reverse(self.crossword.degree(id))))
    }

    /// The candidates for `variable`, ordered by how many options they would rule out for
    /// unassigned crossing slots, fewest first. Ties keep their domain order.
    pub fn order_domain_values(&self, variable: VariableId, assignment: &Assignment) -> Vec<WordId> {
        let crossword = self.crossword;

        // For each open crossing: which cell of ours it hits, how many candidates it has, and
        // how many of them have each letter in the shared cell.
        let crossings: Vec<(usize, usize, HashMap<char, usize>)> = crossword
            .neighbors(variable)
            .iter()
            .filter(|&&neighbor| !assignment.is_assigned(neighbor))
            .filter_map(|&neighbor| {
                let overlap = crossword.overlap(variable, neighbor)?;
                let mut glyph_counts: HashMap<char, usize> = HashMap::new();

                for &word_id in self.domains.get(neighbor) {
                    if let Some(&glyph) = crossword.word(word_id).glyphs.get(overlap.second) {
                        *glyph_counts.entry(glyph).or_insert(0) += 1;
                    }
                }

                Some((overlap.first, self.domains.len(neighbor), glyph_counts))
            })
            .collect();

        let mut values = self.domains.get(variable).to_vec();
        values.sort_by_cached_key(|&word_id| {
            let glyphs = &crossword.word(word_id).glyphs;

            crossings
                .iter()
                .map(|(cell_idx, option_count, glyph_counts)| {
                    let compatible = glyphs
                        .get(*cell_idx)
                        .and_then(|glyph| glyph_counts.get(glyph))
                        .copied()
                        .unwrap_or(0);
                    option_count - compatible
                })
                .sum::<usize>()
        });

        values
    }

    /// Pin `variable` to its assigned word and make its open crossings arc-consistent with it.
    /// If that succeeds, every open slot left with exactly one candidate is assigned too.
    /// Returns false if some domain was emptied.
    pub fn inference(&mut self, variable: VariableId, assignment: &mut Assignment) -> bool {
        let crossword = self.crossword;
        let word_id = match assignment.get(variable) {
            Some(word_id) => word_id,
            None => return false,
        };

        let arcs: Vec<(VariableId, VariableId)> = crossword
            .neighbors(variable)
            .iter()
            .filter(|&&neighbor| !assignment.is_assigned(neighbor))
            .map(|&neighbor| (neighbor, variable))
            .collect();

        self.domains.set(variable, vec![word_id]);

        if !ac3(crossword, &mut self.domains, Some(arcs)) {
            return false;
        }

        for id in 0..crossword.variables().len() {
            if !assignment.is_assigned(id) && self.domains.len(id) == 1 {
                assignment.assign(id, self.domains.get(id)[0]);
            }
        }

        true
    }

    /// Extend `assignment` to a complete, consistent one, or return `None` if that can't be
    /// done from here.
    pub fn backtrack(&mut self, assignment: Assignment) -> Result<Option<Assignment>, FillFailure> {
        self.statistics.states += 1;
        self.check_budget()?;

        if self.consistent(&assignment) && self.complete(&assignment) {
            return Ok(Some(assignment));
        }

        // Everything is assigned but something disagrees.
        let variable = match self.select_unassigned_variable(&assignment) {
            Some(variable) => variable,
            None => return Ok(None),
        };

        for value in self.order_domain_values(variable, &assignment) {
            let mut candidate = assignment.clone();
            candidate.assign(variable, value);

            if !self.consistent(&candidate) {
                continue;
            }

            trace!(
                "Trying {} = {} at depth {}",
                self.crossword.variable(variable),
                self.crossword.word(value).string,
                self.domains.snapshot_depth(),
            );

            self.domains.push_snapshot();

            if self.inference(variable, &mut candidate) && self.consistent(&candidate) {
                if let Some(result) = self.backtrack(candidate)? {
                    return Ok(Some(result));
                }
            }

            self.domains.pop_snapshot();
            self.statistics.backtracks += 1;
        }

        Ok(None)
    }

    fn check_budget(&self) -> Result<(), FillFailure> {
        let budget = &self.config.budget;

        let out_of_states = budget
            .max_states
            .map(|max_states| self.statistics.states > max_states)
            .unwrap_or(false);
        let out_of_time = budget
            .max_duration
            .map(|max_duration| self.start.elapsed() >= max_duration)
            .unwrap_or(false);

        if out_of_states || out_of_time {
            debug!("Giving up after {} states", self.statistics.states);
            return Err(FillFailure::BudgetExhausted);
        }

        Ok(())
    }
}

/// Search for a valid fill for the given crossword.
pub fn find_fill(crossword: &Crossword, config: SolverConfig) -> Result<FillSuccess, FillFailure> {
    Solver::new(crossword, config).solve()
}
