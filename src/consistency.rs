//! Domain reduction without guessing: node consistency and AC-3.

use std::collections::{HashSet, VecDeque};

use bit_set::BitSet;
use log::trace;

use crate::crossword::Crossword;
use crate::domains::DomainStore;
use crate::VariableId;

/// Drop every word whose length doesn't match its slot.
pub fn enforce_node_consistency(crossword: &Crossword, domains: &mut DomainStore) {
    for (id, variable) in crossword.variables().iter().enumerate() {
        domains.retain(id, |&word_id| crossword.word(word_id).len() == variable.length);
    }
}

/// Make `x` arc-consistent with `y`: remove every word from `x`'s domain that has no partner in
/// `y`'s domain agreeing on the shared cell. Returns whether `x`'s domain shrank. Slots that
/// don't cross are left alone.
pub fn revise(crossword: &Crossword, domains: &mut DomainStore, x: VariableId, y: VariableId) -> bool {
    let overlap = match crossword.overlap(x, y) {
        Some(overlap) => overlap,
        None => return false,
    };

    let supported: HashSet<char> = domains
        .get(y)
        .iter()
        .filter_map(|&word_id| crossword.word(word_id).glyphs.get(overlap.second).copied())
        .collect();

    domains.retain(x, |&word_id| {
        crossword
            .word(word_id)
            .glyphs
            .get(overlap.first)
            .map(|glyph| supported.contains(glyph))
            .unwrap_or(false)
    })
}

/// Run AC-3 until no domain changes. The queue starts with `arcs`, or with every crossing pair
/// in the grid if `arcs` is `None`. Returns false as soon as any domain is emptied.
///
/// An arc that is already waiting in the queue isn't added again.
pub fn ac3(
    crossword: &Crossword,
    domains: &mut DomainStore,
    arcs: Option<Vec<(VariableId, VariableId)>>,
) -> bool {
    let n = crossword.variables().len();
    let arcs = arcs.unwrap_or_else(|| crossword.arcs());

    let mut queued = BitSet::with_capacity(n * n);
    let mut queue: VecDeque<(VariableId, VariableId)> = VecDeque::with_capacity(arcs.len());
    for (x, y) in arcs {
        if queued.insert(x * n + y) {
            queue.push_back((x, y));
        }
    }

    let mut revisions = 0usize;

    while let Some((x, y)) = queue.pop_front() {
        queued.remove(x * n + y);

        if x == y || crossword.overlap(x, y).is_none() {
            continue;
        }

        if !revise(crossword, domains, x, y) {
            continue;
        }
        revisions += 1;

        if domains.is_empty(x) {
            trace!("AC-3 emptied {} after {} revisions", crossword.variable(x), revisions);
            return false;
        }

        // Shrinking x may have removed the only support for words in x's other neighbors.
        for &z in crossword.neighbors(x) {
            if z != y && queued.insert(z * n + x) {
                queue.push_back((z, x));
            }
        }
    }

    trace!("AC-3 reached a fixpoint after {} revisions", revisions);
    true
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    use super::*;
    use crate::grid::{Direction, Variable};

    /// ...
    /// .#.
    /// ...
    fn ring_crossword(vocabulary: &[&str]) -> Crossword {
        let structure = vec![vec![true; 3], vec![true, false, true], vec![true; 3]];
        Crossword::new(3, 3, structure, vocabulary).unwrap()
    }

    fn words(crossword: &Crossword, domains: &DomainStore, variable: Variable) -> Vec<String> {
        let id = crossword.variable_id(&variable).unwrap();
        domains.get(id).iter().map(|&word_id| crossword.word(word_id).string.clone()).collect()
    }

    #[test]
    fn test_node_consistency_filters_by_length_and_is_idempotent() {
        let crossword = ring_crossword(&["cat", "at", "tops", "dog"]);
        let mut domains = DomainStore::new(&crossword, false);

        enforce_node_consistency(&crossword, &mut domains);
        let once = domains.domains().to_vec();
        enforce_node_consistency(&crossword, &mut domains);

        assert_eq!(domains.domains(), &once[..]);
        for id in 0..crossword.variables().len() {
            assert_eq!(domains.get(id), &[0, 3]);
        }
    }

    #[test]
    fn test_revise() {
        // Across (0, 0) and down (0, 0) share their first cell.
        let crossword = ring_crossword(&["cat", "dog", "cow"]);
        let across = crossword.variable_id(&Variable::new(0, 0, Direction::Across, 3)).unwrap();
        let down = crossword.variable_id(&Variable::new(0, 0, Direction::Down, 3)).unwrap();
        let mut domains = DomainStore::new(&crossword, false);
        enforce_node_consistency(&crossword, &mut domains);

        domains.set(down, vec![1]);
        assert!(revise(&crossword, &mut domains, across, down));
        assert_eq!(domains.get(across), &[1]);

        // Already consistent, so nothing changes.
        assert!(!revise(&crossword, &mut domains, across, down));

        // These two are parallel and never meet.
        let bottom = crossword.variable_id(&Variable::new(2, 0, Direction::Across, 3)).unwrap();
        assert!(!revise(&crossword, &mut domains, across, bottom));
    }

    #[test]
    fn test_ac3_fails_when_a_domain_empties() {
        // No word starts with the last letter of another.
        let crossword = ring_crossword(&["cat", "dog"]);
        let mut domains = DomainStore::new(&crossword, false);
        enforce_node_consistency(&crossword, &mut domains);

        assert!(!ac3(&crossword, &mut domains, None));
    }

    #[test]
    fn test_ac3_prunes_unsupported_words() {
        // A ring of four slots: the top and left slots start with the same letter, the right
        // slot starts where the top one ends, and so on.
        let crossword = ring_crossword(&["tot", "tat", "abc"]);
        let mut domains = DomainStore::new(&crossword, false);
        enforce_node_consistency(&crossword, &mut domains);

        assert!(ac3(&crossword, &mut domains, None));
        for variable in crossword.variables() {
            assert_eq!(words(&crossword, &domains, *variable), vec!["TOT", "TAT"]);
        }
    }

    #[test]
    fn test_ac3_is_confluent_under_shuffled_queues() {
        let vocabulary = [
            "cat", "cot", "tab", "tub", "bat", "but", "cab", "cub", "tic", "bit", "act", "arc",
        ];
        let crossword = ring_crossword(&vocabulary);

        let mut reference = DomainStore::new(&crossword, false);
        enforce_node_consistency(&crossword, &mut reference);
        assert!(ac3(&crossword, &mut reference, None));

        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut arcs = crossword.arcs();
            arcs.shuffle(&mut rng);

            let mut domains = DomainStore::new(&crossword, false);
            enforce_node_consistency(&crossword, &mut domains);
            assert!(ac3(&crossword, &mut domains, Some(arcs)));

            assert_eq!(domains.domains(), reference.domains());
        }
    }

    #[test]
    fn test_ac3_with_partial_arcs_only_touches_reachable_slots() {
        let crossword = ring_crossword(&["cat", "cot", "tab", "dog"]);
        let mut domains = DomainStore::new(&crossword, false);
        enforce_node_consistency(&crossword, &mut domains);

        let top = crossword.variable_id(&Variable::new(0, 0, Direction::Across, 3)).unwrap();
        let left = crossword.variable_id(&Variable::new(0, 0, Direction::Down, 3)).unwrap();
        domains.set(top, vec![0]);

        // Skipped: same slot, and a pair that doesn't cross.
        let bottom = crossword.variable_id(&Variable::new(2, 0, Direction::Across, 3)).unwrap();
        assert!(ac3(&crossword, &mut domains, Some(vec![(top, top), (bottom, top)])));
        assert_eq!(domains.get(left).len(), 4);

        assert!(ac3(&crossword, &mut domains, Some(vec![(left, top)])));
        assert_eq!(words(&crossword, &domains, Variable::new(0, 0, Direction::Down, 3)), vec!["CAT", "COT"]);
    }
}
