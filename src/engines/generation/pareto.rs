//! Two-objective dominance and the per-slot replacement policy built on it.
//! Both objectives are minimised.

use crate::types::FitnessScore;

/// Check if score A dominates score B
/// A dominates B if A is no worse than B in both objectives and strictly better in at least one
pub fn dominates(a: &FitnessScore, b: &FitnessScore) -> bool {
    let mut at_least_one_better = false;

    for (a_val, b_val) in a.objectives().into_iter().zip(b.objectives()) {
        if b_val < a_val {
            // B is better in this objective, so A does not dominate B
            return false;
        }
        if a_val < b_val {
            at_least_one_better = true;
        }
    }

    at_least_one_better
}

/// Where a slot of the next generation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChoice {
    /// The pool individual at this index survives.
    Retained(usize),
    /// The offspring at this index takes over the slot.
    Replaced(usize),
}

/// Per-slot replacement: slot `i` goes to the first unclaimed offspring that
/// dominates pool individual `i`, otherwise the pool individual stays.
///
/// Each offspring is claimed at most once. The result always has one entry
/// per pool slot.
pub fn select_next_generation(pool: &[FitnessScore], offspring: &[FitnessScore]) -> Vec<SlotChoice> {
    let mut claimed = vec![false; offspring.len()];

    pool.iter()
        .enumerate()
        .map(|(i, incumbent)| {
            let challenger = offspring
                .iter()
                .enumerate()
                .position(|(j, candidate)| !claimed[j] && dominates(candidate, incumbent));

            match challenger {
                Some(j) => {
                    claimed[j] = true;
                    SlotChoice::Replaced(j)
                }
                None => SlotChoice::Retained(i),
            }
        })
        .collect()
}

/// Index of the best score: starting from the first, a later score takes
/// over only when it dominates the current best.
pub fn best_index(scores: &[FitnessScore]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, score) in scores.iter().enumerate() {
        match best {
            Some(b) if !dominates(score, &scores[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}
