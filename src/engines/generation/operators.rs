use super::geometry::Geometry;
use crate::types::{FitnessScore, Individual, ParameterVector};
use rand::seq::SliceRandom;
use rand::Rng;

/// Failed draws tolerated per parent slot before a duplicate is forced.
pub const PARENT_SELECTION_TRIES: usize = 999;

/// Random sample revalidated against the explore space.
///
/// After `attempts` rejected samples a fresh one is returned unchecked.
pub fn sample_within_boundary<G, R>(geometry: &G, attempts: usize, rng: &mut R) -> ParameterVector
where
    G: Geometry,
    R: Rng + ?Sized,
{
    for _ in 0..attempts {
        let candidate = geometry.random_sample(rng);
        if geometry.check_boundary(&candidate).is_ok() {
            return candidate;
        }
    }
    let fallback = geometry.random_sample(rng);
    if let Err(violation) = geometry.check_boundary(&fallback) {
        log::warn!(
            "No in-boundary sample after {} attempts, keeping fallback: {}",
            attempts,
            violation
        );
    }
    fallback
}

/// Roulette over pool indices with acceptance `1 - fitness_i / total`.
///
/// Indices are visited cyclically until `2 * number_of_offspring` distinct
/// parents are accepted. Each parent slot gets [`PARENT_SELECTION_TRIES`]
/// rejections before the current index is taken as a duplicate, so the
/// result always has exactly `2 * number_of_offspring` entries.
pub fn select_parents<R: Rng + ?Sized>(
    fitness: &[FitnessScore],
    number_of_offspring: usize,
    rng: &mut R,
) -> Vec<usize> {
    let needed = number_of_offspring * 2;
    if fitness.is_empty() {
        return Vec::new();
    }

    let mut total: f64 = fitness.iter().map(FitnessScore::total).sum();
    if total == 0.0 || !total.is_finite() {
        total = 1.0;
    }

    let mut selected: Vec<usize> = Vec::with_capacity(needed);
    let mut tries = PARENT_SELECTION_TRIES;
    let mut index = 0;

    while selected.len() < needed {
        let acceptance = 1.0 - fitness[index].total() / total;
        let acceptance = if acceptance.is_nan() { 0.0 } else { acceptance.clamp(0.0, 1.0) };
        if rng.gen_bool(acceptance) && !selected.contains(&index) {
            selected.push(index);
        } else {
            tries -= 1;
            if tries == 0 {
                log::warn!("Forcing duplicate parent {} after {} tries", index, PARENT_SELECTION_TRIES);
                selected.push(index);
                tries = PARENT_SELECTION_TRIES;
            }
        }
        index = (index + 1) % fitness.len();
    }

    selected
}

/// Uniform crossover between rotating parent pairs, followed by boundary repair.
///
/// Child `i` takes each gene from parent `parents[i % n]` with probability
/// `crossover_rate`, otherwise from the next parent in the list. A child
/// outside the explore space gets up to `repair_attempts` single-gene
/// resamples and is then replaced by a fresh sample. `parents` is shuffled
/// after every child.
#[allow(clippy::too_many_arguments)]
pub fn crossover<G, R>(
    pool: &[Individual],
    parents: &mut [usize],
    number_of_offspring: usize,
    crossover_rate: f64,
    repair_attempts: usize,
    sample_attempts: usize,
    geometry: &G,
    rng: &mut R,
) -> Vec<Individual>
where
    G: Geometry,
    R: Rng + ?Sized,
{
    if parents.is_empty() {
        return Vec::new();
    }

    let mut offspring = Vec::with_capacity(number_of_offspring);
    for i in 0..number_of_offspring {
        let slot = i % parents.len();
        let first = &pool[parents[slot]].parameters;
        let second = &pool[parents[(slot + 1) % parents.len()]].parameters;

        let mut child: ParameterVector = first
            .iter()
            .zip(second)
            .map(|(a, b)| if rng.gen_bool(crossover_rate) { *a } else { *b })
            .collect();
        geometry.round(&mut child);

        repair(&mut child, repair_attempts, sample_attempts, geometry, rng);
        offspring.push(Individual::new(child));

        parents.shuffle(rng);
    }
    offspring
}

fn repair<G, R>(
    child: &mut ParameterVector,
    repair_attempts: usize,
    sample_attempts: usize,
    geometry: &G,
    rng: &mut R,
) where
    G: Geometry,
    R: Rng + ?Sized,
{
    for _ in 0..repair_attempts {
        match geometry.check_boundary(child) {
            Ok(()) => return,
            Err(violation) => {
                log::debug!("Repairing crossover child: {}", violation);
                let index = rng.gen_range(0..child.len());
                child[index] = geometry.random_gene(index, rng);
            }
        }
    }
    if geometry.check_boundary(child).is_err() {
        *child = sample_within_boundary(geometry, sample_attempts, rng);
    }
}

/// Mutation applied to a single gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOperator {
    Increment,
    Decrement,
    ResampleGene,
    ResampleVector,
}

impl MutationOperator {
    pub const ALL: [MutationOperator; 4] = [
        MutationOperator::Increment,
        MutationOperator::Decrement,
        MutationOperator::ResampleGene,
        MutationOperator::ResampleVector,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Per-gene mutation with probability `mutation_rate`, operator picked at random.
///
/// Steps that would leave the explore space are reverted; a resampled gene
/// is retried up to `sample_attempts` times and otherwise restored. Any
/// stale simulation result on a mutated individual is dropped.
pub fn mutate<G, R>(
    offspring: &mut [Individual],
    mutation_rate: f64,
    sample_attempts: usize,
    geometry: &G,
    rng: &mut R,
) where
    G: Geometry,
    R: Rng + ?Sized,
{
    for individual in offspring.iter_mut() {
        let mut changed = false;
        for index in 0..individual.parameters.len() {
            if !rng.gen_bool(mutation_rate) {
                continue;
            }
            let parameters = &mut individual.parameters;
            changed |= match MutationOperator::random(rng) {
                MutationOperator::Increment => geometry.increment(parameters, index),
                MutationOperator::Decrement => geometry.decrement(parameters, index),
                MutationOperator::ResampleGene => {
                    resample_gene(parameters, index, sample_attempts, geometry, rng)
                }
                MutationOperator::ResampleVector => {
                    *parameters = sample_within_boundary(geometry, sample_attempts, rng);
                    true
                }
            };
        }
        if changed {
            individual.result = None;
        }
    }
}

fn resample_gene<G, R>(
    parameters: &mut [f64],
    index: usize,
    attempts: usize,
    geometry: &G,
    rng: &mut R,
) -> bool
where
    G: Geometry,
    R: Rng + ?Sized,
{
    let previous = parameters[index];
    for _ in 0..attempts {
        parameters[index] = geometry.random_gene(index, rng);
        if geometry.check_boundary(parameters).is_ok() {
            return true;
        }
    }
    parameters[index] = previous;
    false
}
