use crate::config::AppConfig;
use crate::data::filing::{self, SnapshotFiles};
use crate::data::MemoizationStore;
use crate::engines::evaluation::{FitnessEvaluator, Simulator};
use crate::engines::generation::{
    geometry::Geometry,
    operators::{crossover, mutate, sample_within_boundary, select_parents},
    pareto::{self, SlotChoice},
};
use crate::error::{Result, SearchError};
use crate::types::{FitnessScore, Individual};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// When `search` stops. Checked only at generation boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCriterion {
    /// Stop once the wall-clock time since `search` started reaches the budget.
    TimeBudget(Duration),
    /// Stop once the best score is `<=` the threshold in both components.
    /// Wall-clock time is not checked.
    Convergence(FitnessScore),
}

impl StopCriterion {
    /// Time budget in minutes. Negative or NaN budgets are zero; budgets too
    /// large for a `Duration` saturate to `Duration::MAX`.
    pub fn minutes(minutes: f64) -> Self {
        let seconds = (minutes * 60.0).max(0.0);
        StopCriterion::TimeBudget(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    TimeBudget,
    Converged,
    GenerationLimit,
}

/// Which generation list an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cohort {
    Population,
    Offspring,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationStats {
    pub simulations: usize,
    pub cache_hits: usize,
}

#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// 1-based count of completed generations in this `search` call.
    pub generation: usize,
    pub sweep_time: Duration,
    pub elapsed: Duration,
    pub best_fitness: Option<FitnessScore>,
    pub replaced: usize,
    pub population_size: usize,
    pub stats: EvaluationStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub generations: usize,
    pub stop_reason: StopReason,
    pub best: Option<Individual>,
    pub best_fitness: Option<FitnessScore>,
    pub stats: EvaluationStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
    fn on_individual_evaluated(&mut self, evaluated: usize, total: usize, cached: bool);
}

/// Steady-state genetic search over an externally simulated design.
///
/// Owns the population and offspring lists, the explored-design cache and
/// the resumable snapshot files. Every state change is written to disk
/// before the next expensive step, so a restarted process picks up where
/// the previous one stopped.
pub struct SearchEngine<G: Geometry, S: Simulator> {
    config: AppConfig,
    geometry: G,
    simulator: S,
    evaluator: FitnessEvaluator,
    store: MemoizationStore,
    files: SnapshotFiles,
    population: Vec<Individual>,
    offspring: Vec<Individual>,
    best: Option<(Individual, FitnessScore)>,
    stats: EvaluationStats,
    rng: StdRng,
}

impl<G: Geometry, S: Simulator> SearchEngine<G, S> {
    /// Validates the configuration, opens the storage directory and loads or
    /// creates the initial population.
    pub fn new(config: &AppConfig, geometry: G, simulator: S) -> Result<Self> {
        config.validate()?;
        if geometry.dimension() == 0 {
            return Err(SearchError::Configuration(
                "Geometry must expose at least one parameter".to_string(),
            ));
        }

        let evaluator = FitnessEvaluator::new(config.objectives.bands.clone())?;
        let files = SnapshotFiles::prepare(&config.storage)?;
        let store = MemoizationStore::open(&files.explored);
        let rng = match config.search.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut engine = Self {
            config: config.clone(),
            geometry,
            simulator,
            evaluator,
            store,
            files,
            population: Vec::new(),
            offspring: Vec::new(),
            best: None,
            stats: EvaluationStats::default(),
            rng,
        };
        engine.initialize_population()?;
        Ok(engine)
    }

    /// Run the search until `stop` (or `search.max_generations`) is reached.
    pub fn search<C: ProgressCallback>(
        &mut self,
        stop: StopCriterion,
        callback: &mut C,
    ) -> Result<SearchReport> {
        let start = Instant::now();
        let started_at = Utc::now();

        self.ensure_evaluated(Cohort::Population, callback)?;

        match self.load_cohort(&self.files.offspring, self.config.search.number_of_offspring) {
            Some(saved) => {
                log::info!("Resuming {} offspring from {}", saved.len(), self.files.offspring.display());
                self.offspring = saved;
            }
            None => {
                let pool_fitness = self.fitness_of(&self.population)?;
                self.generate_offspring(&pool_fitness)?;
            }
        }

        let mut generation = 0;
        loop {
            let sweep_start = Instant::now();
            callback.on_generation_start(generation);

            self.ensure_evaluated(Cohort::Offspring, callback)?;

            let pool_fitness = self.fitness_of(&self.population)?;
            let offspring_fitness = self.fitness_of(&self.offspring)?;
            self.track_best(&pool_fitness, &offspring_fitness);

            let choices = pareto::select_next_generation(&pool_fitness, &offspring_fitness);
            let mut next_generation = Vec::with_capacity(choices.len());
            let mut next_fitness = Vec::with_capacity(choices.len());
            let mut replaced = 0;
            for choice in choices {
                match choice {
                    SlotChoice::Retained(i) => {
                        next_generation.push(self.population[i].clone());
                        next_fitness.push(pool_fitness[i]);
                    }
                    SlotChoice::Replaced(j) => {
                        next_generation.push(self.offspring[j].clone());
                        next_fitness.push(offspring_fitness[j]);
                        replaced += 1;
                    }
                }
            }
            self.population = next_generation;

            filing::append_line(&self.files.fitness, &next_fitness)?;
            filing::save_snapshot(&self.files.population, &self.population)?;

            self.generate_offspring(&next_fitness)?;
            generation += 1;

            let summary = GenerationSummary {
                generation,
                sweep_time: sweep_start.elapsed(),
                elapsed: start.elapsed(),
                best_fitness: self.best_fitness(),
                replaced,
                population_size: self.population.len(),
                stats: self.stats,
            };
            log::info!(
                "Generation {} finished: {} of {} slots replaced, {} simulations, {} cache hits",
                generation,
                replaced,
                summary.population_size,
                self.stats.simulations,
                self.stats.cache_hits
            );
            callback.on_generation_complete(&summary);

            if let Some(stop_reason) = self.stop_reason(&stop, start.elapsed(), generation) {
                log::info!("Search stopped after {} generations: {:?}", generation, stop_reason);
                return Ok(SearchReport {
                    generations: generation,
                    stop_reason,
                    best: self.best.as_ref().map(|(individual, _)| individual.clone()),
                    best_fitness: self.best_fitness(),
                    stats: self.stats,
                    started_at,
                    finished_at: Utc::now(),
                });
            }
        }
    }

    /// Fills in every missing simulation result of `cohort`, in list order.
    ///
    /// The explored-design cache is consulted first; only misses reach the
    /// simulator, and each new result is added to the cache. The cohort's
    /// snapshot is rewritten after every newly populated individual. Already
    /// evaluated individuals are left untouched, so repeated calls are no-ops.
    pub fn ensure_evaluated<C: ProgressCallback>(
        &mut self,
        cohort: Cohort,
        callback: &mut C,
    ) -> Result<()> {
        let path = self.snapshot_path(cohort);
        let total = self.cohort(cohort).len();

        for i in 0..total {
            if self.cohort(cohort)[i].is_evaluated() {
                continue;
            }
            let parameters = self.cohort(cohort)[i].parameters.clone();

            let (result, cached) = match self.store.lookup(&parameters) {
                Some(result) => {
                    log::debug!("Cache hit for {:?}", parameters);
                    self.stats.cache_hits += 1;
                    (result.clone(), true)
                }
                None => {
                    log::debug!("Simulating {:?}", parameters);
                    let result = self
                        .simulator
                        .simulate(&parameters)
                        .map_err(SearchError::Simulator)?;
                    result.validate()?;
                    self.store.insert(&parameters, &result)?;
                    self.stats.simulations += 1;
                    (result, false)
                }
            };

            self.cohort_mut(cohort)[i].result = Some(result);
            filing::save_snapshot(&path, self.cohort(cohort))?;
            callback.on_individual_evaluated(i + 1, total, cached);
        }
        Ok(())
    }

    fn initialize_population(&mut self) -> Result<()> {
        let size = self.config.search.population_size;
        if let Some(saved) = self.load_cohort(&self.files.population, size) {
            log::info!("Loaded population of {} from {}", size, self.files.population.display());
            self.population = saved;
            return Ok(());
        }

        log::info!("Generating a fresh population of {}", size);
        let attempts = self.config.search.sample_attempts;
        self.population = (0..size)
            .map(|_| Individual::new(sample_within_boundary(&self.geometry, attempts, &mut self.rng)))
            .collect();
        filing::save_snapshot(&self.files.population, &self.population)
    }

    /// Reads a snapshot, treating it as absent when its size is wrong, a
    /// vector lies outside the geometry, or a stored result fails validation.
    fn load_cohort(&self, path: &Path, expected: usize) -> Option<Vec<Individual>> {
        let saved = filing::read_snapshot(path)?;
        if saved.len() != expected {
            log::info!(
                "Discarding stale snapshot {} ({} individuals, expected {})",
                path.display(),
                saved.len(),
                expected
            );
            return None;
        }

        for (i, individual) in saved.iter().enumerate() {
            if let Err(violation) = self.geometry.check_boundary(&individual.parameters) {
                log::info!("Discarding stale snapshot {}: individual {} {}", path.display(), i, violation);
                return None;
            }
            if let Some(Err(e)) = individual.result.as_ref().map(|r| r.validate()) {
                log::info!("Discarding corrupt snapshot {}: individual {} {}", path.display(), i, e);
                return None;
            }
        }
        Some(saved)
    }

    fn generate_offspring(&mut self, pool_fitness: &[FitnessScore]) -> Result<()> {
        let search = &self.config.search;
        let mut parents = select_parents(pool_fitness, search.number_of_offspring, &mut self.rng);
        log::debug!("Selected parents {:?}", parents);

        let mut offspring = crossover(
            &self.population,
            &mut parents,
            search.number_of_offspring,
            search.crossover_rate,
            search.repair_attempts,
            search.sample_attempts,
            &self.geometry,
            &mut self.rng,
        );
        mutate(
            &mut offspring,
            search.mutation_rate,
            search.sample_attempts,
            &self.geometry,
            &mut self.rng,
        );

        self.offspring = offspring;
        filing::save_snapshot(&self.files.offspring, &self.offspring)
    }

    fn fitness_of(&self, individuals: &[Individual]) -> Result<Vec<FitnessScore>> {
        individuals
            .iter()
            .enumerate()
            .map(|(i, individual)| self.evaluator.evaluate_individual(i, individual))
            .collect()
    }

    fn track_best(&mut self, pool_fitness: &[FitnessScore], offspring_fitness: &[FitnessScore]) {
        let incumbent = self.best.as_ref().map(|(_, score)| *score);
        let offset = usize::from(incumbent.is_some());
        let scores: Vec<FitnessScore> = incumbent
            .into_iter()
            .chain(pool_fitness.iter().copied())
            .chain(offspring_fitness.iter().copied())
            .collect();

        let winner = match pareto::best_index(&scores) {
            Some(winner) if winner >= offset => winner,
            _ => return,
        };
        let candidate = winner - offset;
        let individual = match candidate.checked_sub(self.population.len()) {
            None => &self.population[candidate],
            Some(j) => &self.offspring[j],
        };
        self.best = Some((individual.clone(), scores[winner]));
    }

    fn stop_reason(&self, stop: &StopCriterion, elapsed: Duration, generation: usize) -> Option<StopReason> {
        let criterion_met = match stop {
            StopCriterion::TimeBudget(budget) => elapsed >= *budget,
            StopCriterion::Convergence(threshold) => self
                .best_fitness()
                .map_or(false, |best| best.within(threshold)),
        };
        if criterion_met {
            return Some(match stop {
                StopCriterion::TimeBudget(_) => StopReason::TimeBudget,
                StopCriterion::Convergence(_) => StopReason::Converged,
            });
        }

        match self.config.search.max_generations {
            Some(limit) if generation >= limit => Some(StopReason::GenerationLimit),
            _ => None,
        }
    }

    fn snapshot_path(&self, cohort: Cohort) -> PathBuf {
        match cohort {
            Cohort::Population => self.files.population.clone(),
            Cohort::Offspring => self.files.offspring.clone(),
        }
    }

    fn cohort(&self, cohort: Cohort) -> &Vec<Individual> {
        match cohort {
            Cohort::Population => &self.population,
            Cohort::Offspring => &self.offspring,
        }
    }

    fn cohort_mut(&mut self, cohort: Cohort) -> &mut Vec<Individual> {
        match cohort {
            Cohort::Population => &mut self.population,
            Cohort::Offspring => &mut self.offspring,
        }
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn offspring(&self) -> &[Individual] {
        &self.offspring
    }

    /// Best individual seen so far, by dominance, across population and offspring.
    pub fn best(&self) -> Option<&(Individual, FitnessScore)> {
        self.best.as_ref()
    }

    pub fn best_fitness(&self) -> Option<FitnessScore> {
        self.best.as_ref().map(|(_, score)| *score)
    }

    pub fn stats(&self) -> EvaluationStats {
        self.stats
    }

    pub fn store(&self) -> &MemoizationStore {
        &self.store
    }

    pub fn files(&self) -> &SnapshotFiles {
        &self.files
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
