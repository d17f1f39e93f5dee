use super::evolution_engine::{GenerationSummary, ProgressCallback};

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        println!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        let best = summary
            .best_fitness
            .map(|score| score.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "Generation {} complete in {:.2} min (total {:.2} min). Best fitness: {}, replaced {}/{}",
            summary.generation,
            summary.sweep_time.as_secs_f64() / 60.0,
            summary.elapsed.as_secs_f64() / 60.0,
            best,
            summary.replaced,
            summary.population_size
        );
    }

    fn on_individual_evaluated(&mut self, evaluated: usize, total: usize, cached: bool) {
        if !cached {
            println!("  Simulated {}/{}", evaluated, total);
        }
    }
}

/// Ignores every event.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _summary: &GenerationSummary) {}

    fn on_individual_evaluated(&mut self, _evaluated: usize, _total: usize, _cached: bool) {}
}
