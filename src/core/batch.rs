//! Running several preset scenarios side by side for comparison.

use super::config::{ConcurrencyMode, SimulationConfig};
use super::errors::WorkshopError;
use super::scenario::RunSource;
use super::simulation_engine::{run_simulation, RunReport};
use log::warn;
use rayon::prelude::*;

/// Run each preset in `ids` with the same configuration.
///
/// Results come back in the order of `ids`, one per preset, whatever the
/// concurrency mode.
pub fn run_presets(ids: &[u32], config: &SimulationConfig) -> Vec<Result<RunReport, WorkshopError>> {
    let run_one = |id: &u32| run_simulation(RunSource::Preset(*id), config);

    match config.concurrency_mode {
        ConcurrencyMode::Sequential => ids.iter().map(run_one).collect(),
        ConcurrencyMode::Rayon => match config.thread_pool_size {
            Some(size) => match rayon::ThreadPoolBuilder::new().num_threads(size).build() {
                Ok(pool) => pool.install(|| ids.par_iter().map(run_one).collect()),
                Err(err) => {
                    warn!("Falling back to the global Rayon pool: {}", err);
                    ids.par_iter().map(run_one).collect()
                }
            },
            None => ids.par_iter().map(run_one).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_follow_input_order() {
        let config = SimulationConfig::new().with_concurrency(ConcurrencyMode::Rayon);
        let results = run_presets(&[4, 1, 9, 2], &config);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().statistics.total_vehicles, 12);
        assert_eq!(results[1].as_ref().unwrap().statistics.total_vehicles, 8);
        assert_eq!(results[2].as_ref().unwrap_err(), &WorkshopError::UnknownScenario(9));
        assert_eq!(results[3].as_ref().unwrap().statistics.total_vehicles, 16);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ids = [1, 2, 3, 4, 5];
        let sequential = run_presets(&ids, &SimulationConfig::new());
        let parallel = run_presets(
            &ids,
            &SimulationConfig::new()
                .with_concurrency(ConcurrencyMode::Rayon)
                .with_thread_pool_size(2),
        );

        for (seq, par) in sequential.iter().zip(parallel.iter()) {
            let seq = seq.as_ref().unwrap();
            let par = par.as_ref().unwrap();
            assert_eq!(seq.statistics, par.statistics);
            assert_ne!(seq.run_id, par.run_id);
        }
    }
}
