use super::arrivals::ArrivalGenerator;
use super::config::CampsiteConfig;
use super::distributions::ArrivalSampler;
use super::model::{Campsite, CampsiteWorld};
use super::statistics::{AggregateResult, RunResult};
use crate::core::errors::SimResult;
use crate::core::execution::ConcurrencyMode;
use crate::core::simulation_engine::SimulationEngine;
use crate::core::types::SimTime;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::Arc;

/// Seed of run `index` derived from the experiment's base seed.
/// Run 0 uses the base seed unchanged.
pub fn derive_run_seed(base_seed: u64, index: usize) -> u64 {
    base_seed ^ (index as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// Executes independent runs and averages them.
///
/// Every run gets its own engine, campsite, statistics and random source.
pub struct ExperimentRunner {
    config: Arc<CampsiteConfig>,
    sampler: Arc<ArrivalSampler>,
}

impl ExperimentRunner {
    /// Validate `config` and prepare the sampling distributions.
    /// Fails before any simulated time advances.
    pub fn new(config: CampsiteConfig) -> SimResult<Self> {
        config.validate()?;
        let sampler = ArrivalSampler::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            sampler: Arc::new(sampler),
        })
    }

    pub fn config(&self) -> &CampsiteConfig {
        &self.config
    }

    pub fn sampler(&self) -> &ArrivalSampler {
        &self.sampler
    }

    /// Random source of run `index`
    pub fn run_rng(&self, index: usize) -> StdRng {
        match self.config.seed {
            Some(base) => StdRng::seed_from_u64(derive_run_seed(base, index)),
            None => StdRng::from_entropy(),
        }
    }

    /// A fresh engine with the arrival generator in place, ready to run.
    /// Callers may attach observers before handing it to `finish`.
    pub fn build_engine(&self, rng: StdRng) -> SimResult<SimulationEngine<CampsiteWorld>> {
        let world = CampsiteWorld::new(Campsite::new(&self.config), rng);
        let mut engine = SimulationEngine::new(world);
        engine.spawn(Box::new(ArrivalGenerator::new(
            self.sampler.clone(),
            self.config.admission,
        )))?;
        Ok(engine)
    }

    /// Run `engine` to the configured horizon and collect its statistics
    pub fn finish(&self, mut engine: SimulationEngine<CampsiteWorld>) -> SimResult<RunResult> {
        let horizon = SimTime::new(f64::from(self.config.horizon_days));
        let end = engine.run_until(horizon)?;
        debug!(
            "run stopped at {} after {} events, {} processes still live",
            end,
            engine.events_processed(),
            engine.live_processes()
        );

        let world = engine.into_world();
        let limits = world.campsite.limits();
        Ok(world.stats.into_run_result(limits))
    }

    /// One complete run
    pub fn run_single(&self, index: usize) -> SimResult<RunResult> {
        let engine = self.build_engine(self.run_rng(index))?;
        let result = self.finish(engine)?;
        info!("run {} finished: {} days", index, result.num_days());
        Ok(result)
    }

    /// All runs, in run-index order
    pub fn run_all(&self) -> SimResult<Vec<RunResult>> {
        let count = self.config.num_experiments;
        let execution = &self.config.execution;
        match execution.concurrency_mode {
            ConcurrencyMode::Sequential => (0..count).map(|index| self.run_single(index)).collect(),
            ConcurrencyMode::Rayon => {
                let parallel = || {
                    (0..count)
                        .into_par_iter()
                        .map(|index| self.run_single(index))
                        .collect::<SimResult<Vec<_>>>()
                };
                match execution.thread_pool_size {
                    Some(threads) => {
                        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
                        pool.install(parallel)
                    }
                    None => parallel(),
                }
            }
        }
    }

    /// Run the whole experiment and average it
    pub fn run(&self) -> SimResult<AggregateResult> {
        info!(
            "experiment: {} runs over {} days ({:?})",
            self.config.num_experiments, self.config.horizon_days, self.config.execution.concurrency_mode
        );
        let runs = self.run_all()?;
        let aggregate = AggregateResult::from_runs(&runs)?;
        info!(
            "experiment finished: total balance {:.0}, mean daily balance {:.1}",
            aggregate.total_balance(),
            aggregate.mean_daily_balance()
        );
        Ok(aggregate)
    }
}
