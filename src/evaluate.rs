//! Generation-wide evaluation of candidate policies.
//!
//! Every candidate plays one fully independent episode. In parallel mode the
//! episodes run on a dedicated rayon pool and [`Evaluator::evaluate`] returns
//! only once all of them have finished, so it doubles as the generation
//! barrier. Results travel back through the task return values.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::episode::{Budget, Episode, EpisodeResult, StopHandle, World};
use crate::error::EvaluateError;
use crate::grid::Grid;
use crate::modes::AiMode;
use crate::observation::Observation;
use crate::policy::Policy;
use crate::settings::AiSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationMode {
    Sequential,
    /// Fixed-size worker pool; `0` lets rayon pick one thread per core.
    Parallel { workers: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CandidateFitness {
    pub index: usize,
    pub seed: u64,
    pub result: EpisodeResult,
}

impl CandidateFitness {
    pub fn fitness(&self) -> f64 {
        self.result.fitness()
    }
}

pub struct Evaluator {
    settings: AiSettings,
    grid: Grid,
    pool: Option<rayon::ThreadPool>,
    max_steps: Option<u64>,
    time_limit: Option<Duration>,
    stop: StopHandle,
}

impl Evaluator {
    pub fn new(settings: AiSettings, mode: EvaluationMode) -> Result<Self, EvaluateError> {
        let grid = settings.validate()?;
        let pool = match mode {
            EvaluationMode::Sequential => None,
            EvaluationMode::Parallel { workers } => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("snake-eval-{i}"))
                    .build()?,
            ),
        };
        Ok(Self {
            settings,
            grid,
            pool,
            max_steps: None,
            time_limit: None,
            stop: StopHandle::new(),
        })
    }

    /// Caps every episode at `max_steps` ticks.
    pub fn with_step_budget(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Cuts every episode still running `limit` after the generation started.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Cancels the running generation, or the next one if none is running;
    /// unfinished episodes are finalised as stopped. The request is cleared
    /// once that generation has been evaluated.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    /// Plays one episode per candidate. Candidate `i` uses seed
    /// `generation_seed + i`, so results do not depend on scheduling.
    /// Output is ordered by candidate index.
    pub fn evaluate<P: Policy>(&self, generation_seed: u64, candidates: &[P]) -> Vec<CandidateFitness> {
        let started = Instant::now();
        let budget = Budget {
            max_steps: self.max_steps,
            deadline: self.time_limit.map(|limit| started + limit),
        };
        debug!(generation_seed, candidates = candidates.len(), "evaluating generation");

        let run = |(index, policy): (usize, &P)| self.run_candidate(index, policy, generation_seed, budget);
        let results: Vec<CandidateFitness> = match &self.pool {
            Some(pool) => pool.install(|| candidates.par_iter().enumerate().map(run).collect()),
            None => candidates.iter().enumerate().map(run).collect(),
        };
        if self.stop.is_stopped() {
            info!(generation_seed, "generation stopped");
            self.stop.reset();
        }

        if let Some(best) = results.iter().max_by(|a, b| a.fitness().total_cmp(&b.fitness())) {
            info!(
                generation_seed,
                best = best.index,
                fitness = best.fitness(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "generation evaluated"
            );
        }
        results
    }

    fn run_candidate<P: Policy>(&self, index: usize, policy: &P, generation_seed: u64, budget: Budget) -> CandidateFitness {
        let seed = generation_seed.wrapping_add(index as u64);
        let mut settings = self.settings.clone();
        settings.name = format!("snake_{index:02}");
        settings.game.seed = seed;

        let decide = |obs: &Observation| policy.decide(obs);
        let world = World::from_grid(self.grid, &settings.game);
        let result = Episode::from_world(world, AiMode::new(decide, &settings), &settings.game)
            .with_budget(budget)
            .with_stop(self.stop.clone())
            .run();
        CandidateFitness { index, seed, result }
    }
}
