//! Mode-specific hooks plugged into the episode driver.

use std::collections::VecDeque;

use tracing::info;

use crate::episode::{Termination, World};
use crate::fitness::LossTracker;
use crate::geometry::Direction;
use crate::observation::Observation;
use crate::policy::Policy;
use crate::settings::{AiSettings, ScoringSettings};

/// Capabilities the [`Episode`](crate::episode::Episode) driver needs from a mode.
pub trait GameMode {
    fn name(&self) -> &str;

    /// Called once with the initial world, before the first tick.
    fn begin(&mut self, _world: &World) {}

    fn direction(&mut self, world: &World, observation: &Observation) -> Direction;

    /// Runs after the snake moved; resolves apple eating and bookkeeping.
    fn after_update(&mut self, world: &mut World, requested: Direction);

    /// Extra ending condition on top of collisions.
    fn should_end(&self) -> bool {
        false
    }

    /// Called exactly once when the episode terminates; returns the final loss
    /// for modes that keep one.
    fn finalize(&mut self, world: &World, termination: Termination) -> Option<f64>;

    /// Running loss, if the mode keeps one.
    fn loss(&self) -> Option<f64> {
        None
    }
}

/// Direction events supplied from outside, e.g. key presses.
#[derive(Clone, Debug, Default)]
pub struct HumanMode {
    name: String,
    inputs: VecDeque<Direction>,
}

impl HumanMode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: VecDeque::new(),
        }
    }

    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = Direction>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    pub fn push(&mut self, direction: Direction) {
        self.inputs.push_back(direction);
    }
}

impl GameMode for HumanMode {
    fn name(&self) -> &str {
        &self.name
    }

    fn direction(&mut self, world: &World, _observation: &Observation) -> Direction {
        self.inputs.pop_front().unwrap_or(world.snake().direction())
    }

    fn after_update(&mut self, world: &mut World, _requested: Direction) {
        if world.eaten_apple() {
            world.eat_apple();
        }
    }

    fn finalize(&mut self, world: &World, termination: Termination) -> Option<f64> {
        info!(name = %self.name, ?termination, score = world.score(), "your final score is {}", world.score());
        None
    }
}

/// Autonomous play driven by a [`Policy`], scored by a [`LossTracker`].
pub struct AiMode<P> {
    name: String,
    policy: P,
    scoring: ScoringSettings,
    tracker: LossTracker,
}

impl<P: Policy> AiMode<P> {
    pub fn new(policy: P, settings: &AiSettings) -> Self {
        Self {
            name: settings.name.clone(),
            policy,
            scoring: settings.scoring.clone(),
            tracker: LossTracker::new(0.0),
        }
    }

    pub fn tracker(&self) -> &LossTracker {
        &self.tracker
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn scoring(&self) -> &ScoringSettings {
        &self.scoring
    }
}

impl<P: Policy> GameMode for AiMode<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&mut self, world: &World) {
        self.tracker = LossTracker::new(world.apple_distance());
    }

    fn direction(&mut self, _world: &World, observation: &Observation) -> Direction {
        self.policy.decide(observation)
    }

    fn after_update(&mut self, world: &mut World, requested: Direction) {
        self.tracker.record_move(requested, world.apple_distance(), &self.scoring);
        let eaten = world.eaten_apple();
        if eaten {
            world.eat_apple();
        }
        self.tracker.record_apple(eaten, &self.scoring);
    }

    fn should_end(&self) -> bool {
        self.scoring.step_limit_reached(self.tracker.steps_without_apple)
    }

    fn finalize(&mut self, world: &World, termination: Termination) -> Option<f64> {
        let loss = self.tracker.finalize(&self.name, world.collided(), &self.scoring);
        info!(
            name = %self.name,
            ?termination,
            steps_total = self.tracker.steps_total,
            loss,
            score = world.score(),
            "finished"
        );
        Some(loss)
    }

    fn loss(&self) -> Option<f64> {
        Some(self.tracker.loss)
    }
}
