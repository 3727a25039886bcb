//! One run of the game: world state plus the tick loop that drives it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::apple::Apple;
use crate::boundary::Boundary;
use crate::error::SettingsError;
use crate::fitness::distance_to_apple;
use crate::geometry::Cell;
use crate::grid::Grid;
use crate::modes::{AiMode, GameMode};
use crate::observation::Observation;
use crate::policy::Policy;
use crate::render::{Frame, Renderer};
use crate::settings::{AiSettings, GameSettings};
use crate::snake::Snake;

/// Snake, apple and score of a single episode.
#[derive(Clone, Debug)]
pub struct World {
    snake: Snake,
    apple: Apple,
    score: u64,
    board_full: bool,
    rng: ChaCha8Rng,
}

impl World {
    pub fn new(settings: &GameSettings) -> Result<Self, SettingsError> {
        let grid = settings.validate()?;
        Ok(Self::from_grid(grid, settings))
    }

    /// Builds a world on an already validated grid.
    pub fn from_grid(grid: Grid, settings: &GameSettings) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
        let boundary = Boundary::new(settings.boundary_type, &grid);
        let snake = Snake::spawn(grid, boundary, settings.snake_length_init, &mut rng);
        let (apple, board_full) = if snake.len() == snake.capacity() {
            (Apple::at(snake.head()), true)
        } else {
            match Apple::generate(&snake, &mut rng) {
                Some(apple) => (apple, false),
                None => (Apple::at(snake.head()), true),
            }
        };
        Self {
            snake,
            apple,
            score: 0,
            board_full,
            rng,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    pub fn apple(&self) -> &Apple {
        &self.apple
    }

    /// Moves the apple to `position` if it is a free grid cell; returns
    /// whether it was moved.
    pub fn set_apple(&mut self, position: Cell) -> bool {
        if !self.grid().contains(position) || self.snake.occupies(position) {
            return false;
        }
        self.apple = Apple::at(position);
        true
    }

    pub fn grid(&self) -> &Grid {
        self.snake.grid()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_board_full(&self) -> bool {
        self.board_full
    }

    pub fn collided(&self) -> bool {
        self.snake.collided()
    }

    pub fn eaten_apple(&self) -> bool {
        self.apple.is_eaten_by(&self.snake)
    }

    pub fn apple_distance(&self) -> f64 {
        distance_to_apple(self.grid(), self.snake.head(), self.apple.position())
    }

    pub fn observation(&self) -> Observation {
        Observation::compute(&self.snake, &self.apple)
    }

    /// Grows the snake, scores, and places a new apple. Marks the board full
    /// once the body spans every cell; the old apple then stays where it was.
    pub fn eat_apple(&mut self) {
        if !self.snake.grow() {
            warn!(score = self.score, length = self.snake.len(), "board full");
            self.board_full = true;
            return;
        }
        self.score += 1;
        if self.snake.len() == self.snake.capacity() {
            warn!(score = self.score, length = self.snake.len(), "board full");
            self.board_full = true;
            return;
        }
        match Apple::generate(&self.snake, &mut self.rng) {
            Some(apple) => {
                debug!(score = self.score, apple = ?apple.position(), "apple eaten");
                self.apple = apple;
            }
            None => {
                warn!(score = self.score, length = self.snake.len(), "board full");
                self.board_full = true;
            }
        }
    }
}

/// Why an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The head hit the body or a hard wall.
    Collision,
    /// An external stop request, e.g. the player quit.
    Stopped,
    /// The mode's own ending condition (the step limit in autonomous play).
    StepLimit,
    /// No free cell left for a new apple.
    BoardFull,
    /// A supervisor step or time budget expired.
    BudgetExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeState {
    Running,
    Terminated(Termination),
}

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Clears a previous stop request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Limits a supervisor imposes on an episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Budget {
    pub max_steps: Option<u64>,
    pub deadline: Option<Instant>,
}

impl Budget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn steps(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
            deadline: None,
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }

    fn exhausted(&self, steps: u64) -> bool {
        self.max_steps.is_some_and(|max| steps >= max)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeResult {
    pub name: String,
    pub termination: Termination,
    pub score: u64,
    pub steps: u64,
    pub length: usize,
    pub loss: Option<f64>,
}

impl EpisodeResult {
    /// The value handed to an optimizer: the loss when the mode keeps one,
    /// otherwise the number of apples eaten.
    pub fn fitness(&self) -> f64 {
        self.loss.unwrap_or(self.score as f64)
    }
}

/// Drives one episode: ask the mode for a direction, move, resolve, check
/// for termination, repeat.
pub struct Episode<M: GameMode> {
    world: World,
    mode: M,
    observation: Observation,
    state: EpisodeState,
    started: bool,
    steps: u64,
    budget: Budget,
    stop: Option<StopHandle>,
    renderer: Option<Box<dyn Renderer>>,
    frame_interval: Option<Duration>,
    final_loss: Option<f64>,
}

impl<P: Policy> Episode<AiMode<P>> {
    pub fn ai(settings: &AiSettings, policy: P) -> Result<Self, SettingsError> {
        let mode = AiMode::new(policy, settings);
        Self::new(&settings.game, mode)
    }
}

impl<M: GameMode> Episode<M> {
    pub fn new(settings: &GameSettings, mode: M) -> Result<Self, SettingsError> {
        let world = World::new(settings)?;
        Ok(Self::from_world(world, mode, settings))
    }

    pub fn from_world(world: World, mode: M, settings: &GameSettings) -> Self {
        let frame_interval = if settings.run_in_background {
            None
        } else {
            settings.frame_interval().ok()
        };
        Self {
            observation: world.observation(),
            world,
            mode,
            state: EpisodeState::Running,
            started: false,
            steps: 0,
            budget: Budget::unlimited(),
            stop: None,
            renderer: None,
            frame_interval,
            final_loss: None,
        }
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_stop(mut self, stop: StopHandle) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Scripted setups must happen before the first [`step`](Self::step).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    pub fn mode_mut(&mut self) -> &mut M {
        &mut self.mode
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Runs until a terminal state and returns the finalised result.
    pub fn run(mut self) -> EpisodeResult {
        loop {
            if let EpisodeState::Terminated(termination) = self.step() {
                return self.build_result(termination);
            }
        }
    }

    /// Checks for termination, then advances by at most one tick and checks
    /// again. Finalisation runs exactly once, on the call that reaches a
    /// terminal state.
    pub fn step(&mut self) -> EpisodeState {
        if let EpisodeState::Terminated(_) = self.state {
            return self.state;
        }
        if !self.started {
            self.started = true;
            self.mode.begin(&self.world);
            self.observation = self.world.observation();
        }
        if let Some(termination) = self.termination() {
            self.finish(termination);
            return self.state;
        }

        self.tick();
        if let Some(termination) = self.termination() {
            self.finish(termination);
        }
        self.state
    }

    pub fn result(&self) -> Option<EpisodeResult> {
        match self.state {
            EpisodeState::Terminated(termination) => Some(self.build_result(termination)),
            EpisodeState::Running => None,
        }
    }

    fn tick(&mut self) {
        let requested = self.mode.direction(&self.world, &self.observation);
        let taken = self.world.snake.update(requested);
        self.mode.after_update(&mut self.world, requested);
        self.observation = self.world.observation();
        self.steps += 1;
        trace!(
            step = self.steps,
            ?requested,
            ?taken,
            head = ?self.world.snake.head(),
            "tick"
        );
        if self.renderer.is_some() {
            self.render(self.mode.loss());
            if let Some(interval) = self.frame_interval {
                thread::sleep(interval);
            }
        }
    }

    fn termination(&self) -> Option<Termination> {
        if self.world.collided() {
            Some(Termination::Collision)
        } else if self.stop.as_ref().is_some_and(StopHandle::is_stopped) {
            Some(Termination::Stopped)
        } else if self.mode.should_end() {
            Some(Termination::StepLimit)
        } else if self.world.is_board_full() {
            Some(Termination::BoardFull)
        } else if self.budget.exhausted(self.steps) {
            Some(Termination::BudgetExhausted)
        } else {
            None
        }
    }

    fn finish(&mut self, termination: Termination) {
        if termination == Termination::BudgetExhausted {
            warn!(name = self.mode.name(), steps = self.steps, "budget exhausted, episode cut short");
        }
        self.final_loss = self.mode.finalize(&self.world, termination);
        self.state = EpisodeState::Terminated(termination);
        self.render(self.final_loss);
    }

    fn render(&mut self, loss: Option<f64>) {
        if let Some(renderer) = self.renderer.as_mut() {
            let snake = &self.world.snake;
            renderer.render(&Frame {
                grid: snake.grid(),
                boundary: snake.boundary().kind(),
                segments: snake.body(),
                direction: snake.direction(),
                length: snake.len(),
                apple: self.world.apple.position(),
                score: self.world.score,
                loss,
            });
        }
    }

    fn build_result(&self, termination: Termination) -> EpisodeResult {
        EpisodeResult {
            name: self.mode.name().to_string(),
            termination,
            score: self.world.score,
            steps: self.steps,
            length: self.world.snake.len(),
            loss: self.final_loss,
        }
    }
}
