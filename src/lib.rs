//! Deterministic grid Snake for evaluating control policies.
//!
//! A [`World`] holds the snake, the apple and the score of one episode. An
//! [`Episode`] drives it tick by tick through a [`GameMode`]: [`HumanMode`]
//! replays queued direction events, [`AiMode`] asks a [`Policy`] and keeps
//! the loss an optimizer minimises. [`Evaluator`] runs one episode per
//! candidate policy, optionally on a worker pool.

pub mod apple;
pub mod boundary;
pub mod episode;
pub mod error;
pub mod evaluate;
pub mod fitness;
pub mod geometry;
pub mod grid;
pub mod modes;
pub mod observation;
pub mod policy;
pub mod render;
pub mod settings;
pub mod snake;

pub use boundary::{Boundary, BoundaryType};
pub use episode::{Budget, Episode, EpisodeResult, EpisodeState, StopHandle, Termination, World};
pub use error::{EvaluateError, SettingsError};
pub use evaluate::{CandidateFitness, EvaluationMode, Evaluator};
pub use geometry::{Cell, Direction};
pub use grid::Grid;
pub use modes::{AiMode, GameMode, HumanMode};
pub use observation::Observation;
pub use policy::{Constant, Greedy, LinearPolicy, Policy};
pub use render::{Frame, Renderer, TextRenderer};
pub use settings::{AiSettings, GameSettings, Record, ScoringSettings};
