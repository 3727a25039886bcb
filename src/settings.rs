//! Flat, serialisable configuration records.
//!
//! An episode is fully reconstructible from a [`GameSettings`] (plus the
//! [`ScoringSettings`] for autonomous play) and the policy that drove it.

use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::boundary::BoundaryType;
use crate::error::SettingsError;
use crate::grid::Grid;

const GAME_SIZE: i32 = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub display_width: i32,
    pub display_height: i32,
    pub step_size: i32,
    pub snake_length_init: usize,
    pub boundary_type: BoundaryType,
    pub frame_rate_fps: f64,
    /// Skip the per-tick pacing delay even when a renderer is attached.
    pub run_in_background: bool,
    /// Seeds the initial heading and every apple placement.
    pub seed: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            display_width: 100 * GAME_SIZE,
            display_height: 100 * GAME_SIZE,
            step_size: 5 * GAME_SIZE,
            snake_length_init: 3,
            boundary_type: BoundaryType::HardBoundary,
            frame_rate_fps: 20.0,
            run_in_background: false,
            seed: 0,
        }
    }
}

impl GameSettings {
    pub fn grid(&self) -> Result<Grid, SettingsError> {
        Grid::new(self.display_width, self.display_height, self.step_size)
    }

    /// Checks every constraint and returns the grid these settings describe.
    pub fn validate(&self) -> Result<Grid, SettingsError> {
        let grid = self.grid()?;
        let capacity = grid.capacity();
        if self.snake_length_init == 0 || self.snake_length_init > capacity {
            return Err(SettingsError::InitialLength {
                length: self.snake_length_init,
                capacity,
            });
        }
        self.frame_interval()?;
        Ok(grid)
    }

    /// Pause between rendered frames, `1 / frame_rate_fps`.
    pub fn frame_interval(&self) -> Result<Duration, SettingsError> {
        let fps = self.frame_rate_fps;
        if !fps.is_finite() || fps <= 0.0 {
            return Err(SettingsError::FrameRate(fps));
        }
        Duration::try_from_secs_f64(1.0 / fps).map_err(|_| SettingsError::FrameRate(fps))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Constants of the fitness function used in autonomous play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Steps allowed without eating; negative means unlimited.
    pub step_limit: i64,
    pub approaching_score: f64,
    pub retracting_penalty: f64,
    pub eat_apple_score: f64,
    pub collision_penalty: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            step_limit: 50,
            approaching_score: 1.0,
            retracting_penalty: 1.5,
            eat_apple_score: 100.0,
            collision_penalty: 1000.0,
        }
    }
}

impl ScoringSettings {
    pub fn step_limit_reached(&self, steps_without_apple: u64) -> bool {
        self.step_limit >= 0 && steps_without_apple >= self.step_limit as u64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub name: String,
    pub game: GameSettings,
    pub scoring: ScoringSettings,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            name: "AI Snake".to_string(),
            game: GameSettings {
                run_in_background: true,
                ..GameSettings::default()
            },
            scoring: ScoringSettings::default(),
        }
    }
}

impl AiSettings {
    pub fn validate(&self) -> Result<Grid, SettingsError> {
        self.game.validate()
    }
}

/// JSON and compact binary encodings shared by every settings record.
pub trait Record: Serialize + DeserializeOwned {
    fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, SettingsError> {
        Ok(bincode::serde::encode_to_vec(self, bincode::config::standard())?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, SettingsError> {
        let (record, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(record)
    }
}

impl Record for GameSettings {}
impl Record for ScoringSettings {}
impl Record for AiSettings {}
