use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Direction;
use crate::observation::{OBSERVATION_SIZE, Observation};

/// A control policy: maps the observation to a heading.
///
/// Implementations must be pure so that episodes replay identically.
pub trait Policy: Send + Sync {
    fn decide(&self, observation: &Observation) -> Direction;
}

impl<F> Policy for F
where
    F: Fn(&Observation) -> Direction + Send + Sync,
{
    fn decide(&self, observation: &Observation) -> Direction {
        self(observation)
    }
}

/// Index of the largest output mapped to a direction; ties go to the lowest
/// index and NaN never wins.
pub fn argmax_direction(outputs: &[f32; 4]) -> Direction {
    let mut best = 0usize;
    let mut best_v = f32::NEG_INFINITY;
    for (i, &v) in outputs.iter().enumerate() {
        if v > best_v {
            best_v = v;
            best = i;
        }
    }
    Direction::ALL[best]
}

/// Always asks for the same direction.
#[derive(Clone, Copy, Debug)]
pub struct Constant(pub Direction);

impl Policy for Constant {
    fn decide(&self, _observation: &Observation) -> Direction {
        self.0
    }
}

/// Walks towards the apple through sides that are clear, falling back to any
/// clear side.
#[derive(Clone, Copy, Debug, Default)]
pub struct Greedy;

impl Policy for Greedy {
    fn decide(&self, obs: &Observation) -> Direction {
        Direction::ALL
            .into_iter()
            .find(|&d| obs.apple_towards(d) && obs.is_clear(d))
            .or_else(|| Direction::ALL.into_iter().find(|&d| obs.is_clear(d)))
            .unwrap_or(Direction::Left)
    }
}

/// Single linear layer, 8 inputs to 4 outputs in `[LEFT, RIGHT, UP, DOWN]` order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearPolicy {
    pub weights: [[f32; OBSERVATION_SIZE]; 4],
    pub bias: [f32; 4],
}

impl LinearPolicy {
    pub fn zeros() -> Self {
        Self {
            weights: [[0.0; OBSERVATION_SIZE]; 4],
            bias: [0.0; 4],
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, scale: f32) -> Self {
        let mut policy = Self::zeros();
        for row in policy.weights.iter_mut() {
            for w in row.iter_mut() {
                *w = rng.gen_range(-scale..scale);
            }
        }
        for b in policy.bias.iter_mut() {
            *b = rng.gen_range(-scale..scale);
        }
        policy
    }

    pub fn outputs(&self, observation: &Observation) -> [f32; 4] {
        let inputs = observation.to_inputs();
        let mut out = self.bias;
        for (o, row) in out.iter_mut().zip(self.weights.iter()) {
            *o += row.iter().zip(inputs.iter()).map(|(w, x)| w * x).sum::<f32>();
        }
        out
    }
}

impl Policy for LinearPolicy {
    fn decide(&self, observation: &Observation) -> Direction {
        argmax_direction(&self.outputs(observation))
    }
}
