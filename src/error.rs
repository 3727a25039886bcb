use thiserror::Error;

/// Errors raised while building or decoding a configuration record.
///
/// Everything that can go wrong during an episode is a terminal state of the
/// episode instead, see [`crate::episode::Termination`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: i32 },
    #[error("{name} ({value}) is not divisible by step_size ({step_size})")]
    NotDivisible {
        name: &'static str,
        value: i32,
        step_size: i32,
    },
    #[error("{0} is not a valid boundary type")]
    UnknownBoundary(String),
    #[error("initial snake length {length} must be between 1 and the grid capacity {capacity}")]
    InitialLength { length: usize, capacity: usize },
    #[error("frame rate must be finite, positive and give a representable frame interval, got {0}")]
    FrameRate(f64),
    #[error("invalid json record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode record: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode record: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
