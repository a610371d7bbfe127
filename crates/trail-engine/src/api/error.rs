use thiserror::Error;

/// Errors surfaced by the trail engine.
///
/// Only construction-time failures are fatal. `BufferBusy` is absorbed by the
/// per-tick operations and retried on the next tick; `NotEnoughPoints` is the
/// refusal reported by `render()`.
#[derive(Debug, Error)]
pub enum TrailError {
    /// Configuration values that cannot produce a geometry budget.
    #[error("invalid trail configuration: {0}")]
    InvalidConfig(String),

    /// The fixed-size vertex storage could not be allocated.
    #[error("failed to allocate vertex buffer for {vertices} vertices")]
    BufferAllocation { vertices: usize },

    /// Storage for the retained sample window could not be reserved.
    #[error("failed to reserve sample window for {points} points")]
    WindowAllocation { points: usize },

    /// The vertex buffer is still in use and cannot be mapped this tick.
    #[error("vertex buffer is busy")]
    BufferBusy,

    /// A ribbon needs at least two retained samples to be drawn.
    #[error("cannot render a trail with {retained} retained points (need at least 2)")]
    NotEnoughPoints { retained: usize },

    /// Saved configuration could not be parsed or written.
    #[error("trail config serialization: {0}")]
    Config(#[from] serde_json::Error),
}
