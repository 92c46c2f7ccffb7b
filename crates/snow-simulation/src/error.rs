use thiserror::Error;

/// Errors that can occur when constructing a simulator
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The host could not provide a 2D drawing context
    #[error("2D drawing context is unavailable")]
    ContextUnavailable,
}
