use snow_simulation::SimulationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),
}
