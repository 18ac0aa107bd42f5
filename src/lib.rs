// Library crate - Monte Carlo simulation engine plus gating and reporting helpers

pub mod gate;
pub mod report;
pub mod simulation;

// Re-export commonly used types
pub use simulation::{
    SimulationConfig, SimulationEngine, SimulationError, SimulationParameters, SimulationResult,
};
pub use gate::{AccessGate, ContactGate, OpenGate, RunPermit, SimulationRequest};
