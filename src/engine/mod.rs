// ============================================================================
// Engine Module
// Contains the matching engine and the simulation loop driving it
// ============================================================================

mod event_bus;
mod matching_engine;
mod simulation;

pub mod factory;

pub use event_bus::{CallbackId, EventBus, UPDATE_EVENT};
pub use factory::{create_from_config, SimulationBuilder};
pub use matching_engine::MatchingEngine;
pub use simulation::{SimulationEnvironment, SimulationReport};
