//! Headless simulation of all-automated games.

mod runner;

pub use runner::{GameSummary, Simulation, SimulationConfig, SimulationStats};
