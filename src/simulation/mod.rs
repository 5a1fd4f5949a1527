// src/simulation/mod.rs

pub mod config;
pub mod engine;
pub mod state;

pub use config::EngineConfig;
pub use engine::{RoundRecord, Session, SessionOutcome};
pub use state::InventoryState;
