// src/strategy/mod.rs

pub mod adaptive;
pub mod allocator;
pub mod forecast;
pub mod purchasing;

pub use adaptive::{AdaptiveTuner, StrategyMode, TunerSummary};
pub use allocator::FlightLoadAllocator;
pub use forecast::DemandForecaster;
pub use purchasing::PurchaseDecisionMaker;
