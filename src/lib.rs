//! SkyKit: an amenity-kit logistics engine for a hub-and-spoke airline
//! network, played against a round-based evaluation service.
//!
//! Each simulated hour the engine folds in the previous round's feedback
//! (flight lifecycle events and penalties), advances its inventory state,
//! plans per-flight kit loads and hub purchase orders, and submits the
//! decision. See [`simulation::Session`] for the loop and
//! [`transport::RoundService`] for the service seam.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testutil;
