//! The seam between the engine and the round-based evaluation service.
//!
//! The engine only ever talks to a [`RoundService`]; production uses the
//! blocking HTTP client, offline runs and tests use the simulated service
//! or a scripted stand-in.

pub mod dto;
pub mod http;
pub mod sim;

use crate::error::TransportError;
use dto::{HourRequest, HourResponse};

/// Blocking request/response transport for one evaluation session.
///
/// Exactly one call is in flight at a time; any error is fatal to the
/// session loop (no retries are modeled).
pub trait RoundService {
    /// Open a session; returns the session id.
    fn start_session(&mut self) -> Result<String, TransportError>;

    /// Play one simulated hour and receive the service's feedback.
    fn play_round(&mut self, request: &HourRequest) -> Result<HourResponse, TransportError>;

    /// Close the session; returns the final scored response.
    fn end_session(&mut self) -> Result<HourResponse, TransportError>;
}

pub use http::HttpRoundService;
pub use sim::SimulatedService;
