// src/model/flight.rs

use serde::{Deserialize, Serialize};

use crate::model::kit::KitSet;
use crate::model::time::SimTime;

/// Lifecycle stage reported by the evaluation service. `CheckedIn` carries
/// the authoritative passenger count; `Scheduled` counts are estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightEventType {
    #[serde(rename = "SCHEDULED")]
    Scheduled,
    #[serde(rename = "CHECKED_IN")]
    CheckedIn,
    #[serde(rename = "LANDED")]
    Landed,
}

/// A flight as known to the engine. This doubles as the wire shape of the
/// per-round `flightUpdates` entries; lifecycle events upsert it by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightUpdate {
    pub flight_id: String,
    pub flight_number: String,
    pub event_type: FlightEventType,
    pub origin_airport: String,
    pub destination_airport: String,
    pub departure: SimTime,
    pub arrival: SimTime,
    pub passengers: KitSet,
    pub aircraft_type: String,
}

impl FlightUpdate {
    /// A flight may be loaded only while it has not yet flown.
    pub fn is_loadable(&self) -> bool {
        matches!(
            self.event_type,
            FlightEventType::Scheduled | FlightEventType::CheckedIn
        )
    }
}

/// Kits committed to a departed flight, awaiting its Landed event.
/// Created when a load plan is finalized; consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightBatch {
    pub flight_id: String,
    pub destination: String,
    pub kits: KitSet,
    pub arrival: SimTime,
}

/// Kits that have landed at a spoke but are still being processed and are
/// not yet available as stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingBatch {
    pub airport: String,
    pub kits: KitSet,
    pub ready_at: SimTime,
}
