// src/transport/dto.rs

use serde::{Deserialize, Serialize};

use crate::model::flight::FlightUpdate;
use crate::model::kit::KitSet;

/// Kits committed to one departing flight, as sent to the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLoad {
    pub flight_id: String,
    pub loaded_kits: KitSet,
}

/// The engine's decision for one simulated hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourRequest {
    pub day: u32,
    pub hour: u32,
    pub flight_loads: Vec<FlightLoad>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kit_purchasing_orders: Option<KitSet>,
}

/// One penalty line from the round feedback. Attribution beyond the code
/// lives in the free-text `reason`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    pub code: String,
    pub penalty: f64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    pub issued_day: u32,
    pub issued_hour: u32,
}

/// The service's feedback for one played round.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourResponse {
    pub total_cost: f64,
    #[serde(default)]
    pub flight_updates: Vec<FlightUpdate>,
    #[serde(default)]
    pub penalties: Vec<Penalty>,
}
