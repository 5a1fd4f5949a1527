//! Shared fixtures for unit and integration tests.
//!
//! Compiled only for tests (or the `test-utils` feature, which the crate's
//! own dev-dependency enables for the `tests/` directory).

use std::collections::HashMap;

use crate::model::flight::{FlightEventType, FlightUpdate};
use crate::model::kit::KitSet;
use crate::model::reference::{AircraftType, Airport, ReferenceData, ScheduleEntry};
use crate::model::time::SimTime;

fn airport(
    code: &str,
    is_hub: bool,
    capacity: KitSet,
    processing_hours: KitSet,
    initial_stock: KitSet,
) -> Airport {
    Airport {
        code: code.to_string(),
        is_hub,
        capacity,
        processing_hours,
        initial_stock,
    }
}

/// A three-airport network: one hub, one slow spoke, one fast spoke.
pub fn reference_data() -> ReferenceData {
    let mut airports = HashMap::new();
    airports.insert(
        "HUB1".to_string(),
        airport(
            "HUB1",
            true,
            KitSet::new(1_000, 3_000, 2_000, 100_000),
            KitSet::new(1, 1, 1, 2),
            KitSet::new(500, 1_500, 1_000, 30_000),
        ),
    );
    airports.insert(
        "SPK1".to_string(),
        airport(
            "SPK1",
            false,
            KitSet::new(100, 300, 200, 1_000),
            KitSet::new(4, 4, 6, 8),
            KitSet::new(50, 100, 80, 950),
        ),
    );
    airports.insert(
        "SPK2".to_string(),
        airport(
            "SPK2",
            false,
            KitSet::new(100, 300, 200, 2_000),
            KitSet::new(1, 1, 2, 2),
            KitSet::new(10, 30, 20, 200),
        ),
    );

    let mut aircraft = HashMap::new();
    aircraft.insert(
        "A320".to_string(),
        AircraftType {
            name: "A320".to_string(),
            kit_capacity: KitSet::new(20, 60, 40, 250),
        },
    );
    aircraft.insert(
        "B777".to_string(),
        AircraftType {
            name: "B777".to_string(),
            kit_capacity: KitSet::new(30, 80, 60, 400),
        },
    );

    let schedule = vec![
        schedule_entry("SK101", "HUB1", "SPK1", 1_450.0, 8, 3),
        schedule_entry("SK102", "SPK1", "HUB1", 1_450.0, 14, 3),
        schedule_entry("SK201", "HUB1", "SPK2", 820.0, 8, 2),
        schedule_entry("SK202", "SPK2", "HUB1", 820.0, 18, 2),
    ];

    ReferenceData::new(airports, aircraft, schedule, "HUB1".to_string())
}

fn schedule_entry(
    number: &str,
    origin: &str,
    destination: &str,
    distance_km: f64,
    departure_hour: u32,
    duration_hours: u32,
) -> ScheduleEntry {
    ScheduleEntry {
        flight_number: number.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        distance_km,
        departure_hour,
        duration_hours,
        weekdays: [true; 7],
    }
}

/// A flight on the A320 with a typical passenger mix, arriving three hours
/// after departure.
pub fn flight(
    id: &str,
    origin: &str,
    destination: &str,
    departure: SimTime,
    event_type: FlightEventType,
) -> FlightUpdate {
    FlightUpdate {
        flight_id: id.to_string(),
        flight_number: id.to_string(),
        event_type,
        origin_airport: origin.to_string(),
        destination_airport: destination.to_string(),
        departure,
        arrival: departure.plus_hours(3),
        passengers: KitSet::new(5, 30, 15, 150),
        aircraft_type: "A320".to_string(),
    }
}
