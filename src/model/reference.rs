// src/model/reference.rs

use std::collections::HashMap;

use crate::model::kit::KitSet;

/// Static airport record. Reference data, never mutated after loading.
#[derive(Debug, Clone)]
pub struct Airport {
    pub code: String,
    pub is_hub: bool,
    pub capacity: KitSet,
    /// Hours to turn a returned kit around, per category.
    pub processing_hours: KitSet,
    pub initial_stock: KitSet,
}

impl Airport {
    pub fn max_processing_hours(&self) -> u32 {
        self.processing_hours
            .first
            .max(self.processing_hours.business)
            .max(self.processing_hours.premium_economy)
            .max(self.processing_hours.economy)
    }
}

/// Static aircraft record: how many kits of each category fit on board.
#[derive(Debug, Clone)]
pub struct AircraftType {
    pub name: String,
    pub kit_capacity: KitSet,
}

/// One row of the recurring weekly flight schedule.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub departure_hour: u32,
    pub duration_hours: u32,
    /// Which weekdays (day % 7) this rotation operates on.
    pub weekdays: [bool; 7],
}

/// All immutable tables the engine consumes, pre-loaded before the first
/// round and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub airports: HashMap<String, Airport>,
    pub aircraft: HashMap<String, AircraftType>,
    pub schedule: Vec<ScheduleEntry>,
    hub_code: String,
}

impl ReferenceData {
    pub fn new(
        airports: HashMap<String, Airport>,
        aircraft: HashMap<String, AircraftType>,
        schedule: Vec<ScheduleEntry>,
        hub_code: String,
    ) -> Self {
        Self {
            airports,
            aircraft,
            schedule,
            hub_code,
        }
    }

    pub fn airport(&self, code: &str) -> Option<&Airport> {
        self.airports.get(code)
    }

    pub fn aircraft(&self, name: &str) -> Option<&AircraftType> {
        self.aircraft.get(name)
    }

    pub fn hub_code(&self) -> &str {
        &self.hub_code
    }

    pub fn is_hub(&self, code: &str) -> bool {
        code == self.hub_code
    }

    /// Route distance from the schedule. Unknown routes count as 0, which
    /// only lowers their allocation priority.
    pub fn route_distance(&self, origin: &str, destination: &str) -> f64 {
        self.schedule
            .iter()
            .find(|entry| entry.origin == origin && entry.destination == destination)
            .map(|entry| entry.distance_km)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::kit::KitSet;

    fn sample() -> ReferenceData {
        let mut airports = HashMap::new();
        airports.insert(
            "HUB1".to_string(),
            Airport {
                code: "HUB1".to_string(),
                is_hub: true,
                capacity: KitSet::new(100, 100, 100, 100),
                processing_hours: KitSet::new(1, 1, 1, 2),
                initial_stock: KitSet::ZERO,
            },
        );
        let schedule = vec![ScheduleEntry {
            flight_number: "SK100".to_string(),
            origin: "HUB1".to_string(),
            destination: "AAA".to_string(),
            distance_km: 1450.0,
            departure_hour: 8,
            duration_hours: 3,
            weekdays: [true; 7],
        }];
        ReferenceData::new(airports, HashMap::new(), schedule, "HUB1".to_string())
    }

    #[test]
    fn unknown_route_distance_is_zero() {
        let data = sample();
        assert_eq!(data.route_distance("HUB1", "AAA"), 1450.0);
        assert_eq!(data.route_distance("AAA", "HUB1"), 0.0);
    }

    #[test]
    fn max_processing_hours_takes_slowest_category() {
        let data = sample();
        assert_eq!(data.airport("HUB1").unwrap().max_processing_hours(), 2);
    }
}
