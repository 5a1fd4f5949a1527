// src/transport/sim.rs

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::error::TransportError;
use crate::model::flight::{FlightEventType, FlightUpdate};
use crate::model::kit::{KitCategory, KitSet};
use crate::model::reference::ReferenceData;
use crate::model::time::SimTime;
use crate::transport::dto::{HourRequest, HourResponse, Penalty};
use crate::transport::RoundService;

/// Hours before departure at which a Scheduled event is announced.
const SCHEDULE_LEAD_HOURS: u32 = 3;
/// Cost factors mirroring the scored platform's published rates.
const UNFULFILLED_FACTOR_PER_KM: f64 = 0.003;
const OVERFLOW_COST_PER_UNIT: f64 = 777.0;
const TRANSPORT_COST_PER_KIT_KM: f64 = 0.0005;
const PURCHASE_COST_PER_UNIT: f64 = 50.0;

struct SimFlight {
    update: FlightUpdate,
    load: KitSet,
    landed: bool,
}

/// An offline stand-in for the evaluation service. Replays the weekly
/// schedule with normally distributed passenger counts, walks each flight
/// through Scheduled -> CheckedIn -> Landed, and charges transport,
/// purchase, unfulfilled and overflow costs against a crude shadow
/// inventory. Deterministic for a given seed.
pub struct SimulatedService {
    reference: ReferenceData,
    rng: StdRng,
    seed: u64,
    total_days: u32,
    passenger_means: KitSet,
    flights: HashMap<String, SimFlight>,
    shadow_stock: HashMap<String, KitSet>,
    total_cost: f64,
    session_open: bool,
}

impl SimulatedService {
    pub fn new(reference: ReferenceData, total_days: u32, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            total_days,
            passenger_means: KitSet::new(8, 40, 20, 180),
            shadow_stock: HashMap::new(),
            flights: HashMap::new(),
            total_cost: 0.0,
            session_open: false,
            reference,
        }
    }

    fn draw_passengers(&mut self) -> KitSet {
        let mut passengers = KitSet::ZERO;
        for category in KitCategory::ALL {
            let mean = f64::from(self.passenger_means.get(category));
            let normal = Normal::new(mean, mean * 0.15).expect("std dev is non-negative");
            let sampled = normal.sample(&mut self.rng).round().max(0.0);
            passengers.set(category, sampled as u32);
        }
        passengers
    }

    fn ensure_flight(&mut self, entry_index: usize, departure: SimTime) -> String {
        let entry = &self.reference.schedule[entry_index];
        let flight_id = format!("{}-D{:02}", entry.flight_number, departure.day);
        if !self.flights.contains_key(&flight_id) {
            let entry = self.reference.schedule[entry_index].clone();
            let aircraft_type = self
                .reference
                .aircraft
                .keys()
                .min()
                .cloned()
                .unwrap_or_else(|| "A320".to_string());
            let passengers = self.draw_passengers();
            let update = FlightUpdate {
                flight_id: flight_id.clone(),
                flight_number: entry.flight_number.clone(),
                event_type: FlightEventType::Scheduled,
                origin_airport: entry.origin.clone(),
                destination_airport: entry.destination.clone(),
                departure,
                arrival: departure.plus_hours(entry.duration_hours),
                passengers,
                aircraft_type,
            };
            self.flights.insert(
                flight_id.clone(),
                SimFlight {
                    update,
                    load: KitSet::ZERO,
                    landed: false,
                },
            );
        }
        flight_id
    }

    fn land_flight(&mut self, flight_id: &str, penalties: &mut Vec<Penalty>, now: SimTime) {
        let (update, load) = {
            let flight = self.flights.get_mut(flight_id).expect("flight exists");
            flight.landed = true;
            flight.update.event_type = FlightEventType::Landed;
            (flight.update.clone(), flight.load)
        };
        let distance = self
            .reference
            .route_distance(&update.origin_airport, &update.destination_airport);

        for category in KitCategory::ALL {
            let demand = update.passengers.get(category);
            let loaded = load.get(category);

            let shortfall = demand.saturating_sub(loaded);
            if shortfall > 0 {
                let amount = f64::from(shortfall) * distance * UNFULFILLED_FACTOR_PER_KM;
                self.total_cost += amount;
                penalties.push(Penalty {
                    code: "FLIGHT_UNFULFILLED".to_string(),
                    penalty: amount,
                    reason: format!(
                        "Flight {} unfulfilled {} demand from Airport {}",
                        update.flight_number,
                        category.label(),
                        update.origin_airport
                    ),
                    flight_id: Some(update.flight_id.clone()),
                    flight_number: Some(update.flight_number.clone()),
                    issued_day: now.day,
                    issued_hour: now.hour,
                });
            }

            // Kits beyond what passengers used arrive at the destination.
            let surplus = loaded.saturating_sub(demand);
            if surplus > 0 {
                let capacity = self
                    .reference
                    .airport(&update.destination_airport)
                    .map(|airport| airport.capacity.get(category))
                    .unwrap_or(u32::MAX);
                let stock = self
                    .shadow_stock
                    .entry(update.destination_airport.clone())
                    .or_default()
                    .get_mut(category);
                *stock += surplus;
                if *stock > capacity {
                    let excess = *stock - capacity;
                    *stock = capacity;
                    let amount = f64::from(excess) * OVERFLOW_COST_PER_UNIT;
                    self.total_cost += amount;
                    penalties.push(Penalty {
                        code: "INVENTORY_EXCEEDS_CAPACITY".to_string(),
                        penalty: amount,
                        reason: format!(
                            "Airport {} {} stock exceeds capacity",
                            update.destination_airport,
                            category.label()
                        ),
                        flight_id: None,
                        flight_number: None,
                        issued_day: now.day,
                        issued_hour: now.hour,
                    });
                }
            }
        }
    }
}

impl RoundService for SimulatedService {
    fn start_session(&mut self) -> Result<String, TransportError> {
        self.flights.clear();
        self.total_cost = 0.0;
        self.rng = StdRng::seed_from_u64(self.seed);
        self.shadow_stock = self
            .reference
            .airports
            .values()
            .map(|airport| (airport.code.clone(), airport.initial_stock))
            .collect();
        self.session_open = true;
        Ok("sim-session".to_string())
    }

    fn play_round(&mut self, request: &HourRequest) -> Result<HourResponse, TransportError> {
        if !self.session_open {
            return Err(TransportError::SessionNotStarted);
        }
        let now = SimTime::new(request.day, request.hour);
        let mut penalties = Vec::new();
        let mut updates = Vec::new();

        // Accept loads and charge transport for them.
        for load in &request.flight_loads {
            if let Some(flight) = self.flights.get_mut(&load.flight_id) {
                flight.load = load.loaded_kits;
                let distance = self.reference.route_distance(
                    &flight.update.origin_airport,
                    &flight.update.destination_airport,
                );
                self.total_cost +=
                    f64::from(load.loaded_kits.total()) * distance * TRANSPORT_COST_PER_KIT_KM;
                let origin = flight.update.origin_airport.clone();
                let kits = load.loaded_kits;
                let stock = self.shadow_stock.entry(origin).or_default();
                for category in KitCategory::ALL {
                    let held = stock.get(category);
                    stock.set(category, held.saturating_sub(kits.get(category)));
                }
            }
        }

        if let Some(order) = &request.kit_purchasing_orders {
            self.total_cost += f64::from(order.total()) * PURCHASE_COST_PER_UNIT;
            let hub = self.reference.hub_code().to_string();
            let stock = self.shadow_stock.entry(hub).or_default();
            *stock = stock.saturating_add(order);
        }

        // Announce upcoming flights, check in departures, land arrivals.
        for index in 0..self.reference.schedule.len() {
            let entry = self.reference.schedule[index].clone();

            let announce_at = now.plus_hours(SCHEDULE_LEAD_HOURS);
            if entry.departure_hour == announce_at.hour
                && entry.weekdays[announce_at.weekday()]
                && announce_at.day < self.total_days
            {
                let id = self.ensure_flight(index, announce_at);
                updates.push(self.flights[&id].update.clone());
            }

            if entry.departure_hour == now.hour && entry.weekdays[now.weekday()] {
                let id = self.ensure_flight(index, now);
                let flight = self.flights.get_mut(&id).expect("flight exists");
                if !flight.landed {
                    flight.update.event_type = FlightEventType::CheckedIn;
                    updates.push(flight.update.clone());
                }
            }
        }

        let arrivals: Vec<String> = self
            .flights
            .iter()
            .filter(|(_, flight)| !flight.landed && flight.update.arrival == now)
            .map(|(id, _)| id.clone())
            .collect();
        for id in arrivals {
            self.land_flight(&id, &mut penalties, now);
            updates.push(self.flights[&id].update.clone());
        }

        debug!(
            day = now.day,
            hour = now.hour,
            updates = updates.len(),
            penalties = penalties.len(),
            "simulated round played"
        );

        Ok(HourResponse {
            total_cost: self.total_cost,
            flight_updates: updates,
            penalties,
        })
    }

    fn end_session(&mut self) -> Result<HourResponse, TransportError> {
        if !self.session_open {
            return Err(TransportError::SessionNotStarted);
        }
        self.session_open = false;
        Ok(HourResponse {
            total_cost: self.total_cost,
            flight_updates: Vec::new(),
            penalties: Vec::new(),
        })
    }
}
