// src/simulation/state.rs

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::flight::{FlightEventType, FlightUpdate, InFlightBatch, ProcessingBatch};
use crate::model::kit::{KitCategory, KitSet};
use crate::model::reference::ReferenceData;
use crate::model::time::SimTime;
use crate::simulation::config::EngineConfig;

/// The time-stepped inventory core: per-airport stock, kits committed to
/// departed flights, kits still being processed after landing, and the
/// registry of flights the evaluation service has told us about.
///
/// All stock mutation goes through this type, and every addition is clamped
/// to the airport's capacity, so the non-negativity and capacity invariants
/// hold by construction.
pub struct InventoryState {
    now: SimTime,
    stocks: HashMap<String, KitSet>,
    known_flights: HashMap<String, FlightUpdate>,
    departing_now: Vec<String>,
    in_flight: HashMap<String, InFlightBatch>,
    processing: Vec<ProcessingBatch>,
}

impl InventoryState {
    /// Seed stock levels from the airport table.
    pub fn new(reference: &ReferenceData) -> Self {
        let stocks = reference
            .airports
            .values()
            .map(|airport| (airport.code.clone(), airport.initial_stock))
            .collect();
        Self {
            now: SimTime::default(),
            stocks,
            known_flights: HashMap::new(),
            departing_now: Vec::new(),
            in_flight: HashMap::new(),
            processing: Vec::new(),
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock to `time`: release processing batches that are ready,
    /// then recompute the set of flights departing at exactly this hour.
    pub fn advance_to(&mut self, reference: &ReferenceData, time: SimTime) {
        self.now = time;
        self.release_ready_processing(reference);

        self.departing_now.clear();
        for flight in self.known_flights.values() {
            if flight.is_loadable() && flight.departure == time {
                self.departing_now.push(flight.flight_id.clone());
            }
        }
    }

    fn release_ready_processing(&mut self, reference: &ReferenceData) {
        let now = self.now;
        let ready: Vec<ProcessingBatch> = {
            let (done, pending): (Vec<_>, Vec<_>) = self
                .processing
                .drain(..)
                .partition(|batch| batch.ready_at <= now);
            self.processing = pending;
            done
        };
        for batch in ready {
            let added = self.deposit_clamped(reference, &batch.airport, batch.kits);
            debug!(
                airport = %batch.airport,
                released = added.total(),
                "processing batch released into stock"
            );
        }
    }

    /// Apply one round's flight-lifecycle events. Upserts are idempotent and
    /// keyed by flight id. A `Landed` event consumes the matching in-flight
    /// batch exactly once; if no batch is tracked the event is ignored.
    pub fn apply_lifecycle_events(
        &mut self,
        reference: &ReferenceData,
        config: &EngineConfig,
        events: &[FlightUpdate],
    ) {
        for event in events {
            self.known_flights
                .insert(event.flight_id.clone(), event.clone());

            if event.event_type == FlightEventType::Landed {
                let Some(batch) = self.in_flight.remove(&event.flight_id) else {
                    continue;
                };
                self.deliver_landed_batch(reference, config, event, batch);
            }
        }
    }

    fn deliver_landed_batch(
        &mut self,
        reference: &ReferenceData,
        config: &EngineConfig,
        event: &FlightUpdate,
        batch: InFlightBatch,
    ) {
        match reference.airport(&batch.destination) {
            Some(airport) => {
                let turnaround = airport.max_processing_hours();
                if airport.is_hub || turnaround <= config.fast_processing_hours {
                    self.deposit_clamped(reference, &batch.destination, batch.kits);
                } else {
                    // Slow spoke: kits sit in processing until arrival +
                    // slowest category turnaround, carrying past midnight.
                    self.processing.push(ProcessingBatch {
                        airport: batch.destination.clone(),
                        kits: batch.kits,
                        ready_at: event.arrival.plus_hours(turnaround),
                    });
                }
            }
            None => {
                // No reference record to clamp against; shelve the kits
                // as-is rather than lose them.
                warn!(
                    airport = %batch.destination,
                    flight = %event.flight_number,
                    "landed at airport missing from reference data"
                );
                let stock = self.stocks.entry(batch.destination.clone()).or_default();
                *stock = stock.saturating_add(&batch.kits);
            }
        }
    }

    /// Add kits to an airport's stock, clamped so the stock never exceeds
    /// that airport's per-category capacity. Returns what was actually added.
    pub fn deposit_clamped(
        &mut self,
        reference: &ReferenceData,
        code: &str,
        incoming: KitSet,
    ) -> KitSet {
        let Some(stock) = self.stocks.get_mut(code) else {
            return KitSet::ZERO;
        };
        let mut added = KitSet::ZERO;
        for category in KitCategory::ALL {
            let room = match reference.airport(code) {
                Some(airport) => airport
                    .capacity
                    .get(category)
                    .saturating_sub(stock.get(category)),
                None => u32::MAX,
            };
            let accepted = incoming.get(category).min(room);
            *stock.get_mut(category) += accepted;
            added.set(category, accepted);
        }
        added
    }

    /// Remove up to `requested` kits of one category from an airport's
    /// stock. Returns what was actually withdrawn; stock never goes
    /// negative.
    pub fn withdraw(&mut self, code: &str, category: KitCategory, requested: u32) -> u32 {
        let Some(stock) = self.stocks.get_mut(code) else {
            return 0;
        };
        let taken = requested.min(stock.get(category));
        *stock.get_mut(category) -= taken;
        taken
    }

    /// Record a finalized load as committed to a departing flight.
    pub fn commit_in_flight(&mut self, flight: &FlightUpdate, kits: KitSet) {
        self.in_flight.insert(
            flight.flight_id.clone(),
            InFlightBatch {
                flight_id: flight.flight_id.clone(),
                destination: flight.destination_airport.clone(),
                kits,
                arrival: flight.arrival,
            },
        );
    }

    // ---- read accessors (presentation layer + strategies) ----

    pub fn stock(&self, code: &str) -> Option<&KitSet> {
        self.stocks.get(code)
    }

    pub fn known_flight(&self, flight_id: &str) -> Option<&FlightUpdate> {
        self.known_flights.get(flight_id)
    }

    pub fn known_flights(&self) -> impl Iterator<Item = &FlightUpdate> {
        self.known_flights.values()
    }

    pub fn known_flight_count(&self) -> usize {
        self.known_flights.len()
    }

    /// Flights whose departure equals the current hour and which are still
    /// in a loadable state.
    pub fn departing_flights(&self) -> Vec<&FlightUpdate> {
        self.departing_now
            .iter()
            .filter_map(|id| self.known_flights.get(id))
            .collect()
    }

    /// Flights the service has reported and which have not landed yet.
    pub fn active_flights(&self) -> Vec<&FlightUpdate> {
        self.known_flights
            .values()
            .filter(|flight| flight.event_type != FlightEventType::Landed)
            .collect()
    }

    /// Kits of one category currently on planes bound for `code`.
    pub fn in_transit_to(&self, code: &str, category: KitCategory) -> u32 {
        self.in_flight
            .values()
            .filter(|batch| batch.destination == code)
            .map(|batch| batch.kits.get(category))
            .sum()
    }

    /// Kits of one category still processing at `code`.
    pub fn processing_at(&self, code: &str, category: KitCategory) -> u32 {
        self.processing
            .iter()
            .filter(|batch| batch.airport == code)
            .map(|batch| batch.kits.get(category))
            .sum()
    }

    pub fn in_flight_batch(&self, flight_id: &str) -> Option<&InFlightBatch> {
        self.in_flight.get(flight_id)
    }

    pub fn processing_batches(&self) -> &[ProcessingBatch] {
        &self.processing
    }

    /// Current stock plus everything committed to arrive (en-route kits and
    /// processing batches) within the horizon.
    pub fn expected_stock(&self, code: &str, within_hours: u32) -> KitSet {
        let target = self.now.plus_hours(within_hours);
        let mut expected = self.stocks.get(code).copied().unwrap_or(KitSet::ZERO);

        for batch in self.in_flight.values() {
            if batch.destination == code && batch.arrival <= target {
                expected = expected.saturating_add(&batch.kits);
            }
        }
        for batch in &self.processing {
            if batch.airport == code && batch.ready_at <= target {
                expected = expected.saturating_add(&batch.kits);
            }
        }
        expected
    }
}
