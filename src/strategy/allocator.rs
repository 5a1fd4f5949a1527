// src/strategy/allocator.rs

use tracing::warn;

use crate::model::kit::{KitCategory, KitSet};
use crate::model::reference::ReferenceData;
use crate::simulation::config::EngineConfig;
use crate::simulation::state::InventoryState;
use crate::strategy::adaptive::AdaptiveTuner;
use crate::strategy::forecast::DemandForecaster;
use crate::transport::dto::FlightLoad;

/// Turns current stock plus forecast into a concrete per-flight load plan.
///
/// Flights are served in descending route-distance order: unfulfilled-demand
/// penalties scale with distance, so scarce stock goes to the flights where
/// a shortage hurts most. On top of the passenger base load, hub-origin
/// flights push extra kits toward spokes forecast to run short, and
/// hub-bound flights pull surplus kits back for redistribution.
pub struct FlightLoadAllocator {
    forecast_hours: u32,
    base_buffer_percent: f64,
}

impl FlightLoadAllocator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            forecast_hours: config.forecast_hours,
            base_buffer_percent: config.base_buffer_percent,
        }
    }

    /// Plan loads for every flight departing this hour, withdrawing the
    /// committed kits from origin stock and registering in-flight batches.
    pub fn plan_loads(
        &self,
        reference: &ReferenceData,
        state: &mut InventoryState,
        forecaster: &DemandForecaster,
        tuner: &AdaptiveTuner,
    ) -> Vec<FlightLoad> {
        let mut departing: Vec<_> = state
            .departing_flights()
            .into_iter()
            .cloned()
            .collect();
        departing.sort_by(|a, b| {
            let dist_a = reference.route_distance(&a.origin_airport, &a.destination_airport);
            let dist_b = reference.route_distance(&b.origin_airport, &b.destination_airport);
            dist_b.total_cmp(&dist_a)
        });

        let mut loads = Vec::with_capacity(departing.len());

        for flight in &departing {
            let Some(aircraft) = reference.aircraft(&flight.aircraft_type) else {
                warn!(
                    flight = %flight.flight_number,
                    aircraft = %flight.aircraft_type,
                    "unknown aircraft type, flight not loaded"
                );
                continue;
            };
            if state.stock(&flight.origin_airport).is_none() {
                warn!(
                    flight = %flight.flight_number,
                    airport = %flight.origin_airport,
                    "no stock tracked at origin, flight not loaded"
                );
                continue;
            }

            let origin_is_hub = reference.is_hub(&flight.origin_airport);
            let destination_is_hub = reference.is_hub(&flight.destination_airport);

            let mut loaded = KitSet::ZERO;
            for category in KitCategory::ALL {
                let demand = flight.passengers.get(category);
                let available = state
                    .stock(&flight.origin_airport)
                    .map(|stock| stock.get(category))
                    .unwrap_or(0);
                let aircraft_capacity = aircraft.kit_capacity.get(category);

                let mut to_load = demand.min(available).min(aircraft_capacity);

                if origin_is_hub && to_load < aircraft_capacity {
                    to_load += self.push_extra_to_spoke(
                        reference, state, forecaster, tuner, flight, category,
                        aircraft_capacity - to_load,
                        available - to_load,
                    );
                }

                if destination_is_hub && to_load < aircraft_capacity {
                    to_load += self.pull_surplus_to_hub(
                        reference, state, forecaster, flight, category,
                        aircraft_capacity - to_load,
                        available - to_load,
                    );
                }

                let withdrawn = state.withdraw(&flight.origin_airport, category, to_load);
                loaded.set(category, withdrawn);
            }

            state.commit_in_flight(flight, loaded);
            loads.push(FlightLoad {
                flight_id: flight.flight_id.clone(),
                loaded_kits: loaded,
            });
        }

        loads
    }

    /// Extra kits for a hub-departing flight, sized by the destination's
    /// forecast deficit and remaining (buffered) room.
    #[allow(clippy::too_many_arguments)]
    fn push_extra_to_spoke(
        &self,
        reference: &ReferenceData,
        state: &InventoryState,
        forecaster: &DemandForecaster,
        tuner: &AdaptiveTuner,
        flight: &crate::model::flight::FlightUpdate,
        category: KitCategory,
        spare_capacity: u32,
        spare_stock: u32,
    ) -> u32 {
        let destination = &flight.destination_airport;
        let Some(dest_airport) = reference.airport(destination) else {
            return 0;
        };
        let Some(dest_stock) = state.stock(destination) else {
            return 0;
        };

        let forecast = forecaster.demand(
            reference,
            state,
            destination,
            category,
            state.now(),
            self.forecast_hours,
        );
        let expected = dest_stock.get(category)
            + state.in_transit_to(destination, category)
            + state.processing_at(destination, category);
        let deficit = forecast.saturating_sub(expected);

        // Fill the destination only up to the tuner's buffered share of its
        // capacity; overflow penalties outweigh one more flight's slack.
        let buffer = tuner.buffer_percent(destination, category, self.base_buffer_percent);
        let usable_capacity =
            (f64::from(dest_airport.capacity.get(category)) * buffer).floor() as u32;
        let room = usable_capacity.saturating_sub(expected);

        deficit.min(room).min(spare_capacity).min(spare_stock)
    }

    /// Extra kits for a hub-bound flight: whatever the spoke holds beyond
    /// its own forecast demand flies back for redistribution.
    fn pull_surplus_to_hub(
        &self,
        reference: &ReferenceData,
        state: &InventoryState,
        forecaster: &DemandForecaster,
        flight: &crate::model::flight::FlightUpdate,
        category: KitCategory,
        spare_capacity: u32,
        spare_stock: u32,
    ) -> u32 {
        let forecast = forecaster.demand(
            reference,
            state,
            &flight.origin_airport,
            category,
            state.now(),
            self.forecast_hours,
        );
        let surplus = spare_stock.saturating_sub(forecast);
        surplus.min(spare_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::flight::FlightEventType;
    use crate::model::time::SimTime;
    use crate::testutil::{flight, reference_data};

    struct Fixture {
        reference: ReferenceData,
        state: InventoryState,
        forecaster: DemandForecaster,
        tuner: AdaptiveTuner,
        allocator: FlightLoadAllocator,
        config: EngineConfig,
    }

    fn fixture() -> Fixture {
        let config = EngineConfig::default();
        let reference = reference_data();
        let state = InventoryState::new(&reference);
        Fixture {
            allocator: FlightLoadAllocator::new(&config),
            forecaster: DemandForecaster::new(config.fallback_demand),
            tuner: AdaptiveTuner::new(),
            reference,
            state,
            config,
        }
    }

    fn depart(fx: &mut Fixture, flights: &[crate::model::flight::FlightUpdate], at: SimTime) {
        fx.state
            .apply_lifecycle_events(&fx.reference, &fx.config, flights);
        fx.state.advance_to(&fx.reference, at);
    }

    #[test]
    fn base_load_is_stock_limited() {
        let mut fx = fixture();
        // Spoke-to-spoke: no hub rules. Demand 300, stock 200, capacity 250.
        let mut f = flight("F1", "SPK2", "SPK1", SimTime::new(0, 9), FlightEventType::CheckedIn);
        f.passengers = KitSet::new(0, 0, 0, 300);
        depart(&mut fx, std::slice::from_ref(&f), SimTime::new(0, 9));

        let loads = fx
            .allocator
            .plan_loads(&fx.reference, &mut fx.state, &fx.forecaster, &fx.tuner);
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].loaded_kits.economy, 200);
        assert_eq!(fx.state.stock("SPK2").unwrap().economy, 0);
    }

    #[test]
    fn zero_demand_spoke_flight_loads_nothing() {
        let mut fx = fixture();
        let mut f = flight("F1", "SPK2", "SPK1", SimTime::new(0, 9), FlightEventType::CheckedIn);
        f.passengers = KitSet::ZERO;
        depart(&mut fx, std::slice::from_ref(&f), SimTime::new(0, 9));

        let loads = fx
            .allocator
            .plan_loads(&fx.reference, &mut fx.state, &fx.forecaster, &fx.tuner);
        assert!(loads[0].loaded_kits.is_zero());
    }

    #[test]
    fn longer_route_gets_scarce_stock_first() {
        let mut fx = fixture();
        // Leave the hub with only 100 economy kits.
        let hub_economy = fx.state.stock("HUB1").unwrap().economy;
        fx.state
            .withdraw("HUB1", KitCategory::Economy, hub_economy - 100);

        // SK101 (1450 km) outranks SK201 (820 km).
        let mut short = flight("FS", "HUB1", "SPK2", SimTime::new(0, 8), FlightEventType::CheckedIn);
        short.passengers = KitSet::new(0, 0, 0, 150);
        let mut long = flight("FL", "HUB1", "SPK1", SimTime::new(0, 8), FlightEventType::CheckedIn);
        long.passengers = KitSet::new(0, 0, 0, 150);
        depart(&mut fx, &[short, long], SimTime::new(0, 8));

        let loads = fx
            .allocator
            .plan_loads(&fx.reference, &mut fx.state, &fx.forecaster, &fx.tuner);
        let by_id = |id: &str| {
            loads
                .iter()
                .find(|l| l.flight_id == id)
                .unwrap()
                .loaded_kits
                .economy
        };
        assert_eq!(loads[0].flight_id, "FL");
        assert_eq!(by_id("FL"), 100);
        assert_eq!(by_id("FS"), 0);
    }

    #[test]
    fn hub_departure_pushes_extra_toward_deficit_spoke() {
        let mut fx = fixture();
        let mut f = flight("F1", "HUB1", "SPK2", SimTime::new(0, 8), FlightEventType::CheckedIn);
        f.passengers = KitSet::new(0, 0, 0, 50);
        depart(&mut fx, std::slice::from_ref(&f), SimTime::new(0, 8));

        // SPK2's 48h schedule forecast is 2 rotations x 200 fallback = 400
        // economy; stock there is 200, so the deficit of 200 exactly fills
        // the A320's spare capacity (250 - 50).
        let loads = fx
            .allocator
            .plan_loads(&fx.reference, &mut fx.state, &fx.forecaster, &fx.tuner);
        assert_eq!(loads[0].loaded_kits.economy, 250);
    }

    #[test]
    fn hub_bound_flight_pulls_spoke_surplus() {
        let mut fx = fixture();
        // Stuff SPK2 to capacity so it holds far more than its forecast.
        fx.state
            .deposit_clamped(&fx.reference, "SPK2", KitSet::new(0, 0, 0, 1_800));

        let mut f = flight("F1", "SPK2", "HUB1", SimTime::new(0, 18), FlightEventType::CheckedIn);
        f.passengers = KitSet::new(0, 0, 0, 50);
        depart(&mut fx, std::slice::from_ref(&f), SimTime::new(0, 18));

        // Base 50 + surplus capped by spare aircraft capacity (200).
        let loads = fx
            .allocator
            .plan_loads(&fx.reference, &mut fx.state, &fx.forecaster, &fx.tuner);
        assert_eq!(loads[0].loaded_kits.economy, 250);
    }

    #[test]
    fn unknown_aircraft_skips_loading_but_keeps_tracking() {
        let mut fx = fixture();
        let mut f = flight("F1", "HUB1", "SPK1", SimTime::new(0, 8), FlightEventType::CheckedIn);
        f.aircraft_type = "UNKNOWN".to_string();
        depart(&mut fx, std::slice::from_ref(&f), SimTime::new(0, 8));

        let hub_before = *fx.state.stock("HUB1").unwrap();
        let loads = fx
            .allocator
            .plan_loads(&fx.reference, &mut fx.state, &fx.forecaster, &fx.tuner);
        assert!(loads.is_empty());
        assert_eq!(*fx.state.stock("HUB1").unwrap(), hub_before);
        assert!(fx.state.known_flight("F1").is_some());
    }

    #[test]
    fn load_never_exceeds_aircraft_capacity_or_prior_stock() {
        let mut fx = fixture();
        let mut f = flight("F1", "HUB1", "SPK1", SimTime::new(0, 8), FlightEventType::CheckedIn);
        f.passengers = KitSet::new(500, 500, 500, 500);
        depart(&mut fx, std::slice::from_ref(&f), SimTime::new(0, 8));

        let stock_before = *fx.state.stock("HUB1").unwrap();
        let aircraft_cap = fx.reference.aircraft("A320").unwrap().kit_capacity;
        let loads = fx
            .allocator
            .plan_loads(&fx.reference, &mut fx.state, &fx.forecaster, &fx.tuner);
        for category in KitCategory::ALL {
            let loaded = loads[0].loaded_kits.get(category);
            assert!(loaded <= aircraft_cap.get(category));
            assert!(loaded <= stock_before.get(category));
        }
    }
}
