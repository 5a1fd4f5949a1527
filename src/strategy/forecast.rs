// src/strategy/forecast.rs

use std::cell::Cell;

use crate::model::kit::{KitCategory, KitSet};
use crate::model::reference::ReferenceData;
use crate::model::time::SimTime;
use crate::model::window::BoundedWindow;
use crate::simulation::state::InventoryState;

/// Observations kept per category for the adaptive baseline.
const OBSERVATION_CAPACITY: usize = 100;
/// Below this many observations the fixed fallback estimate is used.
const MIN_OBSERVATIONS: usize = 5;
/// Safety margin applied on top of the observed mean.
const BASELINE_BUFFER: f64 = 1.3;

/// Estimates near-term passenger demand per airport and category by
/// combining exact known-flight data with the recurring weekly schedule.
///
/// The per-flight estimate used for schedule projections is learned from
/// real passenger counts: each category keeps a rolling window of counts
/// observed on Scheduled/CheckedIn events, and once enough exist the
/// baseline becomes `ceil(mean * 1.3)`. Until then a conservative fixed
/// estimate per category is used.
pub struct DemandForecaster {
    fallback: KitSet,
    observations: [BoundedWindow<u32>; 4],
    cached_mean: [Cell<Option<f64>>; 4],
}

impl DemandForecaster {
    pub fn new(fallback: KitSet) -> Self {
        Self {
            fallback,
            observations: std::array::from_fn(|_| BoundedWindow::new(OBSERVATION_CAPACITY)),
            cached_mean: std::array::from_fn(|_| Cell::new(None)),
        }
    }

    /// Record the passenger mix of a real flight. Zero counts are skipped
    /// (a category not sold on a route says nothing about typical loads).
    pub fn record_observation(&mut self, passengers: &KitSet) {
        for category in KitCategory::ALL {
            let count = passengers.get(category);
            if count > 0 {
                self.observations[category.index()].push(count);
                self.cached_mean[category.index()].set(None);
            }
        }
    }

    /// The per-flight demand estimate for schedule projections.
    pub fn baseline(&self, category: KitCategory) -> u32 {
        let window = &self.observations[category.index()];
        if window.len() < MIN_OBSERVATIONS {
            return self.fallback.get(category);
        }
        let mean = match self.cached_mean[category.index()].get() {
            Some(mean) => mean,
            None => {
                let sum: u64 = window.iter().map(|&v| u64::from(v)).sum();
                let mean = sum as f64 / window.len() as f64;
                self.cached_mean[category.index()].set(Some(mean));
                mean
            }
        };
        (mean * BASELINE_BUFFER).ceil() as u32
    }

    pub fn observation_count(&self, category: KitCategory) -> usize {
        self.observations[category.index()].len()
    }

    /// Forecast demand departing from `airport` in `[from, from + window]`.
    ///
    /// Known flights inside the window contribute their exact passenger
    /// counts; on top of that, every weekly-schedule rotation active in the
    /// window contributes one baseline flight's worth.
    pub fn demand(
        &self,
        reference: &ReferenceData,
        state: &InventoryState,
        airport: &str,
        category: KitCategory,
        from: SimTime,
        window_hours: u32,
    ) -> u32 {
        let until = from.plus_hours(window_hours);
        let mut demand: u32 = 0;

        for flight in state.known_flights() {
            if flight.origin_airport == airport
                && flight.departure >= from
                && flight.departure <= until
            {
                demand += flight.passengers.get(category);
            }
        }

        let baseline = self.baseline(category);
        for offset in 0..window_hours {
            let slot = from.plus_hours(offset);
            for entry in &reference.schedule {
                if entry.origin == airport
                    && entry.departure_hour == slot.hour
                    && entry.weekdays[slot.weekday()]
                {
                    demand += baseline;
                }
            }
        }

        demand
    }

    pub fn reset(&mut self) {
        for window in &mut self.observations {
            window.clear();
        }
        for cache in &self.cached_mean {
            cache.set(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::flight::FlightEventType;
    use crate::testutil::{flight, reference_data};

    fn forecaster() -> DemandForecaster {
        DemandForecaster::new(KitSet::new(10, 50, 25, 200))
    }

    #[test]
    fn baseline_uses_fallback_until_enough_observations() {
        let mut fc = forecaster();
        assert_eq!(fc.baseline(KitCategory::Economy), 200);

        for _ in 0..4 {
            fc.record_observation(&KitSet::new(0, 0, 0, 120));
        }
        // Four observations: still the fallback.
        assert_eq!(fc.baseline(KitCategory::Economy), 200);

        fc.record_observation(&KitSet::new(0, 0, 0, 120));
        // ceil(120 * 1.3) = 156
        assert_eq!(fc.baseline(KitCategory::Economy), 156);
    }

    #[test]
    fn baseline_cache_is_invalidated_by_new_observations() {
        let mut fc = forecaster();
        for _ in 0..5 {
            fc.record_observation(&KitSet::new(0, 0, 0, 100));
        }
        assert_eq!(fc.baseline(KitCategory::Economy), 130);

        fc.record_observation(&KitSet::new(0, 0, 0, 700));
        // mean = (5*100 + 700)/6 = 200 -> ceil(260)
        assert_eq!(fc.baseline(KitCategory::Economy), 260);
    }

    #[test]
    fn zero_counts_are_not_recorded() {
        let mut fc = forecaster();
        for _ in 0..10 {
            fc.record_observation(&KitSet::new(0, 0, 0, 80));
        }
        assert_eq!(fc.observation_count(KitCategory::First), 0);
        assert_eq!(fc.baseline(KitCategory::First), 10);
    }

    #[test]
    fn demand_combines_known_flights_and_schedule() {
        let reference = reference_data();
        let mut state = crate::simulation::state::InventoryState::new(&reference);
        let config = crate::simulation::config::EngineConfig::default();
        let fc = forecaster();

        let f = flight(
            "F1",
            "HUB1",
            "SPK1",
            SimTime::new(0, 10),
            FlightEventType::CheckedIn,
        );
        state.apply_lifecycle_events(&reference, &config, &[f]);

        // Window D0H00..D0H24: one known flight (150 economy) plus two
        // schedule rotations out of HUB1 (SK101 at H08, SK201 at H08),
        // each at the 200-kit fallback baseline.
        let demand = fc.demand(
            &reference,
            &state,
            "HUB1",
            KitCategory::Economy,
            SimTime::new(0, 0),
            24,
        );
        assert_eq!(demand, 150 + 2 * 200);
    }

    #[test]
    fn demand_respects_the_window_edges() {
        let reference = reference_data();
        let mut state = crate::simulation::state::InventoryState::new(&reference);
        let config = crate::simulation::config::EngineConfig::default();
        let fc = forecaster();

        let mut outside = flight(
            "F1",
            "SPK1",
            "HUB1",
            SimTime::new(3, 0),
            FlightEventType::Scheduled,
        );
        outside.passengers = KitSet::new(0, 0, 0, 999);
        state.apply_lifecycle_events(&reference, &config, &[outside]);

        // SPK1 departs at H14 weekly; a 6-hour window from H00 sees neither
        // the schedule slot nor the far-future known flight.
        let demand = fc.demand(
            &reference,
            &state,
            "SPK1",
            KitCategory::Economy,
            SimTime::new(0, 0),
            6,
        );
        assert_eq!(demand, 0);
    }
}
