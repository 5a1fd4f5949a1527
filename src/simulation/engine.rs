// src/simulation/engine.rs

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::model::flight::FlightEventType;
use crate::model::reference::ReferenceData;
use crate::model::time::{SimTime, HOURS_PER_DAY};
use crate::simulation::config::EngineConfig;
use crate::simulation::state::InventoryState;
use crate::strategy::adaptive::{AdaptiveTuner, TunerSummary};
use crate::strategy::allocator::FlightLoadAllocator;
use crate::strategy::forecast::DemandForecaster;
use crate::strategy::purchasing::PurchaseDecisionMaker;
use crate::transport::dto::{HourRequest, HourResponse};
use crate::transport::RoundService;

/// One row of the per-round history, exported as CSV after the run.
#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    pub day: u32,
    pub hour: u32,
    pub flights_departed: usize,
    pub kits_loaded: u32,
    pub kits_ordered: u32,
    pub total_cost: f64,
    pub penalty_count: usize,
    pub penalty_amount: f64,
    pub mode: String,
}

/// Final tally of a completed session.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub session_id: String,
    pub total_cost: f64,
    pub rounds_played: usize,
    /// Cumulative penalty amount per penalty code.
    pub penalty_totals: Vec<(String, f64)>,
    pub kits_purchased: u32,
}

/// Drives one scored session: plays every hour of every day against a
/// [`RoundService`], feeding each round's response back into the inventory
/// state, the demand forecaster and the adaptive tuner before the next
/// round's decisions are made.
///
/// Feedback for round N is deliberately ingested at the start of round
/// N + 1, so a round's decisions only ever rest on what the service had
/// already reported.
pub struct Session {
    config: EngineConfig,
    reference: ReferenceData,
    state: InventoryState,
    forecaster: DemandForecaster,
    allocator: FlightLoadAllocator,
    purchaser: PurchaseDecisionMaker,
    tuner: AdaptiveTuner,
    service: Box<dyn RoundService>,
    history: Vec<RoundRecord>,
    pending: Option<HourResponse>,
    penalty_totals: HashMap<String, f64>,
    session_id: Option<String>,
}

impl Session {
    pub fn new(config: EngineConfig, reference: ReferenceData, service: Box<dyn RoundService>) -> Self {
        Self {
            state: InventoryState::new(&reference),
            forecaster: DemandForecaster::new(config.fallback_demand),
            allocator: FlightLoadAllocator::new(&config),
            purchaser: PurchaseDecisionMaker::new(),
            tuner: AdaptiveTuner::new(),
            history: Vec::new(),
            pending: None,
            penalty_totals: HashMap::new(),
            session_id: None,
            config,
            reference,
            service,
        }
    }

    /// Play the full session and return the final tally.
    pub fn run(&mut self) -> Result<SessionOutcome, TransportError> {
        let session_id = self.service.start_session()?;
        info!(session = %session_id, days = self.config.total_days, "session started");
        self.session_id = Some(session_id);

        for day in 0..self.config.total_days {
            for hour in 0..HOURS_PER_DAY {
                self.play_hour(SimTime::new(day, hour))?;
            }
        }

        // The last round's feedback has not been folded in yet.
        if let Some(response) = self.pending.take() {
            self.ingest_feedback(&response);
        }

        let closing = self.service.end_session()?;
        self.ingest_feedback(&closing);
        info!(total_cost = closing.total_cost, "session ended");

        Ok(self.outcome(closing.total_cost))
    }

    /// Play a single hour: ingest the previous round's feedback, advance the
    /// clock, plan loads and purchases, and send the decision.
    pub fn play_hour(&mut self, time: SimTime) -> Result<(), TransportError> {
        if let Some(response) = self.pending.take() {
            self.ingest_feedback(&response);
        }

        self.state.advance_to(&self.reference, time);

        let flight_loads =
            self.allocator
                .plan_loads(&self.reference, &mut self.state, &self.forecaster, &self.tuner);
        let kit_purchasing_orders =
            self.purchaser
                .decide(&self.config, &self.reference, &self.state, &self.forecaster);

        let request = HourRequest {
            day: time.day,
            hour: time.hour,
            flight_loads,
            kit_purchasing_orders,
        };
        let response = self.service.play_round(&request)?;

        self.history.push(RoundRecord {
            day: time.day,
            hour: time.hour,
            flights_departed: request.flight_loads.len(),
            kits_loaded: request
                .flight_loads
                .iter()
                .map(|load| load.loaded_kits.total())
                .sum(),
            kits_ordered: request
                .kit_purchasing_orders
                .map(|order| order.total())
                .unwrap_or(0),
            total_cost: response.total_cost,
            penalty_count: response.penalties.len(),
            penalty_amount: response.penalties.iter().map(|p| p.penalty).sum(),
            mode: self.tuner.mode().to_string(),
        });
        debug!(
            time = %time,
            flights = request.flight_loads.len(),
            penalties = response.penalties.len(),
            cost = response.total_cost,
            "round played"
        );

        self.pending = Some(response);
        Ok(())
    }

    /// Fold one round's feedback into the engine: flight lifecycle events
    /// into the inventory state, Scheduled and CheckedIn passenger counts
    /// into the forecaster, penalties into the tuner and the running tally.
    fn ingest_feedback(&mut self, response: &HourResponse) {
        for update in &response.flight_updates {
            // A Scheduled count is an upstream estimate; CheckedIn carries
            // the authoritative number, so both calibrate the baseline.
            // Replayed events for an unchanged lifecycle stage do not.
            let observe = match self.state.known_flight(&update.flight_id) {
                None => update.event_type != FlightEventType::Landed,
                Some(known) => {
                    update.event_type == FlightEventType::CheckedIn
                        && known.event_type == FlightEventType::Scheduled
                }
            };
            if observe {
                self.forecaster.record_observation(&update.passengers);
            }
            self.state.apply_lifecycle_events(
                &self.reference,
                &self.config,
                std::slice::from_ref(update),
            );
        }

        for penalty in &response.penalties {
            *self.penalty_totals.entry(penalty.code.clone()).or_default() += penalty.penalty;
        }
        self.tuner.record_round(&response.penalties, self.state.now());
    }

    fn outcome(&self, total_cost: f64) -> SessionOutcome {
        let mut penalty_totals: Vec<(String, f64)> = self
            .penalty_totals
            .iter()
            .map(|(code, amount)| (code.clone(), *amount))
            .collect();
        penalty_totals.sort_by(|a, b| b.1.total_cmp(&a.1));

        SessionOutcome {
            session_id: self.session_id.clone().unwrap_or_default(),
            total_cost,
            rounds_played: self.history.len(),
            penalty_totals,
            kits_purchased: self.purchaser.total_purchased(),
        }
    }

    // ---- read accessors for the presentation layer and tests ----

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn tuner_summary(&self) -> TunerSummary {
        self.tuner.summary()
    }
}
