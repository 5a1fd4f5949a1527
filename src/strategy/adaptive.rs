// src/strategy/adaptive.rs

use std::collections::HashMap;

use tracing::info;

use crate::model::kit::KitCategory;
use crate::model::time::SimTime;
use crate::model::window::BoundedWindow;
use crate::transport::dto::Penalty;

/// Penalty records kept for attribution analysis (48 hours of history at
/// up to 24 penalties per round).
const HISTORY_CAPACITY: usize = 48 * 24;
/// Per-round totals kept for trend detection.
const TREND_CAPACITY: usize = 24;
/// Rounds compared on each side of the trend check.
const TREND_SPAN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyMode {
    Aggressive,
    Balanced,
    Conservative,
}

impl std::fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StrategyMode::Aggressive => "aggressive",
            StrategyMode::Balanced => "balanced",
            StrategyMode::Conservative => "conservative",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyKind {
    CapacityOverflow,
    FlightUnfulfilled,
    NegativeInventory,
}

impl PenaltyKind {
    fn classify(code: &str) -> PenaltyKind {
        match code {
            "INVENTORY_EXCEEDS_CAPACITY" => PenaltyKind::CapacityOverflow,
            "NEGATIVE_INVENTORY" => PenaltyKind::NegativeInventory,
            _ => PenaltyKind::FlightUnfulfilled,
        }
    }
}

/// One classified penalty, optionally attributed to an airport/category
/// recovered from the service's free-text reason.
#[derive(Debug, Clone)]
pub struct PenaltyRecord {
    pub at: SimTime,
    pub kind: PenaltyKind,
    pub amount: f64,
    pub airport: Option<String>,
    pub category: Option<KitCategory>,
}

/// Learned per-airport overflow/shortage behaviour.
#[derive(Debug, Clone)]
pub struct AirportRiskProfile {
    pub overflow_count: u32,
    pub unfulfilled_count: u32,
    pub last_overflow_day: Option<u32>,
    /// 0.1..=1.0; higher means more overflow-prone.
    pub risk_score: f64,
}

impl Default for AirportRiskProfile {
    fn default() -> Self {
        Self {
            overflow_count: 0,
            unfulfilled_count: 0,
            last_overflow_day: None,
            risk_score: 0.5,
        }
    }
}

/// Read-only snapshot for the presentation layer.
#[derive(Debug, Clone)]
pub struct TunerSummary {
    pub mode: StrategyMode,
    pub buffer_multiplier: f64,
    pub economy_boost: f64,
    pub high_risk_airports: Vec<String>,
    pub recent_penalty_avg: f64,
}

/// Feedback loop over the per-round penalty reports. Adjusts a global
/// buffer multiplier, an economy-specific buffer reduction, and per-airport
/// risk scores; the allocator consumes the composed `buffer_percent`.
///
/// Owned by the session and passed by reference where needed; `reset`
/// restores the initial state for test isolation.
pub struct AdaptiveTuner {
    history: BoundedWindow<PenaltyRecord>,
    round_totals: BoundedWindow<f64>,
    mode: StrategyMode,
    buffer_multiplier: f64,
    economy_boost: f64,
    airport_profiles: HashMap<String, AirportRiskProfile>,
}

impl Default for AdaptiveTuner {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveTuner {
    pub fn new() -> Self {
        Self {
            history: BoundedWindow::new(HISTORY_CAPACITY),
            round_totals: BoundedWindow::new(TREND_CAPACITY),
            mode: StrategyMode::Balanced,
            buffer_multiplier: 1.0,
            economy_boost: 0.0,
            airport_profiles: HashMap::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Ingest one round's penalties, then re-evaluate the strategy.
    pub fn record_round(&mut self, penalties: &[Penalty], at: SimTime) {
        let mut round_total = 0.0;

        for penalty in penalties {
            round_total += penalty.penalty;

            let (airport, category) = parse_reason(&penalty.reason);
            let record = PenaltyRecord {
                at,
                kind: PenaltyKind::classify(&penalty.code),
                amount: penalty.penalty,
                airport,
                category,
            };

            if record.airport.is_some() {
                self.update_airport_profile(&record);
            }
            self.history.push(record);
        }

        self.round_totals.push(round_total);
        self.adapt(at);
    }

    fn adapt(&mut self, now: SimTime) {
        if self.round_totals.len() < TREND_SPAN {
            return;
        }

        let recent = mean(self.round_totals.tail(TREND_SPAN));
        let older_window: Vec<f64> = self
            .round_totals
            .tail_before(TREND_SPAN)
            .copied()
            .collect();
        let older = if older_window.is_empty() {
            recent
        } else {
            mean(older_window.iter())
        };

        let previous = self.mode;
        if recent > older * 1.3 {
            self.mode = StrategyMode::Conservative;
            self.buffer_multiplier = (self.buffer_multiplier + 0.05).min(1.2);
        } else if recent < older * 0.7 && self.mode != StrategyMode::Aggressive {
            self.mode = StrategyMode::Aggressive;
            self.buffer_multiplier = (self.buffer_multiplier - 0.03).max(0.9);
        } else {
            self.mode = StrategyMode::Balanced;
            // Relax toward neutral, 2% per round.
            self.buffer_multiplier = self.buffer_multiplier * 0.98 + 0.02;
        }

        let economy_overflows = self
            .history
            .iter()
            .filter(|record| {
                record.kind == PenaltyKind::CapacityOverflow
                    && record.category == Some(KitCategory::Economy)
                    && record.at.day + 1 >= now.day
            })
            .count();
        if economy_overflows > 5 {
            self.economy_boost = (self.economy_boost + 0.02).min(0.15);
        } else if economy_overflows == 0 && self.economy_boost > 0.0 {
            self.economy_boost = (self.economy_boost - 0.01).max(0.0);
        }

        if previous != self.mode {
            info!(
                from = %previous,
                to = %self.mode,
                buffer_multiplier = self.buffer_multiplier,
                economy_boost = self.economy_boost,
                "strategy mode changed"
            );
        }
    }

    fn update_airport_profile(&mut self, record: &PenaltyRecord) {
        let code = record.airport.as_deref().unwrap_or_default();
        let profile = self.airport_profiles.entry(code.to_string()).or_default();

        match record.kind {
            PenaltyKind::CapacityOverflow => {
                profile.overflow_count += 1;
                profile.last_overflow_day = Some(record.at.day);
                profile.risk_score = (profile.risk_score + 0.1).min(1.0);
            }
            PenaltyKind::FlightUnfulfilled => {
                profile.unfulfilled_count += 1;
                profile.risk_score = (profile.risk_score - 0.02).max(0.1);
            }
            PenaltyKind::NegativeInventory => {}
        }

        // Decay on every recorded event.
        profile.risk_score *= 0.99;
    }

    /// The destination-buffer fraction the allocator should target,
    /// composed from the global multiplier, the economy boost, and the
    /// airport's risk score, clamped to [0.5, 0.95].
    pub fn buffer_percent(&self, airport: &str, category: KitCategory, base: f64) -> f64 {
        let mut buffer = base * self.buffer_multiplier;

        if category == KitCategory::Economy {
            buffer -= self.economy_boost;
        }

        if let Some(profile) = self.airport_profiles.get(airport) {
            if profile.risk_score > 0.7 {
                buffer -= (profile.risk_score - 0.7) * 0.1;
            }
        }

        buffer.clamp(0.5, 0.95)
    }

    pub fn mode(&self) -> StrategyMode {
        self.mode
    }

    pub fn buffer_multiplier(&self) -> f64 {
        self.buffer_multiplier
    }

    pub fn economy_boost(&self) -> f64 {
        self.economy_boost
    }

    pub fn risk_score(&self, airport: &str) -> f64 {
        self.airport_profiles
            .get(airport)
            .map(|profile| profile.risk_score)
            .unwrap_or(0.5)
    }

    pub fn summary(&self) -> TunerSummary {
        let mut high_risk_airports: Vec<String> = self
            .airport_profiles
            .iter()
            .filter(|(_, profile)| profile.risk_score > 0.7)
            .map(|(code, _)| code.clone())
            .collect();
        high_risk_airports.sort();

        TunerSummary {
            mode: self.mode,
            buffer_multiplier: self.buffer_multiplier,
            economy_boost: self.economy_boost,
            high_risk_airports,
            recent_penalty_avg: if self.round_totals.is_empty() {
                0.0
            } else {
                mean(self.round_totals.tail(TREND_SPAN))
            },
        }
    }
}

fn mean<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    let collected: Vec<f64> = values.copied().collect();
    if collected.is_empty() {
        return 0.0;
    }
    collected.iter().sum::<f64>() / collected.len() as f64
}

/// Recover airport/category attribution from a free-text penalty reason.
///
/// Grammar accepted (case-insensitive for the category):
/// - airport: the word following a literal `Airport ` token;
/// - category: `Premium Economy` if present, else the first of
///   `First` / `Business` / `Economy` that occurs.
///
/// Anything unparseable simply yields `None`; the penalty amount is still
/// recorded for trend purposes.
fn parse_reason(reason: &str) -> (Option<String>, Option<KitCategory>) {
    let airport = reason.split("Airport ").nth(1).and_then(|rest| {
        let code: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        if code.is_empty() {
            None
        } else {
            Some(code)
        }
    });

    let lower = reason.to_ascii_lowercase();
    let category = if lower.contains("premium economy") {
        Some(KitCategory::PremiumEconomy)
    } else if lower.contains("first") {
        Some(KitCategory::First)
    } else if lower.contains("business") {
        Some(KitCategory::Business)
    } else if lower.contains("economy") {
        Some(KitCategory::Economy)
    } else {
        None
    };

    (airport, category)
}
