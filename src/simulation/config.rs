// src/simulation/config.rs

use crate::model::kit::KitSet;

/// Tunable knobs for one simulation session. All values have working
/// defaults; tests override individual fields.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Length of the scored session in simulated days.
    pub total_days: u32,

    /// Horizon for destination-deficit and purchase forecasts.
    pub forecast_hours: u32,

    /// Landed kits are shelved immediately (no processing queue) when the
    /// destination's slowest category turns around within this many hours.
    pub fast_processing_hours: u32,

    /// Base destination-buffer fraction fed into the adaptive tuner.
    pub base_buffer_percent: f64,

    /// Passenger-count estimates used until enough real observations exist.
    pub fallback_demand: KitSet,

    /// No purchase order is placed on or after this day; late orders cannot
    /// arrive before the session ends.
    pub purchase_cutoff_day: u32,

    /// Total units the session may ever order.
    pub purchase_lifetime_cap: u32,

    /// Hub expected stock at or above this suppresses ordering.
    pub purchase_stock_threshold: u32,

    /// Per-request limit enforced by the evaluation service.
    pub purchase_api_cap: u32,

    /// Orders at or below this size are not worth placing.
    pub purchase_min_order: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            total_days: 30,
            forecast_hours: 48,
            fast_processing_hours: 2,
            base_buffer_percent: 0.85,
            fallback_demand: KitSet::new(10, 50, 25, 200),
            purchase_cutoff_day: 20,
            purchase_lifetime_cap: 20_000,
            purchase_stock_threshold: 15_000,
            purchase_api_cap: 1_000,
            purchase_min_order: 100,
        }
    }
}
