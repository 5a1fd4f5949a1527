// src/model/kit.rs

use serde::{Deserialize, Serialize};

/// The four amenity-kit categories. Quantities of different categories
/// never mix in arithmetic; everything is tracked per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KitCategory {
    First,
    Business,
    PremiumEconomy,
    Economy,
}

impl KitCategory {
    pub const ALL: [KitCategory; 4] = [
        KitCategory::First,
        KitCategory::Business,
        KitCategory::PremiumEconomy,
        KitCategory::Economy,
    ];

    /// Position in `ALL`, for per-category arrays.
    pub fn index(self) -> usize {
        match self {
            KitCategory::First => 0,
            KitCategory::Business => 1,
            KitCategory::PremiumEconomy => 2,
            KitCategory::Economy => 3,
        }
    }

    /// Human-readable label, matching the wording the evaluation service
    /// uses in penalty reasons.
    pub fn label(&self) -> &'static str {
        match self {
            KitCategory::First => "First",
            KitCategory::Business => "Business",
            KitCategory::PremiumEconomy => "Premium Economy",
            KitCategory::Economy => "Economy",
        }
    }
}

/// A per-category vector of kit counts. This is the unit of all inventory
/// arithmetic and the wire shape the evaluation service expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitSet {
    pub first: u32,
    pub business: u32,
    pub premium_economy: u32,
    pub economy: u32,
}

impl KitSet {
    pub const ZERO: KitSet = KitSet {
        first: 0,
        business: 0,
        premium_economy: 0,
        economy: 0,
    };

    pub fn new(first: u32, business: u32, premium_economy: u32, economy: u32) -> Self {
        Self {
            first,
            business,
            premium_economy,
            economy,
        }
    }

    pub fn get(&self, category: KitCategory) -> u32 {
        match category {
            KitCategory::First => self.first,
            KitCategory::Business => self.business,
            KitCategory::PremiumEconomy => self.premium_economy,
            KitCategory::Economy => self.economy,
        }
    }

    pub fn get_mut(&mut self, category: KitCategory) -> &mut u32 {
        match category {
            KitCategory::First => &mut self.first,
            KitCategory::Business => &mut self.business,
            KitCategory::PremiumEconomy => &mut self.premium_economy,
            KitCategory::Economy => &mut self.economy,
        }
    }

    pub fn set(&mut self, category: KitCategory, value: u32) {
        *self.get_mut(category) = value;
    }

    pub fn total(&self) -> u32 {
        self.first + self.business + self.premium_economy + self.economy
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    /// Element-wise saturating addition.
    pub fn saturating_add(&self, other: &KitSet) -> KitSet {
        let mut out = *self;
        for category in KitCategory::ALL {
            *out.get_mut(category) = out.get(category).saturating_add(other.get(category));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_set_round_trip_per_category() {
        let mut kits = KitSet::ZERO;
        for (i, category) in KitCategory::ALL.into_iter().enumerate() {
            kits.set(category, (i as u32 + 1) * 10);
        }
        assert_eq!(kits, KitSet::new(10, 20, 30, 40));
        assert_eq!(kits.total(), 100);
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let kits = KitSet::new(1, 2, 3, 4);
        let json = serde_json::to_value(&kits).unwrap();
        assert_eq!(json["premiumEconomy"], 3);
        assert_eq!(json["economy"], 4);
    }
}
