//! Weight metrics for packs.
//!
//! This module provides pure functions over `(gear, quantity)` pairs. Nothing
//! here touches storage; callers resolve line items against the gear table
//! first (see [`crate::models::Pack::items`]).
//!
//! Quantity counts everywhere: both the category breakdown and the total
//! multiply each gear weight by its quantity. Both sum in ounces and convert
//! once at the end, so the three buckets sum to the total.

use serde::{Deserialize, Serialize};

use crate::models::Gear;
use crate::units::{convert, WeightUnit};

/// Weight bucket a gear item falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightCategory {
    Consumable,
    Wearable,
    Remaining,
}

impl WeightCategory {
    /// Consumable wins over worn; everything else is remaining.
    pub fn of(gear: &Gear) -> Self {
        if gear.consumable {
            WeightCategory::Consumable
        } else if gear.worn {
            WeightCategory::Wearable
        } else {
            WeightCategory::Remaining
        }
    }
}

/// Pack weight split into the three categories, in the pack's display unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct CategoryWeights {
    pub consumable: f64,
    pub wearable: f64,
    pub remaining: f64,
}

impl CategoryWeights {
    pub fn total(&self) -> f64 {
        self.consumable + self.wearable + self.remaining
    }

    /// Base weight: everything that is neither eaten nor worn.
    pub fn base(&self) -> f64 {
        self.remaining
    }

    pub fn get(&self, category: WeightCategory) -> f64 {
        match category {
            WeightCategory::Consumable => self.consumable,
            WeightCategory::Wearable => self.wearable,
            WeightCategory::Remaining => self.remaining,
        }
    }

    fn add(&mut self, category: WeightCategory, weight: f64) {
        match category {
            WeightCategory::Consumable => self.consumable += weight,
            WeightCategory::Wearable => self.wearable += weight,
            WeightCategory::Remaining => self.remaining += weight,
        }
    }

    fn converted(&self, from: WeightUnit, to: WeightUnit) -> Self {
        CategoryWeights {
            consumable: convert(self.consumable, from, to),
            wearable: convert(self.wearable, from, to),
            remaining: convert(self.remaining, from, to),
        }
    }
}

fn ounces((gear, quantity): (&Gear, u32)) -> f64 {
    gear.weight_in(WeightUnit::Ounces) * f64::from(quantity)
}

/// Sum line items into category buckets, converted to `unit`.
///
/// Buckets are summed in ounces and each is converted once at the end.
pub fn aggregate<'a, I>(items: I, unit: WeightUnit) -> CategoryWeights
where
    I: IntoIterator<Item = (&'a Gear, u32)>,
{
    let mut weights = CategoryWeights::default();
    for item in items {
        weights.add(WeightCategory::of(item.0), ounces(item));
    }
    weights.converted(WeightUnit::Ounces, unit)
}

/// Total weight of the line items in `unit`.
///
/// Sums in ounces and converts once at the end.
pub fn total_weight<'a, I>(items: I, unit: WeightUnit) -> f64
where
    I: IntoIterator<Item = (&'a Gear, u32)>,
{
    let total: f64 = items.into_iter().map(ounces).sum();
    convert(total, WeightUnit::Ounces, unit)
}

/// Lightness band of a carried weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum WeightClass {
    /// Exactly zero: nothing to classify.
    Unclassified,
    /// Under 5 lb
    SuperUltralight,
    /// 5 lb up to 10 lb
    Ultralight,
    /// 10 lb up to 20 lb
    Light,
    /// 20 lb and over
    Heavy,
}

const SUPER_UL_LIMIT_LB: f64 = 5.0;
const ULTRALIGHT_LIMIT_LB: f64 = 10.0;
const LIGHT_LIMIT_LB: f64 = 20.0;

impl WeightClass {
    pub fn from_weight(weight: f64, unit: WeightUnit) -> Self {
        let pounds = convert(weight, unit, WeightUnit::Pounds);
        if pounds == 0.0 {
            WeightClass::Unclassified
        } else if pounds < SUPER_UL_LIMIT_LB {
            WeightClass::SuperUltralight
        } else if pounds < ULTRALIGHT_LIMIT_LB {
            WeightClass::Ultralight
        } else if pounds < LIGHT_LIMIT_LB {
            WeightClass::Light
        } else {
            WeightClass::Heavy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeightClass::Unclassified => "",
            WeightClass::SuperUltralight => "Super UL",
            WeightClass::Ultralight => "Ultralight",
            WeightClass::Light => "Light",
            WeightClass::Heavy => "Heavy",
        }
    }

    /// Color name used for the weight badge.
    pub fn tint(&self) -> &'static str {
        match self {
            WeightClass::Unclassified => "secondary",
            WeightClass::SuperUltralight => "blue",
            WeightClass::Ultralight => "green",
            WeightClass::Light => "orange",
            WeightClass::Heavy => "red",
        }
    }
}

/// Computed statistics for a pack.
#[derive(Debug, Clone, PartialEq)]
pub struct PackStats {
    /// Display unit every weight below is expressed in
    pub unit: WeightUnit,
    /// Total weight, quantity included
    pub total_weight: f64,
    /// Category breakdown, quantity included
    pub weights: CategoryWeights,
    /// Number of distinct line items
    pub gear_count: u32,
    /// Sum of quantities
    pub item_count: u64,
    /// Band of the total weight
    pub weight_class: WeightClass,
}

impl PackStats {
    pub fn compute(items: &[(&Gear, u32)], unit: WeightUnit) -> Self {
        let weights = aggregate(items.iter().copied(), unit);
        Self::with_weights(items, unit, weights)
    }

    /// Build stats around an already-computed category breakdown.
    pub fn with_weights(items: &[(&Gear, u32)], unit: WeightUnit, weights: CategoryWeights) -> Self {
        let total_weight = total_weight(items.iter().copied(), unit);
        PackStats {
            unit,
            total_weight,
            weights,
            gear_count: u32::try_from(items.len()).unwrap_or(u32::MAX),
            item_count: items.iter().map(|(_, q)| u64::from(*q)).sum(),
            weight_class: WeightClass::from_weight(total_weight, unit),
        }
    }
}
