use serde::{Deserialize, Serialize};

use super::{percentage, total_quantity, ExpiryHorizon};
use crate::catalog::FoodCatalog;
use crate::detection::FoodItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    pub avoided_emissions_kg: f64,
    pub items_saved: u64,
    pub total_items: u64,
    pub waste_prevented_percentage: f64,
}

pub fn estimate(items: &[FoodItem], catalog: &FoodCatalog, horizon: ExpiryHorizon) -> EmissionResult {
    let expiring: Vec<&FoodItem> = items.iter().filter(|i| horizon.is_expiring(i)).collect();

    let avoided: f64 = expiring
        .iter()
        .map(|i| catalog.footprint(&i.name) * f64::from(i.quantity))
        .sum();
    let items_saved = total_quantity(expiring.iter().copied());
    let total_items = total_quantity(items);

    EmissionResult {
        avoided_emissions_kg: round2(avoided),
        items_saved,
        total_items,
        waste_prevented_percentage: percentage(items_saved, total_items),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
