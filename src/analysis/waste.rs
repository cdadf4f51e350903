use serde::{Deserialize, Serialize};

use super::{percentage, total_quantity, ExpiryHorizon};
use crate::detection::FoodItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WastePrediction {
    pub total_items: u64,
    pub expiring_soon: u64,
    pub estimated_waste_percentage: f64,
}

pub fn estimate(items: &[FoodItem], horizon: ExpiryHorizon) -> WastePrediction {
    let total_items = total_quantity(items);
    let expiring_soon = total_quantity(items.iter().filter(|i| horizon.is_expiring(i)));
    WastePrediction {
        total_items,
        expiring_soon,
        estimated_waste_percentage: percentage(expiring_soon, total_items),
    }
}
