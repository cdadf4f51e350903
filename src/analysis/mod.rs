pub mod dto;
pub mod emissions;
pub mod handlers;
pub mod recipes;
pub mod waste;

use crate::state::AppState;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::detection::FoodItem;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    handlers::upload_routes(max_upload_bytes)
}

/// Cutoff in days at or below which an item counts as expiring soon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryHorizon(pub i32);

impl ExpiryHorizon {
    pub fn is_expiring(&self, item: &FoodItem) -> bool {
        item.days_until_expiry <= self.0
    }
}

impl Default for ExpiryHorizon {
    fn default() -> Self {
        ExpiryHorizon(3)
    }
}

pub(crate) fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

pub(crate) fn total_quantity<'a>(items: impl IntoIterator<Item = &'a FoodItem>) -> u64 {
    items.into_iter().map(|i| u64::from(i.quantity)).sum()
}

#[cfg(test)]
pub(crate) fn sample_fridge() -> Vec<FoodItem> {
    vec![
        FoodItem::new("tomato", 3, 2),
        FoodItem::new("banana", 2, 1),
        FoodItem::new("bread", 1, 3),
        FoodItem::new("milk", 1, 5),
    ]
}
