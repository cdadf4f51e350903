use std::collections::HashSet;

use super::ExpiryHorizon;
use crate::catalog::{Recipe, RecipeBook};
use crate::detection::FoodItem;

/// Recipes that use at least one expiring item, in recipe book order.
pub fn matching(items: &[FoodItem], book: &RecipeBook, horizon: ExpiryHorizon) -> Vec<Recipe> {
    let expiring: HashSet<&str> = items
        .iter()
        .filter(|i| horizon.is_expiring(i))
        .map(|i| i.name.as_str())
        .collect();

    book.iter()
        .filter(|r| r.uses_any(expiring.iter().copied()))
        .cloned()
        .collect()
}
