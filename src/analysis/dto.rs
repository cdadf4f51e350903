use serde::{Deserialize, Serialize};

use super::{emissions::EmissionResult, waste::WastePrediction};
use crate::catalog::Recipe;
use crate::detection::FoodItem;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub detected_items: Vec<FoodItem>,
    pub waste_prediction: WastePrediction,
    pub recommended_recipes: Vec<Recipe>,
    pub emission_results: EmissionResult,
}

/// The part of an emission result that counts towards the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ContributionSummary {
    pub avoided_emissions_kg: f64,
    pub items_saved: u64,
}

impl From<&EmissionResult> for ContributionSummary {
    fn from(r: &EmissionResult) -> Self {
        Self {
            avoided_emissions_kg: r.avoided_emissions_kg,
            items_saved: r.items_saved,
        }
    }
}
