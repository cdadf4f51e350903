use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::{debug, info, instrument};

use crate::{
    analysis::{
        dto::{AnalysisResult, ContributionSummary},
        emissions, recipes, waste, ExpiryHorizon,
    },
    catalog::{FoodCatalog, RecipeBook},
    config::AppConfig,
    detection::{FoodDetector, FoodItem, PlaceholderDetector},
    error::AppError,
    leaderboard::{services::normalize_username, LeaderboardEntry, LeaderboardStore},
};

/// Runs detection and the estimators, and owns the leaderboard.
///
/// The leaderboard lock covers the whole read-modify-write-persist sequence of
/// a contribution.
pub struct Coordinator {
    detector: Arc<dyn FoodDetector>,
    foods: FoodCatalog,
    recipes: RecipeBook,
    horizon: ExpiryHorizon,
    leaderboard: Mutex<LeaderboardStore>,
}

impl Coordinator {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_detector(config, Arc::new(PlaceholderDetector))
    }

    pub fn with_detector(config: &AppConfig, detector: Arc<dyn FoodDetector>) -> Self {
        let foods = FoodCatalog::builtin();
        debug!(
            foods = foods.len(),
            horizon_days = config.expiry_horizon_days,
            "catalog loaded"
        );
        Self {
            detector,
            foods,
            recipes: RecipeBook::builtin(),
            horizon: ExpiryHorizon(config.expiry_horizon_days),
            leaderboard: Mutex::new(LeaderboardStore::open(&config.leaderboard_path)),
        }
    }

    pub fn foods(&self) -> &FoodCatalog {
        &self.foods
    }

    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    pub fn horizon(&self) -> ExpiryHorizon {
        self.horizon
    }

    #[instrument(skip(self))]
    pub fn analyze(&self, image_path: &Path) -> Result<AnalysisResult, AppError> {
        let items = self.detector.detect(image_path)?;
        let result = self.analyze_items(items);
        info!(
            items = result.detected_items.len(),
            expiring = result.waste_prediction.expiring_soon,
            avoided_kg = result.emission_results.avoided_emissions_kg,
            "fridge analyzed"
        );
        Ok(result)
    }

    pub fn analyze_items(&self, items: Vec<FoodItem>) -> AnalysisResult {
        let waste_prediction = waste::estimate(&items, self.horizon);
        let recommended_recipes = recipes::matching(&items, &self.recipes, self.horizon);
        let emission_results = emissions::estimate(&items, &self.foods, self.horizon);
        AnalysisResult {
            detected_items: items,
            waste_prediction,
            recommended_recipes,
            emission_results,
        }
    }

    /// Adds a contribution and returns the user's updated entry and rank.
    #[instrument(skip(self, summary))]
    pub fn contribute(
        &self,
        username: &str,
        summary: &ContributionSummary,
    ) -> Result<(LeaderboardEntry, usize), AppError> {
        let username = normalize_username(username)
            .ok_or_else(|| AppError::InvalidInput(format!("invalid username {username:?}")))?;

        let mut board = self.board()?;
        let entry = board
            .record_contribution(username, summary.avoided_emissions_kg, summary.items_saved)?
            .clone();
        let rank = board
            .rank(username)
            .ok_or_else(|| AppError::Internal(format!("no rank for {username}")))?;
        info!(%username, rank, total_kg = entry.total_emissions_avoided_kg, "contribution added");
        Ok((entry, rank))
    }

    pub fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, AppError> {
        Ok(self.board()?.top(limit).to_vec())
    }

    /// Rank and entry for `username`, if they have contributed.
    pub fn standing(&self, username: &str) -> Result<Option<(usize, LeaderboardEntry)>, AppError> {
        let board = self.board()?;
        Ok(board
            .rank(username)
            .zip(board.get(username).cloned()))
    }

    fn board(&self) -> Result<MutexGuard<'_, LeaderboardStore>, AppError> {
        self.leaderboard
            .lock()
            .map_err(|_| AppError::Internal("leaderboard lock poisoned".into()))
    }
}
