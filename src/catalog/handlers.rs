use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{FoodCatalogEntry, Recipe};
use crate::{error::AppError, state::AppState};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/:name", get(get_food))
        .route("/recipes/:id", get(get_recipe))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<FoodCatalogEntry>, AppError> {
    state
        .coordinator
        .foods()
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("food {name}")))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, AppError> {
    state
        .coordinator
        .recipes()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))
}
