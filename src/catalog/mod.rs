pub mod foods;
pub mod handlers;
pub mod recipes;

use crate::state::AppState;
use axum::Router;

pub use foods::{FoodCatalog, FoodCatalogEntry};
pub use recipes::{Recipe, RecipeBook};

pub fn router() -> Router<AppState> {
    handlers::catalog_routes()
}
