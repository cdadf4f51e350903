use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{ContributionRequest, ContributionResponse, StandingResponse, TopQuery},
    LeaderboardEntry,
};
use crate::{error::AppError, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/leaderboard", get(top_contributors))
        .route("/leaderboard/:username", get(user_standing))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/add_contribution", post(add_contribution))
}

#[instrument(skip(state))]
pub async fn top_contributors(
    State(state): State<AppState>,
    Query(q): Query<TopQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let limit = match q.limit {
        Some(l) => usize::try_from(l).unwrap_or(0),
        None => state.config.leaderboard_limit,
    };
    Ok(Json(state.coordinator.top(limit)?))
}

#[instrument(skip(state))]
pub async fn user_standing(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<StandingResponse>, AppError> {
    let (rank, entry) = state
        .coordinator
        .standing(&username)?
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;
    Ok(Json(StandingResponse {
        username,
        rank,
        entry,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_contribution(
    State(state): State<AppState>,
    Json(payload): Json<ContributionRequest>,
) -> Result<Json<ContributionResponse>, AppError> {
    let (Some(username), Some(summary)) = (payload.username, payload.emission_results) else {
        warn!("contribution without username or emission results");
        return Err(AppError::InvalidInput(
            "Missing username or emission results".into(),
        ));
    };

    let coordinator = state.coordinator.clone();
    let (entry, rank) =
        tokio::task::spawn_blocking(move || coordinator.contribute(&username, &summary)).await??;

    Ok(Json(ContributionResponse {
        success: true,
        entry,
        rank,
    }))
}
