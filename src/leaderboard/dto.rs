use serde::{Deserialize, Serialize};

use super::LeaderboardEntry;
use crate::analysis::dto::ContributionSummary;

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    pub username: Option<String>,
    pub emission_results: Option<ContributionSummary>,
}

#[derive(Debug, Serialize)]
pub struct ContributionResponse {
    pub success: bool,
    pub entry: LeaderboardEntry,
    pub rank: usize,
}

#[derive(Debug, Serialize)]
pub struct StandingResponse {
    pub username: String,
    pub rank: usize,
    pub entry: LeaderboardEntry,
}
