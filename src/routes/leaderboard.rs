// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly leaderboard routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::leaderboard::{
    self, WeeklyEntry, CURRENT_WEEK_TOP, PREVIOUS_WEEK_TOP,
};
use crate::time_utils::{utc_date, week_end, week_start};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Routes served without authentication.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard/week", get(get_weekly_leaderboard))
        .route(
            "/api/leaderboard/week/previous",
            get(get_previous_week_leaderboard),
        )
}

/// Routes behind the auth middleware.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard/me", get(get_my_entry))
        .route("/api/leaderboard/rank", get(get_my_rank))
        .route("/api/leaderboard/record", post(record_weekly_coins))
}

// ─── Board Views ─────────────────────────────────────────────

/// One row of a ranked board.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardRow {
    pub rank: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub user_name: String,
    pub user_picture: Option<String>,
    pub coins: u32,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardResponse {
    pub week_start: String,
    pub week_end: String,
    pub leaderboard: Vec<LeaderboardRow>,
}

/// Build ranked display rows for a week's entries, enriched with
/// display names fetched concurrently.
async fn build_board(
    state: &AppState,
    week: NaiveDate,
    top: u32,
) -> Result<LeaderboardResponse> {
    let mut entries = state.db.get_weekly_entries(week).await?;
    let ranks = leaderboard::competition_ranks(&entries);
    entries.truncate(top as usize);

    let user_ids: Vec<u64> = entries.iter().map(|e| e.user_id).collect();
    let users = state.db.get_users(&user_ids).await?;

    let leaderboard = entries
        .iter()
        .zip(ranks)
        .map(|(entry, rank)| {
            let user = users.get(&entry.user_id);
            LeaderboardRow {
                rank,
                user_id: entry.user_id,
                user_name: user
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| "Anonymous".to_string()),
                user_picture: user.and_then(|u| u.picture.clone()),
                coins: entry.coins,
            }
        })
        .collect();

    Ok(LeaderboardResponse {
        week_start: week.to_string(),
        week_end: week_end(week).to_string(),
        leaderboard,
    })
}

/// Current week's board, top 50.
async fn get_weekly_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LeaderboardResponse>> {
    let week = week_start(utc_date(chrono::Utc::now()));
    Ok(Json(build_board(&state, week, CURRENT_WEEK_TOP).await?))
}

#[derive(Deserialize)]
struct PreviousWeekQuery {
    #[serde(default = "default_weeks_ago")]
    weeks_ago: u32,
}

fn default_weeks_ago() -> u32 {
    1
}

/// A past week's board, top 10. Up to one year back.
async fn get_previous_week_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PreviousWeekQuery>,
) -> Result<Json<LeaderboardResponse>> {
    if !(1..=52).contains(&params.weeks_ago) {
        return Err(AppError::BadRequest(
            "weeks_ago must be between 1 and 52".to_string(),
        ));
    }

    let current = week_start(utc_date(chrono::Utc::now()));
    let week = current - Days::new(u64::from(params.weeks_ago) * 7);
    Ok(Json(build_board(&state, week, PREVIOUS_WEEK_TOP).await?))
}

// ─── Per-User Views ──────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyEntryResponse {
    pub week_start: String,
    pub coins: u32,
}

/// The user's entry for the current week, if any.
async fn get_my_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Option<WeeklyEntryResponse>>> {
    let week = week_start(utc_date(chrono::Utc::now()));
    let entry = state.db.get_weekly_entry(week, user.user_id).await?;

    Ok(Json(entry.map(|e| WeeklyEntryResponse {
        week_start: e.week_start.to_string(),
        coins: e.coins,
    })))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankResponse {
    /// None when the user has no entry this week
    pub rank: Option<u32>,
    pub total_players: u32,
    pub coins: Option<u32>,
}

/// The user's competition rank in the current week.
async fn get_my_rank(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RankResponse>> {
    let week = week_start(utc_date(chrono::Utc::now()));
    let entries = state.db.get_weekly_entries(week).await?;

    let mine = entries.iter().find(|e| e.user_id == user.user_id);
    let Some(mine) = mine else {
        return Ok(Json(RankResponse {
            rank: None,
            total_players: entries.len() as u32,
            coins: None,
        }));
    };

    Ok(Json(RankResponse {
        rank: Some(leaderboard::rank_for_coins(&entries, mine.coins)),
        total_players: entries.len() as u32,
        coins: Some(mine.coins),
    }))
}

#[derive(Deserialize)]
pub struct RecordCoinsRequest {
    pub coins: u32,
}

/// Upsert-increment the user's entry for the current week.
async fn record_weekly_coins(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RecordCoinsRequest>,
) -> Result<Json<WeeklyEntryResponse>> {
    let week = week_start(utc_date(chrono::Utc::now()));
    let entry: WeeklyEntry = state
        .db
        .record_weekly_coins(user.user_id, req.coins, week)
        .await?;

    Ok(Json(WeeklyEntryResponse {
        week_start: entry.week_start.to_string(),
        coins: entry.coins,
    }))
}
