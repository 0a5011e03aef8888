// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Streak routes: daily credit, scheduled reset, and read-only checks.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::profile::{Profile, StreakChange, MAX_MULTIPLIER, MULTIPLIER_PER_DAY};
use crate::time_utils::utc_date;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/streak", get(get_streak))
        .route("/api/streak/increment", post(increment_streak))
        .route("/api/streak/reset", post(reset_streak))
        .route("/api/streak/check", get(check_streak_reset))
        .route("/api/streak/stats", get(get_streak_stats))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Percent bonus, capped
    pub multiplier: u32,
    pub last_active_date: Option<String>,
}

/// Current streak and multiplier.
async fn get_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakResponse>> {
    let profile = state
        .db
        .get_profile(user.user_id)
        .await?
        .unwrap_or_else(|| Profile::new(user.user_id));

    Ok(Json(StreakResponse {
        current_streak: profile.current_streak,
        longest_streak: profile.longest_streak,
        multiplier: profile.multiplier(),
        last_active_date: profile.last_active_date.map(|d| d.to_string()),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakUpdateResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub multiplier: u32,
    pub message: String,
}

/// Credit today as an active day after a valid trip.
async fn increment_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakUpdateResponse>> {
    let today = utc_date(chrono::Utc::now());
    let update = state
        .db
        .record_streak_day_atomic(user.user_id, today)
        .await?;

    let message = match update.change {
        StreakChange::AlreadyCredited => "Already completed a trip today",
        StreakChange::Extended => "Streak incremented",
        StreakChange::Reset => "Streak reset, last tree withered, and started new day",
    };

    Ok(Json(StreakUpdateResponse {
        current_streak: update.profile.current_streak,
        longest_streak: update.profile.longest_streak,
        multiplier: update.profile.multiplier(),
        message: message.to_string(),
    }))
}

/// Zero the streak. Intended for the external daily scheduler.
async fn reset_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakUpdateResponse>> {
    let today = utc_date(chrono::Utc::now());
    let update = state.db.break_streak_atomic(user.user_id, today).await?;

    Ok(Json(StreakUpdateResponse {
        current_streak: update.profile.current_streak,
        longest_streak: update.profile.longest_streak,
        multiplier: update.profile.multiplier(),
        message: "Streak reset".to_string(),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakCheckResponse {
    pub should_reset: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_missed: Option<i64>,
}

/// Read-only daily check for the external scheduler. Never mutates.
async fn check_streak_reset(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakCheckResponse>> {
    let today = utc_date(chrono::Utc::now());
    let profile = state.db.get_profile(user.user_id).await?;

    let Some(profile) = profile else {
        return Ok(Json(StreakCheckResponse {
            should_reset: false,
            reason: "No last active date".to_string(),
            days_missed: None,
        }));
    };

    if profile.last_active_date.is_none() {
        return Ok(Json(StreakCheckResponse {
            should_reset: false,
            reason: "No last active date".to_string(),
            days_missed: None,
        }));
    }

    if profile.streak_is_stale(today) {
        let days_missed = profile
            .days_since_last_activity(today)
            .map(|days| days - 1);
        return Ok(Json(StreakCheckResponse {
            should_reset: true,
            reason: "Missed a day".to_string(),
            days_missed,
        }));
    }

    Ok(Json(StreakCheckResponse {
        should_reset: false,
        reason: "Streak is current".to_string(),
        days_missed: None,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakStatsResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub multiplier: u32,
    pub days_since_last_activity: Option<i64>,
    pub last_active_date: Option<String>,
    pub max_multiplier: u32,
    pub multiplier_per_day: u32,
}

/// Streak stats including the multiplier configuration.
async fn get_streak_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakStatsResponse>> {
    let today = utc_date(chrono::Utc::now());
    let profile = state
        .db
        .get_profile(user.user_id)
        .await?
        .unwrap_or_else(|| Profile::new(user.user_id));

    Ok(Json(StreakStatsResponse {
        current_streak: profile.current_streak,
        longest_streak: profile.longest_streak,
        multiplier: profile.multiplier(),
        days_since_last_activity: profile.days_since_last_activity(today),
        last_active_date: profile.last_active_date.map(|d| d.to_string()),
        max_multiplier: MAX_MULTIPLIER,
        multiplier_per_day: MULTIPLIER_PER_DAY,
    }))
}
