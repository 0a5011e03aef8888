// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip routes: completion, listing, and stats views.

use crate::db::firestore::TripQueryCursor;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::trip::Trip;
use crate::services::trip::CompletedTripInput;
use crate::time_utils::{utc_date, week_start};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_PER_PAGE: u32 = 100;
const CURSOR_PARTS: usize = 2;
/// Route payloads above this size are rejected outright.
const MAX_ROUTE_BYTES: usize = 64 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/trips/complete", post(complete_trip))
        .route("/api/trips", get(get_trips))
        .route("/api/trips/stats", get(get_trip_stats))
        .route("/api/trips/today", get(get_today_trips))
        .route("/api/trips/stats/week", get(get_weekly_stats))
}

// ─── Trip Completion ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct CompleteTripRequest {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub distance_m: f64,
    pub duration_s: u32,
    /// Opaque route payload (JSON samples from the recorder)
    #[serde(default)]
    pub route: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CompleteTripResponse {
    pub trip: TripSummary,
    pub valid: bool,
    pub coins_awarded: u32,
    pub mode_guess: String,
    /// Average speed rounded to one decimal
    pub avg_speed_kmh: f64,
    pub new_balance: u32,
}

/// Summary of a stored trip.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripSummary {
    pub id: String,
    pub started_at: String,
    pub ended_at: String,
    pub distance_m: f64,
    pub duration_s: u32,
    pub mode_guess: String,
    pub valid: bool,
    pub coins_awarded: u32,
}

impl From<&Trip> for TripSummary {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.trip_id.clone(),
            started_at: trip.started_at.clone(),
            ended_at: trip.ended_at.clone(),
            distance_m: trip.distance_m,
            duration_s: trip.duration_s,
            mode_guess: trip.mode_guess.to_string(),
            valid: trip.valid,
            coins_awarded: trip.coins_awarded,
        }
    }
}

fn validate_coordinate(lat: f64, lng: f64, label: &str) -> Result<()> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::BadRequest(format!(
            "{} latitude out of range",
            label
        )));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::BadRequest(format!(
            "{} longitude out of range",
            label
        )));
    }
    Ok(())
}

/// Record a completed trip.
///
/// Always succeeds for well-formed input: an invalid trip is stored
/// with a zero award and reported in the response, not as an error.
async fn complete_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CompleteTripRequest>,
) -> Result<Json<CompleteTripResponse>> {
    validate_coordinate(req.start_lat, req.start_lng, "start")?;
    validate_coordinate(req.end_lat, req.end_lng, "end")?;

    if !req.distance_m.is_finite() || req.distance_m < 0.0 {
        return Err(AppError::BadRequest(
            "distance_m must be a non-negative number".to_string(),
        ));
    }
    if req.duration_s == 0 {
        return Err(AppError::BadRequest(
            "duration_s must be positive".to_string(),
        ));
    }
    if req.route.len() > MAX_ROUTE_BYTES {
        return Err(AppError::BadRequest("route payload too large".to_string()));
    }

    let completed = state
        .trip_processor
        .complete_trip(
            user.user_id,
            CompletedTripInput {
                start_lat: req.start_lat,
                start_lng: req.start_lng,
                end_lat: req.end_lat,
                end_lng: req.end_lng,
                distance_m: req.distance_m,
                duration_s: req.duration_s,
                route: req.route,
            },
        )
        .await?;

    Ok(Json(CompleteTripResponse {
        trip: TripSummary::from(&completed.trip),
        valid: completed.evaluation.valid,
        coins_awarded: completed.evaluation.coins_awarded,
        mode_guess: completed.evaluation.mode_guess.to_string(),
        avg_speed_kmh: (completed.evaluation.avg_speed_kmh * 10.0).round() / 10.0,
        new_balance: completed.new_balance,
    }))
}

// ─── Trip Listing ────────────────────────────────────────────

#[derive(Deserialize)]
struct TripsQuery {
    /// Cursor for forward pagination (opaque token).
    cursor: Option<String>,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_per_page() -> u32 {
    10
}

fn parse_cursor(cursor: Option<&str>) -> Result<Option<TripQueryCursor>> {
    cursor
        .map(|raw| {
            let invalid_cursor =
                || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

            let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
            let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

            let parts: Vec<&str> = decoded_str.split(':').collect();
            if parts.len() != CURSOR_PARTS {
                return Err(invalid_cursor());
            }

            let ended_at_ms = parts[0].parse::<i64>().map_err(|_| invalid_cursor())?;
            // Second part is the trip ID, carried for debuggability only
            if parts[1].is_empty() {
                return Err(invalid_cursor());
            }

            Ok(TripQueryCursor { ended_at_ms })
        })
        .transpose()
}

fn encode_cursor(trip: &Trip) -> String {
    let payload = format!("{}:{}", trip.ended_at_ms, trip.trip_id);
    URL_SAFE_NO_PAD.encode(payload)
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripsResponse {
    pub trips: Vec<TripSummary>,
    pub per_page: u32,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Get the user's trips, newest first.
async fn get_trips(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<TripsQuery>,
) -> Result<Json<TripsResponse>> {
    let limit = params.per_page.clamp(1, MAX_PER_PAGE);
    let cursor = parse_cursor(params.cursor.as_deref())?;

    tracing::debug!(
        user_id = user.user_id,
        cursor = ?params.cursor,
        per_page = limit,
        "Fetching trips"
    );

    // Fetch one extra item to determine if another page is available.
    let fetch_limit = limit.saturating_add(1);
    let mut results = state
        .db
        .get_trips_for_user(user.user_id, cursor, fetch_limit)
        .await?;

    let has_more = results.len() > limit as usize;
    if has_more {
        results.truncate(limit as usize);
    }

    let next_cursor = if has_more {
        results.last().map(encode_cursor)
    } else {
        None
    };

    Ok(Json(TripsResponse {
        trips: results.iter().map(TripSummary::from).collect(),
        per_page: limit,
        has_more,
        next_cursor,
    }))
}

// ─── Trip Stats ──────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TripStatsResponse {
    pub total_trips: u32,
    pub valid_trips: u32,
    pub total_distance_m: f64,
    pub total_duration_s: u64,
    pub total_coins_earned: u32,
}

/// All-time trip stats from the pre-computed aggregate (1 read).
async fn get_trip_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TripStatsResponse>> {
    let stats = state.db.get_trip_stats(user.user_id).await?.unwrap_or_default();

    Ok(Json(TripStatsResponse {
        total_trips: stats.total_trips,
        valid_trips: stats.valid_trips,
        total_distance_m: stats.total_distance_m,
        total_duration_s: stats.total_duration_s,
        total_coins_earned: stats.total_coins_earned,
    }))
}

/// Today's trips (UTC calendar day).
async fn get_today_trips(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TripSummary>>> {
    let today = utc_date(chrono::Utc::now());
    let trips = state.db.get_trips_for_day(user.user_id, today).await?;

    Ok(Json(trips.iter().map(TripSummary::from).collect()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyStatsResponse {
    pub week_start: String,
    pub trips: u32,
    pub valid_trips: u32,
    pub distance_m: f64,
    pub duration_s: u64,
    pub coins: u32,
    pub distance_km: f64,
    pub co2_saved_g: f64,
}

/// This week's stats slice from the aggregate.
async fn get_weekly_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<WeeklyStatsResponse>> {
    let today = utc_date(chrono::Utc::now());
    let stats = state.db.get_trip_stats(user.user_id).await?.unwrap_or_default();
    let week = stats.week(today);

    Ok(Json(WeeklyStatsResponse {
        week_start: week_start(today).to_string(),
        trips: week.trips,
        valid_trips: week.valid_trips,
        distance_m: week.distance_m,
        duration_s: week.duration_s,
        coins: week.coins,
        distance_km: week.distance_km(),
        co2_saved_g: week.co2_saved_g(),
    }))
}
