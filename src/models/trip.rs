// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Trip model, validation rules, and coin rewards.

use serde::{Deserialize, Serialize};

use crate::geo::{self, LatLng};

/// Minimum distance for a trip to count.
pub const MIN_DISTANCE_M: f64 = 500.0;
/// Minimum duration for a trip to count (8 minutes).
pub const MIN_DURATION_S: u32 = 480;
/// Maximum average speed for a trip to count.
pub const MAX_AVG_SPEED_KMH: f64 = 15.0;
/// Maximum speed between adjacent route samples; anything faster is a
/// GPS glitch or a vehicle.
pub const MAX_POINT_SPEED_KMH: f64 = 30.0;

/// One coin per this many meters of validated distance.
const METERS_PER_COIN: f64 = 100.0;

const WALK_MAX_KMH: f64 = 6.0;
const BIKE_MAX_KMH: f64 = 25.0;

/// Transport-mode guess derived from average speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeGuess {
    Walk,
    Bike,
    Unknown,
}

impl std::fmt::Display for ModeGuess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeGuess::Walk => write!(f, "walk"),
            ModeGuess::Bike => write!(f, "bike"),
            ModeGuess::Unknown => write!(f, "unknown"),
        }
    }
}

/// Stored trip record in Firestore. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    /// Document ID: `{user_id}_{ended_at_millis}`
    pub trip_id: String,
    /// Owning user
    pub user_id: u64,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    /// Distance in meters
    pub distance_m: f64,
    /// Duration in seconds
    pub duration_s: u32,
    pub mode_guess: ModeGuess,
    pub valid: bool,
    /// Zero when invalid
    pub coins_awarded: u32,
    /// Start time (RFC3339)
    pub started_at: String,
    /// End time (RFC3339)
    pub ended_at: String,
    /// End time in Unix milliseconds; listing queries sort on this
    pub ended_at_ms: i64,
    /// Opaque route payload as submitted by the client
    pub route: String,
}

impl Trip {
    /// Document ID for a trip ending at the given instant.
    pub fn doc_id(user_id: u64, ended_at: chrono::DateTime<chrono::Utc>) -> String {
        format!("{}_{}", user_id, ended_at.timestamp_millis())
    }
}

/// One timestamped GPS sample in a submitted route payload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RouteSample {
    pub lat: f64,
    pub lng: f64,
    /// Unix timestamp in seconds
    pub t: i64,
}

/// Result of evaluating a completed trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripEvaluation {
    pub valid: bool,
    pub mode_guess: ModeGuess,
    pub coins_awarded: u32,
    pub avg_speed_kmh: f64,
}

/// Classify a completed trip and compute its coin award.
///
/// The aggregate checks (distance, duration, average speed) decide
/// validity; the mode guess depends only on the average speed. When the
/// route payload parses as timestamped samples, any adjacent-sample
/// segment faster than [`MAX_POINT_SPEED_KMH`] also invalidates the
/// trip. Unparseable payloads stay opaque and skip that pass.
pub fn evaluate_trip(distance_m: f64, duration_s: u32, route: &str) -> TripEvaluation {
    let avg_speed_kmh = geo::average_speed_kmh(distance_m, duration_s).unwrap_or(f64::INFINITY);

    let mode_guess = if avg_speed_kmh <= WALK_MAX_KMH {
        ModeGuess::Walk
    } else if avg_speed_kmh <= BIKE_MAX_KMH {
        ModeGuess::Bike
    } else {
        ModeGuess::Unknown
    };

    let valid = distance_m >= MIN_DISTANCE_M
        && duration_s >= MIN_DURATION_S
        && avg_speed_kmh <= MAX_AVG_SPEED_KMH
        && !route_exceeds_point_speed(route);

    let coins_awarded = if valid {
        (distance_m / METERS_PER_COIN).round().max(1.0) as u32
    } else {
        0
    };

    TripEvaluation {
        valid,
        mode_guess,
        coins_awarded,
        avg_speed_kmh,
    }
}

/// True when any adjacent-sample segment is faster than the point cap.
///
/// Samples with non-increasing timestamps count as over the cap (the
/// segment speed is undefined or infinite).
fn route_exceeds_point_speed(route: &str) -> bool {
    let samples: Vec<RouteSample> = match serde_json::from_str(route) {
        Ok(samples) => samples,
        Err(_) => return false,
    };

    samples.windows(2).any(|pair| {
        let dt = pair[1].t - pair[0].t;
        if dt <= 0 {
            return true;
        }
        let segment_m = geo::haversine_m(
            LatLng {
                lat: pair[0].lat,
                lng: pair[0].lng,
            },
            LatLng {
                lat: pair[1].lat,
                lng: pair[1].lng,
            },
        );
        let speed_kmh = (segment_m / 1000.0) / (dt as f64 / 3600.0);
        speed_kmh > MAX_POINT_SPEED_KMH
    })
}
