// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip completion service.
//!
//! Handles the core workflow:
//! 1. Evaluate the trip (validity, mode guess, coin award)
//! 2. Build the immutable trip record
//! 3. Atomically store the trip, aggregate, balance, and weekly entry

use chrono::{DateTime, Duration, Utc};

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::trip::{evaluate_trip, Trip, TripEvaluation};
use crate::time_utils::format_utc_rfc3339;

/// Raw input for a completed trip, already range-validated by the
/// handler layer.
#[derive(Debug, Clone)]
pub struct CompletedTripInput {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub distance_m: f64,
    pub duration_s: u32,
    pub route: String,
}

/// Result of processing a trip completion.
#[derive(Debug, Clone)]
pub struct CompletedTrip {
    pub trip: Trip,
    pub evaluation: TripEvaluation,
    pub new_balance: u32,
    /// False when this was a duplicate submission of an existing trip.
    pub was_new: bool,
}

/// Processes trip-completion events.
#[derive(Clone)]
pub struct TripProcessor {
    db: FirestoreDb,
}

impl TripProcessor {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Evaluate and persist a completed trip.
    ///
    /// Invalidity is a result value, never an error: the trip is
    /// stored either way, with a zero award when invalid.
    pub async fn complete_trip(
        &self,
        user_id: u64,
        input: CompletedTripInput,
    ) -> Result<CompletedTrip> {
        let evaluation = evaluate_trip(input.distance_m, input.duration_s, &input.route);

        let ended_at = Utc::now();
        let started_at = ended_at - Duration::seconds(i64::from(input.duration_s));
        let trip = build_trip(user_id, &input, &evaluation, started_at, ended_at);

        tracing::info!(
            user_id,
            trip_id = %trip.trip_id,
            distance_m = input.distance_m,
            duration_s = input.duration_s,
            valid = evaluation.valid,
            coins = evaluation.coins_awarded,
            mode = %evaluation.mode_guess,
            "Processing trip completion"
        );

        let outcome = self.db.record_trip_atomic(&trip).await?;

        Ok(CompletedTrip {
            trip,
            evaluation,
            new_balance: outcome.new_balance,
            was_new: outcome.was_new,
        })
    }
}

/// Build the immutable trip record from evaluated input.
fn build_trip(
    user_id: u64,
    input: &CompletedTripInput,
    evaluation: &TripEvaluation,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
) -> Trip {
    Trip {
        trip_id: Trip::doc_id(user_id, ended_at),
        user_id,
        start_lat: input.start_lat,
        start_lng: input.start_lng,
        end_lat: input.end_lat,
        end_lng: input.end_lng,
        distance_m: input.distance_m,
        duration_s: input.duration_s,
        mode_guess: evaluation.mode_guess,
        valid: evaluation.valid,
        coins_awarded: evaluation.coins_awarded,
        started_at: format_utc_rfc3339(started_at),
        ended_at: format_utc_rfc3339(ended_at),
        ended_at_ms: ended_at.timestamp_millis(),
        route: input.route.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::ModeGuess;

    fn input(distance_m: f64, duration_s: u32) -> CompletedTripInput {
        CompletedTripInput {
            start_lat: 37.0,
            start_lng: -122.0,
            end_lat: 37.01,
            end_lng: -122.0,
            distance_m,
            duration_s,
            route: String::new(),
        }
    }

    #[test]
    fn test_build_trip_derives_start_from_duration() {
        let ended_at = DateTime::from_timestamp(1_704_103_200, 0).unwrap();
        let started_at = ended_at - Duration::seconds(600);
        let evaluation = evaluate_trip(1000.0, 600, "");

        let trip = build_trip(7, &input(1000.0, 600), &evaluation, started_at, ended_at);

        assert_eq!(trip.trip_id, format!("7_{}", ended_at.timestamp_millis()));
        assert_eq!(trip.started_at, "2024-01-01T09:50:00Z");
        assert_eq!(trip.ended_at, "2024-01-01T10:00:00Z");
        assert!(trip.valid);
        assert_eq!(trip.mode_guess, ModeGuess::Walk);
        assert_eq!(trip.coins_awarded, 10);
    }

    #[test]
    fn test_build_trip_invalid_awards_nothing() {
        let ended_at = DateTime::from_timestamp(1_704_103_200, 0).unwrap();
        let evaluation = evaluate_trip(100.0, 600, "");

        let trip = build_trip(7, &input(100.0, 600), &evaluation, ended_at, ended_at);

        assert!(!trip.valid);
        assert_eq!(trip.coins_awarded, 0);
    }
}
