//! Per-user trip aggregates for efficient dashboard queries.
//!
//! These aggregates are pre-computed when trips are recorded, reducing
//! stats reads from O(trips) to O(1). Updated atomically with the trip
//! write via Firestore transactions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Trip;
use crate::time_utils::week_start;

/// Grams of CO2 saved per km not driven.
const CO2_G_PER_KM: f64 = 120.0;

/// Pre-computed trip statistics for a user.
///
/// Stored in `trip_stats`, keyed by user id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripStats {
    /// All trips recorded, valid or not
    #[serde(default)]
    pub total_trips: u32,
    #[serde(default)]
    pub valid_trips: u32,
    /// Total distance across all trips (meters)
    #[serde(default)]
    pub total_distance_m: f64,
    /// Total duration across all trips (seconds)
    #[serde(default)]
    pub total_duration_s: u64,
    #[serde(default)]
    pub total_coins_earned: u32,
    /// Per-week totals keyed by the week's Monday ("YYYY-MM-DD")
    #[serde(default)]
    pub weeks: HashMap<String, WeekStats>,
    /// Last update timestamp (RFC3339)
    #[serde(default)]
    pub updated_at: String,
}

/// One week's slice of the aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekStats {
    #[serde(default)]
    pub trips: u32,
    #[serde(default)]
    pub valid_trips: u32,
    #[serde(default)]
    pub distance_m: f64,
    #[serde(default)]
    pub duration_s: u64,
    #[serde(default)]
    pub coins: u32,
}

impl WeekStats {
    /// Distance in km, as displayed.
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Estimated grams of CO2 saved this week.
    pub fn co2_saved_g(&self) -> f64 {
        self.distance_km() * CO2_G_PER_KM
    }
}

impl TripStats {
    /// Fold a newly recorded trip into the aggregate.
    ///
    /// Idempotency is handled one level up: the trip document's
    /// existence is checked in the same transaction, so a duplicate
    /// submission never reaches this method twice.
    pub fn record_trip(&mut self, trip: &Trip, now: &str) {
        self.total_trips += 1;
        self.total_distance_m += trip.distance_m;
        self.total_duration_s += u64::from(trip.duration_s);
        self.updated_at = now.to_string();

        if trip.valid {
            self.valid_trips += 1;
            self.total_coins_earned += trip.coins_awarded;
        }

        if let Ok(started) = chrono::DateTime::parse_from_rfc3339(&trip.started_at) {
            let week_key = week_start(started.date_naive()).to_string();
            let week = self.weeks.entry(week_key).or_default();
            week.trips += 1;
            week.distance_m += trip.distance_m;
            week.duration_s += u64::from(trip.duration_s);
            if trip.valid {
                week.valid_trips += 1;
                week.coins += trip.coins_awarded;
            }
        }
    }

    /// The aggregate slice for the week containing `date`.
    pub fn week(&self, date: chrono::NaiveDate) -> WeekStats {
        self.weeks
            .get(&week_start(date).to_string())
            .cloned()
            .unwrap_or_default()
    }
}
