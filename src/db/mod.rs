//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROFILES: &str = "profiles";
    pub const TRIPS: &str = "trips";
    /// Trip aggregates (keyed by user_id)
    pub const TRIP_STATS: &str = "trip_stats";
    pub const GARDEN_TILES: &str = "garden_tiles";
    pub const LEADERBOARD_WEEKS: &str = "leaderboard_weeks";
}
