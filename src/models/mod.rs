// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod garden;
pub mod leaderboard;
pub mod profile;
pub mod stats;
pub mod trip;
pub mod user;

pub use garden::{GardenTile, TileStatus, TreeType};
pub use leaderboard::WeeklyEntry;
pub use profile::{Profile, StreakChange};
pub use stats::TripStats;
pub use trip::{ModeGuess, Trip, TripEvaluation};
pub use user::User;
