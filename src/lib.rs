// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Greenmiles: earn coins for green trips, grow a garden
//!
//! This crate provides the backend API for validating walking/cycling
//! trips, awarding coins, and maintaining gardens, streaks, and the
//! weekly leaderboard.

pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::TripProcessor;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub trip_processor: TripProcessor,
}
