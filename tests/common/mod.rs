// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use greenmiles::config::Config;
use greenmiles::db::FirestoreDb;
use greenmiles::middleware::auth::create_jwt;
use greenmiles::models::User;
use greenmiles::routes::create_router;
use greenmiles::services::TripProcessor;
use greenmiles::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let trip_processor = TripProcessor::new(db.clone());

    let state = Arc::new(AppState {
        config,
        db,
        trip_processor,
    });

    (create_router(state.clone()), state)
}

/// Mint a session token the way the identity layer would.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: u64, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create test JWT")
}

/// Seed a user document for integration tests.
#[allow(dead_code)]
pub async fn seed_user(db: &FirestoreDb, user_id: u64, name: &str) {
    let now = chrono::Utc::now().to_rfc3339();
    let user = User {
        user_id,
        name: name.to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        picture: None,
        created_at: now.clone(),
        last_active: now,
    };
    db.upsert_user(&user).await.expect("Failed to seed user");
}
