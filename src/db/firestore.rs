// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users and profiles (coin balance, streak state)
//! - Trips and trip aggregates
//! - Garden tiles
//! - Weekly leaderboard entries
//!
//! Every mutation that touches more than one counter runs as a single
//! Firestore transaction, so a crash or a concurrent conflicting
//! request can never leave a balance debited without its tile, a trip
//! without its leaderboard increment, or a reset streak without its
//! withered tree.

use chrono::{DateTime, NaiveDate, Utc};
use futures_util::{stream, StreamExt};
use std::collections::HashMap;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    garden::{GardenTile, TileStatus, TreeType},
    leaderboard::WeeklyEntry,
    profile::{Profile, StreakChange},
    stats::TripStats,
    trip::Trip,
    user::User,
};
use crate::time_utils::{format_utc_rfc3339, week_start};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Result of atomically recording a completed trip.
#[derive(Debug, Clone, Copy)]
pub struct TripWriteOutcome {
    /// False when the same trip document already existed (duplicate
    /// submission; nothing was written).
    pub was_new: bool,
    /// Coin balance after the award (unchanged for invalid trips).
    pub new_balance: u32,
}

/// Result of a streak transition applied in a transaction.
#[derive(Debug, Clone)]
pub struct StreakUpdate {
    pub profile: Profile,
    pub change: StreakChange,
    /// The tile withered by this transition, if any.
    pub withered: Option<GardenTile>,
}

/// Cursor into a user's trip listing (newest first).
#[derive(Debug, Clone, Copy)]
pub struct TripQueryCursor {
    pub ended_at_ms: i64,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user.user_id.to_string())
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Fetch display users for a set of IDs, concurrently with a limit.
    pub async fn get_users(&self, user_ids: &[u64]) -> Result<HashMap<u64, User>, AppError> {
        let results: Vec<Result<Option<User>, AppError>> = stream::iter(user_ids.to_vec())
            .map(|id| async move { self.get_user(id).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut users = HashMap::new();
        for result in results {
            if let Some(user) = result? {
                users.insert(user.user_id, user);
            }
        }
        Ok(users)
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a user's profile, if one has been created.
    pub async fn get_profile(&self, user_id: u64) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a profile outside a transaction (bio/location
    /// edits; counter mutations go through the atomic operations).
    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(profile.user_id.to_string())
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Trip Operations ─────────────────────────────────────────

    /// Get a trip by ID.
    pub async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TRIPS)
            .obj()
            .one(trip_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get trips for a user, newest first, with cursor pagination.
    pub async fn get_trips_for_user(
        &self,
        user_id: u64,
        cursor: Option<TripQueryCursor>,
        limit: u32,
    ) -> Result<Vec<Trip>, AppError> {
        let query = self.get_client()?.fluent().select().from(collections::TRIPS);

        let query = if let Some(cursor) = cursor {
            query.filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("ended_at_ms").less_than(cursor.ended_at_ms),
                ])
            })
        } else {
            query.filter(move |q| q.field("user_id").eq(user_id))
        };

        query
            .order_by([("ended_at_ms", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's trips that started on the given UTC calendar day.
    pub async fn get_trips_for_day(
        &self,
        user_id: u64,
        day: NaiveDate,
    ) -> Result<Vec<Trip>, AppError> {
        let day_start = format!("{}T00:00:00Z", day);
        let next_day = format!("{}T00:00:00Z", day + chrono::Days::new(1));

        self.get_client()?
            .fluent()
            .select()
            .from(collections::TRIPS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("started_at").greater_than_or_equal(day_start.clone()),
                    q.field("started_at").less_than(next_day.clone()),
                ])
            })
            .order_by([("started_at", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the pre-computed trip aggregate for a user.
    pub async fn get_trip_stats(&self, user_id: u64) -> Result<Option<TripStats>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TRIP_STATS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Atomic Trip Recording ───────────────────────────────────

    /// Atomically record a completed trip: store the trip, fold it
    /// into the aggregate, and (for valid trips) credit the balance
    /// and the weekly leaderboard entry.
    ///
    /// Returns `was_new = false` when the trip document already exists
    /// (duplicate submission); in that case nothing is written.
    pub async fn record_trip_atomic(&self, trip: &Trip) -> Result<TripWriteOutcome, AppError> {
        let user_id = trip.user_id;
        let now = format_utc_rfc3339(Utc::now());

        // Begin a transaction
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Idempotency: a duplicate submission maps to the same document ID
        let existing: Option<Trip> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TRIPS)
            .obj()
            .one(&trip.trip_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read trip in transaction: {}", e)))?;

        if existing.is_some() {
            tracing::debug!(
                user_id,
                trip_id = %trip.trip_id,
                "Trip already recorded (idempotent skip)"
            );
            let _ = transaction.rollback().await;
            let balance = self.get_profile(user_id).await?.map_or(0, |p| p.total_coins);
            return Ok(TripWriteOutcome {
                was_new: false,
                new_balance: balance,
            });
        }

        let mut stats = self.get_trip_stats(user_id).await?.unwrap_or_default();
        stats.record_trip(trip, &now);

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::TRIPS)
            .document_id(&trip.trip_id)
            .object(trip)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add trip to transaction: {}", e)))?;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::TRIP_STATS)
            .document_id(user_id.to_string())
            .object(&stats)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add stats to transaction: {}", e)))?;

        // Valid trips credit the balance and the weekly board in the
        // same transaction; invalid trips only record the attempt.
        let mut new_balance = 0;
        if trip.valid && trip.coins_awarded > 0 {
            let mut profile = self
                .get_profile(user_id)
                .await?
                .unwrap_or_else(|| Profile::new(user_id));
            profile.total_coins = checked_credit(profile.total_coins, trip.coins_awarded)?;
            new_balance = profile.total_coins;

            let ended = DateTime::parse_from_rfc3339(&trip.ended_at)
                .map_err(|e| AppError::Invariant(format!("Unparseable trip end time: {}", e)))?
                .with_timezone(&Utc);
            let week = week_start(ended.date_naive());
            let entry = self
                .read_weekly_entry(week, user_id)
                .await?
                .map(|mut e| -> Result<WeeklyEntry, AppError> {
                    e.coins = checked_credit(e.coins, trip.coins_awarded)?;
                    Ok(e)
                })
                .transpose()?
                .unwrap_or(WeeklyEntry {
                    week_start: week,
                    user_id,
                    coins: trip.coins_awarded,
                });

            self.add_profile_write(&profile, &mut transaction)?;
            self.add_weekly_entry_write(&entry, &mut transaction)?;
        } else if let Some(profile) = self.get_profile(user_id).await? {
            new_balance = profile.total_coins;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            user_id,
            trip_id = %trip.trip_id,
            valid = trip.valid,
            coins = trip.coins_awarded,
            "Trip recorded atomically"
        );

        Ok(TripWriteOutcome {
            was_new: true,
            new_balance,
        })
    }

    // ─── Coin / Leaderboard Operations ───────────────────────────

    /// Atomically credit coins to the balance and the current week's
    /// leaderboard entry.
    pub async fn add_coins_atomic(&self, user_id: u64, amount: u32) -> Result<u32, AppError> {
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut profile = self
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| Profile::new(user_id));
        profile.total_coins = checked_credit(profile.total_coins, amount)?;

        let week = week_start(Utc::now().date_naive());
        let entry = self
            .read_weekly_entry(week, user_id)
            .await?
            .map(|mut e| -> Result<WeeklyEntry, AppError> {
                e.coins = checked_credit(e.coins, amount)?;
                Ok(e)
            })
            .transpose()?
            .unwrap_or(WeeklyEntry {
                week_start: week,
                user_id,
                coins: amount,
            });

        self.add_profile_write(&profile, &mut transaction)?;
        self.add_weekly_entry_write(&entry, &mut transaction)?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(profile.total_coins)
    }

    /// Upsert-increment the `(week, user)` leaderboard entry.
    pub async fn record_weekly_coins(
        &self,
        user_id: u64,
        amount: u32,
        week: NaiveDate,
    ) -> Result<WeeklyEntry, AppError> {
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let entry = self
            .read_weekly_entry(week, user_id)
            .await?
            .map(|mut e| -> Result<WeeklyEntry, AppError> {
                e.coins = checked_credit(e.coins, amount)?;
                Ok(e)
            })
            .transpose()?
            .unwrap_or(WeeklyEntry {
                week_start: week,
                user_id,
                coins: amount,
            });

        self.add_weekly_entry_write(&entry, &mut transaction)?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(entry)
    }

    /// Get a single weekly entry.
    pub async fn get_weekly_entry(
        &self,
        week: NaiveDate,
        user_id: u64,
    ) -> Result<Option<WeeklyEntry>, AppError> {
        self.read_weekly_entry(week, user_id).await
    }

    /// All entries for a week, coins descending.
    pub async fn get_weekly_entries(&self, week: NaiveDate) -> Result<Vec<WeeklyEntry>, AppError> {
        let week_key = week.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD_WEEKS)
            .filter(move |q| q.field("week_start").eq(week_key.clone()))
            .order_by([("coins", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn read_weekly_entry(
        &self,
        week: NaiveDate,
        user_id: u64,
    ) -> Result<Option<WeeklyEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::LEADERBOARD_WEEKS)
            .obj()
            .one(&WeeklyEntry::doc_id(week, user_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Garden Operations ───────────────────────────────────────

    /// All tiles in a user's garden, oldest planting first.
    pub async fn get_garden_tiles(&self, user_id: u64) -> Result<Vec<GardenTile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::GARDEN_TILES)
            .filter(move |q| q.field("user_id").eq(user_id))
            .order_by([("planted_at", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The most recently planted tile that is still alive.
    async fn newest_alive_tile(&self, user_id: u64) -> Result<Option<GardenTile>, AppError> {
        let tiles: Vec<GardenTile> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::GARDEN_TILES)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("status").eq("alive"),
                ])
            })
            .order_by([("planted_at", firestore::FirestoreQueryDirection::Descending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(tiles.into_iter().next())
    }

    /// Atomically debit the tree price, bump the planted counter, and
    /// create the tile. The caller has already validated the location.
    pub async fn plant_tree_atomic(
        &self,
        user_id: u64,
        x: u32,
        y: u32,
        tree: TreeType,
        now: DateTime<Utc>,
    ) -> Result<(GardenTile, u32), AppError> {
        let price = tree.price();

        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let existing: Option<GardenTile> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::GARDEN_TILES)
            .obj()
            .one(&GardenTile::doc_id(user_id, x, y))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_some() {
            let _ = transaction.rollback().await;
            return Err(AppError::TileOccupied { x, y });
        }

        let mut profile = self
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| Profile::new(user_id));

        if profile.total_coins < price {
            let _ = transaction.rollback().await;
            return Err(AppError::InsufficientFunds {
                required: price,
                available: profile.total_coins,
            });
        }

        profile.total_coins = checked_debit(profile.total_coins, price)?;
        profile.trees_planted_virtual += 1;

        let tile = GardenTile {
            user_id,
            x,
            y,
            tree,
            status: TileStatus::Alive,
            planted_at: format_utc_rfc3339(now),
        };

        self.add_profile_write(&profile, &mut transaction)?;
        self.add_tile_write(&tile, &mut transaction)?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(user_id, x, y, tree = %tree, price, "Tree planted");

        Ok((tile, profile.total_coins))
    }

    /// Atomically credit the refund and delete the tile.
    pub async fn remove_tree_atomic(
        &self,
        user_id: u64,
        x: u32,
        y: u32,
    ) -> Result<(u32, u32), AppError> {
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let doc_id = GardenTile::doc_id(user_id, x, y);
        let existing: Option<GardenTile> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::GARDEN_TILES)
            .obj()
            .one(&doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(tile) = existing else {
            let _ = transaction.rollback().await;
            return Err(AppError::NotFound(format!(
                "No tree at tile ({}, {})",
                x, y
            )));
        };

        let refund = tile.tree.refund();
        let mut profile = self
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| Profile::new(user_id));

        if refund > 0 {
            profile.total_coins = checked_credit(profile.total_coins, refund)?;
            self.add_profile_write(&profile, &mut transaction)?;
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::GARDEN_TILES)
            .document_id(&doc_id)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add deletion to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(user_id, x, y, refund, "Tree removed");

        Ok((refund, profile.total_coins))
    }

    // ─── Streak Operations ───────────────────────────────────────

    /// Credit `today` as an active day, withering the newest alive
    /// tree in the same transaction when a missed day resets the
    /// streak.
    pub async fn record_streak_day_atomic(
        &self,
        user_id: u64,
        today: NaiveDate,
    ) -> Result<StreakUpdate, AppError> {
        self.apply_streak_transition(user_id, today, |profile| profile.record_active_day(today))
            .await
    }

    /// Zero the streak (scheduled-job path), withering the newest
    /// alive tree. Idempotent across repeated same-day calls.
    pub async fn break_streak_atomic(
        &self,
        user_id: u64,
        today: NaiveDate,
    ) -> Result<StreakUpdate, AppError> {
        self.apply_streak_transition(user_id, today, |profile| profile.break_streak(today))
            .await
    }

    async fn apply_streak_transition<F>(
        &self,
        user_id: u64,
        today: NaiveDate,
        transition: F,
    ) -> Result<StreakUpdate, AppError>
    where
        F: FnOnce(&mut Profile) -> StreakChange,
    {
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut profile = self
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| Profile::new(user_id));

        let change = transition(&mut profile);

        if change == StreakChange::AlreadyCredited {
            let _ = transaction.rollback().await;
            tracing::debug!(user_id, %today, "Streak already credited today (idempotent skip)");
            return Ok(StreakUpdate {
                profile,
                change,
                withered: None,
            });
        }

        self.add_profile_write(&profile, &mut transaction)?;

        let withered = if change.withers_tree() {
            match self.newest_alive_tile(user_id).await? {
                Some(mut tile) => {
                    tile.wither();
                    self.add_tile_write(&tile, &mut transaction)?;
                    Some(tile)
                }
                None => None,
            }
        } else {
            None
        };

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            user_id,
            %today,
            streak = profile.current_streak,
            withered = withered.is_some(),
            "Streak transition applied"
        );

        Ok(StreakUpdate {
            profile,
            change,
            withered,
        })
    }

    // ─── Transaction Write Helpers ───────────────────────────────

    fn add_profile_write(
        &self,
        profile: &Profile,
        transaction: &mut firestore::FirestoreTransaction,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(profile.user_id.to_string())
            .object(profile)
            .add_to_transaction(transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add profile to transaction: {}", e))
            })?;
        Ok(())
    }

    fn add_tile_write(
        &self,
        tile: &GardenTile,
        transaction: &mut firestore::FirestoreTransaction,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::GARDEN_TILES)
            .document_id(GardenTile::doc_id(tile.user_id, tile.x, tile.y))
            .object(tile)
            .add_to_transaction(transaction)
            .map_err(|e| AppError::Database(format!("Failed to add tile to transaction: {}", e)))?;
        Ok(())
    }

    fn add_weekly_entry_write(
        &self,
        entry: &WeeklyEntry,
        transaction: &mut firestore::FirestoreTransaction,
    ) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::LEADERBOARD_WEEKS)
            .document_id(WeeklyEntry::doc_id(entry.week_start, entry.user_id))
            .object(entry)
            .add_to_transaction(transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add weekly entry to transaction: {}", e))
            })?;
        Ok(())
    }
}

/// Add coins to a counter, failing loudly on overflow instead of
/// clamping (clamping would hide a lost-update bug).
fn checked_credit(balance: u32, amount: u32) -> Result<u32, AppError> {
    balance
        .checked_add(amount)
        .ok_or_else(|| AppError::Invariant(format!("Coin balance overflow: {} + {}", balance, amount)))
}

/// Subtract coins from a counter; a would-be-negative balance is a bug
/// in the caller's affordability check.
fn checked_debit(balance: u32, amount: u32) -> Result<u32, AppError> {
    balance.checked_sub(amount).ok_or_else(|| {
        AppError::Invariant(format!("Coin balance underflow: {} - {}", balance, amount))
    })
}
