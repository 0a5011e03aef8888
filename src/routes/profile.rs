// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes: account summary and edits.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::profile::Profile;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_NAME_LEN: usize = 80;
const MAX_BIO_LEN: usize = 280;
const MAX_LOCATION_LEN: usize = 80;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/profile", get(get_profile).put(update_profile))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileStats {
    pub trips: u32,
    /// Total distance, km, one decimal
    pub distance_km: f64,
    pub coins: u32,
    /// Virtual plus real-world trees
    pub trees: u32,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub picture: Option<String>,
    pub joined: String,
    pub stats: ProfileStats,
}

async fn build_profile_response(
    state: &AppState,
    user_id: u64,
) -> Result<ProfileResponse> {
    let user = state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let profile = state
        .db
        .get_profile(user_id)
        .await?
        .unwrap_or_else(|| Profile::new(user_id));

    let trip_stats = state.db.get_trip_stats(user_id).await?.unwrap_or_default();
    let distance_km = (trip_stats.total_distance_m / 1000.0 * 10.0).round() / 10.0;

    Ok(ProfileResponse {
        username: user.username(),
        name: user.name,
        email: user.email,
        bio: profile.bio,
        location: profile.location,
        picture: user.picture,
        joined: user.created_at,
        stats: ProfileStats {
            trips: trip_stats.total_trips,
            distance_km,
            coins: profile.total_coins,
            trees: profile.trees_planted_virtual + profile.trees_planted_real,
        },
    })
}

/// Account summary with aggregate stats.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    Ok(Json(build_profile_response(&state, user.user_id).await?))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// Update display name, bio, and location. Counters are untouched.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    if let Some(name) = &req.name {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(AppError::BadRequest(format!(
                "name must be 1-{} characters",
                MAX_NAME_LEN
            )));
        }
    }
    if req.bio.as_ref().is_some_and(|b| b.len() > MAX_BIO_LEN) {
        return Err(AppError::BadRequest(format!(
            "bio must be at most {} characters",
            MAX_BIO_LEN
        )));
    }
    if req
        .location
        .as_ref()
        .is_some_and(|l| l.len() > MAX_LOCATION_LEN)
    {
        return Err(AppError::BadRequest(format!(
            "location must be at most {} characters",
            MAX_LOCATION_LEN
        )));
    }

    if let Some(name) = req.name {
        let mut user_doc = state
            .db
            .get_user(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;
        user_doc.name = name;
        state.db.upsert_user(&user_doc).await?;
    }

    if req.bio.is_some() || req.location.is_some() {
        let mut profile = state
            .db
            .get_profile(user.user_id)
            .await?
            .unwrap_or_else(|| Profile::new(user.user_id));
        if let Some(bio) = req.bio {
            profile.bio = Some(bio);
        }
        if let Some(location) = req.location {
            profile.location = Some(location);
        }
        state.db.upsert_profile(&profile).await?;
    }

    Ok(Json(build_profile_response(&state, user.user_id).await?))
}
