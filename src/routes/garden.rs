// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garden and coin routes: balance, planting, removal, grid view.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::garden::{self, GardenTile, TreeType, GRID_COLS, GRID_ROWS};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/coins", get(get_balance))
        .route("/api/coins/add", post(add_coins))
        .route("/api/garden", get(get_garden))
        .route("/api/garden/plant", post(plant_tree))
        .route("/api/garden/remove", post(remove_tree))
}

// ─── Coin Balance ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BalanceResponse {
    pub coins: u32,
}

/// Get the user's coin balance.
async fn get_balance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<BalanceResponse>> {
    let coins = state
        .db
        .get_profile(user.user_id)
        .await?
        .map_or(0, |p| p.total_coins);

    Ok(Json(BalanceResponse { coins }))
}

#[derive(Deserialize)]
pub struct AddCoinsRequest {
    pub amount: u32,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AddCoinsResponse {
    pub new_balance: u32,
}

/// Credit coins to the balance and the weekly board.
async fn add_coins(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AddCoinsRequest>,
) -> Result<Json<AddCoinsResponse>> {
    if req.amount == 0 {
        return Err(AppError::BadRequest("amount must be positive".to_string()));
    }

    let new_balance = state.db.add_coins_atomic(user.user_id, req.amount).await?;

    Ok(Json(AddCoinsResponse { new_balance }))
}

// ─── Garden View ─────────────────────────────────────────────

/// One planted tile, as exposed to clients.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TileInfo {
    pub x: u32,
    pub y: u32,
    pub tree: String,
    pub status: String,
    pub planted_at: String,
}

impl From<&GardenTile> for TileInfo {
    fn from(tile: &GardenTile) -> Self {
        Self {
            x: tile.x,
            y: tile.y,
            tree: tile.tree.to_string(),
            status: match tile.status {
                crate::models::garden::TileStatus::Alive => "alive".to_string(),
                crate::models::garden::TileStatus::Withered => "withered".to_string(),
            },
            planted_at: tile.planted_at.clone(),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GardenResponse {
    /// Row-major grid of tile types, "empty" where nothing grows
    pub tiles: Vec<String>,
    pub trees: Vec<TileInfo>,
}

/// Get the garden grid. House cells are never listed.
async fn get_garden(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<GardenResponse>> {
    let all_tiles = state.db.get_garden_tiles(user.user_id).await?;

    let trees = all_tiles
        .iter()
        .filter(|t| !garden::is_house(t.x, t.y, GRID_COLS, GRID_ROWS))
        .map(TileInfo::from)
        .collect();

    Ok(Json(GardenResponse {
        tiles: garden::tiles_view(&all_tiles),
        trees,
    }))
}

// ─── Planting / Removal ──────────────────────────────────────

#[derive(Deserialize)]
pub struct PlantTreeRequest {
    pub x: u32,
    pub y: u32,
    #[serde(rename = "type")]
    pub tree: TreeType,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlantTreeResponse {
    pub tree: TileInfo,
    pub new_balance: u32,
}

/// Plant a tree: debit the price and create the tile atomically.
async fn plant_tree(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PlantTreeRequest>,
) -> Result<Json<PlantTreeResponse>> {
    if !req.tree.is_purchasable() {
        return Err(AppError::BadRequest(
            "Withered trees are not for sale".to_string(),
        ));
    }
    if req.x >= GRID_COLS || req.y >= GRID_ROWS {
        return Err(AppError::InvalidLocation(format!(
            "Tile ({}, {}) is outside the {}x{} grid",
            req.x, req.y, GRID_COLS, GRID_ROWS
        )));
    }
    if garden::is_house(req.x, req.y, GRID_COLS, GRID_ROWS) {
        return Err(AppError::InvalidLocation(
            "You can't plant on the house tiles".to_string(),
        ));
    }

    let (tile, new_balance) = state
        .db
        .plant_tree_atomic(user.user_id, req.x, req.y, req.tree, chrono::Utc::now())
        .await?;

    Ok(Json(PlantTreeResponse {
        tree: TileInfo::from(&tile),
        new_balance,
    }))
}

#[derive(Deserialize)]
pub struct RemoveTreeRequest {
    pub x: u32,
    pub y: u32,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RemoveTreeResponse {
    /// Half the original price, floored; zero for withered trees
    pub refund: u32,
    pub new_balance: u32,
}

/// Remove a tree: credit the refund and delete the tile atomically.
async fn remove_tree(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RemoveTreeRequest>,
) -> Result<Json<RemoveTreeResponse>> {
    if req.x >= GRID_COLS || req.y >= GRID_ROWS {
        return Err(AppError::InvalidLocation(format!(
            "Tile ({}, {}) is outside the {}x{} grid",
            req.x, req.y, GRID_COLS, GRID_ROWS
        )));
    }

    let (refund, new_balance) = state
        .db
        .remove_tree_atomic(user.user_id, req.x, req.y)
        .await?;

    Ok(Json(RemoveTreeResponse {
        refund,
        new_balance,
    }))
}
