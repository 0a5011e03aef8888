// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Garden tiles, tree pricing, and grid geometry.

use serde::{Deserialize, Serialize};

/// Garden grid dimensions.
pub const GRID_COLS: u32 = 10;
pub const GRID_ROWS: u32 = 10;

/// Refund fraction when removing a tree.
const REFUND_NUMERATOR: u32 = 1;
const REFUND_DENOMINATOR: u32 = 2;

/// Tree types sold in the garden shop, plus the terminal withered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeType {
    Pine,
    Bamboo,
    Maple,
    Bonsai,
    Sakura,
    Withered,
}

impl TreeType {
    /// Shop price in coins. Withered trees have no value.
    pub fn price(&self) -> u32 {
        match self {
            TreeType::Pine => 150,
            TreeType::Bamboo => 200,
            TreeType::Maple => 300,
            TreeType::Bonsai => 500,
            TreeType::Sakura => 650,
            TreeType::Withered => 0,
        }
    }

    pub fn is_purchasable(&self) -> bool {
        !matches!(self, TreeType::Withered)
    }

    /// Coins returned when the tree is removed: half price, floored.
    pub fn refund(&self) -> u32 {
        self.price() * REFUND_NUMERATOR / REFUND_DENOMINATOR
    }
}

impl std::fmt::Display for TreeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeType::Pine => write!(f, "pine"),
            TreeType::Bamboo => write!(f, "bamboo"),
            TreeType::Maple => write!(f, "maple"),
            TreeType::Bonsai => write!(f, "bonsai"),
            TreeType::Sakura => write!(f, "sakura"),
            TreeType::Withered => write!(f, "withered"),
        }
    }
}

/// Alive/withered status flag on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStatus {
    Alive,
    Withered,
}

/// One occupied cell in a user's garden grid.
///
/// Document ID `{user_id}_{x}_{y}` enforces at most one tile per cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GardenTile {
    pub user_id: u64,
    pub x: u32,
    pub y: u32,
    pub tree: TreeType,
    pub status: TileStatus,
    /// RFC3339; sortable, newest-planted queries order by this
    pub planted_at: String,
}

impl GardenTile {
    pub fn doc_id(user_id: u64, x: u32, y: u32) -> String {
        format!("{}_{}_{}", user_id, x, y)
    }

    /// Force the tile into the terminal withered state.
    pub fn wither(&mut self) {
        self.tree = TreeType::Withered;
        self.status = TileStatus::Withered;
    }
}

/// Coordinates of the reserved 2x2 house block at the grid center.
///
/// Empty for grids too small to hold it.
pub fn house_coords(cols: u32, rows: u32) -> Vec<(u32, u32)> {
    if cols < 2 || rows < 2 {
        return Vec::new();
    }
    let cx0 = cols / 2 - 1;
    let cy0 = rows / 2 - 1;
    vec![
        (cx0, cy0),
        (cx0 + 1, cy0),
        (cx0, cy0 + 1),
        (cx0 + 1, cy0 + 1),
    ]
}

/// Whether `(x, y)` falls inside the reserved house block.
pub fn is_house(x: u32, y: u32, cols: u32, rows: u32) -> bool {
    house_coords(cols, rows).contains(&(x, y))
}

/// Whether `(x, y)` is a plantable cell: inside the grid and outside
/// the house block.
pub fn is_plantable(x: u32, y: u32) -> bool {
    x < GRID_COLS && y < GRID_ROWS && !is_house(x, y, GRID_COLS, GRID_ROWS)
}

/// Row-major grid view of tile types, `"empty"` where nothing grows.
///
/// House cells always read as empty, even if a stray record exists.
pub fn tiles_view(tiles: &[GardenTile]) -> Vec<String> {
    let mut view = vec!["empty".to_string(); (GRID_COLS * GRID_ROWS) as usize];
    for tile in tiles {
        if is_house(tile.x, tile.y, GRID_COLS, GRID_ROWS) {
            continue;
        }
        if tile.x < GRID_COLS && tile.y < GRID_ROWS {
            view[(tile.y * GRID_COLS + tile.x) as usize] = tile.tree.to_string();
        }
    }
    view
}
