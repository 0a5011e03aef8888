// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weekly leaderboard entries and ranking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Entries returned for the current week's board.
pub const CURRENT_WEEK_TOP: u32 = 50;
/// Entries returned for historical weeks.
pub const PREVIOUS_WEEK_TOP: u32 = 10;

/// One `(week, user)` running coin total.
///
/// Document ID `{week_start}_{user_id}` enforces uniqueness; `coins`
/// only ever grows within a week, via transactional increments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyEntry {
    /// Monday of the week this entry belongs to
    pub week_start: NaiveDate,
    pub user_id: u64,
    #[serde(default)]
    pub coins: u32,
}

impl WeeklyEntry {
    pub fn doc_id(week_start: NaiveDate, user_id: u64) -> String {
        format!("{}_{}", week_start, user_id)
    }
}

/// Competition rank of a player holding `coins` among `entries`:
/// one plus the number of strictly greater totals. Tied players share
/// a rank. The same method backs both the ranked listing and the
/// players-ahead count, so the two can never disagree.
pub fn rank_for_coins(entries: &[WeeklyEntry], coins: u32) -> u32 {
    entries.iter().filter(|e| e.coins > coins).count() as u32 + 1
}

/// Annotate coin-descending `entries` with competition ranks.
pub fn competition_ranks(entries: &[WeeklyEntry]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 && entry.coins == entries[i - 1].coins {
            ranks.push(ranks[i - 1]);
        } else {
            ranks.push(i as u32 + 1);
        }
    }
    ranks
}
