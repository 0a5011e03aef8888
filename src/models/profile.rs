// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-user profile: coin balance, streak state, and tree counters.
//!
//! The streak transitions are pure functions over stored calendar dates
//! so they can be unit tested and safely retried; the database layer
//! applies them together with the garden side effects in one
//! transaction.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Maximum coin multiplier percentage.
pub const MAX_MULTIPLIER: u32 = 50;
/// Coin multiplier increase per consecutive day.
pub const MULTIPLIER_PER_DAY: u32 = 10;

/// Profile document, one per user, created lazily on the first
/// coin-earning, garden, or streak action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: u64,
    /// Total coin balance. Never goes negative through public ops.
    #[serde(default)]
    pub total_coins: u32,
    /// Consecutive days with at least one valid trip.
    #[serde(default)]
    pub current_streak: u32,
    /// Longest streak ever observed. Monotonic.
    #[serde(default)]
    pub longest_streak: u32,
    /// Last calendar day (UTC) with a credited valid trip.
    #[serde(default)]
    pub last_active_date: Option<NaiveDate>,
    #[serde(default)]
    pub trees_planted_virtual: u32,
    /// Written by external back-office tooling only.
    #[serde(default)]
    pub trees_planted_real: u32,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Profile {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            total_coins: 0,
            current_streak: 0,
            longest_streak: 0,
            last_active_date: None,
            trees_planted_virtual: 0,
            trees_planted_real: 0,
            bio: None,
            location: None,
        }
    }

    /// Derived coin multiplier percentage. Never stored.
    pub fn multiplier(&self) -> u32 {
        (self.current_streak * MULTIPLIER_PER_DAY).min(MAX_MULTIPLIER)
    }

    /// Credit `today` as an active day and advance the streak state.
    ///
    /// Evaluated at most once per calendar day: a second call on the
    /// same day returns [`StreakChange::AlreadyCredited`] and leaves
    /// the profile untouched. A gap of two or more days starts a new
    /// streak at 1 and asks the caller to wither the newest tree.
    pub fn record_active_day(&mut self, today: NaiveDate) -> StreakChange {
        let yesterday = today - Days::new(1);

        match self.last_active_date {
            Some(last) if last == today => StreakChange::AlreadyCredited,
            Some(last) if last == yesterday => {
                self.current_streak += 1;
                self.longest_streak = self.longest_streak.max(self.current_streak);
                self.last_active_date = Some(today);
                StreakChange::Extended
            }
            None => {
                self.current_streak = 1;
                self.longest_streak = self.longest_streak.max(1);
                self.last_active_date = Some(today);
                StreakChange::Extended
            }
            Some(previous) => {
                debug_assert!(previous < yesterday);
                self.longest_streak = self.longest_streak.max(self.current_streak);
                self.current_streak = 1;
                self.last_active_date = Some(today);
                StreakChange::Reset
            }
        }
    }

    /// Zero the streak (scheduled-job path).
    ///
    /// Rolls the longest streak and marks `today` so that repeated
    /// invocations on the same day are no-ops and wither nothing more.
    pub fn break_streak(&mut self, today: NaiveDate) -> StreakChange {
        if self.current_streak == 0 && self.last_active_date == Some(today) {
            return StreakChange::AlreadyCredited;
        }
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.current_streak = 0;
        self.last_active_date = Some(today);
        StreakChange::Reset
    }

    /// Whole days elapsed since the last active date, if any.
    pub fn days_since_last_activity(&self, today: NaiveDate) -> Option<i64> {
        self.last_active_date
            .map(|last| (today - last).num_days())
    }

    /// Whether a daily check should break the streak: true when the
    /// last active day is before yesterday.
    pub fn streak_is_stale(&self, today: NaiveDate) -> bool {
        match self.last_active_date {
            Some(last) => last < today - Days::new(1),
            None => false,
        }
    }
}

/// Outcome of a streak transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Today was already credited; nothing changed.
    AlreadyCredited,
    /// Streak extended (or freshly started with no prior record).
    Extended,
    /// A day was missed: streak restarted and the newest alive tree
    /// must be withered in the same transaction.
    Reset,
}

impl StreakChange {
    /// Whether this transition withers the newest alive tree.
    pub fn withers_tree(&self) -> bool {
        matches!(self, StreakChange::Reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_activity_starts_streak() {
        let mut profile = Profile::new(1);
        let change = profile.record_active_day(date(2024, 3, 10));

        assert_eq!(change, StreakChange::Extended);
        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.longest_streak, 1);
        assert_eq!(profile.last_active_date, Some(date(2024, 3, 10)));
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let mut profile = Profile::new(1);
        profile.record_active_day(date(2024, 3, 10));
        let before = profile.clone();

        let change = profile.record_active_day(date(2024, 3, 10));

        assert_eq!(change, StreakChange::AlreadyCredited);
        assert_eq!(profile.current_streak, before.current_streak);
        assert_eq!(profile.longest_streak, before.longest_streak);
        assert_eq!(profile.last_active_date, before.last_active_date);
    }

    #[test]
    fn test_consecutive_day_extends() {
        let mut profile = Profile::new(1);
        profile.record_active_day(date(2024, 3, 10));
        let change = profile.record_active_day(date(2024, 3, 11));

        assert_eq!(change, StreakChange::Extended);
        assert_eq!(profile.current_streak, 2);
        assert_eq!(profile.longest_streak, 2);
    }

    #[test]
    fn test_gap_resets_to_one_and_withers() {
        let mut profile = Profile::new(1);
        profile.record_active_day(date(2024, 3, 10));
        profile.record_active_day(date(2024, 3, 11));

        // Two days later: 2024-03-13 (skipped the 12th)
        let change = profile.record_active_day(date(2024, 3, 13));

        assert_eq!(change, StreakChange::Reset);
        assert!(change.withers_tree());
        assert_eq!(profile.current_streak, 1);
        // Longest keeps the pre-reset run
        assert_eq!(profile.longest_streak, 2);
        assert_eq!(profile.last_active_date, Some(date(2024, 3, 13)));
    }

    #[test]
    fn test_longest_streak_monotonic_across_reset() {
        let mut profile = Profile::new(1);
        profile.longest_streak = 9;
        profile.current_streak = 3;
        profile.last_active_date = Some(date(2024, 3, 1));

        profile.record_active_day(date(2024, 3, 20));
        assert_eq!(profile.longest_streak, 9);
    }

    #[test]
    fn test_break_streak_zeroes_and_rolls_longest() {
        let mut profile = Profile::new(1);
        profile.current_streak = 5;
        profile.longest_streak = 4;
        profile.last_active_date = Some(date(2024, 3, 10));

        let change = profile.break_streak(date(2024, 3, 12));

        assert_eq!(change, StreakChange::Reset);
        assert_eq!(profile.current_streak, 0);
        assert_eq!(profile.longest_streak, 5);
    }

    #[test]
    fn test_break_streak_same_day_twice_is_noop() {
        let mut profile = Profile::new(1);
        profile.current_streak = 5;
        profile.last_active_date = Some(date(2024, 3, 10));

        assert_eq!(profile.break_streak(date(2024, 3, 12)), StreakChange::Reset);
        // Second invocation the same day must not wither anything else
        assert_eq!(
            profile.break_streak(date(2024, 3, 12)),
            StreakChange::AlreadyCredited
        );
    }

    #[test]
    fn test_multiplier_caps_at_fifty() {
        let mut profile = Profile::new(1);
        assert_eq!(profile.multiplier(), 0);

        profile.current_streak = 3;
        assert_eq!(profile.multiplier(), 30);

        profile.current_streak = 5;
        assert_eq!(profile.multiplier(), 50);

        profile.current_streak = 12;
        assert_eq!(profile.multiplier(), 50);
    }

    #[test]
    fn test_streak_staleness() {
        let mut profile = Profile::new(1);
        assert!(!profile.streak_is_stale(date(2024, 3, 12)));

        profile.last_active_date = Some(date(2024, 3, 11));
        assert!(!profile.streak_is_stale(date(2024, 3, 12)));

        profile.last_active_date = Some(date(2024, 3, 10));
        assert!(profile.streak_is_stale(date(2024, 3, 12)));
        assert_eq!(profile.days_since_last_activity(date(2024, 3, 12)), Some(2));
    }
}
