//! Consecutive-completion streak computation.
//!
//! # Responsibility
//! - Count the unbroken run of completed days ending at a reference date.
//!
//! # Invariants
//! - The anchor day itself must be complete for the streak to be non-zero;
//!   an unbroken run that ended yesterday still counts as 0 today. This is
//!   the product contract, kept deliberately.
//! - The backward walk is bounded by the epoch floor, so even a ledger that
//!   answers "complete" for every day terminates.

use crate::model::date_key::DateKey;
use crate::model::habit::HabitId;
use crate::store::HabitStore;

/// Streak of consecutive completed days ending at `as_of`, inclusive.
///
/// Returns 0 immediately when `as_of` is not complete. Unknown habit ids
/// simply have no completions and therefore report 0; streaks are read-only
/// queries and never fail.
pub fn current_streak(store: &HabitStore, habit_id: HabitId, as_of: DateKey) -> u32 {
    let mut streak = 0;
    let mut day = as_of;
    while store.is_complete(habit_id, day) {
        streak += 1;
        match day.pred() {
            Some(prev) => day = prev,
            // Epoch floor reached; nothing earlier can extend the run.
            None => break,
        }
    }
    streak
}

/// Same walk anchored at an arbitrary historical date.
///
/// Used to build streak-over-time series; `current_streak` is this function
/// with "now" as the anchor.
pub fn streak_as_of(store: &HabitStore, habit_id: HabitId, date: DateKey) -> u32 {
    current_streak(store, habit_id, date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn counts_back_to_first_gap() {
        let mut store = HabitStore::new();
        let habit = store.add_habit_at(1, "Run", "🏃").unwrap();
        for d in ["2024-06-03", "2024-06-04", "2024-06-05"] {
            store.toggle_completion(habit.id, day(d)).unwrap();
        }

        assert_eq!(current_streak(&store, habit.id, day("2024-06-05")), 3);
        assert_eq!(current_streak(&store, habit.id, day("2024-06-04")), 2);
    }

    #[test]
    fn incomplete_anchor_day_yields_zero() {
        let mut store = HabitStore::new();
        let habit = store.add_habit_at(1, "Run", "🏃").unwrap();
        for d in ["2024-06-03", "2024-06-04"] {
            store.toggle_completion(habit.id, day(d)).unwrap();
        }

        // The run ended yesterday; today is still 0.
        assert_eq!(current_streak(&store, habit.id, day("2024-06-05")), 0);
    }

    #[test]
    fn walk_terminates_at_the_epoch_floor() {
        let mut store = HabitStore::new();
        let habit = store.add_habit_at(1, "Run", "🏃").unwrap();
        let mut d = Some(DateKey::epoch_floor());
        while let Some(current) = d {
            store.toggle_completion(habit.id, current).unwrap();
            d = if current < day("1970-01-10") {
                current.succ()
            } else {
                None
            };
        }

        assert_eq!(current_streak(&store, habit.id, day("1970-01-10")), 10);
    }

    #[test]
    fn unknown_habit_reports_zero() {
        let store = HabitStore::new();
        assert_eq!(current_streak(&store, 7, day("2024-06-05")), 0);
    }
}
