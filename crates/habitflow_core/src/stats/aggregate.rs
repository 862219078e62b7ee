//! Multi-dimensional completion-rate aggregation.
//!
//! # Responsibility
//! - Compute rates over arbitrary habit subsets and day ranges.
//! - Produce heatmap density buckets and top-streak rankings.
//!
//! # Invariants
//! - An empty habit set or empty day range yields rate 0, never a division
//!   error.
//! - Series entries are computed independently per day; recomputation over
//!   an unchanged store is byte-for-byte identical.

use super::streak::current_streak;
use crate::model::date_key::DateKey;
use crate::model::habit::{Habit, HabitId};
use crate::store::HabitStore;

const LOW_THRESHOLD: f64 = 0.33;
const MID_THRESHOLD: f64 = 0.66;

/// One point of a rate-over-time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub day: DateKey,
    /// Rounded completion percentage, 0..=100.
    pub rate: u8,
    pub is_today: bool,
}

/// Discrete completion-density level for calendar heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatmapBucket {
    Empty,
    Low,
    Mid,
    High,
}

/// One leaderboard row of the top-streak ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakLeader {
    pub habit: Habit,
    pub streak: u32,
}

/// Completed cells over `|habit_set| x |days|`, as a fraction in `[0, 1]`.
///
/// Returns 0.0 when the denominator is empty.
fn completion_fraction(store: &HabitStore, habit_set: &[HabitId], days: &[DateKey]) -> f64 {
    let denominator = habit_set.len() * days.len();
    if denominator == 0 {
        return 0.0;
    }

    let mut completed = 0usize;
    for &habit_id in habit_set {
        for &day in days {
            if store.is_complete(habit_id, day) {
                completed += 1;
            }
        }
    }
    completed as f64 / denominator as f64
}

/// Rounded completion percentage over a habit subset and day range.
pub fn completion_rate(store: &HabitStore, habit_set: &[HabitId], days: &[DateKey]) -> u8 {
    (completion_fraction(store, habit_set, days) * 100.0).round() as u8
}

/// Completion percentage for a single day.
pub fn daily_rate(store: &HabitStore, habit_set: &[HabitId], day: DateKey) -> u8 {
    completion_rate(store, habit_set, &[day])
}

/// One rate entry per day, in the order given.
///
/// Each entry is an independent computation over the ledger snapshot, so
/// the series is finite, restartable and deterministic.
pub fn series(
    store: &HabitStore,
    habit_set: &[HabitId],
    days: &[DateKey],
    today: DateKey,
) -> Vec<SeriesPoint> {
    days.iter()
        .map(|&day| SeriesPoint {
            day,
            rate: daily_rate(store, habit_set, day),
            is_today: day == today,
        })
        .collect()
}

/// Density bucket for one day, from the unrounded fractional rate.
pub fn heatmap_bucket(store: &HabitStore, habit_set: &[HabitId], day: DateKey) -> HeatmapBucket {
    let fraction = completion_fraction(store, habit_set, &[day]);
    if fraction <= 0.0 {
        HeatmapBucket::Empty
    } else if fraction < LOW_THRESHOLD {
        HeatmapBucket::Low
    } else if fraction < MID_THRESHOLD {
        HeatmapBucket::Mid
    } else {
        HeatmapBucket::High
    }
}

/// Habits ranked by current streak, descending.
///
/// Zero streaks are dropped; ties keep habit insertion order (the order of
/// `habit_set`); the result is truncated to `limit`.
pub fn top_streaks(
    store: &HabitStore,
    habit_set: &[HabitId],
    as_of: DateKey,
    limit: usize,
) -> Vec<StreakLeader> {
    let mut leaders: Vec<StreakLeader> = habit_set
        .iter()
        .filter_map(|&habit_id| store.habit(habit_id))
        .map(|habit| StreakLeader {
            habit: habit.clone(),
            streak: current_streak(store, habit.id, as_of),
        })
        .filter(|leader| leader.streak > 0)
        .collect();

    // Stable sort keeps insertion order among equal streaks.
    leaders.sort_by(|a, b| b.streak.cmp(&a.streak));
    leaders.truncate(limit);
    leaders
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn ids(store: &HabitStore) -> Vec<HabitId> {
        store.habits().iter().map(|habit| habit.id).collect()
    }

    #[test]
    fn empty_inputs_degrade_to_zero() {
        let mut store = HabitStore::new();
        store.add_habit_at(1, "Run", "🏃").unwrap();

        assert_eq!(completion_rate(&store, &[], &[day("2024-06-01")]), 0);
        assert_eq!(completion_rate(&store, &ids(&store), &[]), 0);
        assert_eq!(completion_rate(&HabitStore::new(), &[], &[]), 0);
    }

    #[test]
    fn rate_rounds_to_nearest_percent() {
        let mut store = HabitStore::new();
        let a = store.add_habit_at(1, "Run", "🏃").unwrap();
        store.add_habit_at(2, "Read", "📚").unwrap();
        store.add_habit_at(3, "Water", "💧").unwrap();
        store.toggle_completion(a.id, day("2024-06-01")).unwrap();

        // 1 of 3 cells -> 33.33% -> 33.
        assert_eq!(daily_rate(&store, &ids(&store), day("2024-06-01")), 33);
    }

    #[test]
    fn heatmap_thresholds_use_the_fractional_rate() {
        let mut store = HabitStore::new();
        let mut habits = Vec::new();
        for i in 0..4 {
            habits.push(store.add_habit_at(i + 1, format!("h{i}"), "🎯").unwrap());
        }
        let d = day("2024-06-01");
        let set = ids(&store);

        assert_eq!(heatmap_bucket(&store, &set, d), HeatmapBucket::Empty);

        store.toggle_completion(habits[0].id, d).unwrap();
        // 1/4 = 0.25 < 0.33
        assert_eq!(heatmap_bucket(&store, &set, d), HeatmapBucket::Low);

        store.toggle_completion(habits[1].id, d).unwrap();
        // 2/4 = 0.50
        assert_eq!(heatmap_bucket(&store, &set, d), HeatmapBucket::Mid);

        store.toggle_completion(habits[2].id, d).unwrap();
        // 3/4 = 0.75
        assert_eq!(heatmap_bucket(&store, &set, d), HeatmapBucket::High);
    }

    #[test]
    fn series_is_deterministic_and_flags_today() {
        let mut store = HabitStore::new();
        let habit = store.add_habit_at(1, "Run", "🏃").unwrap();
        store.toggle_completion(habit.id, day("2024-06-02")).unwrap();

        let days = [day("2024-06-01"), day("2024-06-02"), day("2024-06-03")];
        let today = day("2024-06-03");
        let set = ids(&store);

        let first = series(&store, &set, &days, today);
        let second = series(&store, &set, &days, today);
        assert_eq!(first, second);

        assert_eq!(first[0].rate, 0);
        assert_eq!(first[1].rate, 100);
        assert!(first[2].is_today);
        assert!(!first[0].is_today);
    }

    #[test]
    fn top_streaks_rank_and_break_ties_by_insertion_order() {
        let mut store = HabitStore::new();
        let h1 = store.add_habit_at(1, "Run", "🏃").unwrap();
        let h2 = store.add_habit_at(2, "Read", "📚").unwrap();
        let h3 = store.add_habit_at(3, "Water", "💧").unwrap();
        let as_of = day("2024-06-05");

        // h1 and h2 both carry a 5-day streak; h3 stays at 0.
        for offset in ["2024-06-01", "2024-06-02", "2024-06-03", "2024-06-04", "2024-06-05"] {
            store.toggle_completion(h1.id, day(offset)).unwrap();
            store.toggle_completion(h2.id, day(offset)).unwrap();
        }

        let leaders = top_streaks(&store, &ids(&store), as_of, 2);
        assert_eq!(leaders.len(), 2);
        assert_eq!(leaders[0].habit.id, h1.id);
        assert_eq!(leaders[1].habit.id, h2.id);
        assert!(leaders.iter().all(|l| l.habit.id != h3.id));

        let truncated = top_streaks(&store, &ids(&store), as_of, 1);
        assert_eq!(truncated.len(), 1);
        assert_eq!(truncated[0].habit.id, h1.id);
    }
}
