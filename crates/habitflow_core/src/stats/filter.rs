//! Habit-subset × metric selection composed into chart-ready bundles.
//!
//! # Responsibility
//! - Resolve the active habit selection against the live store.
//! - Dispatch the active metric to the aggregation and streak engines.
//!
//! # Invariants
//! - `compose` is a fresh, idempotent computation over the store snapshot
//!   and cursor passed in; no metric keeps state between calls.
//! - A selection pointing at a deleted habit resolves to an empty set and
//!   degrades to neutral results instead of failing.

use super::aggregate::{
    self, HeatmapBucket, SeriesPoint, StreakLeader,
};
use super::streak::streak_as_of;
use crate::calendar::{self, CalendarCursor};
use crate::model::date_key::DateKey;
use crate::model::habit::{Habit, HabitId};
use crate::store::HabitStore;

/// Leaderboard length, matching the five slots of the streak panel.
const TOP_STREAK_LIMIT: usize = 5;
/// Days of streak history backing the streak-over-time chart.
const STREAK_HISTORY_DAYS: u32 = 30;

/// Which habits a metric is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitSelector {
    /// Every habit in the store.
    All,
    /// A single habit by id; resolves to the empty set once deleted.
    One(HabitId),
}

/// Which chart the caller wants data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Progress,
    Weekly,
    Monthly,
    Heatmap,
    Comparison,
    Streaks,
    All,
}

/// Today's completion percentage, feeding the progress ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressResult {
    pub rate: u8,
}

/// A rate-over-time series (weekly bars or monthly line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesResult {
    pub points: Vec<SeriesPoint>,
}

/// One density cell of the month heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapCell {
    pub day: DateKey,
    pub bucket: HeatmapBucket,
}

/// Density buckets for every day of the cursor's month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapResult {
    pub cells: Vec<HeatmapCell>,
}

/// Month-to-date rate of one habit, for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonEntry {
    pub habit: Habit,
    pub rate: u8,
}

/// Per-habit rates over the cursor's month, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonResult {
    pub entries: Vec<ComparisonEntry>,
}

/// Best streak across the selection as of one historical day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakPoint {
    pub day: DateKey,
    pub streak: u32,
}

/// Streak leaderboard plus streak-over-time history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakSeriesResult {
    pub leaders: Vec<StreakLeader>,
    pub history: Vec<StreakPoint>,
}

/// Metric-tagged result bundle handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsResult {
    Progress(ProgressResult),
    Weekly(SeriesResult),
    Monthly(SeriesResult),
    Heatmap(HeatmapResult),
    Comparison(ComparisonResult),
    Streaks(StreakSeriesResult),
}

/// Active `(habit subset, metric)` selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsFilter {
    pub selector: HabitSelector,
    pub metric: Metric,
}

impl Default for StatsFilter {
    fn default() -> Self {
        Self {
            selector: HabitSelector::All,
            metric: Metric::All,
        }
    }
}

impl StatsFilter {
    pub fn new(selector: HabitSelector, metric: Metric) -> Self {
        Self { selector, metric }
    }

    /// Habit ids the active selection covers, in insertion order.
    ///
    /// A stale single-habit selection resolves to the empty set; downstream
    /// aggregation then degrades to neutral values.
    pub fn resolve_habit_set(&self, store: &HabitStore) -> Vec<HabitId> {
        match self.selector {
            HabitSelector::All => store.habits().iter().map(|habit| habit.id).collect(),
            HabitSelector::One(id) => {
                if store.contains(id) {
                    vec![id]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Computes the active metric (or all of them) over the current store.
    ///
    /// `cursor` anchors the month-scoped metrics, `today` anchors the
    /// day-relative ones; both are plain inputs so the whole call stays a
    /// pure function.
    pub fn compose(
        &self,
        store: &HabitStore,
        cursor: CalendarCursor,
        today: DateKey,
    ) -> Vec<StatsResult> {
        let habit_set = self.resolve_habit_set(store);
        match self.metric {
            Metric::All => [
                Metric::Progress,
                Metric::Weekly,
                Metric::Monthly,
                Metric::Heatmap,
                Metric::Comparison,
                Metric::Streaks,
            ]
            .iter()
            .map(|metric| compose_one(*metric, store, &habit_set, cursor, today))
            .collect(),
            metric => vec![compose_one(metric, store, &habit_set, cursor, today)],
        }
    }
}

/// Day keys of the cursor's month, stopping at `today` when the cursor sits
/// on the current month.
fn month_to_date_days(cursor: CalendarCursor, today: DateKey) -> Vec<DateKey> {
    let on_current_month = cursor.year() == today.year() && cursor.month0() == today.month0();
    let max_day = if on_current_month {
        today.day()
    } else {
        calendar::days_in_month(cursor.year(), cursor.month0())
    };
    calendar::month_day_keys(cursor.year(), cursor.month0(), max_day)
}

fn compose_one(
    metric: Metric,
    store: &HabitStore,
    habit_set: &[HabitId],
    cursor: CalendarCursor,
    today: DateKey,
) -> StatsResult {
    match metric {
        Metric::Progress => StatsResult::Progress(ProgressResult {
            rate: aggregate::daily_rate(store, habit_set, today),
        }),
        Metric::Weekly => {
            let days = calendar::trailing_days(today, 7);
            StatsResult::Weekly(SeriesResult {
                points: aggregate::series(store, habit_set, &days, today),
            })
        }
        Metric::Monthly => {
            let days = month_to_date_days(cursor, today);
            StatsResult::Monthly(SeriesResult {
                points: aggregate::series(store, habit_set, &days, today),
            })
        }
        Metric::Heatmap => {
            let last = calendar::days_in_month(cursor.year(), cursor.month0());
            let cells = calendar::month_day_keys(cursor.year(), cursor.month0(), last)
                .into_iter()
                .map(|day| HeatmapCell {
                    day,
                    bucket: aggregate::heatmap_bucket(store, habit_set, day),
                })
                .collect();
            StatsResult::Heatmap(HeatmapResult { cells })
        }
        Metric::Comparison => {
            let days = month_to_date_days(cursor, today);
            let entries = habit_set
                .iter()
                .filter_map(|&id| store.habit(id))
                .map(|habit| ComparisonEntry {
                    habit: habit.clone(),
                    rate: aggregate::completion_rate(store, &[habit.id], &days),
                })
                .collect();
            StatsResult::Comparison(ComparisonResult { entries })
        }
        Metric::Streaks => {
            let leaders = aggregate::top_streaks(store, habit_set, today, TOP_STREAK_LIMIT);
            let history = calendar::trailing_days(today, STREAK_HISTORY_DAYS)
                .into_iter()
                .map(|day| StreakPoint {
                    day,
                    streak: habit_set
                        .iter()
                        .map(|&id| streak_as_of(store, id, day))
                        .max()
                        .unwrap_or(0),
                })
                .collect();
            StatsResult::Streaks(StreakSeriesResult { leaders, history })
        }
        // Metric::All is expanded by the caller.
        Metric::All => unreachable!("Metric::All is expanded in compose"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn stale_single_selection_resolves_to_empty_set() {
        let mut store = HabitStore::new();
        let habit = store.add_habit_at(1, "Run", "🏃").unwrap();
        store.remove_habit(habit.id);

        let filter = StatsFilter::new(HabitSelector::One(habit.id), Metric::Progress);
        assert!(filter.resolve_habit_set(&store).is_empty());

        let today = day("2024-06-05");
        let cursor = CalendarCursor::containing(today);
        let results = filter.compose(&store, cursor, today);
        assert_eq!(
            results,
            vec![StatsResult::Progress(ProgressResult { rate: 0 })]
        );
    }

    #[test]
    fn metric_all_yields_every_bundle_once() {
        let mut store = HabitStore::new();
        let habit = store.add_habit_at(1, "Run", "🏃").unwrap();
        let today = day("2024-06-05");
        store.toggle_completion(habit.id, today).unwrap();

        let filter = StatsFilter::default();
        let cursor = CalendarCursor::containing(today);
        let results = filter.compose(&store, cursor, today);

        assert_eq!(results.len(), 6);
        assert!(matches!(results[0], StatsResult::Progress(_)));
        assert!(matches!(results[5], StatsResult::Streaks(_)));
    }

    #[test]
    fn monthly_series_stops_at_today_on_the_current_month() {
        let mut store = HabitStore::new();
        store.add_habit_at(1, "Run", "🏃").unwrap();
        let today = day("2024-06-10");
        let cursor = CalendarCursor::containing(today);

        let filter = StatsFilter::new(HabitSelector::All, Metric::Monthly);
        let results = filter.compose(&store, cursor, today);
        let StatsResult::Monthly(series) = &results[0] else {
            panic!("expected monthly series");
        };
        assert_eq!(series.points.len(), 10);
        assert!(series.points.last().unwrap().is_today);

        // A past month covers every day.
        let past = CalendarCursor::month_start(2024, 4);
        let results = filter.compose(&store, past, today);
        let StatsResult::Monthly(series) = &results[0] else {
            panic!("expected monthly series");
        };
        assert_eq!(series.points.len(), 31);
    }

    #[test]
    fn compose_is_idempotent_over_an_unchanged_store() {
        let mut store = HabitStore::new();
        let habit = store.add_habit_at(1, "Run", "🏃").unwrap();
        let today = day("2024-06-05");
        store.toggle_completion(habit.id, today).unwrap();
        store
            .toggle_completion(habit.id, day("2024-06-04"))
            .unwrap();

        let filter = StatsFilter::default();
        let cursor = CalendarCursor::containing(today);
        assert_eq!(
            filter.compose(&store, cursor, today),
            filter.compose(&store, cursor, today)
        );
    }

    #[test]
    fn streak_history_tracks_the_best_streak_in_the_set() {
        let mut store = HabitStore::new();
        let h1 = store.add_habit_at(1, "Run", "🏃").unwrap();
        let h2 = store.add_habit_at(2, "Read", "📚").unwrap();
        let today = day("2024-06-05");
        store.toggle_completion(h1.id, day("2024-06-04")).unwrap();
        store.toggle_completion(h1.id, today).unwrap();
        store.toggle_completion(h2.id, day("2024-06-03")).unwrap();
        store.toggle_completion(h2.id, day("2024-06-04")).unwrap();

        let filter = StatsFilter::new(HabitSelector::All, Metric::Streaks);
        let cursor = CalendarCursor::containing(today);
        let results = filter.compose(&store, cursor, today);
        let StatsResult::Streaks(streaks) = &results[0] else {
            panic!("expected streak bundle");
        };

        let by_day = |s: &str| {
            streaks
                .history
                .iter()
                .find(|point| point.day == day(s))
                .map(|point| point.streak)
        };
        // On the 4th, h2's two-day run beats h1's single day.
        assert_eq!(by_day("2024-06-04"), Some(2));
        // Today h1's 4th-5th run leads; h2 missed the day.
        assert_eq!(by_day("2024-06-05"), Some(2));
    }
}
