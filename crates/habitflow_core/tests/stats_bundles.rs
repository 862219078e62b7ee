use habitflow_core::stats::filter::{
    HabitSelector, Metric, StatsFilter, StatsResult,
};
use habitflow_core::{CalendarCursor, DateKey, HabitStore, HeatmapBucket};

fn day(s: &str) -> DateKey {
    s.parse().unwrap()
}

fn sample_store(today: DateKey) -> HabitStore {
    let mut store = HabitStore::new();
    let run = store.add_habit_at(1, "Run", "🏃").unwrap();
    let read = store.add_habit_at(2, "Read", "📚").unwrap();
    store.add_habit_at(3, "Water", "💧").unwrap();

    store.toggle_completion(run.id, today).unwrap();
    store.toggle_completion(read.id, today).unwrap();
    store
        .toggle_completion(run.id, day("2024-06-04"))
        .unwrap();
    store
}

#[test]
fn progress_bundle_reports_todays_rate() {
    let today = day("2024-06-05");
    let store = sample_store(today);
    let cursor = CalendarCursor::containing(today);

    let filter = StatsFilter::new(HabitSelector::All, Metric::Progress);
    let results = filter.compose(&store, cursor, today);
    // 2 of 3 habits done today -> 67%.
    assert_eq!(
        results,
        vec![StatsResult::Progress(
            habitflow_core::stats::filter::ProgressResult { rate: 67 }
        )]
    );
}

#[test]
fn weekly_bundle_covers_the_trailing_seven_days() {
    let today = day("2024-06-05");
    let store = sample_store(today);
    let cursor = CalendarCursor::containing(today);

    let filter = StatsFilter::new(HabitSelector::All, Metric::Weekly);
    let results = filter.compose(&store, cursor, today);
    let StatsResult::Weekly(series) = &results[0] else {
        panic!("expected weekly series");
    };

    assert_eq!(series.points.len(), 7);
    assert_eq!(series.points[0].day, day("2024-05-30"));
    assert_eq!(series.points[6].day, today);
    assert!(series.points[6].is_today);
    assert_eq!(series.points[6].rate, 67);
    assert_eq!(series.points[5].rate, 33);
}

#[test]
fn heatmap_bundle_buckets_every_day_of_the_cursor_month() {
    let today = day("2024-06-05");
    let store = sample_store(today);
    let cursor = CalendarCursor::containing(today);

    let filter = StatsFilter::new(HabitSelector::All, Metric::Heatmap);
    let results = filter.compose(&store, cursor, today);
    let StatsResult::Heatmap(heatmap) = &results[0] else {
        panic!("expected heatmap");
    };

    assert_eq!(heatmap.cells.len(), 30);
    let by_day = |s: &str| {
        heatmap
            .cells
            .iter()
            .find(|cell| cell.day == day(s))
            .map(|cell| cell.bucket)
    };
    // 2/3 today crosses the 0.66 threshold.
    assert_eq!(by_day("2024-06-05"), Some(HeatmapBucket::High));
    // 1/3 yesterday.
    assert_eq!(by_day("2024-06-04"), Some(HeatmapBucket::Mid));
    assert_eq!(by_day("2024-06-01"), Some(HeatmapBucket::Empty));
}

#[test]
fn comparison_bundle_lists_per_habit_rates_in_insertion_order() {
    let today = day("2024-06-05");
    let store = sample_store(today);
    let cursor = CalendarCursor::containing(today);

    let filter = StatsFilter::new(HabitSelector::All, Metric::Comparison);
    let results = filter.compose(&store, cursor, today);
    let StatsResult::Comparison(comparison) = &results[0] else {
        panic!("expected comparison");
    };

    let names: Vec<&str> = comparison
        .entries
        .iter()
        .map(|entry| entry.habit.name.as_str())
        .collect();
    assert_eq!(names, ["Run", "Read", "Water"]);

    // Run: 2 of 5 month-to-date days -> 40%; Water: untouched.
    assert_eq!(comparison.entries[0].rate, 40);
    assert_eq!(comparison.entries[2].rate, 0);
}

#[test]
fn single_habit_selection_scopes_every_metric() {
    let today = day("2024-06-05");
    let store = sample_store(today);
    let cursor = CalendarCursor::containing(today);
    let run_id = store.habits()[0].id;

    let filter = StatsFilter::new(HabitSelector::One(run_id), Metric::All);
    let results = filter.compose(&store, cursor, today);
    assert_eq!(results.len(), 6);

    let StatsResult::Progress(progress) = &results[0] else {
        panic!("expected progress first");
    };
    assert_eq!(progress.rate, 100);

    let StatsResult::Streaks(streaks) = &results[5] else {
        panic!("expected streaks last");
    };
    assert_eq!(streaks.leaders.len(), 1);
    assert_eq!(streaks.leaders[0].habit.id, run_id);
    assert_eq!(streaks.leaders[0].streak, 2);
}
