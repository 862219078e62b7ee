//! Core domain logic for Habit Flow.
//! This crate is the single source of truth for business invariants.

pub mod auth;
pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;
pub mod store;

pub use auth::{AuthError, AuthResult, Session, MAX_ACCOUNTS};
pub use calendar::{CalendarCursor, WeekDay, WeekRange};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::date_key::{DateKey, DateKeyParseError};
pub use model::habit::{Habit, HabitId, HabitValidationError};
pub use repo::{ProfileData, ProfileRepository, RepoError, RepoResult, SqliteProfileRepository};
pub use service::{ExportBundle, HabitService, ImportError, ServiceError, ServiceResult};
pub use stats::aggregate::{HeatmapBucket, SeriesPoint, StreakLeader};
pub use stats::filter::{HabitSelector, Metric, StatsFilter, StatsResult};
pub use store::{HabitStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
