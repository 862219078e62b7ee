//! Habit list plus sparse completion ledger.

use crate::model::date_key::DateKey;
use crate::model::habit::{Habit, HabitId, HabitValidationError};
use log::warn;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The habit id does not reference a live habit.
    HabitNotFound(HabitId),
    /// The habit fields failed validation.
    Validation(HabitValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::HabitNotFound(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<HabitValidationError> for StoreError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Owner of the habit list and the completion ledger.
///
/// The ledger is sparse: only completed `(habit, day)` cells are stored, and
/// absence means "not completed". The store is a plain value; whoever holds
/// it decides its scope, and there is no process-wide current-user state.
#[derive(Debug, Clone, Default)]
pub struct HabitStore {
    habits: Vec<Habit>,
    ledger: BTreeSet<(HabitId, DateKey)>,
    last_id: HabitId,
}

impl HabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted parts.
    ///
    /// Ledger entries pointing at unknown habits are dropped here, so a
    /// corrupted snapshot can never resurrect the orphan state the cascade
    /// delete rules out.
    pub fn from_parts(
        habits: Vec<Habit>,
        completions: impl IntoIterator<Item = (HabitId, DateKey)>,
    ) -> Self {
        let last_id = habits.iter().map(|habit| habit.id).max().unwrap_or(0);
        let live: BTreeSet<HabitId> = habits.iter().map(|habit| habit.id).collect();

        let mut ledger = BTreeSet::new();
        for (habit_id, day) in completions {
            if live.contains(&habit_id) {
                ledger.insert((habit_id, day));
            } else {
                warn!(
                    "event=ledger_orphan_dropped module=store status=warn habit_id={habit_id} day={day}"
                );
            }
        }

        Self {
            habits,
            ledger,
            last_id,
        }
    }

    /// Adds a habit, assigning the next monotonic id.
    ///
    /// The id is derived from the creation-time millisecond clock; two adds
    /// within the same millisecond are disambiguated by bumping past the
    /// previously assigned id.
    pub fn add_habit(
        &mut self,
        name: impl Into<String>,
        emoji: impl Into<String>,
    ) -> StoreResult<Habit> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.add_habit_at(now_ms, name, emoji)
    }

    /// Adds a habit using an explicit clock reading.
    pub fn add_habit_at(
        &mut self,
        now_ms: i64,
        name: impl Into<String>,
        emoji: impl Into<String>,
    ) -> StoreResult<Habit> {
        let id = now_ms.max(self.last_id + 1);
        let habit = Habit::new(id, name, emoji)?;
        self.last_id = id;
        self.habits.push(habit.clone());
        Ok(habit)
    }

    /// Removes a habit and purges its ledger entries in the same call.
    ///
    /// No-op for an unknown id.
    pub fn remove_habit(&mut self, id: HabitId) {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != id);
        if self.habits.len() == before {
            return;
        }
        self.ledger.retain(|(habit_id, _)| *habit_id != id);
    }

    /// Habits in stable insertion order.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn contains(&self, id: HabitId) -> bool {
        self.habit(id).is_some()
    }

    /// Flips the completion flag for `(id, day)` and returns the new value.
    pub fn toggle_completion(&mut self, id: HabitId, day: DateKey) -> StoreResult<bool> {
        if !self.contains(id) {
            return Err(StoreError::HabitNotFound(id));
        }
        let key = (id, day);
        if self.ledger.remove(&key) {
            Ok(false)
        } else {
            self.ledger.insert(key);
            Ok(true)
        }
    }

    pub fn is_complete(&self, id: HabitId, day: DateKey) -> bool {
        self.ledger.contains(&(id, day))
    }

    /// All completed `(habit, day)` cells in key order.
    pub fn completions(&self) -> impl Iterator<Item = (HabitId, DateKey)> + '_ {
        self.ledger.iter().copied()
    }

    /// Number of habits completed on `day`.
    pub fn completed_on(&self, day: DateKey) -> usize {
        self.habits
            .iter()
            .filter(|habit| self.is_complete(habit.id, day))
            .count()
    }
}
