//! Habit domain record.
//!
//! # Responsibility
//! - Define the immutable habit record owned by the store.
//! - Validate user-provided habit fields before they enter the store.
//!
//! # Invariants
//! - `id` is unique within a store and never reused.
//! - `name` is non-empty after trimming.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a habit.
///
/// Assigned from a millisecond clock at creation time; the store guards
/// against same-instant collisions, so ids are strictly increasing in
/// insertion order.
pub type HabitId = i64;

/// Validation failures for habit construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitValidationError {
    /// Name was empty or whitespace-only.
    EmptyName,
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "habit name must not be empty"),
        }
    }
}

impl Error for HabitValidationError {}

/// A recurring habit the user tracks day by day.
///
/// Habits are never edited in place: they are created once and removed as a
/// whole, together with their ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Stable creation-ordered id.
    pub id: HabitId,
    /// Display name, non-empty after trimming.
    pub name: String,
    /// Short display glyph shown next to the name.
    pub emoji: String,
}

impl Habit {
    /// Builds a habit with a caller-assigned id.
    ///
    /// The name is trimmed; an empty result is rejected.
    pub fn new(
        id: HabitId,
        name: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Result<Self, HabitValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            emoji: emoji.into(),
        })
    }
}
