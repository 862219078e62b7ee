//! Domain model for habits and their completion ledger.
//!
//! # Responsibility
//! - Define the canonical habit record and the structured ledger key types.
//! - Keep boundary formats (the `YYYY-MM-DD` date key) in one place.
//!
//! # Invariants
//! - `HabitId` values are unique and monotonically increasing per store.
//! - A `DateKey` always renders as a zero-padded `YYYY-MM-DD` string.

pub mod date_key;
pub mod habit;
