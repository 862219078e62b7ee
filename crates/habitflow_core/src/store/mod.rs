//! In-memory habit store and completion ledger.
//!
//! # Responsibility
//! - Own the habit list and the sparse completion ledger.
//! - Keep every mutation cascade-consistent before it returns.
//!
//! # Invariants
//! - Every ledger entry references a live habit; removing a habit purges its
//!   entries atomically.
//! - Habit ids are strictly increasing in insertion order.

mod habit_store;

pub use habit_store::{HabitStore, StoreError, StoreResult};
