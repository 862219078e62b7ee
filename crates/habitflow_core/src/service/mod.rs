//! Use-case services tying the store to persistence and identity.
//!
//! # Responsibility
//! - Provide session-scoped entry points for habit mutations.
//! - Hand mutated state to the persistence collaborator synchronously.
//!
//! # Invariants
//! - In-memory state is fully consistent before any persistence hand-off.
//! - Services never bypass store validation or repository contracts.

pub mod habit_service;
pub mod transfer;

pub use habit_service::{HabitService, ServiceError, ServiceResult};
pub use transfer::{ExportBundle, ImportError};
