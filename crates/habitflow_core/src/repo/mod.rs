//! Persistence contracts for per-user profiles.
//!
//! # Responsibility
//! - Define the storage-agnostic profile repository trait.
//! - Provide the SQLite implementation used by the application.
//!
//! # Invariants
//! - Habits round-trip in insertion order.
//! - Only completed ledger cells are persisted; absence means incomplete.

mod profile_repo;

pub use profile_repo::{
    ProfileData, ProfileRepository, RepoError, RepoResult, SqliteProfileRepository,
};
