//! Session-scoped habit use-case service.
//!
//! # Responsibility
//! - Load a user's profile into a store and keep it persisted.
//! - Seed starter habits for fresh profiles.
//!
//! # Invariants
//! - Every successful mutation is followed by a synchronous save; a failed
//!   save surfaces as an error while the in-memory state stays consistent
//!   for subsequent reads.
//! - The session is an explicit owned value, not ambient global state.

use crate::auth::Session;
use crate::model::date_key::DateKey;
use crate::model::habit::{Habit, HabitId};
use crate::repo::{ProfileData, ProfileRepository, RepoError};
use crate::store::{HabitStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Starter habits seeded into an empty profile, as shipped originally.
const STARTER_HABITS: &[(&str, &str)] = &[
    ("Morning Run", "🏃"),
    ("Read 30min", "📚"),
    ("Drink Water", "💧"),
];

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures from session-scoped habit operations.
#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    Repo(RepoError),
    Import(super::transfer::ImportError),
    /// The session's account vanished between login and profile load.
    ProfileMissing(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::ProfileMissing(username) => {
                write!(f, "no stored profile for user `{username}`")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::ProfileMissing(_) => None,
        }
    }
}

impl From<super::transfer::ImportError> for ServiceError {
    fn from(value: super::transfer::ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Habit operations for one logged-in user.
///
/// Owns the in-memory store for the session and persists after every
/// successful mutation.
pub struct HabitService<'repo> {
    session: Session,
    repo: &'repo dyn ProfileRepository,
    store: HabitStore,
}

impl<'repo> HabitService<'repo> {
    /// Loads the session's profile, seeding starter habits when it is empty.
    pub fn open(session: Session, repo: &'repo dyn ProfileRepository) -> ServiceResult<Self> {
        let profile = repo
            .load_profile(session.username())?
            .ok_or_else(|| ServiceError::ProfileMissing(session.username().to_string()))?;

        let mut service = Self {
            session,
            repo,
            store: HabitStore::from_parts(profile.habits, profile.completions),
        };

        if service.store.habits().is_empty() {
            for (name, emoji) in STARTER_HABITS {
                service.store.add_habit(*name, *emoji)?;
            }
            service.persist()?;
            info!(
                "event=starter_habits_seeded module=service status=ok username={} count={}",
                service.session.username(),
                STARTER_HABITS.len()
            );
        }

        Ok(service)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read access for the analytics layer.
    pub fn store(&self) -> &HabitStore {
        &self.store
    }

    /// Adds a habit and persists the profile.
    pub fn add_habit(
        &mut self,
        name: impl Into<String>,
        emoji: impl Into<String>,
    ) -> ServiceResult<Habit> {
        let habit = self.store.add_habit(name, emoji)?;
        self.persist()?;
        Ok(habit)
    }

    /// Removes a habit (cascading its ledger) and persists the profile.
    pub fn remove_habit(&mut self, id: HabitId) -> ServiceResult<()> {
        self.store.remove_habit(id);
        self.persist()
    }

    /// Toggles a completion cell and persists the profile.
    pub fn toggle_completion(&mut self, id: HabitId, day: DateKey) -> ServiceResult<bool> {
        let now_complete = self.store.toggle_completion(id, day)?;
        self.persist()?;
        Ok(now_complete)
    }

    /// Replaces the whole store, used by the import path.
    pub(crate) fn replace_store(&mut self, store: HabitStore) -> ServiceResult<()> {
        self.store = store;
        self.persist()
    }

    fn persist(&self) -> ServiceResult<()> {
        let profile = ProfileData {
            habits: self.store.habits().to_vec(),
            completions: self.store.completions().collect(),
        };
        self.repo.save_profile(self.session.username(), &profile)?;
        Ok(())
    }
}
