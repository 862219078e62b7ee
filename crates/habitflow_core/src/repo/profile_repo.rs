//! Profile repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-user habit lists and completion ledgers.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save_profile` replaces the profile wholesale inside one transaction;
//!   readers never observe a partially written profile.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::date_key::DateKey;
use crate::model::habit::{Habit, HabitId, HabitValidationError};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from profile persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Persisted habit fields failed domain validation.
    Validation(HabitValidationError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted profile data: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "profile repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "profile repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "profile repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<HabitValidationError> for RepoError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Persisted shape of one user's habits and ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileData {
    /// Habits in insertion order.
    pub habits: Vec<Habit>,
    /// Completed `(habit, day)` cells.
    pub completions: Vec<(HabitId, DateKey)>,
}

/// Storage-agnostic persistence collaborator for profiles and accounts.
///
/// The core only relies on this contract; the storage medium behind it is
/// interchangeable.
pub trait ProfileRepository {
    /// Loads a profile; `None` when the account does not exist.
    fn load_profile(&self, username: &str) -> RepoResult<Option<ProfileData>>;
    /// Replaces the stored profile wholesale.
    fn save_profile(&self, username: &str, profile: &ProfileData) -> RepoResult<()>;
    fn create_account(&self, username: &str, password_hash: &str) -> RepoResult<()>;
    fn account_exists(&self, username: &str) -> RepoResult<bool>;
    fn account_count(&self) -> RepoResult<u32>;
    fn delete_account(&self, username: &str) -> RepoResult<()>;
    fn password_hash(&self, username: &str) -> RepoResult<Option<String>>;
    fn set_password_hash(&self, username: &str, password_hash: &str) -> RepoResult<()>;
}

const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    ("accounts", &["username", "password_hash", "created_at"]),
    (
        "habits",
        &["username", "habit_id", "name", "emoji", "position"],
    ),
    ("completions", &["username", "habit_id", "day"]),
];

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    /// Wraps a connection after verifying it carries the migrated schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version =
            conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for (table, columns) in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
            for column in *columns {
                if !column_exists(conn, table, column)? {
                    return Err(RepoError::MissingRequiredColumn { table, column });
                }
            }
        }

        Ok(Self { conn })
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn load_profile(&self, username: &str) -> RepoResult<Option<ProfileData>> {
        if !self.account_exists(username)? {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT habit_id, name, emoji
             FROM habits
             WHERE username = ?1
             ORDER BY position ASC, habit_id ASC;",
        )?;
        let mut rows = stmt.query(params![username])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            let id: HabitId = row.get("habit_id")?;
            let name: String = row.get("name")?;
            let emoji: String = row.get("emoji")?;
            habits.push(Habit::new(id, name, emoji)?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT habit_id, day
             FROM completions
             WHERE username = ?1
             ORDER BY habit_id ASC, day ASC;",
        )?;
        let mut rows = stmt.query(params![username])?;
        let mut completions = Vec::new();
        while let Some(row) = rows.next()? {
            let habit_id: HabitId = row.get("habit_id")?;
            let day_text: String = row.get("day")?;
            let day: DateKey = day_text.parse().map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid day value `{day_text}` in completions.day"
                ))
            })?;
            completions.push((habit_id, day));
        }

        Ok(Some(ProfileData {
            habits,
            completions,
        }))
    }

    fn save_profile(&self, username: &str, profile: &ProfileData) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        // Deleting the habits cascades into completions, leaving a clean
        // slate for the rewrite.
        tx.execute("DELETE FROM habits WHERE username = ?1;", params![username])?;

        {
            let mut insert_habit = tx.prepare(
                "INSERT INTO habits (username, habit_id, name, emoji, position)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for (position, habit) in profile.habits.iter().enumerate() {
                insert_habit.execute(params![
                    username,
                    habit.id,
                    habit.name.as_str(),
                    habit.emoji.as_str(),
                    position as i64,
                ])?;
            }

            let mut insert_completion = tx.prepare(
                "INSERT OR IGNORE INTO completions (username, habit_id, day)
                 VALUES (?1, ?2, ?3);",
            )?;
            for (habit_id, day) in &profile.completions {
                insert_completion.execute(params![username, habit_id, day.to_string()])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn create_account(&self, username: &str, password_hash: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO accounts (username, password_hash) VALUES (?1, ?2);",
            params![username, password_hash],
        )?;
        Ok(())
    }

    fn account_exists(&self, username: &str) -> RepoResult<bool> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM accounts WHERE username = ?1;",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn account_count(&self) -> RepoResult<u32> {
        let count: u32 =
            self.conn
                .query_row("SELECT COUNT(*) FROM accounts;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn delete_account(&self, username: &str) -> RepoResult<()> {
        // Habit and completion rows follow through the foreign-key cascades.
        self.conn.execute(
            "DELETE FROM accounts WHERE username = ?1;",
            params![username],
        )?;
        Ok(())
    }

    fn password_hash(&self, username: &str) -> RepoResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT password_hash FROM accounts WHERE username = ?1;")?;
        let mut rows = stmt.query(params![username])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn set_password_hash(&self, username: &str, password_hash: &str) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE accounts SET password_hash = ?1 WHERE username = ?2;",
            params![password_hash, username],
        )?;
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2;",
        params![table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
