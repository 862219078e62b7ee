//! Profile export and import bundles.
//!
//! # Responsibility
//! - Serialize a profile into the portable JSON bundle format.
//! - Validate and apply imported bundles.
//!
//! # Invariants
//! - The bundle keeps the boundary `"habitId-YYYY-MM-DD"` composite keys for
//!   compatibility with previously exported files; internally everything is
//!   converted back to structured `(HabitId, DateKey)` pairs.
//! - Importing replaces the profile wholesale; entries for unknown habits
//!   are dropped rather than left orphaned.

use super::habit_service::{HabitService, ServiceResult};
use crate::model::date_key::DateKey;
use crate::model::habit::{Habit, HabitId};
use crate::store::HabitStore;
use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Portable snapshot of one user's habits and ledger.
///
/// Field names match the original export files, so old exports import
/// cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub user: String,
    pub habits: Vec<Habit>,
    /// Composite `"habitId-YYYY-MM-DD"` keys mapped to completion flags.
    pub completions: BTreeMap<String, bool>,
    /// RFC 3339 timestamp of the export.
    pub export_date: String,
}

/// Failures while reading an import bundle.
#[derive(Debug)]
pub enum ImportError {
    /// The file is not a valid bundle document.
    Json(serde_json::Error),
    /// A completion key does not follow `habitId-YYYY-MM-DD`.
    CompositeKey(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid bundle document: {err}"),
            Self::CompositeKey(key) => {
                write!(f, "invalid completion key `{key}`; expected habitId-YYYY-MM-DD")
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::CompositeKey(_) => None,
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Splits a composite completion key into its structured parts.
fn parse_composite_key(key: &str) -> Result<(HabitId, DateKey), ImportError> {
    let (id_part, day_part) = key
        .split_once('-')
        .ok_or_else(|| ImportError::CompositeKey(key.to_string()))?;
    let habit_id: HabitId = id_part
        .parse()
        .map_err(|_| ImportError::CompositeKey(key.to_string()))?;
    let day: DateKey = day_part
        .parse()
        .map_err(|_| ImportError::CompositeKey(key.to_string()))?;
    Ok((habit_id, day))
}

fn composite_key(habit_id: HabitId, day: DateKey) -> String {
    format!("{habit_id}-{day}")
}

/// Parses a bundle document from JSON text.
pub fn parse_bundle(json: &str) -> Result<ExportBundle, ImportError> {
    Ok(serde_json::from_str(json)?)
}

impl ExportBundle {
    /// Serializes the bundle as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Structured completions, skipping entries flagged false and rejecting
    /// malformed keys.
    pub fn structured_completions(&self) -> Result<Vec<(HabitId, DateKey)>, ImportError> {
        let mut completions = Vec::with_capacity(self.completions.len());
        for (key, completed) in &self.completions {
            let parsed = parse_composite_key(key)?;
            if *completed {
                completions.push(parsed);
            }
        }
        Ok(completions)
    }
}

impl HabitService<'_> {
    /// Snapshots the profile into a portable bundle.
    pub fn export(&self, exported_at: DateTime<Utc>) -> ExportBundle {
        let completions = self
            .store()
            .completions()
            .map(|(habit_id, day)| (composite_key(habit_id, day), true))
            .collect();
        ExportBundle {
            user: self.session().username().to_string(),
            habits: self.store().habits().to_vec(),
            completions,
            export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Replaces the profile with the bundle's content and persists it.
    ///
    /// The bundle's `user` field is informational; the data lands under the
    /// session's own account.
    pub fn import(&mut self, bundle: &ExportBundle) -> ServiceResult<()> {
        let completions = bundle.structured_completions()?;
        let store = HabitStore::from_parts(bundle.habits.clone(), completions);
        let habit_count = store.habits().len();
        self.replace_store(store)?;
        info!(
            "event=profile_imported module=service status=ok username={} habits={habit_count}",
            self.session().username()
        );
        Ok(())
    }
}
