//! Analytics over the habit store: streaks, rates, chart-ready bundles.
//!
//! # Responsibility
//! - Derive streak counts and completion rates from the ledger.
//! - Shape metric-tagged result bundles for the presentation layer.
//!
//! # Invariants
//! - Every computation here is a pure function of the store snapshot and the
//!   anchor date passed in; nothing reads the wall clock.
//! - Empty habit sets and empty date ranges degrade to neutral values (rate
//!   0, empty lists), never to errors.

pub mod aggregate;
pub mod filter;
pub mod streak;
