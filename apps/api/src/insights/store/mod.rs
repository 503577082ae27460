//! Persistence for industry insights.
//!
//! The unique key on `industry` is the only mutual exclusion in the system:
//! concurrent first-time creators race on `create`, and losers get
//! `StoreError::Conflict` and re-read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::insights::schema::{CandidateInsight, Insight};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgInsightStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("an insight for industry '{0}' already exists")]
    Conflict(String),

    #[error("no insight exists for industry '{0}'")]
    NotFound(String),

    #[error("insight store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn find(&self, industry: &str) -> Result<Option<Insight>, StoreError>;

    /// Inserts the first record for `industry`, written at `now`.
    /// Fails with `Conflict` if one already exists.
    async fn create(
        &self,
        industry: &str,
        candidate: &CandidateInsight,
        now: DateTime<Utc>,
    ) -> Result<Insight, StoreError>;

    /// Overwrites the record for `industry` in place, written at `now`.
    /// Fails with `NotFound` if there is none.
    async fn update(
        &self,
        industry: &str,
        candidate: &CandidateInsight,
        now: DateTime<Utc>,
    ) -> Result<Insight, StoreError>;

    async fn list_industries(&self) -> Result<Vec<String>, StoreError>;
}

pub fn is_stale(insight: &Insight, now: DateTime<Utc>) -> bool {
    insight.is_stale(now)
}
