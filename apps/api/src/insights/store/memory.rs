//! In-memory `InsightStore` with the same uniqueness semantics as Postgres.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{InsightStore, StoreError};
use crate::insights::schema::{CandidateInsight, Insight};

#[derive(Default)]
pub struct MemoryInsightStore {
    rows: Mutex<BTreeMap<String, Insight>>,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl MemoryInsightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record without counting it as a create.
    pub async fn seed(&self, industry: &str, candidate: &CandidateInsight, now: DateTime<Utc>) {
        let insight = Insight::from_candidate(Uuid::new_v4(), industry, candidate, now);
        self.rows.lock().await.insert(industry.to_string(), insight);
    }

    pub async fn row_count(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// Successful creates so far.
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Successful updates so far.
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InsightStore for MemoryInsightStore {
    async fn find(&self, industry: &str) -> Result<Option<Insight>, StoreError> {
        Ok(self.rows.lock().await.get(industry).cloned())
    }

    async fn create(
        &self,
        industry: &str,
        candidate: &CandidateInsight,
        now: DateTime<Utc>,
    ) -> Result<Insight, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(industry) {
            return Err(StoreError::Conflict(industry.to_string()));
        }
        let insight = Insight::from_candidate(Uuid::new_v4(), industry, candidate, now);
        rows.insert(industry.to_string(), insight.clone());
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(insight)
    }

    async fn update(
        &self,
        industry: &str,
        candidate: &CandidateInsight,
        now: DateTime<Utc>,
    ) -> Result<Insight, StoreError> {
        let mut rows = self.rows.lock().await;
        let existing = rows
            .get_mut(industry)
            .ok_or_else(|| StoreError::NotFound(industry.to_string()))?;
        *existing = Insight::from_candidate(existing.id, industry, candidate, now);
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(existing.clone())
    }

    async fn list_industries(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.rows.lock().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::insights::schema::tests::valid_payload;
    use crate::insights::schema::validate_candidate;
    use crate::insights::store::is_stale;

    fn candidate() -> CandidateInsight {
        validate_candidate(&valid_payload()).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_conflict() {
        let store = MemoryInsightStore::new();
        let now = Utc::now();
        store.create("Software", &candidate(), now).await.unwrap();
        let err = store.create("Software", &candidate(), now).await.unwrap_err();
        assert_eq!(err, StoreError::Conflict("Software".to_string()));
        assert_eq!(store.row_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_requires_existing_record() {
        let store = MemoryInsightStore::new();
        let err = store
            .update("Mining", &candidate(), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("Mining".to_string()));
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_moves_timestamps() {
        let store = MemoryInsightStore::new();
        let t = Utc::now();
        let created = store.create("Software", &candidate(), t).await.unwrap();

        let later = t + Duration::days(8);
        let updated = store.update("Software", &candidate(), later).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.last_updated, later);
        assert_eq!(updated.next_update, later + Duration::days(7));
    }

    #[tokio::test]
    async fn test_staleness_after_create() {
        let store = MemoryInsightStore::new();
        let t = Utc::now();
        let insight = store.create("Software", &candidate(), t).await.unwrap();
        assert!(!is_stale(&insight, t + Duration::days(6)));
        assert!(is_stale(&insight, t + Duration::days(8)));
    }
}
