//! Insight orchestration.
//!
//! Read path:  find → (miss) prompt → complete → extract → create → (Conflict) re-read
//! Batch path: list industries → per industry: prompt → complete → extract → update
//!
//! The read path never regenerates an existing record, even a stale one;
//! staleness is handled only by the scheduled batch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::insights::extractor::{extract_insight, ExtractError};
use crate::insights::prompts::build_insight_prompt;
use crate::insights::schema::{CandidateInsight, Insight};
use crate::insights::store::{is_stale, InsightStore, StoreError};
use crate::llm_client::{CompletionClient, CompletionError};

const MAX_INDUSTRY_CHARS: usize = 100;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InsightError {
    #[error("invalid industry: {0}")]
    InvalidIndustry(String),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InsightError {
    /// Pipeline stage that failed, as reported in a `BatchReport`.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidIndustry(_) => "input",
            Self::Completion(_) => "completion",
            Self::Extract(_) => "extraction",
            Self::Store(_) => "store",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedIndustry {
    pub industry: String,
    pub stage: &'static str,
    pub reason: String,
}

/// Outcome of one `refresh_all` run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub refreshed: Vec<String>,
    pub skipped: Vec<SkippedIndustry>,
}

/// Trims the name and rejects values that cannot be a sensible key.
pub fn normalize_industry(industry: &str) -> Result<String, InsightError> {
    let industry = industry.trim();
    if industry.is_empty() {
        return Err(InsightError::InvalidIndustry(
            "industry cannot be empty".to_string(),
        ));
    }
    if industry.chars().count() > MAX_INDUSTRY_CHARS {
        return Err(InsightError::InvalidIndustry(format!(
            "industry must be at most {MAX_INDUSTRY_CHARS} characters"
        )));
    }
    if industry.chars().any(char::is_control) {
        return Err(InsightError::InvalidIndustry(
            "industry cannot contain control characters".to_string(),
        ));
    }
    Ok(industry.to_string())
}

pub struct InsightService {
    store: Arc<dyn InsightStore>,
    completion: Arc<dyn CompletionClient>,
}

impl InsightService {
    pub fn new(store: Arc<dyn InsightStore>, completion: Arc<dyn CompletionClient>) -> Self {
        Self { store, completion }
    }

    /// Returns the insight for `industry`, generating and creating it on
    /// first use. Concurrent first-time callers converge on a single record.
    pub async fn resolve_for_user(&self, industry: &str) -> Result<Insight, InsightError> {
        let industry = normalize_industry(industry)?;

        if let Some(existing) = self.store.find(&industry).await? {
            if is_stale(&existing, Utc::now()) {
                debug!(
                    "Insight for '{industry}' is stale since {}; serving it until the scheduled refresh",
                    existing.next_update
                );
            }
            return Ok(existing);
        }

        info!("No insight for '{industry}' yet, generating");
        let candidate = self.generate(&industry).await?;

        match self.store.create(&industry, &candidate, Utc::now()).await {
            Ok(created) => Ok(created),
            Err(StoreError::Conflict(_)) => {
                info!("Another request created the insight for '{industry}' first, re-reading");
                self.store
                    .find(&industry)
                    .await?
                    .ok_or(InsightError::Store(StoreError::Conflict(industry)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Regenerates every known industry. Per-industry failures are skipped
    /// and reported; only failing to list the industries aborts the run.
    pub async fn refresh_all(&self) -> Result<BatchReport, StoreError> {
        let started_at = Utc::now();
        let industries = self.store.list_industries().await?;
        info!("Refreshing insights for {} industries", industries.len());

        let mut refreshed = Vec::new();
        let mut skipped = Vec::new();

        for industry in industries {
            match self.refresh_one(&industry).await {
                Ok(_) => refreshed.push(industry),
                Err(e) => {
                    warn!("Skipping insight refresh for '{industry}' ({}): {e}", e.stage());
                    skipped.push(SkippedIndustry {
                        stage: e.stage(),
                        reason: e.to_string(),
                        industry,
                    });
                }
            }
        }

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            refreshed,
            skipped,
        };
        info!(
            "Insight refresh finished: {} refreshed, {} skipped",
            report.refreshed.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Regenerates and overwrites one existing record.
    pub async fn refresh_one(&self, industry: &str) -> Result<Insight, InsightError> {
        let candidate = self.generate(industry).await?;
        Ok(self.store.update(industry, &candidate, Utc::now()).await?)
    }

    async fn generate(&self, industry: &str) -> Result<CandidateInsight, InsightError> {
        let prompt = build_insight_prompt(industry);
        let raw = self.completion.complete(&prompt).await?;

        extract_insight(&raw).map_err(|e| {
            match e.field() {
                Some(field) => debug!("Completion for '{industry}' rejected at {field}"),
                None => debug!("Unparseable completion for '{industry}': {raw}"),
            }
            e.into()
        })
    }
}
