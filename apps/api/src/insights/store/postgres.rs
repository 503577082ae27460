use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{InsightStore, StoreError};
use crate::insights::schema::{refresh_interval, CandidateInsight, Insight};
use crate::models::insight::IndustryInsightRow;

/// Postgres-backed store over the `industry_insights` table.
#[derive(Clone)]
pub struct PgInsightStore {
    pool: PgPool,
}

impl PgInsightStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_insight(row: IndustryInsightRow) -> Result<Insight, StoreError> {
    let industry = row.industry.clone();
    Insight::try_from(row)
        .map_err(|e| StoreError::Unavailable(format!("corrupt insight row for '{industry}': {e}")))
}

#[async_trait]
impl InsightStore for PgInsightStore {
    async fn find(&self, industry: &str) -> Result<Option<Insight>, StoreError> {
        sqlx::query_as::<_, IndustryInsightRow>(
            "SELECT * FROM industry_insights WHERE industry = $1",
        )
        .bind(industry)
        .fetch_optional(&self.pool)
        .await?
        .map(into_insight)
        .transpose()
    }

    async fn create(
        &self,
        industry: &str,
        candidate: &CandidateInsight,
        now: DateTime<Utc>,
    ) -> Result<Insight, StoreError> {
        // ON CONFLICT DO NOTHING turns a lost race into "no row returned"
        // instead of a unique-violation error.
        let row = sqlx::query_as::<_, IndustryInsightRow>(
            r#"
            INSERT INTO industry_insights
                (id, industry, salary_ranges, growth_rate, demand_level, top_skills,
                 market_outlook, key_trends, recommended_skills, last_updated, next_update)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (industry) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(industry)
        .bind(Json(&candidate.salary_ranges))
        .bind(candidate.growth_rate)
        .bind(candidate.demand_level.as_str())
        .bind(&candidate.top_skills)
        .bind(candidate.market_outlook.as_str())
        .bind(&candidate.key_trends)
        .bind(&candidate.recommended_skills)
        .bind(now)
        .bind(now + refresh_interval())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::Conflict(industry.to_string()))?;

        info!("Created insight {} for industry '{industry}'", row.id);
        into_insight(row)
    }

    async fn update(
        &self,
        industry: &str,
        candidate: &CandidateInsight,
        now: DateTime<Utc>,
    ) -> Result<Insight, StoreError> {
        let row = sqlx::query_as::<_, IndustryInsightRow>(
            r#"
            UPDATE industry_insights
            SET salary_ranges = $2,
                growth_rate = $3,
                demand_level = $4,
                top_skills = $5,
                market_outlook = $6,
                key_trends = $7,
                recommended_skills = $8,
                last_updated = $9,
                next_update = $10
            WHERE industry = $1
            RETURNING *
            "#,
        )
        .bind(industry)
        .bind(Json(&candidate.salary_ranges))
        .bind(candidate.growth_rate)
        .bind(candidate.demand_level.as_str())
        .bind(&candidate.top_skills)
        .bind(candidate.market_outlook.as_str())
        .bind(&candidate.key_trends)
        .bind(&candidate.recommended_skills)
        .bind(now)
        .bind(now + refresh_interval())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(industry.to_string()))?;

        info!("Updated insight {} for industry '{industry}'", row.id);
        into_insight(row)
    }

    async fn list_industries(&self) -> Result<Vec<String>, StoreError> {
        Ok(
            sqlx::query_scalar::<_, String>("SELECT industry FROM industry_insights ORDER BY industry")
                .fetch_all(&self.pool)
                .await?,
        )
    }
}
