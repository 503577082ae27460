use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::insights::schema::{Insight, SalaryRange};

/// Row layout of `industry_insights`.
#[derive(Debug, Clone, FromRow)]
pub struct IndustryInsightRow {
    pub id: Uuid,
    pub industry: String,
    pub salary_ranges: Json<Vec<SalaryRange>>,
    pub growth_rate: f64,
    pub demand_level: String,
    pub top_skills: Vec<String>,
    pub market_outlook: String,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub last_updated: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
}

impl TryFrom<IndustryInsightRow> for Insight {
    type Error = String;

    fn try_from(row: IndustryInsightRow) -> Result<Self, Self::Error> {
        Ok(Insight {
            id: row.id,
            demand_level: row.demand_level.parse()?,
            market_outlook: row.market_outlook.parse()?,
            industry: row.industry,
            salary_ranges: row.salary_ranges.0,
            growth_rate: row.growth_rate,
            top_skills: row.top_skills,
            key_trends: row.key_trends,
            recommended_skills: row.recommended_skills,
            last_updated: row.last_updated,
            next_update: row.next_update,
        })
    }
}
