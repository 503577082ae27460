//! Insight schema: the shape every generated insight must satisfy before it
//! may be persisted, plus the stored `Insight` record.
//!
//! Validation walks the parsed JSON value field by field so that a rejection
//! can name the exact offending path (`demandLevel`, `salaryRanges[2].median`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Minimum number of entries in every list field.
pub const MIN_ENTRIES: usize = 5;

/// Insights are regenerated on this cadence.
pub const REFRESH_INTERVAL_DAYS: i64 = 7;

pub fn refresh_interval() -> Duration {
    Duration::days(REFRESH_INTERVAL_DAYS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DemandLevel {
    High,
    Medium,
    Low,
}

impl DemandLevel {
    pub const TOKENS: &'static str = "HIGH, MEDIUM, LOW";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl FromStr for DemandLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            other => Err(format!("unknown demand level '{other}'")),
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketOutlook {
    Positive,
    Neutral,
    Negative,
}

impl MarketOutlook {
    pub const TOKENS: &'static str = "POSITIVE, NEUTRAL, NEGATIVE";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Neutral => "NEUTRAL",
            Self::Negative => "NEGATIVE",
        }
    }
}

impl FromStr for MarketOutlook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POSITIVE" => Ok(Self::Positive),
            "NEUTRAL" => Ok(Self::Neutral),
            "NEGATIVE" => Ok(Self::Negative),
            other => Err(format!("unknown market outlook '{other}'")),
        }
    }
}

impl fmt::Display for MarketOutlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub role: String,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub location: String,
}

/// A parsed and validated insight payload that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInsight {
    pub salary_ranges: Vec<SalaryRange>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
}

/// The stored record: one per industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: Uuid,
    pub industry: String,
    pub salary_ranges: Vec<SalaryRange>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub last_updated: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
}

impl Insight {
    /// Builds a record written at `now`; `next_update` is always `now + 7 days`.
    pub fn from_candidate(
        id: Uuid,
        industry: &str,
        candidate: &CandidateInsight,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            industry: industry.to_string(),
            salary_ranges: candidate.salary_ranges.clone(),
            growth_rate: candidate.growth_rate,
            demand_level: candidate.demand_level,
            top_skills: candidate.top_skills.clone(),
            market_outlook: candidate.market_outlook,
            key_trends: candidate.key_trends.clone(),
            recommended_skills: candidate.recommended_skills.clone(),
            last_updated: now,
            next_update: now + refresh_interval(),
        }
    }

    /// A refresh is due once `now` reaches `next_update`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_update
    }
}

/// A single violated constraint. `field` is a JSON path into the payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct SchemaViolation {
    pub field: String,
    pub reason: String,
}

impl SchemaViolation {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Validates a parsed JSON value against the insight schema.
/// Any single violation rejects the whole candidate.
pub fn validate_candidate(value: &Value) -> Result<CandidateInsight, SchemaViolation> {
    let obj = value
        .as_object()
        .ok_or_else(|| SchemaViolation::new("$", "expected a JSON object"))?;

    Ok(CandidateInsight {
        salary_ranges: salary_ranges(obj)?,
        growth_rate: finite_number(required(obj, "growthRate")?, "growthRate")?,
        demand_level: fixed_token(obj, "demandLevel", DemandLevel::TOKENS)?,
        top_skills: string_list(obj, "topSkills")?,
        market_outlook: fixed_token(obj, "marketOutlook", MarketOutlook::TOKENS)?,
        key_trends: string_list(obj, "keyTrends")?,
        recommended_skills: string_list(obj, "recommendedSkills")?,
    })
}

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value, SchemaViolation> {
    obj.get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| SchemaViolation::new(field, "missing required field"))
}

fn finite_number(value: &Value, path: &str) -> Result<f64, SchemaViolation> {
    match value.as_f64() {
        Some(n) if value.is_number() && n.is_finite() => Ok(n),
        _ => Err(SchemaViolation::new(
            path,
            format!("expected a number, got {}", kind(value)),
        )),
    }
}

fn non_empty_string(value: &Value, path: &str) -> Result<String, SchemaViolation> {
    match value.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(_) => Err(SchemaViolation::new(path, "must not be empty")),
        None => Err(SchemaViolation::new(
            path,
            format!("expected a string, got {}", kind(value)),
        )),
    }
}

fn list<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Vec<Value>, SchemaViolation> {
    let value = required(obj, field)?;
    let items = value.as_array().ok_or_else(|| {
        SchemaViolation::new(field, format!("expected an array, got {}", kind(value)))
    })?;
    if items.len() < MIN_ENTRIES {
        return Err(SchemaViolation::new(
            field,
            format!("expected at least {MIN_ENTRIES} entries, got {}", items.len()),
        ));
    }
    Ok(items)
}

fn string_list(obj: &Map<String, Value>, field: &str) -> Result<Vec<String>, SchemaViolation> {
    list(obj, field)?
        .iter()
        .enumerate()
        .map(|(i, item)| non_empty_string(item, &format!("{field}[{i}]")))
        .collect()
}

/// Enum tokens are matched exactly; `"high"` is not `"HIGH"`.
fn fixed_token<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    field: &str,
    allowed: &str,
) -> Result<T, SchemaViolation> {
    let value = required(obj, field)?;
    if !value.is_string() {
        return Err(SchemaViolation::new(
            field,
            format!("expected one of {allowed}, got {}", kind(value)),
        ));
    }
    serde_json::from_value(value.clone())
        .map_err(|_| SchemaViolation::new(field, format!("expected one of {allowed}, got {value}")))
}

fn salary_ranges(obj: &Map<String, Value>) -> Result<Vec<SalaryRange>, SchemaViolation> {
    list(obj, "salaryRanges")?
        .iter()
        .enumerate()
        .map(|(i, item)| salary_range(item, &format!("salaryRanges[{i}]")))
        .collect()
}

fn salary_range(value: &Value, path: &str) -> Result<SalaryRange, SchemaViolation> {
    let obj = value.as_object().ok_or_else(|| {
        SchemaViolation::new(path, format!("expected an object, got {}", kind(value)))
    })?;

    let range = SalaryRange {
        role: non_empty_string(member(obj, path, "role")?, &format!("{path}.role"))?,
        min: amount(obj, path, "min")?,
        max: amount(obj, path, "max")?,
        median: amount(obj, path, "median")?,
        location: non_empty_string(member(obj, path, "location")?, &format!("{path}.location"))?,
    };

    if range.min > range.max {
        return Err(SchemaViolation::new(format!("{path}.min"), "min exceeds max"));
    }
    if range.median < range.min || range.median > range.max {
        return Err(SchemaViolation::new(
            format!("{path}.median"),
            "median outside [min, max]",
        ));
    }
    Ok(range)
}

fn member<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    name: &str,
) -> Result<&'a Value, SchemaViolation> {
    obj.get(name)
        .filter(|v| !v.is_null())
        .ok_or_else(|| SchemaViolation::new(format!("{path}.{name}"), "missing required field"))
}

fn amount(obj: &Map<String, Value>, path: &str, name: &str) -> Result<f64, SchemaViolation> {
    let n = finite_number(member(obj, path, name)?, &format!("{path}.{name}"))?;
    if n < 0.0 {
        return Err(SchemaViolation::new(
            format!("{path}.{name}"),
            "must not be negative",
        ));
    }
    Ok(n)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
