//! Raw activity records from the ingestion side.
//!
//! Tabular sources hand over every cell as text. [`ActivityRecord`] keeps
//! that shape so the conversion to [`Activity`] is the single place where
//! numeric parsing and range checks happen.
//!
//! Predecessor cells are delimited lists (`;`, `,` or whitespace). The
//! literal `/` means the activity has no predecessors.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Activity, RiskLevel};
use crate::error::{Error, Result};
use crate::estimation::ThreePointEstimate;

/// Token meaning "no predecessors".
pub const NO_PREDECESSORS: &str = "/";

/// One unvalidated input row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub optimistic: Option<String>,
    pub likely: Option<String>,
    pub pessimistic: Option<String>,
    pub resources: Option<String>,
    pub cost_rate: Option<String>,
    pub delay_risk: Option<String>,
    pub delay_weight: Option<String>,
    pub attrition_risk: Option<String>,
    pub attrition_weight: Option<String>,
    pub exposure: Option<String>,
    pub predecessors: Option<String>,
}

/// Splits a predecessor cell into identifiers.
///
/// ```
/// use risk_schedule::models::parse_predecessors;
///
/// assert_eq!(parse_predecessors("A; B,C"), vec!["A", "B", "C"]);
/// assert!(parse_predecessors("/").is_empty());
/// ```
pub fn parse_predecessors(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NO_PREDECESSORS {
        return Vec::new();
    }
    raw.split(|c: char| c == ';' || c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != NO_PREDECESSORS)
        .map(String::from)
        .collect()
}

impl ActivityRecord {
    fn label(&self) -> String {
        self.id.clone().unwrap_or_else(|| "<missing id>".into())
    }

    fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidActivityRecord {
            record: self.label(),
            reason: reason.into(),
        }
    }

    fn text<'a>(&self, field: &'static str, value: &'a Option<String>) -> Result<&'a str> {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(self.invalid(format!("missing field '{field}'"))),
        }
    }

    fn number<T: std::str::FromStr>(&self, field: &'static str, value: &Option<String>) -> Result<T> {
        let text = self.text(field, value)?;
        text.parse::<T>()
            .map_err(|_| self.invalid(format!("field '{field}' is not numeric: '{text}'")))
    }

    fn risk(&self, field: &'static str, value: &Option<String>) -> Result<RiskLevel> {
        let grade: u8 = self.number(field, value)?;
        RiskLevel::try_from(grade).map_err(|e| self.invalid(format!("field '{field}': {e}")))
    }
}

impl TryFrom<&ActivityRecord> for Activity {
    type Error = Error;

    fn try_from(record: &ActivityRecord) -> Result<Self> {
        let id = record.text("id", &record.id)?.to_string();
        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(id.as_str())
            .to_string();

        let optimistic: f64 = record.number("optimistic", &record.optimistic)?;
        let likely: f64 = record.number("likely", &record.likely)?;
        let pessimistic: f64 = record.number("pessimistic", &record.pessimistic)?;
        let estimate = ThreePointEstimate::new(optimistic, likely, pessimistic)
            .map_err(|e| record.invalid(e.to_string()))?;

        let cost_rate: f64 = record.number("cost_rate", &record.cost_rate)?;
        let delay_weight: f64 = record.number("delay_weight", &record.delay_weight)?;
        if !cost_rate.is_finite() || cost_rate < 0.0 {
            return Err(record.invalid("cost_rate must be a non-negative number"));
        }
        if !delay_weight.is_finite() || delay_weight < 0.0 {
            return Err(record.invalid("delay_weight must be a non-negative number"));
        }

        Ok(Activity {
            id,
            name,
            estimate,
            resources: record.number("resources", &record.resources)?,
            cost_rate,
            delay_risk: record.risk("delay_risk", &record.delay_risk)?,
            delay_weight,
            attrition_risk: record.risk("attrition_risk", &record.attrition_risk)?,
            attrition_weight: record.number("attrition_weight", &record.attrition_weight)?,
            exposure: record.risk("exposure", &record.exposure)?,
            predecessors: record
                .predecessors
                .as_deref()
                .map(parse_predecessors)
                .unwrap_or_default(),
        })
    }
}

impl TryFrom<ActivityRecord> for Activity {
    type Error = Error;

    fn try_from(record: ActivityRecord) -> Result<Self> {
        Activity::try_from(&record)
    }
}

/// Converts records, skipping invalid ones with a warning.
pub fn activities_from_records<'a, I>(records: I) -> Vec<Activity>
where
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    records
        .into_iter()
        .filter_map(|record| match Activity::try_from(record) {
            Ok(activity) => Some(activity),
            Err(e) => {
                warn!(error = %e, "skipping activity record");
                None
            }
        })
        .collect()
}
