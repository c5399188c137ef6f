use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which of the day's two planned dishes an entry fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    First,
    Second,
}

impl MealSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::First => "first",
            MealSlot::Second => "second",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanKeyError {
    #[error("plan key must look like YYYY-MM-DD_first: {0}")]
    Malformed(String),
    #[error("invalid date in plan key: {0}")]
    Date(String),
    #[error("unknown meal slot: {0}")]
    Slot(String),
}

/// Composite identity of a meal-plan entry: calendar date plus slot.
///
/// Wire form is `{date}_{slot}`, e.g. `2024-05-01_first`, matching the
/// remote collection's document keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlanKey {
    pub date: NaiveDate,
    pub slot: MealSlot,
}

impl PlanKey {
    pub fn new(date: NaiveDate, slot: MealSlot) -> Self {
        Self { date, slot }
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.date.format("%Y-%m-%d"), self.slot)
    }
}

impl FromStr for PlanKey {
    type Err = PlanKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (date_part, slot_part) = raw
            .rsplit_once('_')
            .ok_or_else(|| PlanKeyError::Malformed(raw.to_string()))?;
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|_| PlanKeyError::Date(date_part.to_string()))?;
        let slot = match slot_part {
            "first" => MealSlot::First,
            "second" => MealSlot::Second,
            other => return Err(PlanKeyError::Slot(other.to_string())),
        };
        Ok(PlanKey::new(date, slot))
    }
}

/// One planned dish on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEntry {
    pub date: NaiveDate,

    /// Slot within the day; the remote documents call this field `type`.
    #[serde(rename = "type")]
    pub slot: MealSlot,

    pub recipe_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
}

impl MealPlanEntry {
    pub fn new(date: NaiveDate, slot: MealSlot, recipe_title: impl Into<String>) -> Self {
        Self {
            date,
            slot,
            recipe_title: recipe_title.into(),
            recipe_id: None,
        }
    }

    /// The composite key this entry lives under.
    pub fn key(&self) -> PlanKey {
        PlanKey::new(self.date, self.slot)
    }
}

/// The whole calendar, keyed by the wire form of [`PlanKey`].
///
/// A map keyed by the composite key guarantees at most one entry per
/// (date, slot); insertion order is irrelevant.
pub type MealPlan = BTreeMap<String, MealPlanEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_plan_key_round_trips_through_wire_form() {
        let key = PlanKey::new(date("2024-05-01"), MealSlot::Second);
        let encoded = key.to_string();
        assert_eq!(encoded, "2024-05-01_second");
        assert_eq!(encoded.parse::<PlanKey>().unwrap(), key);
    }

    #[test]
    fn test_plan_key_rejects_garbage() {
        assert!(matches!(
            "2024-05-01".parse::<PlanKey>(),
            Err(PlanKeyError::Malformed(_))
        ));
        assert!(matches!(
            "yesterday_first".parse::<PlanKey>(),
            Err(PlanKeyError::Date(_))
        ));
        assert!(matches!(
            "2024-05-01_brunch".parse::<PlanKey>(),
            Err(PlanKeyError::Slot(_))
        ));
    }

    #[test]
    fn test_entry_serializes_slot_as_type() {
        let entry = MealPlanEntry::new(date("2024-05-01"), MealSlot::First, "Paella");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"first\""));
        assert!(json.contains("\"recipeTitle\":\"Paella\""));
        let back: MealPlanEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
