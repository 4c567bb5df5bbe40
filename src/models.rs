use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    pub id: i64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub trait_id: i64,
    #[serde(rename = "trait", default, skip_serializing_if = "Option::is_none")]
    pub trait_: Option<Trait>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceTrait {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceHabit {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "trait", default, skip_serializing_if = "Option::is_none")]
    pub trait_: Option<OccurrenceTrait>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: i64,
    pub habit_id: i64,
    pub timestamp: i64,
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habit: Option<OccurrenceHabit>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    // A zero bound marks a calendar window that has not been initialized yet.
    pub fn is_set(&self) -> bool {
        self.start != 0 && self.end != 0
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccurrenceFilter {
    pub habit_ids: HashSet<i64>,
    pub trait_ids: HashSet<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    pub day: String,
    pub occurrences: Vec<Occurrence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOccurrence {
    pub habit_id: i64,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub trait_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrait {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub habit_ids: Vec<i64>,
    pub trait_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitsView {
    pub habits: Vec<Habit>,
    pub fetching: bool,
    pub adding: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removing: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TraitsView {
    pub traits: Vec<Trait>,
    pub fetching: bool,
    pub adding: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSnapshot {
    pub range: TimeRange,
    pub fetching: bool,
    pub adding: bool,
    pub occurrences: Vec<Occurrence>,
    pub occurrences_by_date: Vec<DayGroup>,
    pub habit_ids: Vec<i64>,
    pub trait_ids: Vec<i64>,
}

pub fn day_key(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|moment| moment.format("%Y-%m-%d").to_string())
}
