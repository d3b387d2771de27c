//! Task wire types.
//!
//! `Task` mirrors what the dashboard service serializes: ids and titles are
//! reliable, everything else arrives in whatever shape the server happened to
//! store. Score-like fields stay raw `serde_json::Value`s (number, numeric
//! string, empty string, or null all occur) until the ranking engine coerces
//! them; unknown fields are ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A task as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier, assigned by the remote service
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 date; unparsable values are treated as absent
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    /// Numeric scalar in an unreliable wire shape, coerced at ranking time
    #[serde(default)]
    pub estimated_hours: Value,
    /// Numeric scalar in an unreliable wire shape, coerced at ranking time
    #[serde(default)]
    pub importance: Value,
    /// Server-assigned priority bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Titles of tasks this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Titles of tasks depending on this one (server-computed)
    #[serde(default)]
    pub dependents: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub urgency_score: Value,
    #[serde(default)]
    pub effort_score: Value,
    #[serde(default)]
    pub dependency_score: Value,
}

impl Task {
    /// Create a task with the given identity and no attributes set
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            due_date: None,
            estimated_hours: Value::Null,
            importance: Value::Null,
            priority: None,
            dependencies: Vec::new(),
            dependents: Vec::new(),
            completed: false,
            urgency_score: Value::Null,
            effort_score: Value::Null,
            dependency_score: Value::Null,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Value::from(hours);
        self
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = Value::from(importance);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Set the three server-computed scores at once
    pub fn with_scores(mut self, urgency: f64, effort: f64, dependency: f64) -> Self {
        self.urgency_score = Value::from(urgency);
        self.effort_score = Value::from(effort);
        self.dependency_score = Value::from(dependency);
        self
    }
}

/// Creation payload for one task in a batch submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl TaskSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            estimated_hours: None,
            importance: None,
            dependencies: Vec::new(),
        }
    }
}

/// Partial update payload; absent fields are left untouched by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Patch that only flips the completion flag
    pub fn completed(done: bool) -> Self {
        Self {
            completed: Some(done),
            ..Self::default()
        }
    }

    /// Patch that only changes the importance
    pub fn importance(value: f64) -> Self {
        Self {
            importance: Some(value),
            ..Self::default()
        }
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Accept a date, null, or garbage; only a parseable ISO date survives
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|text| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()))
}
