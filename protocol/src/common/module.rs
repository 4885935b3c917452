//! Machine learning module records
//!
//! This module contains the record returned by the module resource, the
//! enumerated model types offered to users and the opaque input parameter blob.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Module Structures
// ============================================================================

/// Module record as returned by the server
///
/// `id` is assigned by the server and is the record's identity. Numeric ids are
/// accepted and kept as their decimal string form. Every other field may be
/// missing, and timestamps without an offset are read as UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineLearningModule {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub historical_data_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_parameters: Option<InputParameters>,
    #[serde(
        rename = "mermaidDiagram",
        alias = "workflowDiagram",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub workflow_diagram: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MachineLearningModule {
    /// Name to show for the record, falling back to its id
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// RFC 3339, or a local date-time such as `2024-03-01T10:00:00.123` taken as UTC
///
/// Anything else, including `null`, decodes as no timestamp.
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => parse_timestamp(&text),
        _ => None,
    })
}

pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Model Types
// ============================================================================

/// Model types a user can pick when creating or editing a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    RandomForest,
    NeuralNetwork,
    GradientBoosting,
    LinearRegression,
}

impl ModelType {
    pub const ALL: [ModelType; 4] = [
        ModelType::RandomForest,
        ModelType::NeuralNetwork,
        ModelType::GradientBoosting,
        ModelType::LinearRegression,
    ];

    /// Wire value, e.g. `random_forest`
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::RandomForest => "random_forest",
            ModelType::NeuralNetwork => "neural_network",
            ModelType::GradientBoosting => "gradient_boosting",
            ModelType::LinearRegression => "linear_regression",
        }
    }

    /// Human readable label, e.g. `Random Forest`
    pub fn label(&self) -> &'static str {
        match self {
            ModelType::RandomForest => "Random Forest",
            ModelType::NeuralNetwork => "Neural Network",
            ModelType::GradientBoosting => "Gradient Boosting",
            ModelType::LinearRegression => "Linear Regression",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known model types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModelType(pub String);

impl fmt::Display for UnknownModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model type: {}", self.0)
    }
}

impl std::error::Error for UnknownModelType {}

impl FromStr for ModelType {
    type Err = UnknownModelType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ModelType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle) || t.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownModelType(s.to_string()))
    }
}

// ============================================================================
// Input Parameters
// ============================================================================

/// Free-form input parameters attached to a module
///
/// The client never validates the shape of the parameters. A blob that parses
/// as a JSON object is kept as an order-preserving map; anything else is sent
/// as the raw text the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputParameters {
    Map(Map<String, Value>),
    Raw(String),
}

impl InputParameters {
    pub fn from_blob(blob: &str) -> Self {
        match serde_json::from_str::<Map<String, Value>>(blob) {
            Ok(map) => InputParameters::Map(map),
            Err(_) => InputParameters::Raw(blob.to_string()),
        }
    }

    /// Text form suitable for pre-filling an input field
    pub fn to_blob(&self) -> String {
        match self {
            InputParameters::Map(map) => Value::Object(map.clone()).to_string(),
            InputParameters::Raw(raw) => raw.clone(),
        }
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            InputParameters::Map(map) => Some(map),
            InputParameters::Raw(_) => None,
        }
    }
}
