//! Crop recommendation records
//!
//! Recommendations are produced by the server from a trained module. The client
//! only decodes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::module::deserialize_timestamp;

/// Crop recommendation representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub id: String,
    pub crop_name: String,
    #[serde(default)]
    pub input_parameters: Map<String, Value>,
    /// Presumed to lie in `0.0..=1.0`; not checked by the client
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recommendation_from_server_json() {
        let rec: CropRecommendation = serde_json::from_value(json!({
            "id": "r-1",
            "cropName": "maize",
            "inputParameters": {"soil_ph": 6.5},
            "confidenceScore": 0.87,
            "createdAt": "2024-05-01T08:30:00Z"
        }))
        .unwrap();

        assert_eq!(rec.crop_name, "maize");
        assert_eq!(rec.input_parameters["soil_ph"], json!(6.5));
        assert!((rec.confidence_score - 0.87).abs() < f64::EPSILON);
        assert!(rec.created_at.is_some());
    }

    #[test]
    fn test_recommendation_local_timestamp() {
        let rec: CropRecommendation = serde_json::from_value(json!({
            "id": "r-2",
            "cropName": "rice",
            "confidenceScore": 0.5,
            "createdAt": "2024-05-01T08:30:00"
        }))
        .unwrap();
        assert!(rec.created_at.is_some());
    }
}
