//! Test utilities and helpers for unit tests
//!
//! This module provides common testing utilities including:
//! - Module record fixtures
//! - Request payload fixtures
//! - Temporary files for config tests

#[cfg(test)]
pub mod test_helpers {
    use std::path::PathBuf;

    use mlmod_protocol::api::CreateModuleRequest;
    use mlmod_protocol::common::{InputParameters, MachineLearningModule, ModelType};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    /// Create a temporary directory for testing
    pub fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    /// Create a temporary file with content
    pub fn create_temp_file_with_content(dir: &TempDir, filename: &str, content: &[u8]) -> PathBuf {
        let file_path = dir.path().join(filename);
        std::fs::write(&file_path, content).expect("Failed to write temp file");
        file_path
    }

    /// Module record as the server would send it
    pub fn module_json(id: &str, model_type: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Module {}", id),
            "modelType": model_type,
            "historicalDataPath": format!("/data/{}.csv", id),
            "status": "Trained",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-02T10:00:00Z"
        })
    }

    /// Decoded module record
    pub fn sample_module(id: &str, model_type: &str) -> MachineLearningModule {
        serde_json::from_value(module_json(id, model_type)).expect("Invalid module fixture")
    }

    /// Create payload matching what the form produces for a typical submission
    pub fn sample_create_request() -> CreateModuleRequest {
        CreateModuleRequest {
            model_type: ModelType::NeuralNetwork,
            historical_data_path: "/data/history.csv".to_string(),
            input_parameters: InputParameters::from_blob(r#"{"soil_ph": 6.5}"#),
            workflow_diagram: Some("graph TD\n A --> B".to_string()),
        }
    }
}
