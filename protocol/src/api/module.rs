//! Module API DTOs
//!
//! Payloads for the module resource. Validation here is presence only; the
//! server owns every other rule.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub use crate::common::{InputParameters, MachineLearningModule, ModelType};

/// Base path of the module resource
pub const MODULES_PATH: &str = "/api/machine-learning-modules";

// ============================================================================
// Module Management DTOs
// ============================================================================

/// Create module request
///
/// Used for POST /api/machine-learning-modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateModuleRequest {
    pub model_type: ModelType,
    #[validate(length(min = 1))]
    pub historical_data_path: String,
    #[validate(custom(function = "validate_parameters_present"))]
    pub input_parameters: InputParameters,
    #[serde(
        rename = "mermaidDiagram",
        alias = "workflowDiagram",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(min = 1))]
    pub workflow_diagram: Option<String>,
}

/// Create module response
pub type CreateModuleResponse = MachineLearningModule;

/// Update module request
///
/// Used for PUT /api/machine-learning-modules/{id}. The id is repeated in the
/// body and must match the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModuleRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: CreateModuleRequest,
}

/// Update module response
pub type UpdateModuleResponse = MachineLearningModule;

/// List modules response
///
/// Response for GET /api/machine-learning-modules
pub type ListModulesResponse = Vec<MachineLearningModule>;

impl CreateModuleRequest {
    pub fn with_id(self, id: impl Into<String>) -> UpdateModuleRequest {
        UpdateModuleRequest {
            id: id.into(),
            fields: self,
        }
    }
}

/// Path of a single module
pub fn module_path(id: &str) -> String {
    format!("{}/{}", MODULES_PATH, id)
}

fn validate_parameters_present(params: &InputParameters) -> Result<(), ValidationError> {
    match params {
        InputParameters::Raw(raw) if raw.trim().is_empty() => {
            Err(ValidationError::new("required"))
        }
        _ => Ok(()),
    }
}
