//! Module form: collects the four user-editable fields
//!
//! The form only checks that each field is filled in. The parameter blob is
//! handed on untouched when it is not a JSON object.

use std::fmt;

use dialoguer::{theme::ColorfulTheme, Input, Select};
use mlmod_protocol::api::CreateModuleRequest;
use mlmod_protocol::common::{InputParameters, MachineLearningModule, ModelType};

use crate::error::{MlmodError, Result};

pub const PARAMETERS_PLACEHOLDER: &str = r#"{"soil_ph": 6.5, "temperature": 25, "humidity": 70}"#;
pub const WORKFLOW_PLACEHOLDER: &str =
    "graph TD; A[Receive Input] --> B[Train Model]; B --> C[Evaluate Model]; C --> D[Generate Recommendations]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    ModelType,
    HistoricalDataPath,
    InputParameters,
    WorkflowDiagram,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::ModelType => "Model Type",
            FormField::HistoricalDataPath => "Historical Data Path",
            FormField::InputParameters => "Input Parameters (JSON)",
            FormField::WorkflowDiagram => "Mermaid Diagram (Workflow)",
        }
    }

    fn required_message(&self) -> &'static str {
        match self {
            FormField::ModelType => "Model type is required",
            FormField::HistoricalDataPath => "Historical data path is required",
            FormField::InputParameters => "Input parameters are required",
            FormField::WorkflowDiagram => "Mermaid diagram is required",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

/// Fold field errors into one validation error naming the first bad field
pub fn into_validation_error(errors: &[FieldError]) -> MlmodError {
    let message = errors
        .iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join("; ");
    match errors.first() {
        Some(first) => MlmodError::validation_field(message, first.field.label()),
        None => MlmodError::validation(message),
    }
}

/// Whether a submission creates a module or updates the one being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

impl FormMode {
    pub fn for_editing(editing: Option<&MachineLearningModule>) -> Self {
        match editing {
            Some(module) => FormMode::Edit {
                id: module.id.clone(),
            },
            None => FormMode::Create,
        }
    }

    pub fn title(&self) -> String {
        match self {
            FormMode::Create => "New module".to_string(),
            FormMode::Edit { id } => format!("Edit module {}", id),
        }
    }
}

/// Field values supplied up front, e.g. from command-line flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub model_type: Option<ModelType>,
    pub historical_data_path: Option<String>,
    pub input_parameters: Option<String>,
    pub workflow_diagram: Option<String>,
}

impl FormInput {
    pub fn is_empty(&self) -> bool {
        self.model_type.is_none()
            && self.historical_data_path.is_none()
            && self.input_parameters.is_none()
            && self.workflow_diagram.is_none()
    }
}

/// Raw values as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleForm {
    pub model_type: Option<ModelType>,
    pub historical_data_path: String,
    pub input_parameters: String,
    pub workflow_diagram: String,
}

impl ModuleForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the form from an existing module
    ///
    /// A model type outside the known set leaves the selection empty.
    pub fn from_module(module: &MachineLearningModule) -> Self {
        Self {
            model_type: module.model_type.parse().ok(),
            historical_data_path: module.historical_data_path.clone(),
            input_parameters: module
                .input_parameters
                .as_ref()
                .map(InputParameters::to_blob)
                .unwrap_or_default(),
            workflow_diagram: module.workflow_diagram.clone().unwrap_or_default(),
        }
    }

    /// Overwrite the fields that `input` provides
    pub fn apply(&mut self, input: FormInput) {
        if let Some(model_type) = input.model_type {
            self.model_type = Some(model_type);
        }
        if let Some(path) = input.historical_data_path {
            self.historical_data_path = path;
        }
        if let Some(params) = input.input_parameters {
            self.input_parameters = params;
        }
        if let Some(diagram) = input.workflow_diagram {
            self.workflow_diagram = diagram;
        }
    }

    /// Presence check of every field, in display order
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let mut require = |field: FormField, present: bool| {
            if !present {
                errors.push(FieldError {
                    field,
                    message: field.required_message(),
                });
            }
        };

        require(FormField::ModelType, self.model_type.is_some());
        require(
            FormField::HistoricalDataPath,
            !self.historical_data_path.trim().is_empty(),
        );
        require(
            FormField::InputParameters,
            !self.input_parameters.trim().is_empty(),
        );
        require(
            FormField::WorkflowDiagram,
            !self.workflow_diagram.trim().is_empty(),
        );

        errors
    }

    /// Turn the form into a create payload, or report every missing field
    pub fn submit(&self) -> std::result::Result<CreateModuleRequest, Vec<FieldError>> {
        let errors = self.validate();
        let model_type = match self.model_type {
            Some(model_type) if errors.is_empty() => model_type,
            _ => return Err(errors),
        };

        Ok(CreateModuleRequest {
            model_type,
            historical_data_path: self.historical_data_path.clone(),
            input_parameters: InputParameters::from_blob(&self.input_parameters),
            workflow_diagram: Some(self.workflow_diagram.clone()),
        })
    }

    /// Ask for every field on the terminal, starting from the current values
    pub fn prompt(&mut self, mode: &FormMode) -> Result<()> {
        let theme = ColorfulTheme::default();

        let labels: Vec<&str> = ModelType::ALL.iter().map(|t| t.label()).collect();
        let mut select = Select::with_theme(&theme)
            .with_prompt(format!("{} - {}", mode.title(), FormField::ModelType.label()))
            .items(&labels);
        if let Some(current) = self.model_type {
            if let Some(idx) = ModelType::ALL.iter().position(|t| *t == current) {
                select = select.default(idx);
            }
        }
        self.model_type = Some(ModelType::ALL[select.interact()?]);

        self.historical_data_path = prompt_text(
            &theme,
            FormField::HistoricalDataPath,
            &self.historical_data_path,
            "/path/to/historical/data.csv",
        )?;
        self.input_parameters = prompt_text(
            &theme,
            FormField::InputParameters,
            &self.input_parameters,
            PARAMETERS_PLACEHOLDER,
        )?;
        self.workflow_diagram = prompt_text(
            &theme,
            FormField::WorkflowDiagram,
            &self.workflow_diagram,
            WORKFLOW_PLACEHOLDER,
        )?;

        Ok(())
    }
}

fn prompt_text(theme: &ColorfulTheme, field: FormField, current: &str, placeholder: &str) -> Result<String> {
    let initial = if current.is_empty() { placeholder } else { current };
    let value: String = Input::with_theme(theme)
        .with_prompt(field.label())
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}
