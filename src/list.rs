//! Module table
//!
//! Renders modules in the order given and turns row actions into events. No
//! filtering, sorting or paging happens here.

use mlmod_protocol::common::MachineLearningModule;
use owo_colors::OwoColorize;

use crate::ui::UI;

const HEADERS: [&str; 6] = ["Id", "Name", "Model Type", "Data Path", "Status", "Updated"];

/// Coloring class of a module status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Trained,
    InProgress,
    Other,
}

impl StatusClass {
    pub fn classify(status: Option<&str>) -> Self {
        match status.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("trained") => StatusClass::Trained,
            Some("training") => StatusClass::InProgress,
            _ => StatusClass::Other,
        }
    }

    fn paint(&self, text: &str) -> String {
        match self {
            StatusClass::Trained => text.green().to_string(),
            StatusClass::InProgress => text.yellow().to_string(),
            StatusClass::Other => text.red().to_string(),
        }
    }
}

/// Row action raised by the table
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Edit(MachineLearningModule),
    Delete(String),
}

pub struct ModuleList<'a> {
    modules: &'a [MachineLearningModule],
}

impl<'a> ModuleList<'a> {
    pub fn new(modules: &'a [MachineLearningModule]) -> Self {
        Self { modules }
    }

    pub fn rows(&self, colored: bool) -> Vec<Vec<String>> {
        self.modules
            .iter()
            .map(|module| {
                let status = module.status.as_deref().unwrap_or("-");
                let class = StatusClass::classify(module.status.as_deref());
                vec![
                    module.id.clone(),
                    module.display_name().to_string(),
                    module.model_type.clone(),
                    module.historical_data_path.clone(),
                    if colored {
                        class.paint(status)
                    } else {
                        status.to_string()
                    },
                    module
                        .updated_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect()
    }

    pub fn render(&self, ui: &UI) {
        if self.modules.is_empty() {
            ui.info("No machine learning modules yet");
            return;
        }
        ui.table(&HEADERS, &self.rows(ui.supports_color()));
    }

    /// One-line label per row, used when picking a row interactively
    pub fn choices(&self) -> Vec<String> {
        self.modules
            .iter()
            .map(|m| format!("{} ({}, {})", m.display_name(), m.model_type, m.id))
            .collect()
    }

    /// Edit event for the row with `id`
    pub fn edit(&self, id: &str) -> Option<ListEvent> {
        self.find(id).map(|m| ListEvent::Edit(m.clone()))
    }

    /// Delete event for the row with `id`
    pub fn delete(&self, id: &str) -> Option<ListEvent> {
        self.find(id).map(|m| ListEvent::Delete(m.id.clone()))
    }

    /// Event for the row at `index` in display order
    pub fn edit_at(&self, index: usize) -> Option<ListEvent> {
        self.modules.get(index).map(|m| ListEvent::Edit(m.clone()))
    }

    pub fn delete_at(&self, index: usize) -> Option<ListEvent> {
        self.modules.get(index).map(|m| ListEvent::Delete(m.id.clone()))
    }

    fn find(&self, id: &str) -> Option<&MachineLearningModule> {
        self.modules.iter().find(|m| m.id == id)
    }
}
