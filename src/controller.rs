//! CRUD state controller for the module page
//!
//! The controller owns the page's module collection and reconciles it with the
//! outcome of each gateway call. Failures never escape: they become the single
//! displayed error message, and the collection is left as it was.
//!
//! Every operation borrows the controller mutably for the whole round trip, so
//! operations on one controller run one at a time and a response can never
//! land on a controller that has already been dropped.

use mlmod_protocol::api::{CreateModuleRequest, UpdateModuleRequest};
use mlmod_protocol::common::MachineLearningModule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::collection::ModuleCollection;
use crate::error::{MlmodError, Result};
use crate::gateway::ModuleGateway;

/// Remote operation the controller performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Message shown when a failure carries no message of its own
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch modules",
            Operation::Create => "Failed to create module",
            Operation::Update => "Failed to update module",
            Operation::Delete => "Failed to delete module",
        }
    }
}

/// What happens to a displayed error when a later operation succeeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorRetention {
    /// Any successful operation clears the error
    #[default]
    ClearOnSuccess,
    /// The error stays until another failure replaces it
    Sticky,
}

impl fmt::Display for ErrorRetention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorRetention::ClearOnSuccess => f.write_str("clear-on-success"),
            ErrorRetention::Sticky => f.write_str("sticky"),
        }
    }
}

impl FromStr for ErrorRetention {
    type Err = MlmodError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" | "clear-on-success" => Ok(ErrorRetention::ClearOnSuccess),
            "sticky" => Ok(ErrorRetention::Sticky),
            other => Err(MlmodError::invalid_input(format!(
                "Expected clear-on-success or sticky, got '{}'",
                other
            ))),
        }
    }
}

/// Snapshot of what the page should show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageView<'a> {
    /// Initial load still pending
    Loading,
    /// Initial load failed; the error replaces the whole page
    Failed(&'a str),
    Ready {
        modules: &'a [MachineLearningModule],
        editing: Option<&'a MachineLearningModule>,
        error: Option<&'a str>,
    },
}

pub struct ModuleController<G> {
    gateway: G,
    modules: ModuleCollection,
    loading: bool,
    mounted: bool,
    load_failed: bool,
    error: Option<String>,
    editing: Option<MachineLearningModule>,
    retention: ErrorRetention,
}

impl<G: ModuleGateway> ModuleController<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            modules: ModuleCollection::new(),
            loading: true,
            mounted: false,
            load_failed: false,
            error: None,
            editing: None,
            retention: ErrorRetention::default(),
        }
    }

    pub fn with_error_retention(mut self, retention: ErrorRetention) -> Self {
        self.retention = retention;
        self
    }

    /// Run the initial load
    ///
    /// Only the first call reaches the gateway. Returns whether the collection
    /// holds a successful listing.
    pub async fn mount(&mut self) -> bool {
        if self.mounted {
            return !self.load_failed;
        }
        self.mounted = true;

        let result = self.gateway.list().await;
        self.loading = false;

        match result {
            Ok(modules) => {
                tracing::debug!("Loaded {} modules", modules.len());
                self.modules.replace_all(modules);
                self.succeeded();
                true
            }
            Err(e) => {
                self.load_failed = true;
                self.failed(Operation::Fetch, e);
                false
            }
        }
    }

    /// Create a module and append the server's record
    pub async fn create(&mut self, payload: CreateModuleRequest) -> bool {
        match self.gateway.create(&payload).await {
            Ok(module) => {
                tracing::debug!("Created module {}", module.id);
                self.modules.append(module);
                self.editing = None;
                self.succeeded();
                true
            }
            Err(e) => {
                self.failed(Operation::Create, e);
                false
            }
        }
    }

    /// Update a module and swap the server's record in at the same position
    pub async fn update(&mut self, payload: UpdateModuleRequest) -> bool {
        match self.gateway.update(&payload).await {
            Ok(module) => {
                let replaced = self.modules.replace_by_id(&module);
                tracing::debug!("Updated module {} ({} local copies)", module.id, replaced);
                self.editing = None;
                self.succeeded();
                true
            }
            Err(e) => {
                self.failed(Operation::Update, e);
                false
            }
        }
    }

    /// Delete a module and drop it from the collection
    pub async fn delete(&mut self, id: &str) -> bool {
        match self.gateway.delete(id).await {
            Ok(()) => {
                let removed = self.modules.remove_by_id(id);
                tracing::debug!("Deleted module {} ({} local copies)", id, removed);
                self.succeeded();
                true
            }
            Err(e) => {
                self.failed(Operation::Delete, e);
                false
            }
        }
    }

    /// Form submit handler: updates the module being edited, otherwise creates
    pub async fn submit(&mut self, submission: CreateModuleRequest) -> bool {
        match self.editing.as_ref().map(|m| m.id.clone()) {
            Some(id) => self.update(submission.with_id(id)).await,
            None => self.create(submission).await,
        }
    }

    pub fn select_for_edit(&mut self, module: MachineLearningModule) {
        self.editing = Some(module);
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn view(&self) -> PageView<'_> {
        if self.loading {
            return PageView::Loading;
        }
        if self.load_failed {
            let message = self
                .error
                .as_deref()
                .unwrap_or(Operation::Fetch.fallback_message());
            return PageView::Failed(message);
        }
        PageView::Ready {
            modules: self.modules.as_slice(),
            editing: self.editing.as_ref(),
            error: self.error.as_deref(),
        }
    }

    pub fn modules(&self) -> &ModuleCollection {
        &self.modules
    }

    pub fn editing(&self) -> Option<&MachineLearningModule> {
        self.editing.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn succeeded(&mut self) {
        if self.retention == ErrorRetention::ClearOnSuccess {
            self.error = None;
        }
    }

    fn failed(&mut self, operation: Operation, err: MlmodError) {
        tracing::warn!("{:?} failed: {}", operation, err);
        let message = err
            .message()
            .unwrap_or(operation.fallback_message())
            .to_string();
        self.error = Some(message);
    }
}
