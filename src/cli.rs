use clap::{Args, Parser, Subcommand};
use mlmod_protocol::common::ModelType;
use std::path::PathBuf;

use crate::config::{CliConfig, ConfigService};
use crate::controller::ModuleController;
use crate::error::Result;
use crate::form::FormInput;
use crate::gateway::HttpModuleGateway;
use crate::page::ModulePage;
use crate::version::CURRENT_VERSION;

#[derive(Parser)]
#[command(
    name = "mlmod",
    about = "Manage machine learning modules over the REST API",
    long_about = "mlmod - Machine learning module manager

OVERVIEW:
  Lists, creates, updates and deletes machine learning module records held by a
  remote REST API. Training and inference happen on the server.

QUICK START:
  mlmod config set-endpoint http://localhost:8080
  mlmod list                                    # Show every module
  mlmod create -t random_forest -d data.csv \\
      -p '{\"soil_ph\": 6.5}' -w 'graph TD; A --> B'
  mlmod update <ID> -d new_data.csv             # Change one field
  mlmod delete <ID>                             # Remove a module
  mlmod interactive                             # Menu-driven session",
    version = CURRENT_VERSION,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all modules
    #[command(aliases = &["ls"])]
    List,

    /// Create a module; prompts for the fields when no flag is given
    Create(ModuleArgs),

    /// Update a module; unspecified fields keep their current value
    Update {
        id: String,

        #[command(flatten)]
        fields: ModuleArgs,
    },

    /// Delete a module
    #[command(aliases = &["rm"])]
    Delete {
        id: String,

        #[arg(short, long)]
        force: bool,
    },

    /// Menu-driven session on a single page
    #[command(aliases = &["ui"])]
    Interactive,

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ModuleArgs {
    /// random_forest, neural_network, gradient_boosting or linear_regression
    #[arg(short = 't', long)]
    pub model_type: Option<ModelType>,

    #[arg(short = 'd', long = "data-path")]
    pub data_path: Option<String>,

    /// Input parameters, usually a JSON object
    #[arg(short = 'p', long)]
    pub params: Option<String>,

    /// Workflow as a Mermaid diagram
    #[arg(short = 'w', long)]
    pub workflow: Option<String>,
}

impl From<ModuleArgs> for FormInput {
    fn from(args: ModuleArgs) -> Self {
        FormInput {
            model_type: args.model_type,
            historical_data_path: args.data_path,
            input_parameters: args.params,
            workflow_diagram: args.workflow,
        }
    }
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetEndpoint { url: String },
    SetTimeout { seconds: u64 },
    SetVerbose { enabled: String },
    /// clear-on-success or sticky
    SetErrorRetention { mode: String },
    Reset,
}

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: Option<PathBuf>,
    config: CliConfig,
}

impl CliHandler {
    /// Create a handler, loading the persisted settings
    pub async fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = CliConfig::load(config_path.as_deref()).await?;
        Ok(Self {
            config_path,
            config,
        })
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::List => self.page()?.list().await,
            Commands::Create(args) => self.page()?.create(args.into()).await,
            Commands::Update { id, fields } => self.page()?.update(&id, fields.into()).await,
            Commands::Delete { id, force } => self.page()?.delete(&id, force).await,
            Commands::Interactive => self.page()?.interactive().await,
            Commands::Config(args) => self.handle_config(args).await,
        }
    }

    /// Build a fresh page against the configured endpoint
    fn page(&self) -> Result<ModulePage<HttpModuleGateway>> {
        let client_config = self.config.to_client_config()?;
        tracing::debug!("Using endpoint {}", client_config.base_url);
        let gateway = HttpModuleGateway::new(client_config)?;
        let controller =
            ModuleController::new(gateway).with_error_retention(self.config.error_retention);
        Ok(ModulePage::new(controller))
    }

    /// Handle config command
    async fn handle_config(&mut self, args: ConfigArgs) -> Result<()> {
        let mut service = match self.config_path.clone() {
            Some(path) => ConfigService::with_config_path(self.config.clone(), path),
            None => ConfigService::new(self.config.clone()),
        };
        service.handle_config(args.command).await?;
        self.config = service.config().clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ErrorRetention;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_flags() {
        let cli = Cli::try_parse_from([
            "mlmod",
            "create",
            "--model-type",
            "Neural Network",
            "--data-path",
            "/data/history.csv",
            "-p",
            "{}",
            "-w",
            "graph TD; A --> B",
        ])
        .unwrap();

        match cli.command {
            Commands::Create(args) => {
                let input = FormInput::from(args);
                assert_eq!(input.model_type, Some(ModelType::NeuralNetwork));
                assert_eq!(input.historical_data_path.as_deref(), Some("/data/history.csv"));
                assert_eq!(input.input_parameters.as_deref(), Some("{}"));
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_model_type() {
        assert!(Cli::try_parse_from(["mlmod", "create", "-t", "svm"]).is_err());
    }

    #[test]
    fn test_parse_aliases_and_globals() {
        let cli = Cli::try_parse_from(["mlmod", "rm", "42", "--force", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Delete { ref id, force: true } if id == "42"
        ));

        let cli = Cli::try_parse_from(["mlmod", "update", "7", "-d", "/data/new.csv"]).unwrap();
        match cli.command {
            Commands::Update { id, fields } => {
                assert_eq!(id, "7");
                assert!(fields.model_type.is_none());
                assert_eq!(fields.data_path.as_deref(), Some("/data/new.csv"));
            }
            _ => panic!("expected update"),
        }
    }

    #[tokio::test]
    async fn test_handler_config_command_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut handler = CliHandler::new(Some(path.clone())).await.unwrap();

        handler
            .execute(Commands::Config(ConfigArgs {
                command: ConfigCommand::SetTimeout { seconds: 5 },
            }))
            .await
            .unwrap();

        assert_eq!(handler.config().timeout, 5);
        let reloaded = CliConfig::load(Some(&path)).await.unwrap();
        assert_eq!(reloaded.timeout, 5);
    }

    #[tokio::test]
    async fn test_handler_sets_error_retention() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut handler = CliHandler::new(Some(path.clone())).await.unwrap();

        let cli = Cli::try_parse_from(["mlmod", "config", "set-error-retention", "sticky"]).unwrap();
        handler.execute(cli.command).await.unwrap();

        assert_eq!(handler.config().error_retention, ErrorRetention::Sticky);
        let reloaded = CliConfig::load(Some(&path)).await.unwrap();
        assert_eq!(reloaded.error_retention, ErrorRetention::Sticky);
    }
}
