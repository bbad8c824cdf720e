//! Command implementations

mod calculate;
mod catalog;
mod config;
mod doctor;
mod draft;
mod load;
mod render;
mod wait;

use crate::cli::{Cli, Commands};
use crate::config::load_config;
use crate::errors;
use crate::output::OutputWriter;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use uvalue_client::ApiClient;
use uvalue_core::config::{CliConfigOverrides, LayeredConfig};
use uvalue_core::draft::FileDraftStore;
use uvalue_core::UvalueError;
use uvalue_session::DesignController;

/// Resolved configuration and the local draft slot shared by all commands
pub struct CommandEnv {
    pub config: LayeredConfig,
    pub draft_path: PathBuf,
}

impl CommandEnv {
    pub fn drafts(&self) -> Arc<FileDraftStore> {
        Arc::new(FileDraftStore::new(self.draft_path.clone()))
    }

    /// Controller seeded from the local draft
    pub fn controller(&self) -> DesignController {
        DesignController::restore(self.drafts())
    }

    pub fn client(&self) -> Result<ApiClient> {
        self.config.validate().map_err(|e| self.explain(e))?;
        ApiClient::from_config(&self.config).map_err(|e| self.explain(e))
    }

    /// Attach remediation hints to a library error
    pub fn explain(&self, error: UvalueError) -> anyhow::Error {
        anyhow::Error::new(errors::from_uvalue(&error, &self.config.api_base()))
    }
}

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let overrides = CliConfigOverrides {
        api_base: cli.api_base.clone(),
        ..Default::default()
    };
    let env = CommandEnv {
        config: load_config(cli.config.as_deref(), overrides)?,
        draft_path: cli.draft.clone(),
    };

    match cli.command {
        Commands::Wait(args) => wait::execute(args, env, &output).await,
        Commands::Materials => catalog::materials(&env, &output).await,
        Commands::Cities => catalog::cities(&env, &output).await,
        Commands::Films => catalog::films(&env, &output).await,
        Commands::Draft(args) => draft::execute(args, &env, &output),
        Commands::Calculate(args) => calculate::execute(args, &env, &output).await,
        Commands::Load(args) => load::execute(args, &env, &output).await,
        Commands::Doctor(args) => doctor::execute(args, &env, &output).await,
        Commands::Config => config::execute(&env, &output),
    }
}
