//! `dataflow generate` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dataflow_config::{CliSettings, Config, GeminiConfig, TuningConfig};
use dataflow_gemini::{
    CredentialPool, GeminiClient, GenerationConfig, GenerationRequest, HttpTransport,
};
use tracing::info;

use super::read_input;
use crate::error::CliError;
use crate::output::Output;
use crate::prompts::Task;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Artifact to generate.
    #[arg(value_enum)]
    task: Task,

    /// File holding the system description (`-` reads stdin).
    input: PathBuf,

    /// API key; repeat or comma-separate for rotation (replaces configured keys).
    ///
    /// Without this flag keys come from `gemini.api_keys`, then `GEMINI_API_KEY`.
    #[arg(long = "api-key", value_delimiter = ',')]
    api_keys: Vec<String>,

    /// Model path segment, e.g. `models/gemini-1.5-pro` (overrides config).
    #[arg(long)]
    model: Option<String>,

    /// Attempt budget for quota, empty and malformed-JSON retries (overrides config).
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Fail instead of substituting a fallback when the output has the wrong shape.
    #[arg(long)]
    strict: bool,

    /// Path to configuration file (default: auto-discover dataflow.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, generation fails, or the
    /// output is rejected.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.load_config()?;
        let client = create_client(&config.gemini, credential_pool(&config)?);

        let description = read_input(&self.input)?;
        if description.trim().is_empty() {
            return Err(CliError::Validation("system description is empty".to_owned()));
        }

        info!(
            "Generating {:?} with {} ({} API keys)",
            self.task,
            config.gemini.model,
            client.pool().len()
        );
        let request = GenerationRequest::new(self.task.prompt(&description))
            .with_config(generation_config(config.gemini.tuning));
        let text = client.generate(&request)?;

        let artifact = self.task.accept(&text)?;
        if artifact.is_fallback() {
            if self.strict {
                return Err(CliError::Validation(format!(
                    "response is not a valid {} artifact",
                    task_label(self.task)
                )));
            }
            output.fallback(task_label(self.task));
        }

        output.artifact(artifact.text())?;
        if !artifact.is_fallback() {
            output.generated(task_label(self.task));
        }
        Ok(())
    }

    /// Load configuration with this command's overrides applied.
    fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            api_keys: (!self.api_keys.is_empty()).then(|| self.api_keys.clone()),
            model: self.model.clone(),
            max_attempts: self.max_attempts,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

fn credential_pool(config: &Config) -> Result<Arc<CredentialPool>, CliError> {
    Ok(Arc::new(CredentialPool::new(config.require_api_keys()?)?))
}

fn create_client(gemini: &GeminiConfig, pool: Arc<CredentialPool>) -> GeminiClient {
    let transport = HttpTransport::new(&gemini.base_url)
        .api_version(&gemini.api_version)
        .model(&gemini.model)
        .timeout(gemini.timeout());
    GeminiClient::new(transport, pool).max_attempts(gemini.max_attempts)
}

fn generation_config(tuning: TuningConfig) -> GenerationConfig {
    GenerationConfig {
        temperature: tuning.temperature,
        top_p: tuning.top_p,
        top_k: tuning.top_k,
        max_output_tokens: tuning.max_output_tokens,
    }
}

fn task_label(task: Task) -> &'static str {
    match task {
        Task::ErDiagram => "ER diagram",
        Task::ErDocument => "ER document",
        Task::ApiDoc => "API documentation",
        Task::DfdDoc => "DFD documentation",
        Task::Dfd => "data flow diagram",
    }
}
