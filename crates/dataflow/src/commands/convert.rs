//! `dataflow convert` command implementation.
//!
//! Runs the diagram translator locally; no request is sent.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use dataflow_erd::{DocumentModel, ResponseShape, classify, normalize, parse, serialize};
use tracing::debug;

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Output form of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Target {
    /// Mermaid `erDiagram` text.
    Diagram,
    /// JSON document with `entities` and `relationships`.
    Json,
}

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// erDiagram text or JSON document (`-` reads stdin).
    input: PathBuf,

    /// Output form.
    #[arg(long, value_enum)]
    to: Target,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or is not an ER document.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let text = normalize(&read_input(&self.input)?);
        let converted = convert(&text, self.to)?;
        output.artifact(&converted)?;
        Ok(())
    }
}

/// Translate normalized input into the requested form.
fn convert(text: &str, target: Target) -> Result<String, CliError> {
    let model = match classify(text) {
        ResponseShape::Json => DocumentModel::from_json(text)?,
        ResponseShape::Diagram => parse(text),
        ResponseShape::Other => {
            return Err(CliError::Validation(
                "input is neither an erDiagram nor a JSON document".to_owned(),
            ));
        }
    };
    debug!(
        "Loaded {} entities and {} relationships",
        model.entities.len(),
        model.relationships.len()
    );

    match target {
        Target::Diagram => Ok(serialize(&model)),
        Target::Json => Ok(model.to_json()?),
    }
}
