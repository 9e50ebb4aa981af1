//! `catwalk tastics`: list the loaded tastic definitions.

use serde::Serialize;

use catwalk_core::{application::ports::TasticDefinitionStore, domain::TasticDefinition};

use super::workspace::Workspace;
use crate::{
    cli::{GlobalArgs, TasticsArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TasticSummary<'a> {
    tastic_type: &'a str,
    name: &'a str,
    fields: usize,
    streams: Vec<&'a str>,
}

impl<'a> From<&'a TasticDefinition> for TasticSummary<'a> {
    fn from(definition: &'a TasticDefinition) -> Self {
        let streams = definition
            .configuration_schema
            .fields()
            .filter_map(|field| field.stream_type.as_deref())
            .collect();
        Self {
            tastic_type: &definition.tastic_type,
            name: &definition.name,
            fields: definition.configuration_schema.fields().count(),
            streams,
        }
    }
}

pub fn execute(
    args: TasticsArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let workspace = Workspace::open(&config, global.config.as_deref())?;
    let store = workspace.store();

    if let Some(tastic_type) = args.tastic_type {
        let definition = store
            .get(&tastic_type)
            .with_cli_context(|| format!("looking up tastic '{tastic_type}'"))?;
        output.document(&definition)?;
        return Ok(());
    }

    let definitions = store.list().with_cli_context(|| "listing tastics")?;
    let summaries: Vec<TasticSummary<'_>> = definitions.iter().map(TasticSummary::from).collect();

    if output.is_json() {
        output.document(&summaries)?;
        return Ok(());
    }

    if summaries.is_empty() {
        output.warning(&format!(
            "No tastic definitions found in {}",
            workspace.tastics_dir().display()
        ))?;
        return Ok(());
    }

    output.header("Tastic definitions:")?;
    for summary in &summaries {
        let streams = if summary.streams.is_empty() {
            String::new()
        } else {
            format!(" streams: {}", summary.streams.join(", "))
        };
        output.print(&format!(
            "  {} {} {}{}",
            summary.tastic_type,
            output.dim(&format!("\"{}\"", summary.name)),
            output.dim(&format!("{} fields", summary.fields)),
            streams,
        ))?;
    }

    Ok(())
}
