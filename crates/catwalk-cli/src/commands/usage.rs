//! `catwalk usage`: which streams a page uses and with what limit.

use serde::Serialize;

use catwalk_core::domain::{Node, Page, ParameterMap, UsedStream};

use super::workspace::{Workspace, read_json};
use crate::{
    cli::{GlobalArgs, UsageArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// One row of the usage report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UsageRow {
    stream_id: String,
    #[serde(rename = "type")]
    stream_type: Option<String>,
    /// `null` when unbounded.
    limit: Option<u64>,
    tastics: Vec<String>,
}

impl From<UsedStream> for UsageRow {
    fn from(used: UsedStream) -> Self {
        Self {
            stream_id: used.stream.stream_id,
            stream_type: used.stream.stream_type,
            limit: used.usage.limit.as_bounded(),
            tastics: used.usage.tastics,
        }
    }
}

pub fn execute(
    args: UsageArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let node: Node = read_json(&args.node)?;
    let page: Page = read_json(&args.page)?;

    let workspace = Workspace::open(&config, global.config.as_deref())?;
    let mut parameters = ParameterMap::new();
    let rows: Vec<UsageRow> = workspace
        .stream_service()?
        .get_used_streams(&node, &page, &mut parameters)
        .with_cli_context(|| "analysing stream usage")?
        .into_iter()
        .map(UsageRow::from)
        .collect();

    if output.is_json() {
        output.document(&rows)?;
        return Ok(());
    }

    if rows.is_empty() {
        output.warning(&format!("Page '{}' uses none of the node's streams", page.page_id))?;
        return Ok(());
    }

    output.header(&format!("Streams used on page '{}':", page.page_id))?;
    for row in &rows {
        let limit = row
            .limit
            .map_or_else(|| "unbounded".to_string(), |limit| limit.to_string());
        output.print(&format!(
            "  {} {} limit={} {}",
            row.stream_id,
            output.dim(&format!("({})", row.stream_type.as_deref().unwrap_or("untyped"))),
            limit,
            output.dim(&format!("used by {}", row.tastics.join(", "))),
        ))?;
    }

    Ok(())
}
