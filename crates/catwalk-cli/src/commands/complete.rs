//! `catwalk complete`: complete tastic configuration of a page.

use serde::Serialize;
use tracing::instrument;

use catwalk_core::domain::{Node, Page};

use super::workspace::{Workspace, load_context, read_field_data, read_json};
use crate::{
    cli::{CompleteArgs, GlobalArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Printed when a node was given alongside the page.
#[derive(Serialize)]
struct Completed<'a> {
    node: &'a Node,
    page: &'a Page,
}

#[instrument(skip_all, fields(page = %args.page.display()))]
pub fn execute(
    args: CompleteArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut page: Page = read_json(&args.page)?;
    let node: Option<Node> = args.node.as_deref().map(read_json).transpose()?;
    let field_data = read_field_data(args.field_data.as_deref())?;
    let context = load_context(&args.context, &config)?;

    let workspace = Workspace::open(&config, global.config.as_deref())?;
    let service = workspace.completion_service();

    match node {
        Some(mut node) => {
            service.complete_node_data(&mut node, &context);
            service
                .complete_page_data(&mut page, &node, &context, &field_data)
                .with_cli_context(|| "completing page data")?;
            output.document(&Completed {
                node: &node,
                page: &page,
            })?;
        }
        None => {
            service
                .complete_page_data(&mut page, &Node::default(), &context, &field_data)
                .with_cli_context(|| "completing page data")?;
            output.document(&page)?;
        }
    }

    Ok(())
}
