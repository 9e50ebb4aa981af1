//! `catwalk view`: complete a page and resolve the streams it uses.

use catwalk_core::domain::{Node, Page, ParameterMap};
use tracing::instrument;

use super::workspace::{Workspace, load_context, read_field_data, read_json, read_json_or_default};
use crate::{
    cli::{GlobalArgs, ViewArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(page = %args.page.display()))]
pub async fn execute(
    args: ViewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let node: Node = read_json(&args.node)?;
    let page: Page = read_json(&args.page)?;
    let field_data = read_field_data(args.field_data.as_deref())?;
    let parameters: ParameterMap = read_json_or_default(args.parameters.as_deref())?;
    let context = load_context(&args.context, &config)?;

    let workspace = Workspace::open(&config, global.config.as_deref())?.with_debug(args.debug);
    let view = workspace
        .page_view_service()?
        .build(node, page, &context, &field_data, parameters)
        .await
        .with_cli_context(|| "building page view")?;

    output.document(&view)?;
    Ok(())
}
