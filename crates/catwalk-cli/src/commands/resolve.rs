//! `catwalk resolve`: resolve the streams of a node.

use catwalk_core::domain::{Node, Page, ParameterMap};
use tracing::{info, instrument};

use super::workspace::{Workspace, load_context, read_json, read_json_or_default};
use crate::{
    cli::{GlobalArgs, ResolveArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(node = %args.node.display()))]
pub async fn execute(
    args: ResolveArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let node: Node = read_json(&args.node)?;
    let page: Option<Page> = args.page.as_deref().map(read_json).transpose()?;
    let parameters: ParameterMap = read_json_or_default(args.parameters.as_deref())?;
    let context = load_context(&args.context, &config)?;

    let workspace = Workspace::open(&config, global.config.as_deref())?.with_debug(args.debug);
    let service = workspace.stream_service()?;

    let data = service
        .get_stream_data(&node, &context, parameters, page.as_ref())
        .await
        .with_cli_context(|| "resolving streams")?;

    info!(streams = data.len(), "Streams resolved");
    output.document(&data)?;
    Ok(())
}
