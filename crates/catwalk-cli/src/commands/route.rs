//! `catwalk route`: where an action request is dispatched, and how a hook
//! response would be forwarded.

use serde::Serialize;
use serde_json::Value;

use catwalk_core::domain::{ActionOutcome, ActionTarget};

use super::workspace::{Workspace, read_json};
use crate::{
    cli::{GlobalArgs, RouteArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteReport {
    namespace: String,
    action: String,
    #[serde(flatten)]
    target: ActionTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<ResponseReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseReport {
    outcome: &'static str,
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    extension_error: Option<&'static str>,
    body: Value,
}

impl From<ActionOutcome> for ResponseReport {
    fn from(outcome: ActionOutcome) -> Self {
        let status_code = outcome.status_code();
        let extension_error = outcome.extension_error().map(|(_, note)| note);
        let (label, body) = match outcome {
            ActionOutcome::Failed { body } => ("failed", body),
            ActionOutcome::Malformed { body } => ("malformed", body),
            ActionOutcome::Forward { body, .. } => ("forward", Value::String(body)),
        };
        Self {
            outcome: label,
            status_code,
            extension_error,
            body,
        }
    }
}

pub fn execute(
    args: RouteArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    if args.namespace.trim().is_empty() || args.action.trim().is_empty() {
        return Err(CliError::InvalidInput {
            message: "namespace and action must not be empty".into(),
            source: None,
        });
    }

    let table = Workspace::open(&config, global.config.as_deref())?.action_table()?;
    let target = table.route(&args.namespace, &args.action);

    let response = args
        .response
        .as_deref()
        .map(read_json::<Value>)
        .transpose()?
        .map(|value| ResponseReport::from(ActionOutcome::classify(&value)));

    let report = RouteReport {
        namespace: args.namespace,
        action: args.action,
        target,
        response,
    };

    if output.is_json() {
        output.document(&report)?;
        return Ok(());
    }

    output.print(&format!(
        "{}/{} -> {}",
        report.namespace, report.action, report.target
    ))?;
    if let Some(response) = &report.response {
        let line = format!("{} (status {})", response.outcome, response.status_code);
        if response.outcome == "failed" {
            output.failure(&line)?;
        } else {
            output.success(&line)?;
        }
        if let Some(note) = response.extension_error {
            output.warning(note)?;
        }
    }

    Ok(())
}
