//! Action dispatch table.
//!
//! Actions are addressed by `(namespace, action)`. Each one is either routed
//! to an overriding controller, configured declaratively, or to the extension
//! hook named `action-<namespace>-<action>`. The table is built once from
//! configuration; routing never touches the filesystem.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::DomainError;

/// Declarative overrides: namespace → action → controller.
pub type ActionOverrides = BTreeMap<String, BTreeMap<String, String>>;

/// Header name used to flag malformed extension responses.
pub const EXTENSION_ERROR_HEADER: &str = "X-Extension-Error";

/// Where an action request goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "camelCase")]
pub enum ActionTarget {
    /// Forward to an overriding controller.
    Override { controller: String },
    /// Call the extension hook.
    Hook { name: String },
}

impl fmt::Display for ActionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override { controller } => write!(f, "override:{controller}"),
            Self::Hook { name } => write!(f, "hook:{name}"),
        }
    }
}

/// Routing table built once from [`ActionOverrides`].
#[derive(Debug, Clone, Default)]
pub struct ActionDispatchTable {
    overrides: HashMap<(String, String), String>,
}

impl ActionDispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table, rejecting empty controller names.
    pub fn from_overrides(overrides: &ActionOverrides) -> Result<Self, DomainError> {
        let mut table = Self::new();
        for (namespace, actions) in overrides {
            for (action, controller) in actions {
                if controller.trim().is_empty() {
                    return Err(DomainError::InvalidActionOverride {
                        namespace: namespace.clone(),
                        action: action.clone(),
                        reason: "empty controller name".into(),
                    });
                }
                table
                    .overrides
                    .insert((namespace.clone(), action.clone()), controller.clone());
            }
        }
        Ok(table)
    }

    pub fn route(&self, namespace: &str, action: &str) -> ActionTarget {
        match self
            .overrides
            .get(&(namespace.to_string(), action.to_string()))
        {
            Some(controller) => ActionTarget::Override {
                controller: controller.clone(),
            },
            None => ActionTarget::Hook {
                name: hook_name(namespace, action),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

pub fn hook_name(namespace: &str, action: &str) -> String {
    format!("action-{namespace}-{action}")
}

/// Interpretation of the value an action hook returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The hook signalled an error (`ok: false`).
    Failed { body: Value },
    /// The hook did not return `statusCode` and `body`; passed through as-is.
    Malformed { body: Value },
    /// A well-formed response.
    Forward { status_code: u16, body: String },
}

impl ActionOutcome {
    pub fn classify(response: &Value) -> Self {
        if response.get("ok").and_then(Value::as_bool) == Some(false) {
            return Self::Failed {
                body: response.clone(),
            };
        }

        let status_code = response
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok());
        let body = response.get("body").filter(|b| !b.is_null());

        match (status_code, body) {
            (Some(status_code), Some(body)) => Self::Forward {
                status_code,
                body: match body {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            },
            _ => Self::Malformed {
                body: response.clone(),
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Failed { .. } => 500,
            Self::Malformed { .. } => 200,
            Self::Forward { status_code, .. } => *status_code,
        }
    }

    /// Extra header to attach to the response, if any.
    pub fn extension_error(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Malformed { .. } => Some((
                EXTENSION_ERROR_HEADER,
                "Data returned from hook did not have statusCode or body fields",
            )),
            _ => None,
        }
    }
}
