//! Stream usage analysis.
//!
//! Walks a page's region → cell → tastic tree against the tastics'
//! configuration schemas to find out which of the node's streams are
//! actually consumed, and how many results each consumer needs.
//!
//! # Limit policy
//!
//! Each reference to a stream yields one [`Limit`]: the maximum of the count
//! properties configured next to the stream field, or `Unbounded` when none is
//! configured. References are merged with [`Limit::merge`], so a single
//! unbounded consumer makes the whole stream unbounded and otherwise the
//! largest count wins.
//!
//! The analysis is a pure function of its inputs.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

use crate::domain::{
    entities::{
        node::{Node, Parameters, Stream},
        page::{Configuration, Page},
        schema::{FieldDefinition, TasticMap},
    },
    value_objects::Limit,
};

/// Parameters per stream id, extending each stream's configuration.
pub type ParameterMap = HashMap<String, Parameters>;

/// Name of the parameter carrying the computed result limit.
pub const LIMIT_PARAMETER: &str = "limit";

/// Count properties recognised per stream type.
///
/// Tastics declare their result count in ordinary configuration fields; this
/// table names the fields that are known to hold one.
pub const COUNT_PROPERTIES: &[(&str, &[&str])] = &[("product-list", &["productCount", "maxItems"])];

/// How one stream is used on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUsage {
    pub limit: Limit,
    /// Ids of the tastic instances referencing the stream, in layout order.
    pub tastics: Vec<String>,
}

/// Stream id → usage.
pub type UsageMap = HashMap<String, StreamUsage>;

/// A declared stream that the page uses.
#[derive(Debug, Clone, PartialEq)]
pub struct UsedStream {
    pub stream: Stream,
    pub usage: StreamUsage,
}

/// Discovers stream usage from tastic configurations.
#[derive(Debug, Clone)]
pub struct UsageAnalyzer {
    count_properties: HashMap<String, Vec<String>>,
}

impl Default for UsageAnalyzer {
    fn default() -> Self {
        let count_properties = COUNT_PROPERTIES
            .iter()
            .map(|(stream_type, fields)| {
                (
                    stream_type.to_string(),
                    fields.iter().map(|f| f.to_string()).collect(),
                )
            })
            .collect();
        Self { count_properties }
    }
}

impl UsageAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional count property for a stream type.
    pub fn with_count_property(
        mut self,
        stream_type: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        self.count_properties
            .entry(stream_type.into())
            .or_default()
            .push(field.into());
        self
    }

    /// Count properties known for `stream_type`.
    pub fn count_properties(&self, stream_type: &str) -> &[String] {
        self.count_properties
            .get(stream_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Build the usage map for every stream referenced on `page`.
    ///
    /// Tastic instances whose type has no definition in `tastics` are skipped.
    pub fn analyze(&self, page: &Page, tastics: &TasticMap) -> UsageMap {
        let mut usage = UsageMap::new();

        for tastic in page.tastics() {
            let Some(definition) = tastics.get(&tastic.tastic_type) else {
                debug!(
                    tastic_id = %tastic.tastic_id,
                    tastic_type = %tastic.tastic_type,
                    "No definition for tastic type, skipping usage analysis"
                );
                continue;
            };

            self.find_usage(
                definition.configuration_schema.fields(),
                &tastic.configuration,
                &tastic.tastic_id,
                &mut usage,
            );
        }

        usage
    }

    /// Filter the node's streams to those used on `page`.
    ///
    /// Streams keep the node's declaration order; duplicate stream ids are
    /// resolved once. For every bounded stream the limit is written into
    /// `parameter_map` as the `limit` parameter.
    pub fn used_streams(
        &self,
        node: &Node,
        page: &Page,
        tastics: &TasticMap,
        parameter_map: &mut ParameterMap,
    ) -> Vec<UsedStream> {
        let mut usage = self.analyze(page, tastics);

        let mut used = Vec::new();
        for stream in node.unique_streams() {
            let Some(stream_usage) = usage.remove(&stream.stream_id) else {
                trace!(stream_id = %stream.stream_id, "Stream not referenced on page");
                continue;
            };

            if let Limit::Bounded(limit) = stream_usage.limit {
                parameter_map
                    .entry(stream.stream_id.clone())
                    .or_default()
                    .insert(LIMIT_PARAMETER.to_string(), Value::from(limit));
            }

            used.push(UsedStream {
                stream: stream.clone(),
                usage: stream_usage,
            });
        }

        for stream_id in usage.keys() {
            debug!(%stream_id, "Referenced stream is not declared on node, skipping");
        }

        used
    }

    fn find_usage<'a>(
        &self,
        fields: impl IntoIterator<Item = &'a FieldDefinition>,
        configuration: &Configuration,
        tastic_id: &str,
        usage: &mut UsageMap,
    ) {
        for field in fields {
            let Some(value) = configuration.get(&field.field) else {
                continue;
            };

            if field.kind.is_stream() {
                if let Some(stream_id) = stream_reference(value) {
                    let limit = self.reference_limit(field, configuration);
                    record(usage, stream_id, limit, tastic_id);
                }
            }

            if field.kind.is_group() {
                let Value::Array(elements) = value else {
                    continue;
                };
                for element in elements.iter().filter_map(Value::as_object) {
                    self.find_usage(&field.fields, element, tastic_id, usage);
                }
            }
        }
    }

    /// Limit requested by a single stream field.
    fn reference_limit(&self, field: &FieldDefinition, configuration: &Configuration) -> Limit {
        let stream_type = field.stream_type.as_deref().unwrap_or_default();

        self.count_properties(stream_type)
            .iter()
            .filter_map(|name| configuration.get(name))
            .filter_map(Limit::from_count_value)
            .max()
            .map_or(Limit::Unbounded, Limit::Bounded)
    }
}

/// Stream id held by a stream field, if it is set.
fn stream_reference(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn record(usage: &mut UsageMap, stream_id: String, limit: Limit, tastic_id: &str) {
    match usage.get_mut(&stream_id) {
        Some(existing) => {
            existing.limit = existing.limit.merge(limit);
            if !existing.tastics.iter().any(|t| t == tastic_id) {
                existing.tastics.push(tastic_id.to_string());
            }
        }
        None => {
            usage.insert(
                stream_id,
                StreamUsage {
                    limit,
                    tastics: vec![tastic_id.to_string()],
                },
            );
        }
    }
}
