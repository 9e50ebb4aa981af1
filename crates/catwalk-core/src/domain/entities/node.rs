//! Nodes and the streams they declare.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::page::Configuration;
use crate::domain::error::DomainError;

/// Extra parameters for one stream, extending its own configuration.
pub type Parameters = serde_json::Map<String, Value>;

/// The page-adjacent container declaring which streams exist for a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub node_id: String,
    #[serde(default)]
    pub streams: Vec<Stream>,
    /// Custom node data, completed like tastic configuration.
    #[serde(default)]
    pub configuration: Configuration,
}

/// A named, typed data source bound to a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub stream_id: String,
    /// Dispatch key into the stream handler registry.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub configuration: Configuration,
    /// Ids of tastic instances declared as consumers of this stream.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tastics: Vec<String>,
}

impl Node {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            streams: Vec::new(),
            configuration: Configuration::new(),
        }
    }

    pub fn with_stream(mut self, stream: Stream) -> Self {
        self.streams.push(stream);
        self
    }

    pub fn stream(&self, stream_id: &str) -> Option<&Stream> {
        self.streams.iter().find(|s| s.stream_id == stream_id)
    }

    /// Declared streams with duplicate ids removed (first declaration wins).
    pub fn unique_streams(&self) -> Vec<&Stream> {
        let mut seen = HashSet::new();
        self.streams
            .iter()
            .filter(|s| seen.insert(s.stream_id.as_str()))
            .collect()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for stream in &self.streams {
            if stream.stream_id.trim().is_empty() {
                return Err(DomainError::InvalidNode {
                    node_id: self.node_id.clone(),
                    reason: "stream with empty streamId".into(),
                });
            }
            if !seen.insert(stream.stream_id.as_str()) {
                return Err(DomainError::InvalidNode {
                    node_id: self.node_id.clone(),
                    reason: format!("duplicate streamId '{}'", stream.stream_id),
                });
            }
        }
        Ok(())
    }
}

impl Stream {
    pub fn new(stream_id: impl Into<String>, stream_type: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            stream_type: Some(stream_type.into()),
            name: String::new(),
            configuration: Configuration::new(),
            tastics: Vec::new(),
        }
    }

    /// A stream without a type; resolving it always fails.
    pub fn untyped(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            ..Self::default()
        }
    }

    pub fn with_configuration(mut self, key: impl Into<String>, value: Value) -> Self {
        self.configuration.insert(key.into(), value);
        self
    }

    /// The dispatch key, treating an empty string like a missing type.
    pub fn dispatch_type(&self) -> Option<&str> {
        self.stream_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Copy of this stream whose configuration is extended by `parameters`.
    ///
    /// Parameters take precedence over the stream's own configuration.
    pub fn with_parameters(&self, parameters: &Parameters) -> Stream {
        let mut stream = self.clone();
        for (key, value) in parameters {
            stream.configuration.insert(key.clone(), value.clone());
        }
        stream
    }
}
