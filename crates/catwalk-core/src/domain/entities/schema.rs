//! Tastic definitions and their configuration schema.
//!
//! A [`TasticDefinition`] declares the configurable fields of a tastic type.
//! The schema is an ordered list of groups, each holding ordered fields. A
//! field is either a stream reference, a repeatable group of nested fields or
//! a scalar.
//!
//! ```text
//! ConfigurationSchema
//! └── Vec<SchemaGroup>
//!      └── Vec<FieldDefinition>
//!           ├── stream  (streamType → usage analysis)
//!           ├── group   (fields → recursion per array element)
//!           └── scalar  (string, number, media, ...)
//! ```
//!
//! Walking is structural recursion over the schema; nesting is finite in
//! practice and not bounded explicitly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::page::Configuration;
use crate::domain::{error::DomainError, value_objects::FieldKind};

/// Computes the completed value of a single schema field.
///
/// Visitors are created per request (and per tastic instance) by a
/// `FieldVisitorFactory` and must not fail: a visitor that cannot complete a
/// value returns it unchanged.
pub trait FieldVisitor: Send + Sync {
    /// Return the completed value for `field`.
    ///
    /// `path` holds the field names and array indices leading to the field,
    /// excluding the field itself; it is empty for top-level fields.
    fn process_field(&self, field: &FieldDefinition, value: Value, path: &[String]) -> Value;
}

/// Tastic definitions keyed by tastic type, built once per request.
pub type TasticMap = HashMap<String, TasticDefinition>;

/// Definition of a tastic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasticDefinition {
    pub tastic_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub configuration_schema: ConfigurationSchema,
}

/// Declarative description of a tastic's configurable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSchema {
    #[serde(default)]
    pub schema: Vec<SchemaGroup>,
}

/// A named group of fields, as shown in the page editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// A single configurable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Stream type referenced by a `stream` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<String>,
    /// Nested fields of a `group` field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub translatable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl TasticDefinition {
    pub fn new(tastic_type: impl Into<String>, schema: ConfigurationSchema) -> Self {
        let tastic_type = tastic_type.into();
        Self {
            name: tastic_type.clone(),
            tastic_type,
            configuration_schema: schema,
        }
    }

    /// Validate the definition.
    ///
    /// Checks:
    /// - The tastic type is not empty
    /// - Field names are unique per nesting level (across groups)
    /// - Group fields declare nested fields
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.tastic_type.trim().is_empty() {
            return Err(DomainError::InvalidDefinition {
                tastic_type: self.tastic_type.clone(),
                reason: "tastic type must not be empty".into(),
            });
        }

        self.validate_fields(self.configuration_schema.fields())
    }

    fn validate_fields<'a>(
        &self,
        fields: impl IntoIterator<Item = &'a FieldDefinition>,
    ) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for field in fields {
            if !seen.insert(field.field.as_str()) {
                return Err(DomainError::DuplicateField {
                    tastic_type: self.tastic_type.clone(),
                    field: field.field.clone(),
                });
            }
            if field.kind.is_group() {
                if field.fields.is_empty() {
                    return Err(DomainError::InvalidDefinition {
                        tastic_type: self.tastic_type.clone(),
                        reason: format!("group field '{}' has no nested fields", field.field),
                    });
                }
                self.validate_fields(&field.fields)?;
            }
        }
        Ok(())
    }
}

impl ConfigurationSchema {
    pub fn new(groups: Vec<SchemaGroup>) -> Self {
        Self { schema: groups }
    }

    /// All top-level fields across groups, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.schema.iter().flat_map(|group| group.fields.iter())
    }

    /// Produce the completed values for `configuration`.
    ///
    /// The result holds exactly the schema's fields. Each value is the
    /// configured one, else the field default, else `null`, passed through
    /// `visitor`. Keys of `configuration` unknown to the schema are dropped.
    pub fn complete_values(
        &self,
        configuration: &Configuration,
        visitor: &dyn FieldVisitor,
    ) -> Configuration {
        complete_fields(self.fields(), configuration, visitor, &[])
    }
}

fn complete_fields<'a>(
    fields: impl IntoIterator<Item = &'a FieldDefinition>,
    configuration: &Configuration,
    visitor: &dyn FieldVisitor,
    path: &[String],
) -> Configuration {
    let mut completed = Configuration::new();
    for field in fields {
        let raw = configuration
            .get(&field.field)
            .filter(|v| !v.is_null())
            .cloned()
            .or_else(|| field.default.clone())
            .unwrap_or(Value::Null);

        let value = if field.kind.is_group() {
            complete_group(field, raw, visitor, path)
        } else {
            raw
        };

        let value = visitor.process_field(field, value, path);
        completed.insert(field.field.clone(), value);
    }
    completed
}

/// Complete every element of a group; malformed group values become `[]`.
fn complete_group(
    field: &FieldDefinition,
    raw: Value,
    visitor: &dyn FieldVisitor,
    path: &[String],
) -> Value {
    let Value::Array(elements) = raw else {
        return Value::Array(Vec::new());
    };

    let completed = elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let empty = Configuration::new();
            let element_configuration = element.as_object().unwrap_or(&empty);

            let mut element_path = path.to_vec();
            element_path.push(field.field.clone());
            element_path.push(index.to_string());

            Value::Object(complete_fields(
                &field.fields,
                element_configuration,
                visitor,
                &element_path,
            ))
        })
        .collect();

    Value::Array(completed)
}

impl SchemaGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }
}

impl FieldDefinition {
    pub fn scalar(field: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FieldKind::from(kind.into()),
            stream_type: None,
            fields: Vec::new(),
            translatable: false,
            default: None,
        }
    }

    pub fn stream(field: impl Into<String>, stream_type: impl Into<String>) -> Self {
        Self {
            stream_type: Some(stream_type.into()),
            ..Self::scalar(field, "stream")
        }
    }

    pub fn group(field: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            fields,
            ..Self::scalar(field, "group")
        }
    }

    pub fn translatable(mut self) -> Self {
        self.translatable = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}
