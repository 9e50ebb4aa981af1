use crate::domain::{
    action::{ActionDispatchTable, ActionOverrides},
    entities::{Node, TasticDefinition},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across call sites.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_definition(definition: &TasticDefinition) -> Result<(), DomainError> {
        definition.validate()
    }

    pub fn validate_node(node: &Node) -> Result<(), DomainError> {
        node.validate()
    }

    pub fn validate_action_overrides(overrides: &ActionOverrides) -> Result<(), DomainError> {
        ActionDispatchTable::from_overrides(overrides).map(|_| ())
    }
}
