//! Chains several visitors.

use serde_json::Value;

use catwalk_core::domain::{FieldDefinition, FieldVisitor};

/// Applies its visitors in order, feeding each one the previous output.
#[derive(Default)]
pub struct SequentialVisitor {
    visitors: Vec<Box<dyn FieldVisitor>>,
}

impl SequentialVisitor {
    pub fn new(visitors: Vec<Box<dyn FieldVisitor>>) -> Self {
        Self { visitors }
    }

    pub fn then(mut self, visitor: Box<dyn FieldVisitor>) -> Self {
        self.visitors.push(visitor);
        self
    }
}

impl FieldVisitor for SequentialVisitor {
    fn process_field(&self, field: &FieldDefinition, value: Value, path: &[String]) -> Value {
        self.visitors
            .iter()
            .fold(value, |value, visitor| visitor.process_field(field, value, path))
    }
}
