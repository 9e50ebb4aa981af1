//! Picks the translation matching the request locale.

use serde_json::Value;

use catwalk_core::domain::{Context, FieldDefinition, FieldVisitor};

/// Resolves translatable fields to a single text.
///
/// For a translatable field holding an object of locale → text the visitor
/// returns, in order of preference:
/// 1. the text for the context locale
/// 2. the text for the project's default language
/// 3. the first non-empty text in project language order
/// 4. `null`
///
/// Non-translatable fields and non-object values pass unchanged.
#[derive(Debug, Clone)]
pub struct SelectTranslationVisitor {
    locale: String,
    default_language: String,
    languages: Vec<String>,
}

impl SelectTranslationVisitor {
    pub fn new(context: &Context) -> Self {
        Self {
            locale: context.locale.clone(),
            default_language: context.project.default_language.clone(),
            languages: context.project.languages.clone(),
        }
    }

    fn select(&self, translations: &serde_json::Map<String, Value>) -> Value {
        let present = |locale: &str| {
            translations
                .get(locale)
                .filter(|text| !is_empty_translation(text))
                .cloned()
        };

        present(self.locale.as_str())
            .or_else(|| present(self.default_language.as_str()))
            .or_else(|| {
                self.languages
                    .iter()
                    .find_map(|language| present(language.as_str()))
            })
            .unwrap_or(Value::Null)
    }
}

fn is_empty_translation(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

impl FieldVisitor for SelectTranslationVisitor {
    fn process_field(&self, field: &FieldDefinition, value: Value, _path: &[String]) -> Value {
        if !field.translatable {
            return value;
        }
        match &value {
            Value::Object(translations) => self.select(translations),
            _ => value,
        }
    }
}
