//! Field visitors used by page and node data completion.

pub mod factory;
pub mod field_data_inline;
pub mod select_translation;
pub mod sequential;

pub use factory::DefaultFieldVisitorFactory;
pub use field_data_inline::FieldDataInlineVisitor;
pub use select_translation::SelectTranslationVisitor;
pub use sequential::SequentialVisitor;
