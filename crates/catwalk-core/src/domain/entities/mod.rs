pub mod context;
pub mod node;
pub mod page;
pub mod schema;

pub use context::{Account, Context, Project, Session};
pub use node::{Node, Parameters, Stream};
pub use page::{Cell, Configuration, Page, Region, TasticInstance};
pub use schema::{
    ConfigurationSchema, FieldDefinition, FieldVisitor, SchemaGroup, TasticDefinition, TasticMap,
};
