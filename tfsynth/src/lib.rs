//! tfsynth - Schema-driven Terraform configuration synthesis
//!
//! Provider bindings describe their attributes and nested blocks as
//! declarative schema metadata. Generic routines walk that metadata to
//! produce the wire attribute map and the display (plan preview) map,
//! and a `Stack` collects bindings into the final configuration
//! document.

// Core modules
pub mod error;
pub mod schema;
pub mod value;

// Marshalling
pub mod hcl;
pub mod marshal;

// Binding state and registration
pub mod stack;
pub mod state;

// Re-exports for convenience
pub use error::{Result, SynthError};
pub use hcl::{synthesize_hcl_attributes, HclAttribute, HclKind, HclValue};
pub use marshal::synthesize_attributes;
pub use schema::{
    Attribute, AttributeBuilder, AttributeType, Block, BlockBuilder, NestedBlock, NestingMode,
    Schema, SchemaBuilder, SchemaNode,
};
pub use stack::{Provider, ProviderRequirement, Resource, Stack};
pub use state::{BlockElement, BlockList, ResourceData};
pub use value::{AttributePath, AttributePathStep, Value};
