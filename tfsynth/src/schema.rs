//! Schema types and builders for tfsynth
//!
//! Resource and provider schemas are described declaratively: attributes,
//! nested blocks, and their flags. The marshalling routines walk this
//! metadata instead of relying on per-field code.

use crate::value::AttributePathStep;
use std::collections::HashMap;

/// AttributeType defines the type system for Terraform attributes
/// This must match Terraform's type system exactly
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number, // Always f64
    Bool,
    List(Box<AttributeType>),               // Ordered, allows duplicates
    Set(Box<AttributeType>),                // Unordered, no duplicates
    Map(Box<AttributeType>),                // String keys only
    Object(HashMap<String, AttributeType>), // Fixed structure
}

/// Schema describes one provider or resource
/// Version is used for state migration
#[derive(Debug, Clone)]
pub struct Schema {
    pub version: i64,
    pub block: Block, // Root block containing all attributes
}

/// Block represents a configuration block
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub attributes: Vec<Attribute>,
    pub block_types: Vec<NestedBlock>,
    pub description: String,
    pub deprecated: bool,
}

/// Attribute represents a single configuration attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub deprecated: bool,
}

/// NestedBlock represents a nested configuration block
#[derive(Debug, Clone)]
pub struct NestedBlock {
    pub type_name: String,
    pub block: Block,
    pub nesting: NestingMode,
    pub min_items: i64,
    pub max_items: i64,
}

impl NestedBlock {
    fn new(type_name: &str, block: Block, nesting: NestingMode) -> Self {
        Self {
            type_name: type_name.to_string(),
            block,
            nesting,
            min_items: 0,
            max_items: 0,
        }
    }

    /// A block that appears at most once and holds a single object
    pub fn single(type_name: &str, block: Block) -> Self {
        Self::new(type_name, block, NestingMode::Single)
    }

    /// A repeated block with ordered elements
    pub fn list(type_name: &str, block: Block) -> Self {
        Self::new(type_name, block, NestingMode::List)
    }

    /// A repeated block with unordered elements
    pub fn set(type_name: &str, block: Block) -> Self {
        Self::new(type_name, block, NestingMode::Set)
    }

    pub fn min_items(mut self, n: i64) -> Self {
        self.min_items = n;
        self
    }

    pub fn max_items(mut self, n: i64) -> Self {
        self.max_items = n;
        self
    }

    /// Repeated blocks declared with `max_items == 1` accept a single
    /// object in place of a one-element list.
    pub fn accepts_single_object(&self) -> bool {
        self.nesting == NestingMode::Single || self.max_items == 1
    }
}

/// NestingMode defines how nested blocks are structured
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NestingMode {
    Single,
    List,
    Set,
}

/// A schema node resolved from an attribute path
#[derive(Debug, Clone, Copy)]
pub enum SchemaNode<'a> {
    Attribute(&'a Attribute),
    Block(&'a NestedBlock),
}

impl Block {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn block_type(&self, name: &str) -> Option<&NestedBlock> {
        self.block_types.iter().find(|b| b.type_name == name)
    }

    /// Resolve an attribute path against this block. Element keys step
    /// through repeated block instances; a path terminating inside an
    /// attribute's own collection still resolves to that attribute.
    pub fn lookup(&self, steps: &[AttributePathStep]) -> Option<SchemaNode<'_>> {
        let (first, mut rest) = steps.split_first()?;

        let name = match first {
            AttributePathStep::AttributeName(name) => name,
            _ => return None,
        };

        if let Some(attr) = self.attribute(name) {
            return Some(SchemaNode::Attribute(attr));
        }

        let nested = self.block_type(name)?;
        while let Some((step, remaining)) = rest.split_first() {
            match step {
                AttributePathStep::ElementKeyInt(_) | AttributePathStep::ElementKeyString(_) => {
                    rest = remaining;
                }
                _ => break,
            }
        }
        if rest.is_empty() {
            Some(SchemaNode::Block(nested))
        } else {
            nested.block.lookup(rest)
        }
    }
}

/// AttributeBuilder provides fluent API for building attributes
/// ALWAYS use this instead of constructing Attribute directly
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                deprecated: false,
            },
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, AttributeType::Number)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn list(name: &str, element: AttributeType) -> Self {
        Self::new(name, AttributeType::List(Box::new(element)))
    }

    pub fn set(name: &str, element: AttributeType) -> Self {
        Self::new(name, AttributeType::Set(Box::new(element)))
    }

    pub fn map(name: &str, element: AttributeType) -> Self {
        Self::new(name, AttributeType::Map(Box::new(element)))
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.attribute.deprecated = true;
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// BlockBuilder assembles the inner block of a nested block type
pub struct BlockBuilder {
    block: Block,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            block: Block::default(),
        }
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.block.attributes.push(attr);
        self
    }

    pub fn block(mut self, nested: NestedBlock) -> Self {
        self.block.block_types.push(nested);
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.block.description = desc.to_string();
        self
    }

    pub fn build(self) -> Block {
        self.block
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// SchemaBuilder provides fluent API for building schemas
/// ALWAYS use this for consistency
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                block: Block::default(),
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.block.attributes.push(attr);
        self
    }

    pub fn block(mut self, nested: NestedBlock) -> Self {
        self.schema.block.block_types.push(nested);
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.block.description = desc.to_string();
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
