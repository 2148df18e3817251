//! Mutable accessor state for resource and provider bindings
//!
//! `ResourceData` tracks three presence states per field: absent, set
//! (including explicit null), and deferred-unknown. Computed-only
//! attributes read from remote state once hydrated, and as the deferred
//! marker before that.

use crate::error::{Result, SynthError};
use crate::schema::{Block, NestedBlock, NestingMode, Schema, SchemaNode};
use crate::value::{AttributePath, Value};

/// Schema-aware store behind every binding type.
///
/// Values set by the caller live in the input tree; values resolved by
/// the host's apply step live in the remote tree and are installed via
/// `hydrate`.
#[derive(Debug, Clone)]
pub struct ResourceData {
    schema: Schema,
    input: Value,
    remote: Value,
}

impl ResourceData {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            input: Value::empty_map(),
            remote: Value::empty_map(),
        }
    }

    pub fn with_input(schema: Schema, input: Value) -> Result<Self> {
        if !matches!(input, Value::Map(_)) {
            return Err(SynthError::InvalidConfiguration(format!(
                "configuration must be an object, got {}",
                input.type_name()
            )));
        }
        Ok(Self {
            schema,
            input,
            remote: Value::empty_map(),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The pending input tree, as set by the caller.
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Read the value at `path`.
    ///
    /// Returns the pending value if one was set. Computed attributes
    /// with no pending value fall back to remote state, reading as
    /// `Value::Unknown` until hydration. All other absent fields read
    /// as `None`.
    pub fn get(&self, path: &AttributePath) -> Option<Value> {
        if let Some(value) = self.input.find(path) {
            return Some(value.clone());
        }
        match self.schema.block.lookup(&path.steps) {
            Some(SchemaNode::Attribute(attr)) if attr.computed => {
                Some(self.remote.find(path).cloned().unwrap_or(Value::Unknown))
            }
            _ => None,
        }
    }

    pub fn get_string(&self, path: &AttributePath) -> Result<String> {
        match self.get(path) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(SynthError::TypeMismatch {
                expected: "string".to_string(),
                actual: other.type_name().to_string(),
            }),
            None => Err(SynthError::Custom(format!("attribute '{}' not set", path))),
        }
    }

    pub fn get_bool(&self, path: &AttributePath) -> Result<bool> {
        match self.get(path) {
            Some(Value::Bool(b)) => Ok(b),
            Some(other) => Err(SynthError::TypeMismatch {
                expected: "bool".to_string(),
                actual: other.type_name().to_string(),
            }),
            None => Err(SynthError::Custom(format!("attribute '{}' not set", path))),
        }
    }

    pub fn get_number(&self, path: &AttributePath) -> Result<f64> {
        match self.get(path) {
            Some(Value::Number(n)) => Ok(n),
            Some(other) => Err(SynthError::TypeMismatch {
                expected: "number".to_string(),
                actual: other.type_name().to_string(),
            }),
            None => Err(SynthError::Custom(format!("attribute '{}' not set", path))),
        }
    }

    /// Store a pending value. Shape rules are enforced at synthesis
    /// time, not here.
    pub fn set(&mut self, path: &AttributePath, value: Value) -> Result<()> {
        self.input.set_path(path, value)
    }

    pub fn set_string(&mut self, path: &AttributePath, value: impl Into<String>) -> Result<()> {
        self.set(path, Value::String(value.into()))
    }

    pub fn set_bool(&mut self, path: &AttributePath, value: bool) -> Result<()> {
        self.set(path, Value::Bool(value))
    }

    pub fn set_number(&mut self, path: &AttributePath, value: f64) -> Result<()> {
        self.set(path, Value::Number(value))
    }

    /// Store the deferred marker for a value the host resolves later.
    pub fn mark_unknown(&mut self, path: &AttributePath) -> Result<()> {
        self.set(path, Value::Unknown)
    }

    /// Clear the pending value back to absent. Distinct from setting an
    /// explicit null.
    pub fn reset(&mut self, path: &AttributePath) -> Option<Value> {
        self.input.remove_path(path)
    }

    /// Install remote state resolved by the host's apply step.
    pub fn hydrate(&mut self, remote: Value) -> Result<()> {
        if !matches!(remote, Value::Map(_)) {
            return Err(SynthError::InvalidState(format!(
                "remote state must be an object, got {}",
                remote.type_name()
            )));
        }
        tracing::trace!("hydrating remote state");
        self.remote = remote;
        Ok(())
    }

    /// View a single-object nested block, if set.
    pub fn block(&self, path: &AttributePath) -> Result<Option<BlockElement>> {
        let nested = self.nested_at(path)?;
        match self.input.find(path) {
            None => Ok(None),
            Some(value @ Value::Map(_)) => Ok(Some(BlockElement {
                block: nested.block.clone(),
                value: value.clone(),
            })),
            Some(Value::List(_)) => Err(SynthError::InvalidConfiguration(format!(
                "block '{}' is repeated; use block_list",
                path
            ))),
            Some(other) => Err(SynthError::TypeMismatch {
                expected: "object".to_string(),
                actual: other.type_name().to_string(),
            }),
        }
    }

    /// View a repeated nested block as an indexable list.
    pub fn block_list(&self, path: &AttributePath) -> Result<BlockList> {
        let nested = self.nested_at(path)?;
        list_from_value(nested, self.input.find(path))
    }

    fn nested_at(&self, path: &AttributePath) -> Result<&NestedBlock> {
        match self.schema.block.lookup(&path.steps) {
            Some(SchemaNode::Block(nested)) => Ok(nested),
            Some(SchemaNode::Attribute(_)) => Err(SynthError::InvalidConfiguration(format!(
                "'{}' is an attribute, not a block",
                path
            ))),
            None => Err(SynthError::UnknownAttribute(path.to_string())),
        }
    }
}

fn list_from_value(nested: &NestedBlock, value: Option<&Value>) -> Result<BlockList> {
    let elements = match value {
        None => Vec::new(),
        Some(Value::List(items)) => items.clone(),
        Some(single @ Value::Map(_)) if nested.accepts_single_object() => vec![single.clone()],
        Some(other) => {
            return Err(SynthError::TypeMismatch {
                expected: "list of objects".to_string(),
                actual: other.type_name().to_string(),
            })
        }
    };
    Ok(BlockList {
        block: nested.block.clone(),
        elements,
        wraps_set: nested.nesting == NestingMode::Set,
    })
}

/// Indexable view over a repeated nested block.
///
/// Element wrappers are constructed lazily, one per `get`. `wraps_set`
/// records whether the underlying collection is unordered; it only
/// affects how the host renders index expressions.
#[derive(Debug, Clone)]
pub struct BlockList {
    block: Block,
    elements: Vec<Value>,
    wraps_set: bool,
}

impl BlockList {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn wraps_set(&self) -> bool {
        self.wraps_set
    }

    pub fn get(&self, index: usize) -> Result<BlockElement> {
        let value = self.elements.get(index).ok_or_else(|| {
            SynthError::Custom(format!("list index {} out of bounds", index))
        })?;
        Ok(BlockElement {
            block: self.block.clone(),
            value: value.clone(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = BlockElement> + '_ {
        self.elements.iter().map(|value| BlockElement {
            block: self.block.clone(),
            value: value.clone(),
        })
    }
}

/// Read accessor over one nested block instance.
#[derive(Debug, Clone)]
pub struct BlockElement {
    block: Block,
    value: Value,
}

impl BlockElement {
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.value.find(&AttributePath::new(name)).cloned()
    }

    pub fn get_string(&self, name: &str) -> Result<String> {
        match self.get(name) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(SynthError::TypeMismatch {
                expected: "string".to_string(),
                actual: other.type_name().to_string(),
            }),
            None => Err(SynthError::Custom(format!("attribute '{}' not set", name))),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(Value::Bool(b)) => Ok(b),
            Some(other) => Err(SynthError::TypeMismatch {
                expected: "bool".to_string(),
                actual: other.type_name().to_string(),
            }),
            None => Err(SynthError::Custom(format!("attribute '{}' not set", name))),
        }
    }

    pub fn get_number(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(Value::Number(n)) => Ok(n),
            Some(other) => Err(SynthError::TypeMismatch {
                expected: "number".to_string(),
                actual: other.type_name().to_string(),
            }),
            None => Err(SynthError::Custom(format!("attribute '{}' not set", name))),
        }
    }

    /// Descend into a repeated nested block of this element.
    pub fn block_list(&self, name: &str) -> Result<BlockList> {
        let nested = self
            .block
            .block_type(name)
            .ok_or_else(|| SynthError::UnknownAttribute(name.to_string()))?;
        list_from_value(nested, self.value.find(&AttributePath::new(name)))
    }

    /// Descend into a single-object nested block of this element.
    pub fn block(&self, name: &str) -> Result<Option<BlockElement>> {
        let nested = self
            .block
            .block_type(name)
            .ok_or_else(|| SynthError::UnknownAttribute(name.to_string()))?;
        match self.value.find(&AttributePath::new(name)) {
            None => Ok(None),
            Some(value @ Value::Map(_)) => Ok(Some(BlockElement {
                block: nested.block.clone(),
                value: value.clone(),
            })),
            Some(other) => Err(SynthError::TypeMismatch {
                expected: "object".to_string(),
                actual: other.type_name().to_string(),
            }),
        }
    }
}
