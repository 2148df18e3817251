//! Display marshalling for plan previews
//!
//! Produces the same attribute walk as the wire marshaller but tags every
//! field with its block/attribute classification and storage class, for
//! human-readable plan rendering by the host.

use crate::error::{Result, SynthError};
use crate::marshal::{marshal_attribute, reject_undeclared};
use crate::schema::{AttributeType, Block, NestedBlock, NestingMode};
use crate::value::Value;
use serde::Serialize;
use std::collections::HashMap;

/// One display-tagged attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HclAttribute {
    pub value: HclValue,
    pub is_block: bool,
    #[serde(rename = "type")]
    pub kind: HclKind,
    pub storage_class_type: String,
}

/// Field classification for plan rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HclKind {
    Simple,
    List,
    Set,
    Map,
    Struct,
}

/// Display values nest tagged maps for block types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HclValue {
    Simple(Value),
    Object(HashMap<String, HclAttribute>),
    ObjectList(Vec<HashMap<String, HclAttribute>>),
}

/// Produce the display attribute map for `input` against `block`.
/// Unset fields are omitted; shape rules match the wire marshaller.
pub fn synthesize_hcl_attributes(
    block: &Block,
    input: &Value,
) -> Result<HashMap<String, HclAttribute>> {
    let map = match input {
        Value::Map(m) => m,
        other => {
            return Err(SynthError::TypeMismatch {
                expected: "object".to_string(),
                actual: other.type_name().to_string(),
            })
        }
    };

    reject_undeclared(block, map)?;

    let mut out = HashMap::new();
    for attr in &block.attributes {
        if let Some(value) = map.get(&attr.name) {
            out.insert(
                attr.name.clone(),
                HclAttribute {
                    value: HclValue::Simple(marshal_attribute(&attr.name, &attr.r#type, value)?),
                    is_block: false,
                    kind: attribute_kind(&attr.r#type),
                    storage_class_type: storage_class(&attr.r#type),
                },
            );
        }
    }
    for nested in &block.block_types {
        if let Some(value) = map.get(&nested.type_name) {
            out.insert(nested.type_name.clone(), hcl_block(nested, value)?);
        }
    }
    Ok(out)
}

fn hcl_block(nested: &NestedBlock, value: &Value) -> Result<HclAttribute> {
    let kind = match nested.nesting {
        NestingMode::Single => HclKind::Struct,
        NestingMode::List => HclKind::List,
        NestingMode::Set => HclKind::Set,
    };

    let value = match value {
        Value::Unknown => HclValue::Simple(Value::Unknown),
        Value::Null => HclValue::Simple(Value::Null),
        Value::Map(_) if nested.accepts_single_object() => {
            HclValue::Object(synthesize_hcl_attributes(&nested.block, value)?)
        }
        Value::Map(_) => {
            return Err(SynthError::InvalidConfiguration(format!(
                "block '{}' is repeated; expected a list of objects",
                nested.type_name
            )))
        }
        Value::List(items) if nested.nesting != NestingMode::Single => {
            let mut elements = Vec::new();
            for item in items {
                match item {
                    Value::Map(_) => {
                        elements.push(synthesize_hcl_attributes(&nested.block, item)?)
                    }
                    other => {
                        return Err(SynthError::InvalidConfiguration(format!(
                            "elements of block '{}' must be objects, got {}",
                            nested.type_name,
                            other.type_name()
                        )))
                    }
                }
            }
            HclValue::ObjectList(elements)
        }
        other => {
            return Err(SynthError::TypeMismatch {
                expected: "object or list of objects".to_string(),
                actual: other.type_name().to_string(),
            })
        }
    };

    Ok(HclAttribute {
        value,
        is_block: true,
        kind,
        storage_class_type: block_storage_class(nested),
    })
}

fn attribute_kind(r#type: &AttributeType) -> HclKind {
    match r#type {
        AttributeType::String | AttributeType::Number | AttributeType::Bool => HclKind::Simple,
        AttributeType::List(_) => HclKind::List,
        AttributeType::Set(_) => HclKind::Set,
        AttributeType::Map(_) => HclKind::Map,
        AttributeType::Object(_) => HclKind::Struct,
    }
}

fn storage_class(r#type: &AttributeType) -> String {
    match r#type {
        AttributeType::String => "string".to_string(),
        AttributeType::Number => "number".to_string(),
        AttributeType::Bool => "boolean".to_string(),
        AttributeType::List(element) => format!("{}List", storage_class(element)),
        AttributeType::Set(element) => format!("{}Set", storage_class(element)),
        AttributeType::Map(element) => format!("{}Map", storage_class(element)),
        AttributeType::Object(_) => "struct".to_string(),
    }
}

fn block_storage_class(nested: &NestedBlock) -> String {
    let base = pascal_case(&nested.type_name);
    match nested.nesting {
        NestingMode::Single => base,
        NestingMode::List => format!("{}List", base),
        NestingMode::Set => format!("{}Set", base),
    }
}

fn pascal_case(name: &str) -> String {
    name.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
