//! Wire marshalling for tfsynth
//!
//! One generic routine walks the schema metadata and produces the
//! attribute map consumed by the orchestration host. Absent attributes
//! are omitted entirely; deferred values pass through untouched.

use crate::error::{Result, SynthError};
use crate::schema::{AttributeType, Block, NestedBlock, NestingMode};
use crate::value::Value;
use std::collections::HashMap;

/// Produce the wire attribute map for `input` against `block`.
///
/// Attributes not present in the input are skipped. A compound literal
/// supplied where the schema declares a scalar is rejected.
pub fn synthesize_attributes(block: &Block, input: &Value) -> Result<Value> {
    let map = match input {
        Value::Unknown => return Ok(Value::Unknown),
        Value::Null => return Ok(Value::Null),
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
                marshal_attribute(&attr.name, &attr.r#type, value)?,
            );
        }
    }
    for nested in &block.block_types {
        if let Some(value) = map.get(&nested.type_name) {
            out.insert(nested.type_name.clone(), marshal_block(nested, value)?);
        }
    }
    Ok(Value::Map(out))
}

pub(crate) fn reject_undeclared(block: &Block, map: &HashMap<String, Value>) -> Result<()> {
    for name in map.keys() {
        if block.attribute(name).is_none() && block.block_type(name).is_none() {
            return Err(SynthError::UnknownAttribute(name.clone()));
        }
    }
    Ok(())
}

pub(crate) fn marshal_attribute(
    name: &str,
    r#type: &AttributeType,
    value: &Value,
) -> Result<Value> {
    match value {
        Value::Unknown => return Ok(Value::Unknown),
        Value::Null => return Ok(Value::Null),
        _ => {}
    }

    match r#type {
        AttributeType::String | AttributeType::Number | AttributeType::Bool => {
            if matches!(value, Value::List(_) | Value::Map(_)) {
                return Err(SynthError::InvalidConfiguration(format!(
                    "attribute '{}' expects a scalar or resolvable reference, got a compound {} literal",
                    name,
                    value.type_name()
                )));
            }
            let matches_type = matches!(
                (r#type, value),
                (AttributeType::String, Value::String(_))
                    | (AttributeType::Number, Value::Number(_))
                    | (AttributeType::Bool, Value::Bool(_))
            );
            if matches_type {
                Ok(value.clone())
            } else {
                Err(SynthError::TypeMismatch {
                    expected: scalar_name(r#type).to_string(),
                    actual: value.type_name().to_string(),
                })
            }
        }
        AttributeType::List(element) | AttributeType::Set(element) => match value {
            Value::List(items) => items
                .iter()
                .map(|item| marshal_attribute(name, element, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            other => Err(SynthError::TypeMismatch {
                expected: "list".to_string(),
                actual: other.type_name().to_string(),
            }),
        },
        AttributeType::Map(element) => match value {
            Value::Map(entries) => {
                let mut out = HashMap::new();
                for (key, item) in entries {
                    out.insert(key.clone(), marshal_attribute(name, element, item)?);
                }
                Ok(Value::Map(out))
            }
            other => Err(SynthError::TypeMismatch {
                expected: "map".to_string(),
                actual: other.type_name().to_string(),
            }),
        },
        AttributeType::Object(fields) => match value {
            Value::Map(entries) => {
                let mut out = HashMap::new();
                for (key, item) in entries {
                    let field_type = fields
                        .get(key)
                        .ok_or_else(|| SynthError::UnknownAttribute(format!("{}.{}", name, key)))?;
                    out.insert(key.clone(), marshal_attribute(key, field_type, item)?);
                }
                Ok(Value::Map(out))
            }
            other => Err(SynthError::TypeMismatch {
                expected: "object".to_string(),
                actual: other.type_name().to_string(),
            }),
        },
    }
}

pub(crate) fn marshal_block(nested: &NestedBlock, value: &Value) -> Result<Value> {
    match value {
        Value::Unknown => Ok(Value::Unknown),
        Value::Null => Ok(Value::Null),
        Value::Map(_) => {
            if nested.accepts_single_object() {
                synthesize_attributes(&nested.block, value)
            } else {
                Err(SynthError::InvalidConfiguration(format!(
                    "block '{}' is repeated; expected a list of objects",
                    nested.type_name
                )))
            }
        }
        Value::List(items) => {
            if nested.nesting == NestingMode::Single {
                return Err(SynthError::InvalidConfiguration(format!(
                    "block '{}' accepts a single object, not a list",
                    nested.type_name
                )));
            }
            items
                .iter()
                .map(|item| match item {
                    Value::Map(_) | Value::Unknown => synthesize_attributes(&nested.block, item),
                    other => Err(SynthError::InvalidConfiguration(format!(
                        "elements of block '{}' must be objects, got {}",
                        nested.type_name,
                        other.type_name()
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::List)
        }
        other => Err(SynthError::TypeMismatch {
            expected: "object or list of objects".to_string(),
            actual: other.type_name().to_string(),
        }),
    }
}

fn scalar_name(r#type: &AttributeType) -> &'static str {
    match r#type {
        AttributeType::String => "string",
        AttributeType::Number => "number",
        AttributeType::Bool => "bool",
        _ => "scalar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeBuilder, BlockBuilder, NestedBlock, SchemaBuilder};

    fn cluster_like_schema() -> Block {
        let port_mapping = BlockBuilder::new()
            .attribute(AttributeBuilder::number("container_port").required().build())
            .attribute(AttributeBuilder::number("host_port").required().build())
            .attribute(AttributeBuilder::string("protocol").optional().build())
            .build();

        SchemaBuilder::new()
            .attribute(AttributeBuilder::string("name").required().build())
            .attribute(AttributeBuilder::string("node_image").optional().build())
            .attribute(AttributeBuilder::bool("wait_for_ready").optional().build())
            .attribute(AttributeBuilder::string("endpoint").computed().build())
            .block(NestedBlock::list("port_mapping", port_mapping))
            .build()
            .block
    }

    fn map(entries: Vec<(&str, Value)>) -> Value {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn unset_optionals_are_omitted() {
        let block = cluster_like_schema();
        let input = map(vec![("name", Value::String("dev-cluster".to_string()))]);

        let wire = synthesize_attributes(&block, &input).unwrap();
        assert_eq!(
            wire,
            map(vec![("name", Value::String("dev-cluster".to_string()))])
        );
    }

    #[test]
    fn explicit_null_is_emitted() {
        let block = cluster_like_schema();
        let input = map(vec![
            ("name", Value::String("dev".to_string())),
            ("node_image", Value::Null),
        ]);

        let wire = synthesize_attributes(&block, &input).unwrap();
        assert_eq!(
            wire.find(&crate::value::AttributePath::new("node_image")),
            Some(&Value::Null)
        );
    }

    #[test]
    fn deferred_values_pass_through_untouched() {
        let block = cluster_like_schema();
        let input = map(vec![
            ("name", Value::String("dev".to_string())),
            ("wait_for_ready", Value::Unknown),
        ]);

        let wire = synthesize_attributes(&block, &input).unwrap();
        assert_eq!(
            wire.find(&crate::value::AttributePath::new("wait_for_ready")),
            Some(&Value::Unknown)
        );
    }

    #[test]
    fn compound_literal_in_scalar_position_is_rejected() {
        let block = cluster_like_schema();
        let input = map(vec![("name", map(vec![("oops", Value::Bool(true))]))]);

        let err = synthesize_attributes(&block, &input).unwrap_err();
        assert!(matches!(err, SynthError::InvalidConfiguration(_)));
    }

    #[test]
    fn scalar_kind_mismatch_is_rejected() {
        let block = cluster_like_schema();
        let input = map(vec![("wait_for_ready", Value::String("yes".to_string()))]);

        let err = synthesize_attributes(&block, &input).unwrap_err();
        assert!(matches!(err, SynthError::TypeMismatch { .. }));
    }

    #[test]
    fn undeclared_attribute_is_rejected() {
        let block = cluster_like_schema();
        let input = map(vec![("no_such_field", Value::Bool(true))]);

        let err = synthesize_attributes(&block, &input).unwrap_err();
        assert!(matches!(err, SynthError::UnknownAttribute(name) if name == "no_such_field"));
    }

    #[test]
    fn repeated_blocks_preserve_insertion_order() {
        let block = cluster_like_schema();
        let input = map(vec![
            ("name", Value::String("dev".to_string())),
            (
                "port_mapping",
                Value::List(vec![
                    map(vec![
                        ("container_port", Value::Number(80.0)),
                        ("host_port", Value::Number(8080.0)),
                    ]),
                    map(vec![
                        ("container_port", Value::Number(443.0)),
                        ("host_port", Value::Number(8443.0)),
                    ]),
                ]),
            ),
        ]);

        let wire = synthesize_attributes(&block, &input).unwrap();
        let mappings = wire
            .find(&crate::value::AttributePath::new("port_mapping"))
            .and_then(|v| v.as_list())
            .unwrap();
        assert_eq!(mappings.len(), 2);
        assert_eq!(
            mappings[0].find(&crate::value::AttributePath::new("container_port")),
            Some(&Value::Number(80.0))
        );
        assert_eq!(
            mappings[1].find(&crate::value::AttributePath::new("container_port")),
            Some(&Value::Number(443.0))
        );
    }

    #[test]
    fn max_items_one_block_accepts_object_form() {
        let inner = BlockBuilder::new()
            .attribute(AttributeBuilder::string("kind").optional().build())
            .build();
        let block = SchemaBuilder::new()
            .block(NestedBlock::list("kind_config", inner).max_items(1))
            .build()
            .block;

        let input = map(vec![(
            "kind_config",
            map(vec![("kind", Value::String("Cluster".to_string()))]),
        )]);

        let wire = synthesize_attributes(&block, &input).unwrap();
        let config = wire
            .find(&crate::value::AttributePath::new("kind_config"))
            .unwrap();
        assert!(matches!(config, Value::Map(_)));
    }

    #[test]
    fn repeated_block_rejects_bare_object() {
        let block = cluster_like_schema();
        let input = map(vec![(
            "port_mapping",
            map(vec![("container_port", Value::Number(80.0))]),
        )]);

        let err = synthesize_attributes(&block, &input).unwrap_err();
        assert!(matches!(err, SynthError::InvalidConfiguration(_)));
    }
}
