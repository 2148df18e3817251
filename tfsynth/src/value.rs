//! Core value model for tfsynth
//!
//! Terraform configuration and state values are dynamically typed. This
//! module provides the `Value` tree used for all attribute data, the
//! attribute path model, and the wire codecs.

use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker used on the wire for values not yet known.
const UNKNOWN_SENTINEL: &str = "__unknown__";

/// Value represents Terraform attribute data of any type.
///
/// `Unknown` is the deferred marker for values that only exist after the
/// host performs its apply step. Marshalling passes it through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null value, distinct from an absent attribute
    Null,
    /// Boolean value
    Bool(bool),
    /// Number value (all numbers are f64 to match Terraform)
    Number(f64),
    /// String value
    String(String),
    /// List of values (ordered, allows duplicates)
    List(Vec<Value>),
    /// Map of string keys to values (objects are represented as Maps)
    Map(HashMap<String, Value>),
    /// Value not yet known (resolved by the host at apply time)
    Unknown,
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                // Integral numbers serialize as integers so synthesized
                // documents read like Terraform JSON
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::List(l) => l.serialize(serializer),
            Value::Map(m) => m.serialize(serializer),
            Value::Unknown => serializer.serialize_str(UNKNOWN_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid attribute value")
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Null)
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Number(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Number(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Number(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                if value == UNKNOWN_SENTINEL {
                    Ok(Value::Unknown)
                } else {
                    Ok(Value::String(value.to_string()))
                }
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                if value == UNKNOWN_SENTINEL {
                    Ok(Value::Unknown)
                } else {
                    Ok(Value::String(value))
                }
            }

            fn visit_seq<V>(self, mut seq: V) -> std::result::Result<Value, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::List(vec))
            }

            fn visit_map<V>(self, mut map: V) -> std::result::Result<Value, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut hashmap = HashMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    hashmap.insert(key, value);
                }
                Ok(Value::Map(hashmap))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl Value {
    pub fn empty_map() -> Self {
        Value::Map(HashMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Unknown => "unknown",
        }
    }

    /// Navigate to the value addressed by `path`, if present.
    pub fn find(&self, path: &AttributePath) -> Option<&Value> {
        let mut current = self;
        for step in &path.steps {
            current = match (current, step) {
                (Value::Map(m), AttributePathStep::AttributeName(name)) => m.get(name)?,
                (Value::Map(m), AttributePathStep::ElementKeyString(key)) => m.get(key)?,
                (Value::List(l), AttributePathStep::ElementKeyInt(idx)) => {
                    l.get(*idx as usize)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Store `new_value` at `path`, creating intermediate containers as
    /// the path dictates.
    pub fn set_path(&mut self, path: &AttributePath, new_value: Value) -> Result<()> {
        if path.steps.is_empty() {
            *self = new_value;
            return Ok(());
        }

        if !matches!(self, Value::Map(_)) {
            *self = Value::empty_map();
        }

        let mut current = self;
        let last_idx = path.steps.len() - 1;

        for (idx, step) in path.steps.iter().enumerate() {
            if idx == last_idx {
                match (current, step) {
                    (Value::Map(m), AttributePathStep::AttributeName(name))
                    | (Value::Map(m), AttributePathStep::ElementKeyString(name)) => {
                        m.insert(name.clone(), new_value);
                        return Ok(());
                    }
                    (Value::List(l), AttributePathStep::ElementKeyInt(i)) => {
                        let i = *i as usize;
                        if i < l.len() {
                            l[i] = new_value;
                            return Ok(());
                        }
                        return Err(SynthError::Custom(format!(
                            "list index {} out of bounds",
                            i
                        )));
                    }
                    _ => return Err(SynthError::Custom("invalid path navigation".to_string())),
                }
            } else {
                current = match (current, step) {
                    (Value::Map(m), AttributePathStep::AttributeName(name))
                    | (Value::Map(m), AttributePathStep::ElementKeyString(name)) => {
                        m.entry(name.clone()).or_insert_with(|| {
                            match path.steps.get(idx + 1) {
                                Some(AttributePathStep::ElementKeyInt(_)) => {
                                    Value::List(Vec::new())
                                }
                                _ => Value::empty_map(),
                            }
                        })
                    }
                    (Value::List(l), AttributePathStep::ElementKeyInt(i)) => {
                        let i = *i as usize;
                        if i >= l.len() {
                            return Err(SynthError::Custom(format!(
                                "list index {} out of bounds",
                                i
                            )));
                        }
                        &mut l[i]
                    }
                    _ => return Err(SynthError::Custom("invalid path navigation".to_string())),
                };
            }
        }

        Err(SynthError::Custom("failed to set value".to_string()))
    }

    /// Remove the value addressed by `path`. Returns the removed value,
    /// or `None` if nothing was stored there.
    pub fn remove_path(&mut self, path: &AttributePath) -> Option<Value> {
        let (last, parents) = path.steps.split_last()?;
        let mut current = self;
        for step in parents {
            current = match (current, step) {
                (Value::Map(m), AttributePathStep::AttributeName(name))
                | (Value::Map(m), AttributePathStep::ElementKeyString(name)) => {
                    m.get_mut(name)?
                }
                (Value::List(l), AttributePathStep::ElementKeyInt(idx)) => {
                    l.get_mut(*idx as usize)?
                }
                _ => return None,
            };
        }
        match (current, last) {
            (Value::Map(m), AttributePathStep::AttributeName(name))
            | (Value::Map(m), AttributePathStep::ElementKeyString(name)) => m.remove(name),
            (Value::List(l), AttributePathStep::ElementKeyInt(idx)) => {
                let idx = *idx as usize;
                if idx < l.len() {
                    Some(l.remove(idx))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Wire codec - Terraform transports attribute data as msgpack
    pub fn encode_msgpack(&self) -> Result<Vec<u8>> {
        match self {
            Value::Null => Ok(vec![]),
            _ => rmp_serde::encode::to_vec(self)
                .map_err(|e| SynthError::EncodingError(format!("msgpack encoding failed: {}", e))),
        }
    }

    pub fn decode_msgpack(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Value::Null);
        }
        rmp_serde::decode::from_slice(data)
            .map_err(|e| SynthError::DecodingError(format!("msgpack decoding failed: {}", e)))
    }

    pub fn encode_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| SynthError::EncodingError(format!("json encoding failed: {}", e)))
    }

    pub fn decode_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| SynthError::DecodingError(format!("json decoding failed: {}", e)))
    }
}

/// AttributePath addresses one attribute within a value tree
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePath {
    pub steps: Vec<AttributePathStep>,
}

impl AttributePath {
    pub fn new(name: &str) -> Self {
        Self {
            steps: vec![AttributePathStep::AttributeName(name.to_string())],
        }
    }

    pub fn root() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.steps
            .push(AttributePathStep::AttributeName(name.to_string()));
        self
    }

    pub fn index(mut self, idx: i64) -> Self {
        self.steps.push(AttributePathStep::ElementKeyInt(idx));
        self
    }

    pub fn key(mut self, key: &str) -> Self {
        self.steps
            .push(AttributePathStep::ElementKeyString(key.to_string()));
        self
    }
}

impl std::fmt::Display for AttributePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, step) in self.steps.iter().enumerate() {
            match step {
                AttributePathStep::AttributeName(name) => {
                    if idx > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                AttributePathStep::ElementKeyInt(i) => write!(f, "[{}]", i)?,
                AttributePathStep::ElementKeyString(k) => write!(f, "[\"{}\"]", k)?,
            }
        }
        Ok(())
    }
}

/// Individual step in an AttributePath
#[derive(Debug, Clone, PartialEq)]
pub enum AttributePathStep {
    /// Access attribute by name in object/map
    AttributeName(String),
    /// Access element by string key (for maps)
    ElementKeyString(String),
    /// Access element by integer index (for lists)
    ElementKeyInt(i64),
}
