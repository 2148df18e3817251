//! Deployment graph and document emission
//!
//! Bindings register with a `Stack`, which emits the final configuration
//! document for the orchestration host: required provider versions,
//! provider blocks, and resource attribute maps.

use crate::error::{Result, SynthError};
use crate::hcl::HclAttribute;
use crate::value::Value;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

/// Provider source address and version constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRequirement {
    pub source: String,
    pub version: String,
}

/// A provider binding that can synthesize its configuration block
pub trait Provider {
    /// Provider type name, e.g. "kind"
    fn provider_type(&self) -> &str;
    fn requirement(&self) -> ProviderRequirement;
    fn synthesize_attributes(&self) -> Result<Value>;
    fn synthesize_hcl(&self) -> Result<HashMap<String, HclAttribute>>;
}

/// A resource binding that can synthesize its attribute map
pub trait Resource {
    /// Resource type name, e.g. "kind_cluster"
    fn resource_type(&self) -> &str;
    /// Name of this instance within the stack
    fn local_name(&self) -> &str;
    fn synthesize_attributes(&self) -> Result<Value>;
    fn synthesize_hcl(&self) -> Result<HashMap<String, HclAttribute>>;
}

/// Named collection of bindings, synthesized in one pass.
pub struct Stack {
    name: String,
    providers: Vec<Box<dyn Provider>>,
    resources: Vec<Box<dyn Resource>>,
}

impl Stack {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            providers: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_provider(&mut self, provider: impl Provider + 'static) {
        self.providers.push(Box::new(provider));
    }

    /// Register a resource. The `type.name` address must be unique
    /// within the stack.
    pub fn add_resource(&mut self, resource: impl Resource + 'static) -> Result<()> {
        let address = format!("{}.{}", resource.resource_type(), resource.local_name());
        if self
            .resources
            .iter()
            .any(|r| r.resource_type() == resource.resource_type()
                && r.local_name() == resource.local_name())
        {
            return Err(SynthError::DuplicateAddress(address));
        }
        self.resources.push(Box::new(resource));
        Ok(())
    }

    /// Emit the wire configuration document.
    pub fn synth(&self) -> Result<serde_json::Value> {
        self.emit(
            |provider: &dyn Provider| to_json(provider.synthesize_attributes()?),
            |resource: &dyn Resource| to_json(resource.synthesize_attributes()?),
        )
    }

    /// Emit the display document with block/attribute tags, for plan
    /// previews.
    pub fn synth_preview(&self) -> Result<serde_json::Value> {
        self.emit(
            |provider: &dyn Provider| to_json(provider.synthesize_hcl()?),
            |resource: &dyn Resource| to_json(resource.synthesize_hcl()?),
        )
    }

    fn emit(
        &self,
        provider_attrs: impl Fn(&dyn Provider) -> Result<serde_json::Value>,
        resource_attrs: impl Fn(&dyn Resource) -> Result<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let mut required = serde_json::Map::new();
        let mut providers = serde_json::Map::new();
        for provider in &self.providers {
            tracing::debug!(provider = provider.provider_type(), "synthesizing provider");
            let requirement = provider.requirement();
            required.insert(
                provider.provider_type().to_string(),
                json!({ "source": requirement.source, "version": requirement.version }),
            );
            let attrs = provider_attrs(provider.as_ref())?;
            match providers.get_mut(provider.provider_type()) {
                Some(serde_json::Value::Array(blocks)) => blocks.push(attrs),
                _ => {
                    providers.insert(
                        provider.provider_type().to_string(),
                        serde_json::Value::Array(vec![attrs]),
                    );
                }
            }
        }

        let mut resources = serde_json::Map::new();
        for resource in &self.resources {
            tracing::debug!(
                resource = resource.resource_type(),
                name = resource.local_name(),
                "synthesizing resource"
            );
            let attrs = resource_attrs(resource.as_ref())?;
            match resources.get_mut(resource.resource_type()) {
                Some(serde_json::Value::Object(instances)) => {
                    instances.insert(resource.local_name().to_string(), attrs);
                }
                _ => {
                    let mut instances = serde_json::Map::new();
                    instances.insert(resource.local_name().to_string(), attrs);
                    resources.insert(
                        resource.resource_type().to_string(),
                        serde_json::Value::Object(instances),
                    );
                }
            }
        }

        let mut document = serde_json::Map::new();
        if !required.is_empty() {
            document.insert(
                "terraform".to_string(),
                json!({ "required_providers": required }),
            );
        }
        if !providers.is_empty() {
            document.insert("provider".to_string(), serde_json::Value::Object(providers));
        }
        if !resources.is_empty() {
            document.insert("resource".to_string(), serde_json::Value::Object(resources));
        }
        Ok(serde_json::Value::Object(document))
    }
}

fn to_json(value: impl Serialize) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| SynthError::EncodingError(format!("document encoding failed: {}", e)))
}
