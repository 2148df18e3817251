//! Bindings for the kind provider block

use std::collections::HashMap;
use tfsynth::{
    synthesize_attributes, synthesize_hcl_attributes, AttributeBuilder, AttributePath,
    HclAttribute, Provider, ProviderRequirement, ResourceData, Result, Schema, SchemaBuilder,
    Value,
};

const PROVIDER_SOURCE: &str = "kind.local/platform/kind";
const PROVIDER_VERSION: &str = "0.1.3";

/// Configuration for the kind provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KindProviderConfig {
    /// Docker daemon host
    pub docker_host: Option<String>,
    /// Alias name
    pub alias: Option<String>,
}

impl From<KindProviderConfig> for Value {
    fn from(config: KindProviderConfig) -> Self {
        let mut attrs = HashMap::new();
        if let Some(docker_host) = config.docker_host {
            attrs.insert("docker_host".to_string(), Value::String(docker_host));
        }
        if let Some(alias) = config.alias {
            attrs.insert("alias".to_string(), Value::String(alias));
        }
        Value::Map(attrs)
    }
}

/// The kind provider binding
#[derive(Debug, Clone)]
pub struct KindProvider {
    data: ResourceData,
}

impl KindProvider {
    pub const TYPE_NAME: &'static str = "kind";

    pub fn new(config: KindProviderConfig) -> Result<Self> {
        let data = ResourceData::with_input(Self::schema_static(), config.into())?;
        Ok(Self { data })
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .attribute(
                AttributeBuilder::string("docker_host")
                    .optional()
                    .description("Docker daemon host")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("alias")
                    .optional()
                    .description("Alias name")
                    .build(),
            )
            .build()
    }

    pub fn docker_host(&self) -> Option<String> {
        self.string_at("docker_host")
    }

    pub fn set_docker_host(&mut self, value: impl Into<String>) -> Result<()> {
        self.data.set_string(&AttributePath::new("docker_host"), value)
    }

    pub fn reset_docker_host(&mut self) {
        self.data.reset(&AttributePath::new("docker_host"));
    }

    pub fn alias(&self) -> Option<String> {
        self.string_at("alias")
    }

    pub fn set_alias(&mut self, value: impl Into<String>) -> Result<()> {
        self.data.set_string(&AttributePath::new("alias"), value)
    }

    pub fn reset_alias(&mut self) {
        self.data.reset(&AttributePath::new("alias"));
    }

    fn string_at(&self, name: &str) -> Option<String> {
        match self.data.get(&AttributePath::new(name)) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl Provider for KindProvider {
    fn provider_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn requirement(&self) -> ProviderRequirement {
        ProviderRequirement {
            source: PROVIDER_SOURCE.to_string(),
            version: PROVIDER_VERSION.to_string(),
        }
    }

    fn synthesize_attributes(&self) -> Result<Value> {
        synthesize_attributes(&self.data.schema().block, self.data.input())
    }

    fn synthesize_hcl(&self) -> Result<HashMap<String, HclAttribute>> {
        synthesize_hcl_attributes(&self.data.schema().block, self.data.input())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_provider_synthesizes_empty_block() {
        let provider = KindProvider::new(KindProviderConfig::default()).unwrap();
        let wire = provider.synthesize_attributes().unwrap();
        assert!(wire.as_map().unwrap().is_empty());
    }

    #[test]
    fn docker_host_set_and_reset() {
        let mut provider = KindProvider::new(KindProviderConfig::default()).unwrap();
        provider.set_docker_host("unix:///var/run/docker.sock").unwrap();
        assert_eq!(
            provider.docker_host(),
            Some("unix:///var/run/docker.sock".to_string())
        );

        provider.reset_docker_host();
        assert_eq!(provider.docker_host(), None);
    }

    #[test]
    fn requirement_pins_source_and_version() {
        let provider = KindProvider::new(KindProviderConfig::default()).unwrap();
        let requirement = provider.requirement();
        assert_eq!(requirement.source, "kind.local/platform/kind");
        assert_eq!(requirement.version, "0.1.3");
    }

    #[test]
    fn aliased_provider_carries_alias_attribute() {
        let provider = KindProvider::new(KindProviderConfig {
            docker_host: None,
            alias: Some("secondary".to_string()),
        })
        .unwrap();

        let wire = provider.synthesize_attributes().unwrap();
        assert_eq!(
            wire.as_map().unwrap()["alias"],
            Value::String("secondary".to_string())
        );
    }
}
