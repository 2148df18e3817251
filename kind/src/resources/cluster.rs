//! Bindings for the kind_cluster resource
//!
//! A kind cluster is declared by name plus an optional kind_config
//! block mirroring the kind.x-k8s.io/v1alpha4 cluster document: nodes
//! with roles, port mappings, kubeadm patches, and host mounts.
//! Connection material (endpoint, certificates, kubeconfig path) is
//! computed by the provider after apply.

use std::collections::HashMap;
use tfsynth::{
    synthesize_attributes, synthesize_hcl_attributes, AttributeBuilder, AttributePath,
    AttributeType, BlockBuilder, BlockElement, HclAttribute, NestedBlock, Resource, ResourceData,
    Result, Schema, SchemaBuilder, Value,
};

/// Configuration for a kind_cluster resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterConfig {
    /// The name of the Kind cluster
    pub name: String,
    pub id: Option<String>,
    /// Docker image to use for cluster nodes
    pub node_image: Option<String>,
    /// Wait for the cluster to be ready
    pub wait_for_ready: Option<bool>,
    pub kind_config: Option<KindConfig>,
    pub timeouts: Option<ClusterTimeouts>,
}

/// kind_config block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KindConfig {
    pub kind: Option<String>,
    pub api_version: Option<String>,
    pub nodes: Option<Vec<KindConfigNode>>,
}

/// One node entry of the kind_config block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KindConfigNode {
    pub role: String,
    pub extra_port_mappings: Option<Vec<PortMapping>>,
    pub kubeadm_config_patches: Option<Vec<String>>,
    pub extra_mounts: Option<Vec<NodeMount>>,
}

/// Container-to-host port mapping for a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortMapping {
    pub container_port: i64,
    pub host_port: i64,
    pub protocol: Option<String>,
}

/// Host volume mount for a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMount {
    /// Path on the host to mount
    pub host_path: String,
    /// Path in the container to mount to
    pub container_path: String,
    pub readonly: Option<bool>,
    pub selinux_relabel: Option<bool>,
    pub propagation: Option<String>,
}

/// timeouts block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterTimeouts {
    pub create: Option<String>,
    pub delete: Option<String>,
}

impl From<ClusterConfig> for Value {
    fn from(config: ClusterConfig) -> Self {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String(config.name));
        if let Some(id) = config.id {
            attrs.insert("id".to_string(), Value::String(id));
        }
        if let Some(image) = config.node_image {
            attrs.insert("node_image".to_string(), Value::String(image));
        }
        if let Some(wait) = config.wait_for_ready {
            attrs.insert("wait_for_ready".to_string(), Value::Bool(wait));
        }
        if let Some(kind_config) = config.kind_config {
            attrs.insert("kind_config".to_string(), kind_config.into());
        }
        if let Some(timeouts) = config.timeouts {
            attrs.insert("timeouts".to_string(), timeouts.into());
        }
        Value::Map(attrs)
    }
}

impl From<KindConfig> for Value {
    fn from(config: KindConfig) -> Self {
        let mut attrs = HashMap::new();
        if let Some(kind) = config.kind {
            attrs.insert("kind".to_string(), Value::String(kind));
        }
        if let Some(api_version) = config.api_version {
            attrs.insert("api_version".to_string(), Value::String(api_version));
        }
        if let Some(nodes) = config.nodes {
            attrs.insert(
                "node".to_string(),
                Value::List(nodes.into_iter().map(Value::from).collect()),
            );
        }
        Value::Map(attrs)
    }
}

impl From<KindConfigNode> for Value {
    fn from(node: KindConfigNode) -> Self {
        let mut attrs = HashMap::new();
        attrs.insert("role".to_string(), Value::String(node.role));
        if let Some(mappings) = node.extra_port_mappings {
            attrs.insert(
                "extra_port_mappings".to_string(),
                Value::List(mappings.into_iter().map(Value::from).collect()),
            );
        }
        if let Some(patches) = node.kubeadm_config_patches {
            attrs.insert(
                "kubeadm_config_patches".to_string(),
                Value::List(patches.into_iter().map(Value::String).collect()),
            );
        }
        if let Some(mounts) = node.extra_mounts {
            attrs.insert(
                "extra_mounts".to_string(),
                Value::List(mounts.into_iter().map(Value::from).collect()),
            );
        }
        Value::Map(attrs)
    }
}

impl From<PortMapping> for Value {
    fn from(mapping: PortMapping) -> Self {
        let mut attrs = HashMap::new();
        attrs.insert(
            "container_port".to_string(),
            Value::Number(mapping.container_port as f64),
        );
        attrs.insert(
            "host_port".to_string(),
            Value::Number(mapping.host_port as f64),
        );
        if let Some(protocol) = mapping.protocol {
            attrs.insert("protocol".to_string(), Value::String(protocol));
        }
        Value::Map(attrs)
    }
}

impl From<NodeMount> for Value {
    fn from(mount: NodeMount) -> Self {
        let mut attrs = HashMap::new();
        attrs.insert("host_path".to_string(), Value::String(mount.host_path));
        attrs.insert(
            "container_path".to_string(),
            Value::String(mount.container_path),
        );
        if let Some(readonly) = mount.readonly {
            attrs.insert("readonly".to_string(), Value::Bool(readonly));
        }
        if let Some(relabel) = mount.selinux_relabel {
            attrs.insert("selinux_relabel".to_string(), Value::Bool(relabel));
        }
        if let Some(propagation) = mount.propagation {
            attrs.insert("propagation".to_string(), Value::String(propagation));
        }
        Value::Map(attrs)
    }
}

impl From<ClusterTimeouts> for Value {
    fn from(timeouts: ClusterTimeouts) -> Self {
        let mut attrs = HashMap::new();
        if let Some(create) = timeouts.create {
            attrs.insert("create".to_string(), Value::String(create));
        }
        if let Some(delete) = timeouts.delete {
            attrs.insert("delete".to_string(), Value::String(delete));
        }
        Value::Map(attrs)
    }
}

/// The kind_cluster resource binding
#[derive(Debug, Clone)]
pub struct Cluster {
    local_name: String,
    data: ResourceData,
}

impl Cluster {
    pub const TYPE_NAME: &'static str = "kind_cluster";

    pub fn new(local_name: &str, config: ClusterConfig) -> Result<Self> {
        let data = ResourceData::with_input(Self::schema_static(), config.into())?;
        Ok(Self {
            local_name: local_name.to_string(),
            data,
        })
    }

    pub fn schema_static() -> Schema {
        let extra_port_mappings = BlockBuilder::new()
            .attribute(AttributeBuilder::number("container_port").required().build())
            .attribute(AttributeBuilder::number("host_port").required().build())
            .attribute(AttributeBuilder::string("protocol").optional().build())
            .build();

        let extra_mounts = BlockBuilder::new()
            .description("Extra volume mounts from host to container")
            .attribute(
                AttributeBuilder::string("host_path")
                    .required()
                    .description("Path on the host to mount")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("container_path")
                    .required()
                    .description("Path in the container to mount to")
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("readonly")
                    .optional()
                    .description("Mount as read-only")
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("selinux_relabel")
                    .optional()
                    .description("Enable SELinux relabeling")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("propagation")
                    .optional()
                    .description("Mount propagation mode")
                    .build(),
            )
            .build();

        let node = BlockBuilder::new()
            .attribute(AttributeBuilder::string("role").required().build())
            .attribute(
                AttributeBuilder::list("kubeadm_config_patches", AttributeType::String)
                    .optional()
                    .build(),
            )
            .block(NestedBlock::list("extra_port_mappings", extra_port_mappings))
            .block(NestedBlock::list("extra_mounts", extra_mounts))
            .build();

        let kind_config = BlockBuilder::new()
            .description("Kind cluster configuration")
            .attribute(AttributeBuilder::string("kind").optional().build())
            .attribute(AttributeBuilder::string("api_version").optional().build())
            .block(NestedBlock::list("node", node))
            .build();

        let timeouts = BlockBuilder::new()
            .attribute(AttributeBuilder::string("create").optional().build())
            .attribute(AttributeBuilder::string("delete").optional().build())
            .build();

        SchemaBuilder::new()
            .attribute(
                AttributeBuilder::string("name")
                    .required()
                    .description("The name of the Kind cluster")
                    .build(),
            )
            .attribute(AttributeBuilder::string("id").optional().computed().build())
            .attribute(
                AttributeBuilder::string("node_image")
                    .optional()
                    .description("Docker image to use for cluster nodes")
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("wait_for_ready")
                    .optional()
                    .description("Wait for the cluster to be ready")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("kubeconfig_path")
                    .computed()
                    .description("Path to the kubeconfig file")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("endpoint")
                    .computed()
                    .description("Kubernetes API server endpoint")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("cluster_ca_certificate")
                    .computed()
                    .sensitive()
                    .description("Cluster CA certificate (base64 encoded)")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("client_certificate")
                    .computed()
                    .sensitive()
                    .description("Client certificate (base64 encoded)")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("client_key")
                    .computed()
                    .sensitive()
                    .description("Client key (base64 encoded)")
                    .build(),
            )
            .block(NestedBlock::list("kind_config", kind_config).max_items(1))
            .block(NestedBlock::single("timeouts", timeouts))
            .build()
    }

    // name - required
    pub fn name(&self) -> Option<String> {
        self.string_at("name")
    }

    pub fn set_name(&mut self, value: impl Into<String>) -> Result<()> {
        self.data.set_string(&AttributePath::new("name"), value)
    }

    // node_image - optional
    pub fn node_image(&self) -> Option<String> {
        self.string_at("node_image")
    }

    pub fn set_node_image(&mut self, value: impl Into<String>) -> Result<()> {
        self.data.set_string(&AttributePath::new("node_image"), value)
    }

    pub fn reset_node_image(&mut self) {
        self.data.reset(&AttributePath::new("node_image"));
    }

    // wait_for_ready - optional
    pub fn wait_for_ready(&self) -> Option<bool> {
        match self.data.get(&AttributePath::new("wait_for_ready")) {
            Some(Value::Bool(b)) => Some(b),
            _ => None,
        }
    }

    pub fn set_wait_for_ready(&mut self, value: bool) -> Result<()> {
        self.data.set_bool(&AttributePath::new("wait_for_ready"), value)
    }

    pub fn reset_wait_for_ready(&mut self) {
        self.data.reset(&AttributePath::new("wait_for_ready"));
    }

    // id - optional + computed
    pub fn set_id(&mut self, value: impl Into<String>) -> Result<()> {
        self.data.set_string(&AttributePath::new("id"), value)
    }

    pub fn reset_id(&mut self) {
        self.data.reset(&AttributePath::new("id"));
    }

    pub fn id(&self) -> Value {
        self.computed("id")
    }

    // computed outputs, resolved by the provider after apply
    pub fn kubeconfig_path(&self) -> Value {
        self.computed("kubeconfig_path")
    }

    pub fn endpoint(&self) -> Value {
        self.computed("endpoint")
    }

    pub fn cluster_ca_certificate(&self) -> Value {
        self.computed("cluster_ca_certificate")
    }

    pub fn client_certificate(&self) -> Value {
        self.computed("client_certificate")
    }

    pub fn client_key(&self) -> Value {
        self.computed("client_key")
    }

    // kind_config block
    pub fn kind_config(&self) -> Result<Option<BlockElement>> {
        self.data.block(&AttributePath::new("kind_config"))
    }

    pub fn put_kind_config(&mut self, config: KindConfig) -> Result<()> {
        self.data.set(&AttributePath::new("kind_config"), config.into())
    }

    pub fn reset_kind_config(&mut self) {
        self.data.reset(&AttributePath::new("kind_config"));
    }

    // timeouts block
    pub fn timeouts(&self) -> Result<Option<BlockElement>> {
        self.data.block(&AttributePath::new("timeouts"))
    }

    pub fn put_timeouts(&mut self, timeouts: ClusterTimeouts) -> Result<()> {
        self.data.set(&AttributePath::new("timeouts"), timeouts.into())
    }

    pub fn reset_timeouts(&mut self) {
        self.data.reset(&AttributePath::new("timeouts"));
    }

    /// Install remote state resolved by the provider's apply step.
    pub fn hydrate(&mut self, remote: Value) -> Result<()> {
        tracing::debug!(resource = Self::TYPE_NAME, name = %self.local_name, "hydrating");
        self.data.hydrate(remote)
    }

    pub fn data(&self) -> &ResourceData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ResourceData {
        &mut self.data
    }

    fn computed(&self, name: &str) -> Value {
        self.data
            .get(&AttributePath::new(name))
            .unwrap_or(Value::Unknown)
    }

    fn string_at(&self, name: &str) -> Option<String> {
        match self.data.get(&AttributePath::new(name)) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl Resource for Cluster {
    fn resource_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn local_name(&self) -> &str {
        &self.local_name
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
    use tfsynth::SynthError;

    fn minimal() -> Cluster {
        Cluster::new(
            "test",
            ClusterConfig {
                name: "dev-cluster".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn schema_marks_connection_material_sensitive() {
        let schema = Cluster::schema_static();
        for name in ["cluster_ca_certificate", "client_certificate", "client_key"] {
            let attr = schema.block.attribute(name).unwrap();
            assert!(attr.computed, "{} should be computed", name);
            assert!(attr.sensitive, "{} should be sensitive", name);
        }
        let endpoint = schema.block.attribute("endpoint").unwrap();
        assert!(endpoint.computed);
        assert!(!endpoint.sensitive);
    }

    #[test]
    fn config_conversion_omits_unset_optionals() {
        let value: Value = ClusterConfig {
            name: "dev-cluster".to_string(),
            ..Default::default()
        }
        .into();

        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["name"], Value::String("dev-cluster".to_string()));
    }

    #[test]
    fn minimal_cluster_synthesizes_name_only() {
        let cluster = minimal();
        let wire = cluster.synthesize_attributes().unwrap();

        let map = wire.as_map().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["name"], Value::String("dev-cluster".to_string()));
    }

    #[test]
    fn reset_node_image_reads_back_unset() {
        let mut cluster = minimal();
        cluster.set_node_image("kindest/node:v1.28.0").unwrap();
        assert_eq!(
            cluster.node_image(),
            Some("kindest/node:v1.28.0".to_string())
        );

        cluster.reset_node_image();
        assert_eq!(cluster.node_image(), None);

        let wire = cluster.synthesize_attributes().unwrap();
        assert!(!wire.as_map().unwrap().contains_key("node_image"));
    }

    #[test]
    fn computed_outputs_read_as_deferred_before_hydration() {
        let cluster = minimal();
        assert_eq!(cluster.endpoint(), Value::Unknown);
        assert_eq!(cluster.kubeconfig_path(), Value::Unknown);
        assert_eq!(cluster.client_key(), Value::Unknown);
    }

    #[test]
    fn hydration_resolves_computed_outputs() {
        let mut cluster = minimal();
        cluster
            .hydrate(Value::Map(HashMap::from([
                (
                    "endpoint".to_string(),
                    Value::String("https://127.0.0.1:6443".to_string()),
                ),
                (
                    "kubeconfig_path".to_string(),
                    Value::String("/home/dev/.kube/config".to_string()),
                ),
            ])))
            .unwrap();

        assert_eq!(
            cluster.endpoint(),
            Value::String("https://127.0.0.1:6443".to_string())
        );
        assert_eq!(
            cluster.kubeconfig_path(),
            Value::String("/home/dev/.kube/config".to_string())
        );
        // not part of the hydrated state, still deferred
        assert_eq!(cluster.client_certificate(), Value::Unknown);
    }

    #[test]
    fn put_and_reset_kind_config() {
        let mut cluster = minimal();
        cluster
            .put_kind_config(KindConfig {
                kind: Some("Cluster".to_string()),
                api_version: Some("kind.x-k8s.io/v1alpha4".to_string()),
                nodes: None,
            })
            .unwrap();

        let config = cluster.kind_config().unwrap().unwrap();
        assert_eq!(config.get_string("kind").unwrap(), "Cluster");

        cluster.reset_kind_config();
        assert!(cluster.kind_config().unwrap().is_none());
    }

    #[test]
    fn compound_literal_for_scalar_fails_at_synthesis() {
        let mut cluster = minimal();
        cluster
            .data_mut()
            .set(&AttributePath::new("name"), Value::Map(HashMap::new()))
            .unwrap();

        let err = cluster.synthesize_attributes().unwrap_err();
        assert!(matches!(err, SynthError::InvalidConfiguration(_)));
    }
}
