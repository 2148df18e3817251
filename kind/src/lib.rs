//! Typed bindings for the kind Terraform provider
//!
//! kind runs ephemeral local Kubernetes clusters. These bindings
//! describe the provider's configuration surface as tfsynth schema
//! metadata and expose typed accessors over it. They only synthesize
//! configuration documents; nothing here talks to Docker, kind, or a
//! cluster.

pub mod provider;
pub mod resources;

pub use provider::{KindProvider, KindProviderConfig};
pub use resources::cluster::{
    Cluster, ClusterConfig, ClusterTimeouts, KindConfig, KindConfigNode, NodeMount, PortMapping,
};
