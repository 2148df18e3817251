//! Advanced kind cluster stack
//!
//! A production-like topology: one control-plane with ingress port
//! mappings and a kubeadm patch, workers with host mounts, explicit
//! timeouts. Prints both the wire document and the tagged preview.

use kind::{
    Cluster, ClusterConfig, ClusterTimeouts, KindConfig, KindConfigNode, KindProvider,
    KindProviderConfig, NodeMount, PortMapping,
};
use tfsynth::Stack;

const INGRESS_PATCH: &str = "kind: InitConfiguration\n\
nodeRegistration:\n\
  kubeletExtraArgs:\n\
    node-labels: \"ingress-ready=true\"\n\
    authorization-mode: \"Webhook\"\n";

fn main() -> tfsynth::Result<()> {
    tracing_subscriber::fmt::init();

    let mut stack = Stack::new("advanced-kind-cluster");
    stack.add_provider(KindProvider::new(KindProviderConfig::default())?);

    let control_plane = KindConfigNode {
        role: "control-plane".to_string(),
        kubeadm_config_patches: Some(vec![INGRESS_PATCH.to_string()]),
        extra_port_mappings: Some(vec![
            PortMapping {
                container_port: 80,
                host_port: 8080,
                protocol: Some("TCP".to_string()),
            },
            PortMapping {
                container_port: 443,
                host_port: 8443,
                protocol: Some("TCP".to_string()),
            },
            PortMapping {
                container_port: 30000,
                host_port: 30000,
                protocol: Some("TCP".to_string()),
            },
        ]),
        ..Default::default()
    };

    let data_worker = KindConfigNode {
        role: "worker".to_string(),
        extra_mounts: Some(vec![NodeMount {
            host_path: "/tmp/kind-data".to_string(),
            container_path: "/data".to_string(),
            readonly: Some(false),
            ..Default::default()
        }]),
        ..Default::default()
    };

    let log_worker = KindConfigNode {
        role: "worker".to_string(),
        extra_mounts: Some(vec![NodeMount {
            host_path: "/var/log".to_string(),
            container_path: "/host/var/log".to_string(),
            readonly: Some(true),
            propagation: Some("HostToContainer".to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    };

    let cluster = Cluster::new(
        "advanced-cluster",
        ClusterConfig {
            name: "production-like-cluster".to_string(),
            id: None,
            node_image: Some("kindest/node:v1.27.3".to_string()),
            wait_for_ready: Some(true),
            kind_config: Some(KindConfig {
                kind: Some("Cluster".to_string()),
                api_version: Some("kind.x-k8s.io/v1alpha4".to_string()),
                nodes: Some(vec![control_plane, data_worker, log_worker]),
            }),
            timeouts: Some(ClusterTimeouts {
                create: Some("10m".to_string()),
                delete: Some("5m".to_string()),
            }),
        },
    )?;
    stack.add_resource(cluster)?;

    let document = stack.synth()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&document).expect("render document")
    );

    let preview = stack.synth_preview()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&preview).expect("render preview")
    );
    Ok(())
}
