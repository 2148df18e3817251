//! End-to-end synthesis tests for the kind cluster bindings

use kind::{
    Cluster, ClusterConfig, ClusterTimeouts, KindConfig, KindConfigNode, KindProvider,
    KindProviderConfig, NodeMount, PortMapping,
};
use serde_json::json;
use tfsynth::{AttributePath, Resource, Stack, Value};

fn cluster_with_nodes(nodes: Vec<KindConfigNode>) -> Cluster {
    Cluster::new(
        "test",
        ClusterConfig {
            name: "dev-cluster".to_string(),
            kind_config: Some(KindConfig {
                kind: Some("Cluster".to_string()),
                api_version: Some("kind.x-k8s.io/v1alpha4".to_string()),
                nodes: Some(nodes),
            }),
            ..Default::default()
        },
    )
    .unwrap()
}

#[test]
fn minimal_cluster_emits_name_only() {
    let cluster = Cluster::new(
        "test",
        ClusterConfig {
            name: "dev-cluster".to_string(),
            ..Default::default()
        },
    )
    .unwrap();

    let wire = cluster.synthesize_attributes().unwrap();
    assert_eq!(
        serde_json::to_value(&wire).unwrap(),
        json!({ "name": "dev-cluster" })
    );
}

#[test]
fn two_port_mappings_keep_insertion_order() {
    let cluster = cluster_with_nodes(vec![KindConfigNode {
        role: "control-plane".to_string(),
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
        ]),
        ..Default::default()
    }]);

    let wire = cluster.synthesize_attributes().unwrap();
    let document = serde_json::to_value(&wire).unwrap();
    assert_eq!(
        document["kind_config"]["node"][0]["extra_port_mappings"],
        json!([
            { "container_port": 80, "host_port": 8080, "protocol": "TCP" },
            { "container_port": 443, "host_port": 8443, "protocol": "TCP" }
        ])
    );
}

#[test]
fn node_blocks_round_trip_through_the_list_wrapper() {
    let cluster = cluster_with_nodes(vec![
        KindConfigNode {
            role: "control-plane".to_string(),
            kubeadm_config_patches: Some(vec!["patch-a".to_string()]),
            ..Default::default()
        },
        KindConfigNode {
            role: "worker".to_string(),
            extra_mounts: Some(vec![NodeMount {
                host_path: "/tmp/shared".to_string(),
                container_path: "/shared".to_string(),
                readonly: Some(true),
                ..Default::default()
            }]),
            ..Default::default()
        },
        KindConfigNode {
            role: "worker".to_string(),
            ..Default::default()
        },
    ]);

    let config = cluster.kind_config().unwrap().unwrap();
    let nodes = config.block_list("node").unwrap();
    assert_eq!(nodes.len(), 3);
    assert!(!nodes.wraps_set());

    assert_eq!(nodes.get(0).unwrap().get_string("role").unwrap(), "control-plane");
    assert_eq!(nodes.get(1).unwrap().get_string("role").unwrap(), "worker");
    assert_eq!(nodes.get(2).unwrap().get_string("role").unwrap(), "worker");

    let mounts = nodes.get(1).unwrap().block_list("extra_mounts").unwrap();
    assert_eq!(mounts.len(), 1);
    let mount = mounts.get(0).unwrap();
    assert_eq!(mount.get_string("host_path").unwrap(), "/tmp/shared");
    assert_eq!(mount.get_string("container_path").unwrap(), "/shared");
    assert!(mount.get_bool("readonly").unwrap());
}

#[test]
fn nested_list_is_reachable_by_path() {
    let cluster = cluster_with_nodes(vec![KindConfigNode {
        role: "control-plane".to_string(),
        ..Default::default()
    }]);

    let nodes = cluster
        .data()
        .block_list(&AttributePath::new("kind_config").attribute("node"))
        .unwrap();
    assert_eq!(nodes.len(), 1);
}

#[test]
fn computed_outputs_stay_deferred_until_hydration() {
    let mut cluster = Cluster::new(
        "test",
        ClusterConfig {
            name: "dev-cluster".to_string(),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(cluster.endpoint(), Value::Unknown);
    assert_eq!(cluster.cluster_ca_certificate(), Value::Unknown);

    cluster
        .hydrate(
            Value::decode_json(
                json!({
                    "endpoint": "https://127.0.0.1:6443",
                    "cluster_ca_certificate": "Y2EtZGF0YQ=="
                })
                .to_string()
                .as_bytes(),
            )
            .unwrap(),
        )
        .unwrap();

    assert_eq!(
        cluster.endpoint(),
        Value::String("https://127.0.0.1:6443".to_string())
    );
    assert_eq!(
        cluster.cluster_ca_certificate(),
        Value::String("Y2EtZGF0YQ==".to_string())
    );
}

#[test]
fn preview_tags_blocks_and_attributes() {
    let mut cluster = cluster_with_nodes(vec![KindConfigNode {
        role: "control-plane".to_string(),
        ..Default::default()
    }]);
    cluster
        .put_timeouts(ClusterTimeouts {
            create: Some("10m".to_string()),
            delete: None,
        })
        .unwrap();

    let preview = serde_json::to_value(cluster.synthesize_hcl().unwrap()).unwrap();

    assert_eq!(preview["name"]["is_block"], json!(false));
    assert_eq!(preview["name"]["type"], json!("simple"));
    assert_eq!(preview["name"]["storage_class_type"], json!("string"));

    assert_eq!(preview["kind_config"]["is_block"], json!(true));
    assert_eq!(preview["kind_config"]["type"], json!("list"));
    assert_eq!(
        preview["kind_config"]["storage_class_type"],
        json!("KindConfigList")
    );

    assert_eq!(preview["timeouts"]["is_block"], json!(true));
    assert_eq!(preview["timeouts"]["type"], json!("struct"));
    assert_eq!(preview["timeouts"]["storage_class_type"], json!("Timeouts"));

    // unset attributes never appear, even tagged
    assert!(preview.get("node_image").is_none());
}

#[test]
fn stack_document_carries_provider_and_cluster() {
    let mut stack = Stack::new("kind-cluster-example");
    stack.add_provider(
        KindProvider::new(KindProviderConfig {
            docker_host: Some("unix:///var/run/docker.sock".to_string()),
            alias: None,
        })
        .unwrap(),
    );
    stack
        .add_resource(
            Cluster::new(
                "example",
                ClusterConfig {
                    name: "my-development-cluster".to_string(),
                    wait_for_ready: Some(true),
                    ..Default::default()
                },
            )
            .unwrap(),
        )
        .unwrap();

    let document = stack.synth().unwrap();
    assert_eq!(
        document,
        json!({
            "terraform": {
                "required_providers": {
                    "kind": { "source": "kind.local/platform/kind", "version": "0.1.3" }
                }
            },
            "provider": {
                "kind": [ { "docker_host": "unix:///var/run/docker.sock" } ]
            },
            "resource": {
                "kind_cluster": {
                    "example": {
                        "name": "my-development-cluster",
                        "wait_for_ready": true
                    }
                }
            }
        })
    );
}
