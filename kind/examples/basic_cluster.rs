//! Basic kind cluster stack
//!
//! Declares a single development cluster with defaults and prints the
//! synthesized configuration document.

use kind::{Cluster, ClusterConfig, KindProvider, KindProviderConfig};
use tfsynth::Stack;

fn main() -> tfsynth::Result<()> {
    tracing_subscriber::fmt::init();

    let mut stack = Stack::new("kind-cluster-example");
    stack.add_provider(KindProvider::new(KindProviderConfig::default())?);

    let cluster = Cluster::new(
        "example",
        ClusterConfig {
            name: "my-development-cluster".to_string(),
            ..Default::default()
        },
    )?;

    // Connection material is only known after apply
    println!("endpoint before apply: {:?}", cluster.endpoint());

    stack.add_resource(cluster)?;

    let document = stack.synth()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&document).expect("render document")
    );
    Ok(())
}
