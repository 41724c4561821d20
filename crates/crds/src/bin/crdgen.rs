//! Prints the AppService CRD as YAML.
//!
//! `cargo run -p crds --bin crdgen > config/crd/appservice.yaml`

use crds::AppService;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&AppService::crd())?);
    Ok(())
}
