//! Platform lookups for AppOps controllers
//!
//! Resolves the external data the desired-state pipeline depends on:
//! Infinispan credentials, Kafka bootstrap address and topology, and which
//! optional OpenShift APIs the cluster serves.
//!
//! # Example
//!
//! ```no_run
//! use crds::AppService;
//! use platform_client::{KubePlatformClient, PlatformLookup, Capability};
//!
//! # async fn example(app: &AppService) -> Result<(), Box<dyn std::error::Error>> {
//! let client = KubePlatformClient::new(kube::Client::try_default().await?);
//!
//! // Capture every lookup once, then answer synchronously
//! let snapshot = client.snapshot(app).await?;
//! if snapshot.probe_capability(Capability::Route) {
//!     println!("cluster serves routes");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod lookup;
#[cfg(feature = "test-util")]
pub mod mock;
pub mod snapshot;

pub use client::KubePlatformClient;
pub use error::LookupError;
pub use lookup::{BrokerTopology, Capability, Credentials, PlatformLookup};
#[cfg(feature = "test-util")]
pub use mock::MockPlatform;
pub use snapshot::PlatformSnapshot;
