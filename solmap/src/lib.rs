//! Map Solace messaging service ports to the node ports HAProxy exposes them on
//!
//! The Solace scalable operator publishes each broker port through HAProxy and records the
//! wiring in two ConfigMaps, `<operator namespace>-pub-tcp-ingress` and
//! `<operator namespace>-sub-tcp-ingress`. This crate reads those records, the
//! `SolaceScalable` custom resource naming the HAProxy Services, and the Services' declared
//! ports, then joins them into one row per reachable port.
//!
//! # Example
//!
//! ```rust,no_run
//! use solmap::{Cluster, OutputMode, Target};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = kube::Client::try_default().await?;
//!     let target = Target {
//!         crd_name: "solacescalable".into(),
//!         crd_namespace: "solacescalable".into(),
//!         operator_namespace: "solacescalable".into(),
//!     };
//!     let report = Cluster::new(client).report(&target).await?;
//!     print!("{}", OutputMode::Table.render(&report)?);
//!     Ok(())
//! }
//! ```
//!
//! The join itself, [`mapping::join`], is a pure function and can be used without a cluster.

pub mod cluster;
pub mod config;
pub mod crd;
pub mod error;
pub mod mapping;
pub mod output;

pub use cluster::{Cluster, Report, Target};
pub use config::{App, MapArgs};
pub use crd::{HaproxySpec, Role, SolaceScalable};
pub use error::{Error, Result};
pub use mapping::{join, DeclaredPort, IngressTarget, PortMapping};
pub use output::OutputMode;
