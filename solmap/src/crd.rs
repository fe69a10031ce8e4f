//! The `SolaceScalable` custom resource, reduced to what the port mapping reads
#![allow(missing_docs)]
use std::fmt;

use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Spec of a `SolaceScalable`
///
/// Only the HAProxy front-end is modelled; the remaining fields of the
/// operator's spec are ignored on deserialization.
#[derive(CustomResource, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[kube(
    group = "scalable.solace.io",
    version = "v1alpha1",
    kind = "SolaceScalable",
    namespaced,
    schema = "disabled"
)]
pub struct SolaceScalableSpec {
    pub haproxy: HaproxySpec,
}

/// Where HAProxy runs and which Services front the two roles
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HaproxySpec {
    pub namespace: String,
    pub publish: HaproxyService,
    pub subscribe: HaproxyService,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HaproxyService {
    pub service_name: String,
}

impl HaproxySpec {
    /// Name of the HAProxy Service fronting `role`
    pub fn service_name(&self, role: Role) -> &str {
        match role {
            Role::Pub => &self.publish.service_name,
            Role::Sub => &self.subscribe.service_name,
        }
    }
}

/// Publish or subscribe side of the HAProxy front-end
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pub,
    Sub,
}

impl Role {
    /// Both roles, in reporting order
    pub const ALL: [Role; 2] = [Role::Pub, Role::Sub];

    /// Short name used in ConfigMap names and table headers
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pub => "pub",
            Role::Sub => "sub",
        }
    }

    /// Name of the TCP ingress ConfigMap the operator keeps for this role
    pub fn ingress_config_map(&self, operator_namespace: &str) -> String {
        format!("{}-{}-tcp-ingress", operator_namespace, self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
