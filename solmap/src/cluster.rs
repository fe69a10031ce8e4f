//! Reading the cluster state the port mapping is built from
use k8s_openapi::api::core::v1::{ConfigMap, Service};
use kube::{Api, Client, Resource};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    crd::{HaproxySpec, Role, SolaceScalable},
    error::{Error, Result},
    mapping::{self, DeclaredPort, PortMapping},
};

/// Where to find the `SolaceScalable` and the operator's ingress ConfigMaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Name of the `SolaceScalable` resource
    pub crd_name: String,
    /// Namespace of the `SolaceScalable` resource
    pub crd_namespace: String,
    /// Namespace the operator keeps its ingress ConfigMaps in
    pub operator_namespace: String,
}

/// Port mappings of both roles
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Rows for the publish side
    #[serde(rename = "pub")]
    pub publish: Vec<PortMapping>,
    /// Rows for the subscribe side
    #[serde(rename = "sub")]
    pub subscribe: Vec<PortMapping>,
}

impl Report {
    /// Rows of one role
    pub fn rows(&self, role: Role) -> &[PortMapping] {
        match role {
            Role::Pub => &self.publish,
            Role::Sub => &self.subscribe,
        }
    }

    fn rows_mut(&mut self, role: Role) -> &mut Vec<PortMapping> {
        match role {
            Role::Pub => &mut self.publish,
            Role::Sub => &mut self.subscribe,
        }
    }
}

/// Sequential, read-only access to the objects the mapping needs
#[derive(Clone)]
pub struct Cluster {
    client: Client,
}

impl Cluster {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Read the HAProxy section of the `SolaceScalable`
    pub async fn haproxy(&self, target: &Target) -> Result<HaproxySpec> {
        let api: Api<SolaceScalable> = Api::namespaced(self.client.clone(), &target.crd_namespace);
        let cr = get_named(&api, &target.crd_name, &target.crd_namespace).await?;
        debug!(name = %target.crd_name, namespace = %target.crd_namespace, haproxy = ?cr.spec.haproxy, "read SolaceScalable");
        Ok(cr.spec.haproxy)
    }

    /// Read the values of the role's TCP ingress ConfigMap, ordered by key
    pub async fn ingress_records(&self, role: Role, operator_namespace: &str) -> Result<Vec<String>> {
        let name = role.ingress_config_map(operator_namespace);
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), operator_namespace);
        let cm = get_named(&api, &name, operator_namespace).await?;
        let records: Vec<String> = cm.data.unwrap_or_default().into_values().collect();
        debug!(%role, %name, records = records.len(), "read ingress ConfigMap");
        Ok(records)
    }

    /// Read the ports declared on the HAProxy Service fronting `role`
    pub async fn haproxy_ports(&self, role: Role, haproxy: &HaproxySpec) -> Result<Vec<DeclaredPort>> {
        let name = haproxy.service_name(role);
        let api: Api<Service> = Api::namespaced(self.client.clone(), &haproxy.namespace);
        let svc = get_named(&api, name, &haproxy.namespace).await?;
        let ports = svc.spec.and_then(|s| s.ports).unwrap_or_default();
        debug!(%role, %name, ports = ports.len(), "read HAProxy Service");
        Ok(DeclaredPort::from_service_ports(&ports))
    }

    /// Fetch everything and join both roles, stopping at the first failure
    pub async fn report(&self, target: &Target) -> Result<Report> {
        let haproxy = self.haproxy(target).await?;
        let mut report = Report::default();
        for role in Role::ALL {
            let records = self.ingress_records(role, &target.operator_namespace).await?;
            let ports = self.haproxy_ports(role, &haproxy).await?;
            let rows = mapping::join(role, records.iter().map(String::as_str), &ports)?;
            info!(%role, records = records.len(), rows = rows.len(), "mapped ingress ports");
            *report.rows_mut(role) = rows;
        }
        Ok(report)
    }
}

async fn get_named<K>(api: &Api<K>, name: &str, namespace: &str) -> Result<K>
where
    K: Resource<DynamicType = ()> + Clone + serde::de::DeserializeOwned + std::fmt::Debug,
{
    api.get_opt(name)
        .await
        .map_err(Error::Kube)?
        .ok_or_else(|| Error::ResourceNotFound {
            kind: K::kind(&()).into_owned(),
            name: name.to_string(),
            namespace: namespace.to_string(),
        })
}
