//! Joining TCP ingress records against the ports HAProxy exposes
//!
//! The operator records one ConfigMap entry per exposed TCP port, with values like
//! `solacescalable/svcA-amqp-1029:5672`: the Solace service name, the service port
//! HAProxy listens on, and the port the Solace broker listens on.
//! HAProxy's Service names each port `tcp-<service port>`, which is what ties the two together.
use std::str::FromStr;

use k8s_openapi::api::core::v1::ServicePort;
use serde::Serialize;
use tracing::trace;

use crate::{
    crd::Role,
    error::{Error, Result},
};

/// One Solace service port and the HAProxy node port that reaches it
#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    /// First `-` segment of the Solace service name
    pub service_name: String,
    /// Port HAProxy exposes for the service
    pub service_port: i32,
    /// Port the Solace broker listens on
    pub solace_port: i32,
    /// Node port Kubernetes assigned to the HAProxy Service port
    pub node_port: i32,
}

/// A port declared on the HAProxy Service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredPort {
    /// Port name, `tcp-<service port>` for ingress ports
    pub name: String,
    /// Assigned node port, `0` when unassigned
    pub node_port: i32,
}

impl DeclaredPort {
    /// Convert the Service's port list, skipping unnamed ports as they can never match
    pub fn from_service_ports(ports: &[ServicePort]) -> Vec<Self> {
        ports
            .iter()
            .filter_map(|p| {
                Some(DeclaredPort {
                    name: p.name.clone()?,
                    node_port: p.node_port.unwrap_or_default(),
                })
            })
            .collect()
    }
}

/// Parsed form of a single ingress ConfigMap value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressTarget {
    /// First `-` segment of the Solace service name
    pub service_name: String,
    /// Last `-` segment of the Solace service name
    pub service_port: i32,
    /// That segment exactly as written, which is what HAProxy port names are built from
    pub service_port_token: String,
    /// Port after the `:`
    pub solace_port: i32,
}

impl IngressTarget {
    /// Name of the HAProxy Service port that carries this target
    pub fn port_name(&self) -> String {
        format!("tcp-{}", self.service_port_token)
    }
}

impl FromStr for IngressTarget {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let malformed = |reason| Error::MalformedRecord {
            value: value.to_string(),
            reason,
        };
        let target = value
            .split('/')
            .nth(1)
            .ok_or_else(|| malformed("missing '/' after the namespace"))?;

        let mut parts = target.split(':');
        let name_port = parts.next().unwrap_or_default();
        let solace_port = parts
            .next()
            .ok_or_else(|| malformed("missing ':' before the solace port"))?;

        let segments: Vec<&str> = name_port.split('-').collect();
        if segments.len() < 3 {
            return Err(malformed("expected at least three '-' separated segments"));
        }
        let service_name = segments[0];
        if service_name.is_empty() {
            return Err(malformed("empty service name"));
        }
        let service_port = segments[segments.len() - 1];

        Ok(IngressTarget {
            service_name: service_name.to_string(),
            service_port: parse_port(value, service_port)?,
            service_port_token: service_port.to_string(),
            solace_port: parse_port(value, solace_port)?,
        })
    }
}

fn parse_port(value: &str, token: &str) -> Result<i32> {
    token.parse().map_err(|source| Error::InvalidPort {
        value: value.to_string(),
        token: token.to_string(),
        source,
    })
}

/// Join ingress values for `role` against the HAProxy Service's declared ports
///
/// Every value must parse, otherwise the whole join fails.
/// Values whose `tcp-<port>` name is not declared produce no row,
/// and a name declared more than once produces one row per declaration.
/// Rows are sorted by service name, then by the port columns.
pub fn join<'a, I>(role: Role, records: I, ports: &[DeclaredPort]) -> Result<Vec<PortMapping>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rows = Vec::new();
    for value in records {
        let target: IngressTarget = value.parse()?;
        trace!(%role, value, ?target, "parsed ingress record");
        let port_name = target.port_name();
        rows.extend(ports.iter().filter(|p| p.name == port_name).map(|p| PortMapping {
            service_name: target.service_name.clone(),
            service_port: target.service_port,
            solace_port: target.solace_port,
            node_port: p.node_port,
        }));
    }
    rows.sort();
    Ok(rows)
}

#[cfg(test)]
mod test {
    use super::*;

    fn declared(ports: &[(&str, i32)]) -> Vec<DeclaredPort> {
        ports
            .iter()
            .map(|(name, node_port)| DeclaredPort {
                name: name.to_string(),
                node_port: *node_port,
            })
            .collect()
    }

    #[test]
    fn parses_well_formed_value() {
        let target: IngressTarget = "solacescalable/svcA-amqp-1029:5672".parse().unwrap();
        assert_eq!(target, IngressTarget {
            service_name: "svcA".into(),
            service_port: 1029,
            service_port_token: "1029".into(),
            solace_port: 5672,
        });
        assert_eq!(target.port_name(), "tcp-1029");
    }

    #[test]
    fn middle_segments_are_discarded() {
        let target: IngressTarget = "ns/broker-mqtt-web-tls-8443:8883".parse().unwrap();
        assert_eq!(target.service_name, "broker");
        assert_eq!(target.service_port, 8443);
        assert_eq!(target.solace_port, 8883);
    }

    #[test]
    fn malformed_values_are_rejected() {
        for value in [
            "no-namespace-1029:5672",
            "ns/svcA-amqp-1029",
            "ns/svcA-1029:5672",
            "ns/-amqp-1029:5672",
            "",
        ] {
            let err = value.parse::<IngressTarget>().unwrap_err();
            assert!(matches!(err, Error::MalformedRecord { .. }), "{value}: {err}");
        }
    }

    #[test]
    fn non_numeric_service_port_is_an_error() {
        let err = "solacescalable/test-botti-1029-amqp-pub:1100"
            .parse::<IngressTarget>()
            .unwrap_err();
        match err {
            Error::InvalidPort { token, .. } => assert_eq!(token, "pub"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn non_numeric_solace_port_is_an_error() {
        for (value, bad) in [("ns/svcA-amqp-1029:amqp", "amqp"), ("ns/svcA-amqp-1029:", "")] {
            match value.parse::<IngressTarget>().unwrap_err() {
                Error::InvalidPort { token, .. } => assert_eq!(token, bad),
                other => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn out_of_range_port_is_an_error() {
        let err = "ns/svcA-amqp-4294967296:5672".parse::<IngressTarget>().unwrap_err();
        assert!(matches!(err, Error::InvalidPort { .. }));
    }

    #[test]
    fn join_matches_on_tcp_port_name() {
        let ports = declared(&[("tcp-1029", 31029), ("http", 30080)]);
        let rows = join(Role::Pub, ["solacescalable/svcA-amqp-1029:5672"], &ports).unwrap();
        assert_eq!(rows, vec![PortMapping {
            service_name: "svcA".into(),
            service_port: 1029,
            solace_port: 5672,
            node_port: 31029,
        }]);
    }

    #[test]
    fn join_drops_unmatched_records() {
        let ports = declared(&[("tcp-1029", 31029)]);
        let rows = join(Role::Sub, ["ns/svcA-mqtt-1883:1883"], &ports).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn join_compares_the_port_token_as_written() {
        let ports = declared(&[("tcp-1029", 31029)]);
        let rows = join(Role::Pub, ["ns/svcA-amqp-+1029:5672"], &ports).unwrap();
        assert!(rows.is_empty());

        let ports = declared(&[("tcp-01029", 31029)]);
        let rows = join(Role::Pub, ["ns/svcA-amqp-01029:5672"], &ports).unwrap();
        assert_eq!(rows, vec![PortMapping {
            service_name: "svcA".into(),
            service_port: 1029,
            solace_port: 5672,
            node_port: 31029,
        }]);
    }

    #[test]
    fn join_emits_one_row_per_matching_port() {
        let ports = declared(&[("tcp-1029", 31029), ("tcp-1029", 32029)]);
        let rows = join(Role::Pub, ["ns/svcA-amqp-1029:5672"], &ports).unwrap();
        let node_ports: Vec<_> = rows.iter().map(|r| r.node_port).collect();
        assert_eq!(node_ports, vec![31029, 32029]);
    }

    #[test]
    fn join_fails_on_first_bad_record() {
        let ports = declared(&[("tcp-1029", 31029)]);
        let res = join(Role::Pub, ["ns/svcA-amqp-1029:5672", "broken"], &ports);
        assert!(matches!(res, Err(Error::MalformedRecord { .. })));
    }

    #[test]
    fn join_sorts_by_service_name() {
        let ports = declared(&[("tcp-1029", 31029), ("tcp-1883", 31883), ("tcp-9000", 39000)]);
        let records = [
            "ns/zeta-mqtt-1883:1883",
            "ns/alpha-rest-9000:9000",
            "ns/mid-amqp-1029:5672",
        ];
        let rows = join(Role::Pub, records, &ports).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.service_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn join_is_idempotent() {
        let ports = declared(&[("tcp-1029", 31029), ("tcp-1883", 31883)]);
        let records = ["ns/b-mqtt-1883:1883", "ns/a-amqp-1029:5672"];
        let first = join(Role::Sub, records, &ports).unwrap();
        let second = join(Role::Sub, records, &ports).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn unnamed_service_ports_are_skipped() {
        let ports = vec![
            ServicePort {
                name: Some("tcp-1029".into()),
                port: 1029,
                node_port: Some(31029),
                ..ServicePort::default()
            },
            ServicePort {
                port: 80,
                ..ServicePort::default()
            },
            ServicePort {
                name: Some("tcp-1883".into()),
                port: 1883,
                ..ServicePort::default()
            },
        ];
        assert_eq!(
            DeclaredPort::from_service_ports(&ports),
            declared(&[("tcp-1029", 31029), ("tcp-1883", 0)])
        );
    }
}
