//! Error handling in [`solmap`][crate]
use std::num::ParseIntError;

use thiserror::Error;

/// Possible errors when mapping Solace ports to HAProxy node ports
#[derive(Error, Debug)]
pub enum Error {
    /// A custom resource, ConfigMap or Service does not exist
    #[error("{kind} {name} does not exist in the {namespace} namespace")]
    ResourceNotFound {
        /// Kind of the missing object
        kind: String,
        /// Name that was requested
        name: String,
        /// Namespace that was searched
        namespace: String,
    },

    /// An ingress value does not follow `<ns>/<name>-...-<port>:<solacePort>`
    #[error("malformed ingress record {value:?}: {reason}")]
    MalformedRecord {
        /// The raw ConfigMap value
        value: String,
        /// Which part of the structure is missing
        reason: &'static str,
    },

    /// A port token in an ingress value is not a 32-bit integer
    #[error("invalid port {token:?} in ingress record {value:?}")]
    InvalidPort {
        /// The raw ConfigMap value
        value: String,
        /// The token that failed to parse
        token: String,
        /// Underlying parse failure
        #[source]
        source: ParseIntError,
    },

    /// Cluster credentials could not be loaded or turned into a client
    #[error("failed to load cluster config: {0}")]
    ConfigLoad(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The report could not be serialized as json
    #[error("failed to serialize report as json: {0}")]
    SerializeJson(#[source] serde_json::Error),

    /// The report could not be serialized as yaml
    #[error("failed to serialize report as yaml: {0}")]
    SerializeYaml(#[source] serde_yaml::Error),

    /// Any other failure talking to the apiserver
    #[error("kube api error: {0}")]
    Kube(#[source] kube::Error),
}

/// Convenient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn config_load(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::ConfigLoad(Box::new(err))
    }
}
