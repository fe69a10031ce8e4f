//! Command line surface and client configuration
use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config,
};
use tracing::debug;

use crate::{
    cluster::Target,
    error::{Error, Result},
    output::OutputMode,
};

const LONG_ABOUT: &str = "\
Show solace scalable service ports mapping with HAProxy service in tabular mode.

Command example:

  kubectl solmap -n solacescalable -c solaceCrdName";

/// Solace service ports mapping with HAProxy service
#[derive(Parser, Debug)]
#[command(
    name = "kubectl-solmap",
    version,
    long_about = LONG_ABOUT,
    args_conflicts_with_subcommands = true
)]
pub struct App {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    args: MapArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solace service ports mapping with HAProxy service
    #[command(name = "solmap", visible_aliases = ["svcmap", "map"])]
    Solmap(MapArgs),
}

impl App {
    /// Arguments of the mapping, whether given directly or through the subcommand
    pub fn map_args(&self) -> &MapArgs {
        match &self.command {
            Some(Command::Solmap(args)) => args,
            None => &self.args,
        }
    }
}

/// Flags of the port mapping
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MapArgs {
    /// Name of the CRD
    #[arg(short = 'c', long = "crdName", default_value = "solacescalable")]
    pub crd_name: String,

    /// Namespace of the CRD [default: the CRD name]
    #[arg(long = "crdNamespace")]
    pub crd_namespace: Option<String>,

    /// Operator's namespace
    #[arg(short = 'n', long = "operatorNamespace", default_value = "default")]
    pub operator_namespace: String,

    /// Path to the kubeconfig file to use
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// The name of the kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Seconds to wait for each apiserver response
    #[arg(long = "request-timeout", value_name = "SECONDS")]
    pub request_timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub output: OutputMode,
}

impl MapArgs {
    /// Which objects to read
    pub fn target(&self) -> Target {
        Target {
            crd_name: self.crd_name.clone(),
            crd_namespace: self.crd_namespace.clone().unwrap_or_else(|| self.crd_name.clone()),
            operator_namespace: self.operator_namespace.clone(),
        }
    }

    /// Load the client config, honouring `--kubeconfig` and `--context`
    pub async fn kube_config(&self) -> Result<Config> {
        let options = KubeConfigOptions {
            context: self.context.clone(),
            ..KubeConfigOptions::default()
        };
        let mut config = match (&self.kubeconfig, &self.context) {
            (Some(path), _) => {
                debug!(path = %path.display(), "loading kubeconfig");
                let kubeconfig = Kubeconfig::read_from(path).map_err(Error::config_load)?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(Error::config_load)?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options)
                .await
                .map_err(Error::config_load)?,
            (None, None) => Config::infer().await.map_err(Error::config_load)?,
        };
        if let Some(secs) = self.request_timeout {
            config.read_timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Build a client from [`MapArgs::kube_config`]
    pub async fn client(&self) -> Result<Client> {
        Client::try_from(self.kube_config().await?).map_err(Error::config_load)
    }
}
