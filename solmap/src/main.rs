//! `kubectl solmap`: print the Solace to HAProxy port mapping
use anyhow::{Context, Result};
use clap::Parser;
use solmap::{App, Cluster};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let app = App::parse();
    let args = app.map_args();
    let target = args.target();
    debug!(?target, output = ?args.output, "resolved arguments");

    let client = args.client().await?;
    let report = Cluster::new(client)
        .report(&target)
        .await
        .with_context(|| format!("mapping ports of {}/{}", target.crd_namespace, target.crd_name))?;
    print!("{}", args.output.render(&report)?);
    Ok(())
}
