use clap::Parser as _;
use k8s_descale::Descaler;
use k8s_descale::NodeDrainer as _;
use k8s_descale::Scheduler;
use k8s_descale_kubeapi::KubeApi;
use tokio::sync::watch;

use cli::Cli;

mod cli;
mod signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Running Kubernetes Node Descale"
    );

    let config = cli.cycle_config().unwrap_or_else(|err| cli::usage_error(err));
    let kubectl = cli.kubectl().unwrap_or_else(|err| cli::usage_error(err));
    tracing::info!(
        max_age = %cli.max_age,
        max_nodes = config.max_nodes,
        dry_run = config.dry_run,
        "Configured"
    );

    kubectl.verify().await.unwrap_or_else(|err| {
        cli::usage_error(format!(
            "kubectl at {} is not usable ({err})",
            kubectl.program().display()
        ))
    });

    tracing::debug!("Validating kube credentials");
    let kubeapi = connect(&cli).await.unwrap_or_else(|err| {
        cli::usage_error(format!(
            "failed to connect to Kubernetes API, see --help for connection options ({err})"
        ))
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let signals = signal::Signals::new()?;
    tokio::spawn(signals.forward(shutdown_tx));

    let descaler = Descaler::new(config, kubeapi, kubectl);
    let mut scheduler = Scheduler::new(descaler);
    scheduler.run(shutdown_rx).await;

    tracing::info!(cycles = scheduler.cycles(), "Done");
    Ok(())
}

/// Builds the cluster client and makes sure it can list nodes.
async fn connect(cli: &Cli) -> Result<KubeApi, Box<dyn std::error::Error + Send + Sync>> {
    let kubeapi = match &cli.kube_config {
        Some(path) => KubeApi::from_kubeconfig(path).await?,
        None => KubeApi::new().await?,
    };
    let nodes = kubeapi.list_nodes().await?;
    tracing::debug!(nodes = nodes.len(), "Cluster API reachable");

    Ok(kubeapi)
}
