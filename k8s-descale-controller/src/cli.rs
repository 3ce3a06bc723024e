use std::fmt;
use std::path::PathBuf;

use clap::CommandFactory as _;
use clap::error::ErrorKind;
use k8s_descale::ConfigurationError;
use k8s_descale::CycleConfig;
use k8s_descale::Duration;
use k8s_descale::Kubectl;

/// Kubernetes Node Descale - drains nodes after they reach their best-before date.
#[derive(Debug, clap::Parser)]
#[command(name = "k8s-descale", version)]
pub(crate) struct Cli {
    /// Path to kubectl (default: first kubectl on $PATH)
    #[arg(long = "kubectl", value_name = "PATH")]
    pub(crate) kubectl_path: Option<PathBuf>,

    /// Kubernetes config path (default: $KUBECONFIG, ~/.kube/config or in-cluster)
    #[arg(long, value_name = "PATH")]
    pub(crate) kube_config: Option<PathBuf>,

    /// Maximum age of a node before draining it, <number><unit> with unit one of s, m, h, d, w, M, Y
    #[arg(long, value_name = "DURATION", env = "MAX_AGE", default_value = "3d")]
    pub(crate) max_age: Duration,

    /// Drain at most COUNT nodes at a time
    #[arg(long, value_name = "COUNT", env = "MAX_NODES_COUNT", default_value_t = 1)]
    pub(crate) max_nodes: usize,

    /// Run periodically, example: --check-period 1h (default: run once)
    #[arg(long, value_name = "SCHEDULE", env = "CHECK_PERIOD")]
    pub(crate) check_period: Option<Duration>,

    /// Perform a dry-run, doesn't drain any nodes
    #[arg(
        long,
        env = "DRY_RUN",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub(crate) dry_run: bool,
}

impl Cli {
    pub(crate) fn cycle_config(&self) -> Result<CycleConfig, ConfigurationError> {
        let config = CycleConfig::new(self.max_age, self.max_nodes)?
            .dry_run(self.dry_run)
            .period(self.check_period);
        Ok(config)
    }

    pub(crate) fn kubectl(&self) -> Result<Kubectl, ConfigurationError> {
        let kubectl =
            Kubectl::locate(self.kubectl_path.clone())?.with_kubeconfig(self.kube_config.clone());
        Ok(kubectl)
    }
}

/// Prints `message` with the usage line and exits with the usage error status.
pub(crate) fn usage_error(message: impl fmt::Display) -> ! {
    Cli::command()
        .error(ErrorKind::ValueValidation, message)
        .exit()
}
