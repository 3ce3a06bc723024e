use std::sync::Arc;

use tokio::sync::watch;
use tokio::time;

use super::*;

/// How a cycle ended when nothing went wrong with the cluster API.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Too many nodes are draining already, the cycle did nothing.
    RateLimited { draining: usize, max_nodes: usize },
    Completed(DrainReport),
}

/// Runs descale cycles against a cluster.
///
/// Collaborators are built once at startup and handed in, every cycle works on a
/// fresh node listing.
#[derive(Debug)]
pub struct Descaler<S, D> {
    config: CycleConfig,
    source: S,
    drainer: D,
}

impl<S, D> Descaler<S, D>
where
    S: NodeSource,
    D: NodeDrainer,
{
    pub fn new(config: CycleConfig, source: S, drainer: D) -> Self {
        Self {
            config,
            source,
            drainer,
        }
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn drainer(&self) -> &D {
        &self.drainer
    }

    pub async fn run_cycle(
        &self,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<CycleOutcome, CycleError> {
        self.run_cycle_at(Timestamp::now(), shutdown).await
    }

    /// One full cycle with node ages measured at `now`.
    pub async fn run_cycle_at(
        &self,
        now: Timestamp,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<CycleOutcome, CycleError> {
        tracing::info!("Requesting node information");
        let nodes = self.source.list_nodes().await?;
        let snapshot = Snapshot::from_nodes(&nodes);
        let draining = snapshot.draining_count();
        tracing::debug!(
            nodes = nodes.len(),
            eligible = snapshot.eligible.len(),
            draining,
            "Node snapshot"
        );

        let candidates = match select(snapshot.eligible, draining, &self.config, now) {
            Selection::RateLimited {
                draining,
                max_nodes,
            } => return Ok(CycleOutcome::RateLimited { draining, max_nodes }),
            Selection::Candidates(candidates) => candidates,
        };

        let report =
            drain_selected(&self.drainer, &candidates, self.config.dry_run, shutdown).await;
        if report.drained_count() >= self.config.max_nodes {
            tracing::info!(
                max_nodes = self.config.max_nodes,
                "Reached termination max-nodes count"
            );
        }

        Ok(CycleOutcome::Completed(report))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Terminated,
}

/// Drives cycles one after another, keeping the process alive when a cycle fails.
///
/// Each cycle runs as its own task and is awaited before the next tick, so cycles
/// never overlap. A panic inside a cycle ends that cycle only.
#[derive(Debug)]
pub struct Scheduler<S, D> {
    descaler: Arc<Descaler<S, D>>,
    state: SchedulerState,
    cycles: u64,
}

impl<S, D> Scheduler<S, D>
where
    S: NodeSource + 'static,
    D: NodeDrainer + 'static,
{
    pub fn new(descaler: Descaler<S, D>) -> Self {
        Self {
            descaler: Arc::new(descaler),
            state: SchedulerState::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn descaler(&self) -> &Descaler<S, D> {
        &self.descaler
    }

    /// Runs cycles until shutdown, or a single cycle when no period is configured.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        let Some(period) = self.descaler.config().period else {
            self.tick(&shutdown).await;
            self.state = SchedulerState::Terminated;
            return;
        };

        tracing::info!(period_secs = period.as_secs(), "Running periodically");
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick(&shutdown).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        tracing::warn!("Shutdown channel closed");
                        break;
                    }
                }
            }

            if *shutdown.borrow() {
                tracing::info!("Scheduler shutting down");
                break;
            }
        }

        self.state = SchedulerState::Terminated;
    }

    /// Runs exactly one cycle and returns to `Idle`, whatever happened inside it.
    pub async fn tick(&mut self, shutdown: &watch::Receiver<bool>) -> SchedulerState {
        if *shutdown.borrow() {
            return self.state;
        }

        self.state = SchedulerState::Running;
        self.cycles += 1;
        let cycle = self.cycles;
        tracing::debug!(cycle, "Starting cycle");

        let descaler = Arc::clone(&self.descaler);
        let shutdown = shutdown.clone();
        let task = tokio::spawn(async move { descaler.run_cycle(&shutdown).await });

        match task.await {
            Ok(Ok(CycleOutcome::Completed(report))) => {
                tracing::info!(
                    cycle,
                    drained = report.drained_count(),
                    failed = report.failed_count(),
                    cancelled = report.cancelled,
                    "Round completed"
                );
            }
            Ok(Ok(CycleOutcome::RateLimited {
                draining,
                max_nodes,
            })) => {
                tracing::info!(cycle, draining, max_nodes, "Too many nodes draining");
            }
            Ok(Err(CycleError::Connection(err))) => {
                tracing::error!(cycle, %err, "Cycle failed");
            }
            Err(err) => {
                tracing::error!(cycle, %err, "Cycle aborted unexpectedly");
            }
        }

        self.state = SchedulerState::Idle;
        self.state
    }
}
