use tokio::sync::watch;

use super::*;

/// Outcome of draining one selection.
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Nodes drained, or reported in dry-run mode.
    pub drained: Vec<String>,
    pub failed: Vec<(String, DrainError)>,
    /// Shutdown was requested before the whole selection was processed.
    pub cancelled: bool,
}

impl DrainReport {
    pub fn drained_count(&self) -> usize {
        self.drained.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Drains the selected nodes one at a time, in selection order.
///
/// A failure is logged and recorded, and the remaining nodes are still drained.
/// The shutdown flag is checked before every node.
pub async fn drain_selected<D>(
    drainer: &D,
    selection: &[Candidate],
    dry_run: bool,
    shutdown: &watch::Receiver<bool>,
) -> DrainReport
where
    D: NodeDrainer + ?Sized,
{
    let mut report = DrainReport::default();

    for candidate in selection {
        let node = candidate.name.as_str();
        if *shutdown.borrow() {
            let remaining = selection.len() - report.drained_count() - report.failed_count();
            tracing::info!(remaining, "Shutdown requested, not draining remaining nodes");
            report.cancelled = true;
            break;
        }

        if dry_run {
            tracing::info!(node, "[dry-run] Would drain node");
            report.drained.push(node.to_string());
            continue;
        }

        tracing::info!(node, "Draining node");
        match drainer.drain(node, false).await {
            Ok(()) => {
                tracing::debug!(node, "Done draining node");
                report.drained.push(node.to_string());
            }
            Err(err) => {
                tracing::error!(node, %err, "Failed to drain node");
                report.failed.push((node.to_string(), err));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use crate::fake::FakeDrainer;

    use super::*;

    fn selection(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .map(|name| Candidate::new(name, Timestamp::now()))
            .collect()
    }

    #[tokio::test]
    async fn drains_in_order() {
        let drainer = FakeDrainer::default();
        let (_tx, rx) = watch::channel(false);

        let report = drain_selected(&drainer, &selection(&["a", "b", "c"]), false, &rx).await;

        assert_eq!(report.drained, ["a", "b", "c"]);
        assert!(report.failed.is_empty());
        assert!(!report.cancelled);
        assert_eq!(drainer.drained(), ["a", "b", "c"]);
        assert!(drainer.calls().iter().all(|(_, dry_run)| !dry_run));
    }

    #[tokio::test]
    async fn dry_run_never_calls_drainer() {
        let drainer = FakeDrainer::default();
        let (_tx, rx) = watch::channel(false);

        let report = drain_selected(&drainer, &selection(&["a", "b"]), true, &rx).await;

        assert_eq!(report.drained_count(), 2);
        assert!(drainer.calls().is_empty());
    }

    #[tokio::test]
    async fn failure_does_not_stop_remaining_nodes() {
        let drainer = FakeDrainer::failing(["a"]);
        let (_tx, rx) = watch::channel(false);

        let report = drain_selected(&drainer, &selection(&["a", "b", "c"]), false, &rx).await;

        assert_eq!(drainer.calls().len(), 3);
        assert_eq!(report.drained, ["b", "c"]);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failed[0].0, "a");
        assert!(matches!(report.failed[0].1, DrainError::Failed { .. }));
    }

    #[tokio::test]
    async fn shutdown_stops_before_next_node() {
        let (tx, rx) = watch::channel(false);
        let drainer = FakeDrainer::default().on_drain(move |_| {
            tx.send_replace(true);
        });

        let report = drain_selected(&drainer, &selection(&["a", "b", "c"]), false, &rx).await;

        assert_eq!(report.drained, ["a"]);
        assert!(report.cancelled);
        assert_eq!(drainer.calls().len(), 1);
    }

    #[tokio::test]
    async fn shutdown_before_start_drains_nothing() {
        let drainer = FakeDrainer::default();
        let (_tx, rx) = watch::channel(true);

        let report = drain_selected(&drainer, &selection(&["a"]), true, &rx).await;

        assert!(report.drained.is_empty());
        assert!(report.cancelled);
    }

    #[tokio::test]
    async fn empty_selection() {
        let drainer = FakeDrainer::default();
        let (_tx, rx) = watch::channel(false);

        let report = drain_selected(&drainer, &[], false, &rx).await;

        assert_eq!(report.drained_count(), 0);
        assert!(!report.cancelled);
    }
}
