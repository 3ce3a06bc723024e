use k8s::NodeExt as _;
use k8s::jiff::SignedDuration;
use kube::ResourceExt as _;

use super::*;

/// An eligible worker node, reduced to what the selector needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub created: Timestamp,
}

impl Candidate {
    pub fn new(name: impl ToString, created: Timestamp) -> Self {
        Self {
            name: name.to_string(),
            created,
        }
    }

    /// Negative when `created` lies in the future of `now`.
    pub fn age_at(&self, now: Timestamp) -> SignedDuration {
        now.duration_since(self.created)
    }
}

/// Worker nodes of one cluster snapshot, split into those that may be drained
/// and those already draining. Control-plane nodes appear in neither.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub eligible: Vec<Candidate>,
    pub draining: Vec<String>,
}

impl Snapshot {
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a corev1::Node>) -> Self {
        let mut snapshot = Self::default();

        for node in nodes {
            if node.is_control_plane() {
                tracing::trace!(node = %node.name_any(), "Ignoring control-plane node");
                continue;
            }

            let Some(name) = node.metadata.name.clone() else {
                tracing::warn!(uid = ?node.uid(), "Skipping node without a name");
                continue;
            };

            if node.is_draining() {
                tracing::debug!(node = %name, "Node is already draining");
                snapshot.draining.push(name);
                continue;
            }

            let Some(created) = node.creation_timestamp() else {
                tracing::warn!(node = %name, "Skipping node without a creation timestamp");
                continue;
            };

            snapshot.eligible.push(Candidate::new(name, created.0));
        }

        snapshot
    }

    pub fn draining_count(&self) -> usize {
        self.draining.len()
    }
}

#[cfg(test)]
mod tests {
    use k8s::ObjectMetaExt as _;
    use k8s::TaintExt as _;
    use k8s::TimeExt as _;
    use k8s::metav1;

    use super::*;

    fn created(days: i64) -> metav1::Time {
        metav1::Time::ago(SignedDuration::from_hours(days * 24))
    }

    fn worker(name: &str, days: i64) -> corev1::Node {
        corev1::Node::new(metav1::ObjectMeta::new(name).created(created(days)))
    }

    #[test]
    fn splits_control_plane_draining_and_eligible() {
        let nodes = [
            corev1::Node::new(
                metav1::ObjectMeta::new("node1")
                    .created(created(9))
                    .label(k8s::CONTROL_PLANE_ROLE_LABEL, "true"),
            ),
            worker("node2", 8).tainted(corev1::Taint::unschedulable()),
            worker("node3", 7),
        ];

        let snapshot = Snapshot::from_nodes(&nodes);

        let eligible = snapshot
            .eligible
            .iter()
            .map(|candidate| candidate.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(eligible, ["node3"]);
        assert_eq!(snapshot.draining, ["node2"]);
        assert_eq!(snapshot.draining_count(), 1);
    }

    #[test]
    fn legacy_master_is_excluded_even_when_draining() {
        let nodes = [corev1::Node::new(
            metav1::ObjectMeta::new("master")
                .created(created(100))
                .label(k8s::MASTER_ROLE_LABEL, "true"),
        )
        .tainted(corev1::Taint::unschedulable())];

        let snapshot = Snapshot::from_nodes(&nodes);

        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn nameless_node_is_skipped() {
        let nodes = [
            corev1::Node::new(metav1::ObjectMeta::default().created(created(30))),
            worker("named", 30),
        ];

        let snapshot = Snapshot::from_nodes(&nodes);

        assert_eq!(snapshot.eligible.len(), 1);
        assert_eq!(snapshot.eligible[0].name, "named");
        assert!(snapshot.draining.is_empty());
    }

    #[test]
    fn node_without_timestamp_is_not_eligible() {
        let nodes = [
            corev1::Node::new(metav1::ObjectMeta::new("unknown-age")),
            corev1::Node::new(metav1::ObjectMeta::new("draining-unknown-age"))
                .tainted(corev1::Taint::unschedulable()),
        ];

        let snapshot = Snapshot::from_nodes(&nodes);

        assert!(snapshot.eligible.is_empty());
        assert_eq!(snapshot.draining, ["draining-unknown-age"]);
    }

    #[test]
    fn keeps_input_order() {
        let nodes = [worker("young", 1), worker("old", 10), worker("middle", 5)];

        let snapshot = Snapshot::from_nodes(&nodes);

        let names = snapshot
            .eligible
            .iter()
            .map(|candidate| candidate.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["young", "old", "middle"]);
    }

    #[test]
    fn candidate_age() {
        let now = Timestamp::now();
        let candidate = Candidate::new("worker", now - SignedDuration::from_hours(5));

        assert_eq!(candidate.age_at(now), SignedDuration::from_hours(5));
    }
}
