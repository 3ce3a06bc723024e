use super::*;

pub trait TaintExt {
    fn unschedulable() -> Self;
    fn is_unschedulable(&self) -> bool;
}

impl TaintExt for corev1::Taint {
    /// The taint the node lifecycle controller places on a cordoned node.
    fn unschedulable() -> Self {
        Self {
            key: UNSCHEDULABLE_TAINT_KEY.to_string(),
            effect: NO_SCHEDULE_EFFECT.to_string(),
            ..default()
        }
    }

    fn is_unschedulable(&self) -> bool {
        self.key == UNSCHEDULABLE_TAINT_KEY && self.effect == NO_SCHEDULE_EFFECT
    }
}

pub trait NodeExt {
    fn new(metadata: metav1::ObjectMeta) -> Self;
    fn tainted(self, taint: corev1::Taint) -> Self;
    fn label(&self, key: &str) -> Option<&str>;
    fn is_control_plane(&self) -> bool;
    fn is_draining(&self) -> bool;
}

impl NodeExt for corev1::Node {
    fn new(metadata: metav1::ObjectMeta) -> Self {
        Self {
            metadata,
            ..default()
        }
    }

    fn tainted(mut self, taint: corev1::Taint) -> Self {
        self.spec
            .get_or_insert_with(default)
            .taints
            .get_or_insert_with(default)
            .push(taint);
        self
    }

    fn label(&self, key: &str) -> Option<&str> {
        self.metadata.labels.as_ref()?.get(key).map(String::as_str)
    }

    /// Both the current `control-plane` and the legacy `master` role labels are honored.
    fn is_control_plane(&self) -> bool {
        [CONTROL_PLANE_ROLE_LABEL, MASTER_ROLE_LABEL]
            .into_iter()
            .any(|key| self.label(key) == Some("true"))
    }

    fn is_draining(&self) -> bool {
        self.spec
            .as_ref()
            .and_then(|spec| spec.taints.as_deref())
            .unwrap_or_default()
            .iter()
            .any(TaintExt::is_unschedulable)
    }
}
