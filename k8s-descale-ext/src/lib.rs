pub use k8s_openapi as openapi;
pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
pub use k8s_openapi::jiff;

pub use node::NodeExt;
pub use node::TaintExt;
pub use time::TimeExt;

use constcat::concat;

mod node;
mod time;

pub const NODE_ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";
pub const CONTROL_PLANE_ROLE_LABEL: &str = concat!(NODE_ROLE_LABEL_PREFIX, "control-plane");
pub const MASTER_ROLE_LABEL: &str = concat!(NODE_ROLE_LABEL_PREFIX, "master");

pub const NODE_TAINT_PREFIX: &str = "node.kubernetes.io/";
pub const UNSCHEDULABLE_TAINT_KEY: &str = concat!(NODE_TAINT_PREFIX, "unschedulable");
pub const NO_SCHEDULE_EFFECT: &str = "NoSchedule";

pub trait ObjectMetaExt {
    fn new(name: impl ToString) -> Self;
    fn created(self, ts: impl Into<Option<metav1::Time>>) -> Self;
    fn label(self, key: impl ToString, value: impl ToString) -> Self;
}

impl ObjectMetaExt for metav1::ObjectMeta {
    fn new(name: impl ToString) -> Self {
        let name = Some(name.to_string());
        Self { name, ..default() }
    }

    fn created(self, ts: impl Into<Option<metav1::Time>>) -> Self {
        Self {
            creation_timestamp: ts.into(),
            ..self
        }
    }

    fn label(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.labels
            .get_or_insert_with(default)
            .insert(key.to_string(), value.to_string());
        self
    }
}

pub fn default<T: Default>() -> T {
    T::default()
}
