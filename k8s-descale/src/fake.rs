use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use k8s::NodeExt as _;
use k8s::TaintExt as _;
use kube::ResourceExt as _;

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Behavior {
    List,
    Unreachable,
    Panic,
}

/// In-memory cluster nodes. Clones share the same node list.
#[derive(Clone, Debug)]
pub(crate) struct FakeSource {
    nodes: Arc<Mutex<Vec<corev1::Node>>>,
    behavior: Behavior,
    lists: Arc<AtomicUsize>,
}

impl FakeSource {
    pub(crate) fn new(nodes: impl IntoIterator<Item = corev1::Node>) -> Self {
        Self {
            nodes: Arc::new(Mutex::new(nodes.into_iter().collect())),
            behavior: Behavior::List,
            lists: Arc::default(),
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            behavior: Behavior::Unreachable,
            ..Self::new([])
        }
    }

    pub(crate) fn panicking() -> Self {
        Self {
            behavior: Behavior::Panic,
            ..Self::new([])
        }
    }

    pub(crate) fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// Marks a node the way `kubectl drain` leaves it.
    pub(crate) fn cordon(&self, name: &str) {
        let mut nodes = self.nodes.lock().unwrap();
        if let Some(index) = nodes.iter().position(|node| node.name_any() == name) {
            let node = nodes.remove(index).tainted(corev1::Taint::unschedulable());
            nodes.insert(index, node);
        }
    }
}

#[async_trait]
impl NodeSource for FakeSource {
    async fn list_nodes(&self) -> Result<Vec<corev1::Node>, ConnectionError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::List => {
                let nodes = self.nodes.lock().unwrap().clone();
                Ok(nodes)
            }
            Behavior::Unreachable => {
                let err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
                Err(ConnectionError(kube::Error::Service(Box::new(err))))
            }
            Behavior::Panic => panic!("node listing blew up"),
        }
    }
}

type DrainHook = Box<dyn Fn(&str) + Send + Sync>;

/// Records drain calls, failing for the configured node names.
#[derive(Default)]
pub(crate) struct FakeDrainer {
    failing: HashSet<String>,
    cluster: Option<FakeSource>,
    hook: Option<DrainHook>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl FakeDrainer {
    pub(crate) fn failing<'a>(nodes: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            failing: nodes.into_iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Successful drains leave the node cordoned in `cluster`.
    pub(crate) fn cordoning(cluster: &FakeSource) -> Self {
        Self {
            cluster: Some(cluster.clone()),
            ..Self::default()
        }
    }

    pub(crate) fn on_drain(self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            hook: Some(Box::new(hook)),
            ..self
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn drained(&self) -> Vec<String> {
        self.calls().into_iter().map(|(node, _)| node).collect()
    }
}

#[async_trait]
impl NodeDrainer for FakeDrainer {
    async fn verify(&self) -> Result<(), DrainError> {
        Ok(())
    }

    async fn drain(&self, node: &str, dry_run: bool) -> Result<(), DrainError> {
        self.calls
            .lock()
            .unwrap()
            .push((node.to_string(), dry_run));

        if let Some(hook) = &self.hook {
            hook(node);
        }

        if self.failing.contains(node) {
            return Err(DrainError::Failed {
                command: format!("kubectl drain {node}"),
                code: Some(1),
                stderr: "error: cannot evict pod as it would violate the pod's disruption budget"
                    .to_string(),
            });
        }

        if let Some(cluster) = &self.cluster {
            cluster.cordon(node);
        }

        Ok(())
    }
}
