//! Age-based node descaling.
//!
//! Every cycle takes one snapshot of the cluster nodes, sets control-plane nodes
//! aside, counts the nodes that are already draining and drains the oldest worker
//! nodes that outlived `max_age`, never letting more than `max_nodes` drain at once.

use k8s_descale_ext as k8s;

use k8s::jiff::Timestamp;
use k8s::corev1;

pub use config::CycleConfig;
pub use drain::DrainReport;
pub use drain::drain_selected;
pub use duration::Duration;
pub use duration::DurationError;
pub use duration::Unit;
pub use error::ConfigurationError;
pub use error::ConnectionError;
pub use error::CycleError;
pub use error::DrainError;
pub use executor::NodeDrainer;
pub use kubectl::Kubectl;
pub use scheduler::CycleOutcome;
pub use scheduler::Descaler;
pub use scheduler::Scheduler;
pub use scheduler::SchedulerState;
pub use select::Selection;
pub use select::select;
pub use snapshot::Candidate;
pub use snapshot::Snapshot;
pub use source::NodeSource;

mod config;
mod drain;
pub mod duration;
mod error;
mod executor;
mod kubectl;
mod scheduler;
mod select;
mod snapshot;
mod source;

#[cfg(test)]
mod fake;
