use async_trait::async_trait;

use super::*;

/// Cordons a node and evicts its pods.
///
/// A call returns once the node is fully drained or the drain failed. Retrying
/// individual pod evictions is the implementation's business.
#[async_trait]
pub trait NodeDrainer: Send + Sync {
    /// Checks that the drainer can be used at all.
    async fn verify(&self) -> Result<(), DrainError>;

    async fn drain(&self, node: &str, dry_run: bool) -> Result<(), DrainError>;
}
