use async_trait::async_trait;
use k8s_descale_kubeapi::KubeApi;

use super::*;

/// Supplies the node snapshot a cycle decides on.
#[async_trait]
pub trait NodeSource: Send + Sync {
    async fn list_nodes(&self) -> Result<Vec<corev1::Node>, ConnectionError>;
}

#[async_trait]
impl NodeSource for KubeApi {
    async fn list_nodes(&self) -> Result<Vec<corev1::Node>, ConnectionError> {
        let nodes = Self::list_nodes(self).await?;
        Ok(nodes)
    }
}
