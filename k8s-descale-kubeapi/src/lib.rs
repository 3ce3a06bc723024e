use std::fmt::Debug;
use std::path::Path;

use k8s_descale_ext as k8s;
use kube::api;
use kube::config;

use k8s::corev1;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] config::KubeconfigError),
    #[error(transparent)]
    Kube(#[from] kube::Error),
}

pub struct KubeApi {
    list_params: api::ListParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi configured with a default Kubernetes client.
    ///
    /// The configuration is inferred the way `kubectl` does it: `$KUBECONFIG`,
    /// then `~/.kube/config`, then the in-cluster service account.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), kube::Error> {
    /// let api = k8s_descale_kubeapi::KubeApi::new().await?;
    /// // use `api`...
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new() -> kube::Result<Self> {
        kube::Client::try_default().await.map(Self::with_client)
    }

    /// Create a KubeApi from an explicit kubeconfig file, using its current context.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), k8s_descale_kubeapi::Error> {
    /// let api = k8s_descale_kubeapi::KubeApi::from_kubeconfig("/etc/kube/admin.conf").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn from_kubeconfig(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading kubeconfig");
        let kubeconfig = config::Kubeconfig::read_from(path)?;
        let options = config::KubeConfigOptions::default();
        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &options).await?;
        let client = kube::Client::try_from(config)?;
        Ok(Self::with_client(client))
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            list_params: api::ListParams::default(),
            client,
        }
    }

    /// Lists all Nodes in the cluster.
    ///
    /// Full objects are fetched rather than metadata only, since node taints live in the spec.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use k8s_descale_kubeapi::KubeApi;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let api = KubeApi::new().await?;
    /// let nodes = api.list_nodes().await?;
    /// println!("discovered {} nodes", nodes.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_nodes(&self) -> kube::Result<Vec<corev1::Node>> {
        let lp = self.list_params();
        let nodes = self.nodes().list(lp).await?.items;
        tracing::trace!(count = nodes.len(), "Listed nodes");
        Ok(nodes)
    }

    fn nodes(&self) -> api::Api<corev1::Node> {
        api::Api::all(self.client.clone())
    }

    fn list_params(&self) -> &api::ListParams {
        &self.list_params
    }
}

impl Debug for KubeApi {
    /// Formats the `KubeApi` for debugging, showing `list_params` while redacting the `client`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeApi")
            .field("list_params", &self.list_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}
