use std::env;
use std::ffi::OsStr;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use super::*;

const KUBECTL: &str = "kubectl";

/// Drains nodes by running `kubectl drain`.
#[derive(Clone, Debug)]
pub struct Kubectl {
    program: PathBuf,
    kubeconfig: Option<PathBuf>,
}

impl Kubectl {
    /// Uses the kubectl at `path`, or the first one found on `$PATH`.
    pub fn locate(path: Option<PathBuf>) -> Result<Self, ConfigurationError> {
        locate_in(path, env::var_os("PATH"))
    }

    pub fn with_kubeconfig(self, kubeconfig: Option<PathBuf>) -> Self {
        Self { kubeconfig, ..self }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn drain_args(&self, node: &str, dry_run: bool) -> Vec<OsString> {
        let mut args = self.global_args();
        args.extend(
            [
                "drain",
                node,
                "--ignore-daemonsets",
                "--delete-emptydir-data",
                "--force",
            ]
            .map(OsString::from),
        );
        if dry_run {
            args.push("--dry-run=client".into());
        }
        args
    }

    fn version_args(&self) -> Vec<OsString> {
        let mut args = self.global_args();
        args.extend(["version", "--client"].map(OsString::from));
        args
    }

    fn global_args(&self) -> Vec<OsString> {
        match &self.kubeconfig {
            Some(kubeconfig) => vec!["--kubeconfig".into(), kubeconfig.into()],
            None => Vec::new(),
        }
    }

    async fn run(&self, args: Vec<OsString>) -> Result<(), DrainError> {
        let command = self.display(&args);
        tracing::debug!(%command, "Running kubectl");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| DrainError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            tracing::debug!(%command, "{line}");
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(DrainError::Failed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn display(&self, args: &[OsString]) -> String {
        let program = self
            .program
            .file_name()
            .unwrap_or(self.program.as_os_str());
        [program]
            .into_iter()
            .chain(args.iter().map(OsString::as_os_str))
            .map(OsStr::to_string_lossy)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl NodeDrainer for Kubectl {
    async fn verify(&self) -> Result<(), DrainError> {
        self.run(self.version_args()).await
    }

    async fn drain(&self, node: &str, dry_run: bool) -> Result<(), DrainError> {
        self.run(self.drain_args(node, dry_run)).await
    }
}

fn locate_in(
    path: Option<PathBuf>,
    search: Option<OsString>,
) -> Result<Kubectl, ConfigurationError> {
    let program = match path {
        Some(path) if is_executable(&path) => path,
        Some(path) => return Err(ConfigurationError::KubectlUnusable(path)),
        None => search
            .iter()
            .flat_map(env::split_paths)
            .map(|dir| dir.join(KUBECTL))
            .find(|candidate| is_executable(candidate))
            .ok_or(ConfigurationError::KubectlNotFound)?,
    };

    tracing::debug!(program = %program.display(), "Using kubectl");
    Ok(Kubectl {
        program,
        kubeconfig: None,
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt as _;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
