use std::io;
use std::path::PathBuf;

use super::*;

/// Invalid startup configuration. The process exits before running any cycle.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Duration(#[from] DurationError),
    #[error("--max-nodes must be at least 1")]
    MaxNodes,
    #[error("kubectl at {} not found or unusable", .0.display())]
    KubectlUnusable(PathBuf),
    #[error("kubectl not found in PATH, use --kubectl <path> to set location manually")]
    KubectlNotFound,
}

/// The cluster API could not be reached or refused the node listing.
#[derive(Debug, thiserror::Error)]
#[error("failed to list cluster nodes: {0}")]
pub struct ConnectionError(#[from] pub kube::Error);

/// Draining a single node failed.
#[derive(Debug, thiserror::Error)]
pub enum DrainError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` {}: {stderr}", describe_exit(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// A cycle that could not run to completion.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}
