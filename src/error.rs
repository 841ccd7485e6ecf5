//! Error types for cluster access and output. The analysis itself never fails.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::ResourceKind;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("No kubeconfig found: {0}")]
    NoKubeconfig(String),

    #[error("Failed to read kubeconfig {path}: {source}")]
    KubeconfigFile {
        path: PathBuf,
        #[source]
        source: kube::config::KubeconfigError,
    },

    #[error("Invalid kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("Failed to create Kubernetes client: {0}")]
    Client(#[from] kube::Error),

    #[error("Failed to list {kind} resources: {source}")]
    Discovery {
        kind: ResourceKind,
        #[source]
        source: kube::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
