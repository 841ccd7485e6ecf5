use std::path::{Path, PathBuf};

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use crate::error::{AdvisorError, Result};

/// Where to find the cluster: an explicit kubeconfig file and/or context name.
#[derive(Debug, Clone, Default)]
pub struct ClusterTarget {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

impl ClusterTarget {
    fn is_explicit(&self) -> bool {
        self.kubeconfig.is_some() || self.context.is_some()
    }
}

pub struct Connection {
    pub client: Client,
    /// `Kubernetes vX.Y.Z`, when the API server answered the version probe.
    pub server: Option<String>,
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Appends the clusters, users and contexts of `extra`; the first file to name a
/// current context keeps it.
fn merge_kubeconfig(mut base: Kubeconfig, extra: Kubeconfig) -> Kubeconfig {
    base.clusters.extend(extra.clusters);
    base.auth_infos.extend(extra.auth_infos);
    base.contexts.extend(extra.contexts);
    base.current_context = base.current_context.or(extra.current_context);
    base
}

/// Candidate kubeconfig files in `dir`: plain files not starting with '.', by name.
fn scan_kube_dir(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("kubeconfig: cannot read directory {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        // cache/, http-cache/, ...
        .filter(|path| !path.is_dir())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| !name.starts_with('.'))
        })
        .collect();
    paths.sort();
    paths
}

/// Merges, in order, every path that parses as a kubeconfig.
fn load_from_paths(paths: &[PathBuf]) -> Option<Kubeconfig> {
    paths
        .iter()
        .filter_map(|path| match Kubeconfig::read_from(path) {
            Ok(cfg) => {
                log::info!(
                    "kubeconfig: {} has {} context(s)",
                    path.display(),
                    cfg.contexts.len()
                );
                Some(cfg)
            }
            Err(e) => {
                // ~/.kube also holds files that are not kubeconfigs
                log::debug!("kubeconfig: skipping {}: {e}", path.display());
                None
            }
        })
        .reduce(merge_kubeconfig)
}

// ── resolution ────────────────────────────────────────────────────────────────

/// Resolves the kubeconfig to use.
///
/// Resolution order:
/// 1. `target.kubeconfig`, read as a single file.
/// 2. `KUBECONFIG`, delegated to `Kubeconfig::read()` which merges every listed
///    file with the same semantics as kubectl.
/// 3. Every regular, non-hidden file in `~/.kube` that parses as a kubeconfig,
///    merged in file-name order.
pub fn load_kubeconfig(target: &ClusterTarget) -> Result<Kubeconfig> {
    if let Some(path) = &target.kubeconfig {
        log::info!("kubeconfig: using {}", path.display());
        return Kubeconfig::read_from(path).map_err(|source| AdvisorError::KubeconfigFile {
            path: path.clone(),
            source,
        });
    }

    if let Some(kube_env) = std::env::var_os("KUBECONFIG").filter(|v| !v.is_empty()) {
        let cfg = Kubeconfig::read()?;
        log::info!(
            "kubeconfig: KUBECONFIG={} gives {} context(s)",
            kube_env.to_string_lossy(),
            cfg.contexts.len()
        );
        return Ok(cfg);
    }

    let home = dirs::home_dir()
        .ok_or_else(|| AdvisorError::NoKubeconfig("cannot determine home directory".into()))?;
    let kube_dir = home.join(".kube");
    log::info!("kubeconfig: KUBECONFIG not set, scanning {}", kube_dir.display());

    let candidates = scan_kube_dir(&kube_dir);
    load_from_paths(&candidates).ok_or_else(|| {
        AdvisorError::NoKubeconfig(format!(
            "no valid kubeconfig files in {}",
            kube_dir.display()
        ))
    })
}

async fn client_config(target: &ClusterTarget) -> Result<Config> {
    if !target.is_explicit() {
        match Config::incluster() {
            Ok(config) => {
                log::info!("kubeconfig: using in-cluster service account");
                return Ok(config);
            }
            Err(e) => log::debug!("kubeconfig: not running in-cluster ({e})"),
        }
    }

    let kubeconfig = load_kubeconfig(target)?;
    let options = KubeConfigOptions {
        context: target.context.clone(),
        ..Default::default()
    };
    Ok(Config::from_custom_kubeconfig(kubeconfig, &options).await?)
}

/// Builds a client for `target` and asks the API server for its version.
///
/// A failed version probe is only logged; listing may still work.
pub async fn connect(target: &ClusterTarget) -> Result<Connection> {
    let config = client_config(target).await?;
    log::info!("kubeconfig: API server {}", config.cluster_url);
    let client = Client::try_from(config)?;

    let server = match client.apiserver_version().await {
        Ok(info) => Some(format!("Kubernetes {}", info.git_version)),
        Err(e) => {
            log::warn!("kubeconfig: could not get server version: {e}");
            None
        }
    };

    Ok(Connection { client, server })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kubeconfig_yaml(cluster: &str, context: &str, current: Option<&str>) -> String {
        let current = current
            .map(|c| format!("current-context: {c}\n"))
            .unwrap_or_default();
        format!(
            "apiVersion: v1\n\
             kind: Config\n\
             clusters:\n\
             - name: {cluster}\n  cluster:\n    server: https://{cluster}:6443\n\
             contexts:\n\
             - name: {context}\n  context:\n    cluster: {cluster}\n    user: admin\n\
             users:\n\
             - name: admin\n  user: {{}}\n\
             {current}"
        )
    }

    #[test]
    fn scan_skips_hidden_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config"), "x").unwrap();
        std::fs::write(dir.path().join("b-lab"), "x").unwrap();
        std::fs::write(dir.path().join(".DS_Store"), "x").unwrap();
        std::fs::create_dir(dir.path().join("cache")).unwrap();

        let names: Vec<_> = scan_kube_dir(dir.path())
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["b-lab", "config"]);
    }

    #[test]
    fn scan_of_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_kube_dir(&dir.path().join("absent")).is_empty());
    }

    #[test]
    fn load_merges_valid_files_and_keeps_first_current_context() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let junk = dir.path().join("junk");
        std::fs::write(&a, kubeconfig_yaml("alpha", "ctx-alpha", Some("ctx-alpha"))).unwrap();
        std::fs::write(&b, kubeconfig_yaml("beta", "ctx-beta", Some("ctx-beta"))).unwrap();
        std::fs::write(&junk, "clusters: 5\n").unwrap();

        let merged = load_from_paths(&[a, junk, b, dir.path().join("missing")]).unwrap();
        let contexts: Vec<_> = merged.contexts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(contexts, vec!["ctx-alpha", "ctx-beta"]);
        assert_eq!(merged.clusters.len(), 2);
        assert_eq!(merged.current_context.as_deref(), Some("ctx-alpha"));
    }

    #[test]
    fn merge_takes_current_context_from_extra_when_base_has_none() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, kubeconfig_yaml("alpha", "ctx-alpha", None)).unwrap();
        std::fs::write(&b, kubeconfig_yaml("beta", "ctx-beta", Some("ctx-beta"))).unwrap();

        let merged = load_from_paths(&[a, b]).unwrap();
        assert_eq!(merged.current_context.as_deref(), Some("ctx-beta"));
    }

    #[test]
    fn explicit_kubeconfig_is_read_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.yaml");
        std::fs::write(&path, kubeconfig_yaml("lab", "ctx-lab", Some("ctx-lab"))).unwrap();

        let target = ClusterTarget {
            kubeconfig: Some(path),
            context: None,
        };
        let cfg = load_kubeconfig(&target).unwrap();
        assert_eq!(cfg.current_context.as_deref(), Some("ctx-lab"));
    }

    #[test]
    fn explicit_missing_kubeconfig_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = ClusterTarget {
            kubeconfig: Some(dir.path().join("nope")),
            context: None,
        };
        assert!(matches!(
            load_kubeconfig(&target),
            Err(AdvisorError::KubeconfigFile { .. })
        ));
    }
}
