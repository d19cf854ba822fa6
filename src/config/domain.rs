// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster base domain, configured explicitly or discovered once from the cluster.
//!
//! Resolution is single-flight: concurrent readers of an unresolved domain
//! queue on an async gate and only the first one talks to the API server.
//! Readers that queued behind a failed lookup share its error. Failures are
//! not cached beyond that, the next read queries again.

use crate::constants::domain::{CLUSTER_INGRESS_NAME, INGRESS_CONTROLLER_NAME, INGRESS_CONTROLLER_NAMESPACE};
use crate::error::{OperatorError, Result};
use crate::types::{ClusterIngress, IngressController};
use kube::{Api, Client};
use std::sync::{PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

#[derive(Clone)]
struct DomainSource {
    client: Client,
    is_openshift: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum DomainState {
    Unresolved,
    Resolved(String),
}

struct DomainEntry {
    state: DomainState,
    source: Option<DomainSource>,
    /// Bumped on every explicit set so stale lookups are discarded
    generation: u64,
    /// Number of finished lookups
    attempts: u64,
    /// Error of the last finished lookup with the generation it ran against
    last_failure: Option<(u64, String)>,
}

pub struct DomainResolver {
    entry: RwLock<DomainEntry>,
    resolving: Mutex<()>,
}

impl Default for DomainResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainResolver {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(DomainEntry {
                state: DomainState::Unresolved,
                source: None,
                generation: 0,
                attempts: 0,
                last_failure: None,
            }),
            resolving: Mutex::new(()),
        }
    }

    /// Set the base domain. A non-empty `domain` is used verbatim; an empty one
    /// makes the next read look it up through `client`.
    pub fn set_default_domain(&self, domain: &str, client: Client, is_openshift: bool) {
        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        entry.generation += 1;
        entry.source = Some(DomainSource { client, is_openshift });
        entry.state = if domain.is_empty() {
            debug!("No explicit domain, will query the cluster (openshift={})", is_openshift);
            DomainState::Unresolved
        } else {
            info!("Using configured base domain {}", domain);
            DomainState::Resolved(domain.to_string())
        };
    }

    /// Cached domain, if already resolved
    pub fn cached(&self) -> Option<String> {
        match &self.entry.read().unwrap_or_else(PoisonError::into_inner).state {
            DomainState::Resolved(domain) => Some(domain.clone()),
            DomainState::Unresolved => None,
        }
    }

    /// Return the base domain, querying the cluster on first use.
    ///
    /// Dropping the returned future aborts the lookup; callers bound it with
    /// their own deadline.
    pub async fn get_default_domain(&self) -> Result<String> {
        let seen_attempts = {
            let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
            if let DomainState::Resolved(domain) = &entry.state {
                return Ok(domain.clone());
            }
            entry.attempts
        };

        let _gate = self.resolving.lock().await;

        let (source, generation) = {
            let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
            if let DomainState::Resolved(domain) = &entry.state {
                return Ok(domain.clone());
            }
            // A lookup finished while we waited; share its failure
            if entry.attempts != seen_attempts {
                if let Some((failed_generation, message)) = &entry.last_failure {
                    if *failed_generation == entry.generation {
                        return Err(OperatorError::ClusterQueryError(message.clone()));
                    }
                }
            }
            (entry.source.clone(), entry.generation)
        };

        let Some(source) = source else {
            return Err(OperatorError::ClusterQueryError(
                "no base domain configured and no cluster client to discover it".to_string(),
            ));
        };

        let result = query_domain(&source.client, source.is_openshift).await;

        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        entry.attempts += 1;
        let domain = match result {
            Ok(domain) => {
                entry.last_failure = None;
                domain
            }
            Err(e) => {
                let message = match &e {
                    OperatorError::ClusterQueryError(message) => message.clone(),
                    other => other.to_string(),
                };
                entry.last_failure = Some((generation, message));
                return Err(e);
            }
        };

        if entry.generation == generation {
            info!("Discovered cluster base domain {}", domain);
            entry.state = DomainState::Resolved(domain.clone());
        } else {
            debug!("Domain was reconfigured during lookup, not caching {}", domain);
        }
        Ok(domain)
    }
}

#[instrument(skip(client))]
async fn query_domain(client: &Client, is_openshift: bool) -> Result<String> {
    let domain = if is_openshift {
        let ingresses: Api<ClusterIngress> = Api::all(client.clone());
        let ingress = ingresses.get(CLUSTER_INGRESS_NAME).await.map_err(|e| {
            OperatorError::ClusterQueryError(format!(
                "failed to get ingress config {}: {}",
                CLUSTER_INGRESS_NAME, e
            ))
        })?;
        ingress.base_domain().map(String::from)
    } else {
        let controllers: Api<IngressController> =
            Api::namespaced(client.clone(), INGRESS_CONTROLLER_NAMESPACE);
        let controller = controllers.get(INGRESS_CONTROLLER_NAME).await.map_err(|e| {
            OperatorError::ClusterQueryError(format!(
                "failed to get ingress controller {}/{}: {}",
                INGRESS_CONTROLLER_NAMESPACE, INGRESS_CONTROLLER_NAME, e
            ))
        })?;
        controller.status_domain().map(String::from)
    };

    domain.ok_or_else(|| {
        OperatorError::ClusterQueryError("cluster ingress does not report a base domain".to_string())
    })
}
