// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ModelRegistry reconciler - renders and applies the supporting objects of each registry.

use crate::constants::reconcile::{DEADLINE_SECS, ERROR_REQUEUE_SECS, REQUEUE_SECS};
use crate::constants::templates as names;
use crate::error::{OperatorError, Result};
use crate::kubernetes::apply_object;
use crate::templates::{Applier, RenderParams};
use crate::types::model_registry::Condition;
use crate::types::{ModelRegistry, ModelRegistryStatus, Route};
use futures::StreamExt;
use k8s_openapi::api::networking::v1::{Ingress, NetworkPolicy};
use k8s_openapi::api::rbac::v1::{Role, RoleBinding};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{
    api::{Patch, PatchParams},
    runtime::{controller::Action, Controller},
    Api, Client, Resource, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

const CONDITION_AVAILABLE: &str = "Available";

pub struct ModelRegistryReconciler {
    client: Client,
    applier: Applier,
    is_openshift: bool,
}

/// Objects rendered for one registry, ready to be applied
#[derive(Debug)]
struct DesiredObjects {
    role: Role,
    role_binding: RoleBinding,
    network_policy: NetworkPolicy,
    route: Option<Route>,
    ingress: Option<Ingress>,
}

impl ModelRegistryReconciler {
    pub fn new(client: Client, applier: Applier, is_openshift: bool) -> Self {
        Self {
            client,
            applier,
            is_openshift,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let registries: Api<ModelRegistry> = Api::all(self.client.clone());
        let context = Arc::new(self);

        Controller::new(registries, WatcherConfig::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled model registry: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }

    /// Namespace for generated objects: the operator-wide override if set,
    /// otherwise the registry's own namespace
    fn target_namespace(&self, registry: &ModelRegistry) -> String {
        let registries_namespace = self.applier.config().registries_namespace();
        if registries_namespace.is_empty() {
            registry.namespace().unwrap_or_default()
        } else {
            registries_namespace
        }
    }

    fn params<'a>(&self, registry: &'a ModelRegistry) -> RenderParams<'a> {
        RenderParams {
            name: registry.name_any(),
            namespace: self.target_namespace(registry),
            spec: &registry.spec,
        }
    }

    async fn render_desired(&self, params: &RenderParams<'_>) -> Result<DesiredObjects> {
        let role = self.applier.render_object(params, names::ROLE).await?;
        let role_binding = self.applier.render_object(params, names::ROLE_BINDING).await?;
        let network_policy = self.applier.render_object(params, names::NETWORK_POLICY).await?;

        let (route, ingress) = match (params.spec.exposes_rest(), self.is_openshift) {
            (false, _) => (None, None),
            (true, true) => (Some(self.applier.render_object(params, names::HTTPS_ROUTE).await?), None),
            (true, false) => (None, Some(self.applier.render_object(params, names::INGRESS).await?)),
        };

        Ok(DesiredObjects {
            role,
            role_binding,
            network_policy,
            route,
            ingress,
        })
    }

    #[instrument(skip(self, registry), fields(registry = %registry.name_any()))]
    async fn reconcile_objects(&self, registry: &ModelRegistry) -> Result<()> {
        let params = self.params(registry);

        // The domain lookup is the only step that can stall on the API server
        let desired = timeout(Duration::from_secs(DEADLINE_SECS), self.render_desired(&params))
            .await
            .map_err(|_| {
                OperatorError::ClusterQueryError(format!(
                    "rendering objects for {} did not finish within {}s",
                    params.name, DEADLINE_SECS
                ))
            })??;

        let owner = owner_reference(registry, &params.namespace);
        apply_object(&self.client, &owned(desired.role, &owner)).await?;
        apply_object(&self.client, &owned(desired.role_binding, &owner)).await?;
        apply_object(&self.client, &owned(desired.network_policy, &owner)).await?;
        if let Some(route) = desired.route {
            apply_object(&self.client, &owned(route, &owner)).await?;
        }
        if let Some(ingress) = desired.ingress {
            apply_object(&self.client, &owned(ingress, &owner)).await?;
        }

        Ok(())
    }

    async fn update_status(&self, registry: &ModelRegistry, outcome: &Result<()>) -> Result<()> {
        let namespace = registry.namespace().unwrap_or_default();
        let registries: Api<ModelRegistry> = Api::namespaced(self.client.clone(), &namespace);

        let status = ModelRegistryStatus {
            conditions: Some(vec![availability_condition(outcome)]),
        };
        let status = serde_json::json!({ "status": status });
        registries
            .patch_status(&registry.name_any(), &PatchParams::default(), &Patch::Merge(&status))
            .await?;
        Ok(())
    }
}

/// Owner reference to the registry, only usable when objects share its namespace
fn owner_reference(registry: &ModelRegistry, namespace: &str) -> Option<OwnerReference> {
    if registry.namespace().as_deref() == Some(namespace) {
        registry.controller_owner_ref(&())
    } else {
        None
    }
}

fn owned<K: Resource>(mut object: K, owner: &Option<OwnerReference>) -> K {
    if let Some(owner) = owner {
        object.meta_mut().owner_references = Some(vec![owner.clone()]);
    }
    object
}

fn availability_condition(outcome: &Result<()>) -> Condition {
    match outcome {
        Ok(()) => Condition {
            condition_type: CONDITION_AVAILABLE.to_string(),
            status: "True".to_string(),
            reason: "ObjectsApplied".to_string(),
            message: None,
        },
        Err(e) => Condition {
            condition_type: CONDITION_AVAILABLE.to_string(),
            status: "False".to_string(),
            reason: failure_reason(e).to_string(),
            message: Some(e.to_string()),
        },
    }
}

fn failure_reason(error: &OperatorError) -> &'static str {
    match error {
        OperatorError::InvalidNamespace(_) | OperatorError::ConfigError(_) => "InvalidConfiguration",
        OperatorError::TemplateSyntaxError { .. }
        | OperatorError::TemplateNotFound(_)
        | OperatorError::RenderError { .. }
        | OperatorError::DecodeError { .. } => "TemplateFailed",
        OperatorError::ClusterQueryError(_) => "DomainUnavailable",
        OperatorError::KubeError(_) => "ApplyFailed",
    }
}

async fn reconcile(registry: Arc<ModelRegistry>, ctx: Arc<ModelRegistryReconciler>) -> Result<Action> {
    let name = registry.name_any();
    let namespace = registry.namespace().unwrap_or_default();

    info!("Reconciling model registry {}/{}", namespace, name);

    let outcome = ctx.reconcile_objects(&registry).await;
    if let Err(e) = ctx.update_status(&registry, &outcome).await {
        warn!("Failed to update status of {}/{}: {}", namespace, name, e);
    }

    outcome.map(|_| Action::requeue(Duration::from_secs(REQUEUE_SECS)))
}

fn error_policy(
    _registry: Arc<ModelRegistry>,
    error: &OperatorError,
    _ctx: Arc<ModelRegistryReconciler>,
) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_SECS))
}
