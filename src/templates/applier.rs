// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::config::ConfigStore;
use crate::error::{OperatorError, Result};
use crate::templates::{RenderContext, TemplateSet};
use crate::types::ModelRegistrySpec;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Per-reconciliation inputs to a template
#[derive(Debug, Clone)]
pub struct RenderParams<'a> {
    pub name: String,
    pub namespace: String,
    pub spec: &'a ModelRegistrySpec,
}

/// Renders manifest templates with the current defaults and decodes them into typed objects
#[derive(Clone)]
pub struct Applier {
    templates: Arc<TemplateSet>,
    config: Arc<ConfigStore>,
}

impl Applier {
    pub fn new(templates: Arc<TemplateSet>, config: Arc<ConfigStore>) -> Self {
        Self { templates, config }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Render `template_name` and decode it into `T`.
    ///
    /// The base domain is only resolved for templates that reference it.
    #[instrument(skip(self, params), fields(name = %params.name, namespace = %params.namespace))]
    pub async fn render_object<T: DeserializeOwned>(
        &self,
        params: &RenderParams<'_>,
        template_name: &str,
    ) -> Result<T> {
        let domain = if self.templates.needs_domain(template_name) {
            Some(self.config.default_domain().await?)
        } else {
            None
        };
        let defaults = self.config.snapshot();

        let rendered = self.templates.render(
            template_name,
            RenderContext {
                name: &params.name,
                namespace: &params.namespace,
                spec: params.spec,
                defaults: &defaults,
                domain: domain.as_deref(),
            },
        )?;
        debug!("Rendered {}:\n{}", template_name, rendered);

        serde_yaml::from_str(&rendered).map_err(|e| OperatorError::DecodeError {
            name: template_name.to_string(),
            message: e.to_string(),
        })
    }

    /// Render `template_name` into `target`, which is only written on success
    pub async fn apply<T: DeserializeOwned>(
        &self,
        params: &RenderParams<'_>,
        template_name: &str,
        target: &mut T,
    ) -> Result<()> {
        *target = self.render_object(params, template_name).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::templates as names;
    use crate::test_utils::{cluster_ingress_json, MockService, CLUSTER_INGRESS_PATH};
    use crate::types::model_registry::{OAuthProxySpec, ROUTE_ENABLED};
    use crate::types::Route;
    use k8s_openapi::api::networking::v1::{Ingress, NetworkPolicy};
    use k8s_openapi::api::rbac::v1::{Role, RoleBinding};

    fn applier() -> Applier {
        Applier::new(
            Arc::new(TemplateSet::parse().unwrap()),
            Arc::new(ConfigStore::new()),
        )
    }

    fn params(spec: &ModelRegistrySpec) -> RenderParams<'_> {
        RenderParams {
            name: "test".to_string(),
            namespace: "test-namespace".to_string(),
            spec,
        }
    }

    fn proxied_spec() -> ModelRegistrySpec {
        ModelRegistrySpec {
            oauth_proxy: Some(OAuthProxySpec {
                port: 8443,
                service_route: ROUTE_ENABLED.to_string(),
                image: Some("example.com/oauth-proxy:v1".to_string()),
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_role_identity_is_derived_from_params() {
        let applier = applier();

        for spec in [ModelRegistrySpec::default(), proxied_spec()] {
            let params = params(&spec);
            let mut result = Role::default();
            applier.apply(&params, names::ROLE, &mut result).await.unwrap();

            assert_eq!(result.metadata.name.as_deref(), Some("registry-user-test"));
            assert_eq!(result.metadata.namespace.as_deref(), Some("test-namespace"));
            let rules = result.rules.expect("role should have rules");
            assert_eq!(rules[0].resource_names.as_deref(), Some(&["test".to_string()][..]));
        }
    }

    #[tokio::test]
    async fn test_identical_params_give_identical_objects() {
        let applier = applier();
        let spec = proxied_spec();

        let first: NetworkPolicy = applier.render_object(&params(&spec), names::NETWORK_POLICY).await.unwrap();
        let second: NetworkPolicy = applier.render_object(&params(&spec), names::NETWORK_POLICY).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_role_binding_references_role() {
        let applier = applier();
        let spec = ModelRegistrySpec::default();

        let binding: RoleBinding = applier.render_object(&params(&spec), names::ROLE_BINDING).await.unwrap();

        assert_eq!(binding.role_ref.name, "registry-user-test");
        assert_eq!(binding.metadata.namespace.as_deref(), Some("test-namespace"));
        let subjects = binding.subjects.expect("binding should have subjects");
        assert_eq!(subjects[0].name, "test-users");
    }

    #[tokio::test]
    async fn test_network_policy_follows_proxy_port_and_mesh() {
        let applier = applier();
        let spec = proxied_spec();

        let policy: NetworkPolicy = applier.render_object(&params(&spec), names::NETWORK_POLICY).await.unwrap();
        let ingress = policy.spec.unwrap().ingress.unwrap();
        let port = ingress[0].ports.as_ref().unwrap()[0].port.clone();
        assert_eq!(port, Some(k8s_openapi::apimachinery::pkg::util::intstr::IntOrString::Int(8443)));
        let from = ingress[0].from.as_ref().unwrap();
        assert!(from[0].pod_selector.is_none());

        applier.config().set_default_control_plane("istio-system");
        let policy: NetworkPolicy = applier.render_object(&params(&spec), names::NETWORK_POLICY).await.unwrap();
        let ingress = policy.spec.unwrap().ingress.unwrap();
        let from = ingress[0].from.as_ref().unwrap();
        let pod_labels = from[0].pod_selector.as_ref().unwrap().match_labels.as_ref().unwrap();
        assert_eq!(pod_labels.get("istio").map(String::as_str), Some("ingressgateway"));
    }

    #[tokio::test]
    async fn test_route_uses_discovered_domain() {
        let mock = MockService::new().on_get(CLUSTER_INGRESS_PATH, 200, &cluster_ingress_json("domain3"));
        let applier = applier();
        applier.config().set_default_domain("", mock.clone().into_client(), true);
        applier.config().set_default_cert("-----BEGIN CERTIFICATE-----\nabc\n-----END CERTIFICATE-----\n");
        let spec = proxied_spec();

        let route: Route = applier.render_object(&params(&spec), names::HTTPS_ROUTE).await.unwrap();
        let again: Route = applier.render_object(&params(&spec), names::HTTPS_ROUTE).await.unwrap();

        assert_eq!(route.spec.host.as_deref(), Some("test-rest.domain3"));
        assert_eq!(route.spec.to.name, "test");
        let tls = route.spec.tls.as_ref().unwrap();
        assert_eq!(tls.termination, "reencrypt");
        assert_eq!(
            tls.destination_ca_certificate.as_deref(),
            Some("-----BEGIN CERTIFICATE-----\nabc\n-----END CERTIFICATE-----\n")
        );
        assert_eq!(route, again);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_ingress_uses_explicit_domain() {
        let applier = applier();
        applier
            .config()
            .set_default_domain("apps.example.com", MockService::new().into_client(), false);
        let spec = ModelRegistrySpec::default();

        let ingress: Ingress = applier.render_object(&params(&spec), names::INGRESS).await.unwrap();

        let rules = ingress.spec.unwrap().rules.unwrap();
        assert_eq!(rules[0].host.as_deref(), Some("test-rest.apps.example.com"));
        let backend = rules[0].http.as_ref().unwrap().paths[0].backend.service.clone().unwrap();
        assert_eq!(backend.port.unwrap().number, Some(8080));
    }

    #[tokio::test]
    async fn test_domain_failure_leaves_target_untouched() {
        let applier = applier();
        applier.config().set_default_domain("", MockService::new().into_client(), true);
        let spec = ModelRegistrySpec::default();

        let mut target = Ingress::default();
        let err = applier
            .apply(&params(&spec), names::INGRESS, &mut target)
            .await
            .unwrap_err();

        assert!(matches!(err, OperatorError::ClusterQueryError(_)));
        assert_eq!(target, Ingress::default());
    }

    #[tokio::test]
    async fn test_role_does_not_need_domain() {
        // No domain source configured at all
        let applier = applier();
        let spec = ModelRegistrySpec::default();

        let role: Role = applier.render_object(&params(&spec), names::ROLE).await.unwrap();
        assert_eq!(role.metadata.name.as_deref(), Some("registry-user-test"));
    }

    #[tokio::test]
    async fn test_decode_into_wrong_kind_is_decode_error() {
        let applier = applier();
        let spec = ModelRegistrySpec::default();

        let mut target = NetworkPolicy::default();
        let err = applier
            .apply(&params(&spec), names::ROLE, &mut target)
            .await
            .unwrap_err();

        assert!(matches!(err, OperatorError::DecodeError { .. }));
        assert_eq!(target, NetworkPolicy::default());
    }

    #[tokio::test]
    async fn test_unknown_template() {
        let applier = applier();
        let spec = ModelRegistrySpec::default();

        let result: Result<Role> = applier.render_object(&params(&spec), "deployment.yaml.tmpl").await;
        assert!(matches!(result, Err(OperatorError::TemplateNotFound(_))));
    }
}
