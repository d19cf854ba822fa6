// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variable names read at startup
pub mod env {
    pub const GRPC_IMAGE: &str = "GRPC_IMAGE";
    pub const REST_IMAGE: &str = "REST_IMAGE";
    pub const OAUTH_PROXY_IMAGE: &str = "OAUTH_PROXY_IMAGE";
    pub const DEFAULT_DOMAIN: &str = "DEFAULT_DOMAIN";
    /// Comma separated list of OAuth audiences
    pub const DEFAULT_AUDIENCES: &str = "DEFAULT_AUDIENCES";
    pub const DEFAULT_AUTH_PROVIDER: &str = "DEFAULT_AUTH_PROVIDER";
    pub const DEFAULT_AUTH_CONFIG_LABELS: &str = "DEFAULT_AUTH_CONFIG_LABELS";
    pub const DEFAULT_CERT: &str = "DEFAULT_CERT";
    pub const DEFAULT_CONTROL_PLANE: &str = "DEFAULT_CONTROL_PLANE";
    pub const DEFAULT_ISTIO_INGRESS: &str = "DEFAULT_ISTIO_INGRESS";
    pub const REGISTRIES_NAMESPACE: &str = "REGISTRIES_NAMESPACE";
    /// "true"/"false" to skip API discovery of the platform
    pub const OPENSHIFT: &str = "OPENSHIFT";
}

/// Compiled-in fallbacks for the component images
pub mod images {
    pub const DEFAULT_GRPC_IMAGE: &str = "quay.io/opendatahub/mlmd-grpc-server:latest";
    pub const DEFAULT_REST_IMAGE: &str = "quay.io/opendatahub/model-registry:latest";
    pub const DEFAULT_OAUTH_PROXY_IMAGE: &str = "quay.io/openshift/origin-oauth-proxy:latest";
}

pub const DEFAULT_ISTIO_INGRESS_NAME: &str = "ingressgateway";

/// Field manager used for server-side apply
pub const OPERATOR_NAME: &str = "model-registry-operator";

/// Names of the compiled-in manifest templates
pub mod templates {
    pub const ROLE: &str = "role.yaml.tmpl";
    pub const ROLE_BINDING: &str = "role-binding.yaml.tmpl";
    pub const NETWORK_POLICY: &str = "network-policy.yaml.tmpl";
    pub const INGRESS: &str = "ingress.yaml.tmpl";
    pub const HTTPS_ROUTE: &str = "https-route.yaml.tmpl";
}

/// Cluster objects read when discovering the base domain
pub mod domain {
    /// Cluster-scoped `config.openshift.io/v1` Ingress
    pub const CLUSTER_INGRESS_NAME: &str = "cluster";
    pub const INGRESS_CONTROLLER_NAME: &str = "default";
    pub const INGRESS_CONTROLLER_NAMESPACE: &str = "openshift-ingress-operator";
}

pub mod reconcile {
    /// Upper bound for one reconciliation pass, the domain lookup included
    pub const DEADLINE_SECS: u64 = 30;
    pub const REQUEUE_SECS: u64 = 300;
    pub const ERROR_REQUEUE_SECS: u64 = 60;
}
