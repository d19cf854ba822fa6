// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Platform objects carrying the cluster base domain.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Cluster-wide ingress configuration (`config.openshift.io/v1`, always named `cluster`)
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "Ingress",
    plural = "ingresses"
)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps_domain: Option<String>,
}

/// The config.openshift.io `Ingress`, named apart from the networking.k8s.io one
pub type ClusterIngress = Ingress;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "operator.openshift.io",
    version = "v1",
    kind = "IngressController",
    plural = "ingresscontrollers"
)]
#[kube(namespaced)]
#[kube(status = "IngressControllerStatus")]
#[serde(rename_all = "camelCase")]
pub struct IngressControllerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngressControllerStatus {
    /// Domain actually in use by the controller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl ClusterIngress {
    pub fn base_domain(&self) -> Option<&str> {
        self.spec.domain.as_deref().filter(|d| !d.is_empty())
    }
}

impl IngressController {
    pub fn status_domain(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.domain.as_deref())
            .filter(|d| !d.is_empty())
    }
}
