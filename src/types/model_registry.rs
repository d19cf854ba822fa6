// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REST_PORT: i32 = 8080;
pub const DEFAULT_GRPC_PORT: i32 = 9090;
pub const DEFAULT_OAUTH_PROXY_PORT: i32 = 8443;

pub const ROUTE_ENABLED: &str = "enabled";
pub const ROUTE_DISABLED: &str = "disabled";

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[kube(group = "modelregistry.opendatahub.io", version = "v1alpha1", kind = "ModelRegistry")]
#[kube(namespaced)]
#[kube(status = "ModelRegistryStatus")]
#[serde(rename_all = "camelCase")]
pub struct ModelRegistrySpec {
    #[serde(default)]
    pub rest: RestSpec,
    #[serde(default)]
    pub grpc: GrpcSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_proxy: Option<OAuthProxySpec>,
}

impl ModelRegistrySpec {
    /// Whether the REST endpoint should be published through a Route or Ingress
    pub fn exposes_rest(&self) -> bool {
        match &self.oauth_proxy {
            Some(proxy) => proxy.service_route == ROUTE_ENABLED,
            None => self.rest.service_route == ROUTE_ENABLED,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestSpec {
    #[serde(default = "default_rest_port")]
    pub port: i32,
    #[serde(default = "default_route")]
    pub service_route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Default for RestSpec {
    fn default() -> Self {
        Self {
            port: DEFAULT_REST_PORT,
            service_route: default_route(),
            image: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrpcSpec {
    #[serde(default = "default_grpc_port")]
    pub port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Default for GrpcSpec {
    fn default() -> Self {
        Self {
            port: DEFAULT_GRPC_PORT,
            image: None,
        }
    }
}

/// OAuth proxy sidecar fronting the REST service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OAuthProxySpec {
    #[serde(default = "default_oauth_proxy_port")]
    pub port: i32,
    #[serde(default = "default_route")]
    pub service_route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelRegistryStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_rest_port() -> i32 {
    DEFAULT_REST_PORT
}

fn default_grpc_port() -> i32 {
    DEFAULT_GRPC_PORT
}

fn default_oauth_proxy_port() -> i32 {
    DEFAULT_OAUTH_PROXY_PORT
}

fn default_route() -> String {
    ROUTE_DISABLED.to_string()
}
