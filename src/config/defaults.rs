// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Shared defaults consulted by every reconciliation.
//!
//! A single [`ConfigStore`] is built at startup and handed to reconcilers
//! behind an `Arc`. All fields sit behind one lock so [`ConfigStore::snapshot`]
//! never observes a half-applied update. The base domain is the exception: it
//! lives in its own [`DomainResolver`] so a slow cluster lookup never blocks
//! readers of the other defaults.

use crate::config::domain::DomainResolver;
use crate::config::get_string_config_with_default;
use crate::config::namespace::validate_namespace;
use crate::constants::{env as keys, images, DEFAULT_ISTIO_INGRESS_NAME};
use crate::error::Result;
use kube::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Registry components that ship their own container image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Grpc,
    Rest,
    OAuthProxy,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Grpc, Component::Rest, Component::OAuthProxy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Grpc => "grpc",
            Component::Rest => "rest",
            Component::OAuthProxy => "oauth-proxy",
        }
    }

    pub fn env_key(&self) -> &'static str {
        match self {
            Component::Grpc => keys::GRPC_IMAGE,
            Component::Rest => keys::REST_IMAGE,
            Component::OAuthProxy => keys::OAUTH_PROXY_IMAGE,
        }
    }

    pub fn default_image(&self) -> &'static str {
        match self {
            Component::Grpc => images::DEFAULT_GRPC_IMAGE,
            Component::Rest => images::DEFAULT_REST_IMAGE,
            Component::OAuthProxy => images::DEFAULT_OAUTH_PROXY_IMAGE,
        }
    }
}

/// Point-in-time copy of all defaults, exposed to templates as `defaults`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDefaults {
    pub images: BTreeMap<String, String>,
    pub audiences: Vec<String>,
    pub auth_provider: String,
    pub auth_config_labels: BTreeMap<String, String>,
    pub cert: String,
    pub control_plane: String,
    pub istio_ingress: String,
    pub registries_namespace: String,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            images: Component::ALL
                .iter()
                .map(|c| (c.as_str().to_string(), c.default_image().to_string()))
                .collect(),
            audiences: Vec::new(),
            auth_provider: String::new(),
            auth_config_labels: BTreeMap::new(),
            cert: String::new(),
            control_plane: String::new(),
            istio_ingress: DEFAULT_ISTIO_INGRESS_NAME.to_string(),
            registries_namespace: String::new(),
        }
    }
}

pub struct ConfigStore {
    defaults: RwLock<ConfigDefaults>,
    domain: DomainResolver,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            defaults: RwLock::new(ConfigDefaults::default()),
            domain: DomainResolver::new(),
        }
    }

    /// Build the store from the environment, validating the namespace override
    pub fn from_env() -> Result<Self> {
        let store = Self::new();

        for component in Component::ALL {
            let image = get_string_config_with_default(component.env_key(), component.default_image());
            store.set_image(component, &image);
        }

        let audiences = get_string_config_with_default(keys::DEFAULT_AUDIENCES, "");
        store.set_default_audiences(
            audiences
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect(),
        );
        store.set_default_auth_provider(&get_string_config_with_default(keys::DEFAULT_AUTH_PROVIDER, ""));
        store.set_default_auth_config_labels(&get_string_config_with_default(
            keys::DEFAULT_AUTH_CONFIG_LABELS,
            "",
        ));
        store.set_default_cert(&get_string_config_with_default(keys::DEFAULT_CERT, ""));
        store.set_default_control_plane(&get_string_config_with_default(keys::DEFAULT_CONTROL_PLANE, ""));
        store.set_default_istio_ingress(&get_string_config_with_default(keys::DEFAULT_ISTIO_INGRESS, ""));
        store.set_registries_namespace(&get_string_config_with_default(keys::REGISTRIES_NAMESPACE, ""))?;

        Ok(store)
    }

    fn read(&self) -> RwLockReadGuard<'_, ConfigDefaults> {
        self.defaults.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigDefaults> {
        self.defaults.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy every default under a single read guard
    pub fn snapshot(&self) -> ConfigDefaults {
        self.read().clone()
    }

    pub fn image(&self, component: Component) -> String {
        self.read()
            .images
            .get(component.as_str())
            .cloned()
            .unwrap_or_else(|| component.default_image().to_string())
    }

    pub fn set_image(&self, component: Component, image: &str) {
        let image = if image.is_empty() { component.default_image() } else { image };
        self.write()
            .images
            .insert(component.as_str().to_string(), image.to_string());
    }

    pub fn default_audiences(&self) -> Vec<String> {
        self.read().audiences.clone()
    }

    pub fn set_default_audiences(&self, audiences: Vec<String>) {
        self.write().audiences = audiences;
    }

    pub fn default_auth_provider(&self) -> String {
        self.read().auth_provider.clone()
    }

    pub fn set_default_auth_provider(&self, provider: &str) {
        self.write().auth_provider = provider.to_string();
    }

    pub fn default_auth_config_labels(&self) -> BTreeMap<String, String> {
        self.read().auth_config_labels.clone()
    }

    /// Replace the auth config label selector.
    ///
    /// Accepts `key=value` pairs separated by commas; a bare `key` maps to an
    /// empty value.
    pub fn set_default_auth_config_labels(&self, selector: &str) {
        let labels = parse_label_selector(selector);
        debug!("Auth config labels set to {:?}", labels);
        self.write().auth_config_labels = labels;
    }

    pub fn default_cert(&self) -> String {
        self.read().cert.clone()
    }

    pub fn set_default_cert(&self, cert: &str) {
        self.write().cert = cert.to_string();
    }

    pub fn default_control_plane(&self) -> String {
        self.read().control_plane.clone()
    }

    /// Empty disables service mesh integration
    pub fn set_default_control_plane(&self, control_plane: &str) {
        self.write().control_plane = control_plane.to_string();
    }

    pub fn default_istio_ingress(&self) -> String {
        self.read().istio_ingress.clone()
    }

    pub fn set_default_istio_ingress(&self, ingress: &str) {
        let ingress = if ingress.is_empty() { DEFAULT_ISTIO_INGRESS_NAME } else { ingress };
        self.write().istio_ingress = ingress.to_string();
    }

    pub fn registries_namespace(&self) -> String {
        self.read().registries_namespace.clone()
    }

    /// Set the operator-wide namespace override. Invalid names leave the
    /// current value untouched.
    pub fn set_registries_namespace(&self, namespace: &str) -> Result<()> {
        validate_namespace(namespace)?;
        self.write().registries_namespace = namespace.to_string();
        Ok(())
    }

    pub fn set_default_domain(&self, domain: &str, client: Client, is_openshift: bool) {
        self.domain.set_default_domain(domain, client, is_openshift);
    }

    pub async fn default_domain(&self) -> Result<String> {
        self.domain.get_default_domain().await
    }
}

fn parse_label_selector(selector: &str) -> BTreeMap<String, String> {
    selector
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| match term.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (term.to_string(), String::new()),
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
