// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Operator configuration and the shared defaults used when rendering manifests.

pub mod defaults;
pub mod domain;
pub mod namespace;

pub use defaults::{Component, ConfigDefaults, ConfigStore};
pub use domain::DomainResolver;
pub use namespace::validate_namespace;

use crate::constants::env as keys;
use anyhow::{Context, Result};
use std::env;

/// Bootstrap settings loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Explicit cluster base domain, empty to discover it from the cluster
    pub default_domain: String,
    /// Forces the platform flavour instead of probing the API server
    pub openshift: Option<bool>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let default_domain = get_string_config_with_default(keys::DEFAULT_DOMAIN, "");
        let openshift = match get_string_config_with_default(keys::OPENSHIFT, "").as_str() {
            "" => None,
            value => Some(
                value
                    .parse::<bool>()
                    .with_context(|| format!("{} must be true or false, got {:?}", keys::OPENSHIFT, value))?,
            ),
        };

        Ok(Config {
            default_domain,
            openshift,
        })
    }
}

/// Read `key` from the environment, falling back to `default` when it is unset or blank
pub fn get_string_config_with_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
