// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Manifest templates for the objects generated per model registry.
//!
//! The templates are compiled into the binary and parsed once at startup;
//! a broken template stops the operator before any reconciliation runs.
//! Rendering is strict: referencing an undefined value is an error, never
//! an empty string in the output.

pub mod applier;

pub use applier::{Applier, RenderParams};

use crate::config::ConfigDefaults;
use crate::constants::templates as names;
use crate::error::{OperatorError, Result};
use crate::types::ModelRegistrySpec;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Context variable holding the cluster base domain
const DOMAIN_VAR: &str = "domain";
const NAMESPACE_VAR: &str = "namespace";

const MANIFESTS: &[(&str, &str)] = &[
    (names::ROLE, include_str!("../../templates/role.yaml.tmpl")),
    (names::ROLE_BINDING, include_str!("../../templates/role-binding.yaml.tmpl")),
    (names::NETWORK_POLICY, include_str!("../../templates/network-policy.yaml.tmpl")),
    (names::INGRESS, include_str!("../../templates/ingress.yaml.tmpl")),
    (names::HTTPS_ROUTE, include_str!("../../templates/https-route.yaml.tmpl")),
];

/// Variables visible to every manifest template
#[derive(Debug, Serialize)]
pub struct RenderContext<'a> {
    pub name: &'a str,
    pub namespace: &'a str,
    pub spec: &'a ModelRegistrySpec,
    pub defaults: &'a ConfigDefaults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<&'a str>,
}

/// Immutable set of parsed templates, shared between reconcilers
pub struct TemplateSet {
    env: Environment<'static>,
    needs_domain: HashSet<&'static str>,
}

impl TemplateSet {
    /// Parse all compiled-in manifest templates
    pub fn parse() -> Result<Self> {
        Self::from_sources(MANIFESTS)
    }

    pub fn from_sources(sources: &[(&'static str, &'static str)]) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        // The builtin `namespace()` would shadow a missing context value
        env.remove_global(NAMESPACE_VAR);

        let mut needs_domain = HashSet::new();
        for &(name, source) in sources {
            env.add_template(name, source)
                .map_err(|e| OperatorError::TemplateSyntaxError {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;

            let template = env.get_template(name).map_err(|e| OperatorError::TemplateSyntaxError {
                name: name.to_string(),
                message: e.to_string(),
            })?;
            if template.undeclared_variables(false).contains(DOMAIN_VAR) {
                needs_domain.insert(name);
            }
            debug!("Parsed template {}", name);
        }

        Ok(Self { env, needs_domain })
    }

    /// Whether rendering `name` requires the cluster base domain
    pub fn needs_domain(&self, name: &str) -> bool {
        self.needs_domain.contains(name)
    }

    /// Render the template `name` against `ctx`
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => OperatorError::TemplateNotFound(name.to_string()),
            _ => OperatorError::RenderError {
                name: name.to_string(),
                message: e.to_string(),
            },
        })?;

        template.render(ctx).map_err(|e| OperatorError::RenderError {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}
