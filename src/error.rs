// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperatorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Namespace override is not a valid DNS label
    #[error("Invalid namespace {0:?}: must be a lowercase RFC 1123 label")]
    InvalidNamespace(String),

    #[error("Template {name} failed to parse: {message}")]
    TemplateSyntaxError { name: String, message: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to render template {name}: {message}")]
    RenderError { name: String, message: String },

    #[error("Failed to decode rendered template {name}: {message}")]
    DecodeError { name: String, message: String },

    /// Base domain lookup failed, including when the caller's deadline expired
    #[error("Cluster query failed: {0}")]
    ClusterQueryError(String),
}

pub type Result<T> = std::result::Result<T, OperatorError>;
