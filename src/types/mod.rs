// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource and third-party cluster object definitions.

pub mod ingress;
pub mod model_registry;
pub mod route;

pub use ingress::{ClusterIngress, IngressController};
pub use model_registry::{ModelRegistry, ModelRegistrySpec, ModelRegistryStatus};
pub use route::Route;
