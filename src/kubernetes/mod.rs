// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for platform discovery and applying generated objects.

pub mod apply;
pub mod platform;

pub use apply::apply_object;
pub use platform::detect_openshift;
