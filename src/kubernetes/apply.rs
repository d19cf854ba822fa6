// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-or-update of generated objects via server-side apply

use crate::constants::OPERATOR_NAME;
use crate::error::{OperatorError, Result};
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{Patch, PatchParams},
    Api, Client, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{info, instrument};

/// Apply a namespaced object, creating it or taking ownership of its fields
#[instrument(skip(client, object), fields(object = %object.name_any()))]
pub async fn apply_object<K>(client: &Client, object: &K) -> Result<K>
where
    K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + Serialize + DeserializeOwned,
    K::DynamicType: Default,
{
    let name = object.name_any();
    let namespace = object.namespace().ok_or_else(|| {
        OperatorError::ConfigError(format!("object {} has no namespace", name))
    })?;
    let api: Api<K> = Api::namespaced(client.clone(), &namespace);

    let pp = PatchParams::apply(OPERATOR_NAME).force();
    let applied = api.patch(&name, &pp, &Patch::Apply(object)).await?;

    info!(
        "Applied {} {}/{}",
        K::kind(&K::DynamicType::default()),
        namespace,
        name
    );
    Ok(applied)
}
