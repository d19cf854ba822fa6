// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Platform detection through API discovery

use crate::error::Result;
use kube::{discovery::Discovery, Client};
use tracing::info;

/// API group only served by OpenShift clusters
const ROUTE_API_GROUP: &str = "route.openshift.io";

/// Decide whether the operator runs on OpenShift, honouring an explicit override.
pub async fn detect_openshift(client: &Client, configured: Option<bool>) -> Result<bool> {
    if let Some(is_openshift) = configured {
        info!("Platform configured explicitly: openshift={}", is_openshift);
        return Ok(is_openshift);
    }

    let is_openshift = is_openshift(client).await?;
    info!("Platform discovered: openshift={}", is_openshift);
    Ok(is_openshift)
}

/// Check if the Route API group is served by the cluster.
pub async fn is_openshift(client: &Client) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[ROUTE_API_GROUP])
        .run()
        .await?;

    let found = discovery.groups().any(|group| group.name() == ROUTE_API_GROUP);
    Ok(found)
}
