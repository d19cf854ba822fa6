// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tracing::{info, warn};

use model_registry_operator::config::{Config, ConfigStore};
use model_registry_operator::kubernetes::detect_openshift;
use model_registry_operator::reconcilers::ModelRegistryReconciler;
use model_registry_operator::templates::{Applier, TemplateSet};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting model registry operator");

    // A broken template is fatal before any reconciliation starts
    let templates = Arc::new(TemplateSet::parse()?);

    // Load configuration
    let config = Config::from_env()?;
    let store = Arc::new(ConfigStore::from_env()?);
    info!(
        "Configuration loaded: registries_namespace={:?}, control_plane={:?}",
        store.registries_namespace(),
        store.default_control_plane()
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let is_openshift = detect_openshift(&client, config.openshift).await?;
    store.set_default_domain(&config.default_domain, client.clone(), is_openshift);

    let applier = Applier::new(templates, store);
    let reconciler = ModelRegistryReconciler::new(client, applier, is_openshift);

    info!("Starting reconciler...");
    reconciler.run().await?;

    // This should never be reached as the reconciler runs forever
    warn!("Reconciler stopped unexpectedly");
    Ok(())
}
