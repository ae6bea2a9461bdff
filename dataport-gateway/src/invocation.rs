//! Invocation body and dispatch.

use std::str::FromStr;

use dataport_catalog::{CatalogConfig, RemoteCatalog};
use dataport_replicate::Replicator;
use dataport_types::{DisplayPreview, Mode, ReplicationOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GatewayError, GatewayResult};

/// What an invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Display,
    Replicate,
}

impl FromStr for Step {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "display" => Ok(Step::Display),
            "replicate" => Ok(Step::Replicate),
            other => Err(GatewayError::InvalidStep(other.to_string())),
        }
    }
}

/// One replication request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    pub from: CatalogConfig,
    pub to: CatalogConfig,
    pub step: String,
    #[serde(rename = "packageID", alias = "package")]
    pub package_id: String,
    /// Skips target probing when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Purge the (non-production) source package after success.
    #[serde(default)]
    pub clean: bool,
}

/// Body returned for a successful invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InvocationResponse {
    Display(DisplayPreview),
    Replicate(ReplicationOutcome),
}

/// Runs one invocation against freshly built catalog handles.
///
/// The step is checked before any handle exists, so an unsupported step
/// never reaches either catalog.
pub async fn invoke(invocation: Invocation) -> GatewayResult<InvocationResponse> {
    let step: Step = invocation.step.parse()?;
    let package_id = invocation.package_id;

    let source = RemoteCatalog::new(invocation.from)?;
    let target = RemoteCatalog::new(invocation.to)?;
    let replicator = Replicator::new(&source, &target);

    info!("{:?} {} from {} to {}", step, package_id, source.config().base_url(), target.config().base_url());

    match step {
        Step::Display => {
            let preview = replicator.display(&package_id).await?;
            Ok(InvocationResponse::Display(preview))
        }
        Step::Replicate => {
            let mode = match invocation.mode {
                Some(mode) => mode,
                None => replicator.resolve_mode(&package_id).await?,
            };
            let outcome = replicator
                .replicate(&package_id, mode, invocation.clean)
                .await?;
            Ok(InvocationResponse::Replicate(outcome))
        }
    }
}
