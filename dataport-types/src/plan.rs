//! Replication modes and the results handed back to callers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, ProjectedPackage, ProjectedResource};

/// Which mutation verb the orchestrator uses for the target package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Create,
    Update,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Create => "create",
            Mode::Update => "update",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Mode::Create),
            "update" => Ok(Mode::Update),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

/// How a field differs between the source and the target package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldChange {
    /// Present on the source only.
    Insert,
    /// Present on both with different values.
    Update,
    /// Present on the target only.
    Delete,
}

/// Read-only preview of what a replication would do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPreview {
    pub mode: Mode,
    /// Projected package metadata, without its resources.
    pub package: ProjectedPackage,
    pub resources: Vec<ProjectedResource>,
    /// Field-level differences against the existing target package.
    /// Empty in create mode.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub changes: BTreeMap<String, FieldChange>,
}

/// Result of a successful replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationOutcome {
    /// Canonical browsing URL of the target package.
    pub url: String,
    pub mode: Mode,
    /// Whether the source package was purged afterwards.
    #[serde(default)]
    pub source_purged: bool,
    /// Why a requested source purge did not happen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cleanup_error: Option<String>,
}
