//! Seam towards the persistence layer that owns real database connections.

use serde::Serialize;

use crate::profiles::{DatabaseProfileBinding, DeploymentProfile, StorageEngine};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("storage for profile '{profile}' is unavailable: {reason}")]
pub struct StorageUnavailable {
    pub profile: DeploymentProfile,
    pub reason: String,
}

/// Handle returned once the persistence layer accepts a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageHandle {
    pub profile: DeploymentProfile,
    pub engine: StorageEngine,
    pub connection_url: String,
}

/// Implemented by the persistence collaborator that turns a binding into a
/// live store.
pub trait StorageConnector: Send + Sync {
    fn connect(&self, binding: &DatabaseProfileBinding) -> Result<StorageHandle, StorageUnavailable>;
}
