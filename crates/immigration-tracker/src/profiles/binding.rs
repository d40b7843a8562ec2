use serde::{Deserialize, Serialize};

use super::profile::DeploymentProfile;

/// Storage engine a deployment profile is expected to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEngine {
    Sqlite,
    Postgres,
    H2InMemory,
}

impl StorageEngine {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sqlite => "SQLite",
            Self::Postgres => "PostgreSQL",
            Self::H2InMemory => "H2 in-memory",
        }
    }

    pub const fn kind(self) -> StorageKind {
        match self {
            Self::Sqlite => StorageKind::EmbeddedFile,
            Self::Postgres => StorageKind::ClientServer,
            Self::H2InMemory => StorageKind::InMemory,
        }
    }

    /// Connection URL reported for the engine. Nothing is opened from it here.
    pub const fn default_url(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite://immigration_tracker.db",
            Self::Postgres => "postgresql://localhost:5432/immigration_tracker",
            Self::H2InMemory => "h2:mem:immigration_tracker",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    EmbeddedFile,
    ClientServer,
    InMemory,
}

impl StorageKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EmbeddedFile => "embedded file-backed",
            Self::ClientServer => "client-server",
            Self::InMemory => "ephemeral in-memory",
        }
    }
}

/// Association between a deployment profile and the storage it selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseProfileBinding {
    pub profile: DeploymentProfile,
    pub engine: StorageEngine,
    pub environment_label: String,
}

impl DatabaseProfileBinding {
    pub fn new(
        profile: impl Into<DeploymentProfile>,
        engine: StorageEngine,
        environment_label: impl Into<String>,
    ) -> Self {
        Self {
            profile: profile.into(),
            engine,
            environment_label: environment_label.into(),
        }
    }

    pub fn development() -> Self {
        Self::new("dev", StorageEngine::Sqlite, "development")
    }

    pub fn production() -> Self {
        Self::new("prod", StorageEngine::Postgres, "production")
    }

    pub fn test() -> Self {
        Self::new("test", StorageEngine::H2InMemory, "test")
    }

    /// Human readable line describing which database the profile uses.
    pub fn database_info(&self) -> String {
        format!(
            "Using {} database for {} environment",
            self.engine.label(),
            self.environment_label
        )
    }

    pub fn view(&self) -> BindingView {
        BindingView {
            profile: self.profile.clone(),
            engine: self.engine,
            engine_label: self.engine.label(),
            storage_kind: self.engine.kind().label(),
            connection_url: self.engine.default_url(),
            database_info: self.database_info(),
        }
    }
}

/// Serializable projection of a binding for reports and HTTP payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingView {
    pub profile: DeploymentProfile,
    pub engine: StorageEngine,
    pub engine_label: &'static str,
    pub storage_kind: &'static str,
    pub connection_url: &'static str,
    pub database_info: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_info_matches_each_default_binding() {
        assert_eq!(
            DatabaseProfileBinding::development().database_info(),
            "Using SQLite database for development environment"
        );
        assert_eq!(
            DatabaseProfileBinding::production().database_info(),
            "Using PostgreSQL database for production environment"
        );
        assert_eq!(
            DatabaseProfileBinding::test().database_info(),
            "Using H2 in-memory database for test environment"
        );
    }

    #[test]
    fn engines_map_to_distinct_storage_kinds() {
        assert_eq!(StorageEngine::Sqlite.kind(), StorageKind::EmbeddedFile);
        assert_eq!(StorageEngine::Postgres.kind(), StorageKind::ClientServer);
        assert_eq!(StorageEngine::H2InMemory.kind(), StorageKind::InMemory);
    }
}
