use super::binding::DatabaseProfileBinding;
use super::profile::DeploymentProfile;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("no database binding registered for profile '{profile}'")]
    UnknownProfile { profile: DeploymentProfile },
    #[error("profile '{profile}' already has a database binding")]
    DuplicateBinding { profile: DeploymentProfile },
}

/// Profile-to-storage table built once at startup.
///
/// The registry has no mutating methods; share it behind an `Arc` and every
/// reader sees the same bindings for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRegistry {
    bindings: Vec<DatabaseProfileBinding>,
}

impl ProfileRegistry {
    pub fn builder() -> ProfileRegistryBuilder {
        ProfileRegistryBuilder::default()
    }

    /// The `dev`, `prod` and `test` bindings.
    pub fn standard() -> Self {
        Self {
            bindings: vec![
                DatabaseProfileBinding::development(),
                DatabaseProfileBinding::production(),
                DatabaseProfileBinding::test(),
            ],
        }
    }

    pub fn binding_for(&self, profile: &DeploymentProfile) -> Option<&DatabaseProfileBinding> {
        self.bindings
            .iter()
            .find(|binding| &binding.profile == profile)
    }

    pub fn require_binding(
        &self,
        profile: &DeploymentProfile,
    ) -> Result<&DatabaseProfileBinding, ProfileError> {
        self.binding_for(profile)
            .ok_or_else(|| ProfileError::UnknownProfile {
                profile: profile.clone(),
            })
    }

    pub fn is_registered(&self, profile: &DeploymentProfile) -> bool {
        self.binding_for(profile).is_some()
    }

    /// Bindings in registration order.
    pub fn bindings(&self) -> &[DatabaseProfileBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Default)]
pub struct ProfileRegistryBuilder {
    bindings: Vec<DatabaseProfileBinding>,
}

impl ProfileRegistryBuilder {
    pub fn with_standard_bindings(self) -> Result<Self, ProfileError> {
        ProfileRegistry::standard()
            .bindings
            .into_iter()
            .try_fold(self, |builder, binding| builder.register(binding))
    }

    pub fn register(mut self, binding: DatabaseProfileBinding) -> Result<Self, ProfileError> {
        if self
            .bindings
            .iter()
            .any(|existing| existing.profile == binding.profile)
        {
            return Err(ProfileError::DuplicateBinding {
                profile: binding.profile,
            });
        }
        self.bindings.push(binding);
        Ok(self)
    }

    pub fn build(self) -> ProfileRegistry {
        ProfileRegistry {
            bindings: self.bindings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::StorageEngine;

    #[test]
    fn standard_registry_binds_three_distinct_profiles() {
        let registry = ProfileRegistry::standard();
        let dev = registry.binding_for(&"dev".into()).expect("dev bound");
        let prod = registry.binding_for(&"prod".into()).expect("prod bound");
        let test = registry.binding_for(&"test".into()).expect("test bound");

        assert_eq!(dev.engine, StorageEngine::Sqlite);
        assert_eq!(prod.engine, StorageEngine::Postgres);
        assert_eq!(test.engine, StorageEngine::H2InMemory);
        assert_ne!(dev, prod);
        assert_ne!(prod, test);
        assert_ne!(dev, test);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn unregistered_profile_is_absent_but_strict_lookup_fails() {
        let registry = ProfileRegistry::standard();
        let staging = DeploymentProfile::new("staging");

        assert!(registry.binding_for(&staging).is_none());
        assert_eq!(
            registry.require_binding(&staging),
            Err(ProfileError::UnknownProfile { profile: staging })
        );
    }

    #[test]
    fn profile_names_are_case_sensitive() {
        let registry = ProfileRegistry::standard();
        assert!(registry.binding_for(&"DEV".into()).is_none());
    }

    #[test]
    fn builder_rejects_duplicate_profiles() {
        let err = ProfileRegistry::builder()
            .with_standard_bindings()
            .and_then(|builder| {
                builder.register(DatabaseProfileBinding::new(
                    "dev",
                    StorageEngine::Postgres,
                    "development",
                ))
            })
            .expect_err("duplicate rejected");

        assert_eq!(
            err,
            ProfileError::DuplicateBinding {
                profile: "dev".into()
            }
        );
    }

    #[test]
    fn builder_extends_standard_bindings() {
        let registry = ProfileRegistry::builder()
            .with_standard_bindings()
            .and_then(|builder| {
                builder.register(DatabaseProfileBinding::new(
                    "staging",
                    StorageEngine::Postgres,
                    "staging",
                ))
            })
            .expect("registry builds")
            .build();

        let staging = registry
            .binding_for(&"staging".into())
            .expect("staging bound");
        assert_eq!(
            staging.database_info(),
            "Using PostgreSQL database for staging environment"
        );
        assert_eq!(registry.bindings()[0].profile.as_str(), "dev");
    }
}
