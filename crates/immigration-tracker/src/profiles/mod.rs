//! Deployment profile resolution and the profile-to-database registry.

pub mod binding;
pub mod profile;
pub mod registry;
pub mod resolver;
pub mod source;

pub use binding::{BindingView, DatabaseProfileBinding, StorageEngine, StorageKind};
pub use profile::DeploymentProfile;
pub use registry::{ProfileError, ProfileRegistry, ProfileRegistryBuilder};
pub use resolver::{
    ProfileReport, ProfileResolver, Resolution, ACTIVE_PROFILES_LABEL, NO_ACTIVE_PROFILE_REPORT,
};
pub use source::{EnvProfileSource, FixedProfiles, ProfileSource, PROFILES_ENV_VAR};
