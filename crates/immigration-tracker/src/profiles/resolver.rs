use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::binding::{BindingView, DatabaseProfileBinding};
use super::profile::DeploymentProfile;
use super::registry::{ProfileError, ProfileRegistry};
use super::source::ProfileSource;

pub const NO_ACTIVE_PROFILE_REPORT: &str = "No active profile set - using default configuration";
pub const ACTIVE_PROFILES_LABEL: &str = "Active profiles: ";

/// Diagnostic line summarising the active profiles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileReport {
    profiles: Vec<DeploymentProfile>,
}

impl ProfileReport {
    /// Blank or multi-word names are left out of the report.
    pub fn new(mut profiles: Vec<DeploymentProfile>) -> Self {
        profiles.retain(DeploymentProfile::is_well_formed);
        Self { profiles }
    }

    pub fn profiles(&self) -> &[DeploymentProfile] {
        &self.profiles
    }

    pub fn is_default(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.profiles.is_empty() {
            return f.write_str(NO_ACTIVE_PROFILE_REPORT);
        }

        f.write_str(ACTIVE_PROFILES_LABEL)?;
        for profile in &self.profiles {
            write!(f, "{profile} ")?;
        }
        Ok(())
    }
}

impl Serialize for ProfileReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of one resolution pass: the report and the binding picked for it.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub report: ProfileReport,
    pub active_profiles: Vec<DeploymentProfile>,
    pub selected: Option<BindingView>,
    pub ignored_profiles: Vec<DeploymentProfile>,
}

/// Chooses a storage binding from the active profiles.
///
/// Holds no mutable state. Each call asks the [`ProfileSource`] again, so
/// a resolver can be shared between request handlers as-is.
#[derive(Debug)]
pub struct ProfileResolver<S> {
    source: S,
    registry: Arc<ProfileRegistry>,
}

impl<S> ProfileResolver<S>
where
    S: ProfileSource,
{
    pub fn new(source: S, registry: Arc<ProfileRegistry>) -> Self {
        Self { source, registry }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn resolve_active_profiles(&self) -> ProfileReport {
        ProfileReport::new(self.active_profiles())
    }

    pub fn binding_for(&self, profile: &DeploymentProfile) -> Option<&DatabaseProfileBinding> {
        self.registry.binding_for(profile)
    }

    pub fn require_binding(
        &self,
        profile: &DeploymentProfile,
    ) -> Result<&DatabaseProfileBinding, ProfileError> {
        self.registry.require_binding(profile)
    }

    /// First active profile, in reported order, that has a binding.
    pub fn select_binding(&self) -> Option<&DatabaseProfileBinding> {
        self.select(&self.active_profiles()).0
    }

    pub fn resolve(&self) -> Resolution {
        self.resolve_with_binding().0
    }

    /// Like [`Self::resolve`], also handing back the selected binding.
    ///
    /// The source is queried once, so the report and the binding always
    /// describe the same snapshot of the environment.
    pub fn resolve_with_binding(&self) -> (Resolution, Option<&DatabaseProfileBinding>) {
        let active = self.active_profiles();
        let (selected, ignored) = self.select(&active);

        let resolution = Resolution {
            report: ProfileReport::new(active.clone()),
            active_profiles: active,
            selected: selected.map(DatabaseProfileBinding::view),
            ignored_profiles: ignored,
        };
        (resolution, selected)
    }

    fn active_profiles(&self) -> Vec<DeploymentProfile> {
        self.source
            .active_profiles()
            .into_iter()
            .filter_map(|profile| DeploymentProfile::parse(profile.as_str()))
            .collect()
    }

    fn select(
        &self,
        active: &[DeploymentProfile],
    ) -> (Option<&DatabaseProfileBinding>, Vec<DeploymentProfile>) {
        let mut registered = active
            .iter()
            .filter_map(|profile| self.registry.binding_for(profile));

        let Some(selected) = registered.next() else {
            debug!(active = active.len(), "no registered profile active");
            return (None, Vec::new());
        };

        let mut ignored: Vec<DeploymentProfile> = Vec::new();
        for binding in registered {
            if binding.profile != selected.profile && !ignored.contains(&binding.profile) {
                ignored.push(binding.profile.clone());
            }
        }

        if !ignored.is_empty() {
            warn!(
                selected = %selected.profile,
                ignored = ?ignored,
                "several registered profiles active; keeping the first reported"
            );
        }

        (Some(selected), ignored)
    }
}
