use std::env;

use super::profile::DeploymentProfile;

/// Environment variable holding the comma separated active profiles.
pub const PROFILES_ENV_VAR: &str = "APP_PROFILES";

/// Supplies the active deployment profiles at query time.
pub trait ProfileSource: Send + Sync {
    fn active_profiles(&self) -> Vec<DeploymentProfile>;
}

/// A list captured once, typically from a CLI override.
///
/// Names are trimmed on the way in and blank ones are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedProfiles(Vec<DeploymentProfile>);

impl FixedProfiles {
    pub fn new(profiles: Vec<DeploymentProfile>) -> Self {
        profiles.into_iter().collect()
    }
}

impl<P> FromIterator<P> for FixedProfiles
where
    P: Into<DeploymentProfile>,
{
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(Into::into)
                .filter_map(|profile| DeploymentProfile::parse(profile.as_str()))
                .collect(),
        )
    }
}

impl ProfileSource for FixedProfiles {
    fn active_profiles(&self) -> Vec<DeploymentProfile> {
        self.0.clone()
    }
}

/// Re-reads a process environment variable on every query.
#[derive(Debug, Clone)]
pub struct EnvProfileSource {
    variable: String,
}

impl EnvProfileSource {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl Default for EnvProfileSource {
    fn default() -> Self {
        Self::new(PROFILES_ENV_VAR)
    }
}

impl ProfileSource for EnvProfileSource {
    fn active_profiles(&self) -> Vec<DeploymentProfile> {
        env::var(&self.variable)
            .map(|raw| DeploymentProfile::parse_list(&raw))
            .unwrap_or_default()
    }
}

impl<S> ProfileSource for std::sync::Arc<S>
where
    S: ProfileSource + ?Sized,
{
    fn active_profiles(&self) -> Vec<DeploymentProfile> {
        (**self).active_profiles()
    }
}
