use chrono::NaiveDate;
use immigration_tracker::deadlines::{DeadlinePlanner, ImmigrationStatus};
use immigration_tracker::profiles::{
    DatabaseProfileBinding, DeploymentProfile, EnvProfileSource, FixedProfiles, ProfileRegistry,
    ProfileResolver, ProfileSource,
};
use immigration_tracker::storage::{StorageConnector, StorageHandle, StorageUnavailable};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type SharedSource = Arc<dyn ProfileSource>;
pub(crate) type SharedResolver = Arc<ProfileResolver<SharedSource>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) resolver: SharedResolver,
    pub(crate) planner: DeadlinePlanner,
}

/// A command line list wins; otherwise `APP_PROFILES` is re-read on every
/// resolution, including values loaded from `.env`.
pub(crate) fn profile_source(overridden: Option<Vec<DeploymentProfile>>) -> SharedSource {
    match overridden {
        Some(profiles) => Arc::new(FixedProfiles::new(profiles)),
        None => Arc::new(EnvProfileSource::default()),
    }
}

pub(crate) fn build_resolver(source: SharedSource) -> SharedResolver {
    Arc::new(ProfileResolver::new(
        source,
        Arc::new(ProfileRegistry::standard()),
    ))
}

/// Reports the store a binding points at without opening it. The
/// persistence layer replaces this once real connections exist.
#[derive(Debug, Default, Clone)]
pub(crate) struct DescriptorConnector;

impl StorageConnector for DescriptorConnector {
    fn connect(&self, binding: &DatabaseProfileBinding) -> Result<StorageHandle, StorageUnavailable> {
        let handle = StorageHandle {
            profile: binding.profile.clone(),
            engine: binding.engine,
            connection_url: binding.engine.default_url().to_string(),
        };
        info!(
            profile = %handle.profile,
            engine = binding.engine.label(),
            url = %handle.connection_url,
            "storage binding resolved"
        );
        Ok(handle)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_status(raw: &str) -> Result<ImmigrationStatus, String> {
    ImmigrationStatus::parse(raw)
        .ok_or_else(|| format!("unknown immigration status '{raw}' (expected e.g. opt_approved)"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_trims_and_reports_input() {
        assert_eq!(
            parse_date(" 2026-03-01 "),
            Ok(NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"))
        );
        let err = parse_date("03/01/2026").expect_err("format rejected");
        assert!(err.contains("03/01/2026"));
    }

    #[test]
    fn override_takes_precedence_over_environment() {
        let source = profile_source(Some(DeploymentProfile::parse_list("test")));
        assert_eq!(source.active_profiles(), vec![DeploymentProfile::new("test")]);
    }

    #[test]
    fn descriptor_connector_never_opens_connections() {
        let handle = DescriptorConnector
            .connect(&DatabaseProfileBinding::production())
            .expect("descriptor resolves");
        assert_eq!(
            handle.connection_url,
            "postgresql://localhost:5432/immigration_tracker"
        );
    }
}
