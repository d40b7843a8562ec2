use crate::config::ConfigError;
use crate::deadlines::{TransitionError, UnknownStatus};
use crate::profiles::ProfileError;
use crate::storage::StorageUnavailable;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Profile(ProfileError),
    Storage(StorageUnavailable),
    Transition(TransitionError),
    InvalidInput(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Profile(err) => write!(f, "profile error: {}", err),
            AppError::Storage(err) => write!(f, "storage error: {}", err),
            AppError::Transition(err) => write!(f, "status error: {}", err),
            AppError::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Profile(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Transition(err) => Some(err),
            AppError::InvalidInput(_) => None,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Profile(ProfileError::UnknownProfile { .. }) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Transition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Profile(ProfileError::DuplicateBinding { .. })
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ProfileError> for AppError {
    fn from(value: ProfileError) -> Self {
        Self::Profile(value)
    }
}

impl From<StorageUnavailable> for AppError {
    fn from(value: StorageUnavailable) -> Self {
        Self::Storage(value)
    }
}

impl From<TransitionError> for AppError {
    fn from(value: TransitionError) -> Self {
        Self::Transition(value)
    }
}

impl From<UnknownStatus> for AppError {
    fn from(value: UnknownStatus) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadlines::ImmigrationStatus;
    use crate::profiles::DeploymentProfile;

    #[test]
    fn unknown_profile_maps_to_not_found() {
        let err = AppError::from(ProfileError::UnknownProfile {
            profile: DeploymentProfile::new("staging"),
        });
        assert_eq!(
            err.to_string(),
            "profile error: no database binding registered for profile 'staging'"
        );
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_outage_maps_to_service_unavailable() {
        let err = AppError::from(StorageUnavailable {
            profile: DeploymentProfile::new("prod"),
            reason: "connection refused".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn status_errors_are_client_errors() {
        let err = AppError::from(TransitionError {
            from: ImmigrationStatus::OptPending,
            to: ImmigrationStatus::H1bActive,
        });
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::from(UnknownStatus("tourist".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "invalid input: unknown immigration status 'tourist'"
        );
    }
}
