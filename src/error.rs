use std::fmt;

#[derive(Debug, Clone)]
pub enum StudioError {
    ConfigError(String),
    InvalidImageFormat(String),
    RequestError(String),
    SerializationError(String),
    HttpError(String),
    ResponseError(String),
    NoImageReturned(String),
    QuotaExceeded(String),
    CredentialMissing(String),
    ApiError(String),
    IoError(String),
}

impl fmt::Display for StudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudioError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            StudioError::InvalidImageFormat(msg) => write!(f, "Invalid image format: {}", msg),
            StudioError::RequestError(msg) => write!(f, "Request error: {}", msg),
            StudioError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            StudioError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            StudioError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            StudioError::NoImageReturned(msg) => write!(f, "No image returned: {}", msg),
            StudioError::QuotaExceeded(msg) => write!(f, "Quota exceeded: {}", msg),
            StudioError::CredentialMissing(msg) => write!(f, "Credential missing: {}", msg),
            StudioError::ApiError(msg) => write!(f, "API error: {}", msg),
            StudioError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for StudioError {}

impl StudioError {
    /// True for failures that mean the personal credential is absent,
    /// expired, or rejected. The session demotes to the free tier on these.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, StudioError::CredentialMissing(_))
    }

    /// True for rate or billing limit failures.
    pub fn is_quota_failure(&self) -> bool {
        matches!(self, StudioError::QuotaExceeded(_))
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = StudioError::QuotaExceeded("RESOURCE_EXHAUSTED".into());
        assert_eq!(err.to_string(), "Quota exceeded: RESOURCE_EXHAUSTED");

        let err = StudioError::NoImageReturned("safety filter".into());
        assert_eq!(err.to_string(), "No image returned: safety filter");
    }

    #[test]
    fn credential_and_quota_predicates() {
        assert!(StudioError::CredentialMissing("no key".into()).is_credential_failure());
        assert!(StudioError::QuotaExceeded("429".into()).is_quota_failure());

        assert!(!StudioError::ApiError("boom".into()).is_credential_failure());
        assert!(!StudioError::ApiError("boom".into()).is_quota_failure());
        assert!(!StudioError::CredentialMissing("no key".into()).is_quota_failure());
    }
}
