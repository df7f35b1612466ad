use crate::error::{Result, StudioError};
use async_trait::async_trait;
use std::env;
use std::fmt;

/// A user-supplied key authorizing the pro tier.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalCredential(String);

impl PersonalCredential {
    pub fn new(key: impl Into<String>) -> Self {
        PersonalCredential(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PersonalCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep keys out of logs and panic messages.
        write!(f, "PersonalCredential(***)")
    }
}

/// The external credential-selection flow.
///
/// Selecting the pro tier without a known personal credential invokes this
/// collaborator; a failure leaves the session on the free tier.
#[async_trait]
pub trait CredentialSelector: Send + Sync {
    async fn select(&self) -> Result<PersonalCredential>;
}

/// Resolves the personal credential from the environment.
pub struct EnvCredentialSelector {
    var: String,
}

impl EnvCredentialSelector {
    pub fn new() -> Self {
        EnvCredentialSelector {
            var: "MODELSHOT_PERSONAL_API_KEY".to_string(),
        }
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        EnvCredentialSelector { var: var.into() }
    }
}

impl Default for EnvCredentialSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialSelector for EnvCredentialSelector {
    async fn select(&self) -> Result<PersonalCredential> {
        match env::var(&self.var) {
            Ok(key) if !key.trim().is_empty() => Ok(PersonalCredential::new(key)),
            _ => Err(StudioError::CredentialMissing(format!(
                "credential selection failed: {} is not set",
                self.var
            ))),
        }
    }
}
