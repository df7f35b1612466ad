use serde::{Deserialize, Serialize};

/// Quality/cost mode selecting the backend model and output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudioTier {
    #[default]
    Free,
    Pro,
}

impl StudioTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudioTier::Free => "free",
            StudioTier::Pro => "pro",
        }
    }

    /// Backend model identifier requested for this tier.
    pub fn model_id(&self) -> &'static str {
        match self {
            StudioTier::Free => "gemini-2.5-flash-image",
            StudioTier::Pro => "gemini-3-pro-image-preview",
        }
    }

    /// Output resolution option passed to the API.
    pub fn image_size(&self) -> &'static str {
        match self {
            StudioTier::Free => "1K",
            StudioTier::Pro => "2K",
        }
    }

    /// The pro tier is billed against a user-supplied personal credential.
    pub fn requires_personal_credential(&self) -> bool {
        matches!(self, StudioTier::Pro)
    }
}

impl std::fmt::Display for StudioTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
