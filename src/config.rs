use std::env;

/// Connection settings for the photoshoot backend.
///
/// `api_key` is the shared key billed to the hosting environment (the free
/// tier). `personal_api_key` is the user-supplied credential required by
/// the pro tier; it can also arrive later through the credential-selection
/// flow instead of configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub api_key: Option<String>,
    pub personal_api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            api_key: None,
            personal_api_key: None,
            base_url: None,
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("MODELSHOT_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok();
        let personal_api_key = env::var("MODELSHOT_PERSONAL_API_KEY").ok();
        let base_url = env::var("MODELSHOT_BASE_URL").ok();

        StudioConfig {
            api_key,
            personal_api_key,
            base_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_personal_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.personal_api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}
