pub mod image_client;
pub mod prompt;

use crate::{
    config::StudioConfig,
    credentials::PersonalCredential,
    error::Result,
    models::{EditRequest, GeneratedShot, ShotRequest},
};
use async_trait::async_trait;

pub use image_client::ShotClient;

/// The seam between the session controller and the generation API.
///
/// The controller is written against this trait so it can be exercised
/// with a scripted backend instead of the network.
#[async_trait]
pub trait StudioBackend: Send + Sync {
    async fn generate(&self, request: &ShotRequest) -> Result<GeneratedShot>;
    async fn edit(&self, request: &EditRequest) -> Result<GeneratedShot>;
    fn install_personal_credential(&mut self, credential: PersonalCredential);
    fn has_personal_credential(&self) -> bool;
}

#[derive(Clone)]
pub struct GeminiClient {
    shot_client: ShotClient,
}

impl GeminiClient {
    pub fn new(config: StudioConfig) -> Result<Self> {
        Ok(Self {
            shot_client: ShotClient::new(config)?,
        })
    }

    pub fn shots(&self) -> &ShotClient {
        &self.shot_client
    }
}

#[async_trait]
impl StudioBackend for GeminiClient {
    async fn generate(&self, request: &ShotRequest) -> Result<GeneratedShot> {
        self.shot_client.generate(request).await
    }

    async fn edit(&self, request: &EditRequest) -> Result<GeneratedShot> {
        self.shot_client.edit(request).await
    }

    fn install_personal_credential(&mut self, credential: PersonalCredential) {
        self.shot_client.install_personal_credential(credential);
    }

    fn has_personal_credential(&self) -> bool {
        self.shot_client.has_personal_credential()
    }
}
