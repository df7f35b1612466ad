use crate::models::StudioTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub tier: StudioTier,
    pub image_size: String,
    pub description: String,
}
