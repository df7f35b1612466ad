use crate::{
    error::{Result, StudioError},
    models::{FittingConfig, StudioTier},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An image payload carried as `data:<mime>;base64,<payload>`.
///
/// Parsing is strict: anything that does not match that shape is rejected
/// before a request is built, so no network call is ever issued for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    pub mime_type: String,
    /// Base64-encoded image bytes, without the URI prefix.
    pub data: String,
}

impl SourceImage {
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let invalid = || {
            StudioError::InvalidImageFormat(
                "expected data:<mime>;base64,<payload>".to_string(),
            )
        };

        let rest = uri.strip_prefix("data:").ok_or_else(invalid)?;
        let (mime_type, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;

        let subtype = mime_type.strip_prefix("image/").ok_or_else(invalid)?;
        let subtype_ok = !subtype.is_empty()
            && subtype
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !subtype_ok || payload.is_empty() {
            return Err(invalid());
        }

        Ok(SourceImage {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        SourceImage {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decodes the payload back into raw image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| StudioError::InvalidImageFormat(e.to_string()))
    }
}

/// A generated or edited photoshoot image. The most recent shot is the
/// implicit base for the next edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedShot {
    /// Base64-encoded image bytes.
    pub data: String,
    pub mime_type: String,
    /// Model that produced this shot.
    pub model: String,
}

impl GeneratedShot {
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Re-wraps the shot as the source image of a follow-up edit.
    pub fn as_source(&self) -> SourceImage {
        SourceImage {
            mime_type: self.mime_type.clone(),
            data: self.data.clone(),
        }
    }

    pub fn bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| StudioError::ResponseError(e.to_string()))
    }

    /// Writes the decoded image to disk (the download surface).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.bytes()?;
        std::fs::write(path, bytes).map_err(|e| StudioError::IoError(e.to_string()))
    }
}

/// A photoshoot generation request: product photo + fitting parameters.
#[derive(Debug, Clone)]
pub struct ShotRequest {
    pub image: SourceImage,
    pub config: FittingConfig,
    pub tier: StudioTier,
}

impl ShotRequest {
    pub fn new(image: SourceImage, config: FittingConfig, tier: StudioTier) -> Self {
        Self {
            image,
            config,
            tier,
        }
    }
}

/// A refinement request against the most recent shot.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub image: SourceImage,
    pub instruction: String,
    pub tier: StudioTier,
}

impl EditRequest {
    pub fn new(image: SourceImage, instruction: impl Into<String>, tier: StudioTier) -> Self {
        Self {
            image,
            instruction: instruction.into(),
            tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_data_uri() {
        let image = SourceImage::from_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw0KGgo=");
        assert_eq!(image.to_data_uri(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn rejects_malformed_data_uris() {
        let malformed = [
            "",
            "iVBORw0KGgo=",
            "data:image/png",
            "data:image/png;base64,",
            "data:image/;base64,abc",
            "data:text/plain;base64,abc",
            "data:image/png;charset=utf8,abc",
            "http://example.com/shot.png",
        ];
        for input in malformed {
            let err = SourceImage::from_data_uri(input).unwrap_err();
            assert!(
                matches!(err, StudioError::InvalidImageFormat(_)),
                "{:?} for input {:?}",
                err,
                input
            );
        }
    }

    #[test]
    fn from_bytes_round_trips() {
        let image = SourceImage::from_bytes(&[0x89, 0x50, 0x4E, 0x47], "image/png");
        assert_eq!(image.bytes().unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);

        let reparsed = SourceImage::from_data_uri(&image.to_data_uri()).unwrap();
        assert_eq!(reparsed, image);
    }

    #[test]
    fn shot_converts_back_into_edit_source() {
        let shot = GeneratedShot {
            data: "aGVsbG8=".to_string(),
            mime_type: "image/png".to_string(),
            model: "gemini-2.5-flash-image".to_string(),
        };
        let source = shot.as_source();
        assert_eq!(source.mime_type, "image/png");
        assert_eq!(source.data, "aGVsbG8=");
        assert_eq!(shot.to_data_uri(), "data:image/png;base64,aGVsbG8=");
    }
}
