use crate::{
    config::StudioConfig,
    credentials::PersonalCredential,
    error::{Result, StudioError},
    gemini::prompt,
    models::{AspectRatio, EditRequest, GeneratedShot, ModelInfo, ShotRequest, StudioTier},
};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Finish reasons that mean the model completed without an image because
/// the content was filtered upstream.
const BLOCKED_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
    "IMAGE_RECITATION",
    "RECITATION",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
];

/// Client for the `generateContent` image endpoint.
///
/// Every generate/edit is exactly one fire-once call: no retry, backoff,
/// or timeout lives at this layer.
#[derive(Clone, Debug)]
pub struct ShotClient {
    http: reqwest::Client,
    api_key: String,
    personal_api_key: Option<PersonalCredential>,
    base_url: String,
}

impl ShotClient {
    pub fn new(config: StudioConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| StudioError::ConfigError("no API key configured".into()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            personal_api_key: config.personal_api_key.map(PersonalCredential::new),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: StudioTier::Free.model_id().to_string(),
                name: "Gemini 2.5 Flash Image".to_string(),
                tier: StudioTier::Free,
                image_size: StudioTier::Free.image_size().to_string(),
                description: "Fast shared-key photoshoots".to_string(),
            },
            ModelInfo {
                id: StudioTier::Pro.model_id().to_string(),
                name: "Gemini 3 Pro Image".to_string(),
                tier: StudioTier::Pro,
                image_size: StudioTier::Pro.image_size().to_string(),
                description: "High-resolution photoshoots on a personal credential".to_string(),
            },
        ]
    }

    pub fn install_personal_credential(&mut self, credential: PersonalCredential) {
        self.personal_api_key = Some(credential);
    }

    pub fn has_personal_credential(&self) -> bool {
        self.personal_api_key.is_some()
    }

    /// Generates a fresh photoshoot from a product photo.
    pub async fn generate(&self, request: &ShotRequest) -> Result<GeneratedShot> {
        let rendered = prompt::photoshoot_prompt(&request.config);
        let payload = GenerateContentRequest::photoshoot(
            &request.image.mime_type,
            &request.image.data,
            &rendered,
            request.tier,
            request.config.aspect_ratio,
        );
        self.send(request.tier, &payload).await
    }

    /// Applies a refinement instruction to the most recent shot.
    ///
    /// Edits inherit the source image's framing, so no image config is sent.
    pub async fn edit(&self, request: &EditRequest) -> Result<GeneratedShot> {
        let rendered = prompt::refinement_prompt(&request.instruction);
        let payload = GenerateContentRequest::refinement(
            &request.image.mime_type,
            &request.image.data,
            &rendered,
        );
        self.send(request.tier, &payload).await
    }

    fn resolve_key(&self, tier: StudioTier) -> Result<&str> {
        if tier.requires_personal_credential() {
            self.personal_api_key
                .as_ref()
                .map(|c| c.expose())
                .ok_or_else(|| {
                    StudioError::CredentialMissing(
                        "pro tier requested without a personal credential".into(),
                    )
                })
        } else {
            Ok(&self.api_key)
        }
    }

    async fn send(
        &self,
        tier: StudioTier,
        payload: &GenerateContentRequest,
    ) -> Result<GeneratedShot> {
        let api_key = self.resolve_key(tier)?;
        let model_id = tier.model_id();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model_id
        );

        log::info!("Requesting photoshoot from model: {}", model_id);
        log::debug!(
            "Prompt: {:?}",
            payload.contents[0].parts.iter().find_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| StudioError::HttpError(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status, &body);
            log::error!("Photoshoot request failed ({}): {}", status, err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| StudioError::ResponseError(e.to_string()))?;

        extract_shot(parsed, model_id)
    }
}

/// Maps an HTTP failure into a typed error at the boundary, so downstream
/// logic never re-parses message text.
fn classify_failure(status: u16, body: &str) -> StudioError {
    let (message, api_status) = parse_api_error(body);

    if status == 429 || api_status.as_deref() == Some("RESOURCE_EXHAUSTED") {
        return StudioError::QuotaExceeded(message);
    }
    if status == 401 || status == 403 || api_status.as_deref() == Some("UNAUTHENTICATED") {
        return StudioError::CredentialMissing(message);
    }
    StudioError::ApiError(format!("status {}: {}", status, message))
}

/// Pulls `error.message` / `error.status` out of a Google error body,
/// falling back to the raw text.
fn parse_api_error(body: &str) -> (String, Option<String>) {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let error = &value["error"];
        let message = error["message"].as_str().map(str::to_string);
        let api_status = error["status"].as_str().map(str::to_string);
        if message.is_some() || api_status.is_some() {
            return (
                message.unwrap_or_else(|| body.to_string()),
                api_status,
            );
        }
    }
    // Raw-text fallback for proxies that do not speak the error schema.
    let api_status = if body.contains("RESOURCE_EXHAUSTED") {
        Some("RESOURCE_EXHAUSTED".to_string())
    } else {
        None
    };
    (body.to_string(), api_status)
}

/// Finds the first content part carrying inline image data. Completing
/// without one is a soft failure, typically an upstream safety rejection;
/// this layer cannot see the cause, only the absence.
fn extract_shot(response: GenerateContentResponse, model_id: &str) -> Result<GeneratedShot> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            let message = feedback
                .block_reason_message
                .clone()
                .unwrap_or_else(|| format!("prompt blocked: {}", reason));
            return Err(StudioError::NoImageReturned(message));
        }
    }

    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        StudioError::NoImageReturned("the model finished without producing an image".into())
    })?;

    let inline = candidate
        .content
        .into_iter()
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data);

    match inline {
        Some(data) => Ok(GeneratedShot {
            data: data.data,
            mime_type: data.mime_type,
            model: model_id.to_string(),
        }),
        None => {
            let reason = candidate.finish_reason.as_deref().unwrap_or("");
            let message = if BLOCKED_FINISH_REASONS.contains(&reason) {
                format!("blocked by the safety filter: {}", reason)
            } else {
                "the model finished without producing an image".to_string()
            };
            Err(StudioError::NoImageReturned(message))
        }
    }
}

// Wire types for `models/{model}:generateContent`.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
    image_size: String,
}

impl GenerateContentRequest {
    /// Image part first, then the prompt, matching the studio's part order.
    fn photoshoot(
        mime_type: &str,
        data: &str,
        rendered_prompt: &str,
        tier: StudioTier,
        aspect_ratio: AspectRatio,
    ) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: data.to_string(),
                        },
                    },
                    Part::Text {
                        text: rendered_prompt.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: Some(ImageConfig {
                    aspect_ratio: aspect_ratio.as_str().to_string(),
                    image_size: tier.image_size().to_string(),
                }),
            },
        }
    }

    fn refinement(mime_type: &str, data: &str, rendered_instruction: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: data.to_string(),
                        },
                    },
                    Part::Text {
                        text: rendered_instruction.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FittingConfig, SourceImage};

    fn client_with_keys(api_key: Option<&str>, personal: Option<&str>) -> Result<ShotClient> {
        let mut config = StudioConfig::new();
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }
        if let Some(key) = personal {
            config = config.with_personal_api_key(key);
        }
        ShotClient::new(config)
    }

    #[test]
    fn client_requires_a_shared_key() {
        let err = client_with_keys(None, None).unwrap_err();
        assert!(matches!(err, StudioError::ConfigError(_)));
        assert!(client_with_keys(Some("shared"), None).is_ok());
    }

    #[test]
    fn pro_without_personal_credential_is_credential_missing() {
        let client = client_with_keys(Some("shared"), None).unwrap();
        assert_eq!(client.resolve_key(StudioTier::Free).unwrap(), "shared");

        let err = client.resolve_key(StudioTier::Pro).unwrap_err();
        assert!(matches!(err, StudioError::CredentialMissing(_)));
    }

    #[test]
    fn installed_credential_unlocks_pro() {
        let mut client = client_with_keys(Some("shared"), None).unwrap();
        assert!(!client.has_personal_credential());

        client.install_personal_credential(PersonalCredential::new("sk-personal"));
        assert!(client.has_personal_credential());
        assert_eq!(client.resolve_key(StudioTier::Pro).unwrap(), "sk-personal");
        // The free tier keeps billing against the shared key.
        assert_eq!(client.resolve_key(StudioTier::Free).unwrap(), "shared");
    }

    #[test]
    fn photoshoot_payload_sends_image_then_prompt_with_camel_case() {
        let image = SourceImage::from_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
        let config = FittingConfig::default();
        let rendered = prompt::photoshoot_prompt(&config);
        let payload = GenerateContentRequest::photoshoot(
            &image.mime_type,
            &image.data,
            &rendered,
            StudioTier::Free,
            config.aspect_ratio,
        );

        let json = serde_json::to_value(&payload).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert!(parts[0]["inlineData"]["mimeType"].is_string());
        assert_eq!(parts[0]["inlineData"]["data"], "iVBORw0KGgo=");
        assert!(parts[1]["text"].as_str().unwrap().contains("female"));

        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "3:4");
        assert_eq!(json["generationConfig"]["imageConfig"]["imageSize"], "1K");
    }

    #[test]
    fn refinement_payload_omits_image_config() {
        let payload = GenerateContentRequest::refinement(
            "image/png",
            "iVBORw0KGgo=",
            &prompt::refinement_prompt("red shoes"),
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["generationConfig"].get("imageConfig").is_none());
        assert!(json["contents"][0]["parts"][1]["text"]
            .as_str()
            .unwrap()
            .contains("red shoes"));
    }

    #[test]
    fn extracts_first_inline_image_part() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "here is your shot"},
                        {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let shot = extract_shot(response, "gemini-2.5-flash-image").unwrap();
        assert_eq!(shot.data, "aGVsbG8=");
        assert_eq!(shot.mime_type, "image/png");
        assert_eq!(shot.model, "gemini-2.5-flash-image");
    }

    #[test]
    fn missing_image_part_is_no_image_returned() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "sorry"}]},
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let err = extract_shot(response, "gemini-2.5-flash-image").unwrap_err();
        assert!(matches!(err, StudioError::NoImageReturned(_)));
    }

    #[test]
    fn safety_finish_reason_is_no_image_returned() {
        let json = r#"{"candidates": [{"finishReason": "IMAGE_SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let err = extract_shot(response, "gemini-2.5-flash-image").unwrap_err();
        match err {
            StudioError::NoImageReturned(message) => {
                assert!(message.contains("IMAGE_SAFETY"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn prompt_feedback_block_is_no_image_returned() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {
                "blockReason": "SAFETY",
                "blockReasonMessage": "Prompt was blocked"
            }
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let err = extract_shot(response, "gemini-2.5-flash-image").unwrap_err();
        match err {
            StudioError::NoImageReturned(message) => assert_eq!(message, "Prompt was blocked"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn quota_failures_classify_independent_of_message_text() {
        let body = r#"{"error": {"code": 429, "message": "try later", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            classify_failure(429, body),
            StudioError::QuotaExceeded(_)
        ));
        // Same API status behind a different HTTP code still classifies.
        assert!(matches!(
            classify_failure(400, body),
            StudioError::QuotaExceeded(_)
        ));
        // Raw non-JSON body mentioning the status.
        assert!(matches!(
            classify_failure(500, "upstream: RESOURCE_EXHAUSTED"),
            StudioError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn auth_failures_classify_as_credential_missing() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#;
        assert!(matches!(
            classify_failure(403, body),
            StudioError::CredentialMissing(_)
        ));
        assert!(matches!(
            classify_failure(401, "unauthorized"),
            StudioError::CredentialMissing(_)
        ));
    }

    #[test]
    fn other_failures_pass_the_upstream_message_through() {
        let body = r#"{"error": {"code": 400, "message": "bad aspect ratio", "status": "INVALID_ARGUMENT"}}"#;
        match classify_failure(400, body) {
            StudioError::ApiError(message) => {
                assert!(message.contains("bad aspect ratio"));
                assert!(message.contains("400"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn supported_models_cover_both_tiers() {
        let models = ShotClient::supported_models();
        assert_eq!(models.len(), 2);
        assert!(models.iter().any(|m| m.tier == StudioTier::Free));
        assert!(models.iter().any(|m| m.tier == StudioTier::Pro));
    }
}
