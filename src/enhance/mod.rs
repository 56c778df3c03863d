// SPDX-License-Identifier: GPL-3.0-only

//! Remote AI re-grading
//!
//! A photo and a style hint go to a hosted generative image model; the model
//! answers with a re-rendered image. Any failure leaves the photo exactly as
//! it was: the caller only ever sees "new bytes" or "nothing".

pub mod transport;

pub use transport::{CurlTransport, Transport};

use crate::config::Config;
use crate::errors::EnhanceError;
use crate::pipelines::photo::normalize_import;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Service that re-renders an image in a given style
#[async_trait]
pub trait EnhancementService: Send + Sync {
    /// # Arguments
    /// * `png` - Current PNG payload of the photo
    /// * `style` - Free-text style hint (the preset description)
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - Encoded image returned by the model
    /// * `Err(EnhanceError)` - Any transport, format or content failure
    async fn enhance(&self, png: &[u8], style: &str) -> Result<Vec<u8>, EnhanceError>;
}

/// Run an enhancement and collapse every failure into `None`
///
/// The reply must decode as an image; it is re-encoded to PNG like an import.
pub async fn enhance_photo(
    service: &dyn EnhancementService,
    png: &[u8],
    style: &str,
) -> Option<Vec<u8>> {
    let result = service.enhance(png, style).await.and_then(|data| {
        normalize_import(&data).map_err(|e| EnhanceError::InvalidPayload(e.to_string()))
    });

    match result {
        Ok(data) => {
            info!(size = data.len(), "AI enhancement succeeded");
            Some(data)
        }
        Err(e) => {
            error!(error = %e, "AI enhancement failed");
            None
        }
    }
}

/// Colour-grading instructions sent with every request
pub fn build_prompt(style: &str) -> String {
    format!(
        "Professional high-end digital camera color grading.\n\
         Apply a specific 'Retro Sunset' aesthetic:\n\
         1. Shadows must have a deep purple/indigo tint.\n\
         2. Highlights must be warm, glowing, and slightly overexposed (bloomed).\n\
         3. Overall saturation should be very high, especially in yellows, oranges, and teals.\n\
         4. Add a subtle vintage lens flare or light leak if it fits the composition.\n\
         5. Texture should be clean but with a hint of digital sensor noise characteristic of 2005-era premium cameras.\n\
         Style: {}.\n\
         Return ONLY the modified image.",
        style
    )
}

// ===== generateContent wire format =====

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// Build the JSON request body for an image + style request
fn request_body(png: &[u8], style: &str) -> Result<String, EnhanceError> {
    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/png".to_string(),
                        data: BASE64.encode(png),
                    }),
                },
                Part {
                    text: Some(build_prompt(style)),
                    inline_data: None,
                },
            ],
        }],
    };
    Ok(serde_json::to_string(&request)?)
}

/// Pull the first image out of the first candidate
fn extract_image(body: &str) -> Result<Vec<u8>, EnhanceError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let candidate = response.candidates.first().ok_or(EnhanceError::NoImage)?;

    let inline = candidate
        .content
        .parts
        .iter()
        .find_map(|part| part.inline_data.as_ref())
        .ok_or(EnhanceError::NoImage)?;

    let data = BASE64.decode(inline.data.trim())?;
    if data.is_empty() {
        return Err(EnhanceError::NoImage);
    }
    Ok(data)
}

/// Gemini image model client
pub struct GeminiEnhancer<T: Transport> {
    transport: T,
    endpoint: String,
    model: String,
    api_key: String,
}

impl<T: Transport> GeminiEnhancer<T> {
    pub fn new(
        transport: T,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from config, reading the API key from the environment
    pub fn from_config(config: &Config, transport: T) -> Result<Self, EnhanceError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| EnhanceError::MissingApiKey(config.api_key_env.clone()))?;

        Ok(Self::new(
            transport,
            config.ai_endpoint.clone(),
            config.ai_model.clone(),
            api_key,
        ))
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl<T: Transport> EnhancementService for GeminiEnhancer<T> {
    async fn enhance(&self, png: &[u8], style: &str) -> Result<Vec<u8>, EnhanceError> {
        debug!(model = %self.model, size = png.len(), style, "Sending enhancement request");

        let body = request_body(png, style)?;
        let headers = [("x-goog-api-key".to_string(), self.api_key.clone())];
        let response = self.transport.post_json(&self.url(), &headers, body).await?;

        extract_image(&response)
    }
}

/// Service used when no API key is configured; every call fails
#[derive(Debug, Clone)]
pub struct DisabledEnhancer {
    reason: EnhanceError,
}

impl DisabledEnhancer {
    pub fn new(reason: EnhanceError) -> Self {
        Self { reason }
    }
}

#[async_trait]
impl EnhancementService for DisabledEnhancer {
    async fn enhance(&self, _png: &[u8], _style: &str) -> Result<Vec<u8>, EnhanceError> {
        Err(self.reason.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::photo::decode_image;
    use std::sync::Mutex;

    /// Records the request and replays a canned body
    struct CannedTransport {
        reply: Result<String, EnhanceError>,
        seen: Mutex<Option<(String, String)>>,
    }

    impl CannedTransport {
        fn new(reply: Result<String, EnhanceError>) -> Self {
            Self {
                reply,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn post_json(
            &self,
            url: &str,
            _headers: &[(String, String)],
            body: String,
        ) -> Result<String, EnhanceError> {
            *self.seen.lock().unwrap() = Some((url.to_string(), body));
            self.reply.clone()
        }
    }

    fn enhancer(reply: Result<String, EnhanceError>) -> GeminiEnhancer<CannedTransport> {
        GeminiEnhancer::new(
            CannedTransport::new(reply),
            "https://api.example/v1beta/",
            "test-model",
            "key",
        )
    }

    #[tokio::test]
    async fn test_returns_first_inline_image() {
        let body = format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"text":"here"}},{{"inlineData":{{"mimeType":"image/png","data":"{}"}}}}]}}}}]}}"#,
            BASE64.encode(b"new-image")
        );
        let service = enhancer(Ok(body));

        let out = service.enhance(b"old", "dreamy").await.unwrap();
        assert_eq!(out, b"new-image");

        let (url, sent) = service.transport.seen.lock().unwrap().clone().unwrap();
        assert_eq!(url, "https://api.example/v1beta/models/test-model:generateContent");
        let json: serde_json::Value = serde_json::from_str(&sent).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["data"], BASE64.encode(b"old"));
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert!(parts[1]["text"].as_str().unwrap().contains("Style: dreamy."));
    }

    #[tokio::test]
    async fn test_text_only_response_is_no_image() {
        let service = enhancer(Ok(
            r#"{"candidates":[{"content":{"parts":[{"text":"sorry"}]}}]}"#.to_string(),
        ));
        assert_eq!(
            service.enhance(b"x", "s").await.unwrap_err(),
            EnhanceError::NoImage
        );
    }

    #[tokio::test]
    async fn test_empty_candidates_is_no_image() {
        let service = enhancer(Ok(r#"{"candidates":[]}"#.to_string()));
        assert_eq!(
            service.enhance(b"x", "s").await.unwrap_err(),
            EnhanceError::NoImage
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let service = enhancer(Ok("<html>".to_string()));
        assert!(matches!(
            service.enhance(b"x", "s").await,
            Err(EnhanceError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_enhance_photo_swallows_errors() {
        let service = enhancer(Err(EnhanceError::Transport("offline".to_string())));
        assert_eq!(enhance_photo(&service, b"x", "s").await, None);
    }

    fn inline_reply(data: &[u8]) -> String {
        format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"inlineData":{{"mimeType":"image/png","data":"{}"}}}}]}}}}]}}"#,
            BASE64.encode(data)
        )
    }

    #[tokio::test]
    async fn test_enhance_photo_rejects_non_image_reply() {
        let service = enhancer(Ok(inline_reply(b"not an image")));
        assert_eq!(enhance_photo(&service, b"x", "s").await, None);
    }

    #[tokio::test]
    async fn test_enhance_photo_returns_png() {
        let image = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut jpeg = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .to_rgb8()
            .write_to(&mut std::io::Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();
        let service = enhancer(Ok(inline_reply(&jpeg)));

        let png = enhance_photo(&service, b"x", "s").await.unwrap();
        assert!(png.starts_with(b"\x89PNG"));
        assert_eq!(decode_image(&png).unwrap().dimensions(), (3, 2));
    }

    #[tokio::test]
    async fn test_disabled_enhancer() {
        let service = DisabledEnhancer::new(EnhanceError::MissingApiKey("KEY".to_string()));
        assert!(matches!(
            service.enhance(b"x", "s").await,
            Err(EnhanceError::MissingApiKey(_))
        ));
    }
}
