use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::{EXTRACTION_PROMPT, ExtractionClient};
use crate::config::Config;
use crate::error::{GeminiError, NexusError};
use crate::types::gemini::{Chat, GeminiResponse, GenerateContentRequest, GenerationConfig, Part};
use crate::types::{DocumentImage, ExtractedFields};

/// `generateContent` client for the Gemini API, authenticated by API key.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiClient {
    /// Build the HTTP client from configuration. No retries are performed; the
    /// configured timeout bounds the whole upstream call.
    pub fn new(cfg: &Config) -> Result<Self, NexusError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("idcard-nexus/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(cfg.request_timeout());
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let client = builder.build()?;
        let endpoint = generate_url(&cfg.gemini_base_url, &cfg.gemini_model)?;
        Ok(Self {
            client,
            endpoint,
            api_key: cfg.gemini_api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn generate(&self, body: &GenerateContentRequest) -> Result<GeminiResponse, NexusError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            warn!(%status, "Gemini returned an error status");
            return Err(match GeminiError::from_body(&bytes) {
                Some(err) => NexusError::GeminiServerError(err),
                None => NexusError::UpstreamStatus(status),
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ExtractionClient for GeminiClient {
    async fn extract(
        &self,
        front: &DocumentImage,
        back: &DocumentImage,
    ) -> Result<ExtractedFields, NexusError> {
        let body = build_request(front, back)?;
        info!(
            front = %front.filename,
            back = %back.filename,
            "calling Gemini for document extraction"
        );

        let resp = self.generate(&body).await?;
        let text = resp
            .first_text()
            .ok_or_else(|| NexusError::EmptyModelResponse(resp.finish_reason()))?;
        debug!(
            chars = text.len(),
            model_version = resp.modelVersion.as_deref().unwrap_or("-"),
            "Gemini response received"
        );

        ExtractedFields::from_model_text(&text)
    }
}

fn generate_url(base: &Url, model: &str) -> Result<Url, NexusError> {
    Ok(base.join(&format!("models/{model}:generateContent"))?)
}

/// Longest edge sent upstream; larger scans are downsampled first.
const MAX_EDGE_PX: u32 = 3072;
const JPEG_QUALITY: u8 = 85;

/// Prompt first, then front and back as inline JPEG.
fn build_request(
    front: &DocumentImage,
    back: &DocumentImage,
) -> Result<GenerateContentRequest, NexusError> {
    let parts = vec![
        Part::text(EXTRACTION_PROMPT),
        Part::inline("image/jpeg", encode_jpeg(front)?),
        Part::inline("image/jpeg", encode_jpeg(back)?),
    ];
    Ok(GenerateContentRequest {
        contents: vec![Chat {
            role: "user".to_string(),
            parts,
        }],
        generationConfig: GenerationConfig {
            responseMimeType: "application/json".to_string(),
        },
    })
}

/// Inline payloads share Gemini's 20 MB request cap, so images go out as
/// JPEG with the longest edge capped at `MAX_EDGE_PX`.
fn encode_jpeg(image: &DocumentImage) -> Result<String, NexusError> {
    let (w, h) = image.pixels.dimensions();
    let longest = w.max(h);
    let mut buf = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
        if longest > MAX_EDGE_PX {
            let scale = f64::from(MAX_EDGE_PX) / f64::from(longest);
            let nw = ((f64::from(w) * scale).round() as u32).max(1);
            let nh = ((f64::from(h) * scale).round() as u32).max(1);
            let resized = imageops::resize(&image.pixels, nw, nh, FilterType::Triangle);
            encoder.encode_image(&resized)?;
        } else {
            encoder.encode_image(&image.pixels)?;
        }
    }
    Ok(STANDARD.encode(buf))
}
