use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use rod_contracts::profile::UserProfile;
use serde_json::{json, Value};

pub const DEFAULT_TEXT_MODEL: &str = "gpt-4";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const IMAGE_SIZE: &str = "1024x1024";
pub const NO_CONTENT_PLACEHOLDER: &str = "(No content returned)";

const IMAGE_ERROR_FALLBACK: &str = "Failed to generate image";
const CHAT_ERROR_FALLBACK: &str = "Failed to get response";

pub fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// The single credential. Its absence is a user-facing configuration
/// error checked before any call is attempted; it is never hard-coded.
pub fn api_key() -> Option<String> {
    non_empty_env("OPENAI_API_KEY")
}

fn api_base() -> String {
    non_empty_env("OPENAI_API_BASE")
        .map(|value| value.trim_end_matches('/').to_string())
        .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
}

/// A generated image artifact: either a direct URL or a
/// `data:image/png;base64,` URI, plus the original (un-enhanced) prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReply {
    pub content: String,
    pub prompt: String,
}

/// Blocking client for the two provider endpoints. One instance per
/// session; no retries, no timeout at this layer — failure detection
/// relies on the transport's own error semantics.
pub struct StudioClient {
    api_base: String,
    api_key: String,
    http: HttpClient,
    text_model: String,
    image_model: String,
}

impl StudioClient {
    pub fn new(api_key: String, text_model: Option<String>, image_model: Option<String>) -> Self {
        Self {
            api_base: api_base(),
            api_key,
            http: HttpClient::new(),
            text_model: text_model.unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: image_model.unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
        }
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// Image path of a submission: enhance the prompt with the profile's
    /// style and industry, then one POST to `/images/generations`.
    pub fn generate_image(&self, prompt: &str, profile: &UserProfile) -> Result<ImageReply> {
        let endpoint = format!("{}/images/generations", self.api_base);
        let enhanced = enhanced_image_prompt(prompt, profile);
        let payload = build_image_payload(&self.image_model, &enhanced);
        let (ok, body) = self.post_json(&endpoint, &payload)?;
        if !ok {
            bail!("{}", provider_error_message(&body, IMAGE_ERROR_FALLBACK));
        }
        let Some(content) = parse_image_response(&body) else {
            bail!("No image returned from API");
        };
        Ok(ImageReply {
            content,
            prompt: prompt.to_string(),
        })
    }

    /// Text path of a submission: system instruction plus the raw user
    /// text as the sole user turn, one POST to `/chat/completions`.
    pub fn chat_completion(&self, prompt: &str, profile: &UserProfile) -> Result<String> {
        let endpoint = format!("{}/chat/completions", self.api_base);
        let payload = build_chat_payload(&self.text_model, &system_instruction(profile), prompt);
        let (ok, body) = self.post_json(&endpoint, &payload)?;
        if !ok {
            bail!("{}", provider_error_message(&body, CHAT_ERROR_FALLBACK));
        }
        Ok(parse_chat_response(&body))
    }

    fn post_json(&self, endpoint: &str, payload: &Value) -> Result<(bool, Value)> {
        let response = self
            .http
            .post(endpoint)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .with_context(|| format!("request failed ({endpoint})"))?;
        let ok = response.status().is_success();
        Ok((ok, safe_json(response)))
    }

    /// Persists an image artifact: data URIs are base64-decoded, http(s)
    /// URLs are downloaded. Anything else is not an image reference.
    pub fn save_artifact(&self, content: &str, dest: &Path) -> Result<()> {
        let bytes = if content.starts_with("data:") {
            decode_data_uri(content)?
        } else if content.starts_with("http://") || content.starts_with("https://") {
            self.download_artifact(content)?
        } else {
            bail!("not an image reference: {}", truncate_text(content, 80));
        };
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, bytes).with_context(|| format!("failed to write {}", dest.display()))
    }

    fn download_artifact(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("image download failed ({url})"))?;
        if !response.status().is_success() {
            let code = response.status().as_u16();
            bail!("image download failed ({code})");
        }
        Ok(response
            .bytes()
            .context("image bytes read failed")?
            .to_vec())
    }
}

/// `"{prompt}, {style} style, professional quality for {industry}"`.
pub fn enhanced_image_prompt(prompt: &str, profile: &UserProfile) -> String {
    let style = profile
        .image_style
        .map(|style| style.label())
        .unwrap_or("Photorealistic");
    let industry = profile
        .industry
        .map(|industry| industry.label())
        .unwrap_or("general use");
    format!("{prompt}, {style} style, professional quality for {industry}")
}

pub fn system_instruction(profile: &UserProfile) -> String {
    let industry = profile
        .industry
        .map(|industry| industry.label().to_string())
        .unwrap_or_else(|| "an unspecified industry".to_string());
    let niche = if profile.niche.trim().is_empty() {
        "a general niche".to_string()
    } else {
        profile.niche.clone()
    };
    format!(
        "You are Rod, a helpful AI assistant in ROD AI Studio. Be friendly, concise, \
         and helpful. You can suggest image prompts when asked. The user works in \
         {industry} and focuses on {niche}."
    )
}

pub fn build_image_payload(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "prompt": prompt,
        "n": 1,
        "size": IMAGE_SIZE,
    })
}

pub fn build_chat_payload(model: &str, instruction: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": instruction },
            { "role": "user", "content": prompt },
        ],
    })
}

/// First data item's `url` verbatim, else its `b64_json` wrapped as a
/// PNG data URI, else nothing.
pub fn parse_image_response(body: &Value) -> Option<String> {
    let first = body.get("data").and_then(Value::as_array)?.first()?;
    if let Some(url) = first
        .get("url")
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
    {
        return Some(url.to_string());
    }
    first
        .get("b64_json")
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(|payload| format!("data:image/png;base64,{payload}"))
}

/// First choice's message content verbatim; a missing field substitutes
/// the literal placeholder rather than failing the submission.
pub fn parse_chat_response(body: &Value) -> String {
    body.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| NO_CONTENT_PLACEHOLDER.to_string())
}

/// The provider's embedded `error.message` when present, else the
/// caller's generic fallback.
pub fn provider_error_message(body: &Value, fallback: &str) -> String {
    body.get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// A body that is not valid JSON becomes an empty object so downstream
/// logic uniformly falls through to missing-field handling.
fn safe_json(response: reqwest::blocking::Response) -> Value {
    response
        .text()
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_else(|| json!({}))
}

fn decode_data_uri(content: &str) -> Result<Vec<u8>> {
    let (_, payload) = content
        .split_once(',')
        .context("invalid data URI image payload")?;
    BASE64
        .decode(payload.trim().as_bytes())
        .context("image data URI base64 decode failed")
}

pub fn default_artifact_path(out_dir: &Path) -> PathBuf {
    out_dir.join(format!(
        "artifact-{}.png",
        chrono::Utc::now().timestamp_millis()
    ))
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rod_contracts::profile::{ImageStyle, Industry, UserProfile};
    use serde_json::json;

    use super::*;

    fn full_profile() -> UserProfile {
        UserProfile {
            name: "Ada".to_string(),
            industry: Some(Industry::RealEstate),
            niche: "luxury listings".to_string(),
            purpose: None,
            goals: String::new(),
            image_style: Some(ImageStyle::Minimalist),
        }
    }

    #[test]
    fn enhanced_prompt_uses_profile_style_and_industry() {
        assert_eq!(
            enhanced_image_prompt("a house", &full_profile()),
            "a house, Minimalist style, professional quality for Real Estate"
        );
    }

    #[test]
    fn enhanced_prompt_falls_back_when_profile_is_empty() {
        assert_eq!(
            enhanced_image_prompt("a house", &UserProfile::default()),
            "a house, Photorealistic style, professional quality for general use"
        );
    }

    #[test]
    fn system_instruction_embeds_industry_and_niche() {
        let instruction = system_instruction(&full_profile());
        assert!(instruction.contains("works in Real Estate"));
        assert!(instruction.contains("focuses on luxury listings."));

        let generic = system_instruction(&UserProfile::default());
        assert!(generic.contains("an unspecified industry"));
        assert!(generic.contains("a general niche"));
    }

    #[test]
    fn image_payload_shape_is_fixed() {
        let payload = build_image_payload("dall-e-3", "a cat");
        assert_eq!(payload["model"], json!("dall-e-3"));
        assert_eq!(payload["prompt"], json!("a cat"));
        assert_eq!(payload["n"], json!(1));
        assert_eq!(payload["size"], json!("1024x1024"));
    }

    #[test]
    fn chat_payload_has_two_turns() {
        let payload = build_chat_payload("gpt-4", "be helpful", "hello");
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], json!("system"));
        assert_eq!(messages[0]["content"], json!("be helpful"));
        assert_eq!(messages[1]["role"], json!("user"));
        assert_eq!(messages[1]["content"], json!("hello"));
    }

    #[test]
    fn image_response_prefers_url() {
        let body = json!({ "data": [{ "url": "https://img/cat.png", "b64_json": "AAAA" }] });
        assert_eq!(
            parse_image_response(&body),
            Some("https://img/cat.png".to_string())
        );
    }

    #[test]
    fn image_response_wraps_base64_as_data_uri() {
        let body = json!({ "data": [{ "b64_json": "QUJD" }] });
        assert_eq!(
            parse_image_response(&body),
            Some("data:image/png;base64,QUJD".to_string())
        );
    }

    #[test]
    fn image_response_without_artifact_is_none() {
        assert_eq!(parse_image_response(&json!({ "data": [{}] })), None);
        assert_eq!(parse_image_response(&json!({ "data": [] })), None);
        assert_eq!(parse_image_response(&json!({})), None);
    }

    #[test]
    fn chat_response_takes_first_choice_verbatim() {
        let body = json!({
            "choices": [
                { "message": { "content": "  hi there  " } },
                { "message": { "content": "ignored" } },
            ]
        });
        assert_eq!(parse_chat_response(&body), "  hi there  ");
    }

    #[test]
    fn chat_response_missing_content_substitutes_placeholder() {
        assert_eq!(
            parse_chat_response(&json!({ "choices": [{ "message": {} }] })),
            NO_CONTENT_PLACEHOLDER
        );
        assert_eq!(parse_chat_response(&json!({})), NO_CONTENT_PLACEHOLDER);
    }

    #[test]
    fn provider_error_prefers_embedded_message() {
        let body = json!({ "error": { "message": "quota exceeded" } });
        assert_eq!(
            provider_error_message(&body, "Failed to generate image"),
            "quota exceeded"
        );
        assert_eq!(
            provider_error_message(&json!({}), "Failed to generate image"),
            "Failed to generate image"
        );
        assert_eq!(
            provider_error_message(&json!({ "error": { "message": "  " } }), "fallback"),
            "fallback"
        );
    }

    #[test]
    fn save_artifact_decodes_data_uri() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("out/cat.png");
        let client = StudioClient::new("test-key".to_string(), None, None);
        client
            .save_artifact("data:image/png;base64,QUJD", &dest)
            .unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"ABC");
    }

    #[test]
    fn save_artifact_rejects_non_image_content() {
        let temp = tempfile::tempdir().unwrap();
        let client = StudioClient::new("test-key".to_string(), None, None);
        let err = client
            .save_artifact("just some text", &temp.path().join("x.png"))
            .unwrap_err();
        assert!(err.to_string().contains("not an image reference"));
    }

    #[test]
    fn default_models_apply() {
        let client = StudioClient::new("test-key".to_string(), None, None);
        assert_eq!(client.text_model(), DEFAULT_TEXT_MODEL);
        assert_eq!(client.image_model(), DEFAULT_IMAGE_MODEL);

        let custom = StudioClient::new(
            "test-key".to_string(),
            Some("gpt-4o-mini".to_string()),
            Some("gpt-image-1".to_string()),
        );
        assert_eq!(custom.text_model(), "gpt-4o-mini");
        assert_eq!(custom.image_model(), "gpt-image-1");
    }

    #[test]
    fn artifact_path_lands_in_out_dir() {
        let path = default_artifact_path(Path::new("/tmp/run"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("artifact-"));
        assert!(name.ends_with(".png"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/run")));
    }
}
