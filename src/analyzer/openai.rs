use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analyzer::analyzer::{FieldAnalyzer, assignments_from_purposes};
use crate::error::FillError;
use crate::field::field_model::FieldDescriptor;
use crate::matcher::confidence::ConfidenceMode;
use crate::matcher::profile::Profile;
use crate::plan::plan_model::Analysis;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const SYSTEM_PROMPT: &str = "\
あなたはフォームフィールドの分析の専門家です。\n\
与えられたフォームフィールドの情報を分析し、各フィールドの目的を特定してください。\n\
以下のような項目に特に注目してください：\n\
- ラベルテキスト\n\
- プレースホルダー\n\
- aria-label\n\
- 周辺のテキスト\n\
- フィールドID/名前\n\
\n\
結果は以下のようなJSON形式で返してください：\n\
{\n\
  \"fieldId1\": \"推測された目的（例：姓、名、メールアドレス等）\",\n\
  \"fieldId2\": \"推測された目的\"\n\
}";

/// Chat-completions analyzer. Sends the descriptor sequence to the
/// model in JSON mode and parses the returned field-id → purpose map.
pub struct OpenAiAnalyzer {
    api_key: String,
    endpoint: String,
    model: String,
    confidence_mode: ConfidenceMode,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl OpenAiAnalyzer {
    pub fn new(api_key: &str, confidence_mode: ConfidenceMode) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT, DEFAULT_MODEL, confidence_mode)
    }

    pub fn with_endpoint(
        api_key: &str,
        endpoint: &str,
        model: &str,
        confidence_mode: ConfidenceMode,
    ) -> Self {
        Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            confidence_mode,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// POST the analysis request and return the raw purpose map.
    fn request_purposes(
        &self,
        descriptors: &[FieldDescriptor],
    ) -> Result<HashMap<String, String>, FillError> {
        if self.api_key.is_empty() {
            return Err(FillError::MissingApiKey);
        }

        let fields_json =
            serde_json::to_string_pretty(descriptors).map_err(|e| FillError::JsonParse {
                context: "field descriptors".to_string(),
                source: e,
            })?;
        let user_content = format!("以下のフォームフィールドを分析してください：\n{}", fields_json);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_content,
                },
            ],
            response_format: ResponseFormat { r#type: "json_object" },
            temperature: 0.3,
            max_tokens: 1000,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().unwrap_or_default();
            let embedded = body.error.and_then(|e| e.message);
            return Err(FillError::remote(status.as_u16(), embedded));
        }

        let body = response.text().map_err(FillError::Transport)?;
        parse_purpose_body(&body)
    }

    /// Fire a minimal completion to check the credential.
    pub fn validate_api_key(&self) -> Result<bool, FillError> {
        if self.api_key.is_empty() {
            return Err(FillError::MissingApiKey);
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: "This is a test message to validate the API key.",
            }],
            response_format: ResponseFormat { r#type: "text" },
            temperature: 0.0,
            max_tokens: 5,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        Ok(response.status().is_success())
    }
}

/// Pull the purpose map out of a raw chat-completion body, tolerating
/// absent choices/content and non-object payloads.
pub fn parse_purpose_body(body: &str) -> Result<HashMap<String, String>, FillError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| FillError::JsonParse {
            context: "chat completion body".to_string(),
            source: e,
        })?;

    let content = parsed
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .ok_or_else(|| {
            FillError::MalformedResponse("response has no choices/content".to_string())
        })?;

    serde_json::from_str::<HashMap<String, String>>(content).map_err(|e| {
        FillError::MalformedResponse(format!("content is not a field→purpose object: {}", e))
    })
}

impl FieldAnalyzer for OpenAiAnalyzer {
    fn analyze(
        &self,
        descriptors: &[FieldDescriptor],
        _profile: &Profile,
    ) -> Result<Analysis, FillError> {
        let purposes = self.request_purposes(descriptors)?;
        Ok(Analysis::Purposes(assignments_from_purposes(
            purposes,
            descriptors,
            self.confidence_mode,
        )))
    }
}
