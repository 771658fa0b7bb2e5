use std::fmt;

/// Everything that can go wrong during a fill cycle.
///
/// All variants are caught at the cycle boundary, traced, and turned
/// into a user-visible status line; none crash the process. Analysis
/// failure is fail-closed: no plan is built and no fields are touched.
#[derive(Debug)]
pub enum FillError {
    /// API credential absent. Fatal for the analysis step, no retry.
    MissingApiKey,

    /// Network/transport failure reaching the model API.
    Transport(reqwest::Error),

    /// Non-OK HTTP status from the model API, mapped to a fixed
    /// user-facing message table.
    RemoteService { status: u16, message: String },

    /// Response parsed but lacks the expected shape. Non-retryable.
    MalformedResponse(String),

    /// Readiness polling exceeded its bound.
    Timeout { waited_ms: u64 },

    /// A new cycle was requested while a prior one is in flight.
    CycleInProgress { stage: String },

    /// A stage transition was attempted out of order.
    InvalidStage { expected: String, actual: String },

    /// Page driver subprocess failed to spawn.
    SubprocessSpawn { script: String, source: std::io::Error },

    /// Page driver pipe I/O failed.
    SessionIo(String),

    /// Page driver reported a command failure.
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (driver output or model response body).
    JsonParse { context: String, source: serde_json::Error },
}

impl FillError {
    /// Build a `RemoteService` error from a status code and the
    /// provider's embedded error message, if any. Mapped statuses use
    /// the fixed table; unmapped ones fall back to the embedded
    /// message, then a generic one.
    pub fn remote(status: u16, embedded: Option<String>) -> Self {
        let message = match status {
            401 => "OpenAI APIキーが無効です。APIキーを確認して更新してください。".to_string(),
            429 => "APIの利用制限に達しました。しばらく待ってから再試行してください。".to_string(),
            500 => "OpenAI APIサーバーでエラーが発生しました。後でお試しください。".to_string(),
            503 => "OpenAI APIサービスが一時的に利用できません。後でお試しください。".to_string(),
            _ => embedded.filter(|m| !m.is_empty()).unwrap_or_else(|| {
                "ChatGPT APIとの通信に失敗しました。ネットワーク接続を確認するか、後でお試しください。"
                    .to_string()
            }),
        };
        FillError::RemoteService { status, message }
    }
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillError::MissingApiKey => {
                write!(
                    f,
                    "OpenAI APIキーが設定されていません。設定ファイルまたは環境変数でAPIキーを登録してください。"
                )
            }
            FillError::Transport(source) => {
                write!(f, "Model API unreachable (retry later): {}", source)
            }
            FillError::RemoteService { status, message } => {
                write!(f, "Model API error ({}): {}", status, message)
            }
            FillError::MalformedResponse(detail) => {
                write!(f, "Malformed model response: {}", detail)
            }
            FillError::Timeout { waited_ms } => {
                write!(f, "Page not ready after {}ms", waited_ms)
            }
            FillError::CycleInProgress { stage } => {
                write!(f, "A fill cycle is already in progress (stage: {})", stage)
            }
            FillError::InvalidStage { expected, actual } => {
                write!(f, "Invalid cycle transition: expected {}, was {}", expected, actual)
            }
            FillError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            FillError::SessionIo(msg) => {
                write!(f, "Page driver I/O failed: {}", msg)
            }
            FillError::SessionProtocol { command, error } => {
                write!(f, "Page driver command '{}' failed: {}", command, error)
            }
            FillError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
        }
    }
}

impl std::error::Error for FillError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FillError::Transport(source) => Some(source),
            FillError::SubprocessSpawn { source, .. } => Some(source),
            FillError::JsonParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FillError {
    fn from(source: reqwest::Error) -> Self {
        FillError::Transport(source)
    }
}
