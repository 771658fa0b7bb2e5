use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::matcher::confidence::ConfidenceMode;
use crate::matcher::profile::{Profile, ProfileEntry};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-autofill",
    version,
    about = "LLM-assisted form detection and autofill engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// OpenAI API key (falls back to config file, then OPENAI_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Confidence mode: attribute-overlap or vocabulary
    #[arg(long, global = true)]
    pub confidence_mode: Option<String>,

    /// Path to the page driver script
    #[arg(long, global = true)]
    pub driver_script: Option<String>,

    /// Path to config file (default: form-autofill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a page and print the detected field descriptors
    Scan {
        /// URL of the page to scan
        #[arg(long)]
        url: String,
    },

    /// Dry run: scan, analyze, and print the fill plan without writing
    Plan {
        /// URL of the page to plan against
        #[arg(long)]
        url: String,

        /// Field analyzer: heuristic or llm
        #[arg(long, default_value = "heuristic")]
        analyzer: String,
    },

    /// Run a complete fill cycle against a page
    Fill {
        /// URL of the page to fill
        #[arg(long)]
        url: String,

        /// Field analyzer: heuristic or llm
        #[arg(long, default_value = "llm")]
        analyzer: String,
    },

    /// Check that the configured API key is accepted by the provider
    ValidateKey,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-autofill.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// attribute-overlap (default) or vocabulary
    #[serde(default)]
    pub confidence_mode: Option<String>,

    #[serde(default)]
    pub driver_script: Option<String>,

    #[serde(default = "default_trace_file")]
    pub trace_file: String,

    /// The user's key/value profile, in matching-priority order.
    #[serde(default)]
    pub profile: Vec<ProfileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

fn default_trace_file() -> String {
    "fill_trace.jsonl".to_string()
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing
/// or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-autofill.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolution (merge CLI args with config file)
// ============================================================================

/// Resolve the profile: config entries (last-writer-wins, capped), or
/// the default key template when none are configured.
pub fn resolve_profile(config: &AppConfig) -> Profile {
    if config.profile.is_empty() {
        Profile::default_template()
    } else {
        Profile::from_entries(config.profile.iter().cloned())
    }
}

/// Resolve the confidence mode: CLI > config > default.
pub fn resolve_confidence_mode(cli: Option<&str>, config: &AppConfig) -> ConfidenceMode {
    let name = cli.or(config.confidence_mode.as_deref());
    match name {
        Some("vocabulary") => ConfidenceMode::Vocabulary,
        _ => ConfidenceMode::AttributeOverlap,
    }
}

/// Resolve the API key: CLI > config > OPENAI_API_KEY env.
pub fn resolve_api_key(cli: Option<&str>, config: &AppConfig) -> Option<String> {
    cli.map(|s| s.to_string())
        .or_else(|| config.openai.api_key.clone())
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .filter(|s| !s.is_empty())
}
