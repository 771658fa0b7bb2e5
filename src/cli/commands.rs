use crate::analyzer::analyzer::{FieldAnalyzer, HeuristicAnalyzer};
use crate::analyzer::openai::{DEFAULT_ENDPOINT, DEFAULT_MODEL, OpenAiAnalyzer};
use crate::error::FillError;
use crate::field::extractor::extract_descriptors;
use crate::matcher::confidence::ConfidenceMode;
use crate::page::session::{DEFAULT_DRIVER_SCRIPT, PageSession};
use crate::plan::cycle::FillCycle;
use crate::trace::logger::TraceLogger;
use crate::{FillContext, plan_fill, run_fill_cycle};

/// Resolved settings shared by the subcommands.
pub struct CommandSettings {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub confidence_mode: ConfidenceMode,
    pub driver_script: Option<String>,
    pub trace_file: String,
    pub verbose: u8,
}

impl CommandSettings {
    fn driver(&self) -> &str {
        self.driver_script.as_deref().unwrap_or(DEFAULT_DRIVER_SCRIPT)
    }
}

fn build_analyzer(
    name: &str,
    settings: &CommandSettings,
) -> Result<Box<dyn FieldAnalyzer>, Box<dyn std::error::Error>> {
    match name {
        "heuristic" => Ok(Box::new(HeuristicAnalyzer)),
        "llm" | "openai" => {
            let api_key = settings.api_key.clone().unwrap_or_default();
            let endpoint = settings.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
            let model = settings.model.as_deref().unwrap_or(DEFAULT_MODEL);
            Ok(Box::new(OpenAiAnalyzer::with_endpoint(
                &api_key,
                endpoint,
                model,
                settings.confidence_mode,
            )))
        }
        other => Err(format!("Unknown analyzer: {} (expected heuristic or llm)", other).into()),
    }
}

fn open_session(url: &str, settings: &CommandSettings) -> Result<PageSession, FillError> {
    let mut session = PageSession::launch(settings.driver())?;
    session.navigate(url)?;
    Ok(session)
}

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(url: &str, settings: &CommandSettings) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(url, settings)?;
    session.wait_ready()?;

    let raw = session.scan()?;
    let descriptors = extract_descriptors(&raw);
    session.quit()?;

    println!("Detected {} fillable fields on {}", descriptors.len(), url);
    for d in &descriptors {
        println!(
            "  [{}] {} label='{}' placeholder='{}' selector='{}'",
            d.id,
            d.kind.as_str(),
            d.label,
            d.placeholder,
            d.selector
        );
    }

    Ok(())
}

// ============================================================================
// plan subcommand (dry run)
// ============================================================================

pub fn cmd_plan(
    url: &str,
    analyzer_name: &str,
    ctx: &FillContext,
    settings: &CommandSettings,
) -> Result<bool, Box<dyn std::error::Error>> {
    let analyzer = build_analyzer(analyzer_name, settings)?;
    let tracer = TraceLogger::new(&settings.trace_file);
    let mut session = open_session(url, settings)?;
    let mut cycle = FillCycle::new();

    if settings.verbose > 0 {
        eprintln!("Planning fill for {} (analyzer={})...", url, analyzer_name);
    }

    let result = plan_fill(&mut cycle, ctx, &mut session, analyzer.as_ref(), &tracer);
    session.quit()?;

    match result {
        Ok(plan) => {
            println!("Fill plan ({} entries):", plan.len());
            for (field_id, value) in plan.iter() {
                println!("  {} -> {}", field_id, value);
            }
            Ok(true)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(false)
        }
    }
}

// ============================================================================
// fill subcommand
// ============================================================================

/// Run a full cycle. Returns whether it completed; failures are
/// reported as a status line, never a panic, and leave the page
/// untouched.
pub fn cmd_fill(
    url: &str,
    analyzer_name: &str,
    ctx: &FillContext,
    settings: &CommandSettings,
) -> Result<bool, Box<dyn std::error::Error>> {
    let analyzer = build_analyzer(analyzer_name, settings)?;
    let tracer = TraceLogger::new(&settings.trace_file);
    let mut session = open_session(url, settings)?;
    let mut cycle = FillCycle::new();

    if settings.verbose > 0 {
        eprintln!("Filling {} (analyzer={})...", url, analyzer_name);
    }

    let result = run_fill_cycle(&mut cycle, ctx, &mut session, analyzer.as_ref(), &tracer);
    session.quit()?;

    match result {
        Ok(summary) => {
            println!(
                "フォームの入力が完了しました ({} fields detected, {} planned, {} filled)",
                summary.fields_detected, summary.planned, summary.filled
            );
            Ok(true)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(false)
        }
    }
}

// ============================================================================
// validate-key subcommand
// ============================================================================

pub fn cmd_validate_key(settings: &CommandSettings) -> Result<bool, Box<dyn std::error::Error>> {
    let api_key = settings
        .api_key
        .clone()
        .ok_or(FillError::MissingApiKey)?;
    let endpoint = settings.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
    let model = settings.model.as_deref().unwrap_or(DEFAULT_MODEL);

    let analyzer =
        OpenAiAnalyzer::with_endpoint(&api_key, endpoint, model, settings.confidence_mode);

    match analyzer.validate_api_key() {
        Ok(true) => {
            println!("API key is valid");
            Ok(true)
        }
        Ok(false) => {
            eprintln!("API key was rejected by the provider");
            Ok(false)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(false)
        }
    }
}
