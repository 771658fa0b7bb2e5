use clap::Parser;
use form_autofill::FillContext;
use form_autofill::cli::commands::{
    CommandSettings, cmd_fill, cmd_plan, cmd_scan, cmd_validate_key,
};
use form_autofill::cli::config::{
    Cli, Commands, load_config, resolve_api_key, resolve_confidence_mode, resolve_profile,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve settings: CLI > config > env > defaults
    let settings = CommandSettings {
        api_key: resolve_api_key(cli.api_key.as_deref(), &config),
        endpoint: cli
            .endpoint
            .clone()
            .or_else(|| config.openai.endpoint.clone()),
        model: cli.model.clone().or_else(|| config.openai.model.clone()),
        confidence_mode: resolve_confidence_mode(cli.confidence_mode.as_deref(), &config),
        driver_script: cli
            .driver_script
            .clone()
            .or_else(|| config.driver_script.clone()),
        trace_file: config.trace_file.clone(),
        verbose: cli.verbose,
    };

    let ctx = FillContext {
        profile: resolve_profile(&config),
        confidence_mode: settings.confidence_mode,
    };

    match cli.command {
        Commands::Scan { url } => {
            cmd_scan(&url, &settings)?;
        }
        Commands::Plan { url, analyzer } => {
            let ok = cmd_plan(&url, &analyzer, &ctx, &settings)?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Fill { url, analyzer } => {
            let ok = cmd_fill(&url, &analyzer, &ctx, &settings)?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::ValidateKey => {
            let ok = cmd_validate_key(&settings)?;
            if !ok {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
