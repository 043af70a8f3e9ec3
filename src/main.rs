use clap::Parser;
use poly_spike::cli::{Cli, Commands, RunArgs};
use poly_spike::config::{Config, DOTENV_FILE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Secrets such as the webhook URL may live in a dotenv file
    let dotenv = Config::load_env_file(DOTENV_FILE);

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::default()
        }
    }
    .with_env_overrides();
    config.validate()?;

    // Initialize telemetry
    poly_spike::telemetry::init_telemetry(&config.telemetry)?;

    match dotenv {
        Ok(true) => tracing::debug!(path = DOTENV_FILE, "Loaded environment file"),
        Ok(false) => tracing::debug!(path = DOTENV_FILE, "No environment file found"),
        Err(e) => tracing::warn!(error = %e, "Ignoring environment file"),
    }

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            tracing::info!("Starting Spike Bot...");
            args.execute(&config).await?;
        }
        Commands::Config => {
            let mut shown = config.clone();
            if shown.notifier.webhook_url.is_some() {
                shown.notifier.webhook_url = Some("<redacted>".to_string());
            }
            println!("{}", toml::to_string_pretty(&shown)?);
        }
    }

    Ok(())
}
