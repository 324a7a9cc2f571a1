use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inputbot_automation::{InputService, Timings};
use inputbot_core::Platform;
use inputbot_drivers_enigo::EnigoBackend;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "inputbot")]
#[command(about = "HTTP API for mouse and keyboard automation")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Runtime environment; production switches logs to JSON, anything
    /// else runs as development
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    environment: String,

    /// TOML file overriding the platform's delay profile
    #[arg(long, env = "INPUTBOT_TIMINGS")]
    timings: Option<PathBuf>,

    /// Bind host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Bind port
    #[arg(short, long, env = "PORT", default_value_t = 3007)]
    port: u16,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Case-insensitive; unrecognised names fall back to development.
    fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (default)
    Serve,

    /// Print the current pointer position
    Position,

    /// Print the effective delay profile as TOML
    Timings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let environment = Environment::from_name(&cli.environment);
    match environment {
        Environment::Production => fmt().json().with_env_filter(filter).init(),
        Environment::Development => fmt().with_env_filter(filter).with_target(false).init(),
    }
    if environment == Environment::Development
        && !cli.environment.trim().eq_ignore_ascii_case("development")
    {
        tracing::warn!(
            environment = %cli.environment,
            "Unknown environment, running as development"
        );
    }

    let timings = load_timings(cli.timings.as_deref())?;
    let platform = Platform::current();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!(
                %platform,
                environment = ?environment,
                "Starting inputbot"
            );
            let input = InputService::new(Arc::new(EnigoBackend::new()), platform, timings);
            let bind = format!("{}:{}", cli.host, cli.port);
            inputbot_api::start_server(input, &bind).await?;
        }
        Commands::Position => {
            let input = InputService::new(Arc::new(EnigoBackend::new()), platform, timings);
            let point = tokio::task::spawn_blocking(move || input.mouse_position()).await??;
            println!("{} {}", point.x, point.y);
        }
        Commands::Timings => {
            println!("# {} profile", platform);
            print!("{}", timings.to_toml_string()?);
        }
    }

    Ok(())
}

fn load_timings(path: Option<&Path>) -> Result<Timings> {
    let Some(path) = path else {
        return Ok(Timings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read timings file {}", path.display()))?;
    let timings = Timings::from_toml_str(&text)
        .with_context(|| format!("Invalid timings file {}", path.display()))?;
    tracing::info!(file = %path.display(), "Loaded timing overrides");
    Ok(timings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_names() {
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("Production"), Environment::Production);
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name("staging"), Environment::Development);
        assert_eq!(Environment::from_name(""), Environment::Development);
    }

    #[test]
    fn test_unknown_environment_parses() {
        let cli = Cli::try_parse_from(["inputbot", "--environment", "staging"]).unwrap();
        assert_eq!(Environment::from_name(&cli.environment), Environment::Development);

        let cli = Cli::try_parse_from(["inputbot", "--environment", "PRODUCTION"]).unwrap();
        assert_eq!(Environment::from_name(&cli.environment), Environment::Production);
    }
}
