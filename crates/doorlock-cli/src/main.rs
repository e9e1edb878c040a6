//! `doorlock`: keypad door lock simulator and peripheral self-test.

mod console;
mod selftest;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use doorlock_core::{ActuatorKind, LockConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "doorlock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Default log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Override the access code
    #[arg(long, global = true)]
    credential: Option<String>,

    /// Lock actuator to simulate
    #[arg(long, global = true, value_enum, default_value_t = Actuator::Relay)]
    actuator: Actuator,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the lock interactively; each typed character is a key press
    Run,

    /// Exercise every peripheral and the access flow, reporting PASS/FAIL
    SelfTest,

    /// Print the effective configuration as JSON
    ShowConfig,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Actuator {
    Relay,
    Servo,
}

impl From<Actuator> for ActuatorKind {
    fn from(actuator: Actuator) -> Self {
        match actuator {
            Actuator::Relay => ActuatorKind::Relay,
            Actuator::Servo => ActuatorKind::Servo,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&cli)?;

    match cli.command {
        Commands::Run => simulate::run(config).await,
        Commands::SelfTest => selftest::run(&config).await,
        Commands::ShowConfig => show_config(&config),
    }
}

fn build_config(cli: &Cli) -> Result<LockConfig> {
    let mut builder = LockConfig::builder().actuator(cli.actuator.into());
    if let Some(credential) = &cli.credential {
        builder = builder.credential(credential.as_str());
    }
    builder.build().context("invalid lock configuration")
}

fn show_config(config: &LockConfig) -> Result<()> {
    let mut value = serde_json::to_value(config).context("serializing configuration")?;
    if let Some(credential) = value.get_mut("credential") {
        *credential = "*".repeat(config.credential.len()).into();
    }
    let rendered = serde_json::to_string_pretty(&value)?;
    println!("{rendered}");
    Ok(())
}
