use mktsim::{AppConfig, Cli, run};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

fn main() -> anyhow::Result<()> {
    // By convention, we leverage `tracing` to instrument and log various
    // operations throughout this project. Logs go to stderr so that the
    // reports on stdout remain clean.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI args, letting clap handle --help, --version and usage errors
    let cli = Cli::import().unwrap_or_else(|e| e.exit());

    // Create config with proper layering of CLI args
    let config = AppConfig::load(&cli)?;

    let stdout = std::io::stdout();
    run(&config, cli.format, &mut stdout.lock())?;

    Ok(())
}
