use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use atlas_api::Client;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use atlas_cli::commands::{carry_over, focus, habits, score};
use atlas_cli::{Cli, Commands, Config};

/// Load config and build the backend client.
fn connect(cli: &Cli) -> Result<(Client, Config)> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let client = Client::new(&config.api_url, config.access_token.clone(), config.timeout())
        .context("failed to create API client")?;
    Ok((client, config))
}

async fn dispatch<W: Write>(
    writer: &mut W,
    command: &Commands,
    client: Client,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    match command {
        Commands::Habits(args) => habits::run(writer, &client, args, today).await,
        Commands::Score(args) => score::run(writer, &client, args, today).await,
        Commands::Focus(args) => focus::run(writer, &client, args, today).await,
        Commands::CarryOver(args) => {
            carry_over::run(
                writer,
                Arc::new(client),
                args,
                today,
                config.skip_duplicate_carry_over,
            )
            .await
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so --json output stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (client, config) = connect(&cli)?;
    let today = Local::now().date_naive();

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    runtime.block_on(dispatch(&mut writer, command, client, &config, today))?;
    writer.flush()?;
    Ok(())
}
