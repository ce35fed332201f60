use clap::{CommandFactory, Parser};
use clap_complete::generate;
use onapp_core::Config;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::CommandContext;
use connection::ConnectionManager;
use error::{OnAppCtlError, Result as CliResult};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        e.print_diagnostic();
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> CliResult<()> {
    let (config, config_path) = if let Some(config_file) = &cli.config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        (Config::load_from_path(&path)?, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };
    let conn_mgr = ConnectionManager::with_config_path(config, config_path);

    execute_command(cli, &conn_mgr).await
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "onappctl=warn,onapp_core=warn",
            1 => "onappctl=info,onapp_core=info",
            2 => "onappctl=debug,onapp_core=debug",
            _ => "onappctl=trace,onapp_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> CliResult<()> {
    info!("Command: {}", format_command(&cli.command));

    let ctx = CommandContext {
        conn_mgr,
        profile: cli.profile.as_deref(),
        output: cli.output,
        query: cli.query.as_deref(),
    };

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Version => print_version(cli.output),
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        Commands::Profile(profile_cmd) => {
            commands::profile::handle_profile_command(profile_cmd, conn_mgr, cli.output).await
        }
        Commands::Disk(cmd) => commands::resources::handle_disk_command(cmd, &ctx).await,
        Commands::DataStore(cmd) => commands::resources::handle_data_store_command(cmd, &ctx).await,
        Commands::Role(cmd) => commands::resources::handle_role_command(cmd, &ctx).await,
        Commands::Backup(cmd) => commands::resources::handle_backup_command(cmd, &ctx).await,
        Commands::Transaction(cmd) => {
            commands::transactions::handle_transaction_command(cmd, &ctx).await
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

fn print_version(format: cli::OutputFormat) -> CliResult<()> {
    let fmt = match format {
        cli::OutputFormat::Json => output::OutputFormat::Json,
        cli::OutputFormat::Yaml => output::OutputFormat::Yaml,
        cli::OutputFormat::Auto | cli::OutputFormat::Table => {
            println!("onappctl {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    };

    let output_data = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    });
    output::print_output(&output_data, fmt, None).map_err(OnAppCtlError::from)
}

/// Command line for logs, with credentials left out
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Version => "version".to_string(),
        Commands::Completions { shell } => format!("completions {:?}", shell),
        Commands::Profile(cmd) => {
            use cli::ProfileCommands::*;
            match cmd {
                List => "profile list".to_string(),
                Path => "profile path".to_string(),
                Show { name } => format!("profile show {}", name),
                Set { name, .. } => format!("profile set {} [credentials redacted]", name),
                Remove { name } => format!("profile remove {}", name),
                Default { name } => format!("profile default {}", name),
            }
        }
        Commands::Disk(cmd) => format!("disk {:?}", cmd),
        Commands::DataStore(cmd) => format!("data-store {:?}", cmd),
        Commands::Role(cmd) => format!("role {:?}", cmd),
        Commands::Backup(cmd) => format!("backup {:?}", cmd),
        Commands::Transaction(cmd) => format!("transaction {:?}", cmd),
    }
}
