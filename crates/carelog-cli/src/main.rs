//! Carelog CLI - command-line interface for the Carelog medical records
//! backend

use anyhow::anyhow;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use carelog_cli::commands;
use carelog_cli::{Cli, Command, Config, Formatter};
use carelog_domain::UserId;
use carelog_services::RequestMeta;
use carelog_store::SqliteStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let formatter = Formatter::new(format, !cli.no_color && config.settings.color);

    // No store and no acting user needed
    if let Command::NewUser = cli.command {
        println!("{}", UserId::new());
        return Ok(());
    }

    let owner = resolve_user(cli.user.as_deref())?;
    let mut store = SqliteStore::new(&config.database_path)?;
    let meta = RequestMeta::new(None, format!("carelog-cli/{}", env!("CARGO_PKG_VERSION")));

    match cli.command {
        Command::Record(cmd) => {
            commands::records::execute(cmd, &mut store, owner, &formatter, &meta)?
        }
        Command::Document(cmd) => {
            commands::documents::execute(cmd, &mut store, &config, owner, &formatter, &meta)?
        }
        Command::Context => commands::context::execute(&store, &config, owner)?,
        Command::Triage(cmd) => {
            commands::triage::execute(cmd, &mut store, owner, &formatter, &meta)?
        }
        Command::NewUser => unreachable!("handled above"),
    }

    Ok(())
}

fn resolve_user(user: Option<&str>) -> anyhow::Result<UserId> {
    let raw = user.ok_or_else(|| {
        anyhow!("No acting user; pass --user <UUID> or set CARELOG_USER (see `carelog new-user`)")
    })?;
    UserId::from_string(raw).map_err(|e| anyhow!(e))
}
