use std::process::ExitCode;

use clap::Parser;

use helpdesk::cli::{Cli, Commands, ConfigAction};
use helpdesk::commands::{
    LsOptions, cmd_config_path, cmd_config_show, cmd_ls, cmd_show, cmd_sla, load_source,
    resolve_now,
};
use helpdesk::config::Config;
use helpdesk::error::Result;
use helpdesk::query::{SearchScope, TicketPredicate};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("helpdesk=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Ls {
            source,
            search,
            rich,
            status,
            priority,
            page,
            page_size,
            sort,
            json,
        } => {
            let config = Config::load()?;
            let tickets = load_source(source.file.as_deref(), &config).await?;
            let options = LsOptions {
                predicate: TicketPredicate {
                    search_term: search,
                    status_filter: Some(status),
                    priority_filter: Some(priority),
                    scope: if rich {
                        SearchScope::Rich
                    } else {
                        SearchScope::Title
                    },
                },
                page,
                page_size,
                sort,
                json,
            };
            cmd_ls(&tickets, &options, &config, resolve_now(source.now))
        }

        Commands::Show {
            number,
            source,
            json,
        } => {
            let config = Config::load()?;
            let tickets = load_source(source.file.as_deref(), &config).await?;
            cmd_show(&tickets, number, json, &config, resolve_now(source.now))
        }

        Commands::Sla { source, top, json } => {
            let config = Config::load()?;
            let tickets = load_source(source.file.as_deref(), &config).await?;
            cmd_sla(&tickets, top, json, &config, resolve_now(source.now))
        }

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(&Config::load()?, json),
            ConfigAction::Path => cmd_config_path(),
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
