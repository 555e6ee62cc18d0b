//! Bujo CLI - bullet journal companion for the terminal
//!
//! Entries apply to the local mirror first; with a stored session each
//! change is also pushed to the remote journal.

mod cli;
mod commands;
mod error;
mod mirror;
mod session_store;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands};
use crate::commands::add::{run_add, AddArgs};
use crate::commands::auth_cmd::run_auth;
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::done::run_done;
use crate::commands::edit::{run_edit, EditArgs};
use crate::commands::export::run_export;
use crate::commands::list::{run_list, ListArgs};
use crate::commands::scan::{run_extract, run_scan};
use crate::commands::stats_cmd::run_stats;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bujo=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();
    let data_dir = cli.data_dir.clone();

    match cli.command {
        Some(Commands::Add {
            title,
            kind,
            notes,
            date,
            tag,
        }) => {
            run_add(
                AddArgs {
                    title,
                    kind: kind.into(),
                    notes,
                    date,
                    tags: tag,
                },
                api_url,
                data_dir,
            )
            .await?;
        }
        Some(Commands::List {
            limit,
            kind,
            json,
            local,
        }) => {
            run_list(
                ListArgs {
                    limit,
                    kind: kind.map(Into::into),
                    json,
                    local,
                },
                api_url,
                data_dir,
            )
            .await?;
        }
        Some(Commands::Done { id }) => run_done(&id, api_url, data_dir).await?,
        Some(Commands::Edit {
            id,
            title,
            notes,
            kind,
            date,
            tag,
        }) => {
            run_edit(
                EditArgs {
                    id,
                    title,
                    notes,
                    kind: kind.map(Into::into),
                    date,
                    tags: tag,
                },
                api_url,
                data_dir,
            )
            .await?;
        }
        Some(Commands::Delete { id }) => run_delete(&id, api_url, data_dir).await?,
        Some(Commands::Stats { json }) => run_stats(json, api_url, data_dir).await?,
        Some(Commands::Auth { command }) => run_auth(command, api_url).await?,
        Some(Commands::Scan {
            image,
            page,
            thread,
        }) => run_scan(&image, page, thread, api_url).await?,
        Some(Commands::Extract { page_id }) => run_extract(page_id.as_deref(), api_url).await?,
        Some(Commands::Export { output }) => run_export(output.as_deref(), api_url).await?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            // Quick capture mode: bujo "buy milk"
            if cli.entry.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                run_add(
                    AddArgs {
                        title: cli.entry,
                        kind: bujo_core::EntryKind::Task,
                        notes: None,
                        date: None,
                        tags: Vec::new(),
                    },
                    api_url,
                    data_dir,
                )
                .await?;
            }
        }
    }

    Ok(())
}
