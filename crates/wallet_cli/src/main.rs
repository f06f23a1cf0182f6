//! `wallet` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, start optional logging and open the ledger store.
//! - Print service results; store faults go to stderr with a failing exit.

mod config;

use clap::Parser;
use config::{absolute_dir, query_value, render_query_value, Cli, Command};
use log::error;
use std::error::Error;
use std::process::ExitCode;
use wallet_core::{init_logging, JsonFileStore, KeyQueryOutcome, RecordService, MSG_NO_RECORDS};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(&cli.log_level, &absolute_dir(log_dir)?)?;
    }

    let service = RecordService::new(JsonFileStore::open(&cli.data_file)?);

    match &cli.command {
        Command::Add {
            amount,
            category,
            date,
            description,
        } => println!("{}", service.add(*amount, category, date, description)?),
        Command::Update { index, .. } => {
            let changes = cli.command.draft().unwrap_or_default();
            println!("{}", service.update(*index, &changes)?);
        }
        Command::Remove { index } => println!("{}", service.remove(*index)?),
        Command::GetBalance => {
            for line in service.get_balance()? {
                println!("{line}");
            }
        }
        Command::Get => print_blocks(&service.get()?, MSG_NO_RECORDS),
        Command::GetByKey { by, value } => {
            let value = query_value(by, value);
            let rendered = render_query_value(&value);
            match service.get_by_key(by, value)? {
                KeyQueryOutcome::Message(message) => println!("{message}"),
                KeyQueryOutcome::Matches(blocks) => {
                    print_blocks(&blocks, &format!("No records found for {by}: {rendered}"))
                }
            }
        }
    }
    Ok(())
}

fn print_blocks(blocks: &[String], empty: &str) {
    if blocks.is_empty() {
        println!("{empty}");
        return;
    }
    for block in blocks {
        println!("{block}\n");
    }
}
