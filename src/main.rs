use clap::Parser;
use finance_tracker::args::{Args, Command};
use finance_tracker::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.variant())?.print(),

        Command::Add(add_args) => commands::add(Config::load(home)?, add_args.clone())?.print(),

        Command::Edit(edit_args) => {
            commands::edit(Config::load(home)?, edit_args.clone())?.print()
        }

        Command::Delete(delete_args) => {
            commands::delete(Config::load(home)?, delete_args.clone())?.print()
        }

        Command::List(list_args) => {
            commands::list(Config::load(home)?, list_args.clone())?.print()
        }

        Command::Check(check_args) => {
            commands::check(Config::load(home)?, check_args.clone())?.print()
        }

        Command::Export(export_args) => {
            commands::export(Config::load(home)?, export_args.clone())?.print()
        }

        Command::Import(import_args) => {
            commands::import(Config::load(home)?, import_args.clone())?.print()
        }

        Command::Settings(settings_args) => {
            commands::settings(Config::load(home)?, settings_args.clone())?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
