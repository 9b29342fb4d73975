pub mod cli;
pub mod column_header;
pub mod config;
pub mod csv_read;
pub mod error;
pub mod guesser;
pub mod io_utils;
pub mod json_hierarchy;
pub mod json_read;
pub mod monitor;
pub mod multi_table;
pub mod probe;
pub mod random_access;
pub mod read;
pub mod spec;
pub mod string_hierarchy;
pub mod table;
pub mod type_guesser;
pub mod type_hierarchy;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    config::TableReadConfig,
    error::{GuessError, GuessResult},
    guesser::TableSpecGuesser,
    spec::{ReaderColumnSpec, ReaderTableSpec, TypedReaderColumnSpec, TypedReaderTableSpec},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("table_spec_guess", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Probe(args) => probe::execute(&args),
    }
}
