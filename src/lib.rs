pub mod classify;
pub mod cli;
pub mod company;
pub mod error;
pub mod io_utils;
pub mod phone;
pub mod process;
pub mod reference;
pub mod scoring;
pub mod server;
pub mod table;
pub mod text;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    classify::{Classifier, ClassifierOptions},
    cli::{Cli, Commands},
    table::Table,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_semantics", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Predict(args) => handle_predict(&args),
        Commands::Parse(args) => process::execute(&args, &Classifier::default()),
        Commands::Serve(args) => server::execute(&args, Classifier::default()),
    }
}

fn handle_predict(args: &cli::PredictArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    info!(
        "Predicting column '{}' of '{}' with delimiter '{}'",
        args.column,
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let table = Table::read(&args.input, delimiter, encoding)?;
    let values = table.require_column(&args.column)?;
    let classifier = Classifier::new(ClassifierOptions {
        sample_size: args.sample_size,
        seed: args.seed,
        ..ClassifierOptions::default()
    });
    let classification = classifier.classify_column(values, &args.data_dir)?;
    if args.json {
        println!("{}", serde_json::to_string(&classification)?);
    } else {
        println!("{}", classification.label);
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
