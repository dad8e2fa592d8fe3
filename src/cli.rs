use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::classify::{DEFAULT_SAMPLE_SEED, DEFAULT_SAMPLE_SIZE};

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Detect semantic column types in CSV files and split phone and company columns",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Predict the semantic type of one column
    Predict(PredictArgs),
    /// Split the best phone and company columns of a CSV file into parts
    Parse(ParseArgs),
    /// Answer JSON requests read line by line from stdin
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Input CSV file
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Column to classify
    #[arg(short = 'c', long = "column")]
    pub column: String,
    /// Directory holding Countries.txt and legal.txt
    #[arg(long = "data-dir", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
    /// Print the label and all scores as JSON
    #[arg(long)]
    pub json: bool,
    /// Maximum number of non-empty values scored per column
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,
    /// Seed for subsampling columns larger than the sample size
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SEED)]
    pub seed: u64,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Input CSV file
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (defaults to output.csv next to the input)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Directory holding Countries.txt and legal.txt
    #[arg(long = "data-dir", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
    /// CSV delimiter character for reading input
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Directory holding the CSV files and the reference lists
    #[arg(long = "data-dir", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
