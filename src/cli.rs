use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::multi_table::SpecMergeMode;

#[derive(Debug, Parser)]
#[command(author, version, about = "Guess column names and types of tabular files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Guess the table spec of one or more files and print it
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input files to inspect ('-' reads standard input)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    /// Format of the input files
    #[arg(long = "input-format", value_enum, default_value_t = InputFormat::Csv)]
    pub input_format: InputFormat,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML read configuration; the flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Index of the row holding the column names
    #[arg(long = "header-row", conflicts_with = "no_header")]
    pub header_row: Option<u64>,
    /// Inputs have no header row
    #[arg(long = "no-header")]
    pub no_header: bool,
    /// Index of a row-ID column excluded from the spec
    #[arg(long = "row-id-column")]
    pub row_id_column: Option<usize>,
    /// Number of data rows to skip before guessing
    #[arg(long)]
    pub skip: Option<u64>,
    /// Maximum number of data rows to scan (0 scans every row)
    #[arg(long)]
    pub limit: Option<u64>,
    /// Ignore rows without any value
    #[arg(long = "skip-empty-rows")]
    pub skip_empty_rows: bool,
    /// Treat rows without any value as data rows
    #[arg(long = "keep-empty-rows", conflicts_with = "skip_empty_rows")]
    pub keep_empty_rows: bool,
    /// Accept rows with fewer or more cells than the others
    #[arg(long = "allow-short-rows")]
    pub allow_short_rows: bool,
    /// How to combine the specs of several inputs
    #[arg(long, value_enum, default_value_t = MergeMode::Fail)]
    pub merge: MergeMode,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Csv,
    Jsonl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Yaml,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MergeMode {
    Fail,
    Intersection,
    Union,
}

impl From<MergeMode> for SpecMergeMode {
    fn from(mode: MergeMode) -> Self {
        match mode {
            MergeMode::Fail => SpecMergeMode::FailOnDifferingSpecs,
            MergeMode::Intersection => SpecMergeMode::Intersection,
            MergeMode::Union => SpecMergeMode::Union,
        }
    }
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
