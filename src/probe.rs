use std::{
    fmt::{self, Display},
    path::Path,
};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cli::{InputFormat, OutputFormat, ProbeArgs},
    config::TableReadConfig,
    csv_read::open_csv_read,
    guesser::TableSpecGuesser,
    json_hierarchy::{json_column_name, json_hierarchy},
    json_read::JsonLinesRead,
    monitor::NoopMonitor,
    multi_table::{SpecMergeMode, merge_specs},
    read::Read,
    spec::TypedReaderTableSpec,
    string_hierarchy::{string_column_name, string_hierarchy},
    table,
    type_hierarchy::{TreeTypeHierarchy, TypeHierarchy},
};

pub fn execute(args: &ProbeArgs) -> Result<()> {
    let config = read_config(args)?;
    match args.input_format {
        InputFormat::Csv => {
            let hierarchy = string_hierarchy();
            let lattice = hierarchy.type_lattice();
            let guesser = TableSpecGuesser::new(hierarchy, string_column_name);
            let specs = guess_all(&args.inputs, &guesser, &config, |path| {
                open_csv_read(path, args.delimiter, args.input_encoding.as_deref())
            })?;
            emit(&combine(specs, args, &lattice)?, args.format)
        }
        InputFormat::Jsonl => {
            let hierarchy = json_hierarchy();
            let lattice = hierarchy.type_lattice();
            let guesser = TableSpecGuesser::new(hierarchy, json_column_name);
            let specs = guess_all(&args.inputs, &guesser, &config, JsonLinesRead::open)?;
            emit(&combine(specs, args, &lattice)?, args.format)
        }
    }
}

/// Loads the configuration file, if any, and applies the flag overrides.
pub fn read_config(args: &ProbeArgs) -> Result<TableReadConfig> {
    let mut config = match &args.config {
        Some(path) => TableReadConfig::load(path)?,
        None => TableReadConfig::default(),
    };
    if args.no_header {
        config.column_header_idx = None;
    } else if let Some(idx) = args.header_row {
        config.column_header_idx = Some(idx);
    }
    if let Some(idx) = args.row_id_column {
        config.row_id_idx = Some(idx);
    }
    if let Some(rows) = args.skip {
        config.num_rows_to_skip = Some(rows);
    }
    if let Some(limit) = args.limit {
        config.max_rows_for_spec = (limit > 0).then_some(limit);
    }
    if args.skip_empty_rows {
        config.skip_empty_rows = true;
    } else if args.keep_empty_rows {
        config.skip_empty_rows = false;
    }
    if args.allow_short_rows {
        config.allow_short_rows = true;
    }
    Ok(config)
}

fn guess_all<I, V, T, H, F, R, O>(
    inputs: &[impl AsRef<Path>],
    guesser: &TableSpecGuesser<H, F>,
    config: &TableReadConfig,
    open: O,
) -> Result<Vec<TypedReaderTableSpec<T>>>
where
    H: TypeHierarchy<V, T>,
    F: Fn(&V) -> Option<String>,
    R: Read<I, V>,
    I: fmt::Debug,
    O: Fn(&Path) -> Result<R>,
{
    inputs
        .iter()
        .map(|input| {
            let path = input.as_ref();
            info!("Guessing table spec of {path:?}");
            let read = open(path)?;
            let spec = guesser
                .guess_spec(read, config, &NoopMonitor)
                .with_context(|| format!("Guessing table spec of {path:?}"))?;
            info!("Found {} column(s) in {path:?}", spec.size());
            Ok(spec)
        })
        .collect()
}

fn combine<T: Clone>(
    mut specs: Vec<TypedReaderTableSpec<T>>,
    args: &ProbeArgs,
    lattice: &TreeTypeHierarchy<T, T>,
) -> Result<TypedReaderTableSpec<T>> {
    if specs.len() == 1
        && let Some(spec) = specs.pop()
    {
        return Ok(spec);
    }
    let mode: SpecMergeMode = args.merge.into();
    let merged = merge_specs(&specs, mode, lattice)
        .with_context(|| format!("Merging {} table specs with mode {mode}", specs.len()))?;
    info!("Merged {} input(s) into {} column(s)", specs.len(), merged.size());
    Ok(merged)
}

fn emit<T>(spec: &TypedReaderTableSpec<T>, format: OutputFormat) -> Result<()>
where
    T: Display + Serialize,
{
    match format {
        OutputFormat::Table => print!("{}", table::render_spec(spec)),
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(spec).context("Serializing table spec as YAML")?;
            print!("{yaml}");
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(spec).context("Serializing table spec as JSON")?;
            println!("{json}");
        }
    }
    Ok(())
}
