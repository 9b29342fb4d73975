//! I/O helpers shared by the reader backends.
//!
//! - **Delimiter resolution**: extension-based (`.tsv` → tab, otherwise comma)
//!   with manual override.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **stdin**: the `-` path convention reads from standard input.

use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Opens `path` for buffered reading (stdin for `-`) and reports its size.
pub fn open_input(path: &Path) -> Result<(Box<dyn io::Read>, Option<u64>)> {
    if is_dash(path) {
        return Ok((Box::new(io::stdin().lock()), None));
    }
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let size = file.metadata().ok().map(|meta| meta.len());
    Ok((Box::new(BufReader::new(file)), size))
}

/// Decodes `bytes`, failing with `InvalidData` on malformed input.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> io::Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to decode text with encoding {}", encoding.name()),
        ))
    } else {
        Ok(text.into_owned())
    }
}
