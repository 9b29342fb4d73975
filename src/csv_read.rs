//! Delimited text source.

use std::{
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use encoding_rs::Encoding;
use log::debug;

use crate::{
    io_utils::{self, decode_bytes},
    random_access::ArrayRandomAccessible,
    read::{Read, Row},
};

/// Reads every record of a delimited file as one row of text cells.
///
/// Header handling is left to the guesser, so the first record is returned like
/// any other. Empty fields become missing cells.
pub struct CsvRead {
    path: PathBuf,
    reader: csv::Reader<Box<dyn io::Read>>,
    encoding: &'static Encoding,
    record: ByteRecord,
    size: Option<u64>,
}

impl CsvRead {
    pub fn open(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let (input, size) = io_utils::open_input(path)?;
        Ok(Self::from_reader(input, delimiter, encoding)
            .with_path(path.to_path_buf())
            .with_size(size))
    }

    pub fn from_reader(
        input: Box<dyn io::Read>,
        delimiter: u8,
        encoding: &'static Encoding,
    ) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        Self {
            path: PathBuf::from("-"),
            reader,
            encoding,
            record: ByteRecord::new(),
            size: None,
        }
    }

    fn with_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }
}

/// Opens `path` resolving delimiter (from the extension unless given) and
/// encoding label.
pub fn open_csv_read(
    path: &Path,
    delimiter: Option<u8>,
    encoding: Option<&str>,
) -> Result<CsvRead> {
    let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
    let encoding = io_utils::resolve_encoding(encoding)?;
    debug!(
        "Opening {path:?} as delimited text (delimiter {:?}, encoding {})",
        delimiter as char,
        encoding.name()
    );
    CsvRead::open(path, delimiter, encoding).with_context(|| format!("Reading {path:?}"))
}

impl Read<PathBuf, String> for CsvRead {
    fn next(&mut self) -> io::Result<Option<Row<String>>> {
        if !self.reader.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        let mut cells = Vec::with_capacity(self.record.len());
        for field in self.record.iter() {
            if field.is_empty() {
                cells.push(None);
            } else {
                cells.push(Some(decode_bytes(field, self.encoding)?));
            }
        }
        Ok(Some(ArrayRandomAccessible::new(cells)))
    }

    fn item(&self) -> Option<&PathBuf> {
        Some(&self.path)
    }

    fn max_progress(&self) -> Option<u64> {
        self.size
    }

    fn progress(&self) -> u64 {
        self.reader.position().byte()
    }
}
