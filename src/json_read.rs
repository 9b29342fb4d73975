//! JSON Lines source: one JSON array per line.

use std::{
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde_json::Value;

use crate::{
    io_utils,
    random_access::ArrayRandomAccessible,
    read::{Read, Row},
};

pub struct JsonLinesRead {
    path: PathBuf,
    reader: Box<dyn BufRead>,
    line: String,
    line_no: u64,
    bytes_read: u64,
    size: Option<u64>,
}

impl JsonLinesRead {
    pub fn open(path: &Path) -> Result<Self> {
        let (input, size) = io_utils::open_input(path)?;
        let mut read = Self::from_reader(Box::new(BufReader::new(input)));
        read.path = path.to_path_buf();
        read.size = size;
        Ok(read)
    }

    pub fn from_reader(reader: Box<dyn BufRead>) -> Self {
        Self {
            path: PathBuf::from("-"),
            reader,
            line: String::new(),
            line_no: 0,
            bytes_read: 0,
            size: None,
        }
    }

    fn invalid(&self, message: impl std::fmt::Display) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{:?} line {}: {message}", self.path, self.line_no),
        )
    }
}

impl Read<PathBuf, Value> for JsonLinesRead {
    fn next(&mut self) -> io::Result<Option<Row<Value>>> {
        self.line.clear();
        let read = self.reader.read_line(&mut self.line)?;
        if read == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        self.bytes_read += read as u64;

        let text = self.line.trim();
        if text.is_empty() {
            return Ok(Some(ArrayRandomAccessible::new(Vec::new())));
        }
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(values)) => Ok(Some(ArrayRandomAccessible::new(
                values
                    .into_iter()
                    .map(|value| (!value.is_null()).then_some(value))
                    .collect(),
            ))),
            Ok(other) => Err(self.invalid(format_args!(
                "expected a JSON array, found {}",
                kind_of(&other)
            ))),
            Err(err) => Err(self.invalid(err)),
        }
    }

    fn item(&self) -> Option<&PathBuf> {
        Some(&self.path)
    }

    fn max_progress(&self) -> Option<u64> {
        self.size
    }

    fn progress(&self) -> u64 {
        self.bytes_read
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
