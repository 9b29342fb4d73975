//! Read configuration consumed by the spec guesser.
//!
//! [`TableReadConfig`] mirrors the switches a reader node exposes: header row,
//! row-ID column, leading rows to skip, a cap on rows scanned for the spec and
//! the empty/short row policies. It is plain data; the YAML form uses
//! kebab-case keys and every key is optional:
//!
//! ```yaml
//! column-header-idx: 0
//! row-id-idx: 0
//! num-rows-to-skip: 2
//! max-rows-for-spec: 10000
//! skip-empty-rows: true
//! allow-short-rows: false
//! ```

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ROWS_FOR_SPEC: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TableReadConfig {
    pub column_header_idx: Option<u64>,
    /// Column holding the row ID, removed from every row before type guessing.
    /// Unless short rows are allowed, a non-empty row without this cell is
    /// rejected.
    pub row_id_idx: Option<usize>,
    pub num_rows_to_skip: Option<u64>,
    pub max_rows_for_spec: Option<u64>,
    pub skip_empty_rows: bool,
    pub allow_short_rows: bool,
}

impl Default for TableReadConfig {
    fn default() -> Self {
        Self {
            column_header_idx: Some(0),
            row_id_idx: None,
            num_rows_to_skip: None,
            max_rows_for_spec: Some(DEFAULT_MAX_ROWS_FOR_SPEC),
            skip_empty_rows: true,
            allow_short_rows: false,
        }
    }
}

impl TableReadConfig {
    /// Configuration without header, row-ID, skipping or row cap.
    pub fn plain() -> Self {
        Self {
            column_header_idx: None,
            row_id_idx: None,
            num_rows_to_skip: None,
            max_rows_for_spec: None,
            skip_empty_rows: false,
            allow_short_rows: false,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening read config {path:?}"))?;
        let config: Self = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing read config {path:?}"))?;
        Ok(config)
    }

    pub fn use_column_header_idx(&self) -> bool {
        self.column_header_idx.is_some()
    }

    /// Header row index; only meaningful if [`Self::use_column_header_idx`].
    pub fn column_header_idx(&self) -> u64 {
        self.column_header_idx.unwrap_or(0)
    }

    pub fn use_row_id_idx(&self) -> bool {
        self.row_id_idx.is_some()
    }

    pub fn row_id_idx(&self) -> usize {
        self.row_id_idx.unwrap_or(0)
    }

    pub fn skip_rows(&self) -> bool {
        self.num_rows_to_skip.is_some()
    }

    pub fn num_rows_to_skip(&self) -> u64 {
        self.num_rows_to_skip.unwrap_or(0)
    }

    pub fn limit_rows_for_spec(&self) -> bool {
        self.max_rows_for_spec.is_some()
    }

    pub fn max_rows_for_spec(&self) -> u64 {
        self.max_rows_for_spec.unwrap_or(u64::MAX)
    }

    pub fn skip_empty_rows(&self) -> bool {
        self.skip_empty_rows
    }

    pub fn allow_short_rows(&self) -> bool {
        self.allow_short_rows
    }

    pub fn with_column_header_idx(mut self, idx: Option<u64>) -> Self {
        self.column_header_idx = idx;
        self
    }

    pub fn with_row_id_idx(mut self, idx: Option<usize>) -> Self {
        self.row_id_idx = idx;
        self
    }

    pub fn with_rows_to_skip(mut self, rows: Option<u64>) -> Self {
        self.num_rows_to_skip = rows;
        self
    }

    pub fn with_max_rows_for_spec(mut self, rows: Option<u64>) -> Self {
        self.max_rows_for_spec = rows;
        self
    }

    pub fn with_skip_empty_rows(mut self, skip: bool) -> Self {
        self.skip_empty_rows = skip;
        self
    }

    pub fn with_allow_short_rows(mut self, allow: bool) -> Self {
        self.allow_short_rows = allow;
        self
    }
}
