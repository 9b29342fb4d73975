#![allow(dead_code)]

use std::cell::Cell;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use table_spec_guess::monitor::CancelToken;
use table_spec_guess::random_access::ArrayRandomAccessible;
use table_spec_guess::read::{Read, Row};
use tempfile::{TempDir, tempdir};

/// Builds a text row; empty strings become missing cells.
pub fn row(cells: &[&str]) -> Row<String> {
    ArrayRandomAccessible::new(
        cells
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
            .collect(),
    )
}

/// In-memory source that records how many rows were pulled from it.
///
/// The counter is shared so it stays observable after the source has been
/// moved into a guesser.
pub struct CountingRead {
    rows: std::vec::IntoIter<Row<String>>,
    reads: Rc<Cell<usize>>,
}

impl CountingRead {
    pub fn new(rows: &[&[&str]]) -> (Self, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let read = Self {
            rows: rows
                .iter()
                .map(|cells| row(cells))
                .collect::<Vec<_>>()
                .into_iter(),
            reads: Rc::clone(&reads),
        };
        (read, reads)
    }
}

impl Read<String, String> for CountingRead {
    fn next(&mut self) -> io::Result<Option<Row<String>>> {
        let next = self.rows.next();
        if next.is_some() {
            self.reads.set(self.reads.get() + 1);
        }
        Ok(next)
    }
}

/// Source that fails with the given error kind after `ok_rows` rows.
pub struct FailingRead {
    ok_rows: usize,
    kind: io::ErrorKind,
}

impl FailingRead {
    pub fn new(ok_rows: usize, kind: io::ErrorKind) -> Self {
        Self { ok_rows, kind }
    }
}

impl Read<String, String> for FailingRead {
    fn next(&mut self) -> io::Result<Option<Row<String>>> {
        if self.ok_rows == 0 {
            return Err(io::Error::new(self.kind, "source failure"));
        }
        self.ok_rows -= 1;
        Ok(Some(row(&["1", "x"])))
    }
}

/// Source of `rows` single-cell integer rows that requests cancellation on
/// `token` once `cancel_after` rows were pulled.
pub struct CancelingRead {
    rows: usize,
    cancel_after: usize,
    token: CancelToken,
    reads: Rc<Cell<usize>>,
}

impl CancelingRead {
    pub fn new(rows: usize, cancel_after: usize, token: CancelToken) -> (Self, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let read = Self {
            rows,
            cancel_after,
            token,
            reads: Rc::clone(&reads),
        };
        (read, reads)
    }
}

impl Read<String, String> for CancelingRead {
    fn next(&mut self) -> io::Result<Option<Row<String>>> {
        let pulled = self.reads.get();
        if pulled == self.rows {
            return Ok(None);
        }
        self.reads.set(pulled + 1);
        if pulled + 1 == self.cancel_after {
            self.token.cancel();
        }
        Ok(Some(row(&[&pulled.to_string()])))
    }
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}
