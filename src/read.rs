//! Pull-based row sources.
//!
//! A [`Read`] yields one row per call to [`Read::next`] and `None` once the
//! source is exhausted. Sources are single-pass and may perform blocking I/O;
//! failures surface as [`std::io::Error`]. Whoever opens a source owns it, the
//! decorators in this module only borrow or wrap it.

use std::io;

use log::{debug, trace};

use crate::{
    config::TableReadConfig,
    random_access::{ArrayRandomAccessible, RandomAccessible},
};

pub type Row<V> = ArrayRandomAccessible<V>;

pub trait Read<I, V> {
    fn next(&mut self) -> io::Result<Option<Row<V>>>;

    /// The item (file, stream name, ...) this source reads from, if known.
    fn item(&self) -> Option<&I> {
        None
    }

    /// Total amount of work, in source-specific units, if known.
    fn max_progress(&self) -> Option<u64> {
        None
    }

    /// Work done so far, in the units of [`Read::max_progress`].
    fn progress(&self) -> u64 {
        0
    }
}

impl<I, V, R> Read<I, V> for &mut R
where
    R: Read<I, V> + ?Sized,
{
    fn next(&mut self) -> io::Result<Option<Row<V>>> {
        (**self).next()
    }

    fn item(&self) -> Option<&I> {
        (**self).item()
    }

    fn max_progress(&self) -> Option<u64> {
        (**self).max_progress()
    }

    fn progress(&self) -> u64 {
        (**self).progress()
    }
}

impl<I, V, R> Read<I, V> for Box<R>
where
    R: Read<I, V> + ?Sized,
{
    fn next(&mut self) -> io::Result<Option<Row<V>>> {
        (**self).next()
    }

    fn item(&self) -> Option<&I> {
        (**self).item()
    }

    fn max_progress(&self) -> Option<u64> {
        (**self).max_progress()
    }

    fn progress(&self) -> u64 {
        (**self).progress()
    }
}

/// Forwards the item and progress accessors of a decorator to its inner read.
macro_rules! forward_read_info {
    () => {
        fn item(&self) -> Option<&I> {
            self.inner.item()
        }

        fn max_progress(&self) -> Option<u64> {
            self.inner.max_progress()
        }

        fn progress(&self) -> u64 {
            self.inner.progress()
        }
    };
}

/// Drops the first `to_skip` rows of the inner read.
pub struct SkipRead<R> {
    inner: R,
    to_skip: u64,
}

impl<R> SkipRead<R> {
    pub fn new(inner: R, to_skip: u64) -> Self {
        Self { inner, to_skip }
    }
}

impl<I, V, R: Read<I, V>> Read<I, V> for SkipRead<R> {
    fn next(&mut self) -> io::Result<Option<Row<V>>> {
        while self.to_skip > 0 {
            if self.inner.next()?.is_none() {
                self.to_skip = 0;
                return Ok(None);
            }
            self.to_skip -= 1;
        }
        self.inner.next()
    }

    forward_read_info!();
}

/// Ends after `limit` rows without reading further from the inner read.
pub struct LimitRead<R> {
    inner: R,
    remaining: u64,
}

impl<R> LimitRead<R> {
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<I, V, R: Read<I, V>> Read<I, V> for LimitRead<R> {
    fn next(&mut self) -> io::Result<Option<Row<V>>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let row = self.inner.next()?;
        if row.is_some() {
            self.remaining -= 1;
        } else {
            self.remaining = 0;
        }
        Ok(row)
    }

    forward_read_info!();
}

/// Drops rows without any present cell.
pub struct SkipEmptyRead<R> {
    inner: R,
}

impl<R> SkipEmptyRead<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<I, V, R: Read<I, V>> Read<I, V> for SkipEmptyRead<R> {
    fn next(&mut self) -> io::Result<Option<Row<V>>> {
        while let Some(row) = self.inner.next()? {
            if row.is_empty_row() {
                trace!("Skipping empty row");
                continue;
            }
            return Ok(Some(row));
        }
        Ok(None)
    }

    forward_read_info!();
}

/// In-memory source over prepared rows.
pub struct VecRead<I, V> {
    item: Option<I>,
    rows: std::vec::IntoIter<Row<V>>,
    total: u64,
    consumed: u64,
}

impl<I, V> VecRead<I, V> {
    pub fn new(rows: Vec<Row<V>>) -> Self {
        let total = rows.len() as u64;
        Self {
            item: None,
            rows: rows.into_iter(),
            total,
            consumed: 0,
        }
    }

    pub fn with_item(mut self, item: I) -> Self {
        self.item = Some(item);
        self
    }

    /// Number of rows handed out so far.
    pub fn rows_read(&self) -> u64 {
        self.consumed
    }
}

impl<I, V> Read<I, V> for VecRead<I, V> {
    fn next(&mut self) -> io::Result<Option<Row<V>>> {
        let row = self.rows.next();
        if row.is_some() {
            self.consumed += 1;
        }
        Ok(row)
    }

    fn item(&self) -> Option<&I> {
        self.item.as_ref()
    }

    fn max_progress(&self) -> Option<u64> {
        Some(self.total)
    }

    fn progress(&self) -> u64 {
        self.consumed
    }
}

/// Applies the data-row policies of `config` on top of `read`: empty rows are
/// dropped first, then the leading rows to skip, then everything past the row
/// cap. Skipped empty rows count neither as skipped nor as scanned rows.
pub fn decorate_for_spec_guessing<'a, I, V, R>(
    read: R,
    config: &TableReadConfig,
) -> Box<dyn Read<I, V> + 'a>
where
    R: Read<I, V> + 'a,
    I: 'a,
    V: 'a,
{
    let mut decorated: Box<dyn Read<I, V> + 'a> = Box::new(read);
    if config.skip_empty_rows() {
        decorated = Box::new(SkipEmptyRead::new(decorated));
    }
    if config.skip_rows() {
        debug!("Skipping the first {} data row(s)", config.num_rows_to_skip());
        decorated = Box::new(SkipRead::new(decorated, config.num_rows_to_skip()));
    }
    if config.limit_rows_for_spec() {
        debug!(
            "Scanning at most {} data row(s) for the spec",
            config.max_rows_for_spec()
        );
        decorated = Box::new(LimitRead::new(decorated, config.max_rows_for_spec()));
    }
    decorated
}
