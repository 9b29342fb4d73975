//! Column header extraction on top of a [`Read`].
//!
//! The header row is identified by its absolute row index in the underlying
//! source. [`DefaultExtractColumnHeaderRead`] hands out every other row through
//! [`Read::next`] and keeps the header aside, so callers can ask for the header
//! at any time without pre-scanning the source or reading any row twice.

use std::io;

use log::{debug, trace};

use crate::{
    error::{GuessError, GuessResult},
    monitor::ExecMonitor,
    read::{Read, Row},
};

/// A [`Read`] that can additionally produce the column header row.
pub trait ExtractColumnHeaderRead<I, V>: Read<I, V> {
    /// The header row, reading ahead in the source if it was not reached yet.
    ///
    /// `None` if no header is configured or the source ends before the header
    /// index. Rows read ahead to reach the header are not returned by later
    /// calls to [`Read::next`].
    fn column_headers(&mut self) -> io::Result<Option<&Row<V>>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    NotYetAtHeader,
    PastHeader,
    NoHeaderConfigured,
}

pub struct DefaultExtractColumnHeaderRead<R, V> {
    source: R,
    header_idx: u64,
    /// Absolute index of the next row the source will produce.
    row_idx: u64,
    state: HeaderState,
    headers: Option<Row<V>>,
    exhausted: bool,
}

impl<R, V> DefaultExtractColumnHeaderRead<R, V> {
    pub fn new(source: R, header_idx: Option<u64>) -> Self {
        let (state, header_idx) = match header_idx {
            Some(idx) => (HeaderState::NotYetAtHeader, idx),
            None => (HeaderState::NoHeaderConfigured, 0),
        };
        Self {
            source,
            header_idx,
            row_idx: 0,
            state,
            headers: None,
            exhausted: false,
        }
    }

    /// Number of rows pulled from the underlying source, header included.
    pub fn rows_read(&self) -> u64 {
        self.row_idx
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R, V> DefaultExtractColumnHeaderRead<R, V> {
    fn pull<I>(&mut self) -> io::Result<Option<Row<V>>>
    where
        R: Read<I, V>,
    {
        if self.exhausted {
            return Ok(None);
        }
        match self.source.next()? {
            Some(row) => {
                self.row_idx += 1;
                Ok(Some(row))
            }
            None => {
                trace!("Source exhausted after {} row(s)", self.row_idx);
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    /// The header row like [`ExtractColumnHeaderRead::column_headers`], polling
    /// `monitor` for cancellation before every row read ahead.
    pub fn column_headers_with<I, M>(&mut self, monitor: &M) -> GuessResult<Option<&Row<V>>>
    where
        R: Read<I, V>,
        M: ExecMonitor + ?Sized,
    {
        self.read_ahead_to_header::<I, GuessError>(|| monitor.check_canceled())?;
        Ok(self.headers.as_ref())
    }

    fn read_ahead_to_header<I, E>(
        &mut self,
        mut before_pull: impl FnMut() -> Result<(), E>,
    ) -> Result<(), E>
    where
        R: Read<I, V>,
        E: From<io::Error>,
    {
        if self.state != HeaderState::NotYetAtHeader {
            return Ok(());
        }
        while !self.exhausted {
            before_pull()?;
            let Some(row) = self.pull::<I>()? else {
                break;
            };
            if self.row_idx - 1 == self.header_idx {
                self.capture_header(row);
                return Ok(());
            }
        }
        debug!(
            "Source ended after {} row(s), before column header row {}",
            self.row_idx, self.header_idx
        );
        Ok(())
    }

    fn at_header(&self) -> bool {
        self.state == HeaderState::NotYetAtHeader && self.row_idx == self.header_idx
    }

    fn capture_header(&mut self, row: Row<V>) {
        debug!("Captured column header at row {}", self.header_idx);
        self.headers = Some(row);
        self.state = HeaderState::PastHeader;
    }
}

impl<I, V, R: Read<I, V>> Read<I, V> for DefaultExtractColumnHeaderRead<R, V> {
    fn next(&mut self) -> io::Result<Option<Row<V>>> {
        if self.at_header() {
            match self.pull::<I>()? {
                Some(header) => self.capture_header(header),
                None => return Ok(None),
            }
        }
        self.pull::<I>()
    }

    fn item(&self) -> Option<&I> {
        self.source.item()
    }

    fn max_progress(&self) -> Option<u64> {
        self.source.max_progress()
    }

    fn progress(&self) -> u64 {
        self.source.progress()
    }
}

impl<I, V, R: Read<I, V>> ExtractColumnHeaderRead<I, V> for DefaultExtractColumnHeaderRead<R, V> {
    fn column_headers(&mut self) -> io::Result<Option<&Row<V>>> {
        self.read_ahead_to_header::<I, io::Error>(|| Ok(()))?;
        Ok(self.headers.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        monitor::{CancelToken, NoopMonitor},
        random_access::ArrayRandomAccessible,
        read::VecRead,
    };

    fn source(count: usize) -> VecRead<(), String> {
        VecRead::new(
            (0..count)
                .map(|i| ArrayRandomAccessible::from_values([format!("r{i}")]))
                .collect(),
        )
    }

    fn first_cell(row: &Row<String>) -> String {
        row.as_slice()[0].clone().unwrap_or_default()
    }

    #[test]
    fn no_header_is_passthrough() {
        let mut read = DefaultExtractColumnHeaderRead::new(source(2), None);
        assert_eq!(first_cell(&read.next().unwrap().unwrap()), "r0");
        assert!(read.column_headers().unwrap().is_none());
        assert_eq!(first_cell(&read.next().unwrap().unwrap()), "r1");
        assert!(read.next().unwrap().is_none());
    }

    #[test]
    fn header_row_is_not_returned_as_data() {
        let mut read = DefaultExtractColumnHeaderRead::new(source(3), Some(1));
        assert_eq!(first_cell(&read.next().unwrap().unwrap()), "r0");
        assert_eq!(first_cell(&read.next().unwrap().unwrap()), "r2");
        assert!(read.next().unwrap().is_none());
        let header = read.column_headers().unwrap().unwrap();
        assert_eq!(first_cell(header), "r1");
        assert_eq!(read.rows_read(), 3);
    }

    #[test]
    fn header_as_last_row_ends_data() {
        let mut read = DefaultExtractColumnHeaderRead::new(source(2), Some(1));
        assert_eq!(first_cell(&read.next().unwrap().unwrap()), "r0");
        assert!(read.next().unwrap().is_none());
        assert_eq!(first_cell(read.column_headers().unwrap().unwrap()), "r1");
    }

    #[test]
    fn canceled_read_ahead_pulls_no_rows() {
        let token = CancelToken::new();
        token.cancel();
        let mut read = DefaultExtractColumnHeaderRead::new(source(5), Some(4));
        let err = read.column_headers_with::<(), _>(&token).unwrap_err();
        assert!(err.is_canceled());
        assert_eq!(read.rows_read(), 0);

        let header = read.column_headers_with::<(), _>(&NoopMonitor).unwrap().unwrap();
        assert_eq!(first_cell(header), "r4");
        assert_eq!(read.rows_read(), 5);
    }
}
