//! Table spec guessing.
//!
//! [`TableSpecGuesser::guess_spec`] turns one row source into a
//! [`TypedReaderTableSpec`]:
//!
//! 1. the source is wrapped in [`DefaultExtractColumnHeaderRead`] so the header
//!    row (absolute index) never reaches type guessing;
//! 2. empty rows, leading rows to skip and rows past the scan cap are removed
//!    by [`decorate_for_spec_guessing`];
//! 3. every remaining row, minus its row-ID cell, is fed to a [`TypeGuesser`];
//! 4. the header row is fetched (reading ahead only if the scan stopped before
//!    it) and its names are combined with the resolved types.
//!
//! The monitor is polled for cancellation before every row pulled from the
//! source, during the scan as well as during the header read-ahead.
//!
//! Early stopping is only enabled when short rows are rejected: then every row
//! has the same width and a scan that stops once all types hit the top of the
//! hierarchy cannot miss columns.

use std::fmt;

use log::{debug, trace};

use crate::{
    column_header::DefaultExtractColumnHeaderRead,
    config::TableReadConfig,
    error::{GuessError, GuessResult},
    monitor::ExecMonitor,
    random_access::{RandomAccessible, RowView},
    read::{Read, Row, decorate_for_spec_guessing},
    spec::TypedReaderTableSpec,
    type_guesser::TypeGuesser,
    type_hierarchy::TypeHierarchy,
};

pub struct TableSpecGuesser<H, F> {
    hierarchy: H,
    column_name_extractor: F,
}

impl<H, F> TableSpecGuesser<H, F> {
    pub fn new(hierarchy: H, column_name_extractor: F) -> Self {
        Self {
            hierarchy,
            column_name_extractor,
        }
    }

    pub fn hierarchy(&self) -> &H {
        &self.hierarchy
    }

    pub fn guess_spec<I, V, T, R, M>(
        &self,
        read: R,
        config: &TableReadConfig,
        monitor: &M,
    ) -> GuessResult<TypedReaderTableSpec<T>>
    where
        R: Read<I, V>,
        H: TypeHierarchy<V, T>,
        F: Fn(&V) -> Option<String>,
        M: ExecMonitor + ?Sized,
        I: fmt::Debug,
    {
        if let Some(item) = read.item() {
            debug!("Guessing table spec of {item:?}");
        }
        let row_id_idx = config.row_id_idx;
        let mut header_read = DefaultExtractColumnHeaderRead::new(read, config.column_header_idx);
        let mut type_guesser = TypeGuesser::new(&self.hierarchy, !config.allow_short_rows());

        let scanned = {
            let mut data = decorate_for_spec_guessing::<I, V, _>(&mut header_read, config);
            fill_type_guesser(data.as_mut(), &mut type_guesser, config, monitor)?
        };

        let names = header_read
            .column_headers_with::<I, M>(monitor)?
            .map(|header| self.extract_names(header, row_id_idx));
        if names.is_none() && config.use_column_header_idx() {
            return Err(GuessError::illegal_argument(format!(
                "The column header row {} is not part of the input (it has {} row(s))",
                config.column_header_idx(),
                header_read.rows_read()
            )));
        }
        monitor.check_canceled()?;

        let header_width = names.as_ref().map_or(0, Vec::len);
        let types = type_guesser.get_most_specific_types(header_width);
        let width = types.size();
        let names = match names {
            Some(mut names) => {
                names.resize(width, None);
                names
            }
            None => vec![None; width],
        };
        debug!(
            "Guessed {width} column(s) from {scanned} data row(s), {} row(s) read in total",
            header_read.rows_read()
        );
        types.with_names(names)
    }

    fn extract_names<V>(&self, header: &Row<V>, row_id_idx: Option<usize>) -> Vec<Option<String>>
    where
        F: Fn(&V) -> Option<String>,
    {
        RowView::new(header, row_id_idx)
            .cells()
            .map(|cell| {
                cell.and_then(|value| (self.column_name_extractor)(value))
                    .filter(|name| !name.trim().is_empty())
            })
            .collect()
    }
}

fn fill_type_guesser<I, V, T, H, M>(
    data: &mut (dyn Read<I, V> + '_),
    type_guesser: &mut TypeGuesser<'_, V, T, H>,
    config: &TableReadConfig,
    monitor: &M,
) -> GuessResult<u64>
where
    H: TypeHierarchy<V, T>,
    M: ExecMonitor + ?Sized,
{
    let mut expected_width: Option<usize> = None;
    let mut scanned = 0u64;
    loop {
        monitor.check_canceled()?;
        let Some(row) = data.next()? else {
            break;
        };
        scanned += 1;
        if let Some(max) = data.max_progress()
            && max > 0
        {
            monitor.set_progress(data.progress() as f64 / max as f64);
        }

        let view = RowView::new(&row, config.row_id_idx);
        if !config.allow_short_rows() && !view.is_empty_row() {
            if let Some(idx) = config.row_id_idx
                && row.size() <= idx
            {
                return Err(GuessError::illegal_argument(format!(
                    "Data row {scanned} has no cell for the row ID column {idx}; allow short \
                     rows to read rows of different length"
                )));
            }
            let width = view.size();
            match expected_width {
                None => expected_width = Some(width),
                Some(expected) if expected != width => {
                    return Err(GuessError::illegal_argument(format!(
                        "Data row {scanned} has {width} column(s) while previous rows have \
                         {expected}; allow short rows to read rows of different length"
                    )));
                }
                Some(_) => {}
            }
        }
        type_guesser.update(&view);
        if type_guesser.can_stop() {
            trace!("All column types reached the top type");
            debug!("Stopping type guessing early after {scanned} data row(s)");
            break;
        }
    }
    Ok(scanned)
}
