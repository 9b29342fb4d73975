mod common;

use common::CountingRead;
use table_spec_guess::column_header::{DefaultExtractColumnHeaderRead, ExtractColumnHeaderRead};
use table_spec_guess::read::Read;

type HeaderRead = DefaultExtractColumnHeaderRead<CountingRead, String>;

const ROWS: &[&[&str]] = &[
    &["r0", "a"],
    &["r1", "b"],
    &["r2", "c"],
    &["r3", "d"],
];

fn header_read(header_idx: Option<u64>) -> (HeaderRead, std::rc::Rc<std::cell::Cell<usize>>) {
    let (source, reads) = CountingRead::new(ROWS);
    (DefaultExtractColumnHeaderRead::new(source, header_idx), reads)
}

fn headers(read: &mut HeaderRead) -> Option<Vec<Option<String>>> {
    ExtractColumnHeaderRead::<String, String>::column_headers(read)
        .expect("headers")
        .map(|row| row.as_slice().to_vec())
}

fn next_first_cell(read: &mut HeaderRead) -> Option<String> {
    Read::<String, String>::next(read)
        .expect("next row")
        .and_then(|row| row.into_values().into_iter().next().flatten())
}

fn drain(read: &mut HeaderRead) -> Vec<String> {
    std::iter::from_fn(|| next_first_cell(read)).collect()
}

fn cells(values: &[&str]) -> Option<Vec<Option<String>>> {
    Some(values.iter().map(|v| Some(v.to_string())).collect())
}

#[test]
fn header_at_zero_is_captured_by_a_single_read() {
    let (mut read, reads) = header_read(Some(0));
    assert_eq!(headers(&mut read), cells(&["r0", "a"]));
    assert_eq!(reads.get(), 1);
}

#[test]
fn header_is_idempotent_before_and_after_draining() {
    let (mut read, reads) = header_read(Some(1));
    let first = headers(&mut read);
    assert_eq!(first, cells(&["r1", "b"]));
    assert_eq!(reads.get(), 2);
    assert_eq!(headers(&mut read), first);
    assert_eq!(reads.get(), 2);

    assert_eq!(drain(&mut read), vec!["r2", "r3"]);
    assert_eq!(headers(&mut read), first);
    assert_eq!(reads.get(), ROWS.len());
}

#[test]
fn header_captured_while_iterating_needs_no_further_reads() {
    let (mut read, reads) = header_read(Some(2));
    assert_eq!(drain(&mut read), vec!["r0", "r1", "r3"]);
    assert_eq!(reads.get(), ROWS.len());
    assert_eq!(headers(&mut read), cells(&["r2", "c"]));
    assert_eq!(reads.get(), ROWS.len());
}

#[test]
fn header_read_ahead_consumes_only_up_to_the_header() {
    let (mut read, reads) = header_read(Some(1));
    assert_eq!(next_first_cell(&mut read).as_deref(), Some("r0"));
    assert_eq!(reads.get(), 1);
    assert_eq!(headers(&mut read), cells(&["r1", "b"]));
    assert_eq!(reads.get(), 2);
    assert_eq!(next_first_cell(&mut read).as_deref(), Some("r2"));
}

#[test]
fn header_last_row_is_found() {
    let (mut read, reads) = header_read(Some(3));
    assert_eq!(headers(&mut read), cells(&["r3", "d"]));
    assert_eq!(reads.get(), 4);
    assert!(next_first_cell(&mut read).is_none());
}

#[test]
fn header_outside_table_is_absent_when_asked_first() {
    let (mut read, reads) = header_read(Some(4));
    assert_eq!(headers(&mut read), None);
    assert_eq!(reads.get(), ROWS.len());
    assert_eq!(headers(&mut read), None);
    assert_eq!(reads.get(), ROWS.len());
}

#[test]
fn header_outside_table_is_absent_after_draining() {
    let (mut read, reads) = header_read(Some(10));
    assert_eq!(drain(&mut read), vec!["r0", "r1", "r2", "r3"]);
    assert_eq!(headers(&mut read), None);
    assert_eq!(reads.get(), ROWS.len());
}

#[test]
fn exhausted_source_is_not_read_again() {
    let (mut read, reads) = header_read(Some(0));
    drain(&mut read);
    assert_eq!(reads.get(), ROWS.len());
    for _ in 0..3 {
        assert!(next_first_cell(&mut read).is_none());
    }
    assert_eq!(reads.get(), ROWS.len());
}

#[test]
fn without_header_rows_pass_through() {
    let (mut read, reads) = header_read(None);
    assert_eq!(headers(&mut read), None);
    assert_eq!(reads.get(), 0);
    assert_eq!(drain(&mut read), vec!["r0", "r1", "r2", "r3"]);
}
