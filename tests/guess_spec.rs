mod common;

use std::io;

use common::{CancelingRead, CountingRead, FailingRead, row};
use proptest::prelude::*;
use table_spec_guess::monitor::{CancelToken, NoopMonitor};
use table_spec_guess::read::VecRead;
use table_spec_guess::spec::ColumnSpec;
use table_spec_guess::string_hierarchy::{ColumnType, string_column_name, string_hierarchy};
use table_spec_guess::type_hierarchy::TreeTypeHierarchy;
use table_spec_guess::{GuessError, TableReadConfig, TableSpecGuesser, TypedReaderTableSpec};

type NameFn = fn(&String) -> Option<String>;

fn guesser() -> TableSpecGuesser<TreeTypeHierarchy<String, ColumnType>, NameFn> {
    TableSpecGuesser::new(string_hierarchy(), string_column_name as NameFn)
}

fn guess(
    rows: &[&[&str]],
    config: &TableReadConfig,
) -> (TypedReaderTableSpec<ColumnType>, usize) {
    let (source, reads) = CountingRead::new(rows);
    let spec = guesser()
        .guess_spec(source, config, &NoopMonitor)
        .expect("guess spec");
    (spec, reads.get())
}

fn names(spec: &TypedReaderTableSpec<ColumnType>) -> Vec<Option<&str>> {
    spec.names()
}

fn types(spec: &TypedReaderTableSpec<ColumnType>) -> Vec<ColumnType> {
    spec.iter().map(|column| *column.ty()).collect()
}

#[test]
fn short_rows_grow_the_column_count() {
    let config = TableReadConfig::plain().with_allow_short_rows(true);
    let (spec, reads) = guess(&[&["1"], &["2", "x"], &["3", "y", "true"], &["4"]], &config);
    assert_eq!(spec.size(), 3);
    assert_eq!(
        types(&spec),
        vec![ColumnType::Integer, ColumnType::String, ColumnType::Boolean]
    );
    assert!(spec.iter().all(|column| column.has_type()));
    assert!(names(&spec).iter().all(Option::is_none));
    assert_eq!(reads, 4);
}

#[test]
fn short_rows_keep_scanning_after_types_reach_the_top() {
    let config = TableReadConfig::plain().with_allow_short_rows(true);
    let (spec, _) = guess(&[&["a"], &["b"], &["c", "2024-01-02"]], &config);
    assert_eq!(types(&spec), vec![ColumnType::String, ColumnType::Date]);
}

#[test]
fn row_id_column_is_excluded_for_every_header_position() {
    let header = ["id", "num", "flag"];
    let expected_types = [ColumnType::String, ColumnType::Integer, ColumnType::Boolean];
    for header_idx in 0..4usize {
        for row_id_idx in 0..3usize {
            let data: Vec<Vec<String>> = (0..4)
                .map(|i| vec![format!("k{i}"), i.to_string(), "true".to_string()])
                .collect();
            let mut rows: Vec<Vec<&str>> = data
                .iter()
                .map(|r| r.iter().map(String::as_str).collect())
                .collect();
            rows.insert(header_idx, header.to_vec());
            let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();

            let config = TableReadConfig::default()
                .with_column_header_idx(Some(header_idx as u64))
                .with_row_id_idx(Some(row_id_idx));
            let (spec, _) = guess(&rows, &config);

            let expected_names: Vec<Option<&str>> = header
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != row_id_idx)
                .map(|(_, name)| Some(*name))
                .collect();
            let expected: Vec<ColumnType> = expected_types
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != row_id_idx)
                .map(|(_, ty)| *ty)
                .collect();
            let context = format!("header {header_idx}, row id {row_id_idx}");
            assert_eq!(names(&spec), expected_names, "{context}");
            assert_eq!(types(&spec), expected, "{context}");
        }
    }
}

#[test]
fn header_after_skip_boundary_inside_limit_window() {
    let config = TableReadConfig::plain()
        .with_column_header_idx(Some(2))
        .with_rows_to_skip(Some(1))
        .with_max_rows_for_spec(Some(2));
    let (spec, reads) = guess(&[&["a"], &["1"], &["name"], &["2"], &["x"]], &config);
    assert_eq!(names(&spec), vec![Some("name")]);
    assert_eq!(types(&spec), vec![ColumnType::Integer]);
    assert_eq!(reads, 4);
}

#[test]
fn header_after_limit_window_is_read_ahead() {
    let config = TableReadConfig::plain()
        .with_column_header_idx(Some(3))
        .with_max_rows_for_spec(Some(2));
    let (spec, reads) = guess(&[&["1"], &["2"], &["x"], &["hdr"], &["y"]], &config);
    assert_eq!(names(&spec), vec![Some("hdr")]);
    assert_eq!(types(&spec), vec![ColumnType::Integer]);
    assert_eq!(reads, 4);
}

#[test]
fn header_inside_skip_window_is_not_counted_as_skipped() {
    let config = TableReadConfig::plain()
        .with_column_header_idx(Some(0))
        .with_rows_to_skip(Some(2));
    let (spec, reads) = guess(&[&["hdr"], &["x"], &["y"], &["5"], &["6"]], &config);
    assert_eq!(names(&spec), vec![Some("hdr")]);
    assert_eq!(types(&spec), vec![ColumnType::Integer]);
    assert_eq!(reads, 5);
}

#[test]
fn header_at_skip_boundary() {
    let config = TableReadConfig::plain()
        .with_column_header_idx(Some(1))
        .with_rows_to_skip(Some(1))
        .with_max_rows_for_spec(Some(1));
    let (spec, reads) = guess(&[&["x"], &["hdr"], &["7"], &["y"]], &config);
    assert_eq!(names(&spec), vec![Some("hdr")]);
    assert_eq!(types(&spec), vec![ColumnType::Integer]);
    assert_eq!(reads, 3);
}

#[test]
fn early_stop_reads_minimal_rows() {
    let config = TableReadConfig::plain().with_column_header_idx(Some(0));
    let (spec, reads) = guess(&[&["h1", "h2"], &["a", "b"], &["1", "2"], &["3", "4"]], &config);
    assert_eq!(names(&spec), vec![Some("h1"), Some("h2")]);
    assert_eq!(types(&spec), vec![ColumnType::String, ColumnType::String]);
    assert_eq!(reads, 2);
}

#[test]
fn empty_rows_are_skipped_and_not_counted_against_the_cap() {
    let config = TableReadConfig::plain()
        .with_skip_empty_rows(true)
        .with_max_rows_for_spec(Some(2));
    let (spec, _) = guess(&[&["", ""], &["1", "2"], &[], &["3", "x"], &["y", "z"]], &config);
    assert_eq!(types(&spec), vec![ColumnType::Integer, ColumnType::String]);
}

#[test]
fn inconsistent_row_width_is_rejected() {
    let (source, _) = CountingRead::new(&[&["a", "b"], &["1", "2"], &["3"]]);
    let err = guesser()
        .guess_spec(source, &TableReadConfig::default(), &NoopMonitor)
        .unwrap_err();
    assert!(matches!(err, GuessError::IllegalArgument(_)), "{err}");
}

#[test]
fn structurally_empty_rows_do_not_break_width_checks() {
    let config = TableReadConfig::default().with_skip_empty_rows(false);
    let (spec, _) = guess(&[&["a", "b"], &["1", "2"], &[], &["3", "4"]], &config);
    assert_eq!(types(&spec), vec![ColumnType::Integer, ColumnType::Integer]);
}

#[test]
fn row_missing_only_its_row_id_cell_is_rejected() {
    let rows: &[&[&str]] = &[&["a", "b", "id"], &["1", "2", "k1"], &["3", "4"]];
    let config = TableReadConfig::default().with_row_id_idx(Some(2));
    let (source, _) = CountingRead::new(rows);
    let err = guesser().guess_spec(source, &config, &NoopMonitor).unwrap_err();
    assert!(matches!(err, GuessError::IllegalArgument(_)), "{err}");
    assert!(err.to_string().contains("row ID column 2"));

    let (spec, _) = guess(rows, &config.with_allow_short_rows(true));
    assert_eq!(names(&spec), vec![Some("a"), Some("b")]);
    assert_eq!(types(&spec), vec![ColumnType::Integer, ColumnType::Integer]);
}

#[test]
fn missing_header_row_is_rejected() {
    let (source, _) = CountingRead::new(&[&["1"], &["2"]]);
    let config = TableReadConfig::default().with_column_header_idx(Some(5));
    let err = guesser()
        .guess_spec(source, &config, &NoopMonitor)
        .unwrap_err();
    assert!(matches!(err, GuessError::IllegalArgument(_)));
    assert!(err.to_string().contains("column header row 5"));
}

#[test]
fn blank_header_cells_leave_columns_unnamed() {
    let (spec, _) = guess(&[&["a", " ", ""], &["1", "x", "true"]], &TableReadConfig::default());
    assert_eq!(names(&spec), vec![Some("a"), None, None]);
    assert_eq!(
        types(&spec),
        vec![ColumnType::Integer, ColumnType::String, ColumnType::Boolean]
    );
}

#[test]
fn header_wider_than_data_yields_untyped_columns() {
    let (spec, _) = guess(&[&["a", "b", "c"], &["1"], &["2"]], &TableReadConfig::default());
    assert_eq!(names(&spec), vec![Some("a"), Some("b"), Some("c")]);
    assert!(spec.columns()[0].has_type());
    assert!(!spec.columns()[1].has_type());
    assert!(!spec.columns()[2].has_type());
}

#[test]
fn all_missing_column_has_no_type() {
    let (spec, _) = guess(&[&["a", "b"], &["1", ""], &["2", ""]], &TableReadConfig::default());
    assert!(spec.columns()[0].has_type());
    assert!(!spec.columns()[1].has_type());
}

#[test]
fn io_failures_propagate_unchanged() {
    let err = guesser()
        .guess_spec(
            FailingRead::new(2, io::ErrorKind::UnexpectedEof),
            &TableReadConfig::default(),
            &NoopMonitor,
        )
        .unwrap_err();
    match err {
        GuessError::Io(io_err) => assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof),
        other => panic!("expected I/O failure, got {other:?}"),
    }
}

#[test]
fn cancellation_is_distinct_from_failures() {
    let token = CancelToken::new();
    token.cancel();
    let (source, reads) = CountingRead::new(&[&["a"], &["1"]]);
    let err = guesser()
        .guess_spec(source, &TableReadConfig::default(), &token)
        .unwrap_err();
    assert!(err.is_canceled());
    assert_eq!(reads.get(), 0);
}

#[test]
fn cancellation_during_the_scan_stops_pulling_rows() {
    let token = CancelToken::new();
    let (source, reads) = CancelingRead::new(100_000, 3, token.clone());
    let config = TableReadConfig::plain().with_allow_short_rows(true);
    let err = guesser().guess_spec(source, &config, &token).unwrap_err();
    assert!(err.is_canceled());
    assert_eq!(reads.get(), 3);
}

#[test]
fn cancellation_during_header_read_ahead_stops_pulling_rows() {
    let token = CancelToken::new();
    let (source, reads) = CancelingRead::new(100_000, 3, token.clone());
    let config = TableReadConfig::plain()
        .with_column_header_idx(Some(99_999))
        .with_max_rows_for_spec(Some(1));
    let err = guesser().guess_spec(source, &config, &token).unwrap_err();
    assert!(err.is_canceled());
    assert_eq!(reads.get(), 3);
}

#[test]
fn progress_is_reported_to_the_monitor() {
    let token = CancelToken::new();
    let source = VecRead::<(), String>::new(vec![row(&["a"]), row(&["1"]), row(&["2"])]);
    guesser()
        .guess_spec(source, &TableReadConfig::default(), &token)
        .expect("guess spec");
    assert_eq!(token.progress(), 1.0);
}

fn integer_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec("[0-9]{1,5}", 1..6), 1..20)
}

proptest! {
    #[test]
    fn column_count_matches_widest_row(rows in integer_rows()) {
        let borrowed: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect();
        let borrowed: Vec<&[&str]> = borrowed.iter().map(Vec::as_slice).collect();
        let config = TableReadConfig::plain().with_allow_short_rows(true);
        let (spec, reads) = guess(&borrowed, &config);

        let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
        prop_assert_eq!(spec.size(), widest);
        prop_assert_eq!(reads, rows.len());
        prop_assert!(spec.iter().all(|c| c.has_type() && *c.ty() == ColumnType::Integer));
    }
}
