//! Plain-text rendering of guessed specs.

use std::{borrow::Cow, fmt::Display, fmt::Write as _};

use crate::spec::{ColumnSpec, TypedReaderTableSpec};

const HEADERS: [&str; 4] = ["#", "name", "type", "observed"];

/// Renders one line per column: position, name, type and whether any value
/// of the column was seen.
pub fn render_spec<T: Display>(spec: &TypedReaderTableSpec<T>) -> String {
    let rows = spec
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            [
                idx.to_string(),
                column.name().unwrap_or("").to_string(),
                column.ty().to_string(),
                if column.has_type() { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&HEADERS, &widths));
    let separators = widths.map(|w| "-".repeat(w));
    let _ = writeln!(output, "{}", format_row(&separators, &widths));
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row<S: AsRef<str>>(values: &[S], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let cell = sanitize_cell(value.as_ref());
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    let trimmed = line.trim_end().len();
    line.truncate(trimmed);
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string_hierarchy::ColumnType;

    #[test]
    fn renders_aligned_columns() {
        let spec = TypedReaderTableSpec::create(
            vec![Some("id".to_string()), None],
            vec![ColumnType::Integer, ColumnType::String],
            vec![true, false],
        )
        .unwrap();
        let rendered = render_spec(&spec);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "#  name  type     observed");
        assert_eq!(lines[1], "-  ----  -------  --------");
        assert_eq!(lines[2], "0  id    integer  yes");
        assert_eq!(lines[3], "1        string   no");
    }

    #[test]
    fn control_characters_are_flattened() {
        assert_eq!(sanitize_cell("a\tb\nc"), "a b c");
    }
}
