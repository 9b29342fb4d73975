//! Type lattice for text cells (CSV and other delimited sources).
//!
//! ```text
//! string
//! ├── double
//! │   └── long
//! │       └── integer
//! ├── boolean
//! ├── datetime
//! │   └── date
//! ├── time
//! └── guid
//! ```
//!
//! Blank cells are missing values. Numbers are parsed after trimming, booleans
//! are case-insensitive `true`/`false`, dates and times accept the formats
//! listed in [`DATE_FORMATS`], [`DATETIME_FORMATS`] and [`TIME_FORMATS`].

use std::{fmt, str::FromStr};

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::type_hierarchy::{TreeTypeHierarchy, TreeTypeHierarchyBuilder};

pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];

pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%H:%M:%S%.f"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Double,
    Long,
    Integer,
    Boolean,
    DateTime,
    Date,
    Time,
    Guid,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Double => "double",
            ColumnType::Long => "long",
            ColumnType::Integer => "integer",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "datetime",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::Guid => "guid",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(ColumnType::String),
            "double" | "float" => Ok(ColumnType::Double),
            "long" => Ok(ColumnType::Long),
            "integer" | "int" => Ok(ColumnType::Integer),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "datetime" | "timestamp" => Ok(ColumnType::DateTime),
            "date" => Ok(ColumnType::Date),
            "time" => Ok(ColumnType::Time),
            "guid" | "uuid" => Ok(ColumnType::Guid),
            _ => Err(anyhow!("Unknown column type '{value}'")),
        }
    }
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| anyhow!("Failed to parse '{value}' as datetime"))
}

pub fn parse_naive_time(value: &str) -> Result<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| anyhow!("Failed to parse '{value}' as time"))
}

fn parse_boolean(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_guid(value: &str) -> Option<Uuid> {
    let trimmed = value.trim_matches(|c| matches!(c, '{' | '}'));
    Uuid::parse_str(trimmed).ok()
}

/// Column name for a text header cell; blank cells yield no name.
pub fn string_column_name(value: &String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Type hierarchy over text cells producing [`ColumnType`]s.
pub fn string_hierarchy() -> TreeTypeHierarchy<String, ColumnType> {
    let mut builder = TreeTypeHierarchyBuilder::new(ColumnType::String);
    let root = builder.root();

    // f64 parsing also accepts "inf" and "NaN", which are text here
    let double = builder.add_child(root, ColumnType::Double, |v: &String| {
        let trimmed = v.trim();
        trimmed.bytes().any(|b| b.is_ascii_digit()) && trimmed.parse::<f64>().is_ok()
    });
    let long = builder.add_child(double, ColumnType::Long, |v: &String| {
        v.trim().parse::<i64>().is_ok()
    });
    builder.add_child(long, ColumnType::Integer, |v: &String| {
        v.trim().parse::<i32>().is_ok()
    });
    builder.add_child(root, ColumnType::Boolean, |v: &String| {
        parse_boolean(v.trim()).is_some()
    });
    let datetime = builder.add_child(root, ColumnType::DateTime, |v: &String| {
        let trimmed = v.trim();
        parse_naive_datetime(trimmed).is_ok() || parse_naive_date(trimmed).is_ok()
    });
    builder.add_child(datetime, ColumnType::Date, |v: &String| {
        parse_naive_date(v.trim()).is_ok()
    });
    builder.add_child(root, ColumnType::Time, |v: &String| {
        parse_naive_time(v.trim()).is_ok()
    });
    builder.add_child(root, ColumnType::Guid, |v: &String| {
        parse_guid(v.trim()).is_some()
    });

    builder.missing_when(|v: &String| v.trim().is_empty()).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_hierarchy::{TypeHierarchy, TypeResolver};

    fn resolve(values: &[&str]) -> (ColumnType, bool) {
        let hierarchy = string_hierarchy();
        let mut resolver = hierarchy.create_resolver();
        for value in values {
            resolver.accept(Some(&value.to_string()));
        }
        (resolver.most_specific_type(), resolver.has_type())
    }

    #[test]
    fn integers_widen_to_long_and_double() {
        assert_eq!(resolve(&["1", "42"]).0, ColumnType::Integer);
        assert_eq!(resolve(&["1", "9999999999"]).0, ColumnType::Long);
        assert_eq!(resolve(&["1", "2.5"]).0, ColumnType::Double);
        assert_eq!(resolve(&["1", "abc"]).0, ColumnType::String);
    }

    #[test]
    fn dates_widen_to_datetime() {
        assert_eq!(resolve(&["2024-05-06"]).0, ColumnType::Date);
        assert_eq!(
            resolve(&["2024-05-06", "2024-05-06T14:30:00"]).0,
            ColumnType::DateTime
        );
        assert_eq!(resolve(&["14:30", "08:00:01"]).0, ColumnType::Time);
    }

    #[test]
    fn booleans_and_guids_are_detected() {
        assert_eq!(resolve(&["true", "FALSE"]).0, ColumnType::Boolean);
        assert_eq!(
            resolve(&["{550e8400-e29b-41d4-a716-446655440000}"]).0,
            ColumnType::Guid
        );
        assert_eq!(resolve(&["true", "1"]).0, ColumnType::String);
    }

    #[test]
    fn blank_cells_leave_column_untyped() {
        assert_eq!(resolve(&["", "  "]), (ColumnType::String, false));
        assert_eq!(resolve(&["", "7"]), (ColumnType::Integer, true));
    }

    #[test]
    fn column_type_parses_aliases() {
        assert_eq!("INT".parse::<ColumnType>().unwrap(), ColumnType::Integer);
        assert_eq!("uuid".parse::<ColumnType>().unwrap(), ColumnType::Guid);
        assert!("decimal".parse::<ColumnType>().is_err());
    }

    #[test]
    fn parse_naive_date_supports_multiple_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        assert_eq!(parse_naive_date("2024-05-06").unwrap(), expected);
        assert_eq!(parse_naive_date("06/05/2024").unwrap(), expected);
        assert!(parse_naive_date("May 6th").is_err());
    }
}
