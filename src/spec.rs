//! Column and table spec model.
//!
//! [`ReaderColumnSpec`] carries the identity of a column discovered in a
//! source, [`TypedReaderColumnSpec`] adds the resolved type. Table specs are
//! immutable ordered sequences of column specs with structural equality; they
//! are produced once per guess (or per merge of several guesses) and never
//! mutated afterwards.

use std::{collections::HashSet, fmt, slice};

use itertools::izip;
use serde::{Deserialize, Serialize};

use crate::error::{GuessResult, ensure_arg};

/// Prefix used for columns that have no name of their own.
pub const DEFAULT_COLUMN_NAME_PREFIX: &str = "Column";

/// Access to the (optional) name of a column spec.
pub trait ColumnSpec {
    fn name(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReaderColumnSpec {
    name: Option<String>,
}

impl ReaderColumnSpec {
    pub fn new(name: Option<String>) -> Self {
        Self { name }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()))
    }
}

impl ColumnSpec for ReaderColumnSpec {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Column spec with a resolved type.
///
/// `has_type` is false when every value seen for the column was missing; `ty`
/// then holds the hierarchy's type for an unobserved column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedReaderColumnSpec<T> {
    name: Option<String>,
    #[serde(rename = "type")]
    ty: T,
    has_type: bool,
}

impl<T> TypedReaderColumnSpec<T> {
    pub fn create(name: Option<String>, ty: T, has_type: bool) -> Self {
        Self { name, ty, has_type }
    }

    pub fn create_with_name(name: impl Into<String>, ty: T, has_type: bool) -> Self {
        Self::create(Some(name.into()), ty, has_type)
    }

    pub fn ty(&self) -> &T {
        &self.ty
    }

    pub fn has_type(&self) -> bool {
        self.has_type
    }

    pub fn into_parts(self) -> (Option<String>, T, bool) {
        (self.name, self.ty, self.has_type)
    }

    /// Same column under a different name.
    pub fn with_name(self, name: Option<String>) -> Self {
        Self { name, ..self }
    }
}

impl<T> ColumnSpec for TypedReaderColumnSpec<T> {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl<T: fmt::Display> fmt::Display for TypedReaderColumnSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name.as_deref().unwrap_or("<no name>"))?;
        if self.has_type {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "{} (no values)", self.ty)
        }
    }
}

/// Ordered, fixed-size sequence of column specs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReaderTableSpec<C> {
    columns: Vec<C>,
}

pub type TypedReaderTableSpec<T> = ReaderTableSpec<TypedReaderColumnSpec<T>>;

impl<C> ReaderTableSpec<C> {
    pub fn new(columns: Vec<C>) -> Self {
        Self { columns }
    }

    pub fn from_columns<I>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        Self::new(columns.into_iter().collect())
    }

    /// Number of columns.
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, idx: usize) -> Option<&C> {
        self.columns.get(idx)
    }

    pub fn iter(&self) -> slice::Iter<'_, C> {
        self.columns.iter()
    }

    pub fn columns(&self) -> &[C] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<C> {
        self.columns
    }
}

impl<C: ColumnSpec> ReaderTableSpec<C> {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == Some(name))
    }

    pub fn names(&self) -> Vec<Option<&str>> {
        self.columns.iter().map(ColumnSpec::name).collect()
    }
}

impl ReaderTableSpec<ReaderColumnSpec> {
    pub fn create_reader_table_spec<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::from_columns(
            names
                .into_iter()
                .map(|name| ReaderColumnSpec::new(name.map(Into::into))),
        )
    }
}

impl<T> ReaderTableSpec<TypedReaderColumnSpec<T>> {
    /// Builds a typed spec from parallel name, type and has-type sequences.
    pub fn create<N, S, Ty, B>(names: N, types: Ty, has_types: B) -> GuessResult<Self>
    where
        N: IntoIterator<Item = Option<S>>,
        S: Into<String>,
        Ty: IntoIterator<Item = T>,
        B: IntoIterator<Item = bool>,
    {
        let names: Vec<Option<String>> = names.into_iter().map(|n| n.map(Into::into)).collect();
        let types: Vec<T> = types.into_iter().collect();
        let has_types: Vec<bool> = has_types.into_iter().collect();
        ensure_arg!(
            names.len() == types.len(),
            "Names and types must have the same length ({} names, {} types)",
            names.len(),
            types.len()
        );
        ensure_arg!(
            types.len() == has_types.len(),
            "Types and has-type flags must have the same length ({} types, {} flags)",
            types.len(),
            has_types.len()
        );
        Ok(Self::from_columns(
            izip!(names, types, has_types)
                .map(|(name, ty, has_type)| TypedReaderColumnSpec::create(name, ty, has_type)),
        ))
    }

    /// Builds a typed spec without column names.
    pub fn create_unnamed<Ty, B>(types: Ty, has_types: B) -> GuessResult<Self>
    where
        Ty: IntoIterator<Item = T>,
        B: IntoIterator<Item = bool>,
    {
        let types: Vec<T> = types.into_iter().collect();
        let names = std::iter::repeat_n(None::<String>, types.len());
        Self::create(names, types, has_types)
    }

    /// Replaces the column names, keeping types; lengths must match.
    pub fn with_names<N, S>(self, names: N) -> GuessResult<Self>
    where
        N: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let names: Vec<Option<String>> = names.into_iter().map(|n| n.map(Into::into)).collect();
        ensure_arg!(
            names.len() == self.columns.len(),
            "Expected {} column names but got {}",
            self.columns.len(),
            names.len()
        );
        Ok(Self::from_columns(
            self.columns
                .into_iter()
                .zip(names)
                .map(|(column, name)| column.with_name(name)),
        ))
    }

    /// Gives every unnamed column the default name for its position, skipping
    /// names that are already taken.
    pub fn assign_names_if_missing(self) -> Self {
        let mut taken: Vec<String> = self
            .columns
            .iter()
            .filter_map(|c| c.name().map(str::to_string))
            .collect();
        let columns = self
            .columns
            .into_iter()
            .enumerate()
            .map(|(idx, column)| {
                if column.name().is_some() {
                    return column;
                }
                let mut candidate = format!("{DEFAULT_COLUMN_NAME_PREFIX}{idx}");
                let mut suffix = 1;
                while taken.contains(&candidate) {
                    candidate = format!("{DEFAULT_COLUMN_NAME_PREFIX}{idx}_{suffix}");
                    suffix += 1;
                }
                taken.push(candidate.clone());
                column.with_name(Some(candidate))
            })
            .collect();
        Self::new(columns)
    }

    /// Renames repeated column names with a `_n` suffix so that every name
    /// occurs once. The first occurrence keeps its name.
    pub fn with_unique_names(self) -> Self {
        let taken: HashSet<String> = self
            .columns
            .iter()
            .filter_map(|c| c.name().map(str::to_string))
            .collect();
        let mut seen: HashSet<String> = HashSet::new();
        let columns = self
            .columns
            .into_iter()
            .map(|column| {
                let Some(name) = column.name().map(str::to_string) else {
                    return column;
                };
                if seen.insert(name.clone()) {
                    return column;
                }
                let mut suffix = 1;
                let mut candidate = format!("{name}_{suffix}");
                while taken.contains(&candidate) || seen.contains(&candidate) {
                    suffix += 1;
                    candidate = format!("{name}_{suffix}");
                }
                seen.insert(candidate.clone());
                column.with_name(Some(candidate))
            })
            .collect();
        Self::new(columns)
    }
}

impl<C> From<Vec<C>> for ReaderTableSpec<C> {
    fn from(columns: Vec<C>) -> Self {
        Self::new(columns)
    }
}

impl<'a, C> IntoIterator for &'a ReaderTableSpec<C> {
    type Item = &'a C;
    type IntoIter = slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

impl<C> IntoIterator for ReaderTableSpec<C> {
    type Item = C;
    type IntoIter = std::vec::IntoIter<C>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}
