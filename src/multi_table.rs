//! Combining the specs guessed for several sources into one.

use std::{collections::HashSet, fmt, str::FromStr};

use anyhow::anyhow;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{GuessResult, ensure_arg},
    spec::{ColumnSpec, TypedReaderColumnSpec, TypedReaderTableSpec},
    type_hierarchy::{TypeHierarchy, TypeResolver},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecMergeMode {
    /// Every source must have the same column names in the same order.
    #[default]
    FailOnDifferingSpecs,
    /// Columns present in every source, in the order of the first one.
    Intersection,
    /// Columns present in any source, in order of first appearance.
    Union,
}

impl fmt::Display for SpecMergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpecMergeMode::FailOnDifferingSpecs => "fail",
            SpecMergeMode::Intersection => "intersection",
            SpecMergeMode::Union => "union",
        };
        f.write_str(name)
    }
}

impl FromStr for SpecMergeMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" | "fail-on-differing-specs" => Ok(SpecMergeMode::FailOnDifferingSpecs),
            "intersection" => Ok(SpecMergeMode::Intersection),
            "union" => Ok(SpecMergeMode::Union),
            _ => Err(anyhow!(
                "Unknown merge mode '{value}'. Supported modes: fail, intersection, union"
            )),
        }
    }
}

fn column_names<T>(spec: &TypedReaderTableSpec<T>) -> Vec<String> {
    spec.iter()
        .filter_map(|column| column.name().map(str::to_string))
        .collect()
}

/// Merges `specs` according to `mode`.
///
/// Columns are matched by name; unnamed columns first receive the default
/// name of their position and repeated names within one spec are renamed with
/// a `_n` suffix. The type of a merged column is the common type
/// `lattice` resolves for all typed occurrences of that column.
pub fn merge_specs<T, L>(
    specs: &[TypedReaderTableSpec<T>],
    mode: SpecMergeMode,
    lattice: &L,
) -> GuessResult<TypedReaderTableSpec<T>>
where
    T: Clone,
    L: TypeHierarchy<T, T>,
{
    ensure_arg!(!specs.is_empty(), "At least one table spec is required");
    let named: Vec<TypedReaderTableSpec<T>> = specs
        .iter()
        .cloned()
        .map(TypedReaderTableSpec::assign_names_if_missing)
        .map(TypedReaderTableSpec::with_unique_names)
        .collect();
    let first = column_names(&named[0]);

    let order = match mode {
        SpecMergeMode::FailOnDifferingSpecs => {
            for (idx, spec) in named.iter().enumerate().skip(1) {
                let names = column_names(spec);
                ensure_arg!(
                    names == first,
                    "The columns of input {} ({}) differ from those of the first input ({})",
                    idx + 1,
                    names.join(", "),
                    first.join(", ")
                );
            }
            first
        }
        SpecMergeMode::Intersection => {
            let shared: Vec<HashSet<String>> = named[1..]
                .iter()
                .map(|spec| column_names(spec).into_iter().collect())
                .collect();
            let order: Vec<String> = first
                .into_iter()
                .filter(|name| shared.iter().all(|names| names.contains(name)))
                .collect();
            if order.is_empty() {
                warn!("The inputs have no column in common");
            }
            order
        }
        SpecMergeMode::Union => {
            let mut seen = HashSet::new();
            named
                .iter()
                .flat_map(column_names)
                .filter(|name| seen.insert(name.clone()))
                .collect()
        }
    };
    debug!(
        "Merging {} spec(s) with mode {mode} into {} column(s)",
        specs.len(),
        order.len()
    );

    let columns = order
        .into_iter()
        .filter_map(|name| merge_column(&named, name, lattice))
        .collect::<Vec<_>>();
    Ok(TypedReaderTableSpec::new(columns))
}

fn merge_column<T, L>(
    specs: &[TypedReaderTableSpec<T>],
    name: String,
    lattice: &L,
) -> Option<TypedReaderColumnSpec<T>>
where
    T: Clone,
    L: TypeHierarchy<T, T>,
{
    let mut resolver = lattice.create_resolver();
    let mut fallback: Option<T> = None;
    for column in specs
        .iter()
        .filter_map(|spec| spec.index_of(&name).and_then(|idx| spec.column(idx)))
    {
        if column.has_type() {
            resolver.accept(Some(column.ty()));
        }
        fallback.get_or_insert_with(|| column.ty().clone());
    }
    let fallback = fallback?;
    let has_type = resolver.has_type();
    let ty = if has_type {
        resolver.most_specific_type()
    } else {
        fallback
    };
    Some(TypedReaderColumnSpec::create(Some(name), ty, has_type))
}
