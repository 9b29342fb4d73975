use std::marker::PhantomData;

use log::trace;

use crate::{
    random_access::RandomAccessible,
    spec::{TypedReaderColumnSpec, TypedReaderTableSpec},
    type_hierarchy::{TypeHierarchy, TypeResolver},
};

/// Resolves the most specific type of every column across many rows.
///
/// Resolvers are created lazily, the first time a row reaches a column index,
/// and kept in a vector indexed by column: columns are always contiguous from
/// zero, wider rows just push the vector further.
pub struct TypeGuesser<'h, V, T, H>
where
    H: TypeHierarchy<V, T>,
{
    hierarchy: &'h H,
    resolvers: Vec<H::Resolver>,
    early_stopping: bool,
    _marker: PhantomData<fn(&V) -> T>,
}

impl<'h, V, T, H> TypeGuesser<'h, V, T, H>
where
    H: TypeHierarchy<V, T>,
{
    pub fn new(hierarchy: &'h H, early_stopping: bool) -> Self {
        Self {
            hierarchy,
            resolvers: Vec::new(),
            early_stopping,
            _marker: PhantomData,
        }
    }

    pub fn update<R>(&mut self, row: &R)
    where
        R: RandomAccessible<V> + ?Sized,
    {
        let size = row.size();
        while self.resolvers.len() < size {
            trace!("Creating type resolver for column {}", self.resolvers.len());
            self.resolvers.push(self.hierarchy.create_resolver());
        }
        for (idx, resolver) in self.resolvers.iter_mut().take(size).enumerate() {
            resolver.accept(row.get(idx));
        }
    }

    /// True if early stopping is enabled and every resolver reached the top
    /// of the hierarchy. Never true before the first column was seen.
    pub fn can_stop(&self) -> bool {
        self.early_stopping
            && !self.resolvers.is_empty()
            && self.resolvers.iter().all(|resolver| resolver.reached_top())
    }

    pub fn column_count(&self) -> usize {
        self.resolvers.len()
    }

    /// One type per column; columns past the observed ones up to
    /// `min_columns` get the type of a fresh resolver and no has-type flag.
    pub fn get_most_specific_types(&self, min_columns: usize) -> TypedReaderTableSpec<T> {
        let width = min_columns.max(self.resolvers.len());
        let padding = self.hierarchy.create_resolver();
        let (types, has_types): (Vec<T>, Vec<bool>) = (0..width)
            .map(|idx| match self.resolvers.get(idx) {
                Some(resolver) => (resolver.most_specific_type(), resolver.has_type()),
                None => (padding.most_specific_type(), false),
            })
            .unzip();
        TypedReaderTableSpec::from_columns(
            types
                .into_iter()
                .zip(has_types)
                .map(|(ty, has_type)| TypedReaderColumnSpec::create(None, ty, has_type)),
        )
    }
}
