//! Fixed-length row views.
//!
//! A row is a sequence of optional cells: `None` marks a missing value (an
//! empty CSV field, a JSON `null`, or padding of a short row). The engine only
//! ever reads rows through [`RandomAccessible`], so decorators such as
//! [`ExcludeIndexView`] can hide cells without copying.

use std::fmt;

pub trait RandomAccessible<V> {
    /// Number of cells in the row.
    fn size(&self) -> usize;

    /// Value at `idx`, `None` for missing cells and indices past the end.
    fn get(&self, idx: usize) -> Option<&V>;

    /// Defensive owned copy of the row.
    fn copy(&self) -> ArrayRandomAccessible<V>
    where
        V: Clone,
    {
        ArrayRandomAccessible::new((0..self.size()).map(|idx| self.get(idx).cloned()).collect())
    }

    fn cells(&self) -> Cells<'_, V, Self>
    where
        Self: Sized,
    {
        Cells {
            row: self,
            idx: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// A row is structurally empty when it has no cells or only missing ones.
    fn is_empty_row(&self) -> bool {
        (0..self.size()).all(|idx| self.get(idx).is_none())
    }
}

/// Iterator over the cells of a [`RandomAccessible`].
pub struct Cells<'a, V, R: ?Sized> {
    row: &'a R,
    idx: usize,
    _marker: std::marker::PhantomData<&'a V>,
}

impl<'a, V, R> Iterator for Cells<'a, V, R>
where
    R: RandomAccessible<V> + ?Sized,
    V: 'a,
{
    type Item = Option<&'a V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.row.size() {
            return None;
        }
        let cell = self.row.get(self.idx);
        self.idx += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.row.size().saturating_sub(self.idx);
        (remaining, Some(remaining))
    }
}

/// Owned row backed by a vector of optional cells.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ArrayRandomAccessible<V> {
    values: Vec<Option<V>>,
}

impl<V> ArrayRandomAccessible<V> {
    pub fn new(values: Vec<Option<V>>) -> Self {
        Self { values }
    }

    /// Row where every cell is present.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self::new(values.into_iter().map(Some).collect())
    }

    pub fn into_values(self) -> Vec<Option<V>> {
        self.values
    }

    pub fn as_slice(&self) -> &[Option<V>] {
        &self.values
    }
}

impl<V> RandomAccessible<V> for ArrayRandomAccessible<V> {
    fn size(&self) -> usize {
        self.values.len()
    }

    fn get(&self, idx: usize) -> Option<&V> {
        self.values.get(idx).and_then(Option::as_ref)
    }
}

impl<V> From<Vec<Option<V>>> for ArrayRandomAccessible<V> {
    fn from(values: Vec<Option<V>>) -> Self {
        Self::new(values)
    }
}

impl<V: fmt::Debug> fmt::Debug for ArrayRandomAccessible<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

/// View hiding the cell at `excluded`; cells after it shift down by one.
///
/// Rows too short to contain the excluded index are passed through unchanged.
pub struct ExcludeIndexView<'a, R: ?Sized> {
    inner: &'a R,
    excluded: usize,
}

impl<'a, R: ?Sized> ExcludeIndexView<'a, R> {
    pub fn new(inner: &'a R, excluded: usize) -> Self {
        Self { inner, excluded }
    }
}

impl<V, R> RandomAccessible<V> for ExcludeIndexView<'_, R>
where
    R: RandomAccessible<V> + ?Sized,
{
    fn size(&self) -> usize {
        let size = self.inner.size();
        if size > self.excluded { size - 1 } else { size }
    }

    fn get(&self, idx: usize) -> Option<&V> {
        if idx < self.excluded {
            self.inner.get(idx)
        } else {
            self.inner.get(idx + 1)
        }
    }
}

/// Row view with an optional excluded column, chosen per call site.
pub(crate) enum RowView<'a, R: ?Sized> {
    Full(&'a R),
    Excluding(ExcludeIndexView<'a, R>),
}

impl<'a, R: ?Sized> RowView<'a, R> {
    pub(crate) fn new(row: &'a R, excluded: Option<usize>) -> Self {
        match excluded {
            Some(idx) => RowView::Excluding(ExcludeIndexView::new(row, idx)),
            None => RowView::Full(row),
        }
    }
}

impl<V, R> RandomAccessible<V> for RowView<'_, R>
where
    R: RandomAccessible<V> + ?Sized,
{
    fn size(&self) -> usize {
        match self {
            RowView::Full(row) => row.size(),
            RowView::Excluding(view) => view.size(),
        }
    }

    fn get(&self, idx: usize) -> Option<&V> {
        match self {
            RowView::Full(row) => row.get(idx),
            RowView::Excluding(view) => view.get(idx),
        }
    }
}
