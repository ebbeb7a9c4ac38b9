use crate::fields::FieldMap;

use super::{CellValue, ResultSet, ResultSetError};

/// Presents a native result set in the logical column vocabulary.
///
/// Column names are reported through `map` (native → logical, unknown names
/// unchanged) and name lookups are translated back before reaching the inner
/// result set. Rows and cells pass through untouched.
pub struct MappedResultSet<R> {
    inner: R,
    map: &'static FieldMap,
}

impl<R: ResultSet> MappedResultSet<R> {
    pub fn new(inner: R, map: &'static FieldMap) -> Self {
        Self { inner, map }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Native name the inner result set uses for `logical`.
    pub fn native_name<'a>(&self, logical: &'a str) -> &'a str {
        self.map.to_native(logical)
    }
}

impl<R: ResultSet> ResultSet for MappedResultSet<R> {
    fn row_count(&self) -> Result<usize, ResultSetError> {
        self.inner.row_count()
    }

    fn column_names(&self) -> Result<Vec<String>, ResultSetError> {
        Ok(self
            .inner
            .column_names()?
            .iter()
            .map(|native| self.map.to_logical(native).to_string())
            .collect())
    }

    fn column_index(&self, name: &str) -> Result<Option<usize>, ResultSetError> {
        self.inner.column_index(self.native_name(name))
    }

    fn cell(&self, column: usize) -> Result<CellValue, ResultSetError> {
        self.inner.cell(column)
    }

    fn go_to_row(&mut self, row: usize) -> Result<(), ResultSetError> {
        self.inner.go_to_row(row)
    }

    fn row_position(&self) -> Option<usize> {
        self.inner.row_position()
    }

    fn close(&mut self) {
        self.inner.close()
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}
