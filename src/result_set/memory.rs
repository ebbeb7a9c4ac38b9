use super::{CellValue, ResultSet, ResultSetError};

/// Result set backed by rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    position: Option<usize>,
    closed: bool,
}

impl MemoryResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns,
            rows,
            position: None,
            closed: false,
        }
    }

    pub fn empty(columns: Vec<String>) -> Self {
        Self::new(columns, Vec::new())
    }

    /// Appends a row; short rows are padded with NULL.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }

    fn check_open(&self) -> Result<(), ResultSetError> {
        if self.closed {
            Err(ResultSetError::Closed)
        } else {
            Ok(())
        }
    }
}

impl ResultSet for MemoryResultSet {
    fn row_count(&self) -> Result<usize, ResultSetError> {
        self.check_open()?;
        Ok(self.rows.len())
    }

    fn column_names(&self) -> Result<Vec<String>, ResultSetError> {
        self.check_open()?;
        Ok(self.columns.clone())
    }

    fn cell(&self, column: usize) -> Result<CellValue, ResultSetError> {
        self.check_open()?;
        let row = self
            .position
            .and_then(|p| self.rows.get(p))
            .ok_or(ResultSetError::RowOutOfRange {
                row: self.position.map_or(-1, |p| p as i64),
                rows: self.rows.len(),
            })?;
        row.get(column)
            .cloned()
            .ok_or(ResultSetError::ColumnOutOfRange {
                column,
                columns: self.columns.len(),
            })
    }

    fn go_to_row(&mut self, row: usize) -> Result<(), ResultSetError> {
        self.check_open()?;
        if row >= self.rows.len() {
            return Err(ResultSetError::RowOutOfRange {
                row: row as i64,
                rows: self.rows.len(),
            });
        }
        self.position = Some(row);
        Ok(())
    }

    fn row_position(&self) -> Option<usize> {
        self.position
    }

    fn close(&mut self) {
        self.closed = true;
        self.rows.clear();
        self.position = None;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos() -> MemoryResultSet {
        MemoryResultSet::new(
            vec!["file_id".into(), "title".into(), "size".into()],
            vec![
                vec![1.into(), "cat".into(), 2048_i64.into()],
                vec![2.into(), "dog".into(), CellValue::Null],
                vec![3.into(), "42".into(), 1.5.into()],
            ],
        )
    }

    #[test]
    fn test_starts_before_first_row() {
        let rs = photos();
        assert_eq!(rs.row_position(), None);
        assert!(matches!(
            rs.cell(0),
            Err(ResultSetError::RowOutOfRange { row: -1, .. })
        ));
    }

    #[test]
    fn test_forward_iteration() {
        let mut rs = photos();
        let mut titles = Vec::new();
        while rs.go_to_next_row().is_ok() {
            titles.push(rs.get_string(1).unwrap());
        }
        assert_eq!(titles, vec!["cat", "dog", "42"]);
        assert!(rs.is_at_last_row().unwrap());
    }

    #[test]
    fn test_random_access() {
        let mut rs = photos();
        rs.go_to_last_row().unwrap();
        assert_eq!(rs.row_position(), Some(2));
        rs.go_to_previous_row().unwrap();
        assert_eq!(rs.get_i32(0).unwrap(), 2);
        rs.go_to_first_row().unwrap();
        assert!(rs.go_to_previous_row().is_err());
        assert!(rs.go_to_row(3).is_err());
        assert_eq!(rs.row_position(), Some(0));
    }

    #[test]
    fn test_typed_getters() {
        let mut rs = photos();
        rs.go_to_first_row().unwrap();
        assert_eq!(rs.get_i64(2).unwrap(), 2048);
        assert_eq!(rs.get_f64(2).unwrap(), 2048.0);
        assert!(rs.get_bool(0).unwrap());
        assert!(matches!(
            rs.get_i32(1),
            Err(ResultSetError::TypeMismatch { expected: "i32", .. })
        ));

        rs.go_to_next_row().unwrap();
        assert_eq!(rs.get_string(2).unwrap(), "");
        assert_eq!(rs.get_i64(2).unwrap(), 0);

        rs.go_to_next_row().unwrap();
        assert_eq!(rs.get_i32(1).unwrap(), 42);
        assert!(rs.get_i64(2).is_err());
        assert_eq!(rs.get_f64(2).unwrap(), 1.5);
    }

    #[test]
    fn test_column_lookup() {
        let rs = photos();
        assert_eq!(rs.column_count().unwrap(), 3);
        assert_eq!(rs.column_index("title").unwrap(), Some(1));
        assert_eq!(rs.column_index("nope").unwrap(), None);
    }

    #[test]
    fn test_column_out_of_range() {
        let mut rs = photos();
        rs.go_to_first_row().unwrap();
        assert_eq!(
            rs.cell(9),
            Err(ResultSetError::ColumnOutOfRange {
                column: 9,
                columns: 3
            })
        );
    }

    #[test]
    fn test_close() {
        let mut rs = photos();
        rs.close();
        assert!(rs.is_closed());
        assert_eq!(rs.row_count(), Err(ResultSetError::Closed));
        assert_eq!(rs.go_to_first_row(), Err(ResultSetError::Closed));
    }

    #[test]
    fn test_empty_set() {
        let mut rs = MemoryResultSet::empty(vec!["a".into()]);
        assert!(!rs.is_at_last_row().unwrap());
        assert!(rs.go_to_last_row().is_err());
        rs.push_row(vec![]);
        rs.go_to_first_row().unwrap();
        assert!(rs.cell(0).unwrap().is_null());
    }
}
