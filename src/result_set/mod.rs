//! Tabular query results.
//!
//! Compiled queries are executed by external collaborators; whatever they
//! return is consumed through the [`ResultSet`] trait. Implementations only
//! provide raw cell access and positioning, the typed getters and the
//! relative moves are derived from those.
mod mapped;
mod memory;

use thiserror::Error;

pub use mapped::MappedResultSet;
pub use memory::MemoryResultSet;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultSetError {
    #[error("result set is closed")]
    Closed,

    #[error("row {row} is out of range ({rows} rows)")]
    RowOutOfRange { row: i64, rows: usize },

    #[error("column {column} is out of range ({columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("column {column} cannot be read as {expected}")]
    TypeMismatch {
        column: usize,
        expected: &'static str,
    },
}

/// One cell of a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int32(i) => i.to_string(),
            CellValue::Int64(i) => i.to_string(),
            CellValue::Float64(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bytes(b) => format!("[{} bytes]", b.len()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int32(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int64(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float64(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

/// Cursor over a tabular result.
///
/// A fresh result set is positioned before the first row. Reading a cell
/// there is a `RowOutOfRange` error.
pub trait ResultSet {
    fn row_count(&self) -> Result<usize, ResultSetError>;

    fn column_names(&self) -> Result<Vec<String>, ResultSetError>;

    /// Cell `column` of the current row.
    fn cell(&self, column: usize) -> Result<CellValue, ResultSetError>;

    /// Moves to an absolute row.
    fn go_to_row(&mut self, row: usize) -> Result<(), ResultSetError>;

    /// Current row, `None` before the first move.
    fn row_position(&self) -> Option<usize>;

    fn close(&mut self);

    fn is_closed(&self) -> bool;

    fn column_count(&self) -> Result<usize, ResultSetError> {
        Ok(self.column_names()?.len())
    }

    fn column_index(&self, name: &str) -> Result<Option<usize>, ResultSetError> {
        Ok(self.column_names()?.iter().position(|c| c == name))
    }

    fn go_to_first_row(&mut self) -> Result<(), ResultSetError> {
        self.go_to_row(0)
    }

    fn go_to_next_row(&mut self) -> Result<(), ResultSetError> {
        let next = self.row_position().map_or(0, |row| row + 1);
        self.go_to_row(next)
    }

    fn go_to_previous_row(&mut self) -> Result<(), ResultSetError> {
        match self.row_position() {
            Some(row) if row > 0 => self.go_to_row(row - 1),
            _ => Err(ResultSetError::RowOutOfRange {
                row: -1,
                rows: self.row_count()?,
            }),
        }
    }

    fn go_to_last_row(&mut self) -> Result<(), ResultSetError> {
        match self.row_count()? {
            0 => Err(ResultSetError::RowOutOfRange { row: 0, rows: 0 }),
            rows => self.go_to_row(rows - 1),
        }
    }

    fn is_at_last_row(&self) -> Result<bool, ResultSetError> {
        let rows = self.row_count()?;
        Ok(rows > 0 && self.row_position() == Some(rows - 1))
    }

    /// Text rendering of the cell; numbers are formatted, NULL reads as `""`.
    fn get_string(&self, column: usize) -> Result<String, ResultSetError> {
        match self.cell(column)? {
            CellValue::Null => Ok(String::new()),
            CellValue::Bytes(_) => Err(ResultSetError::TypeMismatch {
                column,
                expected: "string",
            }),
            other => Ok(other.display()),
        }
    }

    fn get_i64(&self, column: usize) -> Result<i64, ResultSetError> {
        let mismatch = ResultSetError::TypeMismatch {
            column,
            expected: "i64",
        };
        match self.cell(column)? {
            CellValue::Null => Ok(0),
            CellValue::Bool(b) => Ok(i64::from(b)),
            CellValue::Int32(v) => Ok(i64::from(v)),
            CellValue::Int64(v) => Ok(v),
            CellValue::Text(s) => s.trim().parse().map_err(|_| mismatch),
            CellValue::Float64(_) | CellValue::Bytes(_) => Err(mismatch),
        }
    }

    fn get_i32(&self, column: usize) -> Result<i32, ResultSetError> {
        let value = self.get_i64(column).map_err(|err| match err {
            ResultSetError::TypeMismatch { column, .. } => ResultSetError::TypeMismatch {
                column,
                expected: "i32",
            },
            other => other,
        })?;
        i32::try_from(value).map_err(|_| ResultSetError::TypeMismatch {
            column,
            expected: "i32",
        })
    }

    fn get_f64(&self, column: usize) -> Result<f64, ResultSetError> {
        let mismatch = ResultSetError::TypeMismatch {
            column,
            expected: "f64",
        };
        match self.cell(column)? {
            CellValue::Null => Ok(0.0),
            CellValue::Int32(v) => Ok(f64::from(v)),
            CellValue::Int64(v) => Ok(v as f64),
            CellValue::Float64(v) => Ok(v),
            CellValue::Text(s) => s.trim().parse().map_err(|_| mismatch),
            CellValue::Bool(_) | CellValue::Bytes(_) => Err(mismatch),
        }
    }

    fn get_bool(&self, column: usize) -> Result<bool, ResultSetError> {
        match self.cell(column)? {
            CellValue::Null => Ok(false),
            CellValue::Bool(b) => Ok(b),
            CellValue::Int32(v) => Ok(v != 0),
            CellValue::Int64(v) => Ok(v != 0),
            _ => Err(ResultSetError::TypeMismatch {
                column,
                expected: "bool",
            }),
        }
    }
}
