//! Error types shared by the predicate builder and the compiler backends.
use thiserror::Error;

use crate::predicates::OperationKind;

/// Rejections raised while building or decoding a predicate set.
///
/// A failed builder call never mutates the set it was called on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    /// A raw clause setter was called after structured operations were added.
    #[error("raw clause cannot be set once structured operations exist")]
    ModeConflict,

    #[error("{field} must not be empty")]
    EmptyRawInput { field: &'static str },

    #[error(
        "{kind} expects {expected_scalars} scalar and {expected_lists} list operands, \
         got {scalars} and {lists}"
    )]
    ArityMismatch {
        kind: OperationKind,
        expected_scalars: usize,
        expected_lists: usize,
        scalars: usize,
        lists: usize,
    },

    #[error("unknown operation ordinal {0}")]
    UnknownOperation(i32),

    #[error("unknown setting mode {0}")]
    UnknownMode(u8),
}

/// Reasons a backend refused to compile a predicate set.
///
/// Only the photo-library backend produces these; the relational backend is
/// total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("operation {0} is not supported by this backend")]
    Unsupported(OperationKind),

    #[error("field `{0}` has no mapping on this backend")]
    UnmappedField(String),

    #[error("IN list for `{0}` is empty after dropping blank values")]
    EmptyValueList(String),

    #[error("value for `{0}` is empty")]
    EmptyValue(String),

    #[error("raw where clauses cannot be compiled for this backend")]
    RawClauseMode,

    #[error("duration `{0}` is not a number of milliseconds")]
    InvalidDuration(String),
}
