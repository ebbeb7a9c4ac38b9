pub mod compiler;
pub mod config;
pub mod error;
pub mod executor;
pub mod fields;
pub mod predicates;
pub mod result_set;

pub use compiler::{Backend, CompileOptions, CompiledQuery, PredicateCompiler};
pub use error::{CompileError, PredicateError};
pub use predicates::{ListValue, OperationItem, OperationKind, PredicateSet, ScalarValue, SettingMode};
