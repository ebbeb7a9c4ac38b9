//! Backend-agnostic predicate IR.
//!
//! ```text
//! fluent calls / wire JSON
//!       ↓
//! PredicateSet            (builder.rs, wire.rs)
//!       ↓
//! OperationItem sequence  (operation.rs, value.rs)
//!       ↓
//! compiler backends       (crate::compiler)
//! ```
pub mod builder;
pub mod operation;
pub mod value;
pub mod wire;

pub use builder::{PredicateSet, SettingMode};
pub use operation::{OperationItem, OperationKind};
pub use value::{ListValue, ScalarValue};
pub use wire::{WireOperation, WirePredicateSet};
