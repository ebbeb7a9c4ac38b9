//! JSON representation of a predicate set.
//!
//! Operations are keyed by their `OperationKind` ordinal so that a set can
//! cross a process boundary without sharing the enum definition.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PredicateError;

use super::builder::{PredicateSet, SettingMode};
use super::operation::{OperationItem, OperationKind};
use super::value::{ListValue, ScalarValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOperation {
    pub op: i32,
    #[serde(default)]
    pub scalars: Vec<ScalarValue>,
    #[serde(default)]
    pub lists: Vec<ListValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WirePredicateSet {
    pub operations: Vec<WireOperation>,
    pub where_clause: String,
    pub where_args: Vec<String>,
    pub order: String,
    pub mode: u8,
}

impl From<&OperationItem> for WireOperation {
    fn from(item: &OperationItem) -> Self {
        Self {
            op: item.kind().ordinal(),
            scalars: item.scalars().to_vec(),
            lists: item.lists().to_vec(),
        }
    }
}

impl From<&PredicateSet> for WirePredicateSet {
    fn from(set: &PredicateSet) -> Self {
        Self {
            operations: set.operations().iter().map(WireOperation::from).collect(),
            where_clause: set.where_clause().to_string(),
            where_args: set.where_args().to_vec(),
            order: set.order().to_string(),
            mode: set.mode().code(),
        }
    }
}

impl TryFrom<WirePredicateSet> for PredicateSet {
    type Error = PredicateError;

    /// Unknown ordinals are skipped; malformed operands are rejected.
    ///
    /// The mode must agree with the content. A zero mode is inferred from
    /// whichever description is present.
    fn try_from(wire: WirePredicateSet) -> Result<Self, Self::Error> {
        let mode = SettingMode::try_from(wire.mode)?;

        let mut operations = Vec::with_capacity(wire.operations.len());
        for op in wire.operations {
            let kind = match OperationKind::try_from(op.op) {
                Ok(kind) => kind,
                Err(err) => {
                    warn!("Skipping wire operation: {}", err);
                    continue;
                }
            };
            operations.push(OperationItem::new(kind, op.scalars, op.lists)?);
        }

        let has_raw =
            !wire.where_clause.is_empty() || !wire.where_args.is_empty() || !wire.order.is_empty();
        let mode = match (has_raw, operations.is_empty(), mode) {
            (true, false, _) => return Err(PredicateError::ModeConflict),
            // an omitted mode is taken from the content
            (true, true, SettingMode::Unset) => SettingMode::RawClause,
            (true, true, SettingMode::Structured) => return Err(PredicateError::ModeConflict),
            (false, false, SettingMode::Unset) => SettingMode::Structured,
            (false, false, SettingMode::RawClause) => return Err(PredicateError::ModeConflict),
            (_, _, mode) => mode,
        };

        Ok(PredicateSet::from_parts(
            operations,
            wire.where_clause,
            wire.where_args,
            wire.order,
            mode,
        ))
    }
}

/// Decode a predicate set from wire JSON.
pub fn from_json(input: &str) -> Result<PredicateSet> {
    let wire: WirePredicateSet =
        serde_json::from_str(input).context("Failed to parse predicate JSON")?;
    let set = PredicateSet::try_from(wire).context("Invalid predicate set")?;
    Ok(set)
}

/// Encode a predicate set as pretty-printed wire JSON.
pub fn to_json(set: &PredicateSet) -> Result<String> {
    serde_json::to_string_pretty(&WirePredicateSet::from(set))
        .context("Failed to serialize predicate set")
}
