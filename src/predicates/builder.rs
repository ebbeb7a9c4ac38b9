//! Fluent predicate builder.
//!
//! A [`PredicateSet`] is described either by structured operations or by a
//! raw where clause with arguments and an order string, never both. The first
//! structured call discards any raw input; raw setters are refused once
//! structured operations exist.
use crate::error::PredicateError;

use super::operation::{OperationItem, OperationKind};
use super::value::{ListValue, ScalarValue};

/// How a predicate set has been populated so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingMode {
    #[default]
    Unset,
    RawClause,
    Structured,
}

impl SettingMode {
    /// Wire code: 0 unset, 1 raw clause, 2 structured.
    pub fn code(self) -> u8 {
        match self {
            SettingMode::Unset => 0,
            SettingMode::RawClause => 1,
            SettingMode::Structured => 2,
        }
    }
}

impl TryFrom<u8> for SettingMode {
    type Error = PredicateError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SettingMode::Unset),
            1 => Ok(SettingMode::RawClause),
            2 => Ok(SettingMode::Structured),
            other => Err(PredicateError::UnknownMode(other)),
        }
    }
}

/// Backend-agnostic description of a filtered, sorted, paginated query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    operations: Vec<OperationItem>,
    where_clause: String,
    where_args: Vec<String>,
    order: String,
    mode: SettingMode,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A structured set made of already-validated items.
    pub fn from_operations(operations: Vec<OperationItem>) -> Self {
        let mode = if operations.is_empty() {
            SettingMode::Unset
        } else {
            SettingMode::Structured
        };
        Self {
            operations,
            mode,
            ..Self::default()
        }
    }

    /// Reassembles a set from decoded parts without re-checking the mode.
    pub(crate) fn from_parts(
        operations: Vec<OperationItem>,
        where_clause: String,
        where_args: Vec<String>,
        order: String,
        mode: SettingMode,
    ) -> Self {
        Self {
            operations,
            where_clause,
            where_args,
            order,
            mode,
        }
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn operations(&self) -> &[OperationItem] {
        &self.operations
    }

    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }

    pub fn where_args(&self) -> &[String] {
        &self.where_args
    }

    pub fn order(&self) -> &str {
        &self.order
    }

    pub fn mode(&self) -> SettingMode {
        self.mode
    }

    /// Sets the mode without touching the content.
    ///
    /// Refused with `ModeConflict` when the content already belongs to the
    /// other description: operations exist and `mode` is not `Structured`, or
    /// raw fields are set and `mode` is `Structured`.
    pub fn set_mode(&mut self, mode: SettingMode) -> Result<(), PredicateError> {
        let conflict = match mode {
            SettingMode::Structured => self.has_raw_input(),
            SettingMode::Unset | SettingMode::RawClause => !self.operations.is_empty(),
        };
        if conflict {
            return Err(PredicateError::ModeConflict);
        }
        self.mode = mode;
        Ok(())
    }

    fn has_raw_input(&self) -> bool {
        !self.where_clause.is_empty() || !self.where_args.is_empty() || !self.order.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && !self.has_raw_input()
    }

    // ---------------------------------------------------------------
    // Raw clause input
    // ---------------------------------------------------------------

    pub fn set_where_clause(&mut self, clause: impl Into<String>) -> Result<(), PredicateError> {
        let clause = clause.into();
        self.check_raw_input("where_clause", clause.is_empty())?;
        self.where_clause = clause;
        self.mode = SettingMode::RawClause;
        Ok(())
    }

    pub fn set_where_args(&mut self, args: Vec<String>) -> Result<(), PredicateError> {
        self.check_raw_input("where_args", args.is_empty())?;
        self.where_args = args;
        self.mode = SettingMode::RawClause;
        Ok(())
    }

    pub fn set_order(&mut self, order: impl Into<String>) -> Result<(), PredicateError> {
        let order = order.into();
        self.check_raw_input("order", order.is_empty())?;
        self.order = order;
        self.mode = SettingMode::RawClause;
        Ok(())
    }

    fn check_raw_input(&self, field: &'static str, empty: bool) -> Result<(), PredicateError> {
        if self.mode == SettingMode::Structured {
            return Err(PredicateError::ModeConflict);
        }
        if empty {
            return Err(PredicateError::EmptyRawInput { field });
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Structured operations
    // ---------------------------------------------------------------

    fn push(
        &mut self,
        kind: OperationKind,
        scalars: Vec<ScalarValue>,
        lists: Vec<ListValue>,
    ) -> &mut Self {
        let item = match OperationItem::new(kind, scalars, lists) {
            Ok(item) => item,
            // every builder method passes exactly its kind's arity
            Err(err) => unreachable!("builder produced a malformed item: {err}"),
        };
        self.operations.push(item);
        if self.mode != SettingMode::Structured {
            self.where_clause.clear();
            self.where_args.clear();
            self.order.clear();
            self.mode = SettingMode::Structured;
        }
        self
    }

    fn compare(
        &mut self,
        kind: OperationKind,
        field: &str,
        value: impl Into<ScalarValue>,
    ) -> &mut Self {
        self.push(kind, vec![field.into(), value.into()], vec![])
    }

    pub fn equal_to(&mut self, field: &str, value: impl Into<ScalarValue>) -> &mut Self {
        self.compare(OperationKind::EqualTo, field, value)
    }

    pub fn not_equal_to(&mut self, field: &str, value: impl Into<ScalarValue>) -> &mut Self {
        self.compare(OperationKind::NotEqualTo, field, value)
    }

    pub fn greater_than(&mut self, field: &str, value: impl Into<ScalarValue>) -> &mut Self {
        self.compare(OperationKind::GreaterThan, field, value)
    }

    pub fn less_than(&mut self, field: &str, value: impl Into<ScalarValue>) -> &mut Self {
        self.compare(OperationKind::LessThan, field, value)
    }

    pub fn greater_than_or_equal_to(
        &mut self,
        field: &str,
        value: impl Into<ScalarValue>,
    ) -> &mut Self {
        self.compare(OperationKind::GreaterThanOrEqualTo, field, value)
    }

    pub fn less_than_or_equal_to(
        &mut self,
        field: &str,
        value: impl Into<ScalarValue>,
    ) -> &mut Self {
        self.compare(OperationKind::LessThanOrEqualTo, field, value)
    }

    pub fn and(&mut self) -> &mut Self {
        self.push(OperationKind::And, vec![], vec![])
    }

    pub fn or(&mut self) -> &mut Self {
        self.push(OperationKind::Or, vec![], vec![])
    }

    pub fn is_null(&mut self, field: &str) -> &mut Self {
        self.push(OperationKind::IsNull, vec![field.into()], vec![])
    }

    pub fn is_not_null(&mut self, field: &str) -> &mut Self {
        self.push(OperationKind::IsNotNull, vec![field.into()], vec![])
    }

    pub fn in_values(&mut self, field: &str, values: impl Into<ListValue>) -> &mut Self {
        self.push(OperationKind::In, vec![field.into()], vec![values.into()])
    }

    pub fn not_in_values(&mut self, field: &str, values: impl Into<ListValue>) -> &mut Self {
        self.push(OperationKind::NotIn, vec![field.into()], vec![values.into()])
    }

    pub fn like(&mut self, field: &str, pattern: &str) -> &mut Self {
        self.compare(OperationKind::Like, field, pattern)
    }

    pub fn unlike(&mut self, field: &str, pattern: &str) -> &mut Self {
        self.compare(OperationKind::Unlike, field, pattern)
    }

    pub fn glob(&mut self, field: &str, pattern: &str) -> &mut Self {
        self.compare(OperationKind::Glob, field, pattern)
    }

    pub fn contains(&mut self, field: &str, value: &str) -> &mut Self {
        self.compare(OperationKind::Contains, field, value)
    }

    pub fn begins_with(&mut self, field: &str, value: &str) -> &mut Self {
        self.compare(OperationKind::BeginsWith, field, value)
    }

    pub fn ends_with(&mut self, field: &str, value: &str) -> &mut Self {
        self.compare(OperationKind::EndsWith, field, value)
    }

    pub fn between(
        &mut self,
        field: &str,
        low: impl Into<ScalarValue>,
        high: impl Into<ScalarValue>,
    ) -> &mut Self {
        self.push(
            OperationKind::Between,
            vec![field.into(), low.into(), high.into()],
            vec![],
        )
    }

    pub fn not_between(
        &mut self,
        field: &str,
        low: impl Into<ScalarValue>,
        high: impl Into<ScalarValue>,
    ) -> &mut Self {
        self.push(
            OperationKind::NotBetween,
            vec![field.into(), low.into(), high.into()],
            vec![],
        )
    }

    pub fn order_by_asc(&mut self, field: &str) -> &mut Self {
        self.push(OperationKind::OrderByAsc, vec![field.into()], vec![])
    }

    pub fn order_by_desc(&mut self, field: &str) -> &mut Self {
        self.push(OperationKind::OrderByDesc, vec![field.into()], vec![])
    }

    /// Records both the row limit and the starting offset.
    pub fn limit(&mut self, number: i32, offset: i32) -> &mut Self {
        self.push(
            OperationKind::Limit,
            vec![number.into(), offset.into()],
            vec![],
        )
    }

    pub fn offset(&mut self, offset: i32) -> &mut Self {
        self.push(OperationKind::Offset, vec![offset.into()], vec![])
    }

    pub fn begin_wrap(&mut self) -> &mut Self {
        self.push(OperationKind::BeginWrap, vec![], vec![])
    }

    pub fn end_wrap(&mut self) -> &mut Self {
        self.push(OperationKind::EndWrap, vec![], vec![])
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.push(OperationKind::Distinct, vec![], vec![])
    }

    pub fn group_by(&mut self, fields: impl Into<ListValue>) -> &mut Self {
        self.push(OperationKind::GroupBy, vec![], vec![fields.into()])
    }

    pub fn indexed_by(&mut self, index_name: &str) -> &mut Self {
        self.push(OperationKind::IndexedBy, vec![index_name.into()], vec![])
    }

    pub fn key_prefix(&mut self, prefix: &str) -> &mut Self {
        self.push(OperationKind::KeyPrefix, vec![prefix.into()], vec![])
    }

    pub fn in_keys(&mut self, keys: impl Into<ListValue>) -> &mut Self {
        self.push(OperationKind::InKeys, vec![], vec![keys.into()])
    }

    pub fn cross_join(&mut self, table: &str) -> &mut Self {
        self.push(OperationKind::CrossJoin, vec![table.into()], vec![])
    }

    pub fn inner_join(&mut self, table: &str) -> &mut Self {
        self.push(OperationKind::InnerJoin, vec![table.into()], vec![])
    }

    pub fn left_outer_join(&mut self, table: &str) -> &mut Self {
        self.push(OperationKind::LeftOuterJoin, vec![table.into()], vec![])
    }

    pub fn using(&mut self, fields: impl Into<ListValue>) -> &mut Self {
        self.push(OperationKind::Using, vec![], vec![fields.into()])
    }

    pub fn on(&mut self, clauses: impl Into<ListValue>) -> &mut Self {
        self.push(OperationKind::On, vec![], vec![clauses.into()])
    }
}
