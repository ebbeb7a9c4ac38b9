//! Operation kinds and the items recorded by the predicate builder.
use std::fmt;

use crate::error::PredicateError;

use super::value::{ListValue, ScalarValue};

/// The closed set of predicate verbs.
///
/// Discriminants are a stable ABI: they are the `op` ordinals of the wire
/// format and must stay contiguous. New kinds go at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum OperationKind {
    Invalid = 0,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    LessThan,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
    And,
    Or,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    Like,
    Unlike,
    OrderByAsc,
    OrderByDesc,
    Limit,
    Offset,
    BeginWrap,
    EndWrap,
    BeginsWith,
    EndsWith,
    InKeys,
    Distinct,
    GroupBy,
    IndexedBy,
    Contains,
    Glob,
    Between,
    NotBetween,
    KeyPrefix,
    CrossJoin,
    InnerJoin,
    LeftOuterJoin,
    Using,
    On,
}

impl OperationKind {
    /// Every kind, indexed by ordinal.
    pub const ALL: [OperationKind; 37] = [
        OperationKind::Invalid,
        OperationKind::EqualTo,
        OperationKind::NotEqualTo,
        OperationKind::GreaterThan,
        OperationKind::LessThan,
        OperationKind::GreaterThanOrEqualTo,
        OperationKind::LessThanOrEqualTo,
        OperationKind::And,
        OperationKind::Or,
        OperationKind::IsNull,
        OperationKind::IsNotNull,
        OperationKind::In,
        OperationKind::NotIn,
        OperationKind::Like,
        OperationKind::Unlike,
        OperationKind::OrderByAsc,
        OperationKind::OrderByDesc,
        OperationKind::Limit,
        OperationKind::Offset,
        OperationKind::BeginWrap,
        OperationKind::EndWrap,
        OperationKind::BeginsWith,
        OperationKind::EndsWith,
        OperationKind::InKeys,
        OperationKind::Distinct,
        OperationKind::GroupBy,
        OperationKind::IndexedBy,
        OperationKind::Contains,
        OperationKind::Glob,
        OperationKind::Between,
        OperationKind::NotBetween,
        OperationKind::KeyPrefix,
        OperationKind::CrossJoin,
        OperationKind::InnerJoin,
        OperationKind::LeftOuterJoin,
        OperationKind::Using,
        OperationKind::On,
    ];

    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Number of (scalar, list) operands an item of this kind carries.
    pub fn arity(self) -> (usize, usize) {
        use OperationKind::*;
        match self {
            Invalid | And | Or | BeginWrap | EndWrap | Distinct => (0, 0),
            IsNull | IsNotNull | OrderByAsc | OrderByDesc | Offset | IndexedBy | KeyPrefix
            | CrossJoin | InnerJoin | LeftOuterJoin => (1, 0),
            EqualTo | NotEqualTo | GreaterThan | LessThan | GreaterThanOrEqualTo
            | LessThanOrEqualTo | Like | Unlike | BeginsWith | EndsWith | Contains | Glob
            | Limit => (2, 0),
            Between | NotBetween => (3, 0),
            In | NotIn => (1, 1),
            InKeys | GroupBy | Using | On => (0, 1),
        }
    }

    pub fn name(self) -> &'static str {
        use OperationKind::*;
        match self {
            Invalid => "INVALID",
            EqualTo => "EQUAL_TO",
            NotEqualTo => "NOT_EQUAL_TO",
            GreaterThan => "GREATER_THAN",
            LessThan => "LESS_THAN",
            GreaterThanOrEqualTo => "GREATER_THAN_OR_EQUAL_TO",
            LessThanOrEqualTo => "LESS_THAN_OR_EQUAL_TO",
            And => "AND",
            Or => "OR",
            IsNull => "IS_NULL",
            IsNotNull => "IS_NOT_NULL",
            In => "IN",
            NotIn => "NOT_IN",
            Like => "LIKE",
            Unlike => "UNLIKE",
            OrderByAsc => "ORDER_BY_ASC",
            OrderByDesc => "ORDER_BY_DESC",
            Limit => "LIMIT",
            Offset => "OFFSET",
            BeginWrap => "BEGIN_WRAP",
            EndWrap => "END_WRAP",
            BeginsWith => "BEGINS_WITH",
            EndsWith => "ENDS_WITH",
            InKeys => "IN_KEYS",
            Distinct => "DISTINCT",
            GroupBy => "GROUP_BY",
            IndexedBy => "INDEXED_BY",
            Contains => "CONTAINS",
            Glob => "GLOB",
            Between => "BETWEEN",
            NotBetween => "NOT_BETWEEN",
            KeyPrefix => "KEY_PREFIX",
            CrossJoin => "CROSS_JOIN",
            InnerJoin => "INNER_JOIN",
            LeftOuterJoin => "LEFT_OUTER_JOIN",
            Using => "USING",
            On => "ON",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for OperationKind {
    type Error = PredicateError;

    fn try_from(ordinal: i32) -> Result<Self, Self::Error> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(PredicateError::UnknownOperation(ordinal))
    }
}

/// One recorded builder call: a kind plus its operands.
///
/// Items can only be created with operand counts matching
/// [`OperationKind::arity`], so handlers may index operands directly.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationItem {
    kind: OperationKind,
    scalars: Vec<ScalarValue>,
    lists: Vec<ListValue>,
}

impl OperationItem {
    pub fn new(
        kind: OperationKind,
        scalars: Vec<ScalarValue>,
        lists: Vec<ListValue>,
    ) -> Result<Self, PredicateError> {
        let (expected_scalars, expected_lists) = kind.arity();
        if scalars.len() != expected_scalars || lists.len() != expected_lists {
            return Err(PredicateError::ArityMismatch {
                kind,
                expected_scalars,
                expected_lists,
                scalars: scalars.len(),
                lists: lists.len(),
            });
        }
        Ok(Self {
            kind,
            scalars,
            lists,
        })
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Scalar operand `idx`.
    ///
    /// # Panics
    ///
    /// If `idx` is outside the kind's arity.
    pub fn scalar(&self, idx: usize) -> &ScalarValue {
        self.scalars.get(idx).unwrap_or_else(|| {
            panic!(
                "{} has {} scalar operands, index {idx} requested",
                self.kind,
                self.scalars.len()
            )
        })
    }

    /// List operand `idx`.
    ///
    /// # Panics
    ///
    /// If `idx` is outside the kind's arity.
    pub fn list(&self, idx: usize) -> &ListValue {
        self.lists.get(idx).unwrap_or_else(|| {
            panic!(
                "{} has {} list operands, index {idx} requested",
                self.kind,
                self.lists.len()
            )
        })
    }

    /// The first scalar read as a column name, or `""` for kinds without one.
    pub fn field(&self) -> &str {
        self.scalars.first().map(ScalarValue::as_str).unwrap_or("")
    }

    pub fn scalars(&self) -> &[ScalarValue] {
        &self.scalars
    }

    pub fn lists(&self) -> &[ListValue] {
        &self.lists
    }
}
