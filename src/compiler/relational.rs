//! Relational backend.
//!
//! Compiles a predicate set into [`RelationalPredicates`], a structured
//! predicate object that keeps every value as a bind parameter. Every
//! operation kind has a handler, so this compile cannot fail.
use serde::Serialize;
use tracing::{debug, warn};

use crate::predicates::{OperationItem, OperationKind, PredicateSet, ScalarValue, SettingMode};

use super::PredicateCompiler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Cross,
    Inner,
    LeftOuter,
}

impl JoinType {
    fn keyword(self) -> &'static str {
        match self {
            JoinType::Cross => "CROSS JOIN",
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinCondition {
    Using(Vec<String>),
    On(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub condition: Option<JoinCondition>,
}

/// Structured relational predicate object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationalPredicates {
    pub table: String,
    pub where_clause: String,
    pub bind_args: Vec<ScalarValue>,
    pub order: String,
    pub group: Vec<String>,
    pub index: Option<String>,
    pub distinct: bool,
    pub limit: Option<i32>,
    pub offset: i32,
    pub joins: Vec<JoinClause>,
    pub key_prefix: Option<String>,
    pub in_keys: Vec<String>,
    #[serde(skip)]
    need_connective: bool,
    #[serde(skip)]
    wrap_depth: usize,
}

impl RelationalPredicates {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    // ---------------------------------------------------------------
    // WHERE clause
    // ---------------------------------------------------------------

    fn condition(&mut self, fragment: &str, args: impl IntoIterator<Item = ScalarValue>) {
        if self.need_connective {
            self.where_clause.push_str(" AND ");
        }
        self.where_clause.push_str(fragment);
        self.bind_args.extend(args);
        self.need_connective = true;
    }

    fn compare(&mut self, field: &str, op: &str, value: ScalarValue) {
        self.condition(&format!("{field} {op} ?"), [value]);
    }

    pub fn equal_to(&mut self, field: &str, value: ScalarValue) {
        self.compare(field, "=", value);
    }

    pub fn not_equal_to(&mut self, field: &str, value: ScalarValue) {
        self.compare(field, "<>", value);
    }

    pub fn greater_than(&mut self, field: &str, value: ScalarValue) {
        self.compare(field, ">", value);
    }

    pub fn less_than(&mut self, field: &str, value: ScalarValue) {
        self.compare(field, "<", value);
    }

    pub fn greater_than_or_equal_to(&mut self, field: &str, value: ScalarValue) {
        self.compare(field, ">=", value);
    }

    pub fn less_than_or_equal_to(&mut self, field: &str, value: ScalarValue) {
        self.compare(field, "<=", value);
    }

    pub fn is_null(&mut self, field: &str) {
        self.condition(&format!("{field} IS NULL"), []);
    }

    pub fn is_not_null(&mut self, field: &str) {
        self.condition(&format!("{field} IS NOT NULL"), []);
    }

    pub fn like(&mut self, field: &str, pattern: ScalarValue) {
        self.compare(field, "LIKE", pattern);
    }

    pub fn not_like(&mut self, field: &str, pattern: ScalarValue) {
        self.compare(field, "NOT LIKE", pattern);
    }

    pub fn glob(&mut self, field: &str, pattern: ScalarValue) {
        self.compare(field, "GLOB", pattern);
    }

    pub fn contains(&mut self, field: &str, value: &str) {
        self.like(field, format!("%{value}%").into());
    }

    pub fn begins_with(&mut self, field: &str, value: &str) {
        self.like(field, format!("{value}%").into());
    }

    pub fn ends_with(&mut self, field: &str, value: &str) {
        self.like(field, format!("%{value}").into());
    }

    pub fn between(&mut self, field: &str, low: ScalarValue, high: ScalarValue) {
        self.condition(&format!("{field} BETWEEN ? AND ?"), [low, high]);
    }

    pub fn not_between(&mut self, field: &str, low: ScalarValue, high: ScalarValue) {
        self.condition(&format!("{field} NOT BETWEEN ? AND ?"), [low, high]);
    }

    pub fn in_values(&mut self, field: &str, values: Vec<ScalarValue>) {
        self.membership(field, "IN", values);
    }

    pub fn not_in_values(&mut self, field: &str, values: Vec<ScalarValue>) {
        self.membership(field, "NOT IN", values);
    }

    fn membership(&mut self, field: &str, op: &str, values: Vec<ScalarValue>) {
        if values.is_empty() {
            warn!("{} on `{}` has no values, skipped", op, field);
            return;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        self.condition(&format!("{field} {op} ({placeholders})"), values);
    }

    pub fn and(&mut self) {
        self.connective(" AND ");
    }

    pub fn or(&mut self) {
        self.connective(" OR ");
    }

    fn connective(&mut self, text: &str) {
        if !self.need_connective {
            warn!("`{}` has no preceding condition, ignored", text.trim());
            return;
        }
        self.where_clause.push_str(text);
        self.need_connective = false;
    }

    pub fn begin_wrap(&mut self) {
        if self.need_connective {
            self.where_clause.push_str(" AND ");
        }
        self.where_clause.push('(');
        self.wrap_depth += 1;
        self.need_connective = false;
    }

    pub fn end_wrap(&mut self) {
        if self.wrap_depth == 0 {
            warn!("END_WRAP without a matching BEGIN_WRAP, ignored");
            return;
        }
        self.wrap_depth -= 1;
        if self.where_clause.ends_with('(') {
            debug!("Dropping empty parenthesised group");
            self.where_clause.pop();
            self.trim_dangling_connective();
            self.need_connective =
                !self.where_clause.is_empty() && !self.where_clause.ends_with('(');
            return;
        }
        self.trim_dangling_connective();
        self.where_clause.push(')');
        self.need_connective = true;
    }

    fn trim_dangling_connective(&mut self) {
        for connective in [" AND ", " OR "] {
            if self.where_clause.ends_with(connective) {
                let len = self.where_clause.len() - connective.len();
                self.where_clause.truncate(len);
                return;
            }
        }
    }

    /// Closes open groups and drops a trailing connective.
    pub fn finish(&mut self) {
        if self.wrap_depth > 0 {
            warn!("Closing {} unterminated group(s)", self.wrap_depth);
            while self.wrap_depth > 0 {
                self.end_wrap();
            }
        }
        self.trim_dangling_connective();
    }

    // ---------------------------------------------------------------
    // Ordering, grouping, paging
    // ---------------------------------------------------------------

    pub fn order_by(&mut self, field: &str, ascending: bool) {
        if !self.order.is_empty() {
            self.order.push_str(", ");
        }
        self.order.push_str(field);
        self.order.push_str(if ascending { " ASC" } else { " DESC" });
    }

    pub fn group_by(&mut self, fields: Vec<String>) {
        self.group.extend(fields);
    }

    pub fn indexed_by(&mut self, index: &str) {
        self.index = Some(index.to_string());
    }

    pub fn set_distinct(&mut self) {
        self.distinct = true;
    }

    pub fn set_limit(&mut self, limit: i32) {
        self.limit = (limit > 0).then_some(limit);
    }

    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset.max(0);
    }

    // ---------------------------------------------------------------
    // Joins and key-value selectors
    // ---------------------------------------------------------------

    pub fn join(&mut self, join_type: JoinType, table: &str) {
        self.joins.push(JoinClause {
            join_type,
            table: table.to_string(),
            condition: None,
        });
    }

    /// Attaches a condition to the most recent join.
    pub fn join_condition(&mut self, condition: JoinCondition) {
        match self.joins.last_mut() {
            Some(join) if join.condition.is_none() => join.condition = Some(condition),
            Some(join) => warn!("Join on `{}` already has a condition, ignored", join.table),
            None => warn!("Join condition without a preceding join, ignored"),
        }
    }

    pub fn set_key_prefix(&mut self, prefix: &str) {
        self.key_prefix = Some(prefix.to_string());
    }

    pub fn set_in_keys(&mut self, keys: Vec<String>) {
        self.in_keys = keys;
    }

    // ---------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------

    /// Bind arguments rendered as text, in placeholder order.
    pub fn bind_args_text(&self) -> Vec<String> {
        self.bind_args.iter().map(ScalarValue::to_text).collect()
    }

    /// Render a SQLite `SELECT` for inspection. Values stay as `?`.
    pub fn to_sql(&self, columns: &[String]) -> String {
        let mut parts = Vec::new();

        let mut select = String::from("SELECT ");
        if self.distinct {
            select.push_str("DISTINCT ");
        }
        if columns.is_empty() {
            select.push('*');
        } else {
            select.push_str(&columns.join(", "));
        }
        parts.push(select);

        parts.push(format!("FROM {}", self.table));
        if let Some(ref index) = self.index {
            parts.push(format!("INDEXED BY {index}"));
        }

        for join in &self.joins {
            let mut clause = format!("{} {}", join.join_type.keyword(), join.table);
            match &join.condition {
                Some(JoinCondition::Using(fields)) => {
                    clause.push_str(&format!(" USING ({})", fields.join(", ")));
                }
                Some(JoinCondition::On(clauses)) => {
                    clause.push_str(&format!(" ON {}", clauses.join(" AND ")));
                }
                None => {}
            }
            parts.push(clause);
        }

        if !self.where_clause.is_empty() {
            parts.push(format!("WHERE {}", self.where_clause));
        }
        if !self.group.is_empty() {
            parts.push(format!("GROUP BY {}", self.group.join(", ")));
        }
        if !self.order.is_empty() {
            parts.push(format!("ORDER BY {}", self.order));
        }

        match (self.limit, self.offset) {
            (Some(limit), 0) => parts.push(format!("LIMIT {limit}")),
            (Some(limit), offset) => parts.push(format!("LIMIT {limit} OFFSET {offset}")),
            (None, 0) => {}
            (None, offset) => parts.push(format!("LIMIT -1 OFFSET {offset}")),
        }

        parts.join(" ")
    }
}

/// Total compiler into [`RelationalPredicates`].
pub struct RelationalCompiler {
    table: String,
}

impl RelationalCompiler {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }
}

impl PredicateCompiler for RelationalCompiler {
    type Output = RelationalPredicates;

    fn name(&self) -> &str {
        "relational"
    }

    fn compile(&self, set: &PredicateSet) -> RelationalPredicates {
        let mut out = RelationalPredicates::new(&self.table);

        if set.mode() == SettingMode::RawClause {
            out.where_clause = set.where_clause().to_string();
            out.bind_args = set
                .where_args()
                .iter()
                .cloned()
                .map(ScalarValue::from)
                .collect();
            out.order = set.order().to_string();
            out.need_connective = !out.where_clause.is_empty();
        }

        for item in set.operations() {
            apply(&mut out, item);
        }
        if set.mode() != SettingMode::RawClause {
            out.finish();
        }
        out
    }
}

/// Kinds whose first scalar names a column that must not be empty.
fn needs_field(kind: OperationKind) -> bool {
    use OperationKind::*;
    matches!(
        kind,
        EqualTo
            | NotEqualTo
            | GreaterThan
            | LessThan
            | GreaterThanOrEqualTo
            | LessThanOrEqualTo
            | IsNull
            | IsNotNull
            | In
            | NotIn
            | Like
            | Unlike
            | Glob
            | Contains
            | BeginsWith
            | EndsWith
            | Between
            | NotBetween
            | OrderByAsc
            | OrderByDesc
            | IndexedBy
            | CrossJoin
            | InnerJoin
            | LeftOuterJoin
    )
}

fn apply(out: &mut RelationalPredicates, item: &OperationItem) {
    use OperationKind::*;

    let kind = item.kind();
    let field = item.field();
    if needs_field(kind) && field.is_empty() {
        warn!("{} with an empty field name, skipped", kind);
        return;
    }
    debug!("relational: {}", kind);

    match kind {
        Invalid => warn!("INVALID operation ignored"),
        EqualTo => out.equal_to(field, item.scalar(1).clone()),
        NotEqualTo => out.not_equal_to(field, item.scalar(1).clone()),
        GreaterThan => out.greater_than(field, item.scalar(1).clone()),
        LessThan => out.less_than(field, item.scalar(1).clone()),
        GreaterThanOrEqualTo => out.greater_than_or_equal_to(field, item.scalar(1).clone()),
        LessThanOrEqualTo => out.less_than_or_equal_to(field, item.scalar(1).clone()),
        And => out.and(),
        Or => out.or(),
        IsNull => out.is_null(field),
        IsNotNull => out.is_not_null(field),
        In => out.in_values(field, item.list(0).to_scalars()),
        NotIn => out.not_in_values(field, item.list(0).to_scalars()),
        Like => out.like(field, item.scalar(1).clone()),
        Unlike => out.not_like(field, item.scalar(1).clone()),
        Glob => out.glob(field, item.scalar(1).clone()),
        Contains => out.contains(field, &item.scalar(1).to_text()),
        BeginsWith => out.begins_with(field, &item.scalar(1).to_text()),
        EndsWith => out.ends_with(field, &item.scalar(1).to_text()),
        Between => out.between(field, item.scalar(1).clone(), item.scalar(2).clone()),
        NotBetween => out.not_between(field, item.scalar(1).clone(), item.scalar(2).clone()),
        OrderByAsc => out.order_by(field, true),
        OrderByDesc => out.order_by(field, false),
        Limit => {
            out.set_limit(item.scalar(0).as_i32());
            out.set_offset(item.scalar(1).as_i32());
        }
        Offset => out.set_offset(item.scalar(0).as_i32()),
        BeginWrap => out.begin_wrap(),
        EndWrap => out.end_wrap(),
        Distinct => out.set_distinct(),
        GroupBy => out.group_by(item.list(0).to_texts()),
        IndexedBy => out.indexed_by(field),
        KeyPrefix => out.set_key_prefix(field),
        InKeys => out.set_in_keys(item.list(0).to_texts()),
        CrossJoin => out.join(JoinType::Cross, field),
        InnerJoin => out.join(JoinType::Inner, field),
        LeftOuterJoin => out.join(JoinType::LeftOuter, field),
        Using => out.join_condition(JoinCondition::Using(item.list(0).to_texts())),
        On => out.join_condition(JoinCondition::On(item.list(0).to_texts())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::dialect::SQLiteDialect;
    use sqlparser::parser::Parser;

    fn compile(set: &PredicateSet) -> RelationalPredicates {
        RelationalCompiler::new("Photos").compile(set)
    }

    fn assert_parses(sql: &str) {
        Parser::parse_sql(&SQLiteDialect {}, sql)
            .unwrap_or_else(|e| panic!("{sql}: {e}"));
    }

    #[test]
    fn test_in_and_order_keep_logical_names() {
        let mut set = PredicateSet::new();
        set.in_values("media_type", ["1", "3"])
            .order_by_desc("date_added");
        let out = compile(&set);
        assert_eq!(out.where_clause, "media_type IN (?, ?)");
        assert_eq!(
            out.bind_args,
            vec![ScalarValue::from("1"), ScalarValue::from("3")]
        );
        assert_eq!(out.order, "date_added DESC");
    }

    #[test]
    fn test_implicit_and_between_conditions() {
        let mut set = PredicateSet::new();
        set.equal_to("a", 1).greater_than("b", 2.5).is_not_null("c");
        let out = compile(&set);
        assert_eq!(out.where_clause, "a = ? AND b > ? AND c IS NOT NULL");
        assert_eq!(out.bind_args.len(), 2);
    }

    #[test]
    fn test_or_and_wrap() {
        let mut set = PredicateSet::new();
        set.equal_to("size", 0)
            .begin_wrap()
            .like("title", "a%")
            .or()
            .unlike("title", "b%")
            .end_wrap();
        let out = compile(&set);
        assert_eq!(
            out.where_clause,
            "size = ? AND (title LIKE ? OR title NOT LIKE ?)"
        );
    }

    #[test]
    fn test_explicit_and_is_not_doubled() {
        let mut set = PredicateSet::new();
        set.equal_to("a", 1).and().equal_to("b", 2);
        assert_eq!(compile(&set).where_clause, "a = ? AND b = ?");
    }

    #[test]
    fn test_leading_or_and_stray_end_wrap_ignored() {
        let mut set = PredicateSet::new();
        set.or().end_wrap().equal_to("a", 1).or();
        let out = compile(&set);
        assert_eq!(out.where_clause, "a = ?");
    }

    #[test]
    fn test_empty_and_unterminated_groups() {
        let mut set = PredicateSet::new();
        set.equal_to("a", 1).begin_wrap().end_wrap().begin_wrap().equal_to("b", 2);
        let out = compile(&set);
        assert_eq!(out.where_clause, "a = ? AND (b = ?)");
    }

    #[test]
    fn test_string_matchers_wrap_value() {
        let mut set = PredicateSet::new();
        set.contains("title", "cat")
            .begins_with("title", "dog")
            .ends_with("title", ".jpg");
        let out = compile(&set);
        assert_eq!(
            out.bind_args,
            vec![
                ScalarValue::from("%cat%"),
                ScalarValue::from("dog%"),
                ScalarValue::from("%.jpg"),
            ]
        );
        assert_eq!(out.where_clause.matches("LIKE ?").count(), 3);
    }

    #[test]
    fn test_between_binds_both_bounds() {
        let mut set = PredicateSet::new();
        set.between("size", 10, 20).not_between("duration", 0_i64, 5_i64);
        let out = compile(&set);
        assert_eq!(
            out.where_clause,
            "size BETWEEN ? AND ? AND duration NOT BETWEEN ? AND ?"
        );
        assert_eq!(out.bind_args.len(), 4);
    }

    #[test]
    fn test_limit_and_offset_normalised() {
        let mut set = PredicateSet::new();
        set.limit(0, -4);
        let out = compile(&set);
        assert_eq!(out.limit, None);
        assert_eq!(out.offset, 0);

        let mut set = PredicateSet::new();
        set.limit(10, 5).offset(7);
        let out = compile(&set);
        assert_eq!(out.limit, Some(10));
        assert_eq!(out.offset, 7);
    }

    #[test]
    fn test_joins_and_conditions() {
        let mut set = PredicateSet::new();
        set.inner_join("Albums")
            .on(["Photos.album_id = Albums.album_id"])
            .left_outer_join("Tags")
            .using(["file_id"])
            .using(["ignored"])
            .cross_join("Extra");
        let out = compile(&set);
        assert_eq!(out.joins.len(), 3);
        assert_eq!(
            out.joins[0].condition,
            Some(JoinCondition::On(vec![
                "Photos.album_id = Albums.album_id".to_string()
            ]))
        );
        assert_eq!(
            out.joins[1].condition,
            Some(JoinCondition::Using(vec!["file_id".to_string()]))
        );
        assert_eq!(out.joins[2].condition, None);
    }

    #[test]
    fn test_key_value_selectors_stored() {
        let mut set = PredicateSet::new();
        set.key_prefix("user_").in_keys(["k1", "k2"]);
        let out = compile(&set);
        assert_eq!(out.key_prefix.as_deref(), Some("user_"));
        assert_eq!(out.in_keys, vec!["k1".to_string(), "k2".to_string()]);
        assert!(out.where_clause.is_empty());
    }

    #[test]
    fn test_raw_clause_seeds_output() {
        let mut set = PredicateSet::new();
        set.set_where_clause("size > ?").unwrap();
        set.set_where_args(vec!["100".into()]).unwrap();
        set.set_order("size DESC").unwrap();
        let out = compile(&set);
        assert_eq!(out.where_clause, "size > ?");
        assert_eq!(out.bind_args, vec![ScalarValue::from("100")]);
        assert_eq!(out.order, "size DESC");
    }

    #[test]
    fn test_raw_clause_kept_verbatim() {
        let mut set = PredicateSet::new();
        set.set_where_clause("a = ? OR ").unwrap();
        assert_eq!(compile(&set).where_clause, "a = ? OR ");
    }

    #[test]
    fn test_every_kind_compiles() {
        for kind in OperationKind::ALL {
            let (scalars, lists) = kind.arity();
            let item = OperationItem::new(
                kind,
                (0..scalars).map(|i| ScalarValue::from(format!("v{i}"))).collect(),
                (0..lists)
                    .map(|_| crate::predicates::ListValue::from(["x"]))
                    .collect(),
            )
            .unwrap();
            let out = compile(&PredicateSet::from_operations(vec![item]));
            assert_eq!(out.table, "Photos", "{kind}");
        }
    }

    #[test]
    fn test_invalid_is_a_no_op() {
        let item = OperationItem::new(OperationKind::Invalid, vec![], vec![]).unwrap();
        let out = compile(&PredicateSet::from_operations(vec![item]));
        assert_eq!(out, RelationalPredicates::new("Photos"));
    }

    #[test]
    fn test_empty_field_skipped() {
        let mut set = PredicateSet::new();
        set.equal_to("", 1).is_null("title");
        assert_eq!(compile(&set).where_clause, "title IS NULL");
    }

    #[test]
    fn test_to_sql_parses() {
        let mut set = PredicateSet::new();
        set.distinct()
            .inner_join("Albums")
            .on(["Photos.album_id = Albums.album_id"])
            .equal_to("media_type", 1)
            .begin_wrap()
            .greater_than("size", 0)
            .or()
            .is_null("title")
            .end_wrap()
            .group_by(["album_id"])
            .order_by_asc("date_added")
            .order_by_desc("size")
            .limit(50, 10);
        let out = compile(&set);
        let sql = out.to_sql(&["file_id".to_string(), "title".to_string()]);
        assert_eq!(
            sql,
            "SELECT DISTINCT file_id, title FROM Photos \
             INNER JOIN Albums ON Photos.album_id = Albums.album_id \
             WHERE media_type = ? AND (size > ? OR title IS NULL) \
             GROUP BY album_id ORDER BY date_added ASC, size DESC LIMIT 50 OFFSET 10"
        );
        assert_parses(&sql);
    }

    #[test]
    fn test_to_sql_offset_only() {
        let mut set = PredicateSet::new();
        set.offset(30);
        let sql = compile(&set).to_sql(&[]);
        assert_eq!(sql, "SELECT * FROM Photos LIMIT -1 OFFSET 30");
    }
}
