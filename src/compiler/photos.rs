//! Photo-library backend.
//!
//! Produces a [`PhotoQuery`]: a predicate string in the photo library's
//! expression language plus the album selectors it models as separate
//! parameters. Only a handful of operations are expressible there, and the
//! first one that is not aborts the whole compile; a partial predicate would
//! silently widen the result.
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CompileError;
use crate::fields::{
    self, columns, FieldMap, ALBUM_SORT_FIELDS, PHOTO_DURATION_FIELD, PHOTO_FILTER_FIELDS,
    PHOTO_SORT_FIELDS,
};
use crate::predicates::{OperationItem, OperationKind, PredicateSet, SettingMode};

use super::PredicateCompiler;

/// Query descriptor handed to the photo-library dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoQuery {
    pub where_clause: String,
    /// Native sort field → ascending. The first request for a field wins.
    pub order: BTreeMap<String, bool>,
    pub limit: i32,
    pub offset: i32,
    pub album_type: i32,
    pub album_subtype: i64,
    pub local_identifier: String,
}

impl Default for PhotoQuery {
    fn default() -> Self {
        Self {
            where_clause: String::new(),
            order: BTreeMap::new(),
            limit: i32::MAX,
            offset: 0,
            album_type: 0,
            album_subtype: i64::MAX,
            local_identifier: String::new(),
        }
    }
}

/// Partial compiler into [`PhotoQuery`].
///
/// Supports `EQUAL_TO`, `AND`, `IN`, `ORDER_BY_ASC`, `ORDER_BY_DESC`,
/// `LIMIT` and `OFFSET`.
pub struct PhotoLibraryCompiler {
    album: bool,
}

impl PhotoLibraryCompiler {
    /// `album` selects the album context: only the album selectors may be
    /// filtered on and sorting uses the album sort map.
    pub fn new(album: bool) -> Self {
        Self { album }
    }

    pub fn try_compile(&self, set: &PredicateSet) -> Result<PhotoQuery, CompileError> {
        if set.mode() == SettingMode::RawClause {
            warn!("Photo library cannot run a raw where clause");
            return Err(CompileError::RawClauseMode);
        }

        let mut translator = Translator::new(self.album);
        for item in set.operations() {
            if let Err(err) = translator.apply(item) {
                warn!("Photo library compile aborted at {}: {}", item.kind(), err);
                return Err(err);
            }
        }
        Ok(translator.query)
    }
}

impl PredicateCompiler for PhotoLibraryCompiler {
    type Output = Option<PhotoQuery>;

    fn name(&self) -> &str {
        "photos"
    }

    fn compile(&self, set: &PredicateSet) -> Option<PhotoQuery> {
        self.try_compile(set).ok()
    }
}

/// Field names are matched after ASCII lower-casing only.
fn fold_field(field: &str) -> String {
    field.to_ascii_lowercase()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Milliseconds to seconds, rendered with six decimals.
fn convert_duration(millis: &str) -> Result<String, CompileError> {
    let value: f64 = millis
        .trim()
        .parse()
        .map_err(|_| CompileError::InvalidDuration(millis.to_string()))?;
    Ok(format!("{:.6}", value / 1000.0))
}

struct Translator {
    query: PhotoQuery,
    album: bool,
    need_and: bool,
}

impl Translator {
    fn new(album: bool) -> Self {
        Self {
            query: PhotoQuery::default(),
            album,
            need_and: false,
        }
    }

    fn apply(&mut self, item: &OperationItem) -> Result<(), CompileError> {
        use OperationKind::*;
        debug!("photos: {}", item.kind());

        match item.kind() {
            EqualTo => self.equal_to(item.field(), &item.scalar(1).to_text()),
            And => Ok(()),
            In => self.in_values(item.field(), item.list(0).to_texts()),
            OrderByAsc => self.order_by(item.field(), true),
            OrderByDesc => self.order_by(item.field(), false),
            Limit => {
                self.limit(item.scalar(0).as_i32());
                self.offset(item.scalar(1).as_i32());
                Ok(())
            }
            Offset => {
                self.offset(item.scalar(0).as_i32());
                Ok(())
            }
            kind @ (Invalid | NotEqualTo | GreaterThan | LessThan | GreaterThanOrEqualTo
            | LessThanOrEqualTo | Or | IsNull | IsNotNull | NotIn | Like | Unlike
            | BeginWrap | EndWrap | BeginsWith | EndsWith | InKeys | Distinct | GroupBy
            | IndexedBy | Contains | Glob | Between | NotBetween | KeyPrefix | CrossJoin
            | InnerJoin | LeftOuterJoin | Using | On) => Err(CompileError::Unsupported(kind)),
        }
    }

    fn filter_field(&self, field: &str, lower: &str) -> Result<&'static str, CompileError> {
        if self.album {
            return Err(CompileError::UnmappedField(field.to_string()));
        }
        PHOTO_FILTER_FIELDS
            .native(lower)
            .ok_or_else(|| CompileError::UnmappedField(field.to_string()))
    }

    fn sort_map(&self) -> &'static FieldMap {
        if self.album {
            &ALBUM_SORT_FIELDS
        } else {
            &PHOTO_SORT_FIELDS
        }
    }

    fn push_and(&mut self) {
        if self.need_and {
            self.query.where_clause.push_str(" AND ");
        } else {
            self.need_and = true;
        }
    }

    fn equal_to(&mut self, field: &str, value: &str) -> Result<(), CompileError> {
        if field.is_empty() {
            warn!("equal_to: field is empty");
            return Ok(());
        }
        if is_blank(value) {
            return Err(CompileError::EmptyValue(field.to_string()));
        }

        let lower = fold_field(field);
        match lower.as_str() {
            columns::ALBUM_TYPE => {
                self.query.album_type = fields::album_type_code(value);
                return Ok(());
            }
            columns::ALBUM_SUBTYPE => {
                self.query.album_subtype = i64::from(fields::album_subtype_code(value));
                return Ok(());
            }
            columns::LOCAL_IDENTIFIER => {
                self.query.local_identifier = value.to_string();
                return Ok(());
            }
            _ => {}
        }

        let native = self.filter_field(field, &lower)?;
        let value = if native == PHOTO_DURATION_FIELD {
            convert_duration(value)?
        } else {
            value.to_string()
        };
        self.push_and();
        self.query
            .where_clause
            .push_str(&format!("{native} == {value}"));
        Ok(())
    }

    fn in_values(&mut self, field: &str, values: Vec<String>) -> Result<(), CompileError> {
        if field.is_empty() {
            warn!("in: field is empty");
            return Ok(());
        }
        let values: Vec<String> = values.into_iter().filter(|v| !is_blank(v)).collect();
        if values.is_empty() {
            return Err(CompileError::EmptyValueList(field.to_string()));
        }

        let lower = fold_field(field);
        let native = self.filter_field(field, &lower)?;
        let values = if native == PHOTO_DURATION_FIELD {
            values
                .iter()
                .map(|v| convert_duration(v))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            values
        };
        self.push_and();
        self.query
            .where_clause
            .push_str(&format!("{native} IN {{{}}}", values.join(" , ")));
        Ok(())
    }

    fn order_by(&mut self, field: &str, ascending: bool) -> Result<(), CompileError> {
        if field.is_empty() {
            warn!("order_by: field is empty");
            return Ok(());
        }
        let lower = fold_field(field);
        let native = self
            .sort_map()
            .native(&lower)
            .ok_or_else(|| CompileError::UnmappedField(field.to_string()))?;
        self.query
            .order
            .entry(native.to_string())
            .or_insert(ascending);
        Ok(())
    }

    fn limit(&mut self, limit: i32) {
        self.query.limit = if limit <= 0 { i32::MAX } else { limit };
    }

    fn offset(&mut self, offset: i32) {
        self.query.offset = offset.max(0);
    }
}
