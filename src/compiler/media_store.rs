//! Media-store backend.
//!
//! The media store is queried with relational selections, but its column
//! names differ from the logical vocabulary. This backend compiles through
//! [`RelationalCompiler`] and then rewrites column identifiers in the
//! projection, the selection text, the sort order and the selection args.
use serde::Serialize;
use tracing::debug;

use crate::fields::{columns, FieldMap, MEDIA_STORE_QUERY_FIELDS};
use crate::predicates::{OperationItem, PredicateSet, ScalarValue, SettingMode};

use super::relational::RelationalCompiler;
use super::PredicateCompiler;

/// Media-type marker meaning "image or video" in the logical vocabulary.
const IMAGE_OR_VIDEO: f64 = 2.0;
/// The media store's video media type.
const MEDIA_STORE_VIDEO: i32 = 3;
/// Media types queried when the caller does not filter on media type.
const DEFAULT_MEDIA_TYPES: [&str; 2] = ["1", "3"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaStoreQuery {
    pub projection: Vec<String>,
    pub selection: String,
    pub selection_args: Vec<String>,
    pub sort_order: String,
    pub limit: Option<i32>,
    pub offset: i32,
}

pub struct MediaStoreCompiler {
    album: bool,
    columns: Vec<String>,
}

impl MediaStoreCompiler {
    pub fn new(album: bool, columns: Vec<String>) -> Self {
        Self { album, columns }
    }

    fn projection(&self) -> Vec<String> {
        let mut columns = self.columns.clone();
        if self.album {
            columns.push(columns::MEDIA_TYPE_SUM.to_string());
            columns.push(columns::FILE_ID.to_string());
        }
        columns
            .iter()
            .map(|c| MEDIA_STORE_QUERY_FIELDS.to_native(c).to_string())
            .collect()
    }
}

impl PredicateCompiler for MediaStoreCompiler {
    type Output = MediaStoreQuery;

    fn name(&self) -> &str {
        "media-store"
    }

    fn compile(&self, set: &PredicateSet) -> MediaStoreQuery {
        let adapted;
        let set = if set.mode() == SettingMode::RawClause {
            set
        } else {
            adapted = adapt_media_type(set);
            &adapted
        };

        let relational = RelationalCompiler::new("").compile(set);
        let map = &MEDIA_STORE_QUERY_FIELDS;

        MediaStoreQuery {
            projection: self.projection(),
            selection: remap_identifiers(&relational.where_clause, map),
            selection_args: relational
                .bind_args_text()
                .iter()
                .map(|arg| map.to_native(arg).to_string())
                .collect(),
            sort_order: remap_identifiers(&relational.order, map),
            limit: relational.limit,
            offset: relational.offset,
        }
    }
}

/// Rewrites the image-or-video marker and adds the default media-type filter.
///
/// An operation on `media_type` whose value reads as `2` is changed to the
/// media store's video type. When no operation names `media_type`, the query
/// is restricted to images and videos.
pub fn adapt_media_type(set: &PredicateSet) -> PredicateSet {
    let mut mentions_media_type = false;
    let mut operations = Vec::with_capacity(set.operations().len() + 1);

    for item in set.operations() {
        if item.field() != columns::MEDIA_TYPE {
            operations.push(item.clone());
            continue;
        }
        mentions_media_type = true;

        let is_marker = item.scalars().len() >= 2
            && item
                .scalar(1)
                .numeric()
                .is_some_and(|v| (v - IMAGE_OR_VIDEO).abs() < 1e-6);
        if !is_marker {
            operations.push(item.clone());
            continue;
        }

        let mut scalars = item.scalars().to_vec();
        scalars[1] = ScalarValue::from(MEDIA_STORE_VIDEO);
        match OperationItem::new(item.kind(), scalars, item.lists().to_vec()) {
            Ok(rewritten) => operations.push(rewritten),
            Err(_) => operations.push(item.clone()),
        }
    }

    let mut adapted = PredicateSet::from_operations(operations);
    if !mentions_media_type {
        debug!("No media_type filter, restricting to images and videos");
        adapted.in_values(columns::MEDIA_TYPE, DEFAULT_MEDIA_TYPES);
    }
    adapted
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces logical column names with native ones.
///
/// An identifier is rewritten only when it starts the text or follows a
/// space, comma or opening parenthesis. Text inside single quotes is left
/// alone.
pub fn remap_identifiers(text: &str, map: &FieldMap) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut in_quote = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if in_quote || c == '\'' || !is_ident_char(c) {
            if c == '\'' {
                in_quote = !in_quote;
            }
            out.push(c);
            prev = Some(c);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let end = rest.find(|ch: char| !is_ident_char(ch)).unwrap_or(rest.len());
        let token = &rest[..end];
        let at_boundary = matches!(prev, None | Some(' ') | Some(',') | Some('('));
        if at_boundary {
            out.push_str(map.to_native(token));
        } else {
            out.push_str(token);
        }
        prev = token.chars().last();
        rest = &rest[end..];
    }
    out
}
