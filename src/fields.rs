//! Logical column vocabulary and the static per-platform field maps.
//!
//! Every map is plain `'static` data; lookups never allocate and the tables
//! cannot change after compilation.

pub mod columns {
    pub const FILE_ID: &str = "file_id";
    pub const DATA: &str = "data";
    pub const SIZE: &str = "size";
    pub const TITLE: &str = "title";
    pub const DISPLAY_NAME: &str = "display_name";
    pub const MEDIA_TYPE: &str = "media_type";
    pub const MIME_TYPE: &str = "mime_type";
    pub const OWNER_PACKAGE: &str = "owner_package";
    pub const DATE_ADDED: &str = "date_added";
    pub const DATE_MODIFIED: &str = "date_modified";
    pub const DATE_TAKEN: &str = "date_taken";
    pub const DURATION: &str = "duration";
    pub const IS_FAVORITE: &str = "is_favorite";
    pub const HIDDEN: &str = "hidden";
    pub const HEIGHT: &str = "height";
    pub const WIDTH: &str = "width";

    pub const ALBUM_ID: &str = "album_id";
    pub const ALBUM_TYPE: &str = "album_type";
    pub const ALBUM_SUBTYPE: &str = "album_subtype";
    pub const ALBUM_NAME: &str = "album_name";
    pub const ALBUM_COUNT: &str = "count";
    pub const LOCAL_IDENTIFIER: &str = "local_identifier";

    /// Aggregate alias the media-store album query selects.
    pub const MEDIA_TYPE_SUM: &str = "sum";
}

use columns::*;

/// A static `logical ↔ native` column table.
///
/// Lookups are permissive: [`FieldMap::to_native`] and
/// [`FieldMap::to_logical`] hand back the input unchanged when no entry
/// matches. Callers that must reject unknown names use [`FieldMap::native`]
/// and [`FieldMap::logical`] instead.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    pub fn native(&self, logical: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(l, _)| *l == logical)
            .map(|(_, n)| *n)
    }

    /// First logical name declared for `native`.
    ///
    /// Maps that send several logical names to one native name (the photo
    /// sort map does) resolve to the earliest entry.
    pub fn logical(&self, native: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, n)| *n == native)
            .map(|(l, _)| *l)
    }

    pub fn to_native<'a>(&self, logical: &'a str) -> &'a str {
        self.native(logical).unwrap_or(logical)
    }

    pub fn to_logical<'a>(&self, native: &'a str) -> &'a str {
        self.logical(native).unwrap_or(native)
    }

    pub fn contains_logical(&self, logical: &str) -> bool {
        self.native(logical).is_some()
    }
}

// ---------------------------------------------------------------------------
// Photo library (asset query descriptor)
// ---------------------------------------------------------------------------

/// Filterable photo columns.
pub static PHOTO_FILTER_FIELDS: FieldMap = FieldMap::new(
    "photo-filter",
    &[
        (MEDIA_TYPE, "mediaType"),
        (DURATION, "duration"),
        (HEIGHT, "pixelHeight"),
        (WIDTH, "pixelWidth"),
        (IS_FAVORITE, "favorite"),
        (HIDDEN, "hidden"),
    ],
);

/// Sortable photo columns. Both timestamps sort by the creation date.
pub static PHOTO_SORT_FIELDS: FieldMap = FieldMap::new(
    "photo-sort",
    &[
        (MEDIA_TYPE, "mediaType"),
        (DATE_ADDED, "creationDate"),
        (DATE_MODIFIED, "modificationDate"),
        (DURATION, "duration"),
        (HEIGHT, "pixelHeight"),
        (WIDTH, "pixelWidth"),
        (DATE_TAKEN, "creationDate"),
        (IS_FAVORITE, "favorite"),
        (HIDDEN, "hidden"),
    ],
);

pub static ALBUM_SORT_FIELDS: FieldMap =
    FieldMap::new("album-sort", &[(ALBUM_NAME, "localizedTitle")]);

/// Native name of the one field whose values are converted from ms to s.
pub const PHOTO_DURATION_FIELD: &str = "duration";

const ALBUM_TYPE_CODES: &[(&str, i32)] = &[("0", 1), ("1024", 2)];
const ALBUM_SUBTYPE_CODES: &[(&str, i32)] = &[("1", 2), ("1025", 203), ("1026", 202)];

fn code_for(table: &[(&str, i32)], value: &str) -> i32 {
    table
        .iter()
        .find(|(k, _)| *k == value)
        .map(|(_, code)| *code)
        .unwrap_or(0)
}

/// Photo-library album type for a logical album type value; 0 if unknown.
pub fn album_type_code(value: &str) -> i32 {
    code_for(ALBUM_TYPE_CODES, value)
}

/// Photo-library album subtype for a logical album subtype value; 0 if unknown.
pub fn album_subtype_code(value: &str) -> i32 {
    code_for(ALBUM_SUBTYPE_CODES, value)
}

// ---------------------------------------------------------------------------
// Media store (relational content provider)
// ---------------------------------------------------------------------------

/// Columns rewritten in projections, clauses and bind args sent to the media store.
pub static MEDIA_STORE_QUERY_FIELDS: FieldMap = FieldMap::new(
    "media-store-query",
    &[
        (DATA, "_data"),
        (FILE_ID, "_id"),
        (SIZE, "_size"),
        (DISPLAY_NAME, "_display_name"),
        (OWNER_PACKAGE, "owner_package_name"),
        (DATE_TAKEN, "datetaken"),
        (ALBUM_ID, "bucket_id"),
        (ALBUM_NAME, "bucket_display_name"),
        (ALBUM_COUNT, "count(_data)"),
        (MEDIA_TYPE_SUM, "sum(media_type)"),
    ],
);

/// Columns translated back when reading a media-store photo cursor.
pub static MEDIA_STORE_CURSOR_FIELDS: FieldMap = FieldMap::new(
    "media-store-cursor",
    &[
        (DATA, "_data"),
        (FILE_ID, "_id"),
        (SIZE, "_size"),
        (DISPLAY_NAME, "_display_name"),
        (OWNER_PACKAGE, "owner_package_name"),
        (ALBUM_ID, "bucket_id"),
        (ALBUM_NAME, "bucket_display_name"),
        (DATE_TAKEN, "datetaken"),
        (ALBUM_COUNT, "count(_data)"),
        (MEDIA_TYPE_SUM, "sum(media_type)"),
    ],
);

/// Columns translated back when reading a media-store album cursor.
pub static ALBUM_CURSOR_FIELDS: FieldMap = FieldMap::new(
    "album-cursor",
    &[
        (ALBUM_ID, "bucket_id"),
        (ALBUM_NAME, "bucket_display_name"),
        (ALBUM_COUNT, "count(_data)"),
        (MEDIA_TYPE_SUM, "sum(media_type)"),
    ],
);

/// Every static table, for listing and diagnostics.
pub fn all_maps() -> [&'static FieldMap; 6] {
    [
        &PHOTO_FILTER_FIELDS,
        &PHOTO_SORT_FIELDS,
        &ALBUM_SORT_FIELDS,
        &MEDIA_STORE_QUERY_FIELDS,
        &MEDIA_STORE_CURSOR_FIELDS,
        &ALBUM_CURSOR_FIELDS,
    ]
}
