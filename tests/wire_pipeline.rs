use std::fs;

use mediapred::compiler::{Backend, CompileOptions, CompiledQuery};
use mediapred::fields::ALBUM_CURSOR_FIELDS;
use mediapred::predicates::wire;
use mediapred::result_set::{CellValue, MappedResultSet, MemoryResultSet, ResultSet};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use tempfile::TempDir;

const GALLERY_QUERY: &str = r#"{
    "operations": [
        { "op": 1,  "scalars": ["media_type", 1] },
        { "op": 7 },
        { "op": 11, "scalars": ["album_id"], "lists": [["12", "14"]] },
        { "op": 16, "scalars": ["date_taken"] },
        { "op": 17, "scalars": [30, 60] }
    ],
    "mode": 2
}"#;

fn write_fixture(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_wire_file_to_relational_sql() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "gallery.json", GALLERY_QUERY);
    let set = wire::from_json(&fs::read_to_string(path).unwrap()).unwrap();

    let options = CompileOptions {
        table: "Photos".into(),
        columns: vec!["file_id".into(), "display_name".into()],
        ..Default::default()
    };
    let Ok(CompiledQuery::Relational(predicates)) = Backend::Relational.compile(&set, &options)
    else {
        panic!("relational compile is total");
    };

    let sql = predicates.to_sql(&options.columns);
    assert_eq!(
        sql,
        "SELECT file_id, display_name FROM Photos \
         WHERE media_type = ? AND album_id IN (?, ?) \
         ORDER BY date_taken DESC LIMIT 30 OFFSET 60"
    );
    Parser::parse_sql(&SQLiteDialect {}, &sql).unwrap();
}

#[test]
fn test_wire_file_to_media_store() {
    let set = wire::from_json(GALLERY_QUERY).unwrap();
    let options = CompileOptions {
        columns: vec!["file_id".into(), "display_name".into()],
        ..Default::default()
    };
    let Ok(CompiledQuery::MediaStore(query)) = Backend::MediaStore.compile(&set, &options) else {
        panic!("media-store compile is total");
    };

    assert_eq!(query.projection, vec!["_id", "_display_name"]);
    assert_eq!(query.selection, "media_type = ? AND bucket_id IN (?, ?)");
    assert_eq!(query.selection_args, vec!["1", "12", "14"]);
    assert_eq!(query.sort_order, "datetaken DESC");
    assert_eq!(query.limit, Some(30));
    assert_eq!(query.offset, 60);
}

#[test]
fn test_wire_file_on_photo_library_aborts_for_album_id() {
    let set = wire::from_json(GALLERY_QUERY).unwrap();
    let result = Backend::Photos.compile(&set, &CompileOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_album_cursor_read_back_in_logical_names() {
    let native = MemoryResultSet::new(
        vec![
            "bucket_id".into(),
            "bucket_display_name".into(),
            "count(_data)".into(),
        ],
        vec![
            vec![12.into(), "Camera".into(), 40.into()],
            vec![14.into(), "Screenshots".into(), 3.into()],
        ],
    );
    let mut cursor = MappedResultSet::new(native, &ALBUM_CURSOR_FIELDS);

    let name = cursor.column_index("album_name").unwrap().unwrap();
    let count = cursor.column_index("count").unwrap().unwrap();

    let mut albums = Vec::new();
    while cursor.go_to_next_row().is_ok() {
        albums.push((cursor.get_string(name).unwrap(), cursor.get_i32(count).unwrap()));
    }
    assert_eq!(
        albums,
        vec![("Camera".to_string(), 40), ("Screenshots".to_string(), 3)]
    );
    assert!(cursor.is_at_last_row().unwrap());
    assert_eq!(cursor.cell(0).unwrap(), CellValue::Int32(14));

    cursor.close();
    assert!(cursor.is_closed());
}

#[test]
fn test_raw_document_without_mode_keeps_its_filter() {
    let set = wire::from_json(
        r#"{"where_clause": "size > ?", "where_args": ["10"], "order": "size DESC"}"#,
    )
    .unwrap();
    let options = CompileOptions {
        table: "Photos".into(),
        ..Default::default()
    };

    let Ok(CompiledQuery::Relational(predicates)) = Backend::Relational.compile(&set, &options)
    else {
        panic!("relational compile is total");
    };
    assert_eq!(predicates.where_clause, "size > ?");
    assert_eq!(predicates.bind_args_text(), vec!["10"]);
    assert_eq!(predicates.order, "size DESC");

    assert_eq!(
        Backend::Photos.compile(&set, &options),
        Err(mediapred::CompileError::RawClauseMode)
    );
}

#[test]
fn test_structured_document_marked_raw_is_rejected() {
    let err = wire::from_json(
        r#"{"operations": [{"op": 1, "scalars": ["media_type", 1]}], "mode": 1}"#,
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<mediapred::PredicateError>(),
        Some(&mediapred::PredicateError::ModeConflict)
    );
}
