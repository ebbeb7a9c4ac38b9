use mediapred::compiler::{PhotoLibraryCompiler, PredicateCompiler, RelationalCompiler};
use mediapred::fields::{all_maps, FieldMap};
use mediapred::{
    CompileError, ListValue, OperationItem, OperationKind, PredicateError, PredicateSet,
    ScalarValue, SettingMode,
};

fn photos(set: &PredicateSet) -> Option<mediapred::compiler::PhotoQuery> {
    PhotoLibraryCompiler::new(false).compile(set)
}

#[test]
fn test_scenario_a_equal_to_on_photo_library() {
    let mut set = PredicateSet::new();
    set.equal_to("media_type", 2);

    let query = photos(&set).expect("media_type is filterable");
    assert!(!query.where_clause.contains("media_type"));
    assert!(query.where_clause.contains("mediaType"));
    assert!(query.where_clause.contains('2'));
}

#[test]
fn test_scenario_b_relational_keeps_logical_names() {
    let mut set = PredicateSet::new();
    set.in_values("media_type", ["1", "3"])
        .order_by_desc("date_added");

    let out = RelationalCompiler::new("Photos").compile(&set);
    assert_eq!(out.where_clause, "media_type IN (?, ?)");
    assert_eq!(out.bind_args_text(), vec!["1", "3"]);
    assert_eq!(out.order, "date_added DESC");
}

#[test]
fn test_scenario_c_fluent_call_discards_raw_clause() {
    let mut set = PredicateSet::new();
    set.set_where_clause("x=1").unwrap();
    set.equal_to("y", 5);

    assert_eq!(set.where_clause(), "");
    assert_eq!(set.operations().len(), 1);
    assert_eq!(set.operations()[0].kind(), OperationKind::EqualTo);
    assert_eq!(set.operations()[0].field(), "y");
    assert_eq!(set.operations()[0].scalar(1), &ScalarValue::Int32(5));
}

#[test]
fn test_scenario_d_all_blank_in_list_aborts() {
    let mut set = PredicateSet::new();
    set.in_values("color", [" ", "\t"]);

    assert!(photos(&set).is_none());
    assert_eq!(
        PhotoLibraryCompiler::new(false).try_compile(&set),
        Err(CompileError::EmptyValueList("color".into()))
    );
}

#[test]
fn test_scenario_e_limit_and_offset() {
    let mut set = PredicateSet::new();
    set.limit(10, 5);

    let query = photos(&set).unwrap();
    assert_eq!(query.limit, 10);
    assert_eq!(query.offset, 5);
}

#[test]
fn test_mode_exclusivity_after_every_fluent_kind() {
    let fluent: [fn(&mut PredicateSet); 6] = [
        |s| {
            s.equal_to("a", 1);
        },
        |s| {
            s.or();
        },
        |s| {
            s.in_values("a", vec![1_i64, 2]);
        },
        |s| {
            s.limit(1, 1);
        },
        |s| {
            s.left_outer_join("t");
        },
        |s| {
            s.key_prefix("p");
        },
    ];

    for call in fluent {
        let mut set = PredicateSet::new();
        set.set_where_clause("a = ?").unwrap();
        set.set_where_args(vec!["1".into()]).unwrap();
        set.set_order("a").unwrap();
        call(&mut set);

        assert_eq!(set.mode(), SettingMode::Structured);
        assert!(set.where_clause().is_empty());
        assert!(set.where_args().is_empty());
        assert!(set.order().is_empty());

        assert_eq!(set.set_where_clause("b = 2"), Err(PredicateError::ModeConflict));
        assert_eq!(set.set_order("b"), Err(PredicateError::ModeConflict));
        assert!(set.where_clause().is_empty());
    }
}

#[test]
fn test_soft_cast_totality() {
    let scalars = [
        ScalarValue::Absent,
        ScalarValue::from(1),
        ScalarValue::from(1_i64),
        ScalarValue::from(1.0),
        ScalarValue::from("1"),
        ScalarValue::from(true),
    ];
    for v in &scalars {
        let _ = (v.as_i32(), v.as_i64(), v.as_f64(), v.as_str(), v.as_bool());
    }
    assert_eq!(ScalarValue::from("1").as_i32(), 0);
    assert_eq!(ScalarValue::from(1).as_str(), "");

    let lists = [
        ListValue::Absent,
        ListValue::from(vec![1]),
        ListValue::from(vec![1_i64]),
        ListValue::from(vec![1.0]),
        ListValue::from(vec!["1"]),
    ];
    for l in &lists {
        let total = l.as_i32s().len() + l.as_i64s().len() + l.as_f64s().len() + l.as_strings().len();
        assert_eq!(total, l.len());
    }
}

#[test]
fn test_relational_totality() {
    for kind in OperationKind::ALL {
        let (scalars, lists) = kind.arity();
        let item = OperationItem::new(
            kind,
            vec![ScalarValue::from("col"); scalars],
            vec![ListValue::from(["x", "y"]); lists],
        )
        .unwrap();
        let set = PredicateSet::from_operations(vec![item]);
        let out = RelationalCompiler::new("T").compile(&set);
        assert_eq!(out.table, "T");
    }
}

#[test]
fn test_photo_library_abort_on_first_unsupported() {
    let mut set = PredicateSet::new();
    set.equal_to("media_type", 1).not_equal_to("hidden", 1);
    assert!(photos(&set).is_none());

    let mut set = PredicateSet::new();
    set.equal_to("media_type", 1).distinct();
    assert!(photos(&set).is_none());
}

#[test]
fn test_field_map_round_trip() {
    fn bijective(map: &FieldMap) -> bool {
        let entries = map.entries();
        let mut natives: Vec<_> = entries.iter().map(|(_, n)| *n).collect();
        natives.sort_unstable();
        natives.dedup();
        natives.len() == entries.len()
    }

    for map in all_maps() {
        for (logical, native) in map.entries() {
            assert_eq!(map.native(logical), Some(*native));
            if bijective(map) {
                assert_eq!(map.logical(native), Some(*logical));
            }
        }
    }
}

#[test]
fn test_out_of_range_ordinal_rejected_at_decode() {
    assert_eq!(
        OperationKind::try_from(40),
        Err(PredicateError::UnknownOperation(40))
    );
}
