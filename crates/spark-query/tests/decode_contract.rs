//! 解码契约测试：通过派生宏端到端验证字段绑定、标量/序列解码与错误聚合。
//!
//! # 教案式说明
//! - **测试目标（Why）**：覆盖调用方可观察的全部行为，包括部分填充与致命错误不写入字段；
//! - **验收契约（What）**：错误断言同时检查结构化类别与渲染文本中的 `overflow` / `underflow` 等词汇。

use std::collections::HashMap;

use spark_query::{
    BindingError, DecodeError, DecodeOptions, Decoder, FieldErrorKind, QueryMap, QueryRecord,
    ScalarKind, UnannotatedPolicy, decode,
};

fn input(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(key, values)| {
            (
                (*key).to_owned(),
                values.iter().map(|value| (*value).to_owned()).collect(),
            )
        })
        .collect()
}

#[test]
fn simple_strings() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("field1")]
        field1: String,
        #[query("field2")]
        field2: String,
    }

    let map = input(&[("field1", &["val1.1"]), ("field2", &["val2.1"])]);
    let mut out = Output::default();
    decode(&map, &mut out).expect("both fields present");

    assert_eq!(out.field1, "val1.1");
    assert_eq!(out.field2, "val2.1");
}

#[test]
fn simple_ints_and_floats() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("field1")]
        field1: isize,
        #[query("field2")]
        field2: i32,
        #[query("field3")]
        field3: f32,
        #[query("field4")]
        field4: f64,
        #[query("field5")]
        field5: u16,
    }

    let map = input(&[
        ("field1", &["23"]),
        ("field2", &["-42"]),
        ("field3", &["1.25"]),
        ("field4", &["-0.5e3"]),
        ("field5", &["65535"]),
    ]);
    let mut out = Output::default();
    decode(&map, &mut out).expect("all values in range");

    assert_eq!(out.field1, 23);
    assert_eq!(out.field2, -42);
    assert_eq!(out.field3, 1.25);
    assert_eq!(out.field4, -500.0);
    assert_eq!(out.field5, u16::MAX);
}

#[test]
fn signed_overflow_is_reported() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("field1")]
        field1: i8,
    }

    let map = input(&[("field1", &["1000"])]);
    let mut out = Output::default();
    let error = decode(&map, &mut out).expect_err("1000 does not fit in i8");

    assert!(error.to_string().contains("overflow"), "{error}");
    assert!(matches!(
        error.field_errors()[0].kind(),
        FieldErrorKind::Overflow {
            kind: ScalarKind::I8,
            ..
        }
    ));
    assert_eq!(out.field1, 0);
}

#[test]
fn unsigned_underflow_is_reported() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("field1")]
        field1: u64,
    }

    let map = input(&[("field1", &["-1"])]);
    let mut out = Output::default();
    let error = decode(&map, &mut out).expect_err("negative into u64");

    let message = error.to_string();
    assert!(message.contains("underflow"), "{message}");
    assert!(!message.contains("overflow"), "{message}");
    assert_eq!(out.field1, 0);
}

#[test]
fn sequences_preserve_order() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("field1")]
        field1: Vec<i64>,
        #[query("field2")]
        field2: Vec<String>,
    }

    let map = input(&[
        ("field1", &["12", "34", "5", "6", "789"]),
        ("field2", &["-42.0", "hello"]),
    ]);
    let mut out = Output::default();
    decode(&map, &mut out).expect("all elements valid");

    assert_eq!(out.field1, [12, 34, 5, 6, 789]);
    assert_eq!(out.field2, ["-42.0", "hello"]);
}

#[test]
fn missing_required_value_names_the_key() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("field1")]
        field1: String,
    }

    let map = input(&[]);
    let mut out = Output::default();
    let error = decode(&map, &mut out).expect_err("field1 is required");

    let message = error.to_string();
    assert!(message.contains("required value missing"), "{message}");
    assert!(message.contains("field1"), "{message}");
    assert_eq!(error.field_errors()[0].kind(), &FieldErrorKind::Missing);
}

#[test]
fn multiple_values_for_single_field_are_rejected() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("page")]
        page: u32,
    }

    let map = input(&[("page", &["1", "2"])]);
    let mut out = Output::default();
    let error = decode(&map, &mut out).expect_err("two values for one field");

    assert_eq!(
        error.field_errors()[0].kind(),
        &FieldErrorKind::MultipleValues { count: 2 }
    );
    assert!(error.to_string().contains("\"page\""));
}

#[test]
fn every_field_is_visited_and_partial_results_are_kept() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("small")]
        small: u8,
        #[query("name")]
        name: String,
        #[query("ids")]
        ids: Vec<u16>,
        #[query("ratio")]
        ratio: f32,
    }

    let map = input(&[
        ("small", &["999"]),
        ("name", &["spark"]),
        ("ids", &["1", "-2", "three", "4"]),
        ("ratio", &["1e39"]),
    ]);
    let mut out = Output::default();
    let error = decode(&map, &mut out).expect_err("several failures");

    assert_eq!(out.small, 0);
    assert_eq!(out.name, "spark");
    assert_eq!(out.ids, [1, 4]);
    assert_eq!(out.ratio, 0.0);

    let errors = error.field_errors();
    let summary: Vec<_> = errors
        .iter()
        .map(|failure| (failure.key(), failure.element()))
        .collect();
    assert_eq!(
        summary,
        [
            ("small", None),
            ("ids", Some(1)),
            ("ids", Some(2)),
            ("ratio", None),
        ]
    );
    assert!(matches!(errors[1].kind(), FieldErrorKind::Underflow { .. }));
    assert!(matches!(errors[2].kind(), FieldErrorKind::Invalid { .. }));

    let message = error.to_string();
    let overflow_at = message.find("overflows type u8").expect("small overflow");
    let underflow_at = message.find("underflows type u16").expect("ids underflow");
    assert!(overflow_at < underflow_at, "{message}");
}

#[test]
fn empty_sequence_input_is_not_an_error() {
    #[derive(QueryRecord)]
    struct Output {
        #[query("tag")]
        tags: Vec<String>,
    }

    let map = QueryMap::new();
    let mut out = Output {
        tags: vec!["stale".to_owned()],
    };
    decode(&map, &mut out).expect("zero values are fine for sequences");
    assert!(out.tags.is_empty());
}

#[test]
fn options_in_annotation_are_tolerated() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("id,omitempty,legacy")]
        id: u32,
        #[query = "name"]
        name: String,
    }

    let map = input(&[("id", &["9"]), ("name", &["n"])]);
    let mut out = Output::default();
    decode(&map, &mut out).expect("options are ignored");
    assert_eq!(out.id, 9);
    assert_eq!(out.name, "n");

    let descriptors = spark_query::describe(&mut out).expect("valid bindings");
    assert_eq!(descriptors[0].binding.options(), ["omitempty", "legacy"]);
}

#[test]
fn skipped_fields_are_never_touched() {
    #[derive(QueryRecord)]
    struct Output {
        #[query("visible")]
        visible: String,
        #[query(skip)]
        hidden: bool,
    }

    let map = input(&[("visible", &["yes"]), ("hidden", &["false"])]);
    let mut out = Output {
        visible: String::new(),
        hidden: true,
    };
    decode(&map, &mut out).expect("skipped field is ignored");
    assert_eq!(out.visible, "yes");
    assert!(out.hidden);
}

#[test]
fn unannotated_fields_bind_the_empty_key_by_default() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("a")]
        a: String,
        b: String,
        c: Vec<i32>,
    }

    // 空键即便出现在输入里也不会命中。
    let map = input(&[("a", &["x"]), ("", &["never"]), ("b", &["ignored"])]);
    let mut out = Output::default();
    let error = decode(&map, &mut out).expect_err("b has no binding");

    assert_eq!(out.a, "x");
    assert_eq!(out.b, "");
    assert!(out.c.is_empty());
    let errors = error.field_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field(), "b");
    assert_eq!(errors[0].key(), "");

    let decoder = Decoder::new(DecodeOptions::new().with_unannotated(UnannotatedPolicy::Skip));
    let mut skipped = Output::default();
    decoder
        .decode(&map, &mut skipped)
        .expect("unannotated fields are skipped");
    assert_eq!(skipped.a, "x");
}

#[test]
fn malformed_annotation_aborts_before_any_write() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("first")]
        first: String,
        #[query("second,,opt")]
        second: String,
    }

    let map = input(&[("first", &["set"]), ("second", &["set"])]);
    let mut out = Output::default();
    let error = decode(&map, &mut out).expect_err("empty option token");

    assert!(error.is_fatal());
    assert_eq!(
        error,
        DecodeError::MalformedBinding {
            record: "Output",
            field: "second",
            annotation: "second,,opt",
            source: BindingError::EmptyOption { position: 1 },
        }
    );
    assert_eq!(out.first, "");
}

#[test]
fn non_record_targets_are_rejected() {
    let map = input(&[("x", &["1"])]);
    let mut text = String::from("untouched");
    let error = decode(&map, &mut text).expect_err("String is not a record");
    assert_eq!(error, DecodeError::NotARecord { kind: "String" });
    assert_eq!(text, "untouched");

    let mut list: Vec<u8> = Vec::new();
    let error = decode(&map, &mut list).expect_err("Vec is not a record");
    assert!(error.to_string().contains("Vec<u8> was given"));
}

#[test]
fn tuple_structs_bind_by_position() {
    #[derive(Default, QueryRecord)]
    struct Pair(#[query("left")] i16, #[query("right")] Vec<f64>);

    let map = input(&[("left", &["-7"]), ("right", &["0.5", "2"])]);
    let mut out = Pair::default();
    decode(&map, &mut out).expect("tuple fields bind");
    assert_eq!(out.0, -7);
    assert_eq!(out.1, [0.5, 2.0]);

    let descriptors = spark_query::describe(&mut out).expect("valid");
    assert_eq!(descriptors[0].field, "0");
}

#[test]
fn generic_records_are_supported() {
    #[derive(Default, QueryRecord)]
    struct Page<T>
    where
        T: spark_query::FieldTarget,
    {
        #[query("value")]
        value: T,
    }

    let map = input(&[("value", &["42"])]);
    let mut out = Page::<u8>::default();
    decode(&map, &mut out).expect("generic field");
    assert_eq!(out.value, 42);
}

#[test]
fn configured_decoder_trims_and_caps_errors() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("n")]
        n: i32,
        #[query("bad")]
        bad: Vec<u8>,
    }

    let options = DecodeOptions::from_toml_str("trim_whitespace = true\nmax_errors = 2\n")
        .expect("valid options");
    let decoder = Decoder::new(options);
    let map = input(&[("n", &[" 12 "]), ("bad", &["x", "y", "z", "w"])]);
    let mut out = Output::default();
    let error = decoder.decode(&map, &mut out).expect_err("bad elements");

    assert_eq!(out.n, 12);
    let DecodeError::Fields(aggregate) = &error else {
        panic!("expected field errors, got {error}");
    };
    assert_eq!(aggregate.len(), 2);
    assert_eq!(aggregate.suppressed(), 2);
}

#[test]
fn query_map_source_works_through_references() {
    #[derive(Default, QueryRecord)]
    struct Output {
        #[query("k")]
        k: Vec<u32>,
    }

    let mut map = QueryMap::new();
    map.append("k", "3");
    map.append("k", "1");
    let by_ref = &map;
    let mut out = Output::default();
    decode(&by_ref, &mut out).expect("reference source");
    assert_eq!(out.k, [3, 1]);
}
