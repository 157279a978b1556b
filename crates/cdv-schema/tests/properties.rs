//! Property tests for validation and repair over arbitrary records.

use cdv_core::{Record, TypeTag, ValueKind};
use cdv_schema::{ComponentDetailsValidator, SchemaSource, SchemaStore, Severity, BASE_SCHEMA};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Fields of the schema used throughout; the prefix keeps generated keys
/// from colliding with declared ones unless the generator chooses to.
const FIELDS: [(&str, &str); 5] = [
    ("f_string", "string"),
    ("f_integer", "integer"),
    ("f_boolean", "boolean"),
    ("f_array", "array"),
    ("f_object", "object"),
];

fn validator() -> ComponentDetailsValidator {
    let schema: serde_json::Map<String, Value> = FIELDS
        .iter()
        .map(|(f, t)| (f.to_string(), json!(t)))
        .collect();
    let store =
        SchemaStore::load([SchemaSource::document(BASE_SCHEMA, Value::Object(schema))]).unwrap();
    ComponentDetailsValidator::new(store)
}

fn any_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Records mixing declared field names with arbitrary extra keys.
fn any_record() -> impl Strategy<Value = Record> {
    let key = prop_oneof![
        prop::sample::select(FIELDS.iter().map(|(f, _)| f.to_string()).collect::<Vec<_>>()),
        "[a-z]{1,8}".prop_map(String::from),
        Just("name".to_string()),
        Just("id".to_string()),
    ];
    prop::collection::vec((key, any_value()), 0..10)
        .prop_map(|pairs| pairs.into_iter().collect::<Record>())
}

fn violating_fields(v: &ComponentDetailsValidator, r: &Record) -> usize {
    v.base_schema()
        .fields()
        .iter()
        .filter(|spec| match r.get(&spec.name) {
            None => true,
            Some(value) => ValueKind::of(value) != spec.expected.kind(),
        })
        .count()
}

proptest! {
    /// One error per missing or mismatched field, never fewer.
    #[test]
    fn error_count_equals_violating_fields(r in any_record()) {
        let v = validator();
        let report = v.validate(&r);
        prop_assert_eq!(report.error_count(), violating_fields(&v, &r));
        prop_assert!(report.diagnostics().iter().all(|d| d.severity == Severity::Error));
    }

    /// The verdict is true iff every declared field matches exactly.
    #[test]
    fn verdict_matches_field_check(r in any_record()) {
        let v = validator();
        prop_assert_eq!(v.is_valid(&r), violating_fields(&v, &r) == 0);
    }

    /// Repair output has exactly the declared key set, in declared order.
    #[test]
    fn repair_key_set_is_schema_key_set(r in any_record()) {
        let v = validator();
        let repaired = v.to_valid(&r);
        let keys: Vec<&str> = repaired.keys().map(String::as_str).collect();
        let declared: Vec<&str> = v.base_schema().field_names().collect();
        prop_assert_eq!(keys, declared);
    }

    /// Present values are copied verbatim; absent ones get the tag default.
    #[test]
    fn repair_copies_or_defaults(r in any_record()) {
        let v = validator();
        let report = v.repair(&r);
        for spec in v.base_schema().fields() {
            let out = &report.record()[&spec.name];
            match r.get(&spec.name) {
                Some(original) => prop_assert_eq!(out, original),
                None => prop_assert_eq!(out, &spec.expected.default_value()),
            }
        }
        let missing = v
            .base_schema()
            .fields()
            .iter()
            .filter(|spec| !r.contains_key(&spec.name))
            .count();
        prop_assert_eq!(report.diagnostics().len(), missing);
    }

    /// Repair only fails to produce a valid record where the input held a
    /// wrongly typed value.
    #[test]
    fn repair_invalid_only_when_input_mistyped(r in any_record()) {
        let v = validator();
        let report = v.repair(&r);
        let revalidated = v.validate(report.record());
        prop_assert_eq!(revalidated.error_count(), report.still_invalid_fields().len());
        for field in report.still_invalid_fields() {
            let tag: TypeTag = v.base_schema().get(field).unwrap();
            prop_assert!(!tag.matches(&r[field]));
        }
    }
}

#[test]
fn test_shared_validator_across_threads() {
    let v = validator();
    let inputs: Vec<Record> = (0..8)
        .map(|i| {
            let mut r = Record::new();
            r.insert("name".into(), json!(format!("component-{i}")));
            if i % 2 == 0 {
                r.insert("f_integer".into(), json!(i));
            }
            r
        })
        .collect();

    let expected: Vec<(usize, Record)> = inputs
        .iter()
        .map(|r| (v.validate(r).error_count(), v.to_valid(r)))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|r| {
                let v = &v;
                scope.spawn(move || (v.validate(r).error_count(), v.to_valid(r)))
            })
            .collect();
        for (handle, want) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), want);
        }
    });
}
