//! Property tests for body mutation and placeholder resolution

use request_composer::body::apply_pair;
use request_composer::models::VariableType;
use request_composer::path::PathExpression;
use request_composer::variables::{VarError, VariableStore};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Dotted paths of one to four segments, some with an index.
fn path_strategy() -> impl Strategy<Value = String> {
    let segment = ("[a-z]{1,6}", proptest::option::of(0usize..4)).prop_map(|(name, index)| {
        match index {
            Some(i) => format!("{}[{}]", name, i),
            None => name,
        }
    });
    proptest::collection::vec(segment, 1..4).prop_map(|segments| segments.join("."))
}

/// Cell values covering every inference rule.
fn raw_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("true".to_string()),
        Just("false".to_string()),
        Just("null".to_string()),
        "[0-9]{1,9}",
        "[0-9]{1,5}\\.[0-9]{1,4}",
        "[a-z ]{0,12}",
    ]
}

proptest! {
    #[test]
    fn applying_twice_equals_applying_once(path in path_strategy(), raw in raw_value_strategy()) {
        let mut once = json!({});
        apply_pair(&mut once, &path, &raw).unwrap();

        let mut twice = once.clone();
        apply_pair(&mut twice, &path, &raw).unwrap();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn written_leaf_is_readable(path in path_strategy(), digits in "[1-9][0-9]{0,8}") {
        let mut doc = json!({});
        apply_pair(&mut doc, &path, &digits).unwrap();

        let expression = PathExpression::parse(&path).unwrap();
        let expected: i64 = digits.parse().unwrap();
        prop_assert_eq!(expression.lookup(&doc), Some(&json!(expected)));
    }

    #[test]
    fn intermediate_arrays_are_padded_with_objects(index in 0usize..8) {
        let mut doc = json!({});
        apply_pair(&mut doc, &format!("a.b[{}].c", index), "5").unwrap();

        let array = doc["a"]["b"].as_array().unwrap();
        prop_assert_eq!(array.len(), index + 1);
        for element in &array[..index] {
            prop_assert_eq!(element, &json!({}));
        }
        prop_assert_eq!(&array[index]["c"], &json!(5));
    }

    #[test]
    fn boolean_leaves_stay_boolean(initial in any::<bool>(), next in any::<bool>()) {
        let mut doc = json!({"flag": initial});
        apply_pair(&mut doc, "flag", &next.to_string()).unwrap();
        prop_assert_eq!(&doc["flag"], &Value::Bool(next));
    }

    #[test]
    fn resolve_substitutes_known_and_rejects_unknown(
        name in "[a-zA-Z]{1,10}",
        value in "[a-zA-Z0-9 ]{0,10}",
        prefix in "[a-z/]{0,8}",
    ) {
        let mut store = VariableStore::new();
        store.store(&name, VariableType::String, &value).unwrap();

        let template = format!("{}{{{}}}", prefix, name);
        prop_assert_eq!(store.resolve(&template).unwrap(), format!("{}{}", prefix, value));

        let unknown = format!("{}_missing", name);
        let err = store.resolve(&format!("{{{}}}/{{{}}}", name, unknown)).unwrap_err();
        prop_assert_eq!(err, VarError::UnresolvedPlaceholder(unknown));
    }
}
