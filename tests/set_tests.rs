//! Integration tests for FsmSet.

use fsmcontainers::prelude::*;
use std::cmp::Ordering;

fn set(registry: &CodecRegistry, items: &[&str]) -> FsmSet {
    FsmSet::new(registry, items.iter().copied()).unwrap()
}

fn sorted(set: &FsmSet) -> Vec<Value> {
    let mut values = set.to_vec(None).unwrap();
    values.sort();
    values
}

#[test]
fn test_intersection_of_pets_and_birds() {
    let registry = CodecRegistry::new();
    let left = set(&registry, &["cat", "dog"]);
    let right = set(&registry, &["dog", "bird"]);

    let both = left.intersection(&right).unwrap();
    assert_eq!(both.to_vec(None).unwrap(), vec![Value::from("dog")]);
    assert_eq!(both.len(), 1);
}

#[test]
fn test_set_algebra() {
    let registry = CodecRegistry::new();
    let left = set(&registry, &["cat", "dog", "eel"]);
    let right = set(&registry, &["dog", "bird"]);

    assert_eq!(
        sorted(&left.union(&right).unwrap()),
        vec!["bird", "cat", "dog", "eel"]
    );
    assert_eq!(
        sorted(&left.difference(&right).unwrap()),
        vec!["cat", "eel"]
    );
    assert_eq!(
        sorted(&left.symmetric_difference(&right).unwrap()),
        vec!["bird", "cat", "eel"]
    );
}

#[test]
fn test_membership() {
    let registry = CodecRegistry::new();
    let words = set(&registry, &["cat", "catalog"]);
    assert!(words.contains("cat").unwrap());
    assert!(!words.contains("cata").unwrap());
    assert!(!words.contains("").unwrap());
    assert!(matches!(
        words.contains("bad[token"),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_tuple_set_membership() {
    let registry = CodecRegistry::new();
    let pairs = FsmSet::new(&registry, [("hello", ""), ("a", "b")]).unwrap();
    assert!(pairs.contains(("hello", "")).unwrap());
    assert!(!pairs.contains(("hello", "x")).unwrap());
    assert!(matches!(
        pairs.contains("hello"),
        Err(Error::Validation(ValidationError::ShapeMismatch { .. }))
    ));
    assert_eq!(
        sorted(&pairs),
        vec![Value::from(("a", "b")), Value::from(("hello", ""))]
    );
}

#[test]
fn test_incompatible_codecs_are_errors() {
    let registry = CodecRegistry::new();
    let words = set(&registry, &["a"]);
    let pairs = FsmSet::new(&registry, [("a", "b")]).unwrap();
    assert!(matches!(
        words.union(&pairs),
        Err(Error::Incompatible { operation: "union", .. })
    ));
    assert!(matches!(
        words.equivalent(&pairs),
        Err(Error::Incompatible { .. })
    ));

    let other_registry = CodecRegistry::new();
    let foreign = set(&other_registry, &["a"]);
    assert!(words.intersection(&foreign).is_err());
}

#[test]
fn test_closure_requires_limit() {
    let registry = CodecRegistry::new();
    let star = set(&registry, &["ab"]).closure().unwrap();

    assert!(matches!(star.iter(None), Err(Error::UnboundedEnumeration)));
    assert_eq!(star.len(), Cardinality::Infinite);
    assert_eq!(
        star.to_vec(Some(3)).unwrap(),
        vec!["", "ab", "abab"]
    );
    assert_eq!(star.len_cmp(5), Ordering::Greater);
}

#[test]
fn test_limit_returns_shortest() {
    let registry = CodecRegistry::new();
    let star = set(&registry, &["a", "bb"]).plus().unwrap();
    let first = star.to_vec(Some(4)).unwrap();
    assert_eq!(
        first,
        vec!["a", "aa", "bb", "aaa"]
    );
}

#[test]
fn test_len_cmp_shortcut() {
    let registry = CodecRegistry::new();
    let three = set(&registry, &["x", "y", "z"]);
    assert_eq!(three.len_cmp(3), Ordering::Equal);
    assert_eq!(three.len_cmp(2), Ordering::Greater);
    assert_eq!(three.len_cmp(10), Ordering::Less);
    assert!(set(&registry, &[]).is_empty());
}

#[test]
fn test_concat_builds_word_forms() {
    let registry = CodecRegistry::new();
    let stems = set(&registry, &["walk", "talk"]);
    let endings = set(&registry, &["", "ed"]);
    assert_eq!(
        sorted(&stems.concat(&endings).unwrap()),
        vec![
            "talk",
            "talked",
            "walk",
            "walked"
        ]
    );
}

#[test]
fn test_concat_of_pairs_is_componentwise() {
    let registry = CodecRegistry::new();
    let left = FsmSet::new(&registry, [("a", "bb")]).unwrap();
    let right = FsmSet::new(&registry, [("c", "d")]).unwrap();
    let joined = left.concat(&right).unwrap();

    let expected = Value::from(("ac", "bbd"));
    assert_eq!(joined.single().unwrap(), expected);
    assert!(joined.contains(expected.clone()).unwrap());
    assert!(joined
        .equivalent(&FsmSet::new(&registry, [expected]).unwrap())
        .unwrap());
}

#[test]
fn test_concat_of_pairs_counts_distinct_values() {
    let registry = CodecRegistry::new();
    let joined = FsmSet::new(&registry, [("a", ""), ("", "")])
        .unwrap()
        .concat(&FsmSet::new(&registry, [("", "b"), ("a", "b")]).unwrap())
        .unwrap();
    let direct = FsmSet::new(&registry, [("", "b"), ("a", "b"), ("aa", "b")]).unwrap();

    assert_eq!(joined.len(), 3);
    assert!(joined.equivalent(&direct).unwrap());
    assert_eq!(joined.union(&direct).unwrap().len(), 3);
}

#[test]
fn test_closure_of_pairs_is_refused() {
    let registry = CodecRegistry::new();
    let pairs = FsmSet::new(&registry, [("a", "b")]).unwrap();
    assert!(matches!(pairs.closure(), Err(Error::Unsupported { .. })));
    assert!(matches!(pairs.plus(), Err(Error::Unsupported { .. })));
}

#[test]
fn test_subset_relations() {
    let registry = CodecRegistry::new();
    let small = set(&registry, &["a"]);
    let big = set(&registry, &["a", "b"]);
    let other = set(&registry, &["c"]);

    assert!(small.is_subset(&big).unwrap());
    assert!(small.is_proper_subset(&big).unwrap());
    assert!(big.is_superset(&small).unwrap());
    assert!(big.is_proper_superset(&small).unwrap());
    assert!(!big.is_proper_subset(&big).unwrap());
    assert!(big.is_subset(&big).unwrap());
    assert!(small.is_disjoint(&other).unwrap());
    assert!(!small.is_disjoint(&big).unwrap());
}

#[test]
fn test_equivalence_ignores_construction() {
    let registry = CodecRegistry::new();
    let direct = set(&registry, &["ab", "ac"]);
    let built = set(&registry, &["a"])
        .concat(&set(&registry, &["b", "c"]))
        .unwrap();
    assert!(direct.equivalent(&built).unwrap());
    assert!(!direct.equivalent(&set(&registry, &["ab"])).unwrap());
}

#[test]
fn test_cross_product() {
    let registry = CodecRegistry::new();
    let keys = set(&registry, &["a", "b"]);
    let values = FsmSet::new(&registry, [("x", "y")]).unwrap();
    let map = keys.cross(&values);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("b").unwrap(), Value::from(("x", "y")));
}

#[test]
fn test_sigma_star() {
    let registry = CodecRegistry::new();
    let words = set(&registry, &["ab", "[foo]"]);
    let sigma = words.sigma(&registry).unwrap();
    assert_eq!(
        sorted(&sigma),
        vec!["[foo]", "a", "b"]
    );
    let star = words.sigma_star(&registry).unwrap();
    assert!(star.contains("ba[foo]a").unwrap());
    assert!(!star.contains("c").unwrap());
}

#[test]
fn test_display_and_debug() {
    let registry = CodecRegistry::new();
    let star = set(&registry, &["a"]).closure().unwrap();
    assert_eq!(star.to_string(), "FsmSet({'', 'a', 'aa', ... })");
    assert!(format!("{:?}", star).starts_with("FsmSet"));
}
