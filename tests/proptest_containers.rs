//! Property-based tests: container algebra agrees with std collections.

use fsmcontainers::prelude::*;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

fn word_strategy() -> impl Strategy<Value = String> {
    "[a-dé ]{0,5}"
}

fn word_set_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(word_strategy(), 0..8)
}

fn word_map_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(word_strategy(), word_strategy(), 1..6)
}

fn pair_set_strategy() -> impl Strategy<Value = BTreeSet<(String, String)>> {
    prop::collection::btree_set((word_strategy(), word_strategy()), 1..5)
}

fn tagged_map_strategy() -> impl Strategy<Value = BTreeMap<String, (String, String)>> {
    prop::collection::btree_map(word_strategy(), (word_strategy(), word_strategy()), 1..5)
}

fn pair_set(registry: &CodecRegistry, pairs: &BTreeSet<(String, String)>) -> FsmSet {
    FsmSet::new(
        registry,
        pairs.iter().map(|(a, b)| (a.as_str(), b.as_str())),
    )
    .unwrap()
}

fn tagged_map(registry: &CodecRegistry, entries: &BTreeMap<String, (String, String)>) -> FsmMap {
    FsmMap::new(
        registry,
        entries
            .iter()
            .map(|(key, (a, b))| (key.as_str(), (a.as_str(), b.as_str()))),
    )
    .unwrap()
}

/// Every enumerated element is a member, and the count matches `len`.
fn check_set(set: &FsmSet, limit: Option<usize>) -> std::result::Result<(), TestCaseError> {
    let elements = set.to_vec(limit).unwrap();
    for element in &elements {
        prop_assert!(
            set.contains(element.clone()).unwrap(),
            "{} is enumerated but not a member",
            element
        );
    }
    let distinct: BTreeSet<Value> = elements.iter().cloned().collect();
    prop_assert_eq!(distinct.len(), elements.len());
    if limit.is_none() {
        prop_assert_eq!(set.len(), Cardinality::Finite(distinct.len()));
        prop_assert_eq!(set.len_cmp(distinct.len()), Ordering::Equal);
    }
    Ok(())
}

/// Every enumerated pair can be looked up, and the count matches `len`.
fn check_map(map: &FsmMap) -> std::result::Result<(), TestCaseError> {
    let items = map.items(None).unwrap().collect::<Result<Vec<_>>>().unwrap();
    for (key, value) in &items {
        prop_assert!(map
            .get_all(key.clone())
            .unwrap()
            .contains(value.clone())
            .unwrap());
    }
    let distinct: BTreeSet<(Value, Value)> = items.iter().cloned().collect();
    prop_assert_eq!(distinct.len(), items.len());
    prop_assert_eq!(map.len(), Cardinality::Finite(distinct.len()));
    Ok(())
}

fn fsm_set(registry: &CodecRegistry, words: &BTreeSet<String>) -> FsmSet {
    FsmSet::new(registry, words.iter()).unwrap()
}

fn contents(set: &FsmSet) -> BTreeSet<String> {
    set.to_vec(None)
        .unwrap()
        .into_iter()
        .map(|value| value.as_text().unwrap().to_string())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_union_matches_btreeset(x in word_set_strategy(), y in word_set_strategy()) {
        let registry = CodecRegistry::new();
        let result = fsm_set(&registry, &x).union(&fsm_set(&registry, &y)).unwrap();
        let expected: BTreeSet<String> = x.union(&y).cloned().collect();
        prop_assert_eq!(contents(&result), expected);
    }

    #[test]
    fn prop_intersection_matches_btreeset(x in word_set_strategy(), y in word_set_strategy()) {
        let registry = CodecRegistry::new();
        let result = fsm_set(&registry, &x).intersection(&fsm_set(&registry, &y)).unwrap();
        let expected: BTreeSet<String> = x.intersection(&y).cloned().collect();
        prop_assert_eq!(contents(&result), expected);
    }

    #[test]
    fn prop_difference_matches_btreeset(x in word_set_strategy(), y in word_set_strategy()) {
        let registry = CodecRegistry::new();
        let result = fsm_set(&registry, &x).difference(&fsm_set(&registry, &y)).unwrap();
        let expected: BTreeSet<String> = x.difference(&y).cloned().collect();
        prop_assert_eq!(contents(&result), expected);
    }

    #[test]
    fn prop_symmetric_difference_matches_btreeset(
        x in word_set_strategy(),
        y in word_set_strategy(),
    ) {
        let registry = CodecRegistry::new();
        let result = fsm_set(&registry, &x)
            .symmetric_difference(&fsm_set(&registry, &y))
            .unwrap();
        let expected: BTreeSet<String> = x.symmetric_difference(&y).cloned().collect();
        prop_assert_eq!(contents(&result), expected);
    }

    #[test]
    fn prop_len_and_membership(x in word_set_strategy(), candidate in word_strategy()) {
        let registry = CodecRegistry::new();
        let set = fsm_set(&registry, &x);
        prop_assert_eq!(set.len(), Cardinality::Finite(x.len()));
        prop_assert_eq!(set.contains(candidate.as_str()).unwrap(), x.contains(&candidate));
    }

    #[test]
    fn prop_double_inversion(m in word_map_strategy()) {
        let registry = CodecRegistry::new();
        let map = FsmMap::new(&registry, m.clone()).unwrap();
        prop_assert!(map.invert().invert().equivalent(&map).unwrap());
    }

    #[test]
    fn prop_composition_is_application(a in word_map_strategy(), b in word_map_strategy()) {
        let registry = CodecRegistry::new();
        let first = FsmMap::new(&registry, a.clone()).unwrap();
        let second = FsmMap::new(&registry, b.clone()).unwrap();
        let composed = first.compose(&second).unwrap();
        for (key, middle) in &a {
            match b.get(middle) {
                Some(expected) => prop_assert_eq!(
                    composed.get(key.as_str()).unwrap(),
                    Value::from(expected.as_str())
                ),
                None => prop_assert!(!composed.contains(key.as_str()).unwrap()),
            }
        }
    }

    #[test]
    fn prop_distributivity(
        a in word_map_strategy(),
        b in word_map_strategy(),
        c in word_map_strategy(),
    ) {
        let registry = CodecRegistry::new();
        let a = FsmMap::new(&registry, a).unwrap();
        let b = FsmMap::new(&registry, b).unwrap();
        let c = FsmMap::new(&registry, c).unwrap();
        let left = a.compose(&b.union(&c).unwrap()).unwrap();
        let right = a.compose(&b).unwrap().union(&a.compose(&c).unwrap()).unwrap();
        prop_assert!(left.equivalent(&right).unwrap());
    }

    #[test]
    fn prop_closure_limit_returns_shortest(x in prop::collection::btree_set("[ab]{1,3}", 1..4), n in 1usize..6) {
        let registry = CodecRegistry::new();
        let star = fsm_set(&registry, &x).closure().unwrap();
        prop_assert!(matches!(star.iter(None), Err(Error::UnboundedEnumeration)));
        let first = star.to_vec(Some(n)).unwrap();
        prop_assert_eq!(first.len(), n);
        let lengths: Vec<usize> = first
            .iter()
            .map(|value| value.as_text().unwrap().chars().count())
            .collect();
        prop_assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_tuple_set_algebra_is_consistent(x in pair_set_strategy(), y in pair_set_strategy()) {
        let registry = CodecRegistry::new();
        let (a, b) = (pair_set(&registry, &x), pair_set(&registry, &y));
        check_set(&a.union(&b).unwrap(), None)?;
        check_set(&a.intersection(&b).unwrap(), None)?;
        check_set(&a.difference(&b).unwrap(), None)?;
        check_set(&a.symmetric_difference(&b).unwrap(), None)?;

        let joined = a.concat(&b).unwrap();
        check_set(&joined, None)?;
        let expected: BTreeSet<Value> = x
            .iter()
            .flat_map(|(a1, b1)| {
                y.iter()
                    .map(move |(a2, b2)| Value::from((format!("{a1}{a2}"), format!("{b1}{b2}"))))
            })
            .collect();
        let actual: BTreeSet<Value> = joined.to_vec(None).unwrap().into_iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_text_concat_and_closure_are_consistent(
        x in word_set_strategy(),
        y in word_set_strategy(),
        n in 1usize..8,
    ) {
        let registry = CodecRegistry::new();
        let (a, b) = (fsm_set(&registry, &x), fsm_set(&registry, &y));
        check_set(&a.concat(&b).unwrap(), None)?;
        check_set(&a.closure().unwrap(), Some(n))?;
        check_set(&a.union(&b).unwrap().plus().unwrap(), Some(n))?;
    }

    #[test]
    fn prop_composed_maps_are_consistent(
        words in word_map_strategy(),
        tags in tagged_map_strategy(),
        more in tagged_map_strategy(),
    ) {
        let registry = CodecRegistry::new();
        let first = FsmMap::new(&registry, words).unwrap();
        let tagged = tagged_map(&registry, &tags);
        check_map(&first.compose(&tagged).unwrap())?;
        check_map(&first.lenient_compose(&first).unwrap())?;

        let other = tagged_map(&registry, &more);
        check_map(&tagged.union(&other).unwrap())?;
        check_map(&tagged.concat(&other).unwrap())?;
        check_map(&tagged.compose(&other.invert()).unwrap())?;
    }
}
