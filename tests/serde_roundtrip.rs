#![cfg(feature = "serde")]

// Serialization round trips across every format in the test stack.
// Restored maps must be equal, of the same type, rebuilt through normal
// construction, and keep insertion order.
use bincode::Options;
use frozen_map::{FrozenMap, HashState, Value};

fn bincode_fixint() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

fn roundtrip_all<T, F>(original: &T, check: F)
where
    T: serde::Serialize + serde::de::DeserializeOwned,
    F: Fn(T),
{
    let json = serde_json::to_string(original).unwrap();
    check(serde_json::from_str(&json).unwrap());

    let pretty = serde_json::to_string_pretty(original).unwrap();
    check(serde_json::from_str(&pretty).unwrap());

    let bytes = bincode::serialize(original).unwrap();
    check(bincode::deserialize(&bytes).unwrap());

    let bytes = bincode_fixint().serialize(original).unwrap();
    check(bincode_fixint().deserialize(&bytes).unwrap());
}

#[test]
fn pickle_style_roundtrip() {
    let fm: FrozenMap<String, i32> = FrozenMap::from_pairs([("a".to_string(), 1), ("b".to_string(), 2)]);
    roundtrip_all(&fm, |restored: FrozenMap<String, i32>| {
        assert_eq!(restored, fm);
        assert!(!FrozenMap::ptr_eq(&restored, &fm));
        assert_eq!(restored.try_hash(), fm.try_hash());
    });
}

#[test]
fn roundtrip_keeps_insertion_order() {
    let fm: FrozenMap<String, i32> = ["z", "m", "a"]
        .iter()
        .enumerate()
        .map(|(i, k)| (k.to_string(), i as i32))
        .collect();
    roundtrip_all(&fm, |restored: FrozenMap<String, i32>| {
        let keys: Vec<&str> = restored.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "m", "a"]);
    });
}

#[test]
fn json_shape_is_a_plain_object() {
    let fm: FrozenMap<String, i32> = FrozenMap::from_pairs([("a".to_string(), 1), ("b".to_string(), 2)]);
    assert_eq!(serde_json::to_string(&fm).unwrap(), r#"{"a":1,"b":2}"#);
    let restored: FrozenMap<String, i32> = serde_json::from_str(r#"{"a":1,"a":5}"#).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored["a"], 5);
}

#[test]
fn unhashable_content_survives_roundtrip() {
    let fm: FrozenMap<String, Value> = FrozenMap::from_pairs([
        ("a".to_string(), Value::List(vec![Value::Int(1)])),
        ("b".to_string(), Value::Str("x".into())),
        (
            "c".to_string(),
            Value::Map(FrozenMap::from_pairs([("d".to_string(), Value::Float(0.5))])),
        ),
    ]);
    assert!(fm.try_hash().is_err());
    roundtrip_all(&fm, |restored: FrozenMap<String, Value>| {
        assert_eq!(restored, fm);
        // A restored map starts with a fresh cache, then fails the same way.
        assert_eq!(restored.hash_state(), HashState::Unset);
        assert_eq!(restored.try_hash(), fm.try_hash());
    });
}

#[test]
fn reduce_matches_serialized_entries() {
    let fm: FrozenMap<String, i32> = FrozenMap::from_pairs([("a".to_string(), 1), ("b".to_string(), 2)]);
    let reduced = fm.reduce();
    let json = serde_json::to_string(&reduced.args).unwrap();
    assert_eq!(json, r#"[["a",1],["b",2]]"#);
    assert_eq!(reduced.rebuild(), fm);
}
