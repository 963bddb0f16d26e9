//! Property-based tests for schema bounds and serializer symmetry.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use typed_props::schema::{CharSchema, DateTimeSchema, DoubleSchema, IntSchema, LongSchema};
use typed_props::serializer::{
    CharSerializer, DateTimeSerializer, DoubleSerializer, IntSerializer, LongSerializer,
    StringArraySerializer, StringSerializer,
};
use typed_props::{reason, Value, ValueSerializer};

/// Ordered pair `(lo, hi)` drawn from a strategy.
fn ordered<T: PartialOrd + Copy + std::fmt::Debug>(
    strategy: impl Strategy<Value = T> + Clone,
) -> impl Strategy<Value = (T, T)> {
    (strategy.clone(), strategy).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
}

fn datetime() -> impl Strategy<Value = DateTime<Utc>> + Clone {
    // 1900-01-01 .. 2100-01-01, millisecond precision
    (-2_208_988_800_000i64..4_102_444_800_000i64)
        .prop_filter_map("representable", DateTime::from_timestamp_millis)
}

// Bounded schemas accept exactly their range
proptest! {
    #[test]
    fn int_within_range_validates((min, max) in ordered(any::<i32>()), seed in any::<i32>()) {
        let schema = IntSchema::range(min, max);
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = i64::from(seed).rem_euclid(span);
        let v = Value::Int(i32::try_from(i64::from(min) + offset).unwrap());

        prop_assert!(schema.validate(&v).is_ok());
        let once = schema.convert(&v).unwrap();
        prop_assert_eq!(schema.convert(&once).unwrap(), once.clone());
        prop_assert_eq!(once, v);
    }

    #[test]
    fn int_outside_range_fails_minmax(min in -1000i32..1000, width in 0i32..1000, delta in 1i32..1000) {
        let max = min + width;
        let schema = IntSchema::range(min, max);
        for v in [min - delta, max + delta] {
            let err = schema.validate(&Value::Int(v)).unwrap_err();
            prop_assert_eq!(err.reason, reason::MINMAX);
        }
    }

    #[test]
    fn long_bounds((min, max) in ordered(any::<i64>()), v in any::<i64>()) {
        let schema = LongSchema::range(min, max);
        let result = schema.validate(&Value::Long(v));
        if v >= min && v <= max {
            prop_assert!(result.is_ok());
            prop_assert_eq!(schema.convert(&Value::Long(v)).unwrap(), Value::Long(v));
        } else {
            prop_assert_eq!(result.unwrap_err().reason, reason::MINMAX);
        }
    }

    #[test]
    fn double_bounds((min, max) in ordered(-1e12f64..1e12), v in -2e12f64..2e12) {
        let schema = DoubleSchema::range(min, max);
        let result = schema.validate(&Value::Double(v));
        if v >= min && v <= max {
            prop_assert!(result.is_ok());
            let once = schema.convert(&Value::Double(v)).unwrap();
            prop_assert_eq!(schema.convert(&once).unwrap(), once);
        } else {
            prop_assert_eq!(result.unwrap_err().reason, reason::MINMAX);
        }
    }

    #[test]
    fn char_bounds((min, max) in ordered(any::<char>()), v in any::<char>()) {
        let schema = CharSchema::range(min, max);
        let result = schema.validate(&Value::Char(v));
        if v >= min && v <= max {
            prop_assert!(result.is_ok());
            prop_assert_eq!(schema.convert(&Value::Char(v)).unwrap(), Value::Char(v));
        } else {
            prop_assert_eq!(result.unwrap_err().reason, reason::MINMAX);
        }
    }

    #[test]
    fn datetime_bounds((min, max) in ordered(datetime()), v in datetime()) {
        let schema = DateTimeSchema::range(min, max);
        let result = schema.validate(&Value::DateTime(v));
        if v >= min && v <= max {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result.unwrap_err().reason, reason::MINMAX);
        }
    }

    #[test]
    fn char_schema_equality(min in any::<char>(), max in any::<char>(), nullable in any::<bool>()) {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |s: &CharSchema| {
            let mut h = DefaultHasher::new();
            s.hash(&mut h);
            h.finish()
        };
        let mut a = CharSchema::range(min, max);
        a.common.nullable = nullable;
        let b = a.clone();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash(&a), hash(&b));

        let mut c = a.clone();
        c.max = if max == char::MAX { 'a' } else { char::MAX };
        prop_assert_ne!(&a, &c);
    }
}

// Char binary form is a symmetric 2-byte encoding
proptest! {
    #[test]
    fn char_binary_symmetry(code in 1u32..=0xFFFF) {
        prop_assume!(char::from_u32(code).is_some());
        let c = char::from_u32(code).unwrap();
        let s = CharSerializer;

        let bytes = s.to_binary(&Value::Char(c)).unwrap();
        prop_assert_eq!(bytes.len(), 2);
        let decoded = s.from_binary(&bytes).unwrap();
        prop_assert_eq!(s.to_binary(&decoded).unwrap(), bytes);
        prop_assert_eq!(decoded, Value::Char(c));
    }

    #[test]
    fn char_beyond_two_bytes_rejected(code in 0x10000u32..=0x10FFFF) {
        let c = char::from_u32(code).unwrap();
        prop_assert!(CharSerializer.to_binary(&Value::Char(c)).is_err());
    }
}

#[test]
fn char_binary_absent_is_zero_pair() {
    assert_eq!(CharSerializer.to_binary(&Value::Null).unwrap(), vec![0, 0]);
    assert_eq!(CharSerializer.from_binary(&[0, 0]).unwrap(), Value::Null);
}

// JSON symmetry for scalar kinds
proptest! {
    #[test]
    fn json_symmetry_int(v in any::<i32>()) {
        let value = Value::Int(v);
        prop_assert_eq!(IntSerializer.from_json(&IntSerializer.to_json(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn json_symmetry_long(v in any::<i64>()) {
        let value = Value::Long(v);
        prop_assert_eq!(LongSerializer.from_json(&LongSerializer.to_json(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn json_symmetry_double(v in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
        let value = Value::Double(v);
        let json = DoubleSerializer.to_json(&value).unwrap();
        prop_assert_eq!(DoubleSerializer.from_json(&json).unwrap(), value);
    }

    #[test]
    fn json_symmetry_char(c in any::<char>()) {
        let value = Value::Char(c);
        prop_assert_eq!(CharSerializer.from_json(&CharSerializer.to_json(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn json_symmetry_datetime(dt in datetime()) {
        let value = Value::DateTime(dt);
        let json = DateTimeSerializer.to_json(&value).unwrap();
        prop_assert_eq!(DateTimeSerializer.from_json(&json).unwrap(), value);
    }

    #[test]
    fn json_symmetry_string(s in ".+") {
        let value = Value::String(s);
        prop_assert_eq!(StringSerializer.from_json(&StringSerializer.to_json(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn json_symmetry_string_array(items in proptest::collection::vec(".*", 0..5)) {
        let value = Value::StringList(items);
        let json = StringArraySerializer.to_json(&value).unwrap();
        prop_assert_eq!(StringArraySerializer.from_json(&json).unwrap(), value);
    }
}

#[test]
fn json_absent_is_empty_text() {
    let serializers: [&dyn ValueSerializer; 6] = [
        &IntSerializer,
        &LongSerializer,
        &DoubleSerializer,
        &CharSerializer,
        &DateTimeSerializer,
        &StringArraySerializer,
    ];
    for s in serializers {
        assert_eq!(s.to_json(&Value::Null).unwrap(), "", "{}", s.kind());
        assert_eq!(s.from_json("").unwrap(), Value::Null, "{}", s.kind());
    }
}
