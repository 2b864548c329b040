//! Argument Encoding Module
//!
//! Turns call arguments into JSON values with a single stable form.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{self, Serialize};
use serde_json::{Map, Value};

// == Encode ==
/// Encodes `value` for use in a cache key.
///
/// Non-finite floats are rejected: JSON has no spelling for them and
/// `serde_json` would quietly turn `NaN`, `inf` and `-inf` into `null`.
pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, String> {
    value.serialize(FiniteCheck).map_err(|err| err.0)?;
    serde_json::to_value(value)
        .map(canonical)
        .map_err(|err| err.to_string())
}

// == Canonical ==
/// Rebuilds every object with its keys in sorted order, at every depth.
///
/// `serde_json::Map` keeps insertion order when the `preserve_order` feature
/// is enabled anywhere in the build, so ordering is not left to it.
pub(crate) fn canonical(value: Value) -> Value {
    match value {
        Value::Object(fields) => {
            let sorted: BTreeMap<String, Value> = fields
                .into_iter()
                .map(|(name, field)| (name, canonical(field)))
                .collect();
            Value::Object(sorted.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonical).collect()),
        other => other,
    }
}

// == Finite Check ==
/// Serializer that produces nothing and fails on the first non-finite float.
#[derive(Clone, Copy)]
struct FiniteCheck;

#[derive(Debug)]
struct NonFinite(String);

impl fmt::Display for NonFinite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NonFinite {}

impl ser::Error for NonFinite {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        NonFinite(msg.to_string())
    }
}

fn check_float(value: f64) -> Result<(), NonFinite> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(NonFinite(format!(
            "non-finite float {} has no stable encoding",
            value
        )))
    }
}

impl ser::Serializer for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_f32(self, v: f32) -> Result<(), NonFinite> {
        check_float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), NonFinite> {
        check_float(v)
    }

    fn serialize_bool(self, _v: bool) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_char(self, _v: char) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), NonFinite> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), NonFinite> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), NonFinite> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), NonFinite> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, NonFinite> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFinite> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFinite> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), NonFinite> {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFinite> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), NonFinite> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFinite> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), NonFinite> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFinite> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), NonFinite> {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), NonFinite> {
        key.serialize(*self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFinite> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), NonFinite> {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), NonFinite> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), NonFinite> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = NonFinite;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), NonFinite> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), NonFinite> {
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Reading {
        sensor: &'static str,
        value: f32,
    }

    #[test]
    fn test_finite_floats_encode() {
        assert_eq!(encode(&1.5f64).unwrap(), json!(1.5));
        assert_eq!(encode(&vec![0.0f32, -2.0]).unwrap(), json!([0.0, -2.0]));
    }

    #[test]
    fn test_non_finite_floats_are_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = encode(&value).unwrap_err();
            assert!(err.contains("non-finite"), "{}", err);
        }
    }

    #[test]
    fn test_nested_non_finite_is_rejected() {
        assert!(encode(&Some(vec![(1, f64::NAN)])).is_err());
        assert!(encode(&Reading {
            sensor: "t1",
            value: f32::INFINITY
        })
        .is_err());
    }

    #[test]
    fn test_none_still_encodes_as_null() {
        assert_eq!(encode(&None::<f64>).unwrap(), Value::Null);
    }

    #[test]
    fn test_canonical_sorts_nested_objects() {
        let mut inner = Map::new();
        inner.insert("zeta".into(), json!(1));
        inner.insert("alpha".into(), json!(2));
        let mut outer = Map::new();
        outer.insert("b".into(), Value::Object(inner));
        outer.insert("a".into(), json!([{"y": 1, "x": 2}]));

        let text = serde_json::to_string(&canonical(Value::Object(outer))).unwrap();
        assert_eq!(
            text,
            r#"{"a":[{"x":2,"y":1}],"b":{"alpha":2,"zeta":1}}"#
        );
    }
}
