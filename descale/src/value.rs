// Copyright 2021 Parity Technologies (UK) Ltd.
// This file is part of descale.
//
// descale is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// descale is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with descale.  If not, see <http://www.gnu.org/licenses/>.

//! Runtime representation of decoded values (much like `serde_json::Value`
//! is a runtime representation of JSON data). A [`Value`] only keeps enough
//! shape to be re-encoded against the [`crate::types::TypeDef`] it was
//! decoded from.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A decoded value of any schema-described type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
	/// A named or unnamed struct-like, array-like or tuple-like set of values.
	Composite(Composite),
	/// One active branch of a tagged union.
	Variant(Variant),
	/// An optional value.
	Option(Box<Option<Value>>),
	/// Any of the primitive values we can have.
	Primitive(Primitive),
}

/// A named or unnamed set of values. Used to represent composite values on
/// their own, sequences, and the payload of multi-field variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Composite {
	/// Eg `{ numerator: 2, denominator: 5 }`
	Named(Vec<(String, Value)>),
	/// Eg `(2, false)`
	Unnamed(Vec<Value>),
}

impl Composite {
	/// Number of values stored in this composite.
	pub fn len(&self) -> usize {
		match self {
			Composite::Named(values) => values.len(),
			Composite::Unnamed(values) => values.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

// Named composites serialize as maps so decoded records read naturally as
// JSON; unnamed ones as plain sequences.
impl Serialize for Composite {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Composite::Named(fields) => {
				let mut map = serializer.serialize_map(Some(fields.len()))?;
				for (name, value) in fields {
					map.serialize_entry(name, value)?;
				}
				map.end()
			}
			Composite::Unnamed(values) => {
				let mut seq = serializer.serialize_seq(Some(values.len()))?;
				for value in values {
					seq.serialize_element(value)?;
				}
				seq.end()
			}
		}
	}
}

/// The value of a specific variant branch: the branch name plus its payload,
/// if the branch declares one. Exactly one branch of a variant type is ever
/// active; there is no way to represent "no branch" or "two branches".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
	/// The name of the active branch.
	pub name: String,
	/// The payload carried by the branch, if any.
	pub value: Option<Box<Value>>,
}

impl Variant {
	pub fn new(name: impl Into<String>, value: Option<Value>) -> Self {
		Self { name: name.into(), value: value.map(Box::new) }
	}

	/// A branch that carries no payload.
	pub fn unit(name: impl Into<String>) -> Self {
		Self { name: name.into(), value: None }
	}
}

/// A "primitive" value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Primitive {
	Bool(bool),
	U8(u8),
	U16(u16),
	U32(u32),
	U64(u64),
	U128(u128),
	/// 256-bit unsigned integer as little-endian bytes.
	#[serde(serialize_with = "crate::util::bytes_as_hex")]
	U256([u8; 32]),
	/// Fixed-width byte arrays and length-prefixed byte vectors.
	#[serde(serialize_with = "crate::util::bytes_as_hex")]
	Bytes(Vec<u8>),
}

impl Value {
	pub fn bool(b: bool) -> Value {
		Value::Primitive(Primitive::Bool(b))
	}
	pub fn u8(n: u8) -> Value {
		Value::Primitive(Primitive::U8(n))
	}
	pub fn u16(n: u16) -> Value {
		Value::Primitive(Primitive::U16(n))
	}
	pub fn u32(n: u32) -> Value {
		Value::Primitive(Primitive::U32(n))
	}
	pub fn u64(n: u64) -> Value {
		Value::Primitive(Primitive::U64(n))
	}
	pub fn u128(n: u128) -> Value {
		Value::Primitive(Primitive::U128(n))
	}
	pub fn bytes(b: impl Into<Vec<u8>>) -> Value {
		Value::Primitive(Primitive::Bytes(b.into()))
	}
	pub fn variant(name: impl Into<String>, value: Option<Value>) -> Value {
		Value::Variant(Variant::new(name, value))
	}
	pub fn some(v: Value) -> Value {
		Value::Option(Box::new(Some(v)))
	}
	pub fn none() -> Value {
		Value::Option(Box::new(None))
	}
	pub fn named_composite(fields: Vec<(String, Value)>) -> Value {
		Value::Composite(Composite::Named(fields))
	}
	pub fn unnamed_composite(values: Vec<Value>) -> Value {
		Value::Composite(Composite::Unnamed(values))
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Composite(c) => write!(f, "{}", c),
			Value::Variant(v) => write!(f, "{}", v),
			Value::Option(o) => match &**o {
				Some(v) => write!(f, "Some({})", v),
				None => write!(f, "None"),
			},
			Value::Primitive(p) => write!(f, "{}", p),
		}
	}
}

impl fmt::Display for Composite {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Composite::Named(fields) => {
				write!(f, "{{ ")?;
				for (i, (name, value)) in fields.iter().enumerate() {
					if i != 0 {
						write!(f, ", ")?;
					}
					write!(f, "{}: {}", name, value)?;
				}
				write!(f, " }}")
			}
			Composite::Unnamed(values) => {
				write!(f, "(")?;
				for (i, value) in values.iter().enumerate() {
					if i != 0 {
						write!(f, ", ")?;
					}
					write!(f, "{}", value)?;
				}
				write!(f, ")")
			}
		}
	}
}

impl fmt::Display for Variant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.value {
			Some(v) => write!(f, "{}({})", self.name, v),
			None => write!(f, "{}", self.name),
		}
	}
}

impl fmt::Display for Primitive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Primitive::Bool(v) => write!(f, "{}", v),
			Primitive::U8(v) => write!(f, "{}", v),
			Primitive::U16(v) => write!(f, "{}", v),
			Primitive::U32(v) => write!(f, "{}", v),
			Primitive::U64(v) => write!(f, "{}", v),
			Primitive::U128(v) => write!(f, "{}", v),
			Primitive::U256(v) => write!(f, "0x{}", hex::encode(v)),
			Primitive::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
		}
	}
}

impl From<Composite> for Value {
	fn from(val: Composite) -> Self {
		Value::Composite(val)
	}
}

impl From<Variant> for Value {
	fn from(val: Variant) -> Self {
		Value::Variant(val)
	}
}

impl From<Primitive> for Value {
	fn from(val: Primitive) -> Self {
		Value::Primitive(val)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_is_compact() {
		let val = Value::variant(
			"DexShare",
			Some(Value::unnamed_composite(vec![Value::u8(0), Value::u8(2)])),
		);
		assert_eq!(val.to_string(), "DexShare((0, 2))");

		let val = Value::named_composite(vec![
			("free".to_string(), Value::u128(100)),
			("reserved".to_string(), Value::u128(0)),
		]);
		assert_eq!(val.to_string(), "{ free: 100, reserved: 0 }");
	}

	#[test]
	fn bytes_serialize_as_hex() {
		let val = Value::bytes(vec![0xde, 0xad, 0xbe, 0xef]);
		let json = serde_json::to_string(&val).unwrap();
		assert_eq!(json, r#""0xdeadbeef""#);
	}

	#[test]
	fn named_composites_serialize_as_maps() {
		let val = Value::named_composite(vec![("free".to_string(), Value::u128(10))]);
		assert_eq!(serde_json::to_string(&val).unwrap(), r#"{"free":10}"#);

		let val = Value::unnamed_composite(vec![Value::u32(1), Value::bool(true)]);
		assert_eq!(serde_json::to_string(&val).unwrap(), r#"[1,true]"#);
	}
}
