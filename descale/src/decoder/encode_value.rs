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

use super::EncodeError;
use crate::types::{Field, TypeDef, TypeRegistry, VariantTypeDef};
use crate::value::{Composite, Primitive, Value, Variant};
use codec::{Compact, Encode};

/// Encode `value` against the type that describes it, returning the bytes.
///
/// Encoding is the exact inverse of [`super::decode_value`]: for every value
/// a type can decode, re-encoding reproduces the original bytes, including
/// the discriminant byte of the active variant branch.
pub fn encode_value(value: &Value, ty: &TypeDef, types: &dyn TypeRegistry) -> Result<Vec<u8>, EncodeError> {
	let mut out = Vec::new();
	encode_value_to(value, ty, types, &mut out)?;
	Ok(out)
}

/// Encode `value` against `ty`, appending the bytes to `out`.
///
/// Nothing is written for a value that fails to encode at the top level;
/// a nested failure leaves the bytes written so far in `out`, so callers
/// composing buffers by hand should treat any error as poisoning the buffer.
pub fn encode_value_to(
	value: &Value,
	ty: &TypeDef,
	types: &dyn TypeRegistry,
	out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
	match ty {
		TypeDef::Bool => match value {
			Value::Primitive(Primitive::Bool(b)) => {
				out.push(*b as u8);
				Ok(())
			}
			_ => Err(wrong_shape("bool", value)),
		},
		TypeDef::U8 => match value {
			Value::Primitive(Primitive::U8(n)) => {
				out.push(*n);
				Ok(())
			}
			_ => Err(wrong_shape("u8", value)),
		},
		TypeDef::U16 => match value {
			Value::Primitive(Primitive::U16(n)) => {
				out.extend(n.to_le_bytes());
				Ok(())
			}
			_ => Err(wrong_shape("u16", value)),
		},
		TypeDef::U32 => match value {
			Value::Primitive(Primitive::U32(n)) => {
				out.extend(n.to_le_bytes());
				Ok(())
			}
			_ => Err(wrong_shape("u32", value)),
		},
		TypeDef::U64 => match value {
			Value::Primitive(Primitive::U64(n)) => {
				out.extend(n.to_le_bytes());
				Ok(())
			}
			_ => Err(wrong_shape("u64", value)),
		},
		// Always the full width, zero-padded, little-endian.
		TypeDef::U128 => match value {
			Value::Primitive(Primitive::U128(n)) => {
				out.extend(n.to_le_bytes());
				Ok(())
			}
			_ => Err(wrong_shape("u128", value)),
		},
		TypeDef::U256 => match value {
			Value::Primitive(Primitive::U256(bytes)) => {
				out.extend(bytes);
				Ok(())
			}
			_ => Err(wrong_shape("u256", value)),
		},
		TypeDef::Compact(inner) => encode_compact(value, inner, types, out),
		TypeDef::ByteArray(len) => match value {
			Value::Primitive(Primitive::Bytes(bytes)) => {
				if bytes.len() != *len {
					return Err(EncodeError::WrongLength { expected: *len, got: bytes.len() });
				}
				out.extend(bytes);
				Ok(())
			}
			_ => Err(wrong_shape("byte array", value)),
		},
		TypeDef::Bytes => match value {
			Value::Primitive(Primitive::Bytes(bytes)) => {
				Compact(bytes.len() as u32).encode_to(out);
				out.extend(bytes);
				Ok(())
			}
			_ => Err(wrong_shape("byte vector", value)),
		},
		TypeDef::Sequence(inner) => match value {
			Value::Composite(Composite::Unnamed(values)) => {
				Compact(values.len() as u32).encode_to(out);
				for value in values {
					encode_value_to(value, inner, types, out)?;
				}
				Ok(())
			}
			_ => Err(wrong_shape("sequence", value)),
		},
		TypeDef::Option(inner) => match value {
			Value::Option(opt) => match &**opt {
				None => {
					out.push(0);
					Ok(())
				}
				Some(value) => {
					out.push(1);
					encode_value_to(value, inner, types, out)
				}
			},
			_ => Err(wrong_shape("option", value)),
		},
		TypeDef::Composite(fields) => match value {
			Value::Composite(composite) => encode_composite(composite, fields, types, out),
			_ => Err(wrong_shape("composite", value)),
		},
		TypeDef::Variant(variant) => match value {
			Value::Variant(val) => encode_variant(val, variant, types, out),
			_ => Err(wrong_shape("variant", value)),
		},
		TypeDef::TypePointer(name) => {
			let ty = types.resolve(name).ok_or_else(|| EncodeError::TypeNotFound(name.clone()))?;
			encode_value_to(value, ty, types, out)
		}
	}
}

/// Write the active branch's discriminant byte, then its payload. A value
/// naming a branch the type does not declare fails before any byte is
/// written.
fn encode_variant(
	value: &Variant,
	variant: &VariantTypeDef,
	types: &dyn TypeRegistry,
	out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
	let branch = variant
		.branch_by_name(&value.name)
		.ok_or_else(|| EncodeError::NoActiveBranch(value.name.clone()))?;

	match (&branch.payload, &value.value) {
		(Some(ty), Some(payload)) => {
			out.push(branch.discriminant);
			encode_value_to(payload, ty, types, out)
		}
		(None, None) => {
			out.push(branch.discriminant);
			Ok(())
		}
		(Some(_), None) => Err(wrong_shape("branch payload", &Value::Variant(value.clone()))),
		(None, Some(_)) => Err(wrong_shape("unit branch", &Value::Variant(value.clone()))),
	}
}

fn encode_composite(
	value: &Composite,
	fields: &[Field],
	types: &dyn TypeRegistry,
	out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
	if value.len() != fields.len() {
		return Err(EncodeError::WrongShape {
			expected: format!("composite of {} field(s)", fields.len()),
			value: format!("composite of {} value(s)", value.len()),
		});
	}

	match value {
		Composite::Named(values) => {
			// Field order is the byte layout; names must line up with the
			// declared order, never get reordered to match.
			for (field, (name, value)) in fields.iter().zip(values) {
				if field.name.as_deref() != Some(name.as_str()) {
					return Err(EncodeError::WrongShape {
						expected: format!("field `{}`", field.name.as_deref().unwrap_or("_")),
						value: format!("field `{}`", name),
					});
				}
				encode_value_to(value, &field.ty, types, out)?;
			}
			Ok(())
		}
		Composite::Unnamed(values) => {
			for (field, value) in fields.iter().zip(values) {
				encode_value_to(value, &field.ty, types, out)?;
			}
			Ok(())
		}
	}
}

fn encode_compact(
	value: &Value,
	inner: &TypeDef,
	types: &dyn TypeRegistry,
	out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
	match (inner, value) {
		(TypeDef::U8, Value::Primitive(Primitive::U8(n))) => Compact(*n).encode_to(out),
		(TypeDef::U16, Value::Primitive(Primitive::U16(n))) => Compact(*n).encode_to(out),
		(TypeDef::U32, Value::Primitive(Primitive::U32(n))) => Compact(*n).encode_to(out),
		(TypeDef::U64, Value::Primitive(Primitive::U64(n))) => Compact(*n).encode_to(out),
		(TypeDef::U128, Value::Primitive(Primitive::U128(n))) => Compact(*n).encode_to(out),
		(TypeDef::TypePointer(name), _) => {
			let ty = types.resolve(name).ok_or_else(|| EncodeError::TypeNotFound(name.clone()))?;
			return encode_compact(value, ty, types, out);
		}
		(TypeDef::U8 | TypeDef::U16 | TypeDef::U32 | TypeDef::U64 | TypeDef::U128, _) => {
			return Err(wrong_shape("compact integer", value));
		}
		(other, _) => return Err(EncodeError::UnsupportedCompact(format!("{:?}", other))),
	}
	Ok(())
}

fn wrong_shape(expected: &str, value: &Value) -> EncodeError {
	EncodeError::WrongShape { expected: expected.to_string(), value: value.to_string() }
}
