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

use super::{precheck_compact, read_byte, read_bytes, read_compact_len, DecodeError};
use crate::types::{Field, TypeDef, TypeRegistry, VariantTypeDef};
use crate::value::{Composite, Primitive, Value, Variant};
use codec::{Compact, Decode};

/// Decode a single [`Value`] from the front of `data`, given the type we
/// expect it to decode into. Named types are resolved through `types`.
///
/// Decoding is fully recursive: a variant branch's payload may itself be a
/// variant, composite or primitive, with no depth limit beyond the stack.
pub fn decode_value(data: &mut &[u8], ty: &TypeDef, types: &dyn TypeRegistry) -> Result<Value, DecodeError> {
	log::trace!("Decoding {:?}, {} byte(s) remaining", ty, data.len());

	match ty {
		TypeDef::Bool => match read_byte(data)? {
			0 => Ok(Value::bool(false)),
			1 => Ok(Value::bool(true)),
			_ => Err(DecodeError::Codec("invalid boolean byte".into())),
		},
		TypeDef::U8 => Ok(Value::u8(read_byte(data)?)),
		TypeDef::U16 => {
			let bytes: [u8; 2] = read_bytes(data, 2)?.try_into().expect("2 bytes read; qed");
			Ok(Value::u16(u16::from_le_bytes(bytes)))
		}
		TypeDef::U32 => {
			let bytes: [u8; 4] = read_bytes(data, 4)?.try_into().expect("4 bytes read; qed");
			Ok(Value::u32(u32::from_le_bytes(bytes)))
		}
		TypeDef::U64 => {
			let bytes: [u8; 8] = read_bytes(data, 8)?.try_into().expect("8 bytes read; qed");
			Ok(Value::u64(u64::from_le_bytes(bytes)))
		}
		TypeDef::U128 => {
			let bytes: [u8; 16] = read_bytes(data, 16)?.try_into().expect("16 bytes read; qed");
			Ok(Value::u128(u128::from_le_bytes(bytes)))
		}
		TypeDef::U256 => {
			let bytes: [u8; 32] = read_bytes(data, 32)?.try_into().expect("32 bytes read; qed");
			Ok(Value::Primitive(Primitive::U256(bytes)))
		}
		TypeDef::Compact(inner) => decode_compact(data, inner, types),
		TypeDef::ByteArray(len) => {
			let bytes = read_bytes(data, *len)?;
			Ok(Value::bytes(bytes))
		}
		TypeDef::Bytes => {
			let len = read_compact_len(data)?;
			let bytes = read_bytes(data, len)?;
			Ok(Value::bytes(bytes))
		}
		TypeDef::Sequence(inner) => {
			let len = read_compact_len(data)?;
			log::trace!("Sequence of {} item(s)", len);
			let mut values = Vec::with_capacity(len);
			for _ in 0..len {
				values.push(decode_value(data, inner, types)?);
			}
			Ok(Value::unnamed_composite(values))
		}
		TypeDef::Option(inner) => match read_byte(data)? {
			0 => Ok(Value::none()),
			1 => Ok(Value::some(decode_value(data, inner, types)?)),
			b => Err(DecodeError::InvalidOptionFlag(b)),
		},
		TypeDef::Composite(fields) => Ok(Value::Composite(decode_composite(data, fields, types)?)),
		TypeDef::Variant(variant) => Ok(Value::Variant(decode_variant(data, variant, types)?)),
		TypeDef::TypePointer(name) => {
			log::trace!("Resolving type pointer `{}`", name);
			let ty = types.resolve(name).ok_or_else(|| DecodeError::TypeNotFound(name.clone()))?;
			decode_value(data, ty, types)
		}
	}
}

/// Decode the fields of a composite in declared order. Produces a named
/// composite only when every field carries a name.
fn decode_composite(data: &mut &[u8], fields: &[Field], types: &dyn TypeRegistry) -> Result<Composite, DecodeError> {
	let named = !fields.is_empty() && fields.iter().all(|f| f.name.is_some());

	if named {
		let mut values = Vec::with_capacity(fields.len());
		for field in fields {
			let value = decode_value(data, &field.ty, types)?;
			values.push((field.name.clone().expect("all fields named; qed"), value));
		}
		Ok(Composite::Named(values))
	} else {
		let mut values = Vec::with_capacity(fields.len());
		for field in fields {
			values.push(decode_value(data, &field.ty, types)?);
		}
		Ok(Composite::Unnamed(values))
	}
}

/// Read one discriminant byte and decode the payload of the branch it
/// selects. A byte that matches no branch fails before any payload bytes
/// are consumed.
pub(crate) fn decode_variant(
	data: &mut &[u8],
	variant: &VariantTypeDef,
	types: &dyn TypeRegistry,
) -> Result<Variant, DecodeError> {
	let discriminant = read_byte(data)?;
	let branch = variant
		.branch_by_discriminant(discriminant)
		.ok_or(DecodeError::UnknownDiscriminant(discriminant))?;
	log::trace!("Discriminant {:#04x} selects branch `{}`", discriminant, branch.name);

	let value = branch.payload.as_ref().map(|ty| decode_value(data, ty, types)).transpose()?;
	Ok(Variant::new(branch.name.clone(), value))
}

fn decode_compact(data: &mut &[u8], inner: &TypeDef, types: &dyn TypeRegistry) -> Result<Value, DecodeError> {
	precheck_compact(data)?;
	match inner {
		TypeDef::U8 => Ok(Value::u8(<Compact<u8>>::decode(data)?.0)),
		TypeDef::U16 => Ok(Value::u16(<Compact<u16>>::decode(data)?.0)),
		TypeDef::U32 => Ok(Value::u32(<Compact<u32>>::decode(data)?.0)),
		TypeDef::U64 => Ok(Value::u64(<Compact<u64>>::decode(data)?.0)),
		TypeDef::U128 => Ok(Value::u128(<Compact<u128>>::decode(data)?.0)),
		TypeDef::TypePointer(name) => {
			let ty = types.resolve(name).ok_or_else(|| DecodeError::TypeNotFound(name.clone()))?;
			decode_compact(data, ty, types)
		}
		other => Err(DecodeError::UnsupportedCompact(format!("{:?}", other))),
	}
}
