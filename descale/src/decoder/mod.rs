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

//! Encode and decode values described by a [`crate::types::TypeDef`].
//!
//! The byte cursor throughout this module is a `&mut &[u8]`: decoding
//! consumes bytes from the front of the slice, and the number of bytes
//! consumed can be recovered by comparing slice lengths. A failed decode
//! never returns a partial value; nested failures abort the enclosing
//! decode and propagate unchanged.

mod decode_value;
mod encode_value;
mod events;

pub use decode_value::decode_value;
pub use encode_value::{encode_value, encode_value_to};
pub use events::{decode_events, EventRecord, Phase};

use codec::{Compact, Decode};

/// Errors that can occur while decoding bytes into a value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
	#[error("unexpected end of input: needed {needed} byte(s), {remaining} remaining")]
	UnexpectedEof { needed: usize, remaining: usize },
	#[error("no branch matches discriminant byte {0:#04x}")]
	UnknownDiscriminant(u8),
	#[error("invalid option flag byte {0:#04x}")]
	InvalidOptionFlag(u8),
	#[error("failed to resolve type pointer `{0}`")]
	TypeNotFound(String),
	#[error("compact encoding is not supported for {0}")]
	UnsupportedCompact(String),
	#[error("failed to decode: {0}")]
	Codec(#[from] codec::Error),
}

/// Errors that can occur while encoding a value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
	#[error("no active branch: `{0}` is not a branch of the target variant type")]
	NoActiveBranch(String),
	#[error("value {value} does not fit the target type: expected {expected}")]
	WrongShape { expected: String, value: String },
	#[error("byte array length mismatch: expected {expected} byte(s), got {got}")]
	WrongLength { expected: usize, got: usize },
	#[error("failed to resolve type pointer `{0}`")]
	TypeNotFound(String),
	#[error("compact encoding is not supported for {0}")]
	UnsupportedCompact(String),
}

/// Read one byte off the front of the cursor.
pub(crate) fn read_byte(data: &mut &[u8]) -> Result<u8, DecodeError> {
	let &byte = data.first().ok_or(DecodeError::UnexpectedEof { needed: 1, remaining: 0 })?;
	*data = &data[1..];
	Ok(byte)
}

/// Read exactly `len` bytes off the front of the cursor.
pub(crate) fn read_bytes<'a>(data: &mut &'a [u8], len: usize) -> Result<&'a [u8], DecodeError> {
	if data.len() < len {
		return Err(DecodeError::UnexpectedEof { needed: len, remaining: data.len() });
	}
	let (bytes, rest) = data.split_at(len);
	*data = rest;
	Ok(bytes)
}

/// How many bytes a compact integer occupies, judged from its first byte.
fn compact_width(first: u8) -> usize {
	match first & 0b11 {
		0b00 => 1,
		0b01 => 2,
		0b10 => 4,
		_ => 1 + (first >> 2) as usize + 4,
	}
}

/// Check that the full compact encoding is present before handing the cursor
/// to [`codec`], so truncation surfaces as [`DecodeError::UnexpectedEof`]
/// rather than an opaque codec error.
pub(crate) fn precheck_compact(data: &&[u8]) -> Result<(), DecodeError> {
	let &first = data.first().ok_or(DecodeError::UnexpectedEof { needed: 1, remaining: 0 })?;
	let needed = compact_width(first);
	if data.len() < needed {
		return Err(DecodeError::UnexpectedEof { needed, remaining: data.len() });
	}
	Ok(())
}

/// Decode a compact length prefix (item counts, byte vector lengths).
pub(crate) fn read_compact_len(data: &mut &[u8]) -> Result<usize, DecodeError> {
	precheck_compact(data)?;
	let len = <Compact<u32>>::decode(data)?;
	Ok(len.0 as usize)
}
