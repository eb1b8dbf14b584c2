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

//! Self-describing type definitions. A [`TypeDef`] is the decode/encode
//! contract for one runtime type; the chain-specific catalogue of named
//! types is supplied as data behind the [`TypeRegistry`] trait and can be
//! swapped out independently of the codec.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Describes the wire shape of a single runtime type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDef {
	Bool,
	U8,
	U16,
	U32,
	U64,
	/// 128-bit unsigned integer, 16 little-endian bytes.
	U128,
	/// 256-bit unsigned integer, 32 little-endian bytes.
	U256,
	/// Compact (variable-length) encoding of the inner integer type.
	Compact(Box<TypeDef>),
	/// Fixed-width byte array, eg 20-byte addresses or 32-byte hashes.
	ByteArray(usize),
	/// Byte vector prefixed with a compact-encoded length.
	Bytes,
	/// Sequence of values of one type, prefixed with a compact-encoded length.
	Sequence(Box<TypeDef>),
	/// Presence flag followed by the payload iff present.
	Option(Box<TypeDef>),
	/// Ordered fields, no discriminant. Field order is part of the type's
	/// identity.
	Composite(Vec<Field>),
	/// Discriminant-tagged union.
	Variant(VariantTypeDef),
	/// A named type to be resolved through a [`TypeRegistry`].
	TypePointer(String),
}

impl TypeDef {
	pub fn pointer(name: impl Into<String>) -> TypeDef {
		TypeDef::TypePointer(name.into())
	}
}

/// One field of a composite type. Anonymous sub-records (eg the two halves
/// of a trading pair) are fields without names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
	pub name: Option<String>,
	pub ty: TypeDef,
}

impl Field {
	pub fn named(name: impl Into<String>, ty: TypeDef) -> Self {
		Self { name: Some(name.into()), ty }
	}

	pub fn unnamed(ty: TypeDef) -> Self {
		Self { name: None, ty }
	}
}

/// One branch of a variant type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDef {
	/// Branch name, unique within the variant type.
	pub name: String,
	/// The byte that selects this branch on the wire.
	pub discriminant: u8,
	/// The payload that follows the discriminant, if any.
	pub payload: Option<TypeDef>,
}

impl VariantDef {
	pub fn new(name: impl Into<String>, discriminant: u8, payload: TypeDef) -> Self {
		Self { name: name.into(), discriminant, payload: Some(payload) }
	}

	/// A branch with no payload.
	pub fn unit(name: impl Into<String>, discriminant: u8) -> Self {
		Self { name: name.into(), discriminant, payload: None }
	}
}

/// A closed set of branches. Constructing one checks that no two branches
/// share a discriminant byte or a name, so a colliding schema is rejected
/// before it can ever decode ambiguously.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<VariantDef>")]
pub struct VariantTypeDef {
	branches: Vec<VariantDef>,
}

impl VariantTypeDef {
	pub fn new(branches: Vec<VariantDef>) -> Result<Self, TypeDefError> {
		for (i, branch) in branches.iter().enumerate() {
			for other in &branches[i + 1..] {
				if branch.discriminant == other.discriminant {
					return Err(TypeDefError::DuplicateDiscriminant {
						discriminant: branch.discriminant,
						first: branch.name.clone(),
						second: other.name.clone(),
					});
				}
				if branch.name == other.name {
					return Err(TypeDefError::DuplicateBranchName(branch.name.clone()));
				}
			}
		}
		Ok(Self { branches })
	}

	pub fn branches(&self) -> &[VariantDef] {
		&self.branches
	}

	pub fn branch_by_discriminant(&self, discriminant: u8) -> Option<&VariantDef> {
		self.branches.iter().find(|b| b.discriminant == discriminant)
	}

	pub fn branch_by_name(&self, name: &str) -> Option<&VariantDef> {
		self.branches.iter().find(|b| b.name == name)
	}
}

impl TryFrom<Vec<VariantDef>> for VariantTypeDef {
	type Error = TypeDefError;
	fn try_from(branches: Vec<VariantDef>) -> Result<Self, Self::Error> {
		Self::new(branches)
	}
}

impl Serialize for VariantTypeDef {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.branches.serialize(serializer)
	}
}

/// Errors raised while constructing type definitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeDefError {
	#[error("branches `{first}` and `{second}` both encode as discriminant {discriminant:#04x}")]
	DuplicateDiscriminant { discriminant: u8, first: String, second: String },
	#[error("branch name `{0}` declared twice")]
	DuplicateBranchName(String),
}

/// Resolves named types out of a chain-specific catalogue.
///
/// The catalogue itself is data, regenerated whenever the chain's schema
/// changes; the codec only ever sees it through this trait.
pub trait TypeRegistry: dyn_clone::DynClone + fmt::Debug + Send + Sync {
	fn resolve(&self, name: &str) -> Option<&TypeDef>;
}

dyn_clone::clone_trait_object!(TypeRegistry);

/// Map-backed [`TypeRegistry`] for catalogues loaded as data.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalogue {
	types: HashMap<String, TypeDef>,
}

impl TypeCatalogue {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a named type, replacing any previous definition.
	pub fn register(&mut self, name: impl Into<String>, ty: TypeDef) -> &mut Self {
		self.types.insert(name.into(), ty);
		self
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

impl TypeRegistry for TypeCatalogue {
	fn resolve(&self, name: &str) -> Option<&TypeDef> {
		self.types.get(name)
	}
}

/// A [`TypeRegistry`] that refuses to resolve anything. Useful when every
/// type in play is described inline.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTypes;

impl TypeRegistry for NoTypes {
	fn resolve(&self, _: &str) -> Option<&TypeDef> {
		None
	}
}
