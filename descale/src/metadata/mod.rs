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

//! The in-memory description of a chain's pallets: storage items, named
//! constants and event types. A [`Metadata`] is built once per node
//! connection by an external loader and is immutable afterwards; a runtime
//! upgrade is handled by building a fresh instance under a new spec
//! version, never by patching an existing one.

mod storage;

pub use storage::storage_key;
pub use sp_core::storage::StorageKey;

use crate::types::{TypeDef, VariantTypeDef};
use std::collections::HashMap;
use std::sync::Arc;

/// Spec version type defined in the runtime of a chain.
pub type SpecVersion = u32;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetadataError {
	#[error("Pallet {0} not found")]
	PalletNotFound(String),
	#[error("Storage item {0}.{1} not found")]
	UnknownStorageItem(String, String),
	#[error("could not find constant {0}.{1}")]
	ConstantNotFound(String, String),
	#[error("storage item {pallet}.{item} takes {expected} key argument(s), got {got}")]
	KeyArityMismatch { pallet: String, item: String, expected: usize, got: usize },
}

/// Metadata struct encompassing storage, constants and events of every
/// pallet of one runtime version.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
	spec_version: SpecVersion,
	/// Hashmap of pallets (name -> pallet-specific metadata)
	pallets: HashMap<String, Arc<PalletMetadata>>,
	/// pallets by their index in the runtime event enum
	pallets_by_event_index: HashMap<u8, String>,
}

impl Metadata {
	pub fn new(spec_version: SpecVersion, pallets: Vec<PalletMetadata>) -> Self {
		let pallets: HashMap<_, _> = pallets.into_iter().map(|p| (p.name.clone(), Arc::new(p))).collect();
		let pallets_by_event_index =
			pallets.values().map(|p| (p.index, p.name.clone())).collect();
		Self { spec_version, pallets, pallets_by_event_index }
	}

	pub fn spec_version(&self) -> SpecVersion {
		self.spec_version
	}

	/// Iterate over all pallets.
	pub fn pallets(&self) -> impl Iterator<Item = &PalletMetadata> {
		self.pallets.values().map(|p| p.as_ref())
	}

	pub fn pallet(&self, name: &str) -> Result<&PalletMetadata, MetadataError> {
		self.pallets.get(name).map(|p| p.as_ref()).ok_or_else(|| MetadataError::PalletNotFound(name.to_string()))
	}

	pub fn pallet_exists(&self, name: &str) -> bool {
		self.pallets.contains_key(name)
	}

	/// Get a pallet by its index in the runtime event enum.
	pub fn pallet_by_event_index(&self, index: u8) -> Option<&PalletMetadata> {
		self.pallets_by_event_index.get(&index).and_then(|name| self.pallets.get(name)).map(|p| p.as_ref())
	}

	/// Look up a named constant's metadata. The schema is small and loaded
	/// once, so this is a scan with no caching.
	pub fn constant(&self, pallet: &str, name: &str) -> Result<&ConstantMetadata, MetadataError> {
		self.pallets
			.get(pallet)
			.and_then(|p| p.constants.get(name))
			.ok_or_else(|| MetadataError::ConstantNotFound(pallet.to_string(), name.to_string()))
	}

	pub fn storage_entry(&self, pallet: &str, item: &str) -> Result<&StorageEntryMetadata, MetadataError> {
		self.pallets
			.get(pallet)
			.and_then(|p| p.storage.get(item))
			.ok_or_else(|| MetadataError::UnknownStorageItem(pallet.to_string(), item.to_string()))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PalletMetadata {
	/// name of the pallet
	name: String,
	/// index of the pallet within the runtime event enum
	index: u8,
	/// Name of storage entry -> metadata of storage entry
	storage: HashMap<String, StorageEntryMetadata>,
	/// Name of constant -> metadata of constant
	constants: HashMap<String, ConstantMetadata>,
	/// The pallet's event enum, if it emits events.
	events: Option<VariantTypeDef>,
}

impl PalletMetadata {
	pub fn new(name: impl Into<String>, index: u8) -> Self {
		Self {
			name: name.into(),
			index,
			storage: HashMap::new(),
			constants: HashMap::new(),
			events: None,
		}
	}

	pub fn with_storage(mut self, entry: StorageEntryMetadata) -> Self {
		self.storage.insert(entry.name.clone(), entry);
		self
	}

	pub fn with_constant(mut self, constant: ConstantMetadata) -> Self {
		self.constants.insert(constant.name.clone(), constant);
		self
	}

	pub fn with_events(mut self, events: VariantTypeDef) -> Self {
		self.events = Some(events);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn index(&self) -> u8 {
		self.index
	}

	pub fn events(&self) -> Option<&VariantTypeDef> {
		self.events.as_ref()
	}

	/// Iterate over all storage entries of this pallet.
	pub fn storage_entries(&self) -> impl Iterator<Item = &StorageEntryMetadata> {
		self.storage.values()
	}

	pub fn constants(&self) -> impl Iterator<Item = &ConstantMetadata> {
		self.constants.values()
	}
}

/// A named constant baked into the runtime: its declared type and the raw
/// bytes of its value, straight out of the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantMetadata {
	name: String,
	ty: TypeDef,
	value: Vec<u8>,
}

impl ConstantMetadata {
	pub fn new(name: impl Into<String>, ty: TypeDef, value: Vec<u8>) -> Self {
		Self { name: name.into(), ty, value }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn ty(&self) -> &TypeDef {
		&self.ty
	}

	/// The constant's raw bytes as stored in the schema.
	pub fn value(&self) -> &[u8] {
		&self.value
	}
}

/// Whether a missing storage value means `None` or the declared default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageEntryModifier {
	Optional,
	Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageEntryMetadata {
	name: String,
	modifier: StorageEntryModifier,
	ty: StorageType,
	/// Raw bytes of the default value, decoded when a query returns nothing
	/// and the modifier is [`StorageEntryModifier::Default`].
	default: Vec<u8>,
}

impl StorageEntryMetadata {
	pub fn new(name: impl Into<String>, modifier: StorageEntryModifier, ty: StorageType, default: Vec<u8>) -> Self {
		Self { name: name.into(), modifier, ty, default }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn modifier(&self) -> StorageEntryModifier {
		self.modifier
	}

	pub fn ty(&self) -> &StorageType {
		&self.ty
	}

	pub fn default(&self) -> &[u8] {
		&self.default
	}
}

/// The lookup shape of a storage item. The arity and the hasher for each
/// key position are declared by the schema, not fixed globally.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageType {
	Plain(TypeDef),
	Map {
		hasher: StorageHasher,
		key: TypeDef,
		value: TypeDef,
	},
	DoubleMap {
		hasher: StorageHasher,
		key1: TypeDef,
		key2_hasher: StorageHasher,
		key2: TypeDef,
		value: TypeDef,
	},
}

impl StorageType {
	/// The type of the value stored under this item.
	pub fn value_type(&self) -> &TypeDef {
		match self {
			StorageType::Plain(value) => value,
			StorageType::Map { value, .. } => value,
			StorageType::DoubleMap { value, .. } => value,
		}
	}

	/// Hashers for each key argument, in lookup order.
	pub fn key_hashers(&self) -> Vec<&StorageHasher> {
		match self {
			StorageType::Plain(_) => Vec::new(),
			StorageType::Map { hasher, .. } => vec![hasher],
			StorageType::DoubleMap { hasher, key2_hasher, .. } => vec![hasher, key2_hasher],
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageHasher {
	Blake2_128,
	Blake2_256,
	Blake2_128Concat,
	Twox128,
	Twox256,
	Twox64Concat,
	Identity,
}

impl StorageHasher {
	/// Hash one encoded key argument the way this hasher puts it on the
	/// wire. The `*Concat` hashers append the original encoded argument
	/// after the digest; `Identity` passes it through untouched.
	pub fn hash(&self, data: &[u8]) -> Vec<u8> {
		match self {
			StorageHasher::Blake2_128 => sp_core::blake2_128(data).to_vec(),
			StorageHasher::Blake2_256 => sp_core::blake2_256(data).to_vec(),
			StorageHasher::Blake2_128Concat => {
				let mut bytes = sp_core::blake2_128(data).to_vec();
				bytes.extend_from_slice(data);
				bytes
			}
			StorageHasher::Twox128 => sp_core::twox_128(data).to_vec(),
			StorageHasher::Twox256 => sp_core::twox_256(data).to_vec(),
			StorageHasher::Twox64Concat => {
				let mut bytes = sp_core::twox_64(data).to_vec();
				bytes.extend_from_slice(data);
				bytes
			}
			StorageHasher::Identity => data.to_vec(),
		}
	}
}
