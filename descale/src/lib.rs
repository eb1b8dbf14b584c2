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

//! Decode chain runtime data — event logs, storage values and constants —
//! against a self-describing schema, without the decoding logic knowing the
//! chain's full type catalogue in advance.
//!
//! The schema evolves across runtime upgrades (new variant branches, new
//! fields, renumbered discriminants), so everything here is driven by data:
//! [`types::TypeDef`] describes one wire type, a [`types::TypeRegistry`]
//! supplies the chain-specific catalogue of named types, and
//! [`metadata::Metadata`] describes the pallets of one runtime version.
//! [`Decoder`] ties the three together and keeps one schema per registered
//! spec version.

#![forbid(unsafe_code)]

pub mod decoder;
mod error;
pub mod metadata;
pub mod types;
pub mod value;

mod util;

pub use error::Error;
pub use metadata::{Metadata, SpecVersion, StorageKey};
pub use types::{TypeCatalogue, TypeDef, TypeRegistry};
pub use value::Value;

use decoder::EventRecord;
use std::collections::HashMap;
use std::sync::Arc;

/// Decoder for schema-described runtime data.
///
/// Holds the metadata of every registered runtime version and the
/// chain-specific type catalogue, and maps (spec version, pallet, item)
/// queries onto the generic codec in [`decoder`].
#[derive(Debug, Clone)]
pub struct Decoder {
	versions: HashMap<SpecVersion, Arc<Metadata>>,
	types: Box<dyn TypeRegistry>,
}

impl Decoder {
	/// Create a new decoder with the given type catalogue.
	pub fn new(types: impl TypeRegistry + 'static) -> Self {
		Self { versions: HashMap::new(), types: Box::new(types) }
	}

	/// A decoder whose catalogue resolves nothing; every type in play must
	/// be described inline.
	pub fn with_no_types() -> Self {
		Self::new(types::NoTypes)
	}

	/// Register a runtime version with the decoder. Runtime upgrades swap
	/// in a whole new [`Metadata`] under the new spec version; metadata
	/// already registered is never patched in place, so in-flight readers
	/// holding the [`Arc`] keep a consistent schema.
	pub fn register_version(&mut self, metadata: Arc<Metadata>) {
		self.versions.insert(metadata.spec_version(), metadata);
	}

	/// Check if a metadata version has already been registered.
	pub fn has_version(&self, version: &SpecVersion) -> bool {
		self.versions.contains_key(version)
	}

	/// Get metadata from a runtime version, if registered.
	pub fn version_metadata(&self, version: SpecVersion) -> Option<&Arc<Metadata>> {
		self.versions.get(&version)
	}

	pub fn types(&self) -> &dyn TypeRegistry {
		&*self.types
	}

	fn metadata(&self, version: SpecVersion) -> Result<&Metadata, Error> {
		self.versions.get(&version).map(|m| m.as_ref()).ok_or(Error::SpecVersionNotFound(version))
	}

	/// Derive the lookup key for a storage item of the given runtime
	/// version. `args` are the SCALE-encoded key arguments; their number
	/// must match the arity the schema declares for the item.
	pub fn storage_key(
		&self,
		version: SpecVersion,
		pallet: &str,
		item: &str,
		args: &[&[u8]],
	) -> Result<StorageKey, Error> {
		let meta = self.metadata(version)?;
		Ok(metadata::storage_key(meta, pallet, item, args)?)
	}

	/// Decode the response of a storage query. A `None` response is not an
	/// error: it resolves to the schema's default value for `Default`
	/// entries, and to `Ok(None)` for `Optional` ones.
	pub fn decode_storage_value(
		&self,
		version: SpecVersion,
		pallet: &str,
		item: &str,
		response: Option<&[u8]>,
	) -> Result<Option<Value>, Error> {
		let meta = self.metadata(version)?;
		let entry = meta.storage_entry(pallet, item)?;
		let value_ty = entry.ty().value_type();

		let bytes = match response {
			Some(bytes) => bytes,
			None => match entry.modifier() {
				metadata::StorageEntryModifier::Optional => return Ok(None),
				metadata::StorageEntryModifier::Default => entry.default(),
			},
		};

		let value = decoder::decode_value(&mut &*bytes, value_ty, &*self.types)?;
		Ok(Some(value))
	}

	/// Look up a named constant in the metadata and decode it into a typed
	/// value using its declared type.
	pub fn decode_constant(&self, version: SpecVersion, pallet: &str, name: &str) -> Result<Value, Error> {
		let meta = self.metadata(version)?;
		let constant = meta.constant(pallet, name)?;
		let value = decoder::decode_value(&mut constant.value(), constant.ty(), &*self.types)?;
		Ok(value)
	}

	/// Decode a block's event log. See [`decoder::decode_events`].
	pub fn decode_events(
		&self,
		version: SpecVersion,
		data: &mut &[u8],
	) -> Result<Vec<EventRecord>, (Vec<EventRecord>, Error)> {
		let meta = match self.metadata(version) {
			Ok(meta) => meta,
			Err(e) => return Err((Vec::new(), e)),
		};
		decoder::decode_events(meta, &*self.types, data).map_err(|(records, e)| (records, e.into()))
	}

	/// Decode a value of a named type from the catalogue.
	pub fn decode_value_by_name(&self, name: &str, data: &mut &[u8]) -> Result<Value, Error> {
		let ty = self
			.types
			.resolve(name)
			.ok_or_else(|| Error::Decode(decoder::DecodeError::TypeNotFound(name.to_string())))?;
		Ok(decoder::decode_value(data, ty, &*self.types)?)
	}
}
