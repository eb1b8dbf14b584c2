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

use super::{Metadata, MetadataError};
use sp_core::storage::StorageKey;
use sp_core::twox_128;

/// Derive the lookup key for a storage item:
/// `twox_128(pallet) ++ twox_128(item) ++ hash(arg)..`, one hashed argument
/// per key position declared by the schema, each with the hasher the schema
/// declares for that position.
///
/// `args` are the SCALE-encoded key arguments. A pure function of its
/// inputs; the same (pallet, item, args) against the same schema always
/// produces the identical key.
pub fn storage_key(
	metadata: &Metadata,
	pallet: &str,
	item: &str,
	args: &[&[u8]],
) -> Result<StorageKey, MetadataError> {
	let entry = metadata.storage_entry(pallet, item)?;
	let hashers = entry.ty().key_hashers();

	if hashers.len() != args.len() {
		return Err(MetadataError::KeyArityMismatch {
			pallet: pallet.to_string(),
			item: item.to_string(),
			expected: hashers.len(),
			got: args.len(),
		});
	}

	let mut key = twox_128(pallet.as_bytes()).to_vec();
	key.extend(twox_128(item.as_bytes()));
	for (hasher, arg) in hashers.iter().zip(args) {
		key.extend(hasher.hash(arg));
	}

	log::trace!("Storage key for {}.{}: 0x{}", pallet, item, hex::encode(&key));
	Ok(StorageKey(key))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metadata::{PalletMetadata, StorageEntryMetadata, StorageEntryModifier, StorageHasher, StorageType};
	use crate::types::TypeDef;
	use codec::Encode;

	fn test_metadata() -> Metadata {
		let system = PalletMetadata::new("System", 0).with_storage(StorageEntryMetadata::new(
			"Account",
			StorageEntryModifier::Default,
			StorageType::Map {
				hasher: StorageHasher::Blake2_128Concat,
				key: TypeDef::ByteArray(32),
				value: TypeDef::pointer("AccountInfo"),
			},
			Vec::new(),
		));
		let timestamp = PalletMetadata::new("Timestamp", 3).with_storage(StorageEntryMetadata::new(
			"Now",
			StorageEntryModifier::Default,
			StorageType::Plain(TypeDef::U64),
			0u64.encode(),
		));
		let tokens = PalletMetadata::new("Tokens", 5).with_storage(StorageEntryMetadata::new(
			"Accounts",
			StorageEntryModifier::Default,
			StorageType::DoubleMap {
				hasher: StorageHasher::Blake2_128Concat,
				key1: TypeDef::ByteArray(32),
				key2_hasher: StorageHasher::Twox64Concat,
				key2: TypeDef::pointer("CurrencyId"),
				value: TypeDef::U128,
			},
			Vec::new(),
		));
		Metadata::new(2022, vec![system, timestamp, tokens])
	}

	#[test]
	fn should_generate_correct_prefix() {
		let meta = test_metadata();
		let key = storage_key(&meta, "Timestamp", "Now", &[]).unwrap();

		let mut expected = twox_128("Timestamp".as_bytes()).to_vec();
		expected.extend(twox_128("Now".as_bytes()));
		assert_eq!(key.0, expected);
	}

	#[test]
	fn map_arguments_are_hashed_with_the_declared_hasher() {
		let meta = test_metadata();
		let account = [1u8; 32];
		let key = storage_key(&meta, "System", "Account", &[&account]).unwrap();

		let mut expected = twox_128("System".as_bytes()).to_vec();
		expected.extend(twox_128("Account".as_bytes()));
		expected.extend(sp_core::blake2_128(&account));
		expected.extend(account);
		assert_eq!(key.0, expected);
	}

	#[test]
	fn double_maps_hash_each_argument_with_its_own_hasher() {
		let meta = test_metadata();
		let account = [1u8; 32];
		let currency = [0u8, 0u8];
		let key = storage_key(&meta, "Tokens", "Accounts", &[&account, &currency]).unwrap();

		let mut expected = twox_128("Tokens".as_bytes()).to_vec();
		expected.extend(twox_128("Accounts".as_bytes()));
		expected.extend(sp_core::blake2_128(&account));
		expected.extend(account);
		expected.extend(sp_core::twox_64(&currency));
		expected.extend(currency);
		assert_eq!(key.0, expected);
	}

	#[test]
	fn keys_are_deterministic() {
		let meta = test_metadata();
		let account = [9u8; 32];
		let first = storage_key(&meta, "System", "Account", &[&account]).unwrap();
		let second = storage_key(&meta, "System", "Account", &[&account]).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn unknown_items_and_wrong_arity_fail() {
		let meta = test_metadata();
		assert_eq!(
			storage_key(&meta, "System", "BlockHash", &[]).unwrap_err(),
			MetadataError::UnknownStorageItem("System".to_string(), "BlockHash".to_string())
		);
		assert_eq!(
			storage_key(&meta, "Timestamp", "Now", &[&[1u8][..]]).unwrap_err(),
			MetadataError::KeyArityMismatch {
				pallet: "Timestamp".to_string(),
				item: "Now".to_string(),
				expected: 0,
				got: 1,
			}
		);
	}
}
