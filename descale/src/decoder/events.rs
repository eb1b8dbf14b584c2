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

//! Decode a block's event log. On the wire this is
//! `Vec<(Phase, RuntimeEvent, Vec<Topic>)>`: a compact count, then per
//! record the phase, one byte selecting the emitting pallet, the pallet's
//! event variant, and the topic hashes.

use super::decode_value::decode_variant;
use super::{read_byte, read_bytes, read_compact_len, DecodeError};
use crate::metadata::Metadata;
use crate::types::TypeRegistry;
use crate::value::Variant;
use codec::{Decode, Encode, Input, Output};
use serde::Serialize;
use sp_core::H256;

/// The execution context an event was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
	/// Applying the extrinsic at the given index in the block.
	ApplyExtrinsic(u32),
	Finalization,
	Initialization,
}

impl Decode for Phase {
	fn decode<I: Input>(input: &mut I) -> Result<Self, codec::Error> {
		match input.read_byte()? {
			0 => Ok(Phase::ApplyExtrinsic(u32::decode(input)?)),
			1 => Ok(Phase::Finalization),
			2 => Ok(Phase::Initialization),
			_ => Err("invalid phase variant".into()),
		}
	}
}

impl Encode for Phase {
	fn encode_to<O: Output + ?Sized>(&self, dest: &mut O) {
		match self {
			Phase::ApplyExtrinsic(index) => {
				dest.push_byte(0);
				index.encode_to(dest);
			}
			Phase::Finalization => dest.push_byte(1),
			Phase::Initialization => dest.push_byte(2),
		}
	}
}

/// One decoded entry of the event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
	pub phase: Phase,
	/// Name of the pallet the event came from.
	pub pallet: String,
	/// The decoded event itself: the active branch of the pallet's event
	/// enum plus its payload.
	pub event: Variant,
	pub topics: Vec<H256>,
}

/// Decode a SCALE encoded event log against the metadata provided.
///
/// Event records carry no per-record length prefix, so a record that fails
/// to decode loses the framing of everything after it: the successfully
/// decoded prefix is handed back along with the error. Isolating bad
/// records beyond that is the consumer's concern.
pub fn decode_events(
	metadata: &Metadata,
	types: &dyn TypeRegistry,
	data: &mut &[u8],
) -> Result<Vec<EventRecord>, (Vec<EventRecord>, DecodeError)> {
	let count = read_compact_len(data).map_err(|e| (Vec::new(), e))?;
	log::trace!("Decoding {} event record(s)", count);

	let mut out = Vec::with_capacity(count);
	for index in 0..count {
		match decode_event_record(metadata, types, data) {
			Ok(record) => out.push(record),
			Err(e) => {
				log::trace!("Event record {} failed to decode: {}", index, e);
				return Err((out, e));
			}
		}
	}
	Ok(out)
}

fn decode_event_record(
	metadata: &Metadata,
	types: &dyn TypeRegistry,
	data: &mut &[u8],
) -> Result<EventRecord, DecodeError> {
	let phase = Phase::decode(data)?;

	// One byte selects the pallet in the runtime event enum; the pallet's
	// own event type describes what follows.
	let pallet_index = read_byte(data)?;
	let events = metadata
		.pallet_by_event_index(pallet_index)
		.and_then(|pallet| pallet.events().map(|events| (pallet.name(), events)));
	let (pallet_name, events) = events.ok_or(DecodeError::UnknownDiscriminant(pallet_index))?;

	let event = decode_variant(data, events, types)?;

	let topic_count = read_compact_len(data)?;
	let mut topics = Vec::with_capacity(topic_count);
	for _ in 0..topic_count {
		topics.push(H256::from_slice(read_bytes(data, 32)?));
	}

	Ok(EventRecord { phase, pallet: pallet_name.to_string(), event, topics })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metadata::PalletMetadata;
	use crate::types::{Field, NoTypes, TypeDef, VariantDef, VariantTypeDef};
	use crate::value::Value;
	use codec::Compact;

	fn test_metadata() -> Metadata {
		let currencies = PalletMetadata::new("Currencies", 2).with_events(
			VariantTypeDef::new(vec![VariantDef::new(
				"Transferred",
				0,
				TypeDef::Composite(vec![
					Field::named("from", TypeDef::ByteArray(32)),
					Field::named("to", TypeDef::ByteArray(32)),
					Field::named("amount", TypeDef::U128),
				]),
			)])
			.unwrap(),
		);
		let bridge = PalletMetadata::new("ChainBridge", 9).with_events(
			VariantTypeDef::new(vec![
				VariantDef::unit("BridgePaused", 0),
				VariantDef::new("ChainWhitelisted", 1, TypeDef::U8),
			])
			.unwrap(),
		);
		Metadata::new(2022, vec![currencies, bridge])
	}

	fn transferred_record_bytes() -> Vec<u8> {
		let mut bytes = Phase::ApplyExtrinsic(1).encode();
		bytes.push(2); // Currencies
		bytes.push(0); // Transferred
		bytes.extend([1u8; 32]);
		bytes.extend([2u8; 32]);
		bytes.extend(750u128.encode());
		bytes.extend(Compact(0u32).encode()); // no topics
		bytes
	}

	#[test]
	fn decodes_a_full_event_log() {
		let _ = pretty_env_logger::try_init();
		let meta = test_metadata();

		let mut bytes = Compact(2u32).encode();
		bytes.extend(transferred_record_bytes());
		bytes.extend(Phase::Finalization.encode());
		bytes.push(9); // ChainBridge
		bytes.push(1); // ChainWhitelisted
		bytes.push(5); // chain id
		bytes.extend(Compact(1u32).encode());
		bytes.extend([3u8; 32]); // one topic

		let cursor = &mut &*bytes;
		let records = decode_events(&meta, &NoTypes, cursor).expect("log decodes");
		assert!(cursor.is_empty());
		assert_eq!(records.len(), 2);

		assert_eq!(records[0].phase, Phase::ApplyExtrinsic(1));
		assert_eq!(records[0].pallet, "Currencies");
		assert_eq!(records[0].event.name, "Transferred");
		assert_eq!(
			records[0].event.value.as_deref(),
			Some(&Value::named_composite(vec![
				("from".to_string(), Value::bytes(vec![1u8; 32])),
				("to".to_string(), Value::bytes(vec![2u8; 32])),
				("amount".to_string(), Value::u128(750)),
			]))
		);
		assert!(records[0].topics.is_empty());

		assert_eq!(records[1].phase, Phase::Finalization);
		assert_eq!(records[1].pallet, "ChainBridge");
		assert_eq!(records[1].event, Variant::new("ChainWhitelisted", Some(Value::u8(5))));
		assert_eq!(records[1].topics, vec![H256::from([3u8; 32])]);
	}

	#[test]
	fn a_bad_record_hands_back_the_decoded_prefix() {
		let meta = test_metadata();

		let mut bytes = Compact(2u32).encode();
		bytes.extend(transferred_record_bytes());
		bytes.extend(Phase::Finalization.encode());
		bytes.push(7); // no pallet has event index 7

		let (records, err) = decode_events(&meta, &NoTypes, &mut &*bytes).unwrap_err();
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].event.name, "Transferred");
		assert_eq!(err, DecodeError::UnknownDiscriminant(7));
	}

	#[test]
	fn unknown_event_variant_is_a_schema_mismatch() {
		let meta = test_metadata();

		let mut bytes = Compact(1u32).encode();
		bytes.extend(Phase::Initialization.encode());
		bytes.push(9); // ChainBridge
		bytes.push(4); // stale schema: no such event in this version

		let (records, err) = decode_events(&meta, &NoTypes, &mut &*bytes).unwrap_err();
		assert!(records.is_empty());
		assert_eq!(err, DecodeError::UnknownDiscriminant(4));
	}
}
