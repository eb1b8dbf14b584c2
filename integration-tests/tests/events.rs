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

use crate::test_suite::{self, SPEC};
use codec::{Compact, Encode};
use descale::decoder::Phase;
use descale::Value;

/// Currencies.Transferred(Erc20(addr), from, to, amount) in
/// the extrinsic-apply phase, no topics.
fn transferred_record(extrinsic: u32, erc20: [u8; 20], amount: u128) -> Vec<u8> {
	let mut bytes = Phase::ApplyExtrinsic(extrinsic).encode();
	bytes.push(2); // Currencies
	bytes.push(0); // Transferred
	bytes.push(2); // CurrencyId::Erc20
	bytes.extend(erc20);
	bytes.extend([0xaau8; 32]); // from
	bytes.extend([0xbbu8; 32]); // to
	bytes.extend(amount.encode());
	bytes.extend(Compact(0u32).encode());
	bytes
}

#[test]
fn decodes_a_bridge_block_event_log() {
	let _ = pretty_env_logger::try_init();
	let decoder = test_suite::decoder();
	let erc20 = [7u8; 20];

	let mut bytes = Compact(3u32).encode();
	bytes.extend(transferred_record(1, erc20, 1_000_000_000_000));
	// ChainBridge.FungibleTransfer emitted by the same extrinsic:
	bytes.extend(Phase::ApplyExtrinsic(1).encode());
	bytes.push(9); // ChainBridge
	bytes.push(2); // FungibleTransfer
	bytes.push(0); // destination chain
	bytes.extend(77u64.encode()); // nonce
	bytes.extend([1u8; 32]); // resource id
	bytes.extend(1_000_000_000_000u128.encode());
	bytes.extend(vec![0xccu8; 20].encode()); // recipient, length-prefixed
	// And the threshold change at finalization:
	bytes.extend(Phase::Finalization.encode());
	bytes.push(9);
	bytes.push(1); // RelayerThresholdChanged
	bytes.extend(3u32.encode());
	bytes.extend(Compact(0u32).encode());

	let cursor = &mut &*bytes;
	let records = decoder.decode_events(SPEC, cursor).expect("event log decodes");
	assert!(cursor.is_empty());
	assert_eq!(records.len(), 3);

	assert_eq!(records[0].pallet, "Currencies");
	assert_eq!(records[0].event.name, "Transferred");
	assert_eq!(
		records[0].event.value.as_deref(),
		Some(&Value::named_composite(vec![
			("currency".to_string(), Value::variant("Erc20", Some(Value::bytes(erc20.to_vec())))),
			("from".to_string(), Value::bytes(vec![0xaa; 32])),
			("to".to_string(), Value::bytes(vec![0xbb; 32])),
			("amount".to_string(), Value::u128(1_000_000_000_000)),
		]))
	);

	assert_eq!(records[1].pallet, "ChainBridge");
	assert_eq!(records[1].event.name, "FungibleTransfer");

	assert_eq!(records[2].phase, Phase::Finalization);
	assert_eq!(records[2].event.name, "RelayerThresholdChanged");
	assert_eq!(records[2].event.value.as_deref(), Some(&Value::u32(3)));
}

#[test]
fn one_bad_record_keeps_the_decoded_prefix() {
	let decoder = test_suite::decoder();

	let mut bytes = Compact(2u32).encode();
	bytes.extend(transferred_record(4, [7u8; 20], 500));
	// A record from a newer runtime this schema knows nothing about:
	bytes.extend(Phase::Finalization.encode());
	bytes.push(9); // ChainBridge
	bytes.push(9); // no such event variant in this spec version

	let (records, err) = decoder.decode_events(SPEC, &mut &*bytes).unwrap_err();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].event.name, "Transferred");
	assert_eq!(err.to_string(), "no branch matches discriminant byte 0x09");
}

#[test]
fn decoded_events_serialize_to_json() {
	let decoder = test_suite::decoder();
	let erc20 = [7u8; 20];

	let mut bytes = Compact(1u32).encode();
	bytes.extend(transferred_record(0, erc20, 500));

	let records = decoder.decode_events(SPEC, &mut &*bytes).unwrap();
	let json = serde_json::to_value(&records[0]).unwrap();

	assert_eq!(json["pallet"], "Currencies");
	assert_eq!(json["event"]["name"], "Transferred");
	assert_eq!(json["event"]["value"]["currency"]["value"], format!("0x{}", hex::encode(erc20)));
}
