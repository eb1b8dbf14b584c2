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

use serde::Serializer;

/// Serialize any byte slice as a `0x`-prefixed hex string.
pub fn bytes_as_hex<B: AsRef<[u8]>, S: Serializer>(bytes: B, serializer: S) -> Result<S::Ok, S::Error> {
	let mut hex_str = String::from("0x");
	hex_str.push_str(&hex::encode(bytes.as_ref()));
	serializer.serialize_str(&hex_str)
}
