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

use crate::decoder::{DecodeError, EncodeError};
use crate::metadata::{MetadataError, SpecVersion};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
	#[error(transparent)]
	Decode(#[from] DecodeError),
	#[error(transparent)]
	Encode(#[from] EncodeError),
	#[error(transparent)]
	Metadata(#[from] MetadataError),
	#[error("Spec version {0} not registered with decoder")]
	SpecVersionNotFound(SpecVersion),
}
