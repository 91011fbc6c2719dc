/*
 * Created on Mon Feb 12 2024
 *
 * This file is a part of Skytable
 * Skytable (formerly known as TerrabaseDB or Skybase) is a free and open-source
 * NoSQL database written by Sayan Nandan ("the Author") with the
 * vision to provide flexibility in data modelling without compromising
 * on performance, queryability or scalability.
 *
 * Copyright (c) 2024, Sayan Nandan <ohsayan@outlook.com>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! Error kinds for the swap core (see `ActionError` for the analogous wire-facing
//! pattern used by the rest of the server).

use std::fmt;

pub type SwapResult<T> = Result<T, SwapError>;

/// The error kinds a swap request can fail with.
///
/// A request's error never aborts its sibling requests in the same batch; see
/// `swap::request::Batch::errors`.
#[derive(Debug)]
pub enum SwapError {
    /// The swap-data analyzer rejected the request: invalid meta, impossible state.
    Analysis(&'static str),
    /// A meta value or data row failed to decode.
    Codec(&'static str),
    /// The underlying store returned an error on get/put/del/iterate/flush/checkpoint.
    Io(String),
    /// Honoring this swap-in would exceed the configured in-flight memory budget.
    Oom,
    /// The engine reports an unwritable disk; the server has entered degraded mode.
    DiskDegraded,
    /// A util swap request named an intention the executor doesn't recognize.
    UnsupportedUtil,
}

impl SwapError {
    /// Wire-level error string, parallel to `ActionError`'s `RSTRING_*` constants.
    pub const fn wire_str(&self) -> &'static [u8] {
        match self {
            Self::Analysis(_) => b"err-swap-analysis-failure",
            Self::Codec(_) => b"err-swap-codec-failure",
            Self::Io(_) => b"err-swap-io-failure",
            Self::Oom => b"err-swap-oom",
            Self::DiskDegraded => b"err-swap-disk-degraded",
            Self::UnsupportedUtil => b"err-swap-unsupported-util",
        }
    }
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analysis(ctx) => write!(f, "swap analysis failure: {ctx}"),
            Self::Codec(ctx) => write!(f, "swap codec failure: {ctx}"),
            Self::Io(e) => write!(f, "swap io failure: {e}"),
            Self::Oom => write!(f, "swap would exceed the in-flight memory budget"),
            Self::DiskDegraded => write!(f, "swap store is in degraded mode (disk unwritable)"),
            Self::UnsupportedUtil => write!(f, "unsupported swap util intention"),
        }
    }
}

impl std::error::Error for SwapError {}

impl From<rocksdb::Error> for SwapError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<std::io::Error> for SwapError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
