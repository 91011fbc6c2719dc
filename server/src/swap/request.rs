/*
 * Created on Thu Feb 15 2024
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

//! The request/batch/executor pipeline: turns a `KeyRequest`
//! from the command layer into `Intention` + encoded key/data ops, hands the I/O off
//! to the worker pool, and folds the result back into the dataset on the swap server
//! thread.

use crate::swap::codec::DbId;
use crate::swap::data::{Action, Intention, SwapFlags};
use crate::swap::error::{SwapError, SwapResult};

pub type Txid = i64;

/// Which wait-graph level a request is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// blocks every db and key below it (e.g. a full-instance checkpoint).
    Server,
    /// blocks every key in one database (e.g. `FLUSHDB`).
    Db,
    /// blocks only one `(dbid, key)` pair -- the common case.
    Key,
}

/// Which subkeys a request concerns.
#[derive(Debug, Clone, PartialEq)]
pub enum SubkeySpec {
    /// The whole object, however many subkeys that implies.
    WholeKey,
    /// An explicit list. An empty list on `IN` means "load everything"; the type's
    /// `analyze` decides what that means for it.
    Explicit(Vec<Vec<u8>>),
    /// List-style: raw index bounds, inclusive.
    IndexRange { start: i64, end: i64 },
    /// ZSet-style: score bounds, inclusive.
    ScoreRange { min: f64, max: f64 },
    /// Pull at most `n` arbitrary resident-or-disk subkeys (e.g. `HRANDFIELD`).
    Sample(usize),
    /// Bitmap-style: a single bit offset.
    BitOffset(u64),
    /// Bitmap-style: a byte range `[start, end)`.
    BitByteRange { start: u64, end: u64 },
}

/// Input from the command parser: what a command needs from the swap core before it
/// can run against RAM.
#[derive(Debug, Clone)]
pub struct KeyRequest {
    pub level: Level,
    pub dbid: DbId,
    pub key: Vec<u8>,
    pub intention: Intention,
    pub intention_flags: SwapFlags,
    pub subkey_spec: SubkeySpec,
    /// Positions in the original command argv that must be rewritten once the real
    /// (possibly swapped-in) values are known, e.g. `GETRANGE` bounds clamped after
    /// the string's real length is read back from disk.
    pub arg_rewrite: Vec<usize>,
    pub txid: Txid,
    /// Number of subkeys `analyze(OUT)` should pick per eviction round; supplied by
    /// the caller from live config (`swap.evict_step`) rather than hardcoded here.
    pub evict_step: usize,
}

impl KeyRequest {
    pub fn nop(level: Level, dbid: DbId, key: Vec<u8>) -> Self {
        Self {
            level,
            dbid,
            key,
            intention: Intention::Nop,
            intention_flags: SwapFlags::empty(),
            subkey_spec: SubkeySpec::WholeKey,
            arg_rewrite: Vec::new(),
            txid: 0,
            evict_step: 1,
        }
    }
}

/// One admitted, analyzed request waiting on (or running) I/O. `action` and the
/// encoded ops are filled in once `analyze` + `encode_*` have run; `result` is filled
/// in once the worker pool returns.
pub struct SwapRequest {
    pub request: KeyRequest,
    pub intention: Intention,
    pub action: Action,
    pub keys: Vec<(crate::swap::codec::Cf, Vec<u8>)>,
    pub data: Vec<(crate::swap::codec::Cf, Vec<u8>, Vec<u8>)>,
    pub range: Option<(crate::swap::codec::Cf, Vec<u8>, Vec<u8>, Option<usize>)>,
    pub result: Option<SwapResult<crate::swap::data::SwapResultRows>>,
}

impl SwapRequest {
    pub fn new(request: KeyRequest, intention: Intention, action: Action) -> Self {
        Self { request, intention, action, keys: Vec::new(), data: Vec::new(), range: None, result: None }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self.intention, Intention::Nop)
    }
}

/// A group of `SwapRequest`s admitted together (e.g. all the keys touched by one
/// pipeline of commands). Requests in a batch are independent: one failing does not
/// abort its siblings, mirroring `ActionError`'s per-action isolation in the action
/// dispatch table.
#[derive(Default)]
pub struct Batch {
    pub requests: Vec<SwapRequest>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, req: SwapRequest) {
        self.requests.push(req);
    }

    /// Splits the batch into the requests that need disk I/O and the ones that were
    /// already resolved as `Nop` by `analyze` and can merge immediately.
    pub fn partition_io(self) -> (Vec<SwapRequest>, Vec<SwapRequest>) {
        let mut needs_io = Vec::new();
        let mut nops = Vec::new();
        for req in self.requests {
            if req.is_nop() {
                nops.push(req);
            } else {
                needs_io.push(req);
            }
        }
        (needs_io, nops)
    }

    pub fn errors(&self) -> Vec<&SwapError> {
        self.requests.iter().filter_map(|r| r.result.as_ref().and_then(|res| res.as_ref().err())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_partitions_nops_from_io_bound_requests() {
        let mut batch = Batch::new();
        let nop_req = KeyRequest::nop(Level::Key, 0, b"k1".to_vec());
        batch.push(SwapRequest::new(nop_req, Intention::Nop, Action::Nop));
        let mut io_req = KeyRequest::nop(Level::Key, 0, b"k2".to_vec());
        io_req.intention = Intention::In;
        batch.push(SwapRequest::new(io_req, Intention::In, Action::Get));
        let (needs_io, nops) = batch.partition_io();
        assert_eq!(needs_io.len(), 1);
        assert_eq!(nops.len(), 1);
    }
}
