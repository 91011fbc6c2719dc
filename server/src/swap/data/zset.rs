/*
 * Created on Wed Feb 14 2024
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

//! ZSets are the one type that touches the Score CF: every member/score pair is
//! mirrored into both the Data CF (member -> score, for point lookups and `analyze`)
//! and the Score CF (score -> member, for `ZRANGEBYSCORE`-style range scans).
//! `encode_data` emits both rows for a swap-out together, and the executor commits
//! them through `Engine::write_batch` as one atomic write, so a crash or I/O error
//! can never leave one CF holding a member the other doesn't know about.

use super::{Action, Intention, KeyOp, RangeOp, SwapAble, SwapCtx, SwapFlags, SwapResultRows};
use crate::swap::coldfilter::ColdFilter;
use crate::swap::map::{Coremap, Data};
use crate::swap::codec::{self, Cf};
use crate::swap::error::{SwapError, SwapResult};
use crate::swap::meta::{ObjectMeta, SwapType};
use crate::swap::request::{KeyRequest, SubkeySpec};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::convert::TryInto;

#[derive(Debug, Default)]
pub struct ZSetValue {
    scores: Coremap<Data, f64>,
    dirty: Mutex<HashSet<Data>>,
}

impl ZSetValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident_len(&self) -> usize {
        self.scores.len()
    }

    pub fn score_of(&self, member: &[u8]) -> Option<f64> {
        self.scores.get_cloned(member)
    }

    pub fn set(&self, member: Data, score: f64) {
        self.dirty.lock().insert(member.clone());
        self.scores.upsert(member, score);
    }

    pub fn remove(&self, member: &[u8]) {
        self.dirty.lock().remove(member);
        self.scores.remove(member);
    }

    pub fn all_members(&self) -> Vec<Data> {
        self.scores.iter().map(|r| r.key().clone()).collect()
    }

    fn dirty_members(&self) -> Vec<Data> {
        self.dirty.lock().iter().cloned().collect()
    }
}

#[derive(Debug, Default)]
pub struct ZSetCtx {
    pub members: Vec<Data>,
    pub whole_range: bool,
    pub score_range: Option<(f64, f64)>,
}

impl SwapCtx for ZSetCtx {}

impl SwapAble for ZSetValue {
    type Ctx = ZSetCtx;
    type Decoded = Vec<(Data, f64)>;

    fn swap_type() -> SwapType {
        SwapType::ZSet
    }

    fn analyze(&self, meta: Option<&ObjectMeta>, req: &KeyRequest, _cold: &ColdFilter, ctx: &mut ZSetCtx) -> (Intention, SwapFlags) {
        let cold_len = meta.map_or(0, |m| m.cold_len);
        match req.intention {
            Intention::Nop => (Intention::Nop, SwapFlags::empty()),
            Intention::In => {
                if cold_len == 0 {
                    return if req.intention_flags.contains(SwapFlags::EXEC_IN_DEL) {
                        (Intention::In, req.intention_flags)
                    } else {
                        (Intention::Nop, SwapFlags::empty())
                    };
                }
                match &req.subkey_spec {
                    SubkeySpec::Explicit(members) if members.is_empty() => {
                        ctx.whole_range = true;
                        (Intention::In, req.intention_flags)
                    }
                    SubkeySpec::Explicit(members) => {
                        ctx.members = members
                            .iter()
                            .filter(|m| self.score_of(m).is_none())
                            .map(|m| Data::copy_from_slice(m))
                            .collect();
                        if ctx.members.is_empty() {
                            (Intention::Nop, SwapFlags::empty())
                        } else {
                            (Intention::In, req.intention_flags)
                        }
                    }
                    SubkeySpec::ScoreRange { min, max } => {
                        ctx.score_range = Some((*min, *max));
                        (Intention::In, req.intention_flags)
                    }
                    SubkeySpec::WholeKey => {
                        ctx.whole_range = true;
                        (Intention::In, req.intention_flags)
                    }
                    _ => (Intention::Nop, SwapFlags::empty()),
                }
            }
            Intention::Out => {
                if self.resident_len() == 0 {
                    return (Intention::Nop, SwapFlags::empty());
                }
                let mut picked = self.dirty_members();
                let step = req.evict_step.max(1);
                if picked.len() < step {
                    for m in self.all_members() {
                        if picked.len() >= step {
                            break;
                        }
                        if !picked.contains(&m) {
                            picked.push(m);
                        }
                    }
                }
                picked.truncate(step.max(picked.len().min(step)));
                ctx.members = picked;
                (Intention::Out, req.intention_flags)
            }
            Intention::Del => {
                if cold_len == 0 && self.resident_len() == 0 {
                    (Intention::Nop, SwapFlags::empty())
                } else if self.resident_len() == 0 {
                    (Intention::Del, req.intention_flags | SwapFlags::SKIP_FIN)
                } else {
                    (Intention::Del, req.intention_flags)
                }
            }
        }
    }

    fn choose_action(intention: Intention, ctx: &ZSetCtx) -> Action {
        match intention {
            Intention::Nop => Action::Nop,
            Intention::In if ctx.whole_range || ctx.score_range.is_some() => Action::Iterate,
            Intention::In => Action::Get,
            Intention::Out => Action::Put,
            Intention::Del => Action::Del,
        }
    }

    fn encode_keys(&self, intention: Intention, req: &KeyRequest, ctx: &ZSetCtx) -> Vec<KeyOp> {
        match intention {
            Intention::In if ctx.whole_range || ctx.score_range.is_some() => Vec::new(),
            Intention::In => ctx
                .members
                .iter()
                .map(|m| (Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, Some(m.as_ref()))))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn encode_data(&self, intention: Intention, req: &KeyRequest, ctx: &ZSetCtx) -> Vec<(Cf, Vec<u8>, Vec<u8>)> {
        match intention {
            Intention::Out => ctx
                .members
                .iter()
                .filter_map(|m| self.score_of(m).map(|s| (m, s)))
                .flat_map(|(m, s)| {
                    let data_row = (
                        Cf::Data,
                        codec::encode_data_key(req.dbid, &req.key, 0, Some(m.as_ref())),
                        s.to_be_bytes().to_vec(),
                    );
                    let score_row =
                        (Cf::Score, codec::encode_score_key(req.dbid, &req.key, 0, s, m.as_ref()), m.get_blob().to_vec());
                    [data_row, score_row]
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn encode_range(&self, intention: Intention, req: &KeyRequest, ctx: &ZSetCtx) -> Option<RangeOp> {
        match intention {
            Intention::In if ctx.score_range.is_some() => {
                let (min, max) = ctx.score_range.unwrap();
                let (start, end) = codec::score_range_by_score(req.dbid, &req.key, 0, min, max);
                Some((Cf::Score, start, end, None))
            }
            Intention::In if ctx.whole_range => Some((
                Cf::Score,
                codec::score_range_start(req.dbid, &req.key, 0),
                codec::score_range_end(req.dbid, &req.key, 0),
                None,
            )),
            _ => None,
        }
    }

    fn decode_data(&self, rows: SwapResultRows, _ctx: &ZSetCtx) -> SwapResult<Vec<(Data, f64)>> {
        match rows {
            SwapResultRows::Nothing => Ok(Vec::new()),
            SwapResultRows::Rows(rows) => rows
                .into_iter()
                .map(|(cf, key, val)| match cf {
                    Cf::Score => {
                        let (_, _, _, score, _member) =
                            codec::decode_score_key(&key).ok_or(SwapError::Codec("malformed zset score key"))?;
                        Ok((Data::copy_from_slice(&val), score))
                    }
                    Cf::Data => {
                        let (_, _, _, subkey) =
                            codec::decode_data_key(&key).ok_or(SwapError::Codec("malformed zset data key"))?;
                        let member = subkey.ok_or(SwapError::Codec("zset row missing member"))?;
                        let bytes: [u8; 8] =
                            val.as_slice().try_into().map_err(|_| SwapError::Codec("malformed zset score value"))?;
                        Ok((Data::copy_from_slice(&member), f64::from_be_bytes(bytes)))
                    }
                    Cf::Meta => Err(SwapError::Codec("unexpected meta row in zset decode")),
                })
                .collect(),
        }
    }

    fn create_or_merge(&self, decoded: Vec<(Data, f64)>, meta: &mut ObjectMeta, _ctx: &ZSetCtx) -> Vec<(Data, f64)> {
        for (member, score) in &decoded {
            self.scores.upsert(member.clone(), *score);
            meta.cold_len = meta.cold_len.saturating_sub(1);
        }
        decoded
    }

    fn swap_in(&self, _carry: Vec<(Data, f64)>, _meta: &mut ObjectMeta, _ctx: &ZSetCtx) {}

    fn swap_out(&self, ctx: &ZSetCtx, keep_data: bool, meta: &mut ObjectMeta, totally_out: &mut bool) {
        for member in &ctx.members {
            self.dirty.lock().remove(member);
            if !keep_data {
                self.scores.remove(member.as_ref());
            }
            meta.cold_len += 1;
        }
        *totally_out = self.resident_len() == 0;
    }

    fn swap_del(&self, ctx: &ZSetCtx, skip_data: bool, meta: &mut ObjectMeta) {
        if !skip_data {
            for member in &ctx.members {
                self.scores.remove(member.as_ref());
            }
        } else {
            self.scores.clear();
        }
        self.dirty.lock().clear();
        meta.cold_len = 0;
    }

    fn clean_object(&self, ctx: &ZSetCtx, keep_data: bool, _meta: &mut ObjectMeta) {
        if !keep_data {
            for member in &ctx.members {
                self.scores.remove(member.as_ref());
            }
        }
    }
}
