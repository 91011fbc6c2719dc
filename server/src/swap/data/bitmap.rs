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

//! Bitmaps are addressed in fixed-size byte buckets (`ObjectMeta::aux`'s
//! `BucketMap`, default 4096 bytes/bucket) rather than individual bits: a `SETBIT`
//! only ever needs to swap in the one bucket that bit falls in, and a hot bitmap's
//! "hot-extension" RDB path snapshots whichever buckets are
//! currently resident without waiting for the rest to swap in.

use super::{Action, Intention, KeyOp, RangeOp, SwapAble, SwapCtx, SwapFlags, SwapResultRows};
use crate::swap::coldfilter::ColdFilter;
use crate::swap::map::{Coremap, Data};
use crate::swap::codec::{self, Cf};
use crate::swap::error::{SwapError, SwapResult};
use crate::swap::meta::{ObjectMeta, SwapType};
use crate::swap::request::{KeyRequest, SubkeySpec};
use std::convert::TryInto;

#[derive(Debug, Default)]
pub struct BitmapValue {
    buckets: Coremap<u32, Vec<u8>>,
}

impl BitmapValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident_len(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket(&self, idx: u32) -> Option<Vec<u8>> {
        self.buckets.get_cloned(&idx)
    }

    pub fn set_bucket(&self, idx: u32, bytes: Vec<u8>) {
        self.buckets.upsert(idx, bytes);
    }

    pub fn remove_bucket(&self, idx: u32) {
        self.buckets.remove(&idx);
    }
}

#[derive(Debug, Default)]
pub struct BitmapCtx {
    pub buckets: Vec<u32>,
}

impl SwapCtx for BitmapCtx {}

fn bucket_subkey(idx: u32) -> [u8; 4] {
    idx.to_be_bytes()
}

impl SwapAble for BitmapValue {
    type Ctx = BitmapCtx;
    type Decoded = Vec<(u32, Vec<u8>)>;

    fn swap_type() -> SwapType {
        SwapType::Bitmap
    }

    fn analyze(&self, meta: Option<&ObjectMeta>, req: &KeyRequest, _cold: &ColdFilter, ctx: &mut BitmapCtx) -> (Intention, SwapFlags) {
        let cold_len = meta.map_or(0, |m| m.cold_len);
        let bucket_size = meta.and_then(ObjectMeta::buckets).map_or(4096, |b| b.bucket_size);
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
                let wanted: Vec<u32> = match req.subkey_spec {
                    SubkeySpec::BitOffset(bit) => {
                        vec![(bit / 8 / u64::from(bucket_size)) as u32]
                    }
                    SubkeySpec::BitByteRange { start, end } => {
                        let lo = (start / u64::from(bucket_size)) as u32;
                        let hi = (end.saturating_sub(1) / u64::from(bucket_size)) as u32;
                        (lo..=hi).collect()
                    }
                    _ => meta
                        .and_then(ObjectMeta::buckets)
                        .map(|b| (0..b.bucket_count() as u32).collect())
                        .unwrap_or_default(),
                };
                ctx.buckets = wanted.into_iter().filter(|b| self.bucket(*b).is_none()).collect();
                if ctx.buckets.is_empty() {
                    (Intention::Nop, SwapFlags::empty())
                } else {
                    (Intention::In, req.intention_flags)
                }
            }
            Intention::Out => {
                if self.resident_len() == 0 {
                    return (Intention::Nop, SwapFlags::empty());
                }
                let mut picked: Vec<u32> = self.buckets.iter().map(|r| *r.key()).collect();
                picked.sort_unstable();
                let step = req.evict_step.max(1);
                picked.truncate(step);
                ctx.buckets = picked;
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

    fn choose_action(intention: Intention, ctx: &BitmapCtx) -> Action {
        match intention {
            Intention::Nop => Action::Nop,
            Intention::In if ctx.buckets.len() > 1 => Action::Iterate,
            Intention::In => Action::Get,
            Intention::Out => Action::Put,
            Intention::Del => Action::Del,
        }
    }

    fn encode_keys(&self, intention: Intention, req: &KeyRequest, ctx: &BitmapCtx) -> Vec<KeyOp> {
        match intention {
            Intention::In => ctx
                .buckets
                .iter()
                .map(|b| (Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, Some(&bucket_subkey(*b)))))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn encode_data(&self, intention: Intention, req: &KeyRequest, ctx: &BitmapCtx) -> Vec<(Cf, Vec<u8>, Vec<u8>)> {
        match intention {
            Intention::Out => ctx
                .buckets
                .iter()
                .filter_map(|b| self.bucket(*b).map(|v| (*b, v)))
                .map(|(b, v)| (Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, Some(&bucket_subkey(b))), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn encode_range(&self, _intention: Intention, _req: &KeyRequest, _ctx: &BitmapCtx) -> Option<RangeOp> {
        None
    }

    fn decode_data(&self, rows: SwapResultRows, _ctx: &BitmapCtx) -> SwapResult<Vec<(u32, Vec<u8>)>> {
        match rows {
            SwapResultRows::Nothing => Ok(Vec::new()),
            SwapResultRows::Rows(rows) => rows
                .into_iter()
                .map(|(_, key, val)| {
                    let (_, _, _, subkey) =
                        codec::decode_data_key(&key).ok_or(SwapError::Codec("malformed bitmap data key"))?;
                    let sk = subkey.ok_or(SwapError::Codec("bitmap row missing bucket index"))?;
                    let bytes: [u8; 4] =
                        sk.as_slice().try_into().map_err(|_| SwapError::Codec("malformed bitmap bucket index"))?;
                    Ok((u32::from_be_bytes(bytes), val))
                })
                .collect(),
        }
    }

    fn create_or_merge(&self, decoded: Vec<(u32, Vec<u8>)>, meta: &mut ObjectMeta, _ctx: &BitmapCtx) -> Vec<(u32, Vec<u8>)> {
        for (idx, bytes) in &decoded {
            self.buckets.upsert(*idx, bytes.clone());
            if let Some(map) = meta.buckets_mut() {
                map.set_resident(*idx as usize, true);
            }
        }
        meta.cold_len = meta.cold_len.saturating_sub(decoded.len() as u64);
        decoded
    }

    fn swap_in(&self, _carry: Vec<(u32, Vec<u8>)>, _meta: &mut ObjectMeta, _ctx: &BitmapCtx) {}

    fn swap_out(&self, ctx: &BitmapCtx, keep_data: bool, meta: &mut ObjectMeta, totally_out: &mut bool) {
        for idx in &ctx.buckets {
            if !keep_data {
                self.remove_bucket(*idx);
            }
            if let Some(map) = meta.buckets_mut() {
                map.set_resident(*idx as usize, false);
            }
            meta.cold_len += 1;
        }
        *totally_out = self.resident_len() == 0;
    }

    fn swap_del(&self, ctx: &BitmapCtx, skip_data: bool, meta: &mut ObjectMeta) {
        if !skip_data {
            for idx in &ctx.buckets {
                self.remove_bucket(*idx);
            }
        } else {
            self.buckets.clear();
        }
        meta.cold_len = 0;
    }

    fn clean_object(&self, ctx: &BitmapCtx, keep_data: bool, _meta: &mut ObjectMeta) {
        if !keep_data {
            for idx in &ctx.buckets {
                self.remove_bucket(*idx);
            }
        }
    }
}
