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

//! Lists are addressed by a stable "raw index" (`ridx`) rather than by the list's
//! logical front/back offsets (which shift under `LPUSH`/`RPOP`); `ObjectMeta::aux`
//! carries the `Segment` run list that partitions the list's whole `ridx` space into
//! resident and cold runs, so a partial swap-in only ever needs to ask the store for
//! the gaps, and a whole-key swap-in of a fully evicted list still knows its true
//! span instead of seeing an empty run list.

use super::{Action, Intention, KeyOp, RangeOp, SwapAble, SwapCtx, SwapFlags, SwapResultRows};
use crate::swap::coldfilter::ColdFilter;
use crate::swap::map::{Coremap, Data};
use crate::swap::codec::{self, Cf};
use crate::swap::error::{SwapError, SwapResult};
use crate::swap::meta::{ObjectMeta, Segment, SwapType};
use crate::swap::request::{KeyRequest, SubkeySpec};
use std::convert::TryInto;

#[derive(Debug, Default)]
pub struct ListValue {
    elements: Coremap<u64, Data>,
}

impl ListValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident_len(&self) -> usize {
        self.elements.len()
    }

    pub fn get(&self, ridx: u64) -> Option<Data> {
        self.elements.get_cloned(&ridx)
    }

    pub fn set(&self, ridx: u64, value: Data) {
        self.elements.upsert(ridx, value);
    }

    pub fn remove(&self, ridx: u64) {
        self.elements.remove(&ridx);
    }

    /// `ridx`s in `[start, end)` that are not currently resident.
    fn missing_in_range(&self, start: u64, end: u64) -> Vec<u64> {
        (start..end).filter(|r| self.elements.get(r).is_none()).collect()
    }
}

#[derive(Debug, Default)]
pub struct ListCtx {
    pub ridxs: Vec<u64>,
    pub range: Option<(u64, u64)>,
}

impl SwapCtx for ListCtx {}

fn ridx_subkey(ridx: u64) -> [u8; 8] {
    ridx.to_be_bytes()
}

impl SwapAble for ListValue {
    type Ctx = ListCtx;
    type Decoded = Vec<(u64, Data)>;

    fn swap_type() -> SwapType {
        SwapType::List
    }

    fn analyze(&self, meta: Option<&ObjectMeta>, req: &KeyRequest, _cold: &ColdFilter, ctx: &mut ListCtx) -> (Intention, SwapFlags) {
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
                match req.subkey_spec {
                    SubkeySpec::IndexRange { start, end } if start >= 0 && end >= start => {
                        let missing = self.missing_in_range(start as u64, end as u64);
                        if missing.is_empty() {
                            (Intention::Nop, SwapFlags::empty())
                        } else {
                            ctx.range = Some((missing[0], missing[missing.len() - 1] + 1));
                            (Intention::In, req.intention_flags)
                        }
                    }
                    _ => {
                        // whole-key IN: everything not yet resident, by segment gaps.
                        let hi = meta.and_then(ObjectMeta::segments).and_then(|s| s.iter().map(|s| s.ridx_hi).max()).unwrap_or(0);
                        ctx.range = Some((0, hi));
                        (Intention::In, req.intention_flags)
                    }
                }
            }
            Intention::Out => {
                if self.resident_len() == 0 {
                    return (Intention::Nop, SwapFlags::empty());
                }
                let mut picked: Vec<u64> = self.elements.iter().map(|r| *r.key()).collect();
                picked.sort_unstable();
                let step = req.evict_step.max(1);
                picked.truncate(step);
                ctx.ridxs = picked;
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

    fn choose_action(intention: Intention, ctx: &ListCtx) -> Action {
        match intention {
            Intention::Nop => Action::Nop,
            Intention::In if ctx.range.is_some() => Action::Iterate,
            Intention::In => Action::Get,
            Intention::Out => Action::Put,
            Intention::Del => Action::Del,
        }
    }

    fn encode_keys(&self, _intention: Intention, _req: &KeyRequest, _ctx: &ListCtx) -> Vec<KeyOp> {
        Vec::new()
    }

    fn encode_data(&self, intention: Intention, req: &KeyRequest, ctx: &ListCtx) -> Vec<(Cf, Vec<u8>, Vec<u8>)> {
        match intention {
            Intention::Out => ctx
                .ridxs
                .iter()
                .filter_map(|r| self.get(*r).map(|v| (*r, v)))
                .map(|(r, v)| {
                    (Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, Some(&ridx_subkey(r))), v.get_blob().to_vec())
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn encode_range(&self, intention: Intention, req: &KeyRequest, ctx: &ListCtx) -> Option<RangeOp> {
        match intention {
            Intention::In => ctx.range.map(|(start, end)| {
                (
                    Cf::Data,
                    codec::encode_data_key(req.dbid, &req.key, 0, Some(&ridx_subkey(start))),
                    codec::encode_data_key(req.dbid, &req.key, 0, Some(&ridx_subkey(end))),
                    None,
                )
            }),
            _ => None,
        }
    }

    fn decode_data(&self, rows: SwapResultRows, _ctx: &ListCtx) -> SwapResult<Vec<(u64, Data)>> {
        match rows {
            SwapResultRows::Nothing => Ok(Vec::new()),
            SwapResultRows::Rows(rows) => rows
                .into_iter()
                .map(|(_, key, val)| {
                    let (_, _, _, subkey) =
                        codec::decode_data_key(&key).ok_or(SwapError::Codec("malformed list data key"))?;
                    let sk = subkey.ok_or(SwapError::Codec("list row missing ridx"))?;
                    let bytes: [u8; 8] = sk.as_slice().try_into().map_err(|_| SwapError::Codec("malformed list ridx"))?;
                    Ok((u64::from_be_bytes(bytes), Data::copy_from_slice(&val)))
                })
                .collect(),
        }
    }

    fn create_or_merge(&self, decoded: Vec<(u64, Data)>, meta: &mut ObjectMeta, _ctx: &ListCtx) -> Vec<(u64, Data)> {
        for (ridx, value) in &decoded {
            self.elements.upsert(*ridx, value.clone());
        }
        if let Some(segments) = meta.segments_mut() {
            for (ridx, _) in &decoded {
                mark_resident(segments, *ridx);
            }
        }
        meta.cold_len = meta.cold_len.saturating_sub(decoded.len() as u64);
        decoded
    }

    fn swap_in(&self, _carry: Vec<(u64, Data)>, _meta: &mut ObjectMeta, _ctx: &ListCtx) {}

    fn swap_out(&self, ctx: &ListCtx, keep_data: bool, meta: &mut ObjectMeta, totally_out: &mut bool) {
        for ridx in &ctx.ridxs {
            if !keep_data {
                self.remove(*ridx);
            }
            if let Some(segments) = meta.segments_mut() {
                mark_evicted(segments, *ridx);
            }
            meta.cold_len += 1;
        }
        *totally_out = self.resident_len() == 0;
    }

    fn swap_del(&self, ctx: &ListCtx, skip_data: bool, meta: &mut ObjectMeta) {
        if !skip_data {
            for ridx in &ctx.ridxs {
                self.remove(*ridx);
            }
        } else {
            self.elements.clear();
        }
        if let Some(segments) = meta.segments_mut() {
            segments.clear();
        }
        meta.cold_len = 0;
    }

    fn clean_object(&self, ctx: &ListCtx, keep_data: bool, _meta: &mut ObjectMeta) {
        if !keep_data {
            for ridx in &ctx.ridxs {
                self.remove(*ridx);
            }
        }
    }
}

/// Folds `ridx` into `segments` at the given residency, splitting whichever run
/// currently covers it and merging with an adjacent run that ends up sharing the
/// same `in_memory` state. `Segment` runs never overlap and together span every
/// `ridx` this list has ever touched, resident or not -- a swapped-out run stays
/// recorded as `in_memory = false` rather than disappearing, so `ridx_hi` across all
/// segments is always the list's true length, never just the resident portion.
fn set_residency(segments: &mut Vec<Segment>, ridx: u64, in_memory: bool) {
    let mut next = Vec::with_capacity(segments.len() + 1);
    let mut placed = false;
    for seg in segments.drain(..) {
        if !seg.contains(ridx) {
            next.push(seg);
            continue;
        }
        if seg.in_memory == in_memory {
            next.push(seg);
            placed = true;
            continue;
        }
        if seg.ridx_lo < ridx {
            next.push(Segment { ridx_lo: seg.ridx_lo, ridx_hi: ridx, in_memory: seg.in_memory });
        }
        if ridx + 1 < seg.ridx_hi {
            next.push(Segment { ridx_lo: ridx + 1, ridx_hi: seg.ridx_hi, in_memory: seg.in_memory });
        }
    }
    if !placed {
        next.push(Segment { ridx_lo: ridx, ridx_hi: ridx + 1, in_memory });
    }
    next.sort_by_key(|s| s.ridx_lo);
    segments.clear();
    for seg in next {
        match segments.last_mut() {
            Some(last) if last.in_memory == seg.in_memory && last.ridx_hi == seg.ridx_lo => {
                last.ridx_hi = seg.ridx_hi;
            }
            _ => segments.push(seg),
        }
    }
}

fn mark_resident(segments: &mut Vec<Segment>, ridx: u64) {
    set_residency(segments, ridx, true);
}

fn mark_evicted(segments: &mut Vec<Segment>, ridx: u64) {
    set_residency(segments, ridx, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swap::request::Level;

    #[test]
    fn out_evicts_in_ridx_order_up_to_evict_step() {
        let l = ListValue::new();
        for i in 0..5u64 {
            l.set(i, Data::from_string(format!("v{i}")));
        }
        let mut meta = ObjectMeta::new(SwapType::List);
        let req = KeyRequest {
            level: Level::Key,
            dbid: 0,
            key: b"l".to_vec(),
            intention: Intention::Out,
            intention_flags: SwapFlags::empty(),
            subkey_spec: SubkeySpec::WholeKey,
            arg_rewrite: Vec::new(),
            txid: 1,
            evict_step: 2,
        };
        let mut ctx = ListCtx::default();
        let cold = ColdFilter::new(&Default::default());
        let (intention, _) = l.analyze(Some(&meta), &req, &cold, &mut ctx);
        assert_eq!(intention, Intention::Out);
        assert_eq!(ctx.ridxs.len(), 2);
        let mut totally_out = false;
        l.swap_out(&ctx, false, &mut meta, &mut totally_out);
        assert_eq!(l.resident_len(), 3);
        assert_eq!(meta.cold_len, 2);
    }

    #[test]
    fn whole_key_in_still_spans_full_range_after_total_eviction() {
        let l = ListValue::new();
        for i in 0..5u64 {
            l.set(i, Data::from_string(format!("v{i}")));
        }
        let mut meta = ObjectMeta::new(SwapType::List);
        if let Some(segments) = meta.segments_mut() {
            for i in 0..5u64 {
                mark_resident(segments, i);
            }
        }
        let mut totally_out = false;
        l.swap_out(
            &ListCtx { ridxs: (0..5).collect(), range: None },
            false,
            &mut meta,
            &mut totally_out,
        );
        assert!(totally_out);
        assert_eq!(meta.cold_len, 5);

        let req = KeyRequest {
            level: Level::Key,
            dbid: 0,
            key: b"l".to_vec(),
            intention: Intention::In,
            intention_flags: SwapFlags::empty(),
            subkey_spec: SubkeySpec::WholeKey,
            arg_rewrite: Vec::new(),
            txid: 1,
            evict_step: 2,
        };
        let mut ctx = ListCtx::default();
        let cold = ColdFilter::new(&Default::default());
        let (intention, _) = l.analyze(Some(&meta), &req, &cold, &mut ctx);
        assert_eq!(intention, Intention::In);
        assert_eq!(ctx.range, Some((0, 5)), "a fully evicted list must still report its true ridx span");
    }

    #[test]
    fn mark_resident_then_mark_evicted_coalesce_adjacent_runs() {
        let mut segments = Vec::new();
        for i in 0..4u64 {
            mark_resident(&mut segments, i);
        }
        assert_eq!(segments, vec![Segment { ridx_lo: 0, ridx_hi: 4, in_memory: true }]);
        mark_evicted(&mut segments, 1);
        mark_evicted(&mut segments, 2);
        assert_eq!(
            segments,
            vec![
                Segment { ridx_lo: 0, ridx_hi: 1, in_memory: true },
                Segment { ridx_lo: 1, ridx_hi: 3, in_memory: false },
                Segment { ridx_lo: 3, ridx_hi: 4, in_memory: true },
            ]
        );
        mark_evicted(&mut segments, 0);
        mark_evicted(&mut segments, 3);
        assert_eq!(segments, vec![Segment { ridx_lo: 0, ridx_hi: 4, in_memory: false }]);
    }
}
