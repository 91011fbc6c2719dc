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

//! Sets mirror hashes with the value column dropped: membership alone is the
//! payload, so data rows are written with an empty value and `decode_data` only
//! needs the subkey half of the row.

use super::{Action, Intention, KeyOp, RangeOp, SwapAble, SwapCtx, SwapFlags, SwapResultRows};
use crate::swap::coldfilter::ColdFilter;
use crate::swap::map::{Coremap, Data};
use crate::swap::codec::{self, Cf};
use crate::swap::error::{SwapError, SwapResult};
use crate::swap::meta::{ObjectMeta, SwapType};
use crate::swap::request::{KeyRequest, SubkeySpec};
use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct SetValue {
    members: Coremap<Data, ()>,
    dirty: Mutex<HashSet<Data>>,
}

impl SetValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident_len(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, member: &[u8]) -> bool {
        self.members.contains_key(member)
    }

    pub fn insert(&self, member: Data) {
        self.dirty.lock().insert(member.clone());
        self.members.upsert(member, ());
    }

    pub fn remove(&self, member: &[u8]) {
        self.dirty.lock().remove(member);
        self.members.remove(member);
    }

    pub fn all_members(&self) -> Vec<Data> {
        self.members.iter().map(|r| r.key().clone()).collect()
    }

    fn dirty_members(&self) -> Vec<Data> {
        self.dirty.lock().iter().cloned().collect()
    }
}

#[derive(Debug, Default)]
pub struct SetCtx {
    pub members: Vec<Data>,
    pub whole_range: bool,
}

impl SwapCtx for SetCtx {}

impl SwapAble for SetValue {
    type Ctx = SetCtx;
    type Decoded = Vec<Data>;

    fn swap_type() -> SwapType {
        SwapType::Set
    }

    fn analyze(&self, meta: Option<&ObjectMeta>, req: &KeyRequest, cold: &ColdFilter, ctx: &mut SetCtx) -> (Intention, SwapFlags) {
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
                            .filter(|m| !self.contains(m) && !cold.known_absent(&req.key, Some(m)))
                            .map(|m| Data::copy_from_slice(m))
                            .collect();
                        if ctx.members.is_empty() {
                            (Intention::Nop, SwapFlags::empty())
                        } else {
                            (Intention::In, req.intention_flags)
                        }
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

    fn choose_action(intention: Intention, ctx: &SetCtx) -> Action {
        match intention {
            Intention::Nop => Action::Nop,
            Intention::In if ctx.whole_range => Action::Iterate,
            Intention::In => Action::Get,
            Intention::Out => Action::Put,
            Intention::Del => Action::Del,
        }
    }

    fn encode_keys(&self, intention: Intention, req: &KeyRequest, ctx: &SetCtx) -> Vec<KeyOp> {
        match intention {
            Intention::In if !ctx.whole_range => ctx
                .members
                .iter()
                .map(|m| (Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, Some(m.as_ref()))))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn encode_data(&self, intention: Intention, req: &KeyRequest, ctx: &SetCtx) -> Vec<(Cf, Vec<u8>, Vec<u8>)> {
        match intention {
            Intention::Out => ctx
                .members
                .iter()
                .map(|m| (Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, Some(m.as_ref())), Vec::new()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn encode_range(&self, intention: Intention, req: &KeyRequest, ctx: &SetCtx) -> Option<RangeOp> {
        match intention {
            Intention::In if ctx.whole_range => Some((
                Cf::Data,
                codec::data_range_start(req.dbid, &req.key),
                codec::data_range_end(req.dbid, &req.key),
                None,
            )),
            _ => None,
        }
    }

    fn decode_data(&self, rows: SwapResultRows, _ctx: &SetCtx) -> SwapResult<Vec<Data>> {
        match rows {
            SwapResultRows::Nothing => Ok(Vec::new()),
            SwapResultRows::Rows(rows) => rows
                .into_iter()
                .map(|(_, key, _)| {
                    let (_, _, _, subkey) =
                        codec::decode_data_key(&key).ok_or(SwapError::Codec("malformed set data key"))?;
                    let member = subkey.ok_or(SwapError::Codec("set row missing member"))?;
                    Ok(Data::copy_from_slice(&member))
                })
                .collect(),
        }
    }

    fn create_or_merge(&self, decoded: Vec<Data>, meta: &mut ObjectMeta, _ctx: &SetCtx) -> Vec<Data> {
        for member in &decoded {
            self.members.upsert(member.clone(), ());
            meta.cold_len = meta.cold_len.saturating_sub(1);
        }
        decoded
    }

    fn swap_in(&self, _carry: Vec<Data>, _meta: &mut ObjectMeta, _ctx: &SetCtx) {}

    fn swap_out(&self, ctx: &SetCtx, keep_data: bool, meta: &mut ObjectMeta, totally_out: &mut bool) {
        for member in &ctx.members {
            self.dirty.lock().remove(member);
            if !keep_data {
                self.members.remove(member.as_ref());
            }
            meta.cold_len += 1;
        }
        *totally_out = self.resident_len() == 0;
    }

    fn swap_del(&self, ctx: &SetCtx, skip_data: bool, meta: &mut ObjectMeta) {
        if !skip_data {
            for member in &ctx.members {
                self.members.remove(member.as_ref());
            }
        } else {
            self.members.clear();
        }
        self.dirty.lock().clear();
        meta.cold_len = 0;
    }

    fn clean_object(&self, ctx: &SetCtx, keep_data: bool, _meta: &mut ObjectMeta) {
        if !keep_data {
            for member in &ctx.members {
                self.members.remove(member.as_ref());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swap::request::Level;

    fn req(intention: Intention, spec: SubkeySpec, step: usize) -> KeyRequest {
        KeyRequest {
            level: Level::Key,
            dbid: 0,
            key: b"set".to_vec(),
            intention,
            intention_flags: SwapFlags::empty(),
            subkey_spec: spec,
            arg_rewrite: Vec::new(),
            txid: 1,
            evict_step: step,
        }
    }

    #[test]
    fn out_picks_evict_step_members_and_updates_cold_len() {
        let s = SetValue::new();
        for m in ["a", "b", "c"] {
            s.insert(Data::from_string(m.into()));
        }
        let mut meta = ObjectMeta::new(SwapType::Set);
        let mut ctx = SetCtx::default();
        let cold = ColdFilter::new(&crate::swap::coldfilter::ColdFilterConfig::default());
        let (intention, _) = s.analyze(Some(&meta), &req(Intention::Out, SubkeySpec::WholeKey, 2), &cold, &mut ctx);
        assert_eq!(intention, Intention::Out);
        let mut totally_out = false;
        s.swap_out(&ctx, false, &mut meta, &mut totally_out);
        assert_eq!(meta.cold_len, 2);
        assert_eq!(s.resident_len(), 1);
    }

    #[test]
    fn in_skips_members_the_cold_filter_already_knows_are_absent() {
        let s = SetValue::new();
        let mut meta = ObjectMeta::new(SwapType::Set);
        meta.cold_len = 2;
        let cold = ColdFilter::new(&crate::swap::coldfilter::ColdFilterConfig::default());
        cold.record_absent(b"set", Some(b"ghost"));
        let mut ctx = SetCtx::default();
        let spec = SubkeySpec::Explicit(vec![b"ghost".to_vec(), b"real".to_vec()]);
        let (intention, _) = s.analyze(Some(&meta), &req(Intention::In, spec, 0), &cold, &mut ctx);
        assert_eq!(intention, Intention::In);
        assert_eq!(ctx.members, vec![Data::from_string("real".into())], "the known-absent member must be dropped from the fetch list");
    }
}
