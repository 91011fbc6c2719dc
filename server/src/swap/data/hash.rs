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

//! Hash is the worked reference implementation of the swap-data contract:
//! every other type mirrors its shape, simplified where the type allows.

use super::{Action, Intention, KeyOp, RangeOp, SwapAble, SwapCtx, SwapFlags, SwapResultRows};
use crate::swap::coldfilter::ColdFilter;
use crate::swap::map::{Coremap, Data};
use crate::swap::codec::{self, Cf};
use crate::swap::error::{SwapError, SwapResult};
use crate::swap::meta::{ObjectMeta, SwapType};
use crate::swap::request::{KeyRequest, SubkeySpec};
use parking_lot::Mutex;
use std::collections::HashSet;

/// `Coremap<Data, Data>` (the same sharded map `kvengine::KVEngine<Data>` already
/// uses) plus the "dirty subkeys" side table: fields mutated since the last persist,
/// which `analyze(OUT)` must flush even if they weren't the ones picked for this
/// particular eviction round.
#[derive(Debug, Default)]
pub struct HashValue {
    data: Coremap<Data, Data>,
    dirty: Mutex<HashSet<Data>>,
}

impl HashValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident_len(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, field: &[u8]) -> Option<Data> {
        self.data.get_cloned(field)
    }

    pub fn set(&self, field: Data, value: Data) {
        self.dirty.lock().insert(field.clone());
        self.data.upsert(field, value);
    }

    pub fn remove(&self, field: &[u8]) -> Option<Data> {
        self.dirty.lock().remove(field);
        self.data.remove(field).map(|(_, v)| v)
    }

    pub fn fields(&self) -> Vec<Data> {
        self.data.iter().map(|r| r.key().clone()).collect()
    }

    fn dirty_fields(&self) -> Vec<Data> {
        self.dirty.lock().iter().cloned().collect()
    }
}

#[derive(Debug, Default)]
pub struct HashCtx {
    /// subkeys selected by `analyze` for this request (IN: to fetch; OUT: to
    /// persist/evict; DEL: to drop).
    pub fields: Vec<Data>,
    /// `true` when an empty explicit list on IN means "load everything" (whole-key
    /// range scan) rather than "load nothing".
    pub whole_range: bool,
    /// decoded `(field, value)` rows, populated by `decode_data`.
    pub decoded: Vec<(Data, Data)>,
    /// set when this OUT leaves no resident and no dirty fields behind.
    pub becomes_cold: bool,
}

impl SwapCtx for HashCtx {}

impl SwapAble for HashValue {
    type Ctx = HashCtx;
    type Decoded = Vec<(Data, Data)>;

    fn swap_type() -> SwapType {
        SwapType::Hash
    }

    fn analyze(&self, meta: Option<&ObjectMeta>, req: &KeyRequest, cold: &ColdFilter, ctx: &mut HashCtx) -> (Intention, SwapFlags) {
        let cold_len = meta.map_or(0, |m| m.cold_len);
        match req.intention {
            Intention::Nop => (Intention::Nop, SwapFlags::empty()),
            Intention::In => {
                if cold_len == 0 {
                    // fully hot: nothing to pull, unless the caller is forcing a
                    // disk cleanup pass alongside this read.
                    if req.intention_flags.contains(SwapFlags::EXEC_IN_DEL) {
                        (Intention::In, req.intention_flags)
                    } else {
                        (Intention::Nop, SwapFlags::empty())
                    }
                } else {
                    match &req.subkey_spec {
                        SubkeySpec::Explicit(fields) if fields.is_empty() => {
                            ctx.whole_range = true;
                            (Intention::In, req.intention_flags)
                        }
                        SubkeySpec::Explicit(fields) => {
                            ctx.fields = fields
                                .iter()
                                .filter(|f| self.get(f).is_none() && !cold.known_absent(&req.key, Some(f)))
                                .map(|f| Data::copy_from_slice(f))
                                .collect();
                            if ctx.fields.is_empty() {
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
            }
            Intention::Out => {
                if self.resident_len() == 0 {
                    // already cold, nothing resident to flush.
                    return (Intention::Nop, SwapFlags::empty());
                }
                let mut picked: Vec<Data> = self.dirty_fields();
                let step = req.evict_step.max(1);
                if picked.len() < step {
                    for f in self.fields() {
                        if picked.len() >= step {
                            break;
                        }
                        if !picked.contains(&f) {
                            picked.push(f);
                        }
                    }
                }
                picked.truncate(step.max(picked.len().min(step)));
                ctx.becomes_cold = picked.len() >= self.resident_len() && self.dirty_fields().len() <= picked.len();
                ctx.fields = picked;
                (Intention::Out, req.intention_flags)
            }
            Intention::Del => {
                if cold_len == 0 && self.resident_len() == 0 {
                    (Intention::Nop, SwapFlags::empty())
                } else if self.resident_len() == 0 {
                    // lazy cold-delete: meta row alone is enough, data is reaped by
                    // the compaction filter.
                    (Intention::Del, req.intention_flags | SwapFlags::SKIP_FIN)
                } else {
                    (Intention::Del, req.intention_flags)
                }
            }
        }
    }

    fn choose_action(intention: Intention, ctx: &HashCtx) -> Action {
        match intention {
            Intention::Nop => Action::Nop,
            Intention::In if ctx.whole_range => Action::Iterate,
            Intention::In => Action::Get,
            Intention::Out => Action::Put,
            Intention::Del => Action::Del,
        }
    }

    fn encode_keys(&self, intention: Intention, req: &KeyRequest, ctx: &HashCtx) -> Vec<KeyOp> {
        match intention {
            Intention::In if !ctx.whole_range => ctx
                .fields
                .iter()
                .map(|f| (Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, Some(f.as_ref()))))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn encode_data(&self, intention: Intention, req: &KeyRequest, ctx: &HashCtx) -> Vec<(Cf, Vec<u8>, Vec<u8>)> {
        match intention {
            Intention::Out => ctx
                .fields
                .iter()
                .filter_map(|f| self.get(f).map(|v| (f, v)))
                .map(|(f, v)| {
                    (Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, Some(f.as_ref())), v.get_blob().to_vec())
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn encode_range(&self, intention: Intention, req: &KeyRequest, ctx: &HashCtx) -> Option<RangeOp> {
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

    fn decode_data(&self, rows: SwapResultRows, _ctx: &HashCtx) -> SwapResult<Vec<(Data, Data)>> {
        match rows {
            SwapResultRows::Nothing => Ok(Vec::new()),
            SwapResultRows::Rows(rows) => rows
                .into_iter()
                .map(|(_, key, val)| {
                    let (_, _, _, subkey) =
                        codec::decode_data_key(&key).ok_or(SwapError::Codec("malformed hash data key"))?;
                    let field = subkey.ok_or(SwapError::Codec("hash row missing subkey"))?;
                    Ok((Data::copy_from_slice(&field), Data::copy_from_slice(&val)))
                })
                .collect(),
        }
    }

    fn create_or_merge(&self, decoded: Vec<(Data, Data)>, meta: &mut ObjectMeta, _ctx: &HashCtx) -> Vec<(Data, Data)> {
        for (field, value) in &decoded {
            // cold -> warm/hot: install without marking dirty (this copy already
            // matches disk).
            self.data.upsert(field.clone(), value.clone());
            meta.cold_len = meta.cold_len.saturating_sub(1);
        }
        decoded
    }

    fn swap_in(&self, _carry: Vec<(Data, Data)>, _meta: &mut ObjectMeta, _ctx: &HashCtx) {
        // `create_or_merge` already installed the fields; nothing further to do for
        // a hash (unlike list/bitmap, there's no secondary residency index).
    }

    fn swap_out(&self, ctx: &HashCtx, keep_data: bool, meta: &mut ObjectMeta, totally_out: &mut bool) {
        for field in &ctx.fields {
            self.dirty.lock().remove(field);
            if !keep_data {
                self.data.remove(field);
            }
            meta.cold_len += 1;
        }
        *totally_out = self.resident_len() == 0;
    }

    fn swap_del(&self, ctx: &HashCtx, skip_data: bool, meta: &mut ObjectMeta) {
        if !skip_data {
            for field in &ctx.fields {
                self.data.remove(field);
            }
        } else {
            self.data.clear();
        }
        self.dirty.lock().clear();
        meta.cold_len = 0;
    }

    fn clean_object(&self, ctx: &HashCtx, keep_data: bool, _meta: &mut ObjectMeta) {
        if !keep_data {
            for field in &ctx.fields {
                self.data.remove(field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swap::request::{Level, SubkeySpec};

    fn req(intention: Intention, spec: SubkeySpec, step: usize) -> KeyRequest {
        KeyRequest {
            level: Level::Key,
            dbid: 0,
            key: b"h".to_vec(),
            intention,
            intention_flags: SwapFlags::empty(),
            subkey_spec: spec,
            arg_rewrite: Vec::new(),
            txid: 1,
            evict_step: step,
        }
    }

    #[test]
    fn analyze_out_picks_up_to_evict_step_fields() {
        let h = HashValue::new();
        for (f, v) in [("f1", "v1"), ("f2", "v2"), ("f3", "v3"), ("f4", "v4")] {
            h.set(Data::from_string(f.into()), Data::from_string(v.into()));
        }
        let mut meta = ObjectMeta::new(SwapType::Hash);
        let mut ctx = HashCtx::default();
        let r = req(Intention::Out, SubkeySpec::WholeKey, 2);
        let cold = ColdFilter::new(&Default::default());
        let (intention, _) = h.analyze(Some(&meta), &r, &cold, &mut ctx);
        assert_eq!(intention, Intention::Out);
        assert_eq!(ctx.fields.len(), 2);
        let mut totally_out = false;
        h.swap_out(&ctx, false, &mut meta, &mut totally_out);
        assert_eq!(meta.cold_len, 2);
        assert!(!totally_out);
        assert_eq!(h.resident_len(), 2);
    }

    #[test]
    fn analyze_in_on_hot_key_is_nop() {
        let h = HashValue::new();
        h.set(Data::from_string("f".into()), Data::from_string("v".into()));
        let meta = ObjectMeta::new(SwapType::Hash);
        let mut ctx = HashCtx::default();
        let r = req(Intention::In, SubkeySpec::Explicit(vec![b"f".to_vec()]), 2);
        let cold = ColdFilter::new(&Default::default());
        let (intention, _) = h.analyze(Some(&meta), &r, &cold, &mut ctx);
        assert_eq!(intention, Intention::Nop);
    }

    #[test]
    fn analyze_out_on_cold_key_is_nop() {
        let h = HashValue::new();
        let meta = ObjectMeta::new(SwapType::Hash);
        let mut ctx = HashCtx::default();
        let r = req(Intention::Out, SubkeySpec::WholeKey, 2);
        let cold = ColdFilter::new(&Default::default());
        let (intention, _) = h.analyze(Some(&meta), &r, &cold, &mut ctx);
        assert_eq!(intention, Intention::Nop);
    }

    #[test]
    fn empty_subkey_list_on_in_loads_everything() {
        let h = HashValue::new();
        let mut meta = ObjectMeta::new(SwapType::Hash);
        meta.cold_len = 4;
        let mut ctx = HashCtx::default();
        let r = req(Intention::In, SubkeySpec::Explicit(vec![]), 2);
        let cold = ColdFilter::new(&Default::default());
        let (intention, _) = h.analyze(Some(&meta), &r, &cold, &mut ctx);
        assert_eq!(intention, Intention::In);
        assert!(ctx.whole_range);
    }
}
