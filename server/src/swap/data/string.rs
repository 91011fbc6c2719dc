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

//! Strings are the simplest swap type: there is exactly one "subkey" (the whole
//! value), so `cold_len` is either 0 or 1 and every op works on the single
//! `FLAG_STRING` data row.

use super::{Action, Intention, KeyOp, RangeOp, SwapAble, SwapCtx, SwapFlags, SwapResultRows};
use crate::swap::coldfilter::ColdFilter;
use crate::swap::map::Data;
use crate::swap::codec::{self, Cf};
use crate::swap::error::{SwapError, SwapResult};
use crate::swap::meta::{ObjectMeta, SwapType};
use crate::swap::request::KeyRequest;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct StrValue {
    data: RwLock<Option<Data>>,
}

impl StrValue {
    pub fn new(initial: Option<Data>) -> Self {
        Self { data: RwLock::new(initial) }
    }

    pub fn resident_len(&self) -> usize {
        usize::from(self.data.read().is_some())
    }

    pub fn get(&self) -> Option<Data> {
        self.data.read().clone()
    }

    pub fn set(&self, value: Data) {
        *self.data.write() = Some(value);
    }
}

#[derive(Debug, Default)]
pub struct StrCtx {
    pub decoded: Option<Data>,
}

impl SwapCtx for StrCtx {}

impl SwapAble for StrValue {
    type Ctx = StrCtx;
    type Decoded = Option<Data>;

    fn swap_type() -> SwapType {
        SwapType::Str
    }

    fn analyze(&self, meta: Option<&ObjectMeta>, req: &KeyRequest, _cold: &ColdFilter, _ctx: &mut StrCtx) -> (Intention, SwapFlags) {
        let cold = meta.map_or(false, |m| m.cold_len > 0);
        match req.intention {
            Intention::Nop => (Intention::Nop, SwapFlags::empty()),
            Intention::In => {
                if self.resident_len() > 0 {
                    (Intention::Nop, SwapFlags::empty())
                } else if cold {
                    (Intention::In, req.intention_flags)
                } else {
                    (Intention::Nop, SwapFlags::empty())
                }
            }
            Intention::Out => {
                if self.resident_len() == 0 {
                    (Intention::Nop, SwapFlags::empty())
                } else {
                    (Intention::Out, req.intention_flags)
                }
            }
            Intention::Del => {
                if self.resident_len() == 0 && !cold {
                    (Intention::Nop, SwapFlags::empty())
                } else if self.resident_len() == 0 {
                    (Intention::Del, req.intention_flags | SwapFlags::SKIP_FIN)
                } else {
                    (Intention::Del, req.intention_flags)
                }
            }
        }
    }

    fn choose_action(intention: Intention, _ctx: &StrCtx) -> Action {
        match intention {
            Intention::Nop => Action::Nop,
            Intention::In => Action::Get,
            Intention::Out => Action::Put,
            Intention::Del => Action::Del,
        }
    }

    fn encode_keys(&self, intention: Intention, req: &KeyRequest, _ctx: &StrCtx) -> Vec<KeyOp> {
        match intention {
            Intention::In => vec![(Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, None))],
            _ => Vec::new(),
        }
    }

    fn encode_data(&self, intention: Intention, req: &KeyRequest, _ctx: &StrCtx) -> Vec<(Cf, Vec<u8>, Vec<u8>)> {
        match intention {
            Intention::Out => match self.get() {
                Some(v) => vec![(Cf::Data, codec::encode_data_key(req.dbid, &req.key, 0, None), v.get_blob().to_vec())],
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn encode_range(&self, _intention: Intention, _req: &KeyRequest, _ctx: &StrCtx) -> Option<RangeOp> {
        None
    }

    fn decode_data(&self, rows: SwapResultRows, _ctx: &StrCtx) -> SwapResult<Option<Data>> {
        match rows {
            SwapResultRows::Nothing => Ok(None),
            SwapResultRows::Rows(mut rows) => match rows.pop() {
                Some((_, _, val)) => Ok(Some(Data::copy_from_slice(&val))),
                None => Ok(None),
            },
        }
    }

    fn create_or_merge(&self, decoded: Option<Data>, meta: &mut ObjectMeta, _ctx: &StrCtx) -> Option<Data> {
        if let Some(v) = &decoded {
            self.set(v.clone());
            meta.cold_len = 0;
        }
        decoded
    }

    fn swap_in(&self, _carry: Option<Data>, _meta: &mut ObjectMeta, _ctx: &StrCtx) {}

    fn swap_out(&self, _ctx: &StrCtx, keep_data: bool, meta: &mut ObjectMeta, totally_out: &mut bool) {
        if !keep_data {
            *self.data.write() = None;
        }
        meta.cold_len = 1;
        *totally_out = !keep_data;
    }

    fn swap_del(&self, _ctx: &StrCtx, _skip_data: bool, meta: &mut ObjectMeta) {
        *self.data.write() = None;
        meta.cold_len = 0;
    }

    fn clean_object(&self, _ctx: &StrCtx, keep_data: bool, _meta: &mut ObjectMeta) {
        if !keep_data {
            *self.data.write() = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swap::request::{Level, SubkeySpec};

    fn req(intention: Intention) -> KeyRequest {
        KeyRequest {
            level: Level::Key,
            dbid: 0,
            key: b"s".to_vec(),
            intention,
            intention_flags: SwapFlags::empty(),
            subkey_spec: SubkeySpec::WholeKey,
            arg_rewrite: Vec::new(),
            txid: 1,
            evict_step: 1,
        }
    }

    #[test]
    fn resident_string_in_is_nop() {
        let s = StrValue::new(Some(Data::from_string("hi".into())));
        let meta = ObjectMeta::new(SwapType::Str);
        let mut ctx = StrCtx::default();
        let cold = ColdFilter::new(&Default::default());
        let (intention, _) = s.analyze(Some(&meta), &req(Intention::In), &cold, &mut ctx);
        assert_eq!(intention, Intention::Nop);
    }

    #[test]
    fn cold_string_in_pulls_from_disk() {
        let s = StrValue::new(None);
        let mut meta = ObjectMeta::new(SwapType::Str);
        meta.cold_len = 1;
        let mut ctx = StrCtx::default();
        let cold = ColdFilter::new(&Default::default());
        let (intention, _) = s.analyze(Some(&meta), &req(Intention::In), &cold, &mut ctx);
        assert_eq!(intention, Intention::In);
    }

    #[test]
    fn swap_out_evicts_and_reports_totally_out() {
        let s = StrValue::new(Some(Data::from_string("hi".into())));
        let mut meta = ObjectMeta::new(SwapType::Str);
        let ctx = StrCtx::default();
        let mut totally_out = false;
        s.swap_out(&ctx, false, &mut meta, &mut totally_out);
        assert!(totally_out);
        assert_eq!(s.resident_len(), 0);
        assert_eq!(meta.cold_len, 1);
    }
}
