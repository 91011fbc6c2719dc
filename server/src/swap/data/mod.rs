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

//! The polymorphic swap-data contract: one implementation per
//! value type, dispatched statically through the `SwapValue` enum rather than
//! through virtual dispatch -- skytable already prefers a closed tagged variant
//! plus a dispatch table over a trait object wherever the variant set is closed
//! (see `corestore::data::tag` for the same shape applied to BlueQL literals).

pub mod bitmap;
pub mod hash;
pub mod list;
pub mod set;
pub mod string;
pub mod zset;

use crate::swap::codec::Cf;
use crate::swap::coldfilter::ColdFilter;
use crate::swap::error::SwapResult;
use crate::swap::map::Data;
use crate::swap::meta::{ObjectMeta, SwapType};
use crate::swap::request::KeyRequest;

/// A tiny home-grown bitflags macro: skytable's own `BoolTable` / macro-heavy style
/// (see `corestore/booltable.rs`, `actions/macros.rs`) favors small hand-rolled
/// macros over reaching for the `bitflags` crate for a handful of flags.
macro_rules! bitflags_lite {
    (
        $(#[$outer:meta])*
        pub struct $name:ident: $repr:ty {
            $(const $flag:ident = $val:expr;)*
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name($repr);

        impl $name {
            $(pub const $flag: Self = Self($val);)*
            pub const NONE: Self = Self(0);

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn contains(self, other: Self) -> bool {
                (self.0 & other.0) == other.0
            }

            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }
    };
}

/// High level direction of a swap, chosen by `analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intention {
    /// The request is fully satisfiable from RAM; no disk I/O needed.
    Nop,
    /// Pull (some or all) subkeys from disk into RAM.
    In,
    /// Persist (some or all) subkeys to disk, optionally evicting them from RAM.
    Out,
    /// Remove the key, in RAM and/or on disk.
    Del,
}

/// Concrete rocksdb primitive an intention maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Nop,
    Get,
    Iterate,
    Put,
    Del,
}

bitflags_lite! {
    /// Executor-facing flags set by `analyze`, consumed by `swap::request`'s
    /// executor/merge pipeline.
    pub struct SwapFlags: u32 {
        /// After reading the row(s) back, also delete them (lazy cold-delete,
        /// "delete = delete meta only" made safe by the compaction filter).
        const EXEC_IN_DEL = 0b0001;
        /// After persisting, keep the in-memory copy resident (persist-but-stay-hot).
        const EXEC_OUT_KEEP_DATA = 0b0010;
        /// Force the key to be considered fully hot once this request merges.
        const EXEC_FORCE_HOT = 0b0100;
        /// Refuse the swap-in if it would exceed the configured memory budget.
        const EXEC_OOM_CHECK = 0b1000;
        /// The request is allowed to lazily drop a cold key without reading its
        /// data back first (`DEL` with `SKIP_FIN`).
        const SKIP_FIN = 0b1_0000;
    }
}

/// One `(cf, raw_key)` pair to fetch or delete.
pub type KeyOp = (Cf, Vec<u8>);
/// One `(cf, raw_key, raw_val)` triple to write.
pub type DataOp = (Cf, Vec<u8>, Vec<u8>);
/// A bounded range scan: `(cf, start, end, limit)`. `limit = None` means unbounded.
pub type RangeOp = (Cf, Vec<u8>, Vec<u8>, Option<usize>);

/// Opaque decode target: either nothing, a fully decoded runtime object, or raw CF
/// rows waiting on type-specific decoding -- a typed sum in place of an untyped
/// carrier, so each swap-type's decoder only ever sees the shape it produced.
#[derive(Debug, Clone)]
pub enum SwapResultRows {
    Nothing,
    Rows(Vec<(Cf, Vec<u8>, Vec<u8>)>),
}

/// Per-request scratch space threaded through `analyze` -> `encode_*` -> `decode_*`
/// -> `create_or_merge`. Each swap-data implementation defines its own concrete
/// context; callers only ever see it through the `SwapAble` contract.
pub trait SwapCtx: std::fmt::Debug + Send {}

/// The contract every swap-type must implement. `T` is the
/// in-memory runtime representation already used by the rest of the server for
/// this value type (e.g. `Coremap<Data, Data>` for hashes).
pub trait SwapAble {
    type Ctx: SwapCtx;
    type Decoded;

    fn swap_type() -> SwapType;

    /// Pure analysis given the current in-memory state and the key request. `cold`
    /// is consulted (never mutated) so a subkey already known to be absent from
    /// disk is dropped from the fetch list instead of round-tripping an I/O that
    /// can only come back empty. Side-effect-free except for writing into `ctx`;
    /// must be idempotent.
    fn analyze(&self, meta: Option<&ObjectMeta>, req: &KeyRequest, cold: &ColdFilter, ctx: &mut Self::Ctx) -> (Intention, SwapFlags);

    fn choose_action(intention: Intention, ctx: &Self::Ctx) -> Action;

    fn encode_keys(&self, intention: Intention, req: &KeyRequest, ctx: &Self::Ctx) -> Vec<KeyOp>;
    fn encode_data(&self, intention: Intention, req: &KeyRequest, ctx: &Self::Ctx) -> Vec<DataOp>;
    fn encode_range(&self, intention: Intention, req: &KeyRequest, ctx: &Self::Ctx) -> Option<RangeOp>;
    fn decode_data(&self, rows: SwapResultRows, ctx: &Self::Ctx) -> SwapResult<Self::Decoded>;

    /// Runs in the server thread after I/O completes. Installs `decoded` into the
    /// in-memory dataset (cold -> warm) or folds it into the existing object (warm
    /// -> warmer). Returns an implementation-defined "carry" consumed by `swap_in`.
    fn create_or_merge(&self, decoded: Self::Decoded, meta: &mut ObjectMeta, ctx: &Self::Ctx) -> Self::Decoded;

    fn swap_in(&self, carry: Self::Decoded, meta: &mut ObjectMeta, ctx: &Self::Ctx);
    /// Persists residency to disk, optionally evicting it from RAM. `totally_out`
    /// is set to `true` when the key has no resident subkeys left afterwards.
    fn swap_out(&self, ctx: &Self::Ctx, keep_data: bool, meta: &mut ObjectMeta, totally_out: &mut bool);
    fn swap_del(&self, ctx: &Self::Ctx, skip_data: bool, meta: &mut ObjectMeta);
    fn clean_object(&self, ctx: &Self::Ctx, keep_data: bool, meta: &mut ObjectMeta);
    fn merged_is_hot(&self, meta: &ObjectMeta) -> bool {
        meta.cold_len == 0
    }
}

/// Closed tagged variant over the six value types, matching the `KVEngine<T>` /
/// `LockedVec` idiom already used by `kvengine` -- generalized here to six
/// variants instead of one.
#[derive(Debug)]
pub enum SwapValue {
    Str(string::StrValue),
    Hash(hash::HashValue),
    Set(set::SetValue),
    ZSet(zset::ZSetValue),
    List(list::ListValue),
    Bitmap(bitmap::BitmapValue),
}

impl SwapValue {
    pub fn swap_type(&self) -> SwapType {
        match self {
            Self::Str(_) => SwapType::Str,
            Self::Hash(_) => SwapType::Hash,
            Self::Set(_) => SwapType::Set,
            Self::ZSet(_) => SwapType::ZSet,
            Self::List(_) => SwapType::List,
            Self::Bitmap(_) => SwapType::Bitmap,
        }
    }

    /// Number of subkeys (or bytes, for bitmaps) currently resident in RAM. Used by
    /// `ObjectMeta::is_hot`/`is_warm`/`is_cold` call sites.
    pub fn resident_len(&self) -> usize {
        match self {
            Self::Str(v) => v.resident_len(),
            Self::Hash(v) => v.resident_len(),
            Self::Set(v) => v.resident_len(),
            Self::ZSet(v) => v.resident_len(),
            Self::List(v) => v.resident_len(),
            Self::Bitmap(v) => v.resident_len(),
        }
    }

    /// A freshly created, empty value of `swap_type` -- what a key touched for the
    /// first time starts out as, before anything has been set on it.
    pub fn new_of_type(swap_type: SwapType) -> Self {
        match swap_type {
            SwapType::Str => Self::Str(string::StrValue::new(None)),
            SwapType::Hash => Self::Hash(hash::HashValue::new()),
            SwapType::Set => Self::Set(set::SetValue::new()),
            SwapType::ZSet => Self::ZSet(zset::ZSetValue::new()),
            SwapType::List => Self::List(list::ListValue::new()),
            SwapType::Bitmap => Self::Bitmap(bitmap::BitmapValue::new()),
        }
    }

    /// An empty `Decoded` of the matching type -- what a `Nop`-analyzed request
    /// merges, since `analyze` decided nothing needs to be read back from disk.
    pub fn empty_decoded(&self) -> SwapDecoded {
        match self {
            Self::Str(_) => SwapDecoded::Str(None),
            Self::Hash(_) => SwapDecoded::Hash(Vec::new()),
            Self::Set(_) => SwapDecoded::Set(Vec::new()),
            Self::ZSet(_) => SwapDecoded::ZSet(Vec::new()),
            Self::List(_) => SwapDecoded::List(Vec::new()),
            Self::Bitmap(_) => SwapDecoded::Bitmap(Vec::new()),
        }
    }

    pub fn analyze(&self, meta: Option<&ObjectMeta>, req: &KeyRequest, cold: &ColdFilter, ctx: &mut SwapValueCtx) -> (Intention, SwapFlags) {
        match (self, ctx) {
            (Self::Str(v), SwapValueCtx::Str(c)) => v.analyze(meta, req, cold, c),
            (Self::Hash(v), SwapValueCtx::Hash(c)) => v.analyze(meta, req, cold, c),
            (Self::Set(v), SwapValueCtx::Set(c)) => v.analyze(meta, req, cold, c),
            (Self::ZSet(v), SwapValueCtx::ZSet(c)) => v.analyze(meta, req, cold, c),
            (Self::List(v), SwapValueCtx::List(c)) => v.analyze(meta, req, cold, c),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c)) => v.analyze(meta, req, cold, c),
            _ => unreachable!("swap value/ctx type mismatch"),
        }
    }

    pub fn encode_keys(&self, intention: Intention, req: &KeyRequest, ctx: &SwapValueCtx) -> Vec<KeyOp> {
        match (self, ctx) {
            (Self::Str(v), SwapValueCtx::Str(c)) => v.encode_keys(intention, req, c),
            (Self::Hash(v), SwapValueCtx::Hash(c)) => v.encode_keys(intention, req, c),
            (Self::Set(v), SwapValueCtx::Set(c)) => v.encode_keys(intention, req, c),
            (Self::ZSet(v), SwapValueCtx::ZSet(c)) => v.encode_keys(intention, req, c),
            (Self::List(v), SwapValueCtx::List(c)) => v.encode_keys(intention, req, c),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c)) => v.encode_keys(intention, req, c),
            _ => unreachable!("swap value/ctx type mismatch"),
        }
    }

    pub fn encode_data(&self, intention: Intention, req: &KeyRequest, ctx: &SwapValueCtx) -> Vec<DataOp> {
        match (self, ctx) {
            (Self::Str(v), SwapValueCtx::Str(c)) => v.encode_data(intention, req, c),
            (Self::Hash(v), SwapValueCtx::Hash(c)) => v.encode_data(intention, req, c),
            (Self::Set(v), SwapValueCtx::Set(c)) => v.encode_data(intention, req, c),
            (Self::ZSet(v), SwapValueCtx::ZSet(c)) => v.encode_data(intention, req, c),
            (Self::List(v), SwapValueCtx::List(c)) => v.encode_data(intention, req, c),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c)) => v.encode_data(intention, req, c),
            _ => unreachable!("swap value/ctx type mismatch"),
        }
    }

    pub fn encode_range(&self, intention: Intention, req: &KeyRequest, ctx: &SwapValueCtx) -> Option<RangeOp> {
        match (self, ctx) {
            (Self::Str(v), SwapValueCtx::Str(c)) => v.encode_range(intention, req, c),
            (Self::Hash(v), SwapValueCtx::Hash(c)) => v.encode_range(intention, req, c),
            (Self::Set(v), SwapValueCtx::Set(c)) => v.encode_range(intention, req, c),
            (Self::ZSet(v), SwapValueCtx::ZSet(c)) => v.encode_range(intention, req, c),
            (Self::List(v), SwapValueCtx::List(c)) => v.encode_range(intention, req, c),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c)) => v.encode_range(intention, req, c),
            _ => unreachable!("swap value/ctx type mismatch"),
        }
    }

    pub fn decode_data(&self, rows: SwapResultRows, ctx: &SwapValueCtx) -> SwapResult<SwapDecoded> {
        match (self, ctx) {
            (Self::Str(v), SwapValueCtx::Str(c)) => v.decode_data(rows, c).map(SwapDecoded::Str),
            (Self::Hash(v), SwapValueCtx::Hash(c)) => v.decode_data(rows, c).map(SwapDecoded::Hash),
            (Self::Set(v), SwapValueCtx::Set(c)) => v.decode_data(rows, c).map(SwapDecoded::Set),
            (Self::ZSet(v), SwapValueCtx::ZSet(c)) => v.decode_data(rows, c).map(SwapDecoded::ZSet),
            (Self::List(v), SwapValueCtx::List(c)) => v.decode_data(rows, c).map(SwapDecoded::List),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c)) => v.decode_data(rows, c).map(SwapDecoded::Bitmap),
            _ => unreachable!("swap value/ctx type mismatch"),
        }
    }

    /// Installs `decoded` into the in-memory dataset and returns the carry `swap_in`
    /// consumes. Panics (via `unreachable!`) on a value/ctx/decoded type mismatch --
    /// callers always construct all three from the same `SwapType`, so a mismatch
    /// here is a programming error in the executor, not a runtime condition.
    pub fn create_or_merge(&self, decoded: SwapDecoded, meta: &mut ObjectMeta, ctx: &SwapValueCtx) -> SwapDecoded {
        match (self, ctx, decoded) {
            (Self::Str(v), SwapValueCtx::Str(c), SwapDecoded::Str(d)) => SwapDecoded::Str(v.create_or_merge(d, meta, c)),
            (Self::Hash(v), SwapValueCtx::Hash(c), SwapDecoded::Hash(d)) => SwapDecoded::Hash(v.create_or_merge(d, meta, c)),
            (Self::Set(v), SwapValueCtx::Set(c), SwapDecoded::Set(d)) => SwapDecoded::Set(v.create_or_merge(d, meta, c)),
            (Self::ZSet(v), SwapValueCtx::ZSet(c), SwapDecoded::ZSet(d)) => SwapDecoded::ZSet(v.create_or_merge(d, meta, c)),
            (Self::List(v), SwapValueCtx::List(c), SwapDecoded::List(d)) => SwapDecoded::List(v.create_or_merge(d, meta, c)),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c), SwapDecoded::Bitmap(d)) => {
                SwapDecoded::Bitmap(v.create_or_merge(d, meta, c))
            }
            _ => unreachable!("swap value/ctx/decoded type mismatch"),
        }
    }

    pub fn swap_in(&self, carry: SwapDecoded, meta: &mut ObjectMeta, ctx: &SwapValueCtx) {
        match (self, ctx, carry) {
            (Self::Str(v), SwapValueCtx::Str(c), SwapDecoded::Str(d)) => v.swap_in(d, meta, c),
            (Self::Hash(v), SwapValueCtx::Hash(c), SwapDecoded::Hash(d)) => v.swap_in(d, meta, c),
            (Self::Set(v), SwapValueCtx::Set(c), SwapDecoded::Set(d)) => v.swap_in(d, meta, c),
            (Self::ZSet(v), SwapValueCtx::ZSet(c), SwapDecoded::ZSet(d)) => v.swap_in(d, meta, c),
            (Self::List(v), SwapValueCtx::List(c), SwapDecoded::List(d)) => v.swap_in(d, meta, c),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c), SwapDecoded::Bitmap(d)) => v.swap_in(d, meta, c),
            _ => unreachable!("swap value/ctx/decoded type mismatch"),
        }
    }

    pub fn swap_out(&self, ctx: &SwapValueCtx, keep_data: bool, meta: &mut ObjectMeta, totally_out: &mut bool) {
        match (self, ctx) {
            (Self::Str(v), SwapValueCtx::Str(c)) => v.swap_out(c, keep_data, meta, totally_out),
            (Self::Hash(v), SwapValueCtx::Hash(c)) => v.swap_out(c, keep_data, meta, totally_out),
            (Self::Set(v), SwapValueCtx::Set(c)) => v.swap_out(c, keep_data, meta, totally_out),
            (Self::ZSet(v), SwapValueCtx::ZSet(c)) => v.swap_out(c, keep_data, meta, totally_out),
            (Self::List(v), SwapValueCtx::List(c)) => v.swap_out(c, keep_data, meta, totally_out),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c)) => v.swap_out(c, keep_data, meta, totally_out),
            _ => unreachable!("swap value/ctx type mismatch"),
        }
    }

    pub fn swap_del(&self, ctx: &SwapValueCtx, skip_data: bool, meta: &mut ObjectMeta) {
        match (self, ctx) {
            (Self::Str(v), SwapValueCtx::Str(c)) => v.swap_del(c, skip_data, meta),
            (Self::Hash(v), SwapValueCtx::Hash(c)) => v.swap_del(c, skip_data, meta),
            (Self::Set(v), SwapValueCtx::Set(c)) => v.swap_del(c, skip_data, meta),
            (Self::ZSet(v), SwapValueCtx::ZSet(c)) => v.swap_del(c, skip_data, meta),
            (Self::List(v), SwapValueCtx::List(c)) => v.swap_del(c, skip_data, meta),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c)) => v.swap_del(c, skip_data, meta),
            _ => unreachable!("swap value/ctx type mismatch"),
        }
    }

    pub fn clean_object(&self, ctx: &SwapValueCtx, keep_data: bool, meta: &mut ObjectMeta) {
        match (self, ctx) {
            (Self::Str(v), SwapValueCtx::Str(c)) => v.clean_object(c, keep_data, meta),
            (Self::Hash(v), SwapValueCtx::Hash(c)) => v.clean_object(c, keep_data, meta),
            (Self::Set(v), SwapValueCtx::Set(c)) => v.clean_object(c, keep_data, meta),
            (Self::ZSet(v), SwapValueCtx::ZSet(c)) => v.clean_object(c, keep_data, meta),
            (Self::List(v), SwapValueCtx::List(c)) => v.clean_object(c, keep_data, meta),
            (Self::Bitmap(v), SwapValueCtx::Bitmap(c)) => v.clean_object(c, keep_data, meta),
            _ => unreachable!("swap value/ctx type mismatch"),
        }
    }

    pub fn merged_is_hot(&self, meta: &ObjectMeta) -> bool {
        match self {
            Self::Str(v) => v.merged_is_hot(meta),
            Self::Hash(v) => v.merged_is_hot(meta),
            Self::Set(v) => v.merged_is_hot(meta),
            Self::ZSet(v) => v.merged_is_hot(meta),
            Self::List(v) => v.merged_is_hot(meta),
            Self::Bitmap(v) => v.merged_is_hot(meta),
        }
    }
}

/// The `Ctx` half of `SwapValue`, one variant per type, constructed fresh for every
/// request (`analyze` populates it, `encode_*`/`decode_data`/`create_or_merge` read
/// it back).
#[derive(Debug)]
pub enum SwapValueCtx {
    Str(string::StrCtx),
    Hash(hash::HashCtx),
    Set(set::SetCtx),
    ZSet(zset::ZSetCtx),
    List(list::ListCtx),
    Bitmap(bitmap::BitmapCtx),
}

impl SwapValueCtx {
    pub fn new(swap_type: SwapType) -> Self {
        match swap_type {
            SwapType::Str => Self::Str(string::StrCtx::default()),
            SwapType::Hash => Self::Hash(hash::HashCtx::default()),
            SwapType::Set => Self::Set(set::SetCtx::default()),
            SwapType::ZSet => Self::ZSet(zset::ZSetCtx::default()),
            SwapType::List => Self::List(list::ListCtx::default()),
            SwapType::Bitmap => Self::Bitmap(bitmap::BitmapCtx::default()),
        }
    }

    /// `choose_action` takes no `&self` in the `SwapAble` contract -- it only needs
    /// the populated `Ctx` -- so it dispatches off this enum rather than `SwapValue`.
    pub fn choose_action(&self, intention: Intention) -> Action {
        match self {
            Self::Str(c) => string::StrValue::choose_action(intention, c),
            Self::Hash(c) => hash::HashValue::choose_action(intention, c),
            Self::Set(c) => set::SetValue::choose_action(intention, c),
            Self::ZSet(c) => zset::ZSetValue::choose_action(intention, c),
            Self::List(c) => list::ListValue::choose_action(intention, c),
            Self::Bitmap(c) => bitmap::BitmapValue::choose_action(intention, c),
        }
    }
}

/// Decoded rows from `decode_data`, tagged by swap type so one value can flow through
/// the rest of the (otherwise type-erased) executor pipeline without it needing to
/// know which of the six types it is carrying.
#[derive(Debug, Clone)]
pub enum SwapDecoded {
    Str(Option<Data>),
    Hash(Vec<(Data, Data)>),
    Set(Vec<Data>),
    ZSet(Vec<(Data, f64)>),
    List(Vec<(u64, Data)>),
    Bitmap(Vec<(u32, Vec<u8>)>),
}
