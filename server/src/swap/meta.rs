/*
 * Created on Tue Feb 13 2024
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

//! The object-meta store: a `(db, key) -> ObjectMeta` map held beside the main
//! keyspace. Only swap merge code (running after a key request has been admitted by
//! the listener graph) is allowed to touch it, so it carries no locking of its own
//! beyond the `Coremap`'s internal sharding.

use crate::swap::map::{Coremap, Data};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapType {
    Str,
    Hash,
    Set,
    ZSet,
    List,
    Bitmap,
}

impl SwapType {
    pub const fn to_tag(self) -> u8 {
        match self {
            Self::Str => 0,
            Self::Hash => 1,
            Self::Set => 2,
            Self::ZSet => 3,
            Self::List => 4,
            Self::Bitmap => 5,
        }
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::Str,
            1 => Self::Hash,
            2 => Self::Set,
            3 => Self::ZSet,
            4 => Self::List,
            5 => Self::Bitmap,
            _ => return None,
        })
    }
}

/// One contiguous run of a list's "raw-index" space: `[ridx_lo, ridx_hi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub ridx_lo: u64,
    pub ridx_hi: u64,
    pub in_memory: bool,
}

impl Segment {
    pub const fn len(&self) -> u64 {
        self.ridx_hi - self.ridx_lo
    }

    pub const fn contains(&self, ridx: u64) -> bool {
        ridx >= self.ridx_lo && ridx < self.ridx_hi
    }
}

/// Which fixed-size byte buckets of a logical bitmap are resident in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketMap {
    pub bucket_size: u32,
    resident: Vec<bool>,
}

impl BucketMap {
    pub fn new(bucket_size: u32) -> Self {
        Self { bucket_size, resident: Vec::new() }
    }

    pub fn bucket_of(&self, byte_offset: usize) -> usize {
        byte_offset / (self.bucket_size as usize).max(1)
    }

    pub fn is_resident(&self, bucket: usize) -> bool {
        self.resident.get(bucket).copied().unwrap_or(false)
    }

    pub fn set_resident(&mut self, bucket: usize, resident: bool) {
        if bucket >= self.resident.len() {
            self.resident.resize(bucket + 1, false);
        }
        self.resident[bucket] = resident;
    }

    pub fn bucket_count(&self) -> usize {
        self.resident.len()
    }
}

/// Per-type auxiliary payload carried by `ObjectMeta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaAux {
    /// hash / set / zset: `cold_len` alone is enough bookkeeping.
    None,
    /// list: ordered, non-overlapping segments over the raw-index space.
    Segments(Vec<Segment>),
    /// bitmap: which byte buckets are resident.
    Buckets(BucketMap),
}

/// Per-key descriptor held beside the main keyspace. `cold_len == 0 && value in RAM`
/// means hot; `value not in RAM` means cold; otherwise warm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub version: u64,
    pub swap_type: SwapType,
    pub cold_len: u64,
    pub expire_ms: i64,
    pub aux: MetaAux,
}

impl ObjectMeta {
    pub fn new(swap_type: SwapType) -> Self {
        let aux = match swap_type {
            SwapType::List => MetaAux::Segments(Vec::new()),
            SwapType::Bitmap => MetaAux::Buckets(BucketMap::new(4096)),
            _ => MetaAux::None,
        };
        Self { version: 1, swap_type, cold_len: 0, expire_ms: -1, aux }
    }

    /// A value is hot once nothing of it has spilled cold and it is non-empty.
    pub fn is_hot(&self, value_len: usize) -> bool {
        self.cold_len == 0 && value_len > 0
    }

    /// No value resident at all.
    pub fn is_cold(&self, value_len: usize) -> bool {
        value_len == 0
    }

    pub fn is_warm(&self, value_len: usize) -> bool {
        self.cold_len > 0 && value_len > 0
    }

    /// Bump the version on a cold->hot->cold transition that requires dropping old
    /// data. Readers must never observe rows across versions.
    pub fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    pub fn segments(&self) -> Option<&[Segment]> {
        match &self.aux {
            MetaAux::Segments(s) => Some(s),
            _ => None,
        }
    }

    pub fn segments_mut(&mut self) -> Option<&mut Vec<Segment>> {
        match &mut self.aux {
            MetaAux::Segments(s) => Some(s),
            _ => None,
        }
    }

    pub fn buckets(&self) -> Option<&BucketMap> {
        match &self.aux {
            MetaAux::Buckets(b) => Some(b),
            _ => None,
        }
    }

    pub fn buckets_mut(&mut self) -> Option<&mut BucketMap> {
        match &mut self.aux {
            MetaAux::Buckets(b) => Some(b),
            _ => None,
        }
    }
}

/// `(db, key) -> ObjectMeta`, one per `swap::Db`. Server-thread only: no key request
/// can reach swap merge code without having been admitted by the listener graph
/// first, so the table itself never needs to guard against racing writers -- the
/// `Coremap` sharding below is purely for read throughput.
#[derive(Debug, Default)]
pub struct ObjectMetaTable {
    inner: Coremap<Data, ObjectMeta>,
}

impl ObjectMetaTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &[u8]) -> Option<ObjectMeta> {
        self.inner.get_cloned(key)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.inner.contains_key(key)
    }

    pub fn insert(&self, key: Data, meta: ObjectMeta) {
        self.inner.upsert(key, meta);
    }

    pub fn remove(&self, key: &[u8]) -> Option<ObjectMeta> {
        self.inner.remove(key).map(|(_, v)| v)
    }

    /// Mutate an existing entry in place; returns `false` if the key has no meta.
    pub fn update(&self, key: &[u8], f: impl FnOnce(&mut ObjectMeta)) -> bool {
        match self.inner.get_cloned(key) {
            Some(mut meta) => {
                // Coremap entries are sharded maps guarded internally; cloning out,
                // mutating, and writing back keeps this module free of any extra
                // locking of its own.
                f(&mut meta);
                self.inner.upsert(Data::copy_from_slice(key), meta);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}
