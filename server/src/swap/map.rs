/*
 * Created on Sun Feb 18 2024
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

//! A sharded concurrent map, the same shape as `corestore::htable::Coremap` (ahash,
//! one `RwLock` per shard), kept local to the swap subsystem so it never has to pull
//! in the keyspace/table machinery that the rest of `corestore` drags along with it.

use ahash::RandomState;
use bytes::Bytes;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::ops::Deref;

fn shard_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_mul(4)
        .next_power_of_two()
}

fn shard_of<K: Hash + ?Sized>(hasher: &RandomState, key: &K, shards: usize) -> usize {
    hasher.hash_one(key) as usize & (shards - 1)
}

/// A sharded, `ahash`-keyed concurrent hashmap.
pub struct Coremap<K, V> {
    shards: Vec<RwLock<HashMap<K, V, RandomState>>>,
    hasher: RandomState,
}

impl<K: Eq + Hash, V> Default for Coremap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> Coremap<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    pub fn with_capacity(cap: usize) -> Self {
        let n = shard_count();
        let per_shard = (cap + n - 1) / n.max(1);
        Coremap {
            shards: (0..n)
                .map(|_| RwLock::new(HashMap::with_capacity_and_hasher(per_shard, RandomState::new())))
                .collect(),
            hasher: RandomState::new(),
        }
    }
    fn shard_for<Q>(&self, key: &Q) -> &RwLock<HashMap<K, V, RandomState>>
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        &self.shards[shard_of(&self.hasher, key, self.shards.len())]
    }
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn clear(&self) {
        self.shards.iter().for_each(|s| s.write().clear());
    }
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_for(key).read().contains_key(key)
    }
    pub fn upsert(&self, k: K, v: V) {
        self.shard_for(&k).write().insert(k, v);
    }
    /// Returns `true` if this was a fresh insert (the key was previously absent).
    pub fn true_if_insert(&self, k: K, v: V) -> bool {
        let mut guard = self.shard_for(&k).write();
        if guard.contains_key(&k) {
            false
        } else {
            guard.insert(k, v);
            true
        }
    }
    pub fn remove<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_for(key).write().remove_entry(key)
    }
    /// Borrows the value for `key` without cloning it out of the map. The read lock on
    /// the owning shard is held for as long as the returned [`Ref`] is alive.
    pub fn get<Q>(&self, key: &Q) -> Option<Ref<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let guard = self.shard_for(key).read();
        RwLockReadGuard::try_map(guard, |m| m.get(key))
            .ok()
            .map(|g| Ref(g, std::marker::PhantomData))
    }
}

impl<K: Eq + Hash, V: Clone> Coremap<K, V> {
    pub fn get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_for(key).read().get(key).cloned()
    }
}

/// A read-locked borrow of a single value in a [`Coremap`].
pub struct Ref<'a, K, V>(MappedRwLockReadGuard<'a, V>, std::marker::PhantomData<K>);

impl<'a, K, V> Deref for Ref<'a, K, V> {
    type Target = V;
    fn deref(&self) -> &V {
        &self.0
    }
}

/// One entry of a [`Coremap::iter`] snapshot.
pub struct IterItem<K, V>(K, V);

impl<K, V> IterItem<K, V> {
    pub fn key(&self) -> &K {
        &self.0
    }
    pub fn value(&self) -> &V {
        &self.1
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Coremap<K, V> {
    /// A point-in-time snapshot of all entries. Swap's hot paths never iterate the
    /// resident table on a per-request basis; this exists for diagnostics and tests.
    pub fn iter(&self) -> std::vec::IntoIter<IterItem<K, V>> {
        let snapshot: Vec<IterItem<K, V>> = self
            .shards
            .iter()
            .flat_map(|s| {
                s.read()
                    .iter()
                    .map(|(k, v)| IterItem(k.clone(), v.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        snapshot.into_iter()
    }
}

/// A wrapper around `Bytes`, mirroring `corestore::htable::Data`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Data {
    blob: Bytes,
}

impl Data {
    pub fn from_string(val: String) -> Self {
        Data {
            blob: Bytes::from(val.into_bytes()),
        }
    }
    pub const fn from_blob(blob: Bytes) -> Self {
        Data { blob }
    }
    pub const fn get_blob(&self) -> &Bytes {
        &self.blob
    }
    pub fn into_inner(self) -> Bytes {
        self.blob
    }
    pub fn copy_from_slice(slice: &[u8]) -> Self {
        Self {
            blob: Bytes::copy_from_slice(slice),
        }
    }
}

impl Borrow<[u8]> for Data {
    fn borrow(&self) -> &[u8] {
        &self.blob
    }
}

impl<T> From<T> for Data
where
    T: Into<Bytes>,
{
    fn from(dat: T) -> Self {
        Self { blob: dat.into() }
    }
}

impl Deref for Data {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_round_trips() {
        let map: Coremap<Data, u64> = Coremap::new();
        let k = Data::from_string("hello".into());
        assert!(map.true_if_insert(k.clone(), 42));
        assert!(!map.true_if_insert(k.clone(), 7));
        assert_eq!(map.get_cloned(&k), Some(42));
        assert_eq!(map.len(), 1);
        let (rk, rv) = map.remove(&k).unwrap();
        assert_eq!(rk, k);
        assert_eq!(rv, 42);
        assert!(map.is_empty());
    }

    #[test]
    fn shards_distribute_across_many_keys() {
        let map: Coremap<Data, usize> = Coremap::new();
        for i in 0..1000 {
            map.upsert(Data::from_string(i.to_string()), i);
        }
        assert_eq!(map.len(), 1000);
        assert_eq!(map.get_cloned(&Data::from_string("500".into())), Some(500));
    }
}
