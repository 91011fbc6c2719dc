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

//! The tiered swap storage core: hot data lives resident in RAM exactly the way a
//! plain in-memory table would hold it; cold data spills to an embedded `rocksdb`
//! store addressed by a numeric `dbid`, independent of Skytable's own keyspace/table
//! hierarchy.
//!
//! Module map:
//! - [`codec`] -- column-family key/value encoding
//! - [`map`] -- the sharded concurrent map the resident tables and listener graph sit on
//! - [`meta`] -- the `(db, key) -> ObjectMeta` side table
//! - [`coldfilter`] -- per-db negative caches (cuckoo filter + absent-subkey LRU)
//! - [`data`] -- the polymorphic `SwapAble` contract and the six value types
//! - [`listener`] -- the three-level FIFO wait graph
//! - [`request`] -- `KeyRequest`/`SwapRequest`/`Batch`
//! - [`pool`] -- the autoscaling worker pool that touches rocksdb
//! - [`compaction`] -- the orphan-row compaction filter
//! - [`db`] -- the single rocksdb handle and its column families
//! - [`rdb`] -- snapshot save/load for the cold store
//! - [`error`] -- `SwapError`/`SwapResult`
//! - [`exec`] -- wires `listener` + `data` + `db` together into `execute`

pub mod codec;
pub mod coldfilter;
pub mod compaction;
pub mod data;
pub mod db;
pub mod error;
pub mod exec;
pub mod listener;
pub mod map;
pub mod meta;
pub mod pool;
pub mod rdb;
pub mod request;

use crate::swap::map::{Coremap, Data as DataKey};
use crate::swap::coldfilter::{ColdFilter, ColdFilterConfig};
use crate::swap::codec::DbId;
use crate::swap::data::SwapValue;
use crate::swap::db::{Engine, EngineConfig};
use crate::swap::error::{SwapError, SwapResult};
use crate::swap::listener::ListenerGraph;
use crate::swap::meta::{ObjectMetaTable, SwapType};
use crate::swap::pool::{PoolConfig, WorkerPool};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Everything the resource model cares about, tunable from
/// `config::runtime`'s `swap-*` knobs.
#[derive(Debug, Clone)]
pub struct SwapConfig {
    pub evict_step: usize,
    pub cold_filter: ColdFilterConfig,
    pub pool: PoolConfig,
    pub engine: EngineConfig,
    /// In-flight swap-in memory, in bytes, at which new swap-ins are slowed (not yet
    /// refused) by making the requesting connection await completion synchronously
    /// rather than pipelining further work.
    pub inflight_memory_slowdown_bytes: i64,
    /// In-flight swap-in memory, in bytes, at which a swap-in is refused outright
    /// with `SwapError::Oom`.
    pub inflight_memory_stop_bytes: i64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            evict_step: 128,
            cold_filter: ColdFilterConfig::default(),
            pool: PoolConfig::default(),
            engine: EngineConfig::default(),
            inflight_memory_slowdown_bytes: 256 * 1024 * 1024,
            inflight_memory_stop_bytes: 512 * 1024 * 1024,
        }
    }
}

/// One numbered database's worth of swap state: the resident values, their
/// object-meta side table, and the negative-cache cold filter, keyed by a plain
/// numeric `dbid` independent of Skytable's own keyspace/table hierarchy.
pub struct Db {
    resident: Coremap<DataKey, SwapValue>,
    meta: ObjectMetaTable,
    cold_filter: ColdFilter,
}

impl Db {
    fn new(cfg: &ColdFilterConfig) -> Self {
        Self { resident: Coremap::new(), meta: ObjectMetaTable::new(), cold_filter: ColdFilter::new(cfg) }
    }

    pub fn meta(&self) -> &ObjectMetaTable {
        &self.meta
    }

    pub fn cold_filter(&self) -> &ColdFilter {
        &self.cold_filter
    }

    /// Runs `f` against the resident value for `key`, if any, without cloning it out
    /// of the `Coremap`.
    pub fn resident_with<R>(&self, key: &[u8], f: impl FnOnce(Option<&SwapValue>) -> R) -> R {
        match self.resident.get(key) {
            Some(entry) => f(Some(&entry)),
            None => f(None),
        }
    }

    pub fn resident_contains(&self, key: &[u8]) -> bool {
        self.resident.contains_key(key)
    }

    pub fn resident_insert(&self, key: DataKey, value: SwapValue) {
        self.resident.upsert(key, value);
    }

    pub fn resident_remove(&self, key: &[u8]) {
        self.resident.remove(key);
    }

    pub fn resident_len(&self) -> usize {
        self.resident.len()
    }

    /// Ensures a resident `SwapValue` exists for `key`, creating an empty one when
    /// this is the first time the key has ever been touched. The type already on
    /// record (from a persisted `meta` row or an already-resident value) always
    /// wins over `default_type`, which applies only to a genuinely new key -- a
    /// command handler cannot reclassify an existing key's swap type by supplying
    /// a different one here.
    pub fn get_or_create_resident(&self, key: &[u8], default_type: SwapType) -> SwapType {
        if let Some(meta) = self.meta.get(key) {
            if !self.resident.contains_key(key) {
                self.resident.upsert(DataKey::copy_from_slice(key), SwapValue::new_of_type(meta.swap_type));
            }
            return meta.swap_type;
        }
        if let Some(existing) = self.resident.get(key) {
            return existing.swap_type();
        }
        self.resident.upsert(DataKey::copy_from_slice(key), SwapValue::new_of_type(default_type));
        default_type
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").field("resident_len", &self.resident_len()).field("meta_len", &self.meta.len()).finish()
    }
}

/// Running counters surfaced by `INFO`/`CONFIG GET swap-*`.
#[derive(Debug, Default)]
pub struct SwapStats {
    pub swap_ins: AtomicU64,
    pub swap_outs: AtomicU64,
    pub swap_dels: AtomicU64,
    pub swap_nops: AtomicU64,
    pub swap_errors: AtomicU64,
}

/// The process-wide swap subsystem: one rocksdb handle, one listener graph, one
/// worker pool, one `Db` per `dbid`, shared by every connection task via `Arc`. The
/// in-flight memory gauge and the disk-degraded flag are plain atomics held directly
/// on the struct, the same "small atomic flags, no extra locking" shape `registry`
/// uses for its own global state (`registry::state_okay`/`poison`/`unpoison`) --
/// generalized here from a single bool to the handful of counters the swap core
/// actually needs.
pub struct SwapRuntime {
    engine: Arc<Engine>,
    listener: ListenerGraph,
    pool: Arc<WorkerPool>,
    dbs: Coremap<DbId, Arc<Db>>,
    config: SwapConfig,
    stats: SwapStats,
    inflight_memory_bytes: AtomicI64,
    /// Runtime-tunable via `CONFIG SET swap-inprogress-memory-slowdown`; held as its
    /// own atomic (rather than read out of `config`) so a `CONFIG SET` takes effect on
    /// the very next admission check without needing a restart.
    inflight_memory_slowdown_bytes: AtomicI64,
    /// Runtime-tunable via `CONFIG SET swap-inprogress-memory-stop`.
    inflight_memory_stop_bytes: AtomicI64,
    disk_degraded: AtomicBool,
}

impl SwapRuntime {
    pub fn open(rocks_dir: impl AsRef<Path>, config: SwapConfig) -> SwapResult<Arc<Self>> {
        let engine = Arc::new(Engine::open(rocks_dir, &config.engine)?);
        let pool = WorkerPool::new(config.pool.clone());
        let slowdown = config.inflight_memory_slowdown_bytes;
        let stop = config.inflight_memory_stop_bytes;
        Ok(Arc::new(Self {
            engine,
            listener: ListenerGraph::new(),
            pool,
            dbs: Coremap::new(),
            config,
            stats: SwapStats::default(),
            inflight_memory_bytes: AtomicI64::new(0),
            inflight_memory_slowdown_bytes: AtomicI64::new(slowdown),
            inflight_memory_stop_bytes: AtomicI64::new(stop),
            disk_degraded: AtomicBool::new(false),
        }))
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn listener(&self) -> &ListenerGraph {
        &self.listener
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    pub fn stats(&self) -> &SwapStats {
        &self.stats
    }

    /// Returns (creating on first use) the per-`dbid` swap state.
    pub fn db(&self, dbid: DbId) -> Arc<Db> {
        if let Some(db) = self.dbs.get_cloned(&dbid) {
            return db;
        }
        let db = Arc::new(Db::new(&self.config.cold_filter));
        self.dbs.upsert(dbid, db.clone());
        db
    }

    /// Admits `delta_bytes` (positive on swap-in, negative on release)
    /// against the configured budget. Rejects outright past `inflight_memory_stop`;
    /// callers are expected to check `should_slow_down` themselves for the softer
    /// threshold since that's a scheduling decision, not a hard error.
    pub fn admit_inflight_memory(&self, delta_bytes: i64) -> SwapResult<()> {
        if self.disk_degraded.load(Ordering::Acquire) {
            return Err(SwapError::DiskDegraded);
        }
        if delta_bytes > 0 {
            let projected = self.inflight_memory_bytes.load(Ordering::Acquire) + delta_bytes;
            if projected > self.inflight_memory_stop_bytes.load(Ordering::Acquire) {
                return Err(SwapError::Oom);
            }
        }
        self.inflight_memory_bytes.fetch_add(delta_bytes, Ordering::AcqRel);
        Ok(())
    }

    pub fn should_slow_down(&self) -> bool {
        self.inflight_memory_bytes.load(Ordering::Acquire) >= self.inflight_memory_slowdown_bytes.load(Ordering::Acquire)
    }

    /// How long the calling thread should sleep before admitting another swap-in,
    /// given where `inflight_memory_bytes` currently sits between the slowdown and
    /// stop marks: zero below the slowdown mark, rising linearly from 1ms at the
    /// slowdown mark to 10ms at the stop mark. This is the graduated counterpart to
    /// `admit_inflight_memory`'s hard refusal past the stop mark -- a request that
    /// hasn't yet hit `Oom` still pays a cost proportional to how close it is.
    pub fn backpressure_delay(&self) -> std::time::Duration {
        if !self.should_slow_down() {
            return std::time::Duration::ZERO;
        }
        let current = self.inflight_memory_bytes.load(Ordering::Acquire);
        let slowdown = self.inflight_memory_slowdown_bytes.load(Ordering::Acquire);
        let stop = self.inflight_memory_stop_bytes.load(Ordering::Acquire);
        let span = (stop - slowdown).max(1) as f64;
        let over = (current - slowdown).min(stop - slowdown) as f64;
        let millis = 1.0 + (over / span) * 9.0;
        std::time::Duration::from_millis(millis as u64)
    }

    pub fn inflight_memory_bytes(&self) -> i64 {
        self.inflight_memory_bytes.load(Ordering::Acquire)
    }

    pub fn inflight_memory_slowdown_bytes(&self) -> i64 {
        self.inflight_memory_slowdown_bytes.load(Ordering::Acquire)
    }

    pub fn inflight_memory_stop_bytes(&self) -> i64 {
        self.inflight_memory_stop_bytes.load(Ordering::Acquire)
    }

    /// Applied by `CONFIG SET swap-inprogress-memory-slowdown`. Rejects a value that
    /// would sit at or above the stop threshold, since a slowdown mark a request can
    /// never reach is equivalent to disabling the slowdown path entirely.
    pub fn set_inflight_memory_slowdown_bytes(&self, bytes: i64) -> Result<(), &'static str> {
        if bytes <= 0 || bytes >= self.inflight_memory_stop_bytes.load(Ordering::Acquire) {
            return Err("must be a positive integer below swap-inprogress-memory-stop");
        }
        self.inflight_memory_slowdown_bytes.store(bytes, Ordering::Release);
        Ok(())
    }

    /// Applied by `CONFIG SET swap-inprogress-memory-stop`.
    pub fn set_inflight_memory_stop_bytes(&self, bytes: i64) -> Result<(), &'static str> {
        if bytes <= self.inflight_memory_slowdown_bytes.load(Ordering::Acquire) {
            return Err("must be a positive integer above swap-inprogress-memory-slowdown");
        }
        self.inflight_memory_stop_bytes.store(bytes, Ordering::Release);
        Ok(())
    }

    pub fn is_disk_degraded(&self) -> bool {
        self.disk_degraded.load(Ordering::Acquire)
    }

    /// Flips into degraded mode on an unwritable disk; cleared only by an operator
    /// restart, matching the "no automatic un-degrade" invariant.
    pub fn mark_disk_degraded(&self) {
        self.disk_degraded.store(true, Ordering::Release);
    }
}

pub type SharedRuntime = Arc<SwapRuntime>;
