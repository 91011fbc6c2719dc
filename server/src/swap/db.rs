/*
 * Created on Sat Feb 17 2024
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

//! The single `rocksdb::DB` handle every swap request's I/O eventually lands on,
//! column families opened exactly as the nearcore `Store` opens `DBCol` families
//! (`examples/.../core-store-src-db.rs`): one `Options` per family, shared
//! block-cache and write-buffer sizing at the top, the compaction filter installed
//! on the Data and Score families (the two that can carry orphaned rows across
//! a meta row's version bumps).
//!
//! The compaction filter needs to read the Meta CF of the very `DB` it's installed
//! on, which doesn't exist yet at `Options`-build time. This is solved the way
//! self-referencing rocksdb handles usually are: the filter closure captures a
//! `Weak<DB>` behind a `OnceLock`, populated once `DB::open_cf_descriptors` returns.
//! Compactions that (implausibly) run before the cell is populated keep every row
//! rather than guess.

use crate::swap::codec::Cf;
use crate::swap::compaction::{self, LookupCache, MetaLookup};
use crate::swap::error::SwapResult;
use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options, DB};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

#[derive(Clone)]
pub struct EngineConfig {
    pub block_cache_mb: usize,
    pub write_buffer_mb: usize,
    pub max_background_jobs: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { block_cache_mb: 64, write_buffer_mb: 32, max_background_jobs: 2 }
    }
}

/// What the compaction filter closures actually capture: a weak handle to the `DB`
/// (populated post-construction) and the flag that pauses invalidation while a bulk
/// RDB/rordb export is iterating the column families directly.
struct MetaCfLookup {
    db: Arc<OnceLock<Weak<DB>>>,
}

impl MetaLookup for MetaCfLookup {
    fn meta_version(&self, meta_key: &[u8]) -> Option<u64> {
        let db = self.db.get()?.upgrade()?;
        let handle = db.cf_handle(Cf::Meta.name())?;
        let raw = db.get_cf(&handle, meta_key).ok().flatten()?;
        let (_, _, version, _) = crate::swap::codec::decode_meta_val(&raw)?;
        Some(version)
    }
}

pub struct Engine {
    db: Arc<DB>,
    snapshot_in_flight: Arc<AtomicBool>,
    epoch: u64,
}

/// Picks the next epoch directory under `rocks_dir`: `<rocks_dir>/<epoch>`, one past
/// the highest numeric subdirectory name already present, 0 on a fresh directory.
/// Each `Engine::open` call therefore gets its own on-disk generation rather than
/// reopening the previous process's rocksdb handle in place.
fn next_epoch_dir(rocks_dir: &Path) -> SwapResult<(u64, std::path::PathBuf)> {
    std::fs::create_dir_all(rocks_dir)?;
    let mut max_seen: Option<u64> = None;
    for entry in std::fs::read_dir(rocks_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(n) = entry.file_name().to_str().and_then(|s| s.parse::<u64>().ok()) {
            max_seen = Some(max_seen.map_or(n, |m| m.max(n)));
        }
    }
    let epoch = max_seen.map_or(0, |n| n + 1);
    Ok((epoch, rocks_dir.join(epoch.to_string())))
}

impl Engine {
    /// Opens (creating if necessary) the swap store rooted at `rocks_dir`, bumping to
    /// a fresh `<rocks_dir>/<epoch>` directory on every call -- see `next_epoch_dir`.
    pub fn open(rocks_dir: impl AsRef<Path>, cfg: &EngineConfig) -> SwapResult<Self> {
        let (epoch, path) = next_epoch_dir(rocks_dir.as_ref())?;
        std::fs::create_dir_all(&path)?;
        let cache = Cache::new_lru_cache(cfg.block_cache_mb * 1024 * 1024);
        let meta_cell: Arc<OnceLock<Weak<DB>>> = Arc::new(OnceLock::new());
        let snapshot_in_flight = Arc::new(AtomicBool::new(false));

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_background_jobs(cfg.max_background_jobs);

        let cf_descriptors = Cf::ALL
            .iter()
            .copied()
            .map(|cf| {
                let mut opts = Options::default();
                let mut block_opts = BlockBasedOptions::default();
                block_opts.set_block_cache(&cache);
                opts.set_block_based_table_factory(&block_opts);
                opts.set_write_buffer_size(cfg.write_buffer_mb * 1024 * 1024);
                if matches!(cf, Cf::Data | Cf::Score) {
                    let lookup = MetaCfLookup { db: meta_cell.clone() };
                    let flight = snapshot_in_flight.clone();
                    let mut local_cache = LookupCache::new();
                    let is_score = matches!(cf, Cf::Score);
                    opts.set_compaction_filter("swap-orphan-filter", move |_level, key, value| {
                        compaction::apply(key, value, is_score, flight.load(Ordering::Acquire), &lookup, &mut local_cache)
                    });
                }
                ColumnFamilyDescriptor::new(cf.name(), opts)
            })
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&db_opts, &path, cf_descriptors)?;
        let db = Arc::new(db);
        // a failed `set` here would mean `open` raced with itself on the same cell,
        // which can't happen: the cell is freshly allocated above.
        let _ = meta_cell.set(Arc::downgrade(&db));
        Ok(Self { db, snapshot_in_flight, epoch })
    }

    /// The `<rocks_dir>/<epoch>` generation this handle opened -- bumped on every
    /// `Engine::open` call against the same `rocks_dir` (`spec.md` §6).
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn handle(&self, cf: Cf) -> &rocksdb::ColumnFamily {
        self.db.cf_handle(cf.name()).expect("column family must exist")
    }

    pub fn get(&self, cf: Cf, key: &[u8]) -> SwapResult<Option<Vec<u8>>> {
        Ok(self.db.get_cf(self.handle(cf), key)?)
    }

    pub fn put(&self, cf: Cf, key: &[u8], value: &[u8]) -> SwapResult<()> {
        Ok(self.db.put_cf(self.handle(cf), key, value)?)
    }

    pub fn delete(&self, cf: Cf, key: &[u8]) -> SwapResult<()> {
        Ok(self.db.delete_cf(self.handle(cf), key)?)
    }

    /// Bounded forward iteration over `[start, end)` in `cf`, capped at `limit` rows
    /// when set.
    pub fn scan_range(&self, cf: Cf, start: &[u8], end: &[u8], limit: Option<usize>) -> SwapResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let handle = self.handle(cf);
        let mode = rocksdb::IteratorMode::From(start, rocksdb::Direction::Forward);
        let mut out = Vec::new();
        for item in self.db.iterator_cf(handle, mode) {
            let (k, v) = item?;
            if k.as_ref() >= end {
                break;
            }
            out.push((k.to_vec(), v.to_vec()));
            if limit.is_some_and(|l| out.len() >= l) {
                break;
            }
        }
        Ok(out)
    }

    pub fn write_batch(&self, ops: Vec<(Cf, Vec<u8>, Option<Vec<u8>>)>) -> SwapResult<()> {
        let mut batch = rocksdb::WriteBatch::default();
        for (cf, key, value) in ops {
            let handle = self.handle(cf);
            match value {
                Some(v) => batch.put_cf(handle, key, v),
                None => batch.delete_cf(handle, key),
            }
        }
        Ok(self.db.write(batch)?)
    }

    /// Hard-links the live SST files into `dest` -- the same "checkpoint" mechanism
    /// `storage::v1::sengine::SnapshotEngine` uses for its point-in-time snapshots,
    /// generalized here to the swap store's own directory layout.
    pub fn checkpoint(&self, dest: impl AsRef<Path>) -> SwapResult<()> {
        let checkpoint = rocksdb::checkpoint::Checkpoint::new(&self.db)?;
        checkpoint.create_checkpoint(dest)?;
        Ok(())
    }

    pub fn flush(&self) -> SwapResult<()> {
        Ok(self.db.flush()?)
    }

    /// Pauses orphan reclamation for the duration of a bulk RDB/rordb export so the
    /// compaction filter can never drop a row the export is mid-read on. Pairs with
    /// `end_snapshot`; `swap::rdb`'s save path wraps its whole CF walk in this guard.
    pub fn begin_snapshot(&self) {
        self.snapshot_in_flight.store(true, Ordering::Release);
    }

    pub fn end_snapshot(&self) {
        self.snapshot_in_flight.store(false, Ordering::Release);
    }

    pub fn is_snapshot_in_flight(&self) -> bool {
        self.snapshot_in_flight.load(Ordering::Acquire)
    }
}

pub type SharedEngine = Arc<Engine>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swap::codec;

    fn open_tmp() -> (tempfile_dir::TempDir, Engine) {
        let dir = tempfile_dir::TempDir::new();
        let engine = Engine::open(dir.path(), &EngineConfig::default()).unwrap();
        (dir, engine)
    }

    /// A tiny hand-rolled temp-dir guard: the swap core otherwise has no reason to
    /// depend on the `tempfile` crate, and one `std::env::temp_dir` + pid + counter
    /// join is enough for these tests' needs.
    mod tempfile_dir {
        use std::path::{Path, PathBuf};
        use std::sync::atomic::{AtomicU64, Ordering};

        pub struct TempDir(PathBuf);
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        impl TempDir {
            pub fn new() -> Self {
                let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                let path = std::env::temp_dir().join(format!("swap-db-test-{}-{}", std::process::id(), n));
                std::fs::create_dir_all(&path).unwrap();
                Self(path)
            }

            pub fn path(&self) -> &Path {
                &self.0
            }
        }

        impl Drop for TempDir {
            fn drop(&mut self) {
                let _ = std::fs::remove_dir_all(&self.0);
            }
        }
    }

    #[test]
    fn put_get_delete_round_trip() {
        let (_dir, engine) = open_tmp();
        let key = codec::encode_data_key(0, b"k", 1, Some(b"f"));
        engine.put(Cf::Data, &key, b"value").unwrap();
        assert_eq!(engine.get(Cf::Data, &key).unwrap(), Some(b"value".to_vec()));
        engine.delete(Cf::Data, &key).unwrap();
        assert_eq!(engine.get(Cf::Data, &key).unwrap(), None);
    }

    #[test]
    fn scan_range_respects_bounds_and_limit() {
        let (_dir, engine) = open_tmp();
        for f in [b"a", b"b", b"c", b"d"] {
            let key = codec::encode_data_key(0, b"h", 1, Some(f));
            engine.put(Cf::Data, &key, b"v").unwrap();
        }
        let start = codec::data_range_start(0, b"h");
        let end = codec::data_range_end(0, b"h");
        let all = engine.scan_range(Cf::Data, &start, &end, None).unwrap();
        assert_eq!(all.len(), 4);
        let limited = engine.scan_range(Cf::Data, &start, &end, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn reopen_bumps_epoch_and_does_not_collide_with_the_prior_handle() {
        let dir = tempfile_dir::TempDir::new();
        let first = Engine::open(dir.path(), &EngineConfig::default()).unwrap();
        assert_eq!(first.epoch(), 0);
        // the first handle is still alive and holding its rocksdb LOCK file; opening
        // again against the same rocks_dir must land in a fresh epoch subdirectory
        // rather than re-opening (and lock-conflicting with) the live one.
        let second = Engine::open(dir.path(), &EngineConfig::default()).unwrap();
        assert_eq!(second.epoch(), 1);
        drop(first);
        let third = Engine::open(dir.path(), &EngineConfig::default()).unwrap();
        assert_eq!(third.epoch(), 2);
    }

    #[test]
    fn snapshot_guard_toggles() {
        let (_dir, engine) = open_tmp();
        assert!(!engine.is_snapshot_in_flight());
        engine.begin_snapshot();
        assert!(engine.is_snapshot_in_flight());
        engine.end_snapshot();
        assert!(!engine.is_snapshot_in_flight());
    }
}
