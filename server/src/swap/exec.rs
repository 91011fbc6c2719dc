/*
 * Created on Sat Feb 24 2024
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

//! Turns one `KeyRequest` into an admitted, analyzed, I/O-resolved, merged result.
//!
//! `execute` is the one place `analyze` + `encode_*` + the rocksdb engine +
//! `create_or_merge`/`swap_in`/`swap_out`/`swap_del` are actually wired together;
//! everything upstream (`request`, `data`) only describes the shape of that pipeline.
//!
//! The merge itself -- the part that must run with exactly one writer per key at a
//! time -- runs inside the `proceed` closure handed to [`ListenerGraph::wait`]. That
//! closure may run inline on the calling thread (the common, uncontended case) or
//! later on whatever thread calls `notify` for the sibling ahead of it in queue; both
//! cases already serialize one key's merges against each other, which is the
//! invariant that actually matters here, not which OS thread happens to run it.

use crate::swap::codec::{self, Cf};
use crate::swap::data::{Action, Intention, SwapDecoded, SwapFlags, SwapResultRows, SwapValue, SwapValueCtx};
use crate::swap::error::{SwapError, SwapResult};
use crate::swap::map::Data;
use crate::swap::meta::{ObjectMeta, SwapType};
use crate::swap::request::KeyRequest;
use crate::swap::{Db, SharedRuntime};
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::Arc;

/// Runs `req` to completion: admits it through the listener graph, resolves any I/O
/// it needs against the engine, merges the result into `db`'s resident state, and
/// returns whatever the command layer should see. `default_type` is only consulted
/// the first time `req.key` is ever touched; an already-known key keeps its recorded
/// type regardless of what's passed here.
pub fn execute(rt: &SharedRuntime, req: KeyRequest, default_type: SwapType) -> SwapResult<SwapDecoded> {
    if rt.is_disk_degraded() {
        return Err(SwapError::DiskDegraded);
    }
    let delay = rt.backpressure_delay();
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
    let db = rt.db(req.dbid);
    let swap_type = db.get_or_create_resident(&req.key, default_type);

    let (tx, rx) = mpsc::channel::<(SwapResult<SwapDecoded>, bool)>();
    let rt_for_proceed = rt.clone();
    let db_for_proceed = db.clone();
    let key_for_listener = req.key.clone();
    let txid = req.txid;
    let level = req.level;
    let dbid = req.dbid;
    let req_for_proceed = req;

    let admission = rt.listener().wait(
        txid,
        level,
        dbid,
        &key_for_listener,
        move || {
            let was_del = req_for_proceed.intention == Intention::Del;
            let outcome = run_merge(&rt_for_proceed, &db_for_proceed, req_for_proceed, swap_type);
            let _ = tx.send((outcome, was_del));
        },
        || {},
    );

    let (outcome, was_del) = rx.recv().expect("swap listener dropped the continuation without running it");
    rt.listener().notify(&admission);
    if was_del {
        rt.listener().prune_key(dbid, &key_for_listener);
    }
    outcome
}

/// Submits `req` to the worker pool and blocks the calling thread on the result.
/// This is the bridge `execute_on_pool` offers to a synchronous command dispatch
/// path; an async caller should instead run `execute` itself inside its own
/// `spawn_blocking`-equivalent rather than double up on thread hops.
pub fn execute_on_pool(rt: &SharedRuntime, req: KeyRequest, default_type: SwapType) -> SwapResult<SwapDecoded> {
    let (tx, rx) = mpsc::channel();
    let rt2 = rt.clone();
    rt.pool().submit(move || {
        let result = execute(&rt2, req, default_type);
        let _ = tx.send(result);
    });
    rx.recv().expect("swap worker pool dropped the result channel")
}

/// The actual merge body: analyze, then dispatch by intention. Runs once per
/// request, on whichever thread the listener graph hands it to.
fn run_merge(rt: &SharedRuntime, db: &Arc<Db>, req: KeyRequest, swap_type: SwapType) -> SwapResult<SwapDecoded> {
    let mut ctx = SwapValueCtx::new(swap_type);
    let meta_snapshot = db.meta().get(&req.key);
    let (intention, flags) = db.resident_with(&req.key, |v| {
        v.expect("get_or_create_resident ensured residency").analyze(meta_snapshot.as_ref(), &req, db.cold_filter(), &mut ctx)
    });

    let result = match intention {
        Intention::Nop => {
            rt.stats().swap_nops.fetch_add(1, Ordering::Relaxed);
            Ok(db.resident_with(&req.key, |v| v.expect("residency").empty_decoded()))
        }
        Intention::In => do_in(rt, db, &req, swap_type, &ctx, flags, meta_snapshot),
        Intention::Out => do_out(rt, db, &req, swap_type, &ctx, flags, meta_snapshot),
        Intention::Del => do_del(rt, db, &req, swap_type, &ctx),
    };

    if result.is_err() {
        rt.stats().swap_errors.fetch_add(1, Ordering::Relaxed);
    }
    result
}

fn do_in(
    rt: &SharedRuntime,
    db: &Arc<Db>,
    req: &KeyRequest,
    swap_type: SwapType,
    ctx: &SwapValueCtx,
    flags: SwapFlags,
    meta_snapshot: Option<ObjectMeta>,
) -> SwapResult<SwapDecoded> {
    let action = ctx.choose_action(Intention::In);
    let rows = fetch_rows(rt, db, req, action, ctx)?;

    if flags.contains(SwapFlags::EXEC_OOM_CHECK) {
        let bytes = rows_byte_len(&rows);
        rt.admit_inflight_memory(bytes as i64)?;
    }

    let decoded = db.resident_with(&req.key, |v| v.expect("residency").decode_data(rows, ctx))?;
    let mut meta = meta_snapshot.unwrap_or_else(|| ObjectMeta::new(swap_type));
    let carry = db.resident_with(&req.key, |v| v.expect("residency").create_or_merge(decoded, &mut meta, ctx));
    db.resident_with(&req.key, |v| v.expect("residency").swap_in(carry.clone(), &mut meta, ctx));

    if flags.contains(SwapFlags::EXEC_IN_DEL) {
        delete_fetched_rows(rt, db, req, action, ctx)?;
    }

    let merged_is_hot = db.resident_with(&req.key, |v| v.expect("residency").merged_is_hot(&meta));
    if merged_is_hot {
        rt.engine().delete(Cf::Meta, &codec::encode_meta_key(req.dbid, &req.key))?;
        db.meta().remove(&req.key);
    } else {
        persist_meta_row(rt, req, &meta)?;
        db.meta().insert(Data::copy_from_slice(&req.key), meta);
    }

    rt.stats().swap_ins.fetch_add(1, Ordering::Relaxed);
    Ok(carry)
}

fn do_out(
    rt: &SharedRuntime,
    db: &Arc<Db>,
    req: &KeyRequest,
    swap_type: SwapType,
    ctx: &SwapValueCtx,
    flags: SwapFlags,
    meta_snapshot: Option<ObjectMeta>,
) -> SwapResult<SwapDecoded> {
    let ops = db.resident_with(&req.key, |v| v.expect("residency").encode_data(Intention::Out, req, ctx));
    let bytes_out: i64 = ops.iter().map(|(_, _, v)| v.len() as i64).sum();
    rt.engine().write_batch(ops.into_iter().map(|(cf, k, v)| (cf, k, Some(v))).collect())?;

    let mut meta = meta_snapshot.unwrap_or_else(|| ObjectMeta::new(swap_type));
    let keep_data = flags.contains(SwapFlags::EXEC_OUT_KEEP_DATA);
    let mut totally_out = false;
    db.resident_with(&req.key, |v| v.expect("residency").swap_out(ctx, keep_data, &mut meta, &mut totally_out));

    persist_meta_row(rt, req, &meta)?;
    db.meta().insert(Data::copy_from_slice(&req.key), meta);

    // approximate release: the exact bytes a swap-in admitted for this key were
    // never tracked per-key, so this assumes what's written out now is what was
    // counted in -- good enough to keep the gauge from drifting upward forever,
    // not an exact accounting.
    let _ = rt.admit_inflight_memory(-bytes_out);

    if totally_out && !keep_data {
        db.resident_remove(&req.key);
    }

    rt.stats().swap_outs.fetch_add(1, Ordering::Relaxed);
    Ok(SwapValue::new_of_type(swap_type).empty_decoded())
}

fn do_del(rt: &SharedRuntime, db: &Arc<Db>, req: &KeyRequest, swap_type: SwapType, ctx: &SwapValueCtx) -> SwapResult<SwapDecoded> {
    rt.engine().delete(Cf::Meta, &codec::encode_meta_key(req.dbid, &req.key))?;

    // `analyze`'s Del path never populates ctx's per-subkey fields (there's nothing
    // to select -- the whole key is going away), so `skip_data = true` is the only
    // branch of `swap_del` that's ever reachable here; see the six `swap_del`
    // implementations under `swap::data`.
    let mut meta = db.meta().get(&req.key).unwrap_or_else(|| ObjectMeta::new(swap_type));
    db.resident_with(&req.key, |v| v.expect("residency").swap_del(ctx, true, &mut meta));

    db.meta().remove(&req.key);
    db.resident_remove(&req.key);

    rt.stats().swap_dels.fetch_add(1, Ordering::Relaxed);
    Ok(SwapValue::new_of_type(swap_type).empty_decoded())
}

fn fetch_rows(rt: &SharedRuntime, db: &Arc<Db>, req: &KeyRequest, action: Action, ctx: &SwapValueCtx) -> SwapResult<SwapResultRows> {
    match action {
        Action::Get => {
            let keys = db.resident_with(&req.key, |v| v.expect("residency").encode_keys(Intention::In, req, ctx));
            let mut rows = Vec::with_capacity(keys.len());
            for (cf, k) in keys {
                if let Some(val) = rt.engine().get(cf, &k)? {
                    rows.push((cf, k, val));
                }
            }
            Ok(SwapResultRows::Rows(rows))
        }
        Action::Iterate => {
            let range = db.resident_with(&req.key, |v| v.expect("residency").encode_range(Intention::In, req, ctx));
            match range {
                Some((cf, start, end, limit)) => {
                    let pairs = rt.engine().scan_range(cf, &start, &end, limit)?;
                    Ok(SwapResultRows::Rows(pairs.into_iter().map(|(k, v)| (cf, k, v)).collect()))
                }
                None => Ok(SwapResultRows::Nothing),
            }
        }
        Action::Nop => Ok(SwapResultRows::Nothing),
        Action::Put | Action::Del => unreachable!("an In-direction action is never Put/Del"),
    }
}

/// Re-derives and deletes exactly the rows `fetch_rows` just read, for
/// `SwapFlags::EXEC_IN_DEL`'s lazy cold-delete-after-load semantics.
fn delete_fetched_rows(rt: &SharedRuntime, db: &Arc<Db>, req: &KeyRequest, action: Action, ctx: &SwapValueCtx) -> SwapResult<()> {
    match action {
        Action::Get => {
            let keys = db.resident_with(&req.key, |v| v.expect("residency").encode_keys(Intention::In, req, ctx));
            rt.engine().write_batch(keys.into_iter().map(|(cf, k)| (cf, k, None)).collect())
        }
        Action::Iterate => {
            let range = db.resident_with(&req.key, |v| v.expect("residency").encode_range(Intention::In, req, ctx));
            match range {
                Some((cf, start, end, limit)) => {
                    let pairs = rt.engine().scan_range(cf, &start, &end, limit)?;
                    rt.engine().write_batch(pairs.into_iter().map(|(k, _)| (cf, k, None)).collect())
                }
                None => Ok(()),
            }
        }
        Action::Nop | Action::Put | Action::Del => Ok(()),
    }
}

fn rows_byte_len(rows: &SwapResultRows) -> usize {
    match rows {
        SwapResultRows::Nothing => 0,
        SwapResultRows::Rows(rows) => rows.iter().map(|(_, k, v)| k.len() + v.len()).sum(),
    }
}

/// Persists an updated meta row, carrying `cold_len` as the row's `extend` bytes --
/// `encode_meta_val` has no dedicated field for it. This is a deliberate minimal
/// scheme: a list's segment map and a bitmap's resident-bucket map (`ObjectMeta::aux`)
/// are not persisted by it, so a process restart forgets exactly which segments/
/// buckets were resident for a warm list or bitmap (it still knows the key is warm,
/// just not which parts) -- the next access reloads from scratch instead of resuming
/// the prior residency pattern. Hash/set/zset/string carry no `aux` of their own, so
/// this limitation is List/Bitmap-only.
fn persist_meta_row(rt: &SharedRuntime, req: &KeyRequest, meta: &ObjectMeta) -> SwapResult<()> {
    let key = codec::encode_meta_key(req.dbid, &req.key);
    let val = codec::encode_meta_val(meta.swap_type.to_tag(), meta.expire_ms, meta.version, &meta.cold_len.to_be_bytes());
    rt.engine().put(Cf::Meta, &key, &val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swap::request::{Level, SubkeySpec};
    use crate::swap::{SwapConfig, SwapRuntime};

    mod tempfile_dir {
        use std::path::{Path, PathBuf};
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(0);

        pub struct TempDir(PathBuf);

        impl TempDir {
            pub fn new() -> Self {
                let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                let path = std::env::temp_dir().join(format!("skyswap-exec-test-{}-{}", std::process::id(), n));
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

    fn open_runtime() -> (tempfile_dir::TempDir, SharedRuntime) {
        let dir = tempfile_dir::TempDir::new();
        let rt = SwapRuntime::open(dir.path(), SwapConfig::default()).expect("engine opens");
        (dir, rt)
    }

    /// Sets one field directly on the resident hash -- the same thing an `HSET`
    /// handler would do against RAM before ever touching the swap core; the swap
    /// core itself only ever moves already-set data between RAM and disk (`Out`/
    /// `In`), it never originates new field/value pairs.
    fn seed_hash_field(db: &Db, key: &[u8], field: &str, val: &str) {
        db.resident_with(key, |v| {
            if let Some(SwapValue::Hash(h)) = v {
                h.set(Data::from_string(field.into()), Data::from_string(val.into()));
            }
        });
    }

    fn del_req(key: &[u8]) -> KeyRequest {
        let mut req = KeyRequest::nop(Level::Key, 0, key.to_vec());
        req.intention = Intention::Del;
        req.txid = 2;
        req
    }

    #[test]
    fn whole_key_delete_clears_meta_resident_and_listener_state() {
        let (_dir, rt) = open_runtime();
        let key = b"hdel-key".to_vec();
        let db = rt.db(0);
        db.get_or_create_resident(&key, SwapType::Hash);
        seed_hash_field(&db, &key, "f", "v");

        let result = execute(&rt, del_req(&key), SwapType::Hash);
        assert!(result.is_ok());
        assert!(!db.meta().contains(&key));
        assert!(!db.resident_contains(&key));
    }

    #[test]
    fn out_then_in_round_trips_through_the_real_engine() {
        let (_dir, rt) = open_runtime();
        let db = rt.db(0);
        let key = b"hash-roundtrip".to_vec();
        db.get_or_create_resident(&key, SwapType::Hash);
        seed_hash_field(&db, &key, "f1", "v1");

        let mut out_req = KeyRequest::nop(Level::Key, 0, key.clone());
        out_req.intention = Intention::Out;
        out_req.subkey_spec = SubkeySpec::WholeKey;
        out_req.evict_step = 10;
        out_req.txid = 2;
        let out = execute(&rt, out_req, SwapType::Hash);
        assert!(out.is_ok());
        assert!(!db.resident_contains(&key));
        let meta = db.meta().get(&key).expect("out persisted a meta row");
        assert_eq!(meta.cold_len, 1);

        let mut in_req = KeyRequest::nop(Level::Key, 0, key.clone());
        in_req.intention = Intention::In;
        in_req.subkey_spec = SubkeySpec::Explicit(Vec::new());
        in_req.txid = 3;
        let result = execute(&rt, in_req, SwapType::Hash);
        match result {
            Ok(SwapDecoded::Hash(rows)) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].0.get_blob(), b"f1");
                assert_eq!(rows[0].1.get_blob(), b"v1");
            }
            other => panic!("expected a decoded hash row, got {other:?}"),
        }
        // the key came back fully hot: no meta row should survive the merge.
        assert!(!db.meta().contains(&key));
    }

    #[test]
    fn nop_request_never_touches_the_engine_or_stats_errors() {
        let (_dir, rt) = open_runtime();
        let key = b"nop-key".to_vec();
        let req = KeyRequest::nop(Level::Key, 0, key);
        let result = execute(&rt, req, SwapType::Hash);
        assert!(matches!(result, Ok(SwapDecoded::Hash(rows)) if rows.is_empty()));
        assert_eq!(rt.stats().swap_nops.load(Ordering::Relaxed), 1);
        assert_eq!(rt.stats().swap_errors.load(Ordering::Relaxed), 0);
    }
}
