/*
 * Created on Fri Feb 16 2024
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

//! The three-level FIFO wait graph.
//!
//! This is callback-driven, not blocking: `wait` always returns immediately,
//! either having already called `proceed` inline (nothing is in the way) or having
//! parked the entry for a later `notify` to call it. Nothing here ever parks an OS
//! thread or a `Future` -- the server thread must never block on I/O, and all this
//! graph decides is *when* a command's continuation runs, not *how* it waits for
//! that moment.
//!
//! Three queue levels: server (one), db (one per `dbid`), key (one per live
//! `(dbid, key)`, created lazily and pruned once idle). A listener node coalesces
//! every `LstEntry` sharing one `txid` -- this is what lets a `MULTI/EXEC`
//! transaction's key requests proceed without deadlocking on each other.

use crate::swap::map::{Coremap, Data};
use crate::swap::codec::DbId;
use crate::swap::request::{Level, Txid};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type ProceedFn = Box<dyn FnOnce() + Send>;
type CtxDropFn = Box<dyn FnOnce() + Send>;

/// One `(proceed_fn, ctx_drop)` pair queued under a listener node. `client`/`ctx` in
/// the `LstEntry` tuple are whatever the caller's closures already capture;
/// a closure-based continuation makes a separate field for them redundant.
struct LstEntry {
    proceed: Option<ProceedFn>,
    ctx_drop: Option<CtxDropFn>,
}

/// All of one command's (or one transaction's) key requests that share a `txid`,
/// coalesced into a single FIFO slot.
struct ListenerNode {
    txid: Txid,
    entries: Vec<LstEntry>,
    proceeded: usize,
    notified: usize,
}

impl ListenerNode {
    fn new(txid: Txid) -> Self {
        Self { txid, entries: Vec::new(), proceeded: 0, notified: 0 }
    }

    fn is_complete(&self) -> bool {
        self.notified == self.entries.len()
    }
}

/// One level's FIFO queue plus its subtree listener count:
/// the total number of not-yet-notified entries anywhere in this queue or any of its
/// descendant queues, maintained incrementally so a parent never has to walk its
/// children to decide whether it may proceed.
struct Queue {
    nodes: Mutex<VecDeque<ListenerNode>>,
    subtree_listeners: AtomicUsize,
    parent: Option<Arc<Queue>>,
}

impl Queue {
    fn root() -> Arc<Self> {
        Arc::new(Self { nodes: Mutex::new(VecDeque::new()), subtree_listeners: AtomicUsize::new(0), parent: None })
    }

    fn child(parent: &Arc<Self>) -> Arc<Self> {
        Arc::new(Self { nodes: Mutex::new(VecDeque::new()), subtree_listeners: AtomicUsize::new(0), parent: Some(parent.clone()) })
    }

    fn is_idle(&self) -> bool {
        self.nodes.lock().is_empty()
    }

    /// +delta to this queue's own subtree count and every ancestor's, for entries
    /// entering or leaving anywhere in this queue's subtree.
    fn bump_subtree(&self, delta: i64) {
        let mut q = self;
        loop {
            if delta >= 0 {
                q.subtree_listeners.fetch_add(delta as usize, Ordering::SeqCst);
            } else {
                q.subtree_listeners.fetch_sub((-delta) as usize, Ordering::SeqCst);
            }
            match &q.parent {
                Some(p) => q = p,
                None => break,
            }
        }
    }

    /// A queue's own head node may run iff nothing else is outstanding anywhere in
    /// its subtree besides the head node's own not-yet-proceeded entries -- i.e. no
    /// older sibling listener and no live descendant-level activity is still in
    /// flight underneath it.
    fn head_may_proceed(&self, head: &ListenerNode) -> bool {
        let unproceeded_in_head = head.entries.len() - head.proceeded;
        self.subtree_listeners.load(Ordering::SeqCst) == unproceeded_in_head
    }
}

/// A handle identifying exactly which queue a `KeyRequest` was admitted into, needed
/// later to call `notify`. Cheap to clone; every entry of a coalesced transaction
/// shares one.
#[derive(Clone)]
pub struct Admission {
    queue: Arc<Queue>,
    txid: Txid,
}

/// Runs every not-yet-proceeded entry of the node at the front of `queue`, if it is
/// allowed to go. Callers recurse to the parent afterward since draining a subtree
/// may have just unblocked an ancestor-level listener waiting on it.
fn try_proceed_head(queue: &Arc<Queue>) {
    let ready = {
        let mut nodes = queue.nodes.lock();
        match nodes.front_mut() {
            Some(head) if head.proceeded < head.entries.len() && queue.head_may_proceed(head) => {
                let to_run: Vec<ProceedFn> =
                    head.entries[head.proceeded..].iter_mut().filter_map(|e| e.proceed.take()).collect();
                head.proceeded = head.entries.len();
                to_run
            }
            _ => Vec::new(),
        }
    };
    for f in ready {
        f();
    }
}

/// The graph itself: one server-level queue, one queue per live `dbid`, one queue
/// per live `(dbid, key)`.
pub struct ListenerGraph {
    server: Arc<Queue>,
    dbs: Coremap<DbId, Arc<Queue>>,
    keys: Coremap<(DbId, Data), Arc<Queue>>,
}

impl Default for ListenerGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerGraph {
    pub fn new() -> Self {
        Self { server: Queue::root(), dbs: Coremap::new(), keys: Coremap::new() }
    }

    fn db_queue(&self, dbid: DbId) -> Arc<Queue> {
        if let Some(q) = self.dbs.get_cloned(&dbid) {
            return q;
        }
        let q = Queue::child(&self.server);
        self.dbs.upsert(dbid, q.clone());
        q
    }

    fn key_queue(&self, dbid: DbId, key: &[u8], db_q: &Arc<Queue>) -> Arc<Queue> {
        let probe = (dbid, Data::copy_from_slice(key));
        if let Some(q) = self.keys.get_cloned(&probe) {
            return q;
        }
        let q = Queue::child(db_q);
        self.keys.upsert(probe, q.clone());
        q
    }

    /// Binds and queues a `KeyRequest`'s continuation.
    ///
    /// 1. Picks the queue level: if the server queue is non-empty, every request --
    ///    regardless of its own `level` -- binds there, so nothing can slip past a
    ///    queued server-wide operation; else if the db queue is non-empty and the
    ///    caller asked for `Level::Key`, bind at the db level instead (serializing
    ///    behind a queued `FLUSHDB`); else descend to the caller's actual level.
    /// 2. If the chosen queue's back node already carries this `txid`, the entry
    ///    coalesces into it (reentrant transactions never queue behind themselves).
    ///    Otherwise a new node is pushed.
    /// 3. If the node just became (or already was) the queue's head and nothing
    ///    else is outstanding in its subtree, `proceed` runs inline, synchronously,
    ///    before `wait` returns.
    pub fn wait(
        &self,
        txid: Txid,
        level: Level,
        dbid: DbId,
        key: &[u8],
        proceed: impl FnOnce() + Send + 'static,
        ctx_drop: impl FnOnce() + Send + 'static,
    ) -> Admission {
        let bind_at_server = !self.server.is_idle();
        let queue = if bind_at_server {
            self.server.clone()
        } else {
            match level {
                Level::Server => self.server.clone(),
                Level::Db => self.db_queue(dbid),
                Level::Key => {
                    let db_q = self.db_queue(dbid);
                    if !db_q.is_idle() {
                        db_q
                    } else {
                        self.key_queue(dbid, key, &db_q)
                    }
                }
            }
        };

        let entry = LstEntry { proceed: Some(Box::new(proceed)), ctx_drop: Some(Box::new(ctx_drop)) };
        let is_head_after_push;
        {
            let mut nodes = queue.nodes.lock();
            match nodes.back_mut() {
                Some(back) if back.txid == txid => {
                    back.entries.push(entry);
                }
                _ => {
                    let mut node = ListenerNode::new(txid);
                    node.entries.push(entry);
                    nodes.push_back(node);
                }
            }
            is_head_after_push = nodes.len() == 1;
        }
        queue.bump_subtree(1);

        if is_head_after_push {
            try_proceed_head(&queue);
        }
        Admission { queue, txid }
    }

    /// Marks one entry of `admission`'s node as notified. When every entry of the
    /// head node has been notified, the node is
    /// popped, its `ctx_drop`s run, the subtree count is decremented up the parent
    /// chain, and every queue from here to the root is offered a chance to proceed
    /// its own new head. Safe to call after a failed `proceed`: a request that
    /// errored still notifies so downstream listeners make progress.
    pub fn notify(&self, admission: &Admission) {
        let queue = &admission.queue;
        let (popped, drops) = {
            let mut nodes = queue.nodes.lock();
            let pop_ready = match nodes.front_mut() {
                Some(head) if head.txid == admission.txid => {
                    head.notified += 1;
                    head.is_complete()
                }
                _ => false,
            };
            if pop_ready {
                let mut node = nodes.pop_front().unwrap();
                let drops: Vec<CtxDropFn> = node.entries.iter_mut().filter_map(|e| e.ctx_drop.take()).collect();
                (true, drops)
            } else {
                (false, Vec::new())
            }
        };
        for d in drops {
            d();
        }
        if popped {
            queue.bump_subtree(-1);
            // re-check this queue's own new head, then walk every ancestor: the
            // subtree decrement may have just cleared an ancestor-level listener
            // to go (e.g. a `FLUSHDB` waiting on the last key-level listener under
            // it to drain).
            let mut q = queue.clone();
            loop {
                try_proceed_head(&q);
                match q.parent.clone() {
                    Some(p) => q = p,
                    None => break,
                }
            }
        }
    }

    /// Drops the per-key queue entry for `(dbid, key)` if it is idle. Called once a
    /// key turns fully cold and leaves the resident keyspace, so the table doesn't
    /// accumulate an entry per key ever touched over the process lifetime. Db-level
    /// and server-level queues persist for the process lifetime.
    pub fn prune_key(&self, dbid: DbId, key: &[u8]) {
        let probe = (dbid, Data::copy_from_slice(key));
        let idle = self.keys.get(&probe).map_or(false, |q| q.is_idle());
        if idle {
            self.keys.remove(&probe);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as StdAtomicUsize;
    use std::sync::Mutex as StdMutex;

    fn noop_drop() {}

    #[test]
    fn a_lone_request_proceeds_immediately() {
        let graph = ListenerGraph::new();
        let ran = Arc::new(StdAtomicUsize::new(0));
        let r2 = ran.clone();
        let _adm = graph.wait(1, Level::Key, 0, b"k", move || {
            r2.fetch_add(1, Ordering::SeqCst);
        }, noop_drop);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reentrant_same_txid_coalesces_and_both_entries_proceed_inline() {
        let graph = ListenerGraph::new();
        let ran = Arc::new(StdAtomicUsize::new(0));
        let r1 = ran.clone();
        let _a1 = graph.wait(7, Level::Key, 0, b"h", move || {
            r1.fetch_add(1, Ordering::SeqCst);
        }, noop_drop);
        let r2 = ran.clone();
        // same txid, same key: a transaction's second keyRequest (e.g. HMGET then
        // DEL within one MULTI/EXEC) must proceed without an external notify.
        let _a2 = graph.wait(7, Level::Key, 0, b"h", move || {
            r2.fetch_add(1, Ordering::SeqCst);
        }, noop_drop);
        assert_eq!(ran.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn distinct_txids_on_the_same_key_serialize_in_arrival_order() {
        let graph = ListenerGraph::new();
        let order = Arc::new(StdMutex::new(Vec::new()));
        let o1 = order.clone();
        let a1 = graph.wait(1, Level::Key, 0, b"k", move || o1.lock().unwrap().push(1), noop_drop);
        let o2 = order.clone();
        let ran2 = Arc::new(StdAtomicUsize::new(0));
        let ran2c = ran2.clone();
        let _a2 = graph.wait(2, Level::Key, 0, b"k", move || {
            ran2c.store(1, Ordering::SeqCst);
            o2.lock().unwrap().push(2);
        }, noop_drop);
        // txid 2 must not have run yet: txid 1 hasn't notified.
        assert_eq!(ran2.load(Ordering::SeqCst), 0);
        graph.notify(&a1);
        assert_eq!(ran2.load(Ordering::SeqCst), 1);
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn db_level_request_binds_ahead_of_future_key_requests_but_waits_for_live_ones() {
        let graph = ListenerGraph::new();
        let key_ran = Arc::new(StdAtomicUsize::new(0));
        let k2 = key_ran.clone();
        // a key-level request is already live (not yet notified) when FLUSHDB arrives.
        let key_adm = graph.wait(1, Level::Key, 0, b"h", move || {
            k2.fetch_add(1, Ordering::SeqCst);
        }, noop_drop);
        assert_eq!(key_ran.load(Ordering::SeqCst), 1, "the lone key request should have proceeded inline");

        let flush_ran = Arc::new(StdAtomicUsize::new(0));
        let f2 = flush_ran.clone();
        let _flush_adm = graph.wait(2, Level::Db, 0, b"", move || {
            f2.fetch_add(1, Ordering::SeqCst);
        }, noop_drop);
        // FLUSHDB must wait for the still-outstanding key-level listener to notify.
        assert_eq!(flush_ran.load(Ordering::SeqCst), 0);

        // a third, later key request on a *different* key must not jump ahead of
        // the queued FLUSHDB: it binds at the db level and waits behind it.
        let later_ran = Arc::new(StdAtomicUsize::new(0));
        let l2 = later_ran.clone();
        let _later_adm = graph.wait(3, Level::Key, 0, b"other", move || {
            l2.fetch_add(1, Ordering::SeqCst);
        }, noop_drop);
        assert_eq!(later_ran.load(Ordering::SeqCst), 0, "must serialize behind the queued FLUSHDB");

        graph.notify(&key_adm);
        assert_eq!(flush_ran.load(Ordering::SeqCst), 1, "FLUSHDB should now be unblocked");
        assert_eq!(later_ran.load(Ordering::SeqCst), 0, "still behind FLUSHDB in its own queue");
    }

    #[test]
    fn notified_count_never_exceeds_entry_count_and_node_completes_exactly_once() {
        let graph = ListenerGraph::new();
        let a1 = graph.wait(5, Level::Key, 0, b"k", || {}, noop_drop);
        let a2 = graph.wait(5, Level::Key, 0, b"k", || {}, noop_drop);
        // both admissions point at the same coalesced node.
        graph.notify(&a1);
        // a distinct txid queued behind should still be blocked until the *second*
        // entry of txid 5 also notifies.
        let ran = Arc::new(StdAtomicUsize::new(0));
        let r2 = ran.clone();
        let _a3 = graph.wait(6, Level::Key, 0, b"k", move || {
            r2.fetch_add(1, Ordering::SeqCst);
        }, noop_drop);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        graph.notify(&a2);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn ctx_drop_runs_exactly_once_when_the_node_completes() {
        let graph = ListenerGraph::new();
        let dropped = Arc::new(StdAtomicUsize::new(0));
        let d2 = dropped.clone();
        let adm = graph.wait(1, Level::Key, 0, b"k", || {}, move || {
            d2.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(dropped.load(Ordering::SeqCst), 0);
        graph.notify(&adm);
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn idle_key_queue_is_pruned_after_its_listener_completes() {
        let graph = ListenerGraph::new();
        let adm = graph.wait(1, Level::Key, 0, b"prune-me", || {}, noop_drop);
        graph.notify(&adm);
        graph.prune_key(0, b"prune-me");
        assert!(!graph.keys.contains_key(&(0u32, Data::copy_from_slice(b"prune-me"))));
    }
}
