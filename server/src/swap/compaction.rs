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

//! Reaps orphan/stale-version Data-CF and Score-CF rows at compaction time.
//! This is what makes the "delete = delete meta row only" policy
//! safe for container types: a row survives compaction only if a meta row at the
//! same (or a newer) version is still alive, so a lazy cold-delete that removes just
//! the meta row is enough to eventually reclaim every subkey row that belonged to it.
//!
//! Installed on both the Data CF and the Score CF, grounded in the
//! `rocksdb::compaction_filter::Decision` usage in nearcore's
//! `core/store/src/db/rocksdb.rs` (the pack's only real compaction-filter example).

use crate::swap::codec;
use rocksdb::compaction_filter::Decision;
use std::collections::HashMap;

/// What the filter needs from the Meta CF: "what version (if any) does this key's
/// meta row currently carry". Kept as a trait so `apply` is unit-testable against a
/// plain `HashMap` instead of a live rocksdb handle; `swap::db::Engine` supplies the
/// real implementation.
pub trait MetaLookup {
    fn meta_version(&self, meta_key: &[u8]) -> Option<u64>;
}

impl MetaLookup for HashMap<Vec<u8>, u64> {
    fn meta_version(&self, meta_key: &[u8]) -> Option<u64> {
        self.get(meta_key).copied()
    }
}

/// Per-filter-instance amortization cache, keyed by the encoded meta key, of the
/// version last observed for it. A naive cache keyed by `(version, meta_key)` would
/// grow one entry per row version visited; since one compacting pass only ever asks
/// "what is the *current* version of this meta row" (not "at version V"), keying
/// purely by `meta_key` is sufficient.
pub type LookupCache = HashMap<Vec<u8>, Option<u64>>;

/// Applies the orphan-reclamation decision against an already-decoded `(cf, key,
/// value)` row from either the Data CF or the Score CF.
///
/// `snapshot_in_flight`: a bulk RDB/rordb export walks the CFs directly and must
/// never observe a row disappear mid-read; while one is running the filter keeps
/// everything rather than risk invalidating it.
pub fn apply(
    key: &[u8],
    value: &[u8],
    is_score_cf: bool,
    snapshot_in_flight: bool,
    lookup: &impl MetaLookup,
    cache: &mut LookupCache,
) -> Decision {
    if snapshot_in_flight {
        return Decision::Keep;
    }
    let decoded = if is_score_cf {
        codec::decode_score_key(key).map(|(dbid, k, version, _score, _member)| (dbid, k, version))
    } else {
        codec::decode_data_key(key).map(|(dbid, k, version, _subkey)| (dbid, k, version))
    };
    let Some((dbid, key_bytes, version)) = decoded else {
        // a row we can't even parse is left alone: compaction is not the place to
        // start guessing about corrupt data.
        return Decision::Keep;
    };
    if version == 0 {
        // the string whole-key layout on the Data CF always carries version 0 and
        // is invalidated directly by the string swap_out/swap_del path rather than
        // by a version bump, so it's exempt from this skew check.
        return Decision::Keep;
    }
    let _ = value; // the row's payload never affects this decision, only its key.
    let meta_key = codec::encode_meta_key(dbid, &key_bytes);
    let meta_version = *cache.entry(meta_key.clone()).or_insert_with(|| lookup.meta_version(&meta_key));
    match meta_version {
        None => Decision::Remove,
        Some(mv) if mv > version => Decision::Remove,
        Some(_) => Decision::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metamap(entries: &[(u32, &[u8], u64)]) -> HashMap<Vec<u8>, u64> {
        entries.iter().map(|(dbid, key, version)| (codec::encode_meta_key(*dbid, key), *version)).collect()
    }

    #[test]
    fn row_with_no_surviving_meta_is_dropped() {
        let key = codec::encode_data_key(0, b"k", 1, Some(b"f"));
        let lookup = metamap(&[]);
        let mut cache = LookupCache::new();
        assert_eq!(apply(&key, b"v", false, false, &lookup, &mut cache), Decision::Remove);
    }

    #[test]
    fn row_at_the_meta_s_current_version_is_kept() {
        let key = codec::encode_data_key(0, b"k", 2, Some(b"f"));
        let lookup = metamap(&[(0, b"k", 2)]);
        let mut cache = LookupCache::new();
        assert_eq!(apply(&key, b"v", false, false, &lookup, &mut cache), Decision::Keep);
    }

    #[test]
    fn row_older_than_the_meta_s_version_is_dropped() {
        // key was cold -> hot -> cold again, bumping the meta's version to 2;
        // leftover v1 rows from the first cold phase are now orphans.
        let key = codec::encode_data_key(0, b"k", 1, Some(b"f"));
        let lookup = metamap(&[(0, b"k", 2)]);
        let mut cache = LookupCache::new();
        assert_eq!(apply(&key, b"v", false, false, &lookup, &mut cache), Decision::Remove);
    }

    #[test]
    fn string_whole_key_row_is_never_touched_by_version_skew() {
        let key = codec::encode_data_key(0, b"s", 0, None);
        let lookup = metamap(&[]);
        let mut cache = LookupCache::new();
        assert_eq!(apply(&key, b"v", false, false, &lookup, &mut cache), Decision::Keep);
    }

    #[test]
    fn score_cf_rows_follow_the_same_rule_as_data_cf() {
        let key = codec::encode_score_key(0, b"z", 1, 3.5, b"m");
        let lookup = metamap(&[(0, b"z", 2)]);
        let mut cache = LookupCache::new();
        assert_eq!(apply(&key, b"", true, false, &lookup, &mut cache), Decision::Remove);
    }

    #[test]
    fn snapshot_in_flight_keeps_every_row() {
        let key = codec::encode_data_key(0, b"k", 1, Some(b"f"));
        let lookup = metamap(&[]);
        let mut cache = LookupCache::new();
        assert_eq!(apply(&key, b"v", false, true, &lookup, &mut cache), Decision::Keep);
    }

    #[test]
    fn malformed_key_is_kept_rather_than_guessed_at() {
        let lookup = metamap(&[]);
        let mut cache = LookupCache::new();
        assert_eq!(apply(b"x", b"v", false, false, &lookup, &mut cache), Decision::Keep);
    }

    #[test]
    fn lookup_cache_amortizes_repeat_meta_reads() {
        struct CountingLookup {
            calls: std::cell::Cell<u32>,
        }
        impl MetaLookup for CountingLookup {
            fn meta_version(&self, _meta_key: &[u8]) -> Option<u64> {
                self.calls.set(self.calls.get() + 1);
                Some(1)
            }
        }
        let lookup = CountingLookup { calls: std::cell::Cell::new(0) };
        let mut cache = LookupCache::new();
        for field in [b"f1".as_slice(), b"f2", b"f3"] {
            let key = codec::encode_data_key(0, b"k", 1, Some(field));
            apply(&key, b"v", false, false, &lookup, &mut cache);
        }
        assert_eq!(lookup.calls.get(), 1, "three fields of one key should share one meta lookup");
    }
}
