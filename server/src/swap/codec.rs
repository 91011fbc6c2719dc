/*
 * Created on Mon Feb 12 2024
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

//! Key/value wire encoding for the swap store.
//!
//! Every function here is pure: no state, no I/O. The layouts are chosen so that
//! lexicographic iteration of a column family, restricted to one key's range, always
//! yields rows in a well defined order (insertion order plays no part).

use std::convert::TryInto;

/// Numeric database identifier a key request is scoped to.
pub type DbId = u32;

/// The column families the swap store opens on its one `rocksdb::DB` handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cf {
    Meta,
    Data,
    Score,
}

impl Cf {
    pub const ALL: [Cf; 3] = [Cf::Meta, Cf::Data, Cf::Score];

    pub const fn name(self) -> &'static str {
        match self {
            Cf::Meta => "meta",
            Cf::Data => "data",
            Cf::Score => "score",
        }
    }
}

/// Data CF flag: this row holds the whole value (string type; `version` is always 0).
pub const FLAG_STRING: u8 = 0;
/// Data CF flag: this row holds one subkey of a container type.
pub const FLAG_SUBKEY: u8 = 1;

fn push_keyed_prefix(buf: &mut Vec<u8>, dbid: DbId, key: &[u8]) {
    buf.extend_from_slice(&dbid.to_be_bytes());
    buf.extend_from_slice(&(key.len() as u32).to_be_bytes());
    buf.extend_from_slice(key);
}

fn read_keyed_prefix(buf: &[u8]) -> Option<(DbId, &[u8], &[u8])> {
    if buf.len() < 8 {
        return None;
    }
    let dbid = u32::from_be_bytes(buf[0..4].try_into().ok()?);
    let keylen = u32::from_be_bytes(buf[4..8].try_into().ok()?) as usize;
    let rest = &buf[8..];
    if rest.len() < keylen {
        return None;
    }
    Some((dbid, &rest[..keylen], &rest[keylen..]))
}

// ---- Meta CF -------------------------------------------------------------

pub fn encode_meta_key(dbid: DbId, key: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + key.len());
    push_keyed_prefix(&mut buf, dbid, key);
    buf
}

pub fn decode_meta_key(buf: &[u8]) -> Option<(DbId, Vec<u8>)> {
    let (dbid, key, rest) = read_keyed_prefix(buf)?;
    if !rest.is_empty() {
        return None;
    }
    Some((dbid, key.to_vec()))
}

/// `type_tag(1) ++ expire_ms(i64) ++ version(u64) ++ type_extend(var)`
pub fn encode_meta_val(swap_type: u8, expire_ms: i64, version: u64, extend: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 8 + 8 + extend.len());
    buf.push(swap_type);
    buf.extend_from_slice(&expire_ms.to_be_bytes());
    buf.extend_from_slice(&version.to_be_bytes());
    buf.extend_from_slice(extend);
    buf
}

pub fn decode_meta_val(buf: &[u8]) -> Option<(u8, i64, u64, Vec<u8>)> {
    if buf.len() < 1 + 8 + 8 {
        return None;
    }
    let swap_type = buf[0];
    let expire_ms = i64::from_be_bytes(buf[1..9].try_into().ok()?);
    let version = u64::from_be_bytes(buf[9..17].try_into().ok()?);
    Some((swap_type, expire_ms, version, buf[17..].to_vec()))
}

// ---- Data CF --------------------------------------------------------------

/// `dbid ++ u32(keylen) ++ key ++ flag(1) ++ version(u64) ++ subkey`. `subkey = None`
/// encodes the whole-key (string) row with `flag = FLAG_STRING`.
pub fn encode_data_key(dbid: DbId, key: &[u8], version: u64, subkey: Option<&[u8]>) -> Vec<u8> {
    let flag = if subkey.is_some() { FLAG_SUBKEY } else { FLAG_STRING };
    let sk_len = subkey.map_or(0, <[u8]>::len);
    let mut buf = Vec::with_capacity(8 + key.len() + 1 + 8 + sk_len);
    push_keyed_prefix(&mut buf, dbid, key);
    buf.push(flag);
    buf.extend_from_slice(&version.to_be_bytes());
    if let Some(sk) = subkey {
        buf.extend_from_slice(sk);
    }
    buf
}

pub fn decode_data_key(buf: &[u8]) -> Option<(DbId, Vec<u8>, u64, Option<Vec<u8>>)> {
    let (dbid, key, rest) = read_keyed_prefix(buf)?;
    if rest.len() < 1 + 8 {
        return None;
    }
    let flag = rest[0];
    let version = u64::from_be_bytes(rest[1..9].try_into().ok()?);
    let subkey = match flag {
        FLAG_STRING => None,
        FLAG_SUBKEY => Some(rest[9..].to_vec()),
        _ => return None,
    };
    Some((dbid, key.to_vec(), version, subkey))
}

/// Inclusive lower bound over every subkey row of `key`, across all versions.
pub fn data_range_start(dbid: DbId, key: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + key.len() + 1);
    push_keyed_prefix(&mut buf, dbid, key);
    buf.push(FLAG_SUBKEY);
    buf
}

/// Exclusive upper bound over every subkey row of `key`: the flag byte's successor
/// sorts after any version/subkey suffix that can follow a `FLAG_SUBKEY` row, and
/// before the next key's prefix (the keylen-prefixed encoding guarantees no key is a
/// byte-prefix of another).
pub fn data_range_end(dbid: DbId, key: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + key.len() + 1);
    push_keyed_prefix(&mut buf, dbid, key);
    buf.push(FLAG_SUBKEY + 1);
    buf
}

/// Bounds over every Meta-CF row belonging to one `dbid`, in key order. Used by
/// `swap::rdb` to walk one database's keys for a snapshot.
pub fn meta_db_range(dbid: DbId) -> (Vec<u8>, Vec<u8>) {
    let start = dbid.to_be_bytes().to_vec();
    let end = prefix_successor(&start).unwrap_or_else(|| vec![0xff; start.len() + 1]);
    (start, end)
}

// ---- Score CF (zset only) --------------------------------------------------

/// `dbid ++ u32(keylen) ++ key ++ version(u64) ++ f64(score, order-preserving) ++ member`
pub fn encode_score_key(dbid: DbId, key: &[u8], version: u64, score: f64, member: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + key.len() + 8 + 8 + member.len());
    push_keyed_prefix(&mut buf, dbid, key);
    buf.extend_from_slice(&version.to_be_bytes());
    buf.extend_from_slice(&encode_order_preserving_f64(score).to_be_bytes());
    buf.extend_from_slice(member);
    buf
}

pub fn decode_score_key(buf: &[u8]) -> Option<(DbId, Vec<u8>, u64, f64, Vec<u8>)> {
    let (dbid, key, rest) = read_keyed_prefix(buf)?;
    if rest.len() < 8 + 8 {
        return None;
    }
    let version = u64::from_be_bytes(rest[0..8].try_into().ok()?);
    let score = decode_order_preserving_f64(u64::from_be_bytes(rest[8..16].try_into().ok()?));
    Some((dbid, key.to_vec(), version, score, rest[16..].to_vec()))
}

/// Lower bound over a key's score rows at exactly `version`.
pub fn score_range_start(dbid: DbId, key: &[u8], version: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + key.len() + 8);
    push_keyed_prefix(&mut buf, dbid, key);
    buf.extend_from_slice(&version.to_be_bytes());
    buf
}

/// Upper bound over a key's score rows at exactly `version` (exclusive).
pub fn score_range_end(dbid: DbId, key: &[u8], version: u64) -> Vec<u8> {
    score_range_start(dbid, key, version + 1)
}

/// Lexicographic successor of `prefix`: the smallest byte string strictly greater
/// than every string that has `prefix` as a byte-prefix. `None` when `prefix` is
/// all `0xff` (no finite successor exists; callers should fall back to an unbounded
/// scan, which in practice never triggers for real `dbid ++ keylen ++ key` prefixes).
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut out = prefix.to_vec();
    for i in (0..out.len()).rev() {
        if out[i] != 0xff {
            out[i] += 1;
            out.truncate(i + 1);
            return Some(out);
        }
    }
    None
}

/// Bounds over every Score-CF row of `key`, across *all* versions -- unlike
/// `score_range_start`/`score_range_end`, which are pinned to one version. Used by
/// `swap::rdb` to dump a key's full score history in one range scan.
pub fn score_key_all_versions(dbid: DbId, key: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut start = Vec::with_capacity(8 + key.len());
    push_keyed_prefix(&mut start, dbid, key);
    let end = prefix_successor(&start).unwrap_or_else(|| vec![0xff; start.len() + 1]);
    (start, end)
}

/// Bounds a `ZRANGEBYSCORE`-style query at a fixed version: `[min, max]` inclusive.
pub fn score_range_by_score(dbid: DbId, key: &[u8], version: u64, min: f64, max: f64) -> (Vec<u8>, Vec<u8>) {
    let mut start = Vec::with_capacity(8 + key.len() + 8 + 8);
    push_keyed_prefix(&mut start, dbid, key);
    start.extend_from_slice(&version.to_be_bytes());
    start.extend_from_slice(&encode_order_preserving_f64(min).to_be_bytes());
    let mut end = Vec::with_capacity(8 + key.len() + 8 + 8);
    push_keyed_prefix(&mut end, dbid, key);
    end.extend_from_slice(&version.to_be_bytes());
    // the end bound must be exclusive of the next score value, so bump the score's
    // encoded u64 by one rather than reusing `max` verbatim.
    end.extend_from_slice(&(encode_order_preserving_f64(max).saturating_add(1)).to_be_bytes());
    (start, end)
}

/// Maps `f64` to an order-preserving `u64`: flip the sign bit for non-negative
/// numbers, invert every bit for negative numbers. Lexicographic order over the
/// big-endian bytes of the result then equals numeric order over the inputs
/// (NaN excluded; callers must reject NaN scores before encoding).
pub const fn encode_order_preserving_f64(score: f64) -> u64 {
    let bits = score.to_bits();
    if bits & (1 << 63) != 0 {
        !bits
    } else {
        bits | (1 << 63)
    }
}

pub const fn decode_order_preserving_f64(bits: u64) -> f64 {
    if bits & (1 << 63) != 0 {
        f64::from_bits(bits & !(1 << 63))
    } else {
        f64::from_bits(!bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn meta_key_round_trips() {
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let dbid: DbId = rng.gen();
            let key: Vec<u8> = (0..rng.gen_range(0..32)).map(|_| rng.gen()).collect();
            let encoded = encode_meta_key(dbid, &key);
            let (d2, k2) = decode_meta_key(&encoded).unwrap();
            assert_eq!(d2, dbid);
            assert_eq!(k2, key);
        }
    }

    #[test]
    fn meta_val_round_trips() {
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let swap_type: u8 = rng.gen_range(0..6);
            let expire_ms: i64 = rng.gen();
            let version: u64 = rng.gen();
            let extend: Vec<u8> = (0..rng.gen_range(0..16)).map(|_| rng.gen()).collect();
            let encoded = encode_meta_val(swap_type, expire_ms, version, &extend);
            let (t2, e2, v2, x2) = decode_meta_val(&encoded).unwrap();
            assert_eq!(t2, swap_type);
            assert_eq!(e2, expire_ms);
            assert_eq!(v2, version);
            assert_eq!(x2, extend);
        }
    }

    #[test]
    fn data_key_round_trips() {
        let mut rng = rand::thread_rng();
        for _ in 0..512 {
            let dbid: DbId = rng.gen();
            let key: Vec<u8> = (0..rng.gen_range(0..32)).map(|_| rng.gen()).collect();
            let version: u64 = rng.gen();
            let has_subkey = rng.gen_bool(0.7);
            let subkey: Vec<u8> = if has_subkey {
                (0..rng.gen_range(0..16)).map(|_| rng.gen()).collect()
            } else {
                Vec::new()
            };
            let encoded = encode_data_key(dbid, &key, version, has_subkey.then_some(subkey.as_slice()));
            let (d2, k2, v2, sk2) = decode_data_key(&encoded).unwrap();
            assert_eq!(d2, dbid);
            assert_eq!(k2, key);
            assert_eq!(v2, version);
            assert_eq!(sk2, has_subkey.then_some(subkey));
        }
    }

    #[test]
    fn data_range_bounds_cover_only_subkey_rows_of_one_key() {
        let dbid = 7;
        let key = b"hash-key";
        let start = data_range_start(dbid, key);
        let end = data_range_end(dbid, key);
        assert!(start < end);
        for version in [0u64, 1, u64::MAX] {
            for subkey in [&b""[..], b"field", &[0xff; 4]] {
                let row = encode_data_key(dbid, key, version, Some(subkey));
                assert!(row >= start && row < end, "subkey row should fall in [start, end)");
            }
            // the whole-key (string) row must NOT be swept by the subkey range.
            let whole = encode_data_key(dbid, key, version, None);
            assert!(whole < start, "whole-key row must sort before the subkey range");
        }
        // a different key's rows must never fall inside this key's range.
        let other = encode_data_key(dbid, b"hash-keyy", 0, Some(b"f"));
        assert!(other >= end || other < start);
    }

    #[test]
    fn score_key_round_trips() {
        let mut rng = rand::thread_rng();
        for _ in 0..512 {
            let dbid: DbId = rng.gen();
            let key: Vec<u8> = (0..rng.gen_range(0..32)).map(|_| rng.gen()).collect();
            let version: u64 = rng.gen();
            let score = loop {
                let f = f64::from_bits(rng.gen());
                if !f.is_nan() {
                    break f;
                }
            };
            let member: Vec<u8> = (0..rng.gen_range(0..16)).map(|_| rng.gen()).collect();
            let encoded = encode_score_key(dbid, &key, version, score, &member);
            let (d2, k2, v2, s2, m2) = decode_score_key(&encoded).unwrap();
            assert_eq!(d2, dbid);
            assert_eq!(k2, key);
            assert_eq!(v2, version);
            assert_eq!(s2.to_bits(), score.to_bits());
            assert_eq!(m2, member);
        }
    }

    #[test]
    fn order_preserving_f64_round_trips() {
        let mut rng = rand::thread_rng();
        for _ in 0..1024 {
            let f = f64::from_bits(rng.gen());
            if f.is_nan() {
                continue;
            }
            let back = decode_order_preserving_f64(encode_order_preserving_f64(f));
            assert_eq!(f.to_bits(), back.to_bits());
        }
    }

    #[test]
    fn prefix_successor_is_strictly_greater_than_every_extension() {
        let prefix = vec![1u8, 2, 3];
        let succ = prefix_successor(&prefix).unwrap();
        for suffix in [&b""[..], b"a", &[0xff; 8]] {
            let mut extended = prefix.clone();
            extended.extend_from_slice(suffix);
            assert!(extended < succ, "{:?} should sort before {:?}", extended, succ);
        }
        assert!(prefix < succ);
    }

    #[test]
    fn prefix_successor_returns_none_for_all_ff() {
        assert_eq!(prefix_successor(&[0xff, 0xff]), None);
    }

    #[test]
    fn meta_db_range_covers_only_one_dbid() {
        let (start, end) = meta_db_range(7);
        for key in [&b""[..], b"a", &[0xff; 16]] {
            let row = encode_meta_key(7, key);
            assert!(row >= start && row < end);
        }
        let other_db = encode_meta_key(8, b"a");
        assert!(other_db >= end || other_db < start);
    }

    #[test]
    fn score_key_all_versions_covers_every_version_of_one_key_only() {
        let dbid = 3;
        let key = b"zkey";
        let (start, end) = score_key_all_versions(dbid, key);
        for version in [0u64, 1, 42, u64::MAX] {
            let row = encode_score_key(dbid, key, version, 1.0, b"member");
            assert!(row >= start && row < end);
        }
        let other = encode_score_key(dbid, b"zkeyy", 0, 1.0, b"m");
        assert!(other >= end || other < start);
    }

    #[test]
    fn order_preserving_f64_matches_numeric_order() {
        let mut rng = rand::thread_rng();
        let mut scores: Vec<f64> = (0..1024)
            .map(|_| f64::from_bits(rng.gen()))
            .filter(|f| !f.is_nan())
            .collect();
        scores.extend([0.0, -0.0, f64::MIN_POSITIVE, -f64::MIN_POSITIVE, f64::MAX, f64::MIN, 1.0, -1.0]);
        scores.sort_by_key(|s| encode_order_preserving_f64(*s));
        for w in scores.windows(2) {
            assert!(w[0] <= w[1], "{:?} should sort before {:?}", w[0], w[1]);
        }
    }
}
