/*
 * Created on Mon Feb 19 2024
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

//! A small data-driven knob table backing `CONFIG GET`/`CONFIG SET`/`CONFIG REWRITE`.
//! Every existing Skytable setting (`maxcon`, `bgsave-enabled`, ...) is registered
//! read-only here since this server's startup configuration is otherwise immutable
//! once `Configset` has run; the `swap-*` knobs are the only ones that actually
//! accept `CONFIG SET`, since they're backed by plain atomics on
//! [`crate::swap::SwapRuntime`] rather than anything requiring a restart.

use crate::swap::SharedRuntime;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum KnobValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for KnobValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SetError {
    Unknown,
    Immutable,
    BadValue(String),
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "no such configuration knob"),
            Self::Immutable => write!(f, "this knob cannot be changed without a restart"),
            Self::BadValue(why) => write!(f, "{why}"),
        }
    }
}

type GetFn = fn(&SharedRuntime) -> KnobValue;
type SetFn = fn(&SharedRuntime, &str) -> Result<(), String>;

/// One registered setting. Knobs with no `set` fn are immutable: `CONFIG GET` still
/// surfaces them (for parity with `CONFIG GET <pattern>` matching every knob,
/// mutable or not) but `CONFIG SET` rejects them outright.
pub struct Knob {
    pub name: &'static str,
    get: GetFn,
    set: Option<SetFn>,
}

impl Knob {
    const fn ro(name: &'static str, get: GetFn) -> Self {
        Self { name, get, set: None }
    }
    const fn rw(name: &'static str, get: GetFn, set: SetFn) -> Self {
        Self { name, get, set: Some(set) }
    }
}

fn parse_i64(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>().map_err(|_| format!("expected an integer, got `{raw}`"))
}

/// Registers the knob table. The immutable entries read straight out of
/// `SwapRuntime::config()`'s startup snapshot; the mutable ones call the atomic
/// getters/setters on `SwapRuntime` itself.
pub const REGISTRY: &[Knob] = &[
    Knob::ro("swap-worker-threads", |rt| KnobValue::Int(rt.config().pool.core_threads as i64)),
    Knob::ro("swap-worker-threads-max", |rt| KnobValue::Int(rt.config().pool.max_threads as i64)),
    Knob::ro("swap-worker-scaleup-threshold", |rt| KnobValue::Int(rt.config().pool.req_threshold_for_new_thread as i64)),
    Knob::ro("swap-evict-step", |rt| KnobValue::Int(rt.config().evict_step as i64)),
    Knob::ro("swap-cold-filter-capacity", |rt| KnobValue::Int(rt.config().cold_filter.cuckoo_capacity as i64)),
    Knob::ro("swap-cold-filter-absent-capacity", |rt| {
        KnobValue::Int(rt.config().cold_filter.absent_cache_capacity as i64)
    }),
    Knob::rw(
        "swap-inprogress-memory-slowdown",
        |rt| KnobValue::Int(rt.inflight_memory_slowdown_bytes()),
        |rt, raw| {
            let v = parse_i64(raw)?;
            rt.set_inflight_memory_slowdown_bytes(v).map_err(str::to_string)
        },
    ),
    Knob::rw(
        "swap-inprogress-memory-stop",
        |rt| KnobValue::Int(rt.inflight_memory_stop_bytes()),
        |rt, raw| {
            let v = parse_i64(raw)?;
            rt.set_inflight_memory_stop_bytes(v).map_err(str::to_string)
        },
    ),
    Knob::ro("swap-disk-degraded", |rt| KnobValue::Bool(rt.is_disk_degraded())),
];

/// `true` if `name` matches `pattern`, where `pattern` may contain at most a single
/// trailing `*` (the only form `CONFIG GET swap-*` needs; a full glob engine would be
/// overkill for a knob table this small).
fn glob_match(pattern: &str, name: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => pattern == name,
    }
}

/// `CONFIG GET <pattern>`: every registered knob whose name matches, in registration
/// order.
pub fn get(rt: &SharedRuntime, pattern: &str) -> Vec<(&'static str, KnobValue)> {
    REGISTRY
        .iter()
        .filter(|k| glob_match(pattern, k.name))
        .map(|k| (k.name, (k.get)(rt)))
        .collect()
}

/// `CONFIG SET <name> <value>`: rejects unknown names, immutable knobs, and values
/// that fail the knob's own validator.
pub fn set(rt: &SharedRuntime, name: &str, raw_value: &str) -> Result<(), SetError> {
    let knob = REGISTRY.iter().find(|k| k.name == name).ok_or(SetError::Unknown)?;
    let setter = knob.set.ok_or(SetError::Immutable)?;
    setter(rt, raw_value).map_err(SetError::BadValue)
}

/// `CONFIG REWRITE`: a flat `key = value` rendering of every knob's current value,
/// suitable for appending to (or replacing) the `[swap]` table of the on-disk TOML
/// config file. Immutable knobs are included too, as a snapshot of what this process
/// actually started with, not just what can still be changed.
pub fn rewrite(rt: &SharedRuntime) -> String {
    let mut out = String::from("[swap]\n");
    for knob in REGISTRY {
        let value = (knob.get)(rt);
        match value {
            KnobValue::Str(ref s) => out.push_str(&format!("{} = \"{}\"\n", knob.name, s)),
            _ => out.push_str(&format!("{} = {}\n", knob.name, value)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swap::{SwapConfig, SwapRuntime};

    fn open_tmp() -> (tempfile_dir::TempDir, SharedRuntime) {
        let dir = tempfile_dir::TempDir::new();
        let rt = SwapRuntime::open(dir.path(), SwapConfig::default()).unwrap();
        (dir, rt)
    }

    mod tempfile_dir {
        use std::path::{Path, PathBuf};
        use std::sync::atomic::{AtomicU64, Ordering};

        pub struct TempDir(PathBuf);
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        impl TempDir {
            pub fn new() -> Self {
                let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                let path = std::env::temp_dir().join(format!("swap-cfgrt-test-{}-{}", std::process::id(), n));
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
    fn get_with_glob_returns_only_matching_knobs() {
        let (_dir, rt) = open_tmp();
        let all = get(&rt, "swap-*");
        assert!(all.iter().all(|(name, _)| name.starts_with("swap-")));
        assert!(all.len() >= 7);
        let one = get(&rt, "swap-evict-step");
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].1, KnobValue::Int(128));
    }

    #[test]
    fn set_mutates_a_writable_knob_and_get_reflects_it_immediately() {
        let (_dir, rt) = open_tmp();
        set(&rt, "swap-inprogress-memory-stop", "999999999").unwrap();
        set(&rt, "swap-inprogress-memory-slowdown", "123").unwrap();
        let got = get(&rt, "swap-inprogress-memory-slowdown");
        assert_eq!(got[0].1, KnobValue::Int(123));
    }

    #[test]
    fn set_rejects_immutable_knob() {
        let (_dir, rt) = open_tmp();
        assert_eq!(set(&rt, "swap-evict-step", "64"), Err(SetError::Immutable));
    }

    #[test]
    fn set_rejects_unknown_knob() {
        let (_dir, rt) = open_tmp();
        assert_eq!(set(&rt, "swap-does-not-exist", "1"), Err(SetError::Unknown));
    }

    #[test]
    fn set_rejects_value_that_fails_validation() {
        let (_dir, rt) = open_tmp();
        let err = set(&rt, "swap-inprogress-memory-slowdown", "not-a-number").unwrap_err();
        assert!(matches!(err, SetError::BadValue(_)));
    }

    #[test]
    fn rewrite_renders_every_knob_as_a_toml_line() {
        let (_dir, rt) = open_tmp();
        let text = rewrite(&rt);
        assert!(text.starts_with("[swap]\n"));
        assert!(text.contains("swap-evict-step = 128"));
    }
}
