//! Follower count snapshots
//!
//! Follower growth is the difference between the count seen now and the
//! count seen on an earlier run. Snapshots live in memory and, when a state
//! file is configured, are reloaded on startup and rewritten after every
//! observation so a one-shot CLI run still sees the previous run.
//!
//! The map is bounded: snapshots older than [`SNAPSHOT_TTL_SECS`] no longer
//! count as a baseline, and past [`MAX_SNAPSHOTS`] the oldest are evicted.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use auravault_common::Fid;
use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const STATE_VERSION: u32 = 1;

/// Snapshots kept before the oldest are evicted
pub const MAX_SNAPSHOTS: usize = 10_000;

/// Age after which a snapshot is no longer a valid baseline (30 days)
pub const SNAPSHOT_TTL_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Snapshot {
    follower_count: u64,
    /// Unix seconds
    observed_at: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    snapshots: HashMap<Fid, Snapshot>,
}

/// Last follower count seen per FID
pub struct FollowerSnapshots {
    entries: DashMap<Fid, Snapshot>,
    state_file: Option<PathBuf>,
    max_entries: usize,
    ttl_secs: i64,
    save_lock: Mutex<()>,
}

impl Default for FollowerSnapshots {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl FollowerSnapshots {
    /// Snapshots that last only as long as the process
    pub fn in_memory() -> Self {
        Self {
            entries: DashMap::new(),
            state_file: None,
            max_entries: MAX_SNAPSHOTS,
            ttl_secs: SNAPSHOT_TTL_SECS,
            save_lock: Mutex::new(()),
        }
    }

    /// Snapshots backed by a JSON state file
    ///
    /// A missing or unreadable file starts empty.
    pub fn open(path: &Path) -> Self {
        let snapshots = Self {
            state_file: Some(path.to_path_buf()),
            ..Self::in_memory()
        };

        if let Err(e) = snapshots.load(path) {
            warn!(path = %path.display(), "Failed to load follower state: {:#}", e);
        }

        snapshots
    }

    pub fn with_limits(mut self, max_entries: usize, ttl_secs: i64) -> Self {
        self.max_entries = max_entries.max(1);
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn load(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            debug!(path = %path.display(), "No follower state file yet");
            return Ok(());
        }

        let file = File::open(path).context("Failed to open follower state")?;
        let state: StateFile =
            serde_json::from_reader(BufReader::new(file)).context("Failed to parse follower state")?;

        if state.version != STATE_VERSION {
            info!(
                "Follower state version mismatch (got {}, expected {}), starting empty",
                state.version, STATE_VERSION
            );
            return Ok(());
        }

        let now = Utc::now().timestamp();
        for (fid, snapshot) in state.snapshots {
            if now - snapshot.observed_at <= self.ttl_secs {
                self.entries.insert(fid, snapshot);
            }
        }
        self.evict_oldest();

        debug!(snapshots = self.entries.len(), "Loaded follower state");
        Ok(())
    }

    /// Record `follower_count` for `fid` and return the change since the
    /// previous snapshot, or `None` when there is no usable baseline.
    pub fn record(&self, fid: Fid, follower_count: u64) -> Option<i64> {
        self.record_at(fid, follower_count, Utc::now().timestamp())
    }

    fn record_at(&self, fid: Fid, follower_count: u64, now: i64) -> Option<i64> {
        let previous = self.entries.insert(
            fid,
            Snapshot {
                follower_count,
                observed_at: now,
            },
        );
        self.evict_oldest();

        if self.state_file.is_some() {
            if let Err(e) = self.save() {
                warn!("Failed to save follower state: {:#}", e);
            }
        }

        previous
            .filter(|p| now - p.observed_at <= self.ttl_secs)
            .map(|p| follower_count as i64 - p.follower_count as i64)
    }

    fn evict_oldest(&self) {
        let excess = self.entries.len().saturating_sub(self.max_entries);
        if excess == 0 {
            return;
        }

        let mut by_age: Vec<(Fid, i64)> = self
            .entries
            .iter()
            .map(|e| (*e.key(), e.value().observed_at))
            .collect();
        by_age.sort_by_key(|(_, observed_at)| *observed_at);

        for (fid, _) in by_age.into_iter().take(excess) {
            self.entries.remove(&fid);
        }
        debug!(evicted = excess, "Evicted follower snapshots");
    }

    /// Persist to the state file, if one is configured
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };
        let _guard = self.save_lock.lock().unwrap_or_else(|e| e.into_inner());

        let state = StateFile {
            version: STATE_VERSION,
            snapshots: self
                .entries
                .iter()
                .map(|e| (*e.key(), *e.value()))
                .collect(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create follower state directory")?;
        }

        // Write to temp file first, then rename
        let tmp_file = path.with_extension("tmp");
        let file = File::create(&tmp_file).context("Failed to create temp follower state")?;
        serde_json::to_writer(BufWriter::new(file), &state)
            .context("Failed to write follower state")?;
        fs::rename(&tmp_file, path).context("Failed to rename temp follower state")?;

        Ok(())
    }
}
