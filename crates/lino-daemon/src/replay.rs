// crates/lino-daemon/src/replay.rs
//
// Block-log replay.
//
// The log is a JSON array of blocks:
//
//   [{"height": 1, "time": 1767229200, "oncall_validators": ["val-a"], "msgs": [...]}]
//
// Blocks at or below the store's last committed height are skipped, so a
// restarted daemon resumes where it stopped. Heights must strictly increase
// and times must not go backwards.

use serde::Deserialize;
use thiserror::Error;

use lino_app::{LinoApp, Msg};
use lino_core::{AccountKey, BlockInfo, KvStore, LinoError};

#[derive(Debug, Clone, Deserialize)]
pub struct BlockEntry {
    pub height: u64,
    pub time: i64,
    #[serde(default)]
    pub oncall_validators: Option<Vec<AccountKey>>,
    #[serde(default)]
    pub msgs: Vec<Msg>,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read block log: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed block log: {0}")]
    Json(#[from] serde_json::Error),

    #[error("block {height} does not follow block {previous}")]
    OutOfOrder { height: u64, previous: u64 },

    #[error("block {height} time {time} is before {previous}")]
    TimeWentBackwards { height: u64, time: i64, previous: i64 },

    #[error("ledger error: {0}")]
    Ledger(#[from] LinoError),
}

/// Counters for one replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub blocks: u64,
    pub skipped_blocks: u64,
    pub committed: u64,
    pub rejected: u64,
    pub state_hash: String,
}

pub fn load_block_log(path: &str) -> Result<Vec<BlockEntry>, ReplayError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Apply every not-yet-committed block of `blocks` to `app`.
pub fn replay<S: KvStore>(app: &mut LinoApp<S>, blocks: &[BlockEntry]) -> Result<ReplaySummary, ReplayError> {
    let mut summary = ReplaySummary::default();
    let mut previous = app.last_block();
    let mut log_height: Option<u64> = None;

    for entry in blocks {
        if let Some(log_previous) = log_height {
            if entry.height <= log_previous {
                return Err(ReplayError::OutOfOrder {
                    height: entry.height,
                    previous: log_previous,
                });
            }
        }
        log_height = Some(entry.height);
        if entry.height <= previous.height {
            summary.skipped_blocks += 1;
            continue;
        }
        if entry.time < previous.time {
            return Err(ReplayError::TimeWentBackwards {
                height: entry.height,
                time: entry.time,
                previous: previous.time,
            });
        }
        let block = BlockInfo {
            height: entry.height,
            time: entry.time,
        };

        app.begin_block(block, entry.oncall_validators.as_deref())?;
        for msg in &entry.msgs {
            if app.deliver(block, msg).is_ok() {
                summary.committed += 1;
            } else {
                summary.rejected += 1;
            }
        }
        app.end_block(block)?;

        let hash = app.state_hash()?;
        tracing::info!(
            "Block {} ({} msgs) app hash {}",
            entry.height,
            entry.msgs.len(),
            hash
        );
        summary.blocks += 1;
        summary.state_hash = hash;
        previous = block;
    }

    if summary.state_hash.is_empty() {
        summary.state_hash = app.state_hash()?;
    }
    Ok(summary)
}
