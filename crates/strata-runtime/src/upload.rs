use serde::{Deserialize, Serialize};

/// Items applied per frame, scaled to the upload backlog.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct UploadBudget {
    #[serde(default = "default_low_backlog")]
    pub low_backlog: usize,
    #[serde(default = "default_low_rate")]
    pub low_rate: usize,
    #[serde(default = "default_mid_backlog")]
    pub mid_backlog: usize,
    #[serde(default = "default_mid_rate")]
    pub mid_rate: usize,
    #[serde(default = "default_high_rate")]
    pub high_rate: usize,
}

fn default_low_backlog() -> usize {
    4
}
fn default_low_rate() -> usize {
    1
}
fn default_mid_backlog() -> usize {
    32
}
fn default_mid_rate() -> usize {
    3
}
fn default_high_rate() -> usize {
    8
}

impl Default for UploadBudget {
    fn default() -> Self {
        Self {
            low_backlog: default_low_backlog(),
            low_rate: default_low_rate(),
            mid_backlog: default_mid_backlog(),
            mid_rate: default_mid_rate(),
            high_rate: default_high_rate(),
        }
    }
}

impl UploadBudget {
    pub fn per_frame(&self, backlog: usize) -> usize {
        let rate = if backlog <= self.low_backlog {
            self.low_rate
        } else if backlog <= self.mid_backlog {
            self.mid_rate
        } else {
            self.high_rate
        };
        rate.min(backlog)
    }
}

/// Cumulative presentation-side counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadStats {
    /// Mesh items applied to a live representation.
    pub applied: u64,
    pub created: u64,
    pub updated: u64,
    /// Stale items dropped because their chunk left the store or a newer
    /// mesh of it was already applied.
    pub discarded: u64,
    pub destroyed: u64,
    /// Unload targets that had no representation.
    pub ghosts: u64,
}
