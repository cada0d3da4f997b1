use std::collections::VecDeque;

use serde::Serialize;

/// Oldest entries are dropped past this point, so the log cannot grow
/// without bound over a long game.
pub const LOG_CAPACITY: usize = 100;

/// Human-readable audit trail, most recent entry first.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ActionLog {
    entries: VecDeque<String>,
}

impl ActionLog {
    pub fn record(&mut self, line: impl Into<String>) {
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_back();
        }
        self.entries.push_front(line.into());
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.as_str())
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
