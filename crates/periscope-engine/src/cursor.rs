//! Duplicate suppression for the polled answer stream.

use std::collections::HashSet;

/// Tracks which answer uids have already been appended to the log.
///
/// The backend replays its latest answer on every poll, and after a long
/// task it may even resurface an older answer before the newest one lands.
/// Remembering every uid ever seen (not just the most recent) keeps both
/// patterns from duplicating log entries. Uids are small and answers are
/// human-paced, so the set stays tiny for any realistic session.
#[derive(Debug, Default)]
pub struct SyncCursor {
    last: Option<String>,
    seen: HashSet<String>,
}

impl SyncCursor {
    /// Records a uid. Returns true if it was new, false if it was already
    /// seen (in which case nothing changes).
    pub fn advance(&mut self, uid: &str) -> bool {
        if self.seen.contains(uid) {
            return false;
        }
        self.seen.insert(uid.to_string());
        self.last = Some(uid.to_string());
        true
    }

    /// The most recently accepted uid.
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}
