//! # Pending Command Tracking
//!
//! Thread-safe map of the last generated game command per user, so the
//! repeat button can re-issue it. Entries are time-bounded: every access
//! drops entries older than the configured TTL, which keeps the map from
//! growing without bound when users generate commands and walk away.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct PendingEntry {
    command: String,
    recorded_at: Instant,
}

/// Per-user store of the most recently generated game command.
pub struct PendingCommands {
    entries: Mutex<HashMap<i64, PendingEntry>>,
    ttl: Duration,
}

impl PendingCommands {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Remember the last command generated for a user, replacing any
    /// previous one.
    pub fn remember(&self, user_id: i64, command: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            user_id,
            PendingEntry {
                command: command.to_string(),
                recorded_at: Instant::now(),
            },
        );
    }

    /// Look up the user's last command, if it has not expired.
    pub fn recall(&self, user_id: i64) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        Self::purge_expired_locked(&mut entries, self.ttl);
        entries.get(&user_id).map(|entry| entry.command.clone())
    }

    /// Drop all expired entries.
    pub fn purge_expired(&self) {
        let mut entries = self.entries.lock().unwrap();
        Self::purge_expired_locked(&mut entries, self.ttl);
    }

    /// Number of live (non-purged) entries.
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        Self::purge_expired_locked(&mut entries, self.ttl);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_expired_locked(entries: &mut HashMap<i64, PendingEntry>, ttl: Duration) {
        entries.retain(|_, entry| entry.recorded_at.elapsed() < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_remember_and_recall() {
        let pending = PendingCommands::new(Duration::from_secs(60));
        pending.remember(1, "签到");

        assert_eq!(pending.recall(1), Some("签到".to_string()));
        assert_eq!(pending.recall(2), None);
    }

    #[test]
    fn test_remember_replaces_previous_command() {
        let pending = PendingCommands::new(Duration::from_secs(60));
        pending.remember(1, "签到");
        pending.remember(1, "突破");

        assert_eq!(pending.recall(1), Some("突破".to_string()));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let pending = PendingCommands::new(Duration::from_millis(20));
        pending.remember(1, "签到");

        thread::sleep(Duration::from_millis(40));

        assert_eq!(pending.recall(1), None);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_purge_only_drops_expired_entries() {
        let pending = PendingCommands::new(Duration::from_millis(50));
        pending.remember(1, "签到");

        thread::sleep(Duration::from_millis(30));
        pending.remember(2, "突破");

        thread::sleep(Duration::from_millis(30));
        pending.purge_expired();

        assert_eq!(pending.recall(1), None);
        assert_eq!(pending.recall(2), Some("突破".to_string()));
    }
}
