use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;
use std::time::Instant;

use teloxide::types::ChatId;
use teloxide::types::UserId;

/// One outstanding "awaiting location" request, scoped to a user inside a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingKey {
  pub user_id: UserId,
  pub chat_id: ChatId,
}

impl PendingKey {
  pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
    Self { user_id, chat_id }
  }
}

/// Tracks which (user, chat) pairs should have their next free-text message
/// treated as an address.
pub trait PendingStore: Send + Sync {
  fn is_pending(&self, key: PendingKey) -> bool;

  fn set_pending(&self, key: PendingKey);

  /// Removes the entry and reports whether a live one was present.
  fn clear_pending(&self, key: PendingKey) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemPendingStore {
  entries: Mutex<HashMap<PendingKey, Instant>>,
  ttl: Option<Duration>,
}

impl InMemPendingStore {
  pub fn new(ttl: Option<Duration>) -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
      ttl,
    }
  }

  fn entries(&self) -> MutexGuard<'_, HashMap<PendingKey, Instant>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn is_live(&self, since: Instant) -> bool {
    self.ttl.is_none_or(|ttl| since.elapsed() < ttl)
  }
}

impl PendingStore for InMemPendingStore {
  fn is_pending(&self, key: PendingKey) -> bool {
    let mut entries = self.entries();
    let Some(since) = entries.get(&key).copied() else {
      return false;
    };
    let live = self.is_live(since);
    if !live {
      entries.remove(&key);
    }
    live
  }

  fn set_pending(&self, key: PendingKey) {
    self.entries().insert(key, Instant::now());
  }

  fn clear_pending(&self, key: PendingKey) -> bool {
    self
      .entries()
      .remove(&key)
      .is_some_and(|since| self.is_live(since))
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use teloxide::types::ChatId;
  use teloxide::types::UserId;

  use super::InMemPendingStore;
  use super::PendingKey;
  use super::PendingStore;

  fn key(user: u64, chat: i64) -> PendingKey {
    PendingKey::new(UserId(user), ChatId(chat))
  }

  #[test]
  fn set_then_clear_reports_pending_once() {
    let store = InMemPendingStore::default();
    store.set_pending(key(1, 10));
    assert!(store.is_pending(key(1, 10)));
    assert!(store.clear_pending(key(1, 10)));
    assert!(!store.is_pending(key(1, 10)));
    assert!(!store.clear_pending(key(1, 10)));
  }

  #[test]
  fn keys_are_scoped_to_user_and_chat() {
    let store = InMemPendingStore::default();
    store.set_pending(key(1, 10));
    assert!(!store.is_pending(key(1, 11)));
    assert!(!store.is_pending(key(2, 10)));
  }

  #[test]
  fn setting_twice_keeps_a_single_entry() {
    let store = InMemPendingStore::default();
    store.set_pending(key(1, 10));
    store.set_pending(key(1, 10));
    assert!(store.clear_pending(key(1, 10)));
    assert!(!store.is_pending(key(1, 10)));
  }

  #[test]
  fn expired_entries_read_as_idle() {
    let store = InMemPendingStore::new(Some(Duration::ZERO));
    store.set_pending(key(1, 10));
    assert!(!store.is_pending(key(1, 10)));

    store.set_pending(key(1, 10));
    assert!(!store.clear_pending(key(1, 10)));
  }

  #[test]
  fn long_ttl_keeps_entries() {
    let store = InMemPendingStore::new(Some(Duration::from_secs(3600)));
    store.set_pending(key(3, -100));
    assert!(store.is_pending(key(3, -100)));
  }
}
