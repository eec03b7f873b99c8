//! Registry of running game sessions, keyed by player.
//!
//! A key is held from the moment a player asks to play (see [`SessionRegistry::reserve`])
//! until the returned guard is dropped, so one player can never run two rounds at once.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use thiserror::Error;
use tokio::sync::{Mutex as SessionLock, MutexGuard as SessionLockGuard};
use tracing::trace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a session is already active for this player")]
    AlreadyActive,
}

enum Slot<S> {
    Reserved,
    Active(Arc<SessionLock<S>>),
}

pub struct SessionRegistry<K, S> {
    slots: Mutex<HashMap<K, Slot<S>>>,
}

impl<K, S> Default for SessionRegistry<K, S> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, S> SessionRegistry<K, S>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<K, Slot<S>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `key` without a session yet. Fails if the key is reserved or active.
    pub fn reserve(&self, key: K) -> Result<Reservation<'_, K, S>, SessionError> {
        let mut slots = self.slots();
        if slots.contains_key(&key) {
            trace!(key = ?key, "Session already registered");
            return Err(SessionError::AlreadyActive);
        }
        slots.insert(key.clone(), Slot::Reserved);
        trace!(key = ?key, "Session reserved");
        Ok(Reservation {
            registry: self,
            key,
            armed: true,
        })
    }

    /// Registers `session` under `key`.
    pub fn create(&self, key: K, session: S) -> Result<SessionGuard<'_, K, S>, SessionError> {
        Ok(self.reserve(key)?.activate(session))
    }

    /// Returns the active session for `key`. Reserved keys have no session yet.
    pub fn lookup(&self, key: &K) -> Option<Arc<SessionLock<S>>> {
        match self.slots().get(key) {
            Some(Slot::Active(session)) => Some(Arc::clone(session)),
            _ => None,
        }
    }

    /// True when `key` is reserved or active.
    pub fn is_registered(&self, key: &K) -> bool {
        self.slots().contains_key(key)
    }

    /// Removes `key`, returning whether anything was registered under it.
    pub fn destroy(&self, key: &K) -> bool {
        let removed = self.slots().remove(key).is_some();
        if removed {
            trace!(key = ?key, "Session destroyed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }
}

/// A claimed key with no session yet. Dropping it frees the key.
pub struct Reservation<'a, K, S>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    registry: &'a SessionRegistry<K, S>,
    key: K,
    armed: bool,
}

impl<'a, K, S> Reservation<'a, K, S>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn activate(mut self, session: S) -> SessionGuard<'a, K, S> {
        let session = Arc::new(SessionLock::new(session));
        self.registry
            .slots()
            .insert(self.key.clone(), Slot::Active(Arc::clone(&session)));
        self.armed = false;
        trace!(key = ?self.key, "Session activated");
        SessionGuard {
            registry: self.registry,
            key: self.key.clone(),
            session,
        }
    }
}

impl<K, S> Drop for Reservation<'_, K, S>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slots = self.registry.slots();
        if matches!(slots.get(&self.key), Some(Slot::Reserved)) {
            slots.remove(&self.key);
            trace!(key = ?self.key, "Reservation released");
        }
    }
}

/// An active session. Dropping it removes the session from the registry.
pub struct SessionGuard<'a, K, S>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    registry: &'a SessionRegistry<K, S>,
    key: K,
    session: Arc<SessionLock<S>>,
}

impl<K, S> SessionGuard<'_, K, S>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Locks the session. Only one holder at a time, so guesses for the same
    /// session are never evaluated concurrently.
    pub async fn lock(&self) -> SessionLockGuard<'_, S> {
        self.session.lock().await
    }
}

impl<K, S> Drop for SessionGuard<'_, K, S>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    fn drop(&mut self) {
        let mut slots = self.registry.slots();
        // Only remove our own session; the key may have been destroyed and reused.
        let ours = matches!(
            slots.get(&self.key),
            Some(Slot::Active(current)) if Arc::ptr_eq(current, &self.session)
        );
        if ours {
            slots.remove(&self.key);
            trace!(key = ?self.key, "Session guard released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_session_per_key() {
        let registry: SessionRegistry<u64, &str> = SessionRegistry::new();
        let guard = registry.create(1, "first").unwrap();
        assert!(matches!(
            registry.create(1, "second"),
            Err(SessionError::AlreadyActive)
        ));
        assert!(registry.create(2, "other").is_ok());
        assert_eq!(guard.key(), &1);
    }

    #[test]
    fn dropping_guard_destroys_session() {
        let registry: SessionRegistry<u64, u32> = SessionRegistry::new();
        {
            let _guard = registry.create(7, 0).unwrap();
            assert!(registry.lookup(&7).is_some());
            assert_eq!(registry.len(), 1);
        }
        assert!(registry.lookup(&7).is_none());
        assert!(registry.is_empty());
        assert!(registry.create(7, 1).is_ok());
    }

    #[test]
    fn reservation_blocks_key_but_has_no_session() {
        let registry: SessionRegistry<u64, u32> = SessionRegistry::new();
        let reservation = registry.reserve(3).unwrap();
        assert!(registry.is_registered(&3));
        assert!(registry.lookup(&3).is_none());
        assert!(matches!(registry.reserve(3), Err(SessionError::AlreadyActive)));

        drop(reservation);
        assert!(!registry.is_registered(&3));
    }

    #[test]
    fn activated_reservation_is_looked_up() {
        let registry: SessionRegistry<u64, u32> = SessionRegistry::new();
        let reservation = registry.reserve(4).unwrap();
        assert_eq!(reservation.key(), &4);
        let _guard = reservation.activate(42);
        assert!(registry.lookup(&4).is_some());
        assert!(registry.is_registered(&4));
    }

    #[test]
    fn stale_guard_does_not_remove_new_session() {
        let registry: SessionRegistry<u64, u32> = SessionRegistry::new();
        let old = registry.create(5, 1).unwrap();
        assert!(registry.destroy(&5));
        assert!(!registry.destroy(&5));

        let _new = registry.create(5, 2).unwrap();
        drop(old);
        assert!(registry.lookup(&5).is_some());
    }

    #[tokio::test]
    async fn lookup_shares_state_with_guard() {
        let registry: SessionRegistry<u64, Vec<&str>> = SessionRegistry::new();
        let guard = registry.create(9, Vec::new()).unwrap();
        guard.lock().await.push("CRANE");

        let session = registry.lookup(&9).unwrap();
        assert_eq!(*session.lock().await, vec!["CRANE"]);
    }
}
