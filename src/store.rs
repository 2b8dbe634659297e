use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error as ThisError;
use tokio::time::{Duration, Instant};

/// The Store is responsible for managing key-value pairs, with optional time-to-live settings for
/// each key. The store is designed to be thread-safe, allowing it to be shared and cloned cheaply
/// using reference counting.
///
/// Every operation takes the single store-wide lock for its own duration only. Expired keys are
/// removed lazily, when a read finds them past their deadline; nothing sweeps them in the
/// background, so an expired key that is never read again keeps its memory.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<State>>,
}

#[derive(Debug, ThisError, PartialEq)]
pub enum StoreError {
    #[error("value is not an integer or out of range")]
    NotAnInteger,
}

type Key = String;

#[derive(Debug)]
pub struct Value {
    pub data: Bytes,
    pub expires_at: Option<Instant>,
}

impl Value {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

#[derive(Default)]
struct State {
    keys: HashMap<Key, Value>,
}

impl Store {
    pub fn new() -> Store {
        Self::default()
    }

    /// Sets `key` to `data`, replacing any previous value and expiry. With a `ttl` the key expires
    /// once `ttl` has elapsed from now, otherwise it never does.
    pub fn set(&self, key: String, data: Bytes, ttl: Option<Duration>) {
        // A deadline too far away to be represented is the same as no deadline.
        let expires_at = ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        let value = Value { data, expires_at };

        self.lock().keys.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        let mut state = self.lock();
        let now = Instant::now();

        let expired = match state.keys.get(key) {
            Some(value) => value.is_expired(now),
            None => return None,
        };

        if expired {
            state.keys.remove(key);
            return None;
        }

        state.keys.get(key).map(|value| value.data.clone())
    }

    /// Increments the integer stored at `key` by one and returns the new value. A missing key
    /// counts as zero. On failure the stored value is left untouched.
    pub fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut state = self.lock();
        let now = Instant::now();

        let current = match state.keys.get(key) {
            Some(value) if value.is_expired(now) => None,
            Some(value) => Some(parse_integer(&value.data)?),
            None => None,
        };

        let next = current
            .unwrap_or_default()
            .checked_add(1)
            .ok_or(StoreError::NotAnInteger)?;

        let data = Bytes::from(next.to_string());
        match (current, state.keys.get_mut(key)) {
            // Incrementing keeps the expiry of a live key.
            (Some(_), Some(value)) => value.data = data,
            _ => {
                state.keys.insert(
                    key.to_string(),
                    Value {
                        data,
                        expires_at: None,
                    },
                );
            }
        }

        Ok(next)
    }

    /// Number of entries held, including expired ones that were not read since they expired.
    pub fn len(&self) -> usize {
        self.lock().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every critical section leaves the map consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_integer(data: &Bytes) -> Result<i64, StoreError> {
    std::str::from_utf8(data)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(StoreError::NotAnInteger)
}
