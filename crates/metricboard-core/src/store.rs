//! Participant registry and per-participant metric series.
//!
//! `Store` owns every registered user and every recorded sample for the
//! lifetime of the process. Users live in a `DashMap`; a user's metric map is
//! only touched while holding that entry's shard lock, so concurrent appends to
//! the same series are serialized.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MetricboardError, Result};

/// Opaque participant identifier (random v4 UUID, hyphenated).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How registration treats the supplied display name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Trim the name; reject it when nothing is left.
    #[default]
    RejectBlank,
    /// Store whatever was sent, verbatim.
    AcceptAny,
}

impl NamePolicy {
    fn apply(self, name: &str) -> Result<String> {
        match self {
            NamePolicy::RejectBlank => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(MetricboardError::InvalidInput(
                        "name must not be empty".into(),
                    ));
                }
                Ok(trimmed.to_string())
            }
            NamePolicy::AcceptAny => Ok(name.to_string()),
        }
    }
}

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
}

struct UserEntry {
    name: String,
    created_seq: u64,
    metrics: HashMap<String, Vec<i64>>,
}

/// In-memory store of users and their samples.
pub struct Store {
    policy: NamePolicy,
    users: DashMap<UserId, UserEntry>,
    seq: AtomicU64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(NamePolicy::default())
    }
}

impl Store {
    pub fn new(policy: NamePolicy) -> Self {
        Self {
            policy,
            users: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    pub fn name_policy(&self) -> NamePolicy {
        self.policy
    }

    /// Register a participant and return a fresh identifier.
    pub fn register(&self, name: &str) -> Result<User> {
        let name = self.policy.apply(name)?;
        let created_seq = self.seq.fetch_add(1, Ordering::Relaxed);

        // v4 collisions are practically impossible, but an id is never reused.
        loop {
            let user_id = UserId::random();
            if let Entry::Vacant(slot) = self.users.entry(user_id.clone()) {
                slot.insert(UserEntry {
                    name: name.clone(),
                    created_seq,
                    metrics: HashMap::new(),
                });
                tracing::debug!(%user_id, "user registered");
                return Ok(User { user_id, name });
            }
        }
    }

    /// Append `value` to the series for (`user_id`, `metric_key`).
    pub fn record_sample(&self, user_id: &str, metric_key: &str, value: i64) -> Result<()> {
        let mut entry = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| MetricboardError::UnknownUser(user_id.to_string()))?;

        entry
            .metrics
            .entry(metric_key.to_string())
            .or_default()
            .push(value);
        Ok(())
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    /// All users in registration order.
    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<(u64, User)> = self
            .users
            .iter()
            .map(|e| {
                (
                    e.value().created_seq,
                    User {
                        user_id: e.key().clone(),
                        name: e.value().name.clone(),
                    },
                )
            })
            .collect();
        users.sort_by_key(|(seq, _)| *seq);
        users.into_iter().map(|(_, u)| u).collect()
    }

    /// Copy of one series, if it exists.
    pub fn series(&self, user_id: &str, metric_key: &str) -> Option<Vec<i64>> {
        self.users
            .get(user_id)
            .and_then(|e| e.value().metrics.get(metric_key).cloned())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn sample_count(&self) -> usize {
        self.users
            .iter()
            .map(|e| e.value().metrics.values().map(Vec::len).sum::<usize>())
            .sum()
    }

    /// Visit every (metric key, series) pair across all users.
    ///
    /// Each user's map is read under its shard lock; `f` must not call back
    /// into the store.
    pub fn visit_series<F>(&self, mut f: F)
    where
        F: FnMut(&str, &[i64]),
    {
        for e in self.users.iter() {
            for (key, values) in &e.value().metrics {
                f(key, values);
            }
        }
    }
}
