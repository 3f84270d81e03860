//! Round-robin pool of interchangeable API keys.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::error::PoolError;

/// Opaque access token for the generation endpoint.
///
/// `Debug` output is redacted so keys never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw API key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key for building the request URL.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Ordered, non-empty set of credentials with one active at a time.
///
/// Rotation is blind round-robin with wraparound. The active index is
/// guarded by a mutex so concurrent rotations each advance it exactly once.
pub struct CredentialPool {
    credentials: Vec<Credential>,
    active: Mutex<usize>,
}

impl CredentialPool {
    /// Create a pool from raw keys, the first one active.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Empty`] for an empty list and
    /// [`PoolError::BlankCredential`] if any key is blank.
    pub fn new<I, S>(keys: I) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let credentials = keys
            .into_iter()
            .map(Into::into)
            .enumerate()
            .map(|(index, key)| {
                if key.trim().is_empty() {
                    Err(PoolError::BlankCredential { index })
                } else {
                    Ok(Credential(key))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if credentials.is_empty() {
            return Err(PoolError::Empty);
        }

        Ok(Self {
            credentials,
            active: Mutex::new(0),
        })
    }

    /// Currently active credential.
    #[must_use]
    pub fn current(&self) -> Credential {
        let active = self.lock();
        self.credentials[*active].clone()
    }

    /// Advance to the next credential and return it.
    pub fn rotate(&self) -> Credential {
        let mut active = self.lock();
        *active = (*active + 1) % self.credentials.len();
        self.credentials[*active].clone()
    }

    /// Index of the active credential.
    #[must_use]
    pub fn active_index(&self) -> usize {
        *self.lock()
    }

    /// Number of credentials in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Always false: construction rejects empty pools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    // The guarded value is a plain index, so a poisoned lock still holds a
    // valid one.
    fn lock(&self) -> std::sync::MutexGuard<'_, usize> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("len", &self.credentials.len())
            .field("active", &self.active_index())
            .finish()
    }
}
