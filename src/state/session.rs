//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Single source of truth for "who is signed in and with what token". The API
//! gateway reads the token from here on every request; route guards and
//! navigation read the role set from here on every check.
//!
//! DESIGN
//! ======
//! The token pair and identity live together in one `Option<Credentials>`,
//! so a token without an identity (or the reverse) cannot be represented.
//! Only three writers exist: `set_auth`, `set_token` and `clear_auth`. Each
//! write replaces the fields it owns and persists the result under the same
//! write lock, so memory and storage agree on the last write.
//!
//! The store is an explicit object handed to whoever needs it, cloned cheaply
//! (shared `Arc` inside). Tests build a fresh one with [`SessionStore::in_memory`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use super::role::Role;
use super::storage::{MemoryStorage, PersistedSession, PersistedState, PersistedUser, SessionStorage};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot replace the access token without a signed-in identity")]
    MissingIdentity,
    #[error("an identity needs at least one role")]
    NoRoles,
}

/// The authenticated account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub email: String,
    roles: BTreeSet<Role>,
}

impl Identity {
    /// Build an identity. Every account carries at least one role.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoRoles`] when `roles` is empty.
    pub fn new<I>(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        roles: I,
    ) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = Role>,
    {
        let roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            return Err(SessionError::NoRoles);
        }
        Ok(Self { id: id.into(), username: username.into(), email: email.into(), roles })
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Credentials {
    access_token: String,
    refresh_token: Option<String>,
    identity: Identity,
}

/// Point-in-time copy of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub identity: Option<Identity>,
    pub is_logged_in: bool,
}

impl SessionSnapshot {
    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        self.identity.as_ref().is_some_and(|identity| identity.has_role(role))
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.identity.as_ref().is_some_and(|identity| identity.has_any_role(roles))
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.id.as_str())
    }
}

fn snapshot_of(credentials: Option<&Credentials>) -> SessionSnapshot {
    match credentials {
        Some(c) => SessionSnapshot {
            access_token: Some(c.access_token.clone()),
            refresh_token: c.refresh_token.clone(),
            identity: Some(c.identity.clone()),
            is_logged_in: true,
        },
        None => SessionSnapshot::default(),
    }
}

/// Shared, persisted session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Credentials>>>,
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("SessionStore")
            .field("is_logged_in", &snapshot.is_logged_in)
            .field("user", &snapshot.identity.as_ref().map(|i| i.username.as_str()))
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Empty session backed by `storage`. Nothing is loaded.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { inner: Arc::new(RwLock::new(None)), storage }
    }

    /// Session rehydrated from `storage`.
    ///
    /// Unreadable or inconsistent records are discarded and the session starts
    /// empty.
    #[must_use]
    pub fn open(storage: Arc<dyn SessionStorage>) -> Self {
        let credentials = match storage.load() {
            Ok(Some(record)) => credentials_from_record(record),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "session record unreadable; starting signed out");
                None
            }
        };
        if let Some(c) = &credentials {
            tracing::debug!(user = %c.identity.username, "session rehydrated");
        }
        Self { inner: Arc::new(RwLock::new(credentials)), storage }
    }

    /// Fresh session kept only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Replace every session field with a new sign-in.
    pub fn set_auth(&self, access_token: String, refresh_token: Option<String>, identity: Identity) {
        tracing::info!(user = %identity.username, "signed in");
        self.write(Some(Credentials { access_token, refresh_token, identity }));
    }

    /// Replace only the access token after a refresh exchange.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingIdentity`] when nobody is signed in; the
    /// session is left untouched.
    pub fn set_token(&self, access_token: String) -> Result<(), SessionError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(current) = guard.as_ref() else {
            tracing::warn!("token refresh rejected: no signed-in identity");
            return Err(SessionError::MissingIdentity);
        };
        let next = Credentials { access_token, ..current.clone() };
        self.persist(&mut guard, Some(next));
        Ok(())
    }

    /// Sign out locally: reset every field to its empty default.
    pub fn clear_auth(&self) {
        self.write(None);
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        snapshot_of(guard.as_ref())
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map(|c| c.access_token.clone())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().and_then(|c| c.refresh_token.clone())
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map(|c| c.identity.clone())
    }

    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().is_some_and(|c| c.identity.has_role(role))
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().is_some_and(|c| c.identity.has_any_role(roles))
    }

    fn write(&self, next: Option<Credentials>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(&mut guard, next);
    }

    /// Save and swap while the caller holds the write lock, so the stored
    /// record always matches the last write applied in memory.
    fn persist(&self, guard: &mut Option<Credentials>, next: Option<Credentials>) {
        let record = PersistedSession::new(record_state(next.as_ref()));
        if let Err(e) = self.storage.save(&record) {
            tracing::warn!(error = %e, "failed to persist session; it will not survive a restart");
        }
        *guard = next;
    }
}

fn record_state(credentials: Option<&Credentials>) -> PersistedState {
    let Some(c) = credentials else {
        return PersistedState::default();
    };
    let roles: Vec<Role> = c.identity.roles.iter().cloned().collect();
    PersistedState {
        token: Some(c.access_token.clone()),
        refresh_token: c.refresh_token.clone(),
        is_logged_in: true,
        user: Some(PersistedUser {
            id: c.identity.id.clone(),
            username: c.identity.username.clone(),
            email: c.identity.email.clone(),
            roles: roles.clone(),
        }),
        roles,
    }
}

fn credentials_from_record(record: PersistedSession) -> Option<Credentials> {
    let PersistedState { token, refresh_token, user, roles, .. } = record.state;
    match (token.filter(|t| !t.is_empty()), user) {
        (None, None) => None,
        (Some(access_token), Some(user)) => {
            // Older records kept roles only at the top level.
            let roles = if user.roles.is_empty() { roles } else { user.roles };
            match Identity::new(user.id, user.username, user.email, roles) {
                Ok(identity) => Some(Credentials { access_token, refresh_token, identity }),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding persisted session");
                    None
                }
            }
        }
        _ => {
            tracing::warn!("discarding persisted session with token/identity mismatch");
            None
        }
    }
}
