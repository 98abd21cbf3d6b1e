//! Explicit holder of the current bearer token.
//!
//! Nothing else reads or writes the token store: callers get the token from
//! [`AuthContext::token`] and change it only through `login`/`logout`.

use std::sync::{PoisonError, RwLock};

use crate::domain::Result;

use super::token_store::TokenStore;

/// Current authentication state, backed by a persistent [`TokenStore`].
pub struct AuthContext {
    token: RwLock<Option<String>>,
    store: Box<dyn TokenStore>,
}

impl AuthContext {
    /// Build a context primed with whatever token the store holds.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn load(store: Box<dyn TokenStore>) -> Result<Self> {
        let token = store.load()?;
        tracing::debug!(authenticated = token.is_some(), "Auth context loaded");
        Ok(Self {
            token: RwLock::new(token),
            store,
        })
    }

    /// The token to attach to requests, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Record a freshly issued token.
    ///
    /// # Errors
    /// Returns error if the token cannot be persisted.
    pub fn login(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.store.save(&token)?;
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        tracing::info!("Logged in");
        Ok(())
    }

    /// Forget the token in memory and in the store.
    ///
    /// # Errors
    /// Returns error if the store cannot be cleared.
    pub fn logout(&self) -> Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.store.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::token_store::{FileTokenStore, MemoryTokenStore};
    use tempfile::tempdir;

    #[test]
    fn test_starts_from_stored_token() {
        let auth = AuthContext::load(Box::new(MemoryTokenStore::with_token("stored"))).unwrap();
        assert_eq!(auth.token().as_deref(), Some("stored"));
    }

    #[test]
    fn test_login_and_logout_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let auth = AuthContext::load(Box::new(FileTokenStore::new(&path))).unwrap();
        assert!(!auth.is_authenticated());

        auth.login("fresh").unwrap();
        let reloaded = AuthContext::load(Box::new(FileTokenStore::new(&path))).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("fresh"));

        reloaded.logout().unwrap();
        assert!(!reloaded.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn test_debug_hides_token() {
        let auth = AuthContext::load(Box::new(MemoryTokenStore::with_token("hidden"))).unwrap();
        assert!(!format!("{auth:?}").contains("hidden"));
    }
}
