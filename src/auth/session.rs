use tower_sessions::Session;

use super::{AuthError, Identity, PendingLogin};

pub const SESSION_IDENTITY_KEY: &str = "identity";
pub const SESSION_PENDING_LOGIN_KEY: &str = "pending_login";

/// Identity of the signed-in user, if any. Session read failures count as
/// signed out.
pub async fn current_identity(session: &Session) -> Option<Identity> {
    match session.get::<Identity>(SESSION_IDENTITY_KEY).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Failed to read identity from session: {}", e);
            None
        }
    }
}

/// Attach an identity to the session under a fresh session id
pub async fn sign_in(session: &Session, identity: &Identity) -> Result<(), AuthError> {
    session.cycle_id().await?;
    session.insert(SESSION_IDENTITY_KEY, identity).await?;
    Ok(())
}

/// Destroy all session state
pub async fn sign_out(session: &Session) -> Result<(), AuthError> {
    session.flush().await?;
    Ok(())
}

pub async fn store_pending_login(session: &Session, pending: &PendingLogin) -> Result<(), AuthError> {
    session.insert(SESSION_PENDING_LOGIN_KEY, pending).await?;
    Ok(())
}

/// Remove the parked login and check it against the callback state
pub async fn take_pending_login(session: &Session, returned_state: &str) -> Result<PendingLogin, AuthError> {
    let pending = session
        .remove::<PendingLogin>(SESSION_PENDING_LOGIN_KEY)
        .await?
        .ok_or(AuthError::StateMismatch)?;

    if pending.csrf_state != returned_state {
        return Err(AuthError::StateMismatch);
    }
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn sign_in_then_out() {
        let session = session();
        assert_eq!(current_identity(&session).await, None);

        let identity = Identity {
            external_id: "abc".to_string(),
            display_name: "Ada".to_string(),
        };
        sign_in(&session, &identity).await.unwrap();
        assert_eq!(current_identity(&session).await, Some(identity));

        sign_out(&session).await.unwrap();
        assert_eq!(current_identity(&session).await, None);
    }

    #[tokio::test]
    async fn pending_login_is_single_use() {
        let session = session();
        let pending = PendingLogin {
            csrf_state: "state-1".to_string(),
            pkce_verifier: "verifier".to_string(),
        };
        store_pending_login(&session, &pending).await.unwrap();

        assert_eq!(take_pending_login(&session, "state-1").await.unwrap(), pending);
        assert!(matches!(
            take_pending_login(&session, "state-1").await,
            Err(AuthError::StateMismatch)
        ));
    }

    #[tokio::test]
    async fn mismatched_state_is_rejected() {
        let session = session();
        let pending = PendingLogin {
            csrf_state: "expected".to_string(),
            pkce_verifier: "verifier".to_string(),
        };
        store_pending_login(&session, &pending).await.unwrap();

        assert!(matches!(
            take_pending_login(&session, "forged").await,
            Err(AuthError::StateMismatch)
        ));
    }
}
