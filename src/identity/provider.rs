use tracing::{info, warn};

use super::credential;
use super::session::{SessionManager, SetCookie};
use super::user::Identity;
use super::validation::validate_registration;
use crate::error::{AppError, AppResult};
use crate::storage::SharedUsers;

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Confirmation field from the signup form; `None` skips the match check.
    pub verify: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub identity: Identity,
    /// `Set-Cookie` directives establishing the session.
    pub cookies: Vec<SetCookie>,
}

/// Registration and login over a user directory.
#[derive(Clone)]
pub struct AccountService {
    users: SharedUsers,
    sessions: SessionManager,
}

impl AccountService {
    pub fn new(users: SharedUsers, sessions: SessionManager) -> Self { Self { users, sessions } }

    pub fn sessions(&self) -> &SessionManager { &self.sessions }

    /// Validate, reject an existing exact name, then persist and open a session.
    ///
    /// The name check and the save are separate store calls; two concurrent signups for
    /// the same name can both pass the check.
    pub fn register(&self, req: &RegisterRequest) -> AppResult<LoginResponse> {
        let email = req.email.as_deref().filter(|e| !e.is_empty());
        validate_registration(&req.username, &req.password, req.verify.as_deref(), email)?;
        if self.users.find_identity_by_name(&req.username)?.is_some() {
            warn!(target: "quill::auth", "auth.register duplicate user={}", req.username);
            return Err(AppError::duplicate_user(req.username.as_str()));
        }
        let cred = credential::hash(&req.username, &req.password, None);
        let identity = self.users.save_identity(Identity::new(req.username.as_str(), cred, email.map(str::to_string)))?;
        info!(target: "quill::auth", "auth.register user={} id={:?}", identity.name, identity.id);
        let cookies = self.sessions.login(&identity);
        Ok(LoginResponse { identity, cookies })
    }

    pub fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let Some(identity) = self.users.find_identity_by_name(username)? else {
            warn!(target: "quill::auth", "auth.login unknown user={}", username);
            return Err(AppError::InvalidCredentials);
        };
        if !credential::verify(username, password, &identity.password) {
            warn!(target: "quill::auth", "auth.login bad password user={}", username);
            return Err(AppError::InvalidCredentials);
        }
        info!(target: "quill::auth", "auth.login user={} id={:?}", identity.name, identity.id);
        let cookies = self.sessions.login(&identity);
        Ok(LoginResponse { identity, cookies })
    }

    pub fn logout(&self) -> Vec<SetCookie> { self.sessions.logout() }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{MemoryStore, UserDirectory};

    fn service() -> (AccountService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let svc = AccountService::new(store.clone(), SessionManager::from_secret("provider tests"));
        (svc, store)
    }

    fn req(name: &str, pw: &str) -> RegisterRequest {
        RegisterRequest { username: name.into(), password: pw.into(), verify: None, email: None }
    }

    #[test]
    fn register_persists_salted_credential() {
        let (svc, store) = service();
        let resp = svc.register(&req("alice", "secret")).unwrap();
        assert_eq!(resp.identity.id, Some(1));
        assert_eq!(resp.cookies.len(), 2);
        let stored = store.find_identity_by_name("alice").unwrap().unwrap();
        assert_ne!(stored.password, "secret");
        assert!(credential::verify("alice", "secret", &stored.password));
    }

    #[test]
    fn register_rejects_duplicate_and_keeps_first() {
        let (svc, store) = service();
        svc.register(&req("alice", "secret")).unwrap();
        let before = store.find_identity_by_name("alice").unwrap().unwrap();
        let err = svc.register(&req("alice", "other")).unwrap_err();
        assert_eq!(err, AppError::duplicate_user("alice"));
        assert_eq!(store.find_identity_by_name("alice").unwrap().unwrap(), before);
        // Case-sensitive: a different spelling is a different name
        assert!(svc.register(&req("Alice", "secret")).is_ok());
    }

    #[test]
    fn register_validates_before_touching_store() {
        let (svc, store) = service();
        let err = svc.register(&req("a", "secret")).unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(store.find_identity_by_name("a").unwrap().is_none());
    }

    #[test]
    fn empty_email_is_stored_as_none() {
        let (svc, _) = service();
        let mut r = req("alice", "secret");
        r.email = Some(String::new());
        assert_eq!(svc.register(&r).unwrap().identity.email, None);
    }

    #[test]
    fn login_checks_password() {
        let (svc, _) = service();
        svc.register(&req("alice", "secret")).unwrap();
        assert_eq!(svc.login("alice", "secret").unwrap().identity.name, "alice");
        assert_eq!(svc.login("alice", "wrongpw").unwrap_err(), AppError::InvalidCredentials);
        assert_eq!(svc.login("nobody", "secret").unwrap_err(), AppError::InvalidCredentials);
    }
}
