//! In-memory identity provider for tests and offline demos.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::account::{
    domain::{AuthSession, EmailAddress, Password, User, UserId},
    ports::{AccessTokenSource, IdentityError, IdentityProvider, IdentityResult},
};

/// Minimum password length, matching the hosted provider's rule.
const MIN_PASSWORD_CHARS: usize = 6;

/// Thread-safe in-memory identity provider.
///
/// Accounts are created with [`InMemoryIdentityProvider::register`] since
/// sign-up is not part of the client.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityProvider {
    state: Arc<RwLock<IdentityState>>,
}

#[derive(Debug, Default)]
struct IdentityState {
    accounts: HashMap<EmailAddress, StoredAccount>,
    session: Option<AuthSession>,
    verification_emails: HashMap<UserId, usize>,
}

#[derive(Debug, Clone)]
struct StoredAccount {
    user: User,
    password: String,
}

impl IdentityState {
    fn account_for(&self, id: &UserId) -> Option<&StoredAccount> {
        self.accounts.values().find(|account| account.user.id() == id)
    }

    fn signed_in_user(&self) -> IdentityResult<User> {
        self.session
            .as_ref()
            .map(|session| session.user().clone())
            .ok_or(IdentityError::NotSignedIn)
    }
}

fn poisoned(err: impl std::fmt::Display) -> IdentityError {
    IdentityError::Provider {
        code: "LOCK_POISONED".to_owned(),
        message: err.to_string(),
    }
}

fn check_strength(password: &Password) -> IdentityResult<()> {
    if password.char_count() < MIN_PASSWORD_CHARS {
        return Err(IdentityError::WeakPassword(format!(
            "Password should be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

impl InMemoryIdentityProvider {
    /// Creates a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> IdentityResult<RwLockReadGuard<'_, IdentityState>> {
        self.state.read().map_err(poisoned)
    }

    fn write(&self) -> IdentityResult<RwLockWriteGuard<'_, IdentityState>> {
        self.state.write().map_err(poisoned)
    }

    /// Creates an unverified account.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::WeakPassword`] for short passwords and
    /// [`IdentityError::Provider`] when the email is already registered.
    pub fn register(&self, email: &EmailAddress, password: &Password) -> IdentityResult<User> {
        check_strength(password)?;
        let mut state = self.write()?;
        if state.accounts.contains_key(email) {
            return Err(IdentityError::Provider {
                code: "EMAIL_EXISTS".to_owned(),
                message: format!("{email} is already registered"),
            });
        }
        let id = UserId::new(Uuid::new_v4().simple().to_string()).map_err(|err| {
            IdentityError::Provider {
                code: "INVALID_ID".to_owned(),
                message: err.to_string(),
            }
        })?;
        let user = User::new(id, email.clone(), false);
        state.accounts.insert(
            email.clone(),
            StoredAccount {
                user: user.clone(),
                password: password.expose().to_owned(),
            },
        );
        Ok(user)
    }

    /// Marks the account's email as verified, as following the emailed link
    /// would. The cached session is not refreshed until
    /// [`IdentityProvider::reload_user`] runs.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UserNotFound`] for an unknown user.
    pub fn mark_verified(&self, id: &UserId) -> IdentityResult<()> {
        let mut state = self.write()?;
        let account = state
            .accounts
            .values_mut()
            .find(|account| account.user.id() == id)
            .ok_or(IdentityError::UserNotFound)?;
        account.user = account.user.clone().with_email_verified(true);
        Ok(())
    }

    /// Returns how many verification emails were requested for `id`.
    #[must_use]
    pub fn verification_emails_sent(&self, id: &UserId) -> usize {
        self.state
            .read()
            .map(|state| state.verification_emails.get(id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Returns `true` while an account exists for `email`.
    #[must_use]
    pub fn has_account(&self, email: &EmailAddress) -> bool {
        self.state
            .read()
            .map(|state| state.accounts.contains_key(email))
            .unwrap_or(false)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, email: &EmailAddress, password: &Password) -> IdentityResult<User> {
        let mut state = self.write()?;
        let account = state
            .accounts
            .get(email)
            .filter(|account| account.password == password.expose())
            .cloned()
            .ok_or(IdentityError::InvalidCredentials)?;
        let token = format!("memory-{}", Uuid::new_v4().simple());
        state.session = Some(AuthSession::new(account.user.clone(), token, None));
        Ok(account.user)
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        self.write()?.session = None;
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.session.as_ref().map(|session| session.user().clone()))
    }

    async fn reload_user(&self) -> IdentityResult<User> {
        let mut state = self.write()?;
        let signed_in = state.signed_in_user()?;
        let fresh = state
            .account_for(signed_in.id())
            .map(|account| account.user.clone())
            .ok_or(IdentityError::UserNotFound)?;
        if let Some(session) = state.session.as_mut() {
            session.set_user(fresh.clone());
        }
        Ok(fresh)
    }

    async fn update_password(&self, new_password: &Password) -> IdentityResult<()> {
        let mut state = self.write()?;
        let signed_in = state.signed_in_user()?;
        check_strength(new_password)?;
        let account = state
            .accounts
            .get_mut(signed_in.email())
            .ok_or(IdentityError::UserNotFound)?;
        new_password.expose().clone_into(&mut account.password);
        Ok(())
    }

    async fn delete_user(&self) -> IdentityResult<()> {
        let mut state = self.write()?;
        let signed_in = state.signed_in_user()?;
        state
            .accounts
            .remove(signed_in.email())
            .ok_or(IdentityError::UserNotFound)?;
        state.verification_emails.remove(signed_in.id());
        state.session = None;
        Ok(())
    }

    async fn send_verification_email(&self) -> IdentityResult<()> {
        let mut state = self.write()?;
        let signed_in = state.signed_in_user()?;
        *state
            .verification_emails
            .entry(signed_in.id().clone())
            .or_default() += 1;
        Ok(())
    }
}

impl AccessTokenSource for InMemoryIdentityProvider {
    fn access_token(&self) -> Option<String> {
        self.read()
            .ok()
            .and_then(|state| state.session.as_ref().map(|s| s.id_token().to_owned()))
    }
}
