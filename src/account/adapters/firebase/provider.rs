//! `accounts:*` REST client implementing [`IdentityProvider`].

use super::{
    models::{
        ErrorEnvelope, LookupResponse, OobCodeRequest, SignInRequest, SignInResponse,
        TokenRequest, UpdatePasswordRequest, UpdatePasswordResponse,
    },
    session::SessionHandle,
};
use crate::account::{
    domain::{AuthSession, EmailAddress, Password, User, UserId},
    ports::{IdentityError, IdentityProvider, IdentityResult},
};
use crate::config::BackendConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

/// Identity provider backed by the Identity Toolkit REST API.
#[derive(Debug, Clone)]
pub struct FirebaseIdentityProvider {
    http: Client,
    base_url: String,
    api_key: String,
    session: SessionHandle,
}

impl FirebaseIdentityProvider {
    /// Creates a provider talking to `base_url` with the project's API key.
    #[must_use]
    pub fn new(http: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            session: SessionHandle::new(),
        }
    }

    /// Creates a provider from backend configuration.
    #[must_use]
    pub fn from_config(http: Client, config: &BackendConfig) -> Self {
        Self::new(http, &config.identity_url, config.api_key.clone())
    }

    /// Returns the session handle shared with the document store.
    #[must_use]
    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    fn id_token(&self) -> IdentityResult<String> {
        self.session
            .get()
            .map(|session| session.id_token().to_owned())
            .ok_or(IdentityError::NotSignedIn)
    }

    async fn call<B, R>(&self, endpoint: &str, body: &B) -> IdentityResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/v1/accounts:{endpoint}", self.base_url);
        debug!(endpoint, "calling identity provider");
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(IdentityError::network)?;

        let status = response.status();
        if status.is_success() {
            return response.json::<R>().await.map_err(IdentityError::network);
        }

        let text = response.text().await.map_err(IdentityError::network)?;
        Err(match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => classify(&envelope.error.message),
            Err(_) => IdentityError::Provider {
                code: status.as_str().to_owned(),
                message: text,
            },
        })
    }

    async fn lookup(&self, id_token: &str) -> IdentityResult<User> {
        let response: LookupResponse = self.call("lookup", &TokenRequest { id_token }).await?;
        let found = response
            .users
            .into_iter()
            .next()
            .ok_or(IdentityError::UserNotFound)?;
        to_user(&found.local_id, &found.email, found.email_verified)
    }
}

fn to_user(local_id: &str, email: &str, email_verified: bool) -> IdentityResult<User> {
    let invalid = |err: crate::account::domain::AccountDomainError| IdentityError::Provider {
        code: "INVALID_USER_RECORD".to_owned(),
        message: err.to_string(),
    };
    let id = UserId::new(local_id).map_err(invalid)?;
    let address = EmailAddress::new(email).map_err(invalid)?;
    Ok(User::new(id, address, email_verified))
}

/// Maps an Identity Toolkit error message onto [`IdentityError`].
///
/// Messages look like `CODE` or `CODE : human readable detail`.
fn classify(message: &str) -> IdentityError {
    let (code, detail) = match message.split_once(':') {
        Some((code, detail)) => (code.trim(), detail.trim()),
        None => (message.trim(), ""),
    };
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            IdentityError::InvalidCredentials
        }
        "WEAK_PASSWORD" => IdentityError::WeakPassword(if detail.is_empty() {
            code.to_owned()
        } else {
            detail.to_owned()
        }),
        "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" | "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" => {
            IdentityError::RequiresRecentLogin
        }
        "USER_NOT_FOUND" => IdentityError::UserNotFound,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => IdentityError::TooManyAttempts,
        _ => IdentityError::Provider {
            code: code.to_owned(),
            message: detail.to_owned(),
        },
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn sign_in(&self, email: &EmailAddress, password: &Password) -> IdentityResult<User> {
        let request = SignInRequest {
            email: email.as_str(),
            password: password.expose(),
            return_secure_token: true,
        };
        let signed_in: SignInResponse = self.call("signInWithPassword", &request).await?;
        let looked_up = self.lookup(&signed_in.id_token).await?;
        let user = to_user(
            &signed_in.local_id,
            &signed_in.email,
            looked_up.email_verified(),
        )?;
        self.session.set(Some(AuthSession::new(
            user.clone(),
            signed_in.id_token,
            signed_in.refresh_token,
        )));
        info!(user_id = %user.id(), "signed in");
        Ok(user)
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        self.session.set(None);
        info!("signed out");
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.session.get().map(|session| session.user().clone())
    }

    async fn reload_user(&self) -> IdentityResult<User> {
        let token = self.id_token()?;
        let user = self.lookup(&token).await?;
        let refreshed = user.clone();
        self.session.update(|session| session.set_user(refreshed));
        Ok(user)
    }

    async fn update_password(&self, new_password: &Password) -> IdentityResult<()> {
        let token = self.id_token()?;
        let request = UpdatePasswordRequest {
            id_token: &token,
            password: new_password.expose(),
            return_secure_token: true,
        };
        let response: UpdatePasswordResponse = self.call("update", &request).await?;
        if let Some(id_token) = response.id_token {
            self.session
                .update(|session| session.set_tokens(id_token, response.refresh_token));
        }
        info!("password updated");
        Ok(())
    }

    async fn delete_user(&self) -> IdentityResult<()> {
        let token = self.id_token()?;
        let _: serde_json::Value = self.call("delete", &TokenRequest { id_token: &token }).await?;
        self.session.set(None);
        info!("user deleted");
        Ok(())
    }

    async fn send_verification_email(&self) -> IdentityResult<()> {
        let token = self.id_token()?;
        let request = OobCodeRequest {
            request_type: "VERIFY_EMAIL",
            id_token: &token,
        };
        let _: serde_json::Value = self.call("sendOobCode", &request).await?;
        debug!("verification email requested");
        Ok(())
    }
}
