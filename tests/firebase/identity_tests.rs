//! Identity Toolkit adapter tests.

use super::helpers::{API_KEY, identity_error};
use serde_json::json;
use tickbox::account::{
    adapters::firebase::FirebaseIdentityProvider,
    domain::{EmailAddress, Password},
    ports::{AccessTokenSource, IdentityError, IdentityProvider},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path, query_param},
};

fn provider(server: &MockServer) -> FirebaseIdentityProvider {
    FirebaseIdentityProvider::new(reqwest::Client::new(), &server.uri(), API_KEY)
}

fn email() -> EmailAddress {
    EmailAddress::new("ada@example.com").expect("valid email")
}

fn password(raw: &str) -> Password {
    Password::new(raw).expect("valid password")
}

async fn mount_sign_in(server: &MockServer, verified: bool) {
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", API_KEY))
        .and(body_partial_json(json!({
            "email": "ada@example.com",
            "password": "correct-horse",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-1",
            "email": "ada@example.com",
            "idToken": "id-token-1",
            "refreshToken": "refresh-1",
            "expiresIn": "3600",
            "registered": true
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .and(body_partial_json(json!({ "idToken": "id-token-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{
                "localId": "uid-1",
                "email": "ada@example.com",
                "emailVerified": verified
            }]
        })))
        .mount(server)
        .await;
}

async fn signed_in(server: &MockServer) -> FirebaseIdentityProvider {
    mount_sign_in(server, true).await;
    let provider = provider(server);
    provider
        .sign_in(&email(), &password("correct-horse"))
        .await
        .expect("sign in should succeed");
    provider
}

#[tokio::test(flavor = "multi_thread")]
async fn sign_in_stores_the_session() {
    let server = MockServer::start().await;
    mount_sign_in(&server, false).await;
    let provider = provider(&server);

    let user = provider
        .sign_in(&email(), &password("correct-horse"))
        .await
        .expect("sign in should succeed");

    assert_eq!(user.id().as_str(), "uid-1");
    assert!(!user.email_verified());
    assert_eq!(provider.current_user(), Some(user));
    assert_eq!(
        provider.session().access_token().as_deref(),
        Some("id-token-1")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_password_is_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(identity_error("INVALID_PASSWORD")))
        .mount(&server)
        .await;
    let provider = provider(&server);

    let result = provider.sign_in(&email(), &password("wrong")).await;

    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    assert!(provider.current_user().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn weak_new_password_is_reported() {
    let server = MockServer::start().await;
    let provider = signed_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .and(body_partial_json(json!({ "idToken": "id-token-1", "password": "abc" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(identity_error(
            "WEAK_PASSWORD : Password should be at least 6 characters",
        )))
        .mount(&server)
        .await;

    let result = provider.update_password(&password("abc")).await;

    let Err(IdentityError::WeakPassword(detail)) = result else {
        panic!("expected weak password, got {result:?}");
    };
    assert_eq!(detail, "Password should be at least 6 characters");
}

#[tokio::test(flavor = "multi_thread")]
async fn password_update_rotates_tokens() {
    let server = MockServer::start().await;
    let provider = signed_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-1",
            "idToken": "id-token-2",
            "refreshToken": "refresh-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    provider
        .update_password(&password("battery-staple"))
        .await
        .expect("update should succeed");

    assert_eq!(
        provider.session().access_token().as_deref(),
        Some("id-token-2")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn verification_email_requests_verify_email() {
    let server = MockServer::start().await;
    let provider = signed_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:sendOobCode"))
        .and(query_param("key", API_KEY))
        .and(body_partial_json(json!({
            "requestType": "VERIFY_EMAIL",
            "idToken": "id-token-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "ada@example.com" })))
        .expect(1)
        .mount(&server)
        .await;

    provider
        .send_verification_email()
        .await
        .expect("request should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_user_clears_the_session() {
    let server = MockServer::start().await;
    let provider = signed_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:delete"))
        .and(body_partial_json(json!({ "idToken": "id-token-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    provider.delete_user().await.expect("delete should succeed");

    assert!(provider.current_user().is_none());
    assert!(provider.session().access_token().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_session_requires_recent_login() {
    let server = MockServer::start().await;
    let provider = signed_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:delete"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(identity_error("CREDENTIAL_TOO_OLD_LOGIN_AGAIN")),
        )
        .mount(&server)
        .await;

    let result = provider.delete_user().await;

    assert!(matches!(result, Err(IdentityError::RequiresRecentLogin)));
    assert!(provider.current_user().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn calls_without_session_stay_local() {
    let server = MockServer::start().await;
    let provider = provider(&server);

    assert!(matches!(
        provider.update_password(&password("battery-staple")).await,
        Err(IdentityError::NotSignedIn)
    ));
    assert!(matches!(
        provider.reload_user().await,
        Err(IdentityError::NotSignedIn)
    ));
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}
