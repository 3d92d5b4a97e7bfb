use payloads::{Role, requests};
use reqwest::StatusCode;

use test_helpers::{
    alice_credentials, assert_status_code, paul_credentials, spawn_app,
};

#[tokio::test]
async fn login_refused() -> anyhow::Result<()> {
    let app = spawn_app().await;

    // test a login with an invalid user
    let body = requests::LoginCredentials {
        email: "random@example.com".into(),
        password: "random".into(),
    };
    let result = app.client.login(&body).await;

    match result {
        Err(payloads::ClientError::APIError(code, text)) => {
            assert_eq!(code, StatusCode::UNAUTHORIZED);
            assert_eq!(text, "Authentication failed: Invalid credentials");
        }
        _ => {
            panic!("Expected APIError");
        }
    }

    // login check should fail
    let is_logged_in = app.client.login_check().await?;
    assert!(!is_logged_in);

    Ok(())
}

#[tokio::test]
async fn create_account() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_alice_customer().await?;

    // check for valid session
    let is_logged_in = app.client.login_check().await?;
    assert!(is_logged_in);

    // role defaults to customer
    let profile = app.client.user_profile().await?;
    assert_eq!(profile.name, "Alice Johnson");
    assert_eq!(profile.role, Role::Customer);

    Ok(())
}

#[tokio::test]
async fn provider_role_assigned_at_registration() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_paul_provider().await?;

    let profile = app.client.user_profile().await?;
    assert_eq!(profile.role, Role::Provider);

    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.client.create_account(&alice_credentials()).await?;
    let result = app.client.create_account(&alice_credentials()).await;
    assert_status_code(result, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn admin_registration_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let mut body = paul_credentials();
    body.role = Some(Role::Admin);
    let result = app.client.create_account(&body).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn short_password_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let mut body = alice_credentials();
    body.password = "tiny".into();
    let result = app.client.create_account(&body).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn user_listing_is_admin_only() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.create_alice_customer().await?;
    let result = app.client.list_users().await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    app.client.logout().await?;
    app.create_admin_user().await?;
    let users = app.client.list_users().await?;
    assert_eq!(users.len(), 2);
    assert!(users.iter().any(|u| u.email == "alice@example.com"));
    assert!(users.iter().any(|u| u.role == Role::Admin));

    Ok(())
}

#[tokio::test]
async fn user_profile_requires_authentication() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app.client.user_profile().await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    Ok(())
}
