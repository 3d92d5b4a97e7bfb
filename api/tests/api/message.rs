use jiff::Span;
use payloads::requests;
use reqwest::StatusCode;

use test_helpers::{assert_status_code, spawn_app};

fn message(
    booking_id: payloads::BookingId,
    content: &str,
) -> requests::SendMessage {
    requests::SendMessage {
        booking_id,
        content: content.into(),
    }
}

#[tokio::test]
async fn thread_between_the_parties() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, _, booking) = app.setup_pending_booking().await?;

    let sent = app
        .client
        .send_message(&message(booking.id, "Please focus on the kitchen"))
        .await?;
    assert_eq!(sent.sender_id, booking.customer_id);
    assert_eq!(sent.receiver_id, provider_id);

    app.time_source.advance(Span::new().minutes(1));
    app.login_paul().await?;
    let reply = app
        .client
        .send_message(&message(booking.id, "Will do"))
        .await?;
    assert_eq!(reply.receiver_id, booking.customer_id);

    // oldest first, both parties see the same thread
    let thread = app.client.list_messages(&booking.id).await?;
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].content, "Please focus on the kitchen");
    assert_eq!(thread[1].content, "Will do");

    app.login_alice().await?;
    let thread = app.client.list_messages(&booking.id).await?;
    assert_eq!(thread.len(), 2);

    Ok(())
}

#[tokio::test]
async fn non_parties_are_excluded() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (_, _, booking) = app.setup_pending_booking().await?;
    app.client
        .send_message(&message(booking.id, "hello"))
        .await?;

    app.client.logout().await?;
    app.client
        .create_account(&requests::CreateAccount {
            name: "Mallory".into(),
            email: "mallory@example.com".into(),
            password: "mallorypw".into(),
            role: None,
        })
        .await?;
    app.client
        .login(&requests::LoginCredentials {
            email: "mallory@example.com".into(),
            password: "mallorypw".into(),
        })
        .await?;
    let result = app.client.send_message(&message(booking.id, "hi")).await;
    assert_status_code(result, StatusCode::FORBIDDEN);
    let result = app.client.list_messages(&booking.id).await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    // admins may read the thread for support purposes
    app.client.logout().await?;
    app.create_admin_user().await?;
    let thread = app.client.list_messages(&booking.id).await?;
    assert_eq!(thread.len(), 1);

    Ok(())
}

#[tokio::test]
async fn empty_message_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (_, _, booking) = app.setup_pending_booking().await?;
    let result = app.client.send_message(&message(booking.id, "")).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}
