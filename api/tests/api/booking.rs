use payloads::{BookingStatus, PaymentStatus, requests};
use reqwest::StatusCode;

use test_helpers::{
    assert_status_code, booking_request, spawn_app, standard_booking_date,
    time_of,
};

fn transition(status: BookingStatus) -> requests::UpdateBookingStatus {
    requests::UpdateBookingStatus { status }
}

#[tokio::test]
async fn booking_starts_pending_with_snapshot_price() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id, booking) =
        app.setup_pending_booking().await?;
    assert_eq!(booking.provider_id, provider_id);
    assert_eq!(booking.service_id, service_id);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    // two hours at 45.00/h
    assert_eq!(booking.total_price_cents, 9000);

    Ok(())
}

#[tokio::test]
async fn overlapping_booking_conflicts() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id, booking) =
        app.setup_pending_booking().await?;

    // the provider accepts 10:00-12:00
    app.login_paul().await?;
    app.client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Accepted),
        )
        .await?;
    app.login_alice().await?;

    // 11:00-13:00 overlaps the accepted slot
    let mut overlapping = booking_request(provider_id, service_id);
    overlapping.start_time = time_of("11:00");
    overlapping.end_time = time_of("13:00");
    let result = app.client.create_booking(&overlapping).await;
    assert_status_code(result, StatusCode::CONFLICT);

    // 12:00-14:00 is back-to-back and fine
    let mut adjacent = booking_request(provider_id, service_id);
    adjacent.start_time = time_of("12:00");
    adjacent.end_time = time_of("14:00");
    let adjacent = app.client.create_booking(&adjacent).await?;
    assert_eq!(adjacent.status, BookingStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn declined_booking_frees_the_slot() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id, booking) =
        app.setup_pending_booking().await?;
    app.login_paul().await?;
    app.client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Declined),
        )
        .await?;
    app.login_alice().await?;

    // the declined slot no longer blocks the window
    let rebooked = app
        .client
        .create_booking(&booking_request(provider_id, service_id))
        .await?;
    assert_eq!(rebooked.status, BookingStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn booking_outside_availability_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id) = app.setup_provider_with_service().await?;
    app.client.logout().await?;
    app.create_alice_customer().await?;

    // window is 08:00-18:00; 06:00-08:00 is outside
    let mut details = booking_request(provider_id, service_id);
    details.start_time = time_of("06:00");
    details.end_time = time_of("08:00");
    let result = app.client.create_booking(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    // partially outside also fails
    let mut details = booking_request(provider_id, service_id);
    details.start_time = time_of("17:00");
    details.end_time = time_of("19:00");
    let result = app.client.create_booking(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn booking_on_blocked_date_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id) = app.setup_provider_with_service().await?;
    app.client
        .add_blocked_date(&requests::AddBlockedDate {
            date: standard_booking_date(),
        })
        .await?;
    app.client.logout().await?;
    app.create_alice_customer().await?;

    let result = app
        .client
        .create_booking(&booking_request(provider_id, service_id))
        .await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn booking_below_minimum_duration_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id) = app.setup_provider_with_service().await?;
    app.client.logout().await?;
    app.create_alice_customer().await?;

    // service minimum is 60 minutes
    let mut details = booking_request(provider_id, service_id);
    details.end_time = time_of("10:30");
    let result = app.client.create_booking(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn inverted_time_range_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id) = app.setup_provider_with_service().await?;
    app.client.logout().await?;
    app.create_alice_customer().await?;

    let mut details = booking_request(provider_id, service_id);
    details.start_time = time_of("12:00");
    details.end_time = time_of("10:00");
    let result = app.client.create_booking(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn provider_cannot_book_themselves() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id) = app.setup_provider_with_service().await?;
    let result = app
        .client
        .create_booking(&booking_request(provider_id, service_id))
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn accept_complete_lifecycle() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, _, booking) = app.setup_pending_booking().await?;

    app.login_paul().await?;
    let accepted = app
        .client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Accepted),
        )
        .await?;
    assert_eq!(accepted.status, BookingStatus::Accepted);

    let completed = app
        .client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Completed),
        )
        .await?;
    assert_eq!(completed.status, BookingStatus::Completed);

    // completion shows up on the provider profile
    let profile = app.client.get_provider_profile(&provider_id).await?;
    assert_eq!(profile.completed_bookings, 1);

    Ok(())
}

#[tokio::test]
async fn illegal_transitions_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (_, _, booking) = app.setup_pending_booking().await?;

    app.login_paul().await?;
    // pending cannot jump straight to completed
    let result = app
        .client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Completed),
        )
        .await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    app.client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Declined),
        )
        .await?;
    // declined is terminal
    let result = app
        .client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Accepted),
        )
        .await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    // re-requesting the state it is already in is a no-op
    let still_declined = app
        .client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Declined),
        )
        .await?;
    assert_eq!(still_declined.status, BookingStatus::Declined);

    Ok(())
}

#[tokio::test]
async fn transition_authorization() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (_, _, booking) = app.setup_pending_booking().await?;

    // the customer cannot accept their own request
    let result = app
        .client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Accepted),
        )
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    // the provider cannot cancel
    app.login_paul().await?;
    let result = app
        .client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Cancelled),
        )
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    // an admin can cancel on the customer's behalf
    app.client.logout().await?;
    app.create_admin_user().await?;
    let cancelled = app
        .client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Cancelled),
        )
        .await?;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    Ok(())
}

#[tokio::test]
async fn customer_can_cancel() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (_, _, booking) = app.setup_pending_booking().await?;
    let cancelled = app
        .client
        .update_booking_status(
            &booking.id,
            &transition(BookingStatus::Cancelled),
        )
        .await?;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    Ok(())
}

#[tokio::test]
async fn booking_visibility_and_listing_order() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id, first) =
        app.setup_pending_booking().await?;

    // a later slot the same day and one the next day
    let mut afternoon = booking_request(provider_id, service_id);
    afternoon.start_time = time_of("13:00");
    afternoon.end_time = time_of("15:00");
    let afternoon = app.client.create_booking(&afternoon).await?;

    let mut thursday = booking_request(provider_id, service_id);
    thursday.booking_date = "2025-11-06".parse()?;
    let thursday = app.client.create_booking(&thursday).await?;

    // newest date first, then latest start time
    let listed = app.client.list_bookings().await?;
    assert_eq!(
        listed.iter().map(|b| b.id).collect::<Vec<_>>(),
        vec![thursday.id, afternoon.id, first.id]
    );

    // the provider sees the same set
    app.login_paul().await?;
    let listed = app.client.list_bookings().await?;
    assert_eq!(listed.len(), 3);
    app.client.get_booking(&first.id).await?;

    // a third party sees nothing and cannot read them
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
    assert!(app.client.list_bookings().await?.is_empty());
    let result = app.client.get_booking(&first.id).await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    // admins see everything
    app.client.logout().await?;
    app.create_admin_user().await?;
    let listed = app.client.list_bookings().await?;
    assert_eq!(listed.len(), 3);

    Ok(())
}

#[tokio::test]
async fn payment_status_recording() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (_, _, booking) = app.setup_pending_booking().await?;

    // only admins record payment outcomes
    let result = app
        .client
        .record_payment_status(&requests::RecordPaymentStatus {
            booking_id: booking.id,
            payment_status: PaymentStatus::Paid,
        })
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    app.client.logout().await?;
    app.create_admin_user().await?;

    // refunding an unpaid booking is impossible
    let result = app
        .client
        .record_payment_status(&requests::RecordPaymentStatus {
            booking_id: booking.id,
            payment_status: PaymentStatus::Refunded,
        })
        .await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    let paid = app
        .client
        .record_payment_status(&requests::RecordPaymentStatus {
            booking_id: booking.id,
            payment_status: PaymentStatus::Paid,
        })
        .await?;
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    let refunded = app
        .client
        .record_payment_status(&requests::RecordPaymentStatus {
            booking_id: booking.id,
            payment_status: PaymentStatus::Refunded,
        })
        .await?;
    assert_eq!(refunded.payment_status, PaymentStatus::Refunded);

    Ok(())
}

#[tokio::test]
async fn unauthenticated_booking_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (provider_id, service_id) = app.setup_provider_with_service().await?;
    app.client.logout().await?;
    let result = app
        .client
        .create_booking(&booking_request(provider_id, service_id))
        .await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    Ok(())
}
