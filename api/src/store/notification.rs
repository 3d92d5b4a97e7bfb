//! In-app notification rows and the policy of who gets told what.
//!
//! Writes triggered by booking and review operations are best-effort: a
//! failed insert is logged and never rolls back the parent operation.

use jiff_sqlx::ToSqlx;
use sqlx::PgPool;

use payloads::{NotificationId, NotificationKind, UserId, responses};

use super::StoreError;
use crate::telemetry::log_error;
use crate::time::TimeSource;

async fn insert_notification(
    user_id: &UserId,
    kind: NotificationKind,
    title: &str,
    message: &str,
    link: Option<String>,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO notifications
            (user_id, kind, title, message, link, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(user_id)
    .bind(kind)
    .bind(title)
    .bind(message)
    .bind(link)
    .bind(time_source.now().to_sqlx())
    .execute(pool)
    .await?;
    Ok(())
}

/// Best-effort wrapper; failures are logged, not surfaced.
async fn notify(
    user_id: &UserId,
    kind: NotificationKind,
    title: &str,
    message: &str,
    link: Option<String>,
    pool: &PgPool,
    time_source: &TimeSource,
) {
    if let Err(e) = insert_notification(
        user_id,
        kind,
        title,
        message,
        link,
        pool,
        time_source,
    )
    .await
    {
        log_error(anyhow::Error::from(e).context("notification insert"));
    }
}

fn booking_link(booking: &responses::Booking) -> Option<String> {
    Some(format!("/bookings/{}", booking.id))
}

fn slot_description(booking: &responses::Booking) -> String {
    format!(
        "{} from {} to {}",
        booking.booking_date, booking.start_time, booking.end_time
    )
}

pub(crate) async fn booking_created(
    booking: &responses::Booking,
    pool: &PgPool,
    time_source: &TimeSource,
) {
    notify(
        &booking.provider_id,
        NotificationKind::BookingRequest,
        "New booking request",
        &format!("You have a new booking request for {}", slot_description(booking)),
        booking_link(booking),
        pool,
        time_source,
    )
    .await;
    notify(
        &booking.customer_id,
        NotificationKind::BookingRequestSent,
        "Booking request sent",
        &format!("Your booking request for {} was sent", slot_description(booking)),
        booking_link(booking),
        pool,
        time_source,
    )
    .await;
}

/// Accept, decline and complete come from the provider and notify the
/// customer; cancellation comes from the customer side and notifies the
/// provider.
pub(crate) async fn booking_transitioned(
    booking: &responses::Booking,
    pool: &PgPool,
    time_source: &TimeSource,
) {
    let slot = slot_description(booking);
    let (recipient, kind, title, message) = match booking.status {
        payloads::BookingStatus::Accepted => (
            &booking.customer_id,
            NotificationKind::BookingConfirmed,
            "Booking confirmed",
            format!("Your booking for {slot} was confirmed"),
        ),
        payloads::BookingStatus::Declined => (
            &booking.customer_id,
            NotificationKind::BookingDeclined,
            "Booking declined",
            format!("Your booking for {slot} was declined"),
        ),
        payloads::BookingStatus::Completed => (
            &booking.customer_id,
            NotificationKind::BookingCompleted,
            "Booking completed",
            format!("Your booking for {slot} was marked completed"),
        ),
        payloads::BookingStatus::Cancelled => (
            &booking.provider_id,
            NotificationKind::BookingCancelled,
            "Booking cancelled",
            format!("The booking for {slot} was cancelled"),
        ),
        payloads::BookingStatus::Pending => return,
    };
    notify(
        recipient,
        kind,
        title,
        &message,
        booking_link(booking),
        pool,
        time_source,
    )
    .await;
}

pub(crate) async fn review_received(
    booking: &responses::Booking,
    rating: i32,
    pool: &PgPool,
    time_source: &TimeSource,
) {
    notify(
        &booking.provider_id,
        NotificationKind::NewReview,
        "New review",
        &format!("You received a {rating}-star review"),
        Some("/provider/dashboard".to_string()),
        pool,
        time_source,
    )
    .await;
}

pub async fn list_notifications(
    user_id: &UserId,
    pool: &PgPool,
) -> Result<Vec<responses::Notification>, StoreError> {
    let notifications = sqlx::query_as::<_, responses::Notification>(
        "SELECT * FROM notifications
         WHERE user_id = $1
         ORDER BY created_at DESC, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(notifications)
}

pub async fn mark_read(
    notification_id: &NotificationId,
    user_id: &UserId,
    pool: &PgPool,
) -> Result<(), StoreError> {
    let notification = sqlx::query_as::<_, responses::Notification>(
        "SELECT * FROM notifications WHERE id = $1",
    )
    .bind(notification_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::NotificationNotFound,
        e => StoreError::Database(e),
    })?;
    if notification.user_id != *user_id {
        return Err(StoreError::NotNotificationOwner);
    }
    sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
        .bind(notification_id)
        .execute(pool)
        .await?;
    Ok(())
}
