//! Per-booking message threads between the two parties.

use jiff_sqlx::ToSqlx;
use sqlx::PgPool;

use payloads::{BookingId, Role, UserId, requests, responses};

use super::{StoreError, read_user};
use crate::time::TimeSource;

/// The sender must be a party to the booking; the receiver is always the
/// other party.
pub async fn send_message(
    details: &requests::SendMessage,
    sender_id: &UserId,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Message, StoreError> {
    if details.content.is_empty() {
        return Err(StoreError::EmptyContent);
    }
    if details.content.len() > requests::MESSAGE_MAX_LEN {
        return Err(StoreError::FieldTooLong);
    }
    let booking = super::get_booking(&details.booking_id, pool).await?;
    let receiver_id = if *sender_id == booking.customer_id {
        booking.provider_id
    } else if *sender_id == booking.provider_id {
        booking.customer_id
    } else {
        return Err(StoreError::NotBookingParty);
    };
    let message = sqlx::query_as::<_, responses::Message>(
        "INSERT INTO messages
            (booking_id, sender_id, receiver_id, content, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(details.booking_id)
    .bind(sender_id)
    .bind(receiver_id)
    .bind(&details.content)
    .bind(time_source.now().to_sqlx())
    .fetch_one(pool)
    .await?;
    Ok(message)
}

/// Thread in conversation order, oldest first. Parties and admins only.
pub async fn list_messages(
    booking_id: &BookingId,
    user_id: &UserId,
    pool: &PgPool,
) -> Result<Vec<responses::Message>, StoreError> {
    let user = read_user(pool, user_id).await?;
    let booking = super::get_booking(booking_id, pool).await?;
    let is_party =
        user.id == booking.customer_id || user.id == booking.provider_id;
    if !is_party && user.role != Role::Admin {
        return Err(StoreError::NotBookingParty);
    }
    let messages = sqlx::query_as::<_, responses::Message>(
        "SELECT * FROM messages
         WHERE booking_id = $1
         ORDER BY created_at, id",
    )
    .bind(booking_id)
    .fetch_all(pool)
    .await?;
    Ok(messages)
}
