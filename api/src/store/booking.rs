//! Booking lifecycle: creation with availability and conflict checks,
//! the status state machine, payment recording, and listings.
//!
//! Creation validates inside one transaction so the overlap check and the
//! insert see the same snapshot; the partial exclusion constraint on live
//! bookings backstops concurrent transactions and trips as the same
//! conflict error.

use jiff::civil::Time;
use jiff_sqlx::ToSqlx;
use sqlx::PgPool;

use payloads::{
    AvailabilityWindow, BookingId, BookingStatus, Role, UserId, day_of_week,
    requests, responses,
};

use super::{
    ProviderProfile, ProviderService, StoreError, notification, read_user,
    require_role,
};
use crate::time::TimeSource;

/// Two half-open intervals `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff each starts before the other ends. Back-to-back bookings
/// do not overlap.
pub fn intervals_overlap(
    a_start: Time,
    a_end: Time,
    b_start: Time,
    b_end: Time,
) -> bool {
    a_start < b_end && b_start < a_end
}

fn seconds_of(t: Time) -> i64 {
    t.hour() as i64 * 3600 + t.minute() as i64 * 60 + t.second() as i64
}

pub fn duration_minutes(start: Time, end: Time) -> i64 {
    (seconds_of(end) - seconds_of(start)) / 60
}

/// Hourly rate times duration, rounded half-up to the nearest cent for
/// fractional hours.
pub fn booking_price_cents(
    price_per_hour_cents: i64,
    start: Time,
    end: Time,
) -> i64 {
    let seconds = seconds_of(end) - seconds_of(start);
    (price_per_hour_cents * seconds + 1800) / 3600
}

const EXCLUSION_VIOLATION: &str = "23P01";

pub async fn create_booking(
    details: &requests::CreateBooking,
    customer_id: &UserId,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Booking, StoreError> {
    require_role(customer_id, Role::Customer, pool).await?;
    if details.start_time >= details.end_time {
        return Err(StoreError::InvalidTimeRange);
    }
    if details
        .special_instructions
        .as_ref()
        .is_some_and(|s| s.len() > requests::INSTRUCTIONS_MAX_LEN)
    {
        return Err(StoreError::FieldTooLong);
    }

    let service = sqlx::query_as::<_, ProviderService>(
        "SELECT * FROM provider_services WHERE id = $1",
    )
    .bind(details.service_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::ServiceNotFound,
        e => StoreError::Database(e),
    })?;
    let profile = sqlx::query_as::<_, ProviderProfile>(
        "SELECT * FROM provider_profiles WHERE id = $1",
    )
    .bind(service.provider_profile_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::ProviderProfileNotFound,
        e => StoreError::Database(e),
    })?;
    if profile.user_id != details.provider_id {
        return Err(StoreError::ServiceProviderMismatch);
    }
    if !service.is_active {
        return Err(StoreError::ServiceInactive);
    }
    if !profile.is_active {
        return Err(StoreError::ProviderInactive);
    }

    let minutes = duration_minutes(details.start_time, details.end_time);
    if minutes < i64::from(service.min_duration_minutes) {
        return Err(StoreError::BelowMinimumDuration {
            minimum_minutes: service.min_duration_minutes,
        });
    }
    let total_price_cents = booking_price_cents(
        service.price_per_hour_cents,
        details.start_time,
        details.end_time,
    );

    let mut tx = pool.begin().await?;

    let date_blocked = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT 1 FROM blocked_dates
            WHERE provider_profile_id = $1 AND blocked_date = $2
         )",
    )
    .bind(profile.id)
    .bind(details.booking_date.to_sqlx())
    .fetch_one(&mut *tx)
    .await?;
    if date_blocked {
        return Err(StoreError::DateBlocked);
    }

    let window = sqlx::query_as::<_, AvailabilityWindow>(
        "SELECT day_of_week, start_time, end_time, is_available
         FROM availability_windows
         WHERE provider_profile_id = $1 AND day_of_week = $2",
    )
    .bind(profile.id)
    .bind(day_of_week(details.booking_date))
    .fetch_optional(&mut *tx)
    .await?;
    let within_window = window.is_some_and(|w| {
        w.is_available
            && w.start_time <= details.start_time
            && details.end_time <= w.end_time
    });
    if !within_window {
        return Err(StoreError::OutsideAvailability);
    }

    // The explicit check yields the typed error; the exclusion constraint
    // closes the race between two transactions that both passed it.
    let has_conflict = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT 1 FROM bookings
            WHERE provider_id = $1
              AND booking_date = $2
              AND status IN ('pending', 'accepted')
              AND start_time < $4
              AND $3 < end_time
         )",
    )
    .bind(details.provider_id)
    .bind(details.booking_date.to_sqlx())
    .bind(details.start_time.to_sqlx())
    .bind(details.end_time.to_sqlx())
    .fetch_one(&mut *tx)
    .await?;
    if has_conflict {
        return Err(StoreError::BookingConflict);
    }

    let booking = sqlx::query_as::<_, responses::Booking>(
        "INSERT INTO bookings (
            customer_id, provider_id, service_id, booking_date, start_time,
            end_time, address, city, state, zip_code, special_instructions,
            total_price_cents, created_at, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
         RETURNING *",
    )
    .bind(customer_id)
    .bind(details.provider_id)
    .bind(details.service_id)
    .bind(details.booking_date.to_sqlx())
    .bind(details.start_time.to_sqlx())
    .bind(details.end_time.to_sqlx())
    .bind(&details.address)
    .bind(&details.city)
    .bind(&details.state)
    .bind(&details.zip_code)
    .bind(&details.special_instructions)
    .bind(total_price_cents)
    .bind(time_source.now().to_sqlx())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) =>
        {
            StoreError::BookingConflict
        }
        _ => StoreError::Database(e),
    })?;

    tx.commit().await?;

    notification::booking_created(&booking, pool, time_source).await;
    Ok(booking)
}

/// Apply a lifecycle transition on behalf of `acting_user_id`.
///
/// Providers accept, decline and complete; the customer or an admin
/// cancels. Re-requesting the terminal state a booking is already in is a
/// no-op rather than an error.
pub async fn transition_status(
    booking_id: &BookingId,
    target: BookingStatus,
    acting_user_id: &UserId,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Booking, StoreError> {
    let acting_user = read_user(pool, acting_user_id).await?;

    let mut tx = pool.begin().await?;
    // Row lock so concurrent transitions on one booking serialize.
    let booking = sqlx::query_as::<_, responses::Booking>(
        "SELECT * FROM bookings WHERE id = $1 FOR UPDATE",
    )
    .bind(booking_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::BookingNotFound,
        e => StoreError::Database(e),
    })?;

    match target {
        BookingStatus::Accepted
        | BookingStatus::Declined
        | BookingStatus::Completed => {
            if acting_user.id != booking.provider_id {
                return Err(StoreError::NotBookingProvider);
            }
        }
        BookingStatus::Cancelled => {
            if acting_user.id != booking.customer_id
                && acting_user.role != Role::Admin
            {
                return Err(StoreError::NotBookingCustomer);
            }
        }
        BookingStatus::Pending => {
            return Err(StoreError::InvalidTransition {
                from: booking.status,
                to: target,
            });
        }
    }

    if booking.status == target && booking.status.is_terminal() {
        return Ok(booking);
    }
    if !booking.status.can_transition_to(target) {
        return Err(StoreError::InvalidTransition {
            from: booking.status,
            to: target,
        });
    }

    let updated = sqlx::query_as::<_, responses::Booking>(
        "UPDATE bookings SET status = $2, updated_at = $3
         WHERE id = $1
         RETURNING *",
    )
    .bind(booking_id)
    .bind(target)
    .bind(time_source.now().to_sqlx())
    .fetch_one(&mut *tx)
    .await?;

    if target == BookingStatus::Completed {
        sqlx::query(
            "UPDATE provider_profiles
             SET completed_bookings = completed_bookings + 1, updated_at = $2
             WHERE user_id = $1",
        )
        .bind(updated.provider_id)
        .bind(time_source.now().to_sqlx())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    notification::booking_transitioned(&updated, pool, time_source).await;
    Ok(updated)
}

/// Admin records what the external payment processor reports. Money only
/// moves forward: pending to paid, paid to refunded.
pub async fn record_payment_status(
    details: &requests::RecordPaymentStatus,
    acting_user_id: &UserId,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Booking, StoreError> {
    require_role(acting_user_id, Role::Admin, pool).await?;

    let mut tx = pool.begin().await?;
    let booking = sqlx::query_as::<_, responses::Booking>(
        "SELECT * FROM bookings WHERE id = $1 FOR UPDATE",
    )
    .bind(details.booking_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::BookingNotFound,
        e => StoreError::Database(e),
    })?;

    if !booking
        .payment_status
        .can_transition_to(details.payment_status)
    {
        return Err(StoreError::InvalidPaymentTransition {
            from: booking.payment_status,
            to: details.payment_status,
        });
    }

    let updated = sqlx::query_as::<_, responses::Booking>(
        "UPDATE bookings SET payment_status = $2, updated_at = $3
         WHERE id = $1
         RETURNING *",
    )
    .bind(details.booking_id)
    .bind(details.payment_status)
    .bind(time_source.now().to_sqlx())
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(updated)
}

pub async fn get_booking_for(
    booking_id: &BookingId,
    user_id: &UserId,
    pool: &PgPool,
) -> Result<responses::Booking, StoreError> {
    let user = read_user(pool, user_id).await?;
    let booking = super::get_booking(booking_id, pool).await?;
    let is_party =
        user.id == booking.customer_id || user.id == booking.provider_id;
    if !is_party && user.role != Role::Admin {
        return Err(StoreError::NotBookingParty);
    }
    Ok(booking)
}

/// Customers and providers see bookings where they are a party; admins
/// see everything.
pub async fn list_bookings(
    user_id: &UserId,
    pool: &PgPool,
) -> Result<Vec<responses::Booking>, StoreError> {
    let user = read_user(pool, user_id).await?;
    let bookings = if user.role == Role::Admin {
        sqlx::query_as::<_, responses::Booking>(
            "SELECT * FROM bookings
             ORDER BY booking_date DESC, start_time DESC, id ASC",
        )
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, responses::Booking>(
            "SELECT * FROM bookings
             WHERE customer_id = $1 OR provider_id = $1
             ORDER BY booking_date DESC, start_time DESC, id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?
    };
    Ok(bookings)
}
