//! Reviews and the provider rating aggregate.
//!
//! The aggregate is a full recomputation over every review the provider
//! has, performed while holding the provider profile row lock, so two
//! concurrent reviews cannot both read a stale count.

use jiff_sqlx::ToSqlx;
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;

use payloads::{UserId, requests, responses};

use super::{ProviderProfile, StoreError, notification, read_user};
use crate::time::TimeSource;

/// Mean rating rounded half-away-from-zero to one decimal place.
pub fn average_rating(ratings: &[i32]) -> Decimal {
    if ratings.is_empty() {
        return Decimal::ZERO;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    (Decimal::from(sum) / Decimal::from(ratings.len() as i64))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

pub async fn create_review(
    details: &requests::CreateReview,
    customer_id: &UserId,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Review, StoreError> {
    if !(requests::RATING_MIN..=requests::RATING_MAX)
        .contains(&details.rating)
    {
        return Err(StoreError::RatingOutOfRange {
            rating: details.rating,
        });
    }
    if details
        .comment
        .as_ref()
        .is_some_and(|c| c.len() > requests::COMMENT_MAX_LEN)
    {
        return Err(StoreError::FieldTooLong);
    }
    read_user(pool, customer_id).await?;

    let mut tx = pool.begin().await?;
    let booking = sqlx::query_as::<_, responses::Booking>(
        "SELECT * FROM bookings WHERE id = $1",
    )
    .bind(details.booking_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::BookingNotFound,
        e => StoreError::Database(e),
    })?;
    if booking.customer_id != *customer_id {
        return Err(StoreError::NotBookingCustomer);
    }
    if booking.status != payloads::BookingStatus::Completed {
        return Err(StoreError::BookingNotCompleted);
    }

    // Lock covers the duplicate check, the insert and the recompute.
    let profile = sqlx::query_as::<_, ProviderProfile>(
        "SELECT * FROM provider_profiles WHERE user_id = $1 FOR UPDATE",
    )
    .bind(booking.provider_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::ProviderProfileNotFound,
        e => StoreError::Database(e),
    })?;

    let review = sqlx::query_as::<_, responses::Review>(
        "INSERT INTO reviews (
            booking_id, customer_id, rating, comment, photos, created_at
         )
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(details.booking_id)
    .bind(customer_id)
    .bind(details.rating)
    .bind(&details.comment)
    .bind(&details.photos)
    .bind(time_source.now().to_sqlx())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateReview
        }
        _ => StoreError::Database(e),
    })?;

    let ratings = sqlx::query_scalar::<_, i32>(
        "SELECT r.rating FROM reviews r
         JOIN bookings b ON r.booking_id = b.id
         WHERE b.provider_id = $1",
    )
    .bind(booking.provider_id)
    .fetch_all(&mut *tx)
    .await?;
    sqlx::query(
        "UPDATE provider_profiles
         SET average_rating = $2, total_reviews = $3, updated_at = $4
         WHERE id = $1",
    )
    .bind(profile.id)
    .bind(average_rating(&ratings))
    .bind(ratings.len() as i32)
    .bind(time_source.now().to_sqlx())
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    notification::review_received(&booking, details.rating, pool, time_source)
        .await;
    Ok(review)
}

/// Public listing, newest first, with the customer and service context a
/// profile page renders.
pub async fn list_provider_reviews(
    provider_user_id: &UserId,
    pool: &PgPool,
) -> Result<responses::ProviderReviews, StoreError> {
    super::provider::profile_id_for_user(provider_user_id, pool).await?;
    let reviews = sqlx::query_as::<_, responses::ProviderReview>(
        "SELECT r.id, r.rating, r.comment, r.photos, r.created_at,
                u.name AS customer_name, u.profile_image AS customer_image,
                s.name AS service_name, b.booking_date
         FROM reviews r
         JOIN bookings b ON r.booking_id = b.id
         JOIN users u ON r.customer_id = u.id
         JOIN provider_services s ON b.service_id = s.id
         WHERE b.provider_id = $1
         ORDER BY r.created_at DESC, r.id",
    )
    .bind(provider_user_id)
    .fetch_all(pool)
    .await?;
    Ok(responses::ProviderReviews {
        count: reviews.len(),
        reviews,
    })
}
