//! Provider-side setup: profile, services, weekly availability, blocked
//! dates. These are the read-only inputs the booking core validates
//! against.

use jiff::civil::Date;
use jiff_sqlx::ToSqlx;
use sqlx::PgPool;

use payloads::{
    AvailabilityWindow, ProviderProfileId, Role, UserId, requests, responses,
};

use super::{ProviderProfile, ProviderService, StoreError, require_role};
use crate::time::TimeSource;

/// A profile is complete once every field a customer needs to find and
/// book the provider is filled in.
fn is_profile_complete(details: &payloads::ProviderProfile) -> bool {
    details.bio.is_some()
        && !details.address.is_empty()
        && !details.city.is_empty()
        && !details.state.is_empty()
        && !details.zip_code.is_empty()
}

pub async fn create_profile(
    details: &payloads::ProviderProfile,
    user_id: &UserId,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::ProviderProfile, StoreError> {
    require_role(user_id, Role::Provider, pool).await?;
    let profile = sqlx::query_as::<_, ProviderProfile>(
        "INSERT INTO provider_profiles (
            user_id, bio, years_experience, has_insurance, has_vehicle,
            has_equipment, address, city, state, zip_code,
            service_radius_km, profile_complete, created_at, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
         RETURNING *",
    )
    .bind(user_id)
    .bind(&details.bio)
    .bind(details.years_experience)
    .bind(details.has_insurance)
    .bind(details.has_vehicle)
    .bind(details.has_equipment)
    .bind(&details.address)
    .bind(&details.city)
    .bind(&details.state)
    .bind(&details.zip_code)
    .bind(details.service_radius_km)
    .bind(is_profile_complete(details))
    .bind(time_source.now().to_sqlx())
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::ProfileAlreadyExists
        }
        _ => StoreError::Database(e),
    })?;
    Ok(profile.into())
}

pub async fn update_profile(
    details: &payloads::ProviderProfile,
    user_id: &UserId,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::ProviderProfile, StoreError> {
    require_role(user_id, Role::Provider, pool).await?;
    let profile = sqlx::query_as::<_, ProviderProfile>(
        "UPDATE provider_profiles SET
            bio = $2, years_experience = $3, has_insurance = $4,
            has_vehicle = $5, has_equipment = $6, address = $7, city = $8,
            state = $9, zip_code = $10, service_radius_km = $11,
            profile_complete = $12, updated_at = $13
         WHERE user_id = $1
         RETURNING *",
    )
    .bind(user_id)
    .bind(&details.bio)
    .bind(details.years_experience)
    .bind(details.has_insurance)
    .bind(details.has_vehicle)
    .bind(details.has_equipment)
    .bind(&details.address)
    .bind(&details.city)
    .bind(&details.state)
    .bind(&details.zip_code)
    .bind(details.service_radius_km)
    .bind(is_profile_complete(details))
    .bind(time_source.now().to_sqlx())
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::ProviderProfileNotFound,
        e => StoreError::Database(e),
    })?;
    Ok(profile.into())
}

/// Public read; keyed by the provider's user id, which is what bookings
/// and reviews reference.
pub async fn get_profile(
    provider_user_id: &UserId,
    pool: &PgPool,
) -> Result<responses::ProviderProfile, StoreError> {
    let profile = sqlx::query_as::<_, ProviderProfile>(
        "SELECT * FROM provider_profiles WHERE user_id = $1",
    )
    .bind(provider_user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::ProviderProfileNotFound,
        e => StoreError::Database(e),
    })?;
    Ok(profile.into())
}

pub(crate) async fn profile_id_for_user<'a, E>(
    provider_user_id: &UserId,
    executor: E,
) -> Result<ProviderProfileId, StoreError>
where
    E: sqlx::Executor<'a, Database = sqlx::Postgres>,
{
    sqlx::query_scalar::<_, ProviderProfileId>(
        "SELECT id FROM provider_profiles WHERE user_id = $1",
    )
    .bind(provider_user_id)
    .fetch_one(executor)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::ProviderProfileNotFound,
        e => StoreError::Database(e),
    })
}

pub async fn create_service(
    details: &payloads::ProviderService,
    user_id: &UserId,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Service, StoreError> {
    require_role(user_id, Role::Provider, pool).await?;
    let profile_id = profile_id_for_user(user_id, pool).await?;
    if details.price_per_hour_cents <= 0 || details.min_duration_minutes <= 0
    {
        return Err(StoreError::InvalidServiceDetails);
    }
    let service = sqlx::query_as::<_, ProviderService>(
        "INSERT INTO provider_services (
            provider_profile_id, name, description, price_per_hour_cents,
            min_duration_minutes, is_active, created_at, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
         RETURNING *",
    )
    .bind(profile_id)
    .bind(&details.name)
    .bind(&details.description)
    .bind(details.price_per_hour_cents)
    .bind(details.min_duration_minutes)
    .bind(details.is_active)
    .bind(time_source.now().to_sqlx())
    .fetch_one(pool)
    .await?;
    Ok(service.into())
}

pub async fn list_services(
    provider_user_id: &UserId,
    pool: &PgPool,
) -> Result<Vec<responses::Service>, StoreError> {
    let profile_id = profile_id_for_user(provider_user_id, pool).await?;
    let services = sqlx::query_as::<_, ProviderService>(
        "SELECT * FROM provider_services
         WHERE provider_profile_id = $1
         ORDER BY created_at, id",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?;
    Ok(services.into_iter().map(Into::into).collect())
}

/// Replace the weekly pattern wholesale. At most one window per weekday,
/// each with start < end.
pub async fn set_availability(
    details: &requests::SetAvailability,
    user_id: &UserId,
    pool: &PgPool,
) -> Result<(), StoreError> {
    require_role(user_id, Role::Provider, pool).await?;
    let mut seen_days = [false; 7];
    for window in &details.windows {
        if !(0..7).contains(&window.day_of_week) {
            return Err(StoreError::InvalidWeekday {
                day_of_week: window.day_of_week,
            });
        }
        if window.start_time >= window.end_time {
            return Err(StoreError::InvalidTimeRange);
        }
        let day = window.day_of_week as usize;
        if seen_days[day] {
            return Err(StoreError::DuplicateWeekday {
                day_of_week: window.day_of_week,
            });
        }
        seen_days[day] = true;
    }

    let mut tx = pool.begin().await?;
    let profile_id = profile_id_for_user(user_id, &mut *tx).await?;
    sqlx::query(
        "DELETE FROM availability_windows WHERE provider_profile_id = $1",
    )
    .bind(profile_id)
    .execute(&mut *tx)
    .await?;
    for window in &details.windows {
        sqlx::query(
            "INSERT INTO availability_windows (
                provider_profile_id, day_of_week, start_time, end_time,
                is_available
             )
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(profile_id)
        .bind(window.day_of_week)
        .bind(window.start_time.to_sqlx())
        .bind(window.end_time.to_sqlx())
        .bind(window.is_available)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn get_availability(
    provider_user_id: &UserId,
    pool: &PgPool,
) -> Result<Vec<AvailabilityWindow>, StoreError> {
    let profile_id = profile_id_for_user(provider_user_id, pool).await?;
    let windows = sqlx::query_as::<_, AvailabilityWindow>(
        "SELECT day_of_week, start_time, end_time, is_available
         FROM availability_windows
         WHERE provider_profile_id = $1
         ORDER BY day_of_week",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?;
    Ok(windows)
}

/// Idempotent; blocking an already-blocked date is not an error.
pub async fn add_blocked_date(
    date: Date,
    user_id: &UserId,
    pool: &PgPool,
) -> Result<(), StoreError> {
    require_role(user_id, Role::Provider, pool).await?;
    let profile_id = profile_id_for_user(user_id, pool).await?;
    sqlx::query(
        "INSERT INTO blocked_dates (provider_profile_id, blocked_date)
         VALUES ($1, $2)
         ON CONFLICT (provider_profile_id, blocked_date) DO NOTHING",
    )
    .bind(profile_id)
    .bind(date.to_sqlx())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn remove_blocked_date(
    date: Date,
    user_id: &UserId,
    pool: &PgPool,
) -> Result<(), StoreError> {
    require_role(user_id, Role::Provider, pool).await?;
    let profile_id = profile_id_for_user(user_id, pool).await?;
    sqlx::query(
        "DELETE FROM blocked_dates
         WHERE provider_profile_id = $1 AND blocked_date = $2",
    )
    .bind(profile_id)
    .bind(date.to_sqlx())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_blocked_dates(
    provider_user_id: &UserId,
    pool: &PgPool,
) -> Result<Vec<Date>, StoreError> {
    let profile_id = profile_id_for_user(provider_user_id, pool).await?;
    let dates = sqlx::query_scalar::<_, jiff_sqlx::Date>(
        "SELECT blocked_date FROM blocked_dates
         WHERE provider_profile_id = $1
         ORDER BY blocked_date",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?;
    Ok(dates.into_iter().map(|d| d.to_jiff()).collect())
}
