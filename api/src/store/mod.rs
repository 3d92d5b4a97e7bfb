//! Database store module for the marketplace API
//!
//! ## Design Decisions
//!
//! ### Transaction Boundaries
//! - **Booking creation**: the availability check, the overlap check and
//!   the insert share one transaction, and a partial exclusion constraint
//!   on `(provider_id, booking_date, timerange)` for live bookings
//!   backstops concurrent transactions. A constraint trip surfaces as the
//!   same `BookingConflict` error as the explicit check.
//! - **Review creation**: the provider profile row is locked for the
//!   duration of insert-plus-aggregate-recompute, so two concurrent
//!   reviews cannot both read a stale count.
//!
//! ### Time Source Dependency
//! - Functions that need current time accept a `TimeSource` parameter
//!   instead of creating their own, so time can be mocked during tests.
//!   All audit columns (`created_at`, `updated_at`) are written by the
//!   application through the same `TimeSource`.
//!
//! ### Type Safety
//! - All ID types implement `sqlx::Type` via `#[sqlx(transparent)]`, so
//!   they bind directly in queries without accessing the inner UUID.
//! - Role and status enums map to Postgres enums; the lifecycle state
//!   machine lives on `payloads::BookingStatus` itself.

use jiff::Timestamp;
use jiff_sqlx::{Timestamp as SqlxTs, ToSqlx};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use payloads::{
    BookingId, BookingStatus, PaymentStatus, ProviderProfileId, Role,
    ServiceId, UserId, responses,
};

use crate::time::TimeSource;

pub mod booking;
pub mod message;
pub mod notification;
pub mod provider;
pub mod review;

/// A complete user row that stays in the backend.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    #[sqlx(try_from = "SqlxTs")]
    pub created_at: Timestamp,
    #[sqlx(try_from = "SqlxTs")]
    pub updated_at: Timestamp,
}

impl From<User> for responses::UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            profile_image: user.profile_image,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProviderProfile {
    pub id: ProviderProfileId,
    pub user_id: UserId,
    pub bio: Option<String>,
    pub years_experience: i16,
    pub has_insurance: bool,
    pub has_vehicle: bool,
    pub has_equipment: bool,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub service_radius_km: i32,
    pub is_verified: bool,
    pub is_active: bool,
    pub profile_complete: bool,
    pub average_rating: Decimal,
    pub total_reviews: i32,
    pub completed_bookings: i32,
    #[sqlx(try_from = "SqlxTs")]
    pub created_at: Timestamp,
    #[sqlx(try_from = "SqlxTs")]
    pub updated_at: Timestamp,
}

impl From<ProviderProfile> for responses::ProviderProfile {
    fn from(profile: ProviderProfile) -> Self {
        Self {
            profile_id: profile.id,
            user_id: profile.user_id,
            profile_details: payloads::ProviderProfile {
                bio: profile.bio,
                years_experience: profile.years_experience,
                has_insurance: profile.has_insurance,
                has_vehicle: profile.has_vehicle,
                has_equipment: profile.has_equipment,
                address: profile.address,
                city: profile.city,
                state: profile.state,
                zip_code: profile.zip_code,
                service_radius_km: profile.service_radius_km,
            },
            is_verified: profile.is_verified,
            is_active: profile.is_active,
            profile_complete: profile.profile_complete,
            average_rating: profile.average_rating,
            total_reviews: profile.total_reviews,
            completed_bookings: profile.completed_bookings,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProviderService {
    pub id: ServiceId,
    pub provider_profile_id: ProviderProfileId,
    pub name: String,
    pub description: Option<String>,
    pub price_per_hour_cents: i64,
    pub min_duration_minutes: i32,
    pub is_active: bool,
    #[sqlx(try_from = "SqlxTs")]
    pub created_at: Timestamp,
    #[sqlx(try_from = "SqlxTs")]
    pub updated_at: Timestamp,
}

impl From<ProviderService> for responses::Service {
    fn from(service: ProviderService) -> Self {
        Self {
            service_id: service.id,
            provider_profile_id: service.provider_profile_id,
            service_details: payloads::ProviderService {
                name: service.name,
                description: service.description,
                price_per_hour_cents: service.price_per_hour_cents,
                min_duration_minutes: service.min_duration_minutes,
                is_active: service.is_active,
            },
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    // not found -> 404
    #[error("User not found")]
    UserNotFound,
    #[error("Provider profile not found")]
    ProviderProfileNotFound,
    #[error("Service not found")]
    ServiceNotFound,
    #[error("Booking not found")]
    BookingNotFound,
    #[error("Notification not found")]
    NotificationNotFound,

    // authorization -> 403
    #[error("Requires the {required} role")]
    RequiresRole { required: Role },
    #[error("Not a party to this booking")]
    NotBookingParty,
    #[error("Only the booking's provider may perform this action")]
    NotBookingProvider,
    #[error("Only the booking's customer may perform this action")]
    NotBookingCustomer,
    #[error("Notification belongs to another user")]
    NotNotificationOwner,

    // validation -> 400
    #[error("End time must be after start time")]
    InvalidTimeRange,
    #[error("Booking is shorter than the service minimum of {minimum_minutes} minutes")]
    BelowMinimumDuration { minimum_minutes: i32 },
    #[error("Rating must be between 1 and 5, got {rating}")]
    RatingOutOfRange { rating: i32 },
    #[error("Invalid weekday index {day_of_week}")]
    InvalidWeekday { day_of_week: i16 },
    #[error("More than one availability window for weekday {day_of_week}")]
    DuplicateWeekday { day_of_week: i16 },
    #[error("Field too long")]
    FieldTooLong,
    #[error("Message content must not be empty")]
    EmptyContent,
    #[error("Password must be at least {minimum} characters")]
    PasswordTooShort { minimum: usize },
    #[error("Price and minimum duration must be positive")]
    InvalidServiceDetails,
    #[error("Service does not belong to this provider")]
    ServiceProviderMismatch,
    #[error("Service is not active")]
    ServiceInactive,
    #[error("Provider is not accepting bookings")]
    ProviderInactive,
    #[error("Provider is unavailable on this date")]
    DateBlocked,
    #[error("Requested time is outside the provider's availability")]
    OutsideAvailability,

    // invalid state -> 400
    #[error("Booking status cannot change from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("Payment status cannot change from {from} to {to}")]
    InvalidPaymentTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
    #[error("Can only review completed bookings")]
    BookingNotCompleted,

    // conflict -> 409
    #[error("Provider already has a booking in this time window")]
    BookingConflict,
    #[error("Booking already reviewed")]
    DuplicateReview,
    #[error("Email already in use")]
    EmailInUse,
    #[error("Provider profile already exists")]
    ProfileAlreadyExists,

    // everything else -> 500
    #[error("Database error")]
    Database(#[source] sqlx::Error),
    #[error("Unexpected error")]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}

/// Fetch a user and require an exact role. Admin overrides are handled at
/// the call sites that grant them, not here.
pub async fn require_role(
    user_id: &UserId,
    required: Role,
    pool: &PgPool,
) -> Result<User, StoreError> {
    let user = read_user(pool, user_id).await?;
    if user.role != required {
        return Err(StoreError::RequiresRole { required });
    }
    Ok(user)
}

pub async fn read_user(
    pool: &PgPool,
    user_id: &UserId,
) -> Result<User, StoreError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => StoreError::UserNotFound,
            e => StoreError::Database(e),
        })
}

/// Admin oversight: every account on the platform.
pub async fn list_users(
    acting_user_id: &UserId,
    pool: &PgPool,
) -> Result<Vec<responses::UserProfile>, StoreError> {
    require_role(acting_user_id, Role::Admin, pool).await?;
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(users.into_iter().map(Into::into).collect())
}

pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    time_source: &TimeSource,
) -> Result<User, StoreError> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5) RETURNING *",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(time_source.now().to_sqlx())
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::EmailInUse
        }
        _ => StoreError::Database(e),
    })
}

pub async fn get_booking(
    booking_id: &BookingId,
    pool: &PgPool,
) -> Result<responses::Booking, StoreError> {
    sqlx::query_as::<_, responses::Booking>(
        "SELECT * FROM bookings WHERE id = $1",
    )
    .bind(booking_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::BookingNotFound,
        e => StoreError::Database(e),
    })
}
