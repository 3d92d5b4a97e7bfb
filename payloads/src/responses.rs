use jiff::Timestamp;
use jiff::civil::{Date, Time};
#[cfg(feature = "use-sqlx")]
use jiff_sqlx::Timestamp as SqlxTs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    BookingId, BookingStatus, MessageId, NotificationId, NotificationKind,
    PaymentStatus, ProviderProfileId, ReviewId, Role, ServiceId, UserId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

/// A provider's public profile including the review aggregates maintained
/// by the review store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub profile_id: ProviderProfileId,
    pub user_id: UserId,
    pub profile_details: crate::ProviderProfile,
    pub is_verified: bool,
    pub is_active: bool,
    pub profile_complete: bool,
    pub average_rating: Decimal,
    pub total_reviews: i32,
    pub completed_bookings: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: ServiceId,
    pub provider_profile_id: ProviderProfileId,
    pub service_details: crate::ProviderService,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "use-sqlx", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: BookingId,
    pub customer_id: UserId,
    pub provider_id: UserId,
    pub service_id: ServiceId,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "jiff_sqlx::Date"))]
    pub booking_date: Date,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "jiff_sqlx::Time"))]
    pub start_time: Time,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "jiff_sqlx::Time"))]
    pub end_time: Time,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub special_instructions: Option<String>,
    pub status: BookingStatus,
    pub total_price_cents: i64,
    pub payment_status: PaymentStatus,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "SqlxTs"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "SqlxTs"))]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "use-sqlx", derive(sqlx::FromRow))]
pub struct Review {
    pub id: ReviewId,
    pub booking_id: BookingId,
    pub customer_id: UserId,
    pub rating: i32,
    pub comment: Option<String>,
    pub photos: Vec<String>,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "SqlxTs"))]
    pub created_at: Timestamp,
}

/// One entry in a provider's public review listing, denormalized for
/// display: who wrote it, for which service, on what date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "use-sqlx", derive(sqlx::FromRow))]
pub struct ProviderReview {
    pub id: ReviewId,
    pub rating: i32,
    pub comment: Option<String>,
    pub photos: Vec<String>,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "SqlxTs"))]
    pub created_at: Timestamp,
    pub customer_name: String,
    pub customer_image: Option<String>,
    pub service_name: String,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "jiff_sqlx::Date"))]
    pub booking_date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReviews {
    pub count: usize,
    pub reviews: Vec<ProviderReview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "use-sqlx", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub link: Option<String>,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "SqlxTs"))]
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "use-sqlx", derive(sqlx::FromRow))]
pub struct Message {
    pub id: MessageId,
    pub booking_id: BookingId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub is_read: bool,
    #[cfg_attr(feature = "use-sqlx", sqlx(try_from = "SqlxTs"))]
    pub created_at: Timestamp,
}
