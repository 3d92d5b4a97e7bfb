use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};

use crate::{BookingId, PaymentStatus, ProviderService, Role, ServiceId, UserId};

pub const NAME_MAX_LEN: usize = 255;
pub const EMAIL_MAX_LEN: usize = 255;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const COMMENT_MAX_LEN: usize = 2000;
pub const INSTRUCTIONS_MAX_LEN: usize = 2000;
pub const MESSAGE_MAX_LEN: usize = 5000;
pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to customer when omitted. Immutable after creation.
    pub role: Option<Role>,
}

#[derive(Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateService {
    pub service: ProviderService,
}

/// Replaces the provider's entire weekly pattern. At most one window per
/// weekday; an empty list clears the pattern.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetAvailability {
    pub windows: Vec<crate::AvailabilityWindow>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AddBlockedDate {
    pub date: Date,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RemoveBlockedDate {
    pub date: Date,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBooking {
    pub provider_id: UserId,
    pub service_id: ServiceId,
    pub booking_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub special_instructions: Option<String>,
}

/// Status transition request; the target status is validated against the
/// lifecycle state machine and the acting user's relation to the booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateBookingStatus {
    pub status: crate::BookingStatus,
}

/// Records a payment outcome reported by the external processor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecordPaymentStatus {
    pub booking_id: BookingId,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReview {
    pub booking_id: BookingId,
    pub rating: i32,
    pub comment: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessage {
    pub booking_id: BookingId,
    pub content: String,
}
