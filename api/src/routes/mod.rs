pub mod booking;
pub mod login;
pub mod message;
pub mod notification;
pub mod provider;
pub mod review;

use actix_identity::Identity;
use actix_web::{
    HttpResponse, Responder, ResponseError, body::BoxBody,
    dev::HttpServiceFactory, get, web,
};
use uuid::Uuid;

use crate::store::StoreError;

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(health_check)
        .service(login::login)
        .service(login::login_check)
        .service(login::logout)
        .service(login::create_account)
        .service(login::user_profile)
        .service(login::list_users)
        .service(provider::create_provider_profile)
        .service(provider::update_provider_profile)
        .service(provider::get_provider_profile)
        .service(provider::create_service)
        .service(provider::list_services)
        .service(provider::set_availability)
        .service(provider::get_availability)
        .service(provider::add_blocked_date)
        .service(provider::remove_blocked_date)
        .service(provider::list_blocked_dates)
        .service(booking::create_booking)
        .service(booking::list_bookings)
        .service(booking::get_booking)
        .service(booking::update_booking_status)
        .service(booking::record_payment_status)
        .service(review::create_review)
        .service(review::list_provider_reviews)
        .service(notification::list_notifications)
        .service(notification::mark_notification_read)
        .service(message::send_message)
        .service(message::list_messages)
}

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("healthy")
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Authentication failed")]
    AuthError(#[source] anyhow::Error),
    #[error("Forbidden")]
    Forbidden(#[source] anyhow::Error),
    #[error("Bad request")]
    BadRequest(#[source] anyhow::Error),
    #[error("Not found")]
    NotFound(#[source] anyhow::Error),
    #[error("Conflict")]
    Conflict(#[source] anyhow::Error),
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::AuthError(e) => {
                HttpResponse::Unauthorized().body(format!("{self}: {e}"))
            }
            Self::Forbidden(e) => {
                HttpResponse::Forbidden().body(format!("{self}: {e}"))
            }
            Self::BadRequest(e) => {
                HttpResponse::BadRequest().body(format!("{self}: {e}"))
            }
            Self::NotFound(e) => {
                HttpResponse::NotFound().body(format!("{self}: {e}"))
            }
            Self::Conflict(e) => {
                HttpResponse::Conflict().body(format!("{self}: {e}"))
            }
            Self::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(self.to_string())
            }
        }
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(_) | StoreError::UnexpectedError(_) => {
                APIError::UnexpectedError(e.into())
            }
            StoreError::UserNotFound
            | StoreError::ProviderProfileNotFound
            | StoreError::ServiceNotFound
            | StoreError::BookingNotFound
            | StoreError::NotificationNotFound => APIError::NotFound(e.into()),
            StoreError::RequiresRole { .. }
            | StoreError::NotBookingParty
            | StoreError::NotBookingProvider
            | StoreError::NotBookingCustomer
            | StoreError::NotNotificationOwner => APIError::Forbidden(e.into()),
            StoreError::BookingConflict
            | StoreError::DuplicateReview
            | StoreError::EmailInUse
            | StoreError::ProfileAlreadyExists => APIError::Conflict(e.into()),
            _ => APIError::BadRequest(e.into()),
        }
    }
}

fn get_user_id(user: &Identity) -> Result<payloads::UserId, APIError> {
    let id_str = user.id().map_err(|e| {
        APIError::AuthError(
            anyhow::Error::from(e).context("Invalid login session"),
        )
    })?;
    // special case: since this is used in so many routes, the user_id is
    // recorded here, but attaches to the span for the api route itself
    tracing::Span::current()
        .record("user_id", tracing::field::display(&id_str));
    Ok(payloads::UserId(
        Uuid::parse_str(&id_str).map_err(anyhow::Error::from)?,
    ))
}
