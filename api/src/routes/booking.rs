//! Booking lifecycle routes. Creation and listing sit on the resource
//! path; transitions are a PATCH of the target status.

use actix_identity::Identity;
use actix_web::{HttpResponse, get, patch, post, web};
use sqlx::PgPool;

use crate::store;
use crate::time::TimeSource;

use super::{APIError, get_user_id};

#[tracing::instrument(skip(user, details, pool, time_source), ret)]
#[post("/bookings")]
pub async fn create_booking(
    user: Identity,
    details: web::Json<payloads::requests::CreateBooking>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let booking = store::booking::create_booking(
        &details,
        &user_id,
        &pool,
        &time_source,
    )
    .await?;
    Ok(HttpResponse::Created().json(booking))
}

#[tracing::instrument(skip(user, pool))]
#[get("/bookings")]
pub async fn list_bookings(
    user: Identity,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let bookings = store::booking::list_bookings(&user_id, &pool).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

#[tracing::instrument(skip(user, pool))]
#[get("/bookings/{booking_id}")]
pub async fn get_booking(
    user: Identity,
    path: web::Path<payloads::BookingId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let booking_id = path.into_inner();
    let booking =
        store::booking::get_booking_for(&booking_id, &user_id, &pool).await?;
    Ok(HttpResponse::Ok().json(booking))
}

#[tracing::instrument(skip(user, details, pool, time_source), ret)]
#[patch("/bookings/{booking_id}")]
pub async fn update_booking_status(
    user: Identity,
    path: web::Path<payloads::BookingId>,
    details: web::Json<payloads::requests::UpdateBookingStatus>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let booking_id = path.into_inner();
    let booking = store::booking::transition_status(
        &booking_id,
        details.status,
        &user_id,
        &pool,
        &time_source,
    )
    .await?;
    Ok(HttpResponse::Ok().json(booking))
}

#[tracing::instrument(skip(user, details, pool, time_source), ret)]
#[post("/record_payment_status")]
pub async fn record_payment_status(
    user: Identity,
    details: web::Json<payloads::requests::RecordPaymentStatus>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let booking = store::booking::record_payment_status(
        &details,
        &user_id,
        &pool,
        &time_source,
    )
    .await?;
    Ok(HttpResponse::Ok().json(booking))
}
