use actix_identity::Identity;
use actix_web::{HttpResponse, get, post, web};
use sqlx::PgPool;

use crate::store;
use crate::time::TimeSource;

use super::{APIError, get_user_id};

#[tracing::instrument(skip(user, details, pool, time_source), ret)]
#[post("/send_message")]
pub async fn send_message(
    user: Identity,
    details: web::Json<payloads::requests::SendMessage>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let message =
        store::message::send_message(&details, &user_id, &pool, &time_source)
            .await?;
    Ok(HttpResponse::Created().json(message))
}

#[tracing::instrument(skip(user, pool))]
#[get("/messages/{booking_id}")]
pub async fn list_messages(
    user: Identity,
    path: web::Path<payloads::BookingId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let booking_id = path.into_inner();
    let messages =
        store::message::list_messages(&booking_id, &user_id, &pool).await?;
    Ok(HttpResponse::Ok().json(messages))
}
