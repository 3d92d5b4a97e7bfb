use actix_identity::Identity;
use actix_web::{HttpResponse, get, post, web};
use sqlx::PgPool;

use crate::store;

use super::{APIError, get_user_id};

#[tracing::instrument(skip(user, pool))]
#[get("/notifications")]
pub async fn list_notifications(
    user: Identity,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let notifications =
        store::notification::list_notifications(&user_id, &pool).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

#[tracing::instrument(skip(user, pool), ret)]
#[post("/mark_notification_read")]
pub async fn mark_notification_read(
    user: Identity,
    details: web::Json<payloads::NotificationId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    store::notification::mark_read(&details, &user_id, &pool).await?;
    Ok(HttpResponse::Ok().finish())
}
