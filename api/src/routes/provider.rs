//! Provider-side setup routes: profile, services, weekly availability and
//! blocked dates.

use actix_identity::Identity;
use actix_web::{HttpResponse, get, post, web};
use sqlx::PgPool;

use crate::store;
use crate::time::TimeSource;

use super::{APIError, get_user_id};

#[tracing::instrument(skip(user, details, pool, time_source), ret)]
#[post("/create_provider_profile")]
pub async fn create_provider_profile(
    user: Identity,
    details: web::Json<payloads::ProviderProfile>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let profile =
        store::provider::create_profile(&details, &user_id, &pool, &time_source)
            .await?;
    Ok(HttpResponse::Created().json(profile))
}

#[tracing::instrument(skip(user, details, pool, time_source), ret)]
#[post("/update_provider_profile")]
pub async fn update_provider_profile(
    user: Identity,
    details: web::Json<payloads::ProviderProfile>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let profile =
        store::provider::update_profile(&details, &user_id, &pool, &time_source)
            .await?;
    Ok(HttpResponse::Ok().json(profile))
}

// public read; no session required
#[tracing::instrument(skip(pool))]
#[get("/provider_profile/{provider_id}")]
pub async fn get_provider_profile(
    path: web::Path<payloads::UserId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let provider_id = path.into_inner();
    let profile = store::provider::get_profile(&provider_id, &pool).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(user, details, pool, time_source), ret)]
#[post("/create_service")]
pub async fn create_service(
    user: Identity,
    details: web::Json<payloads::requests::CreateService>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let service = store::provider::create_service(
        &details.service,
        &user_id,
        &pool,
        &time_source,
    )
    .await?;
    Ok(HttpResponse::Created().json(service))
}

#[tracing::instrument(skip(pool))]
#[get("/services/{provider_id}")]
pub async fn list_services(
    path: web::Path<payloads::UserId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let provider_id = path.into_inner();
    let services = store::provider::list_services(&provider_id, &pool).await?;
    Ok(HttpResponse::Ok().json(services))
}

#[tracing::instrument(skip(user, details, pool), ret)]
#[post("/set_availability")]
pub async fn set_availability(
    user: Identity,
    details: web::Json<payloads::requests::SetAvailability>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    store::provider::set_availability(&details, &user_id, &pool).await?;
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(pool))]
#[get("/availability/{provider_id}")]
pub async fn get_availability(
    path: web::Path<payloads::UserId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let provider_id = path.into_inner();
    let windows =
        store::provider::get_availability(&provider_id, &pool).await?;
    Ok(HttpResponse::Ok().json(windows))
}

#[tracing::instrument(skip(user, details, pool), ret)]
#[post("/add_blocked_date")]
pub async fn add_blocked_date(
    user: Identity,
    details: web::Json<payloads::requests::AddBlockedDate>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    store::provider::add_blocked_date(details.date, &user_id, &pool).await?;
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(user, details, pool), ret)]
#[post("/remove_blocked_date")]
pub async fn remove_blocked_date(
    user: Identity,
    details: web::Json<payloads::requests::RemoveBlockedDate>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    store::provider::remove_blocked_date(details.date, &user_id, &pool)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(pool))]
#[get("/blocked_dates/{provider_id}")]
pub async fn list_blocked_dates(
    path: web::Path<payloads::UserId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let provider_id = path.into_inner();
    let dates =
        store::provider::list_blocked_dates(&provider_id, &pool).await?;
    Ok(HttpResponse::Ok().json(dates))
}
