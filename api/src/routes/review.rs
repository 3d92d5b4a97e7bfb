use actix_identity::Identity;
use actix_web::{HttpResponse, get, post, web};
use sqlx::PgPool;

use crate::store;
use crate::time::TimeSource;

use super::{APIError, get_user_id};

#[tracing::instrument(skip(user, details, pool, time_source), ret)]
#[post("/reviews")]
pub async fn create_review(
    user: Identity,
    details: web::Json<payloads::requests::CreateReview>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let review =
        store::review::create_review(&details, &user_id, &pool, &time_source)
            .await?;
    Ok(HttpResponse::Created().json(review))
}

// public; profile pages render these without a session
#[tracing::instrument(skip(pool))]
#[get("/reviews/provider/{provider_id}")]
pub async fn list_provider_reviews(
    path: web::Path<payloads::UserId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let provider_id = path.into_inner();
    let reviews =
        store::review::list_provider_reviews(&provider_id, &pool).await?;
    Ok(HttpResponse::Ok().json(reviews))
}
