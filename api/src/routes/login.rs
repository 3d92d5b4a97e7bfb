use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, get, post, web};
use sqlx::PgPool;

use crate::password::{
    AuthError, Credentials, NewUserDetails, create_user, validate_credentials,
};
use crate::store;
use crate::time::TimeSource;

use super::{APIError, get_user_id};

#[tracing::instrument(
    skip(credentials, pool),
    fields(email=tracing::field::Empty, user_id=tracing::field::Empty),
    ret,
)]
#[post("/login")]
pub async fn login(
    request: HttpRequest,
    credentials: web::Json<Credentials>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    tracing::Span::current()
        .record("email", tracing::field::display(&credentials.email));
    match validate_credentials(credentials.0, &pool).await {
        Ok(user_id) => {
            tracing::Span::current()
                .record("user_id", tracing::field::display(&user_id));
            Identity::login(&request.extensions(), user_id.to_string())
                .map_err(|e| APIError::UnexpectedError(e.into()))?;
            Ok(HttpResponse::Ok().finish())
        }
        Err(e) => {
            let e = match e {
                AuthError::InvalidCredentials(_) => {
                    APIError::AuthError(e.into())
                }
                AuthError::UnexpectedError(_) => {
                    APIError::UnexpectedError(e.into())
                }
            };
            Err(e)
        }
    }
}

#[tracing::instrument(skip(user))]
#[post("/login_check")]
pub async fn login_check(user: Identity) -> Result<HttpResponse, APIError> {
    get_user_id(&user)?;
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(user))]
#[post("/logout")]
pub async fn logout(user: Identity) -> Result<HttpResponse, APIError> {
    let _ = get_user_id(&user); // to instrument the user_id, if exists
    user.logout();
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(new_user_details, pool, time_source))]
#[post("/create_account")]
pub async fn create_account(
    new_user_details: web::Json<NewUserDetails>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    if new_user_details.name.is_empty()
        || new_user_details.name.len() > payloads::requests::NAME_MAX_LEN
    {
        return Err(APIError::BadRequest(anyhow::anyhow!(
            "Name must be between 1 and {} characters",
            payloads::requests::NAME_MAX_LEN
        )));
    }
    if new_user_details.email.is_empty()
        || new_user_details.email.len() > payloads::requests::EMAIL_MAX_LEN
    {
        return Err(APIError::BadRequest(anyhow::anyhow!(
            "Email must be between 1 and {} characters",
            payloads::requests::EMAIL_MAX_LEN
        )));
    }
    // admin accounts are provisioned out of band
    if new_user_details.role == Some(payloads::Role::Admin) {
        return Err(APIError::BadRequest(anyhow::anyhow!(
            "Role must be customer or provider"
        )));
    }
    let user = create_user(new_user_details.0, &pool, &time_source).await?;
    let profile: payloads::responses::UserProfile = user.into();
    Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(user, pool))]
#[get("/users")]
pub async fn list_users(
    user: Identity,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let users = store::list_users(&user_id, &pool).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[tracing::instrument(skip(user, pool))]
#[get("/user_profile")]
pub async fn user_profile(
    user: Identity,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let user_data = store::read_user(&pool, &user_id).await?;
    let profile: payloads::responses::UserProfile = user_data.into();
    Ok(HttpResponse::Ok().json(profile))
}
