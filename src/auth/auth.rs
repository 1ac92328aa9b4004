use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::AppError;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

/// Caller identity taken from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Set by the auth middleware on protected scopes.
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(AppError::Unauthorized("Missing token".into()))),
        };

        let Some(config) = req.app_data::<Data<Config>>() else {
            return ready(Err(AppError::Unauthorized("Config missing".into())));
        };

        ready(
            verify_token(token, &config.jwt_secret)
                .map(|claims| AuthUser {
                    user_id: claims.user_id,
                    username: claims.sub,
                })
                .map_err(|_| AppError::Unauthorized("Invalid token".into())),
        )
    }
}
