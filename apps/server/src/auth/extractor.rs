//! Actix-web extractor for admin authentication.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use secrecy::{ExposeSecret, SecretString};
use std::future::{Ready, ready};

use super::AdminKey;
use crate::config::ADMIN_KEY_HEADER;
use crate::error::ErrorResponse;

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: self.message.clone(),
            code: "UNAUTHORIZED".to_string(),
        })
    }
}

/// Extractor that requires a valid `X-Admin-Key` header.
///
/// ```ignore
/// async fn delete_handler(_admin: AdminAuth) -> impl Responder { ... }
/// ```
pub struct AdminAuth;

impl FromRequest for AdminAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(stored) = req.app_data::<web::Data<AdminKey>>() else {
            return ready(Err(AuthError {
                message: "Internal configuration error".to_string(),
            }));
        };

        // Wrapped immediately so the provided key is zeroized on drop.
        let provided: Option<SecretString> = req
            .headers()
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| SecretString::from(s.to_string()));

        let result = match provided {
            Some(ref key) if stored.verify(key.expose_secret()) => Ok(AdminAuth),
            Some(_) => Err(AuthError {
                message: "Invalid admin key".to_string(),
            }),
            None => Err(AuthError {
                message: format!("Missing admin key. Provide {} header.", ADMIN_KEY_HEADER),
            }),
        };

        ready(result)
    }
}
