use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::utils::{cookies::SESSION_COOKIE, jwt};

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub open_id: String,
}

/// Variante pour les routes où la session est facultative (auth.me)
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|user| {
            user.ok_or_else(|| AppError::Unauthorized("Please login to continue.".to_string()))
        }))
    }
}

impl FromRequest for OptionalAuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Un token invalide ou expiré compte comme "pas de session"
        ready(Ok(OptionalAuthUser(authenticate(req).ok().flatten())))
    }
}

/// Ok(None) si aucun token n'est présent, Err si le token est invalide
fn authenticate(req: &HttpRequest) -> Result<Option<AuthUser>, AppError> {
    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| AppError::internal("Application config is not registered"))?;

    let token = match session_token(req)? {
        Some(token) => token,
        None => return Ok(None),
    };

    let claims = jwt::verify_token(&token, &config.jwt_secret)?;

    Ok(Some(AuthUser {
        user_id: claims.sub,
        open_id: claims.open_id,
    }))
}

/// 1. Cookie de session  2. Header "Authorization: Bearer <token>"
fn session_token(req: &HttpRequest) -> Result<Option<String>, AppError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Ok(Some(cookie.value().to_string()));
        }
    }

    let auth_header = match req.headers().get("Authorization") {
        Some(header) => header,
        None => return Ok(None),
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) => Ok(Some(token.trim().to_string())),
        None => Err(AppError::Unauthorized(
            "Invalid Authorization format (expected: Bearer <token>)".to_string(),
        )),
    }
}
