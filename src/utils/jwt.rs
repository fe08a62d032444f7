use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // user_id
    pub open_id: String, // identifiant public opaque
    pub iat: i64,
    pub exp: i64,        // expiration timestamp
}

/// Génère le token de session d'un utilisateur
pub fn generate_token(
    user_id: i32,
    open_id: &str,
    secret: &str,
    ttl_days: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::days(ttl_days))
        .ok_or_else(|| AppError::internal("Failed to calculate expiration"))?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        open_id: open_id.to_string(),
        iat: now.timestamp(),
        exp: expiration,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
}

/// Vérifie et décode un token de session
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid session: {}", e)))
}
