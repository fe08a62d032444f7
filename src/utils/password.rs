use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use pbkdf2::{
    Params, Pbkdf2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::Rng;

use crate::error::AppError;

const SALT_LENGTH: usize = 16;
const KEY_LENGTH: usize = 32;
const RESET_TOKEN_BYTES: usize = 48; // 64 caractères une fois encodé
const DUMMY_SALT: &str = "ZmFudGFzeS1jcmlja2V0IQ";
const DUMMY_HASH: &str = "bw6W2SuP8vxSjAL2xPh1d1g97WyUzQ2tN3T9Mcr7KGw";

/// Hash un mot de passe avec PBKDF2-HMAC-SHA256 et un salt aléatoire de 16 bytes.
/// Le résultat est une chaîne PHC qui embarque l'algo, les itérations et le salt:
/// $pbkdf2-sha256$i=260000,l=32$<salt>$<hash>
pub fn hash_password(password: &str, rounds: u32) -> Result<String, AppError> {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill(&mut salt[..]);

    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| AppError::internal(format!("Failed to encode salt: {}", e)))?;

    let params = Params {
        rounds,
        output_length: KEY_LENGTH,
    };

    let hash = Pbkdf2
        .hash_password_customized(password.as_bytes(), None, None, params, &salt)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Vérifie un mot de passe contre un hash PHC.
/// Les itérations sont relues depuis le hash: changer PASSWORD_HASH_ROUNDS
/// n'invalide pas les comptes existants.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;

    Ok(Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Hash PHC fixe (sel et empreinte sans compte associé), aux itérations
/// configurées. Vérifier un mot de passe contre lui coûte autant que contre
/// un vrai compte: un email inconnu ne répond pas plus vite au login.
pub fn dummy_hash(rounds: u32) -> String {
    format!("$pbkdf2-sha256$i={rounds},l={KEY_LENGTH}${DUMMY_SALT}${DUMMY_HASH}")
}

/// Token de reset: 48 bytes aléatoires en base64 URL-safe sans padding
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}
