// ============================================================================
// SERVICE : AUTHENTIFICATION ET COMPTE
// ============================================================================
//
// Description:
//   Inscription (âge + état), connexion, reset de mot de passe par token
//   à usage unique, changement de mot de passe et profil.
//
// Points d'attention:
//   - Email toujours comparé/stocké en trim + minuscules
//   - Login: même message pour email inconnu et mauvais mot de passe
//   - forgot_password répond pareil que le compte existe ou non
//   - Le token de reset est consommé par un UPDATE ... WHERE used = false
//
// ============================================================================

use chrono::{Duration, NaiveDateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, UpdateProfileRequest, UserProfile,
};
use crate::models::{password_reset_tokens, users};
use crate::services::eligibility;
use crate::utils::{jwt, password};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token.";
pub const RESET_REQUESTED: &str =
    "If an account exists with this email, a password reset link has been sent.";

/// Utilisateur connecté + token de session à poser en cookie
#[derive(Debug)]
pub struct Session {
    pub user: users::Model,
    pub token: String,
}

pub struct AuthService;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub async fn register(
        db: &DatabaseConnection,
        config: &AppConfig,
        request: &RegisterRequest,
    ) -> Result<Session, AppError> {
        // L'état passe avant tout le reste: refus même si le formulaire est invalide
        eligibility::ensure_state_allowed(&request.state)?;

        // Validation sur l'email normalisé, comme au login
        let request = RegisterRequest {
            email: normalize_email(&request.email),
            ..request.clone()
        };
        request.validate()?;

        let today = Utc::now().date_naive();
        let date_of_birth = eligibility::parse_date_of_birth(&request.date_of_birth)?;
        eligibility::ensure_adult(date_of_birth, today)?;

        let email = request.email.clone();
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(duplicate_email());
        }

        let password_hash = password::hash_password(&request.password, config.password_hash_rounds)?;
        let now = Utc::now().naive_utc();

        let user = users::ActiveModel {
            open_id: Set(Uuid::new_v4().to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            name: Set(request.name.trim().to_string()),
            phone: Set(clean_optional(request.phone.as_deref())),
            date_of_birth: Set(Some(date_of_birth)),
            state: Set(Some(request.state.trim().to_string())),
            is_verified: Set(false),
            is_blocked: Set(false),
            role: Set("user".to_string()),
            total_points: Set(0),
            matches_played: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            last_signed_in: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        // Deux inscriptions simultanées: l'index unique tranche
        .map_err(|e| AppError::from_unique_violation(e, duplicate_email))?;

        info!(user_id = user.id, "user registered");

        let token = jwt::generate_token(user.id, &user.open_id, &config.jwt_secret, config.session_ttl_days)?;
        Ok(Session { user, token })
    }

    pub async fn login(
        db: &DatabaseConnection,
        config: &AppConfig,
        request: &LoginRequest,
    ) -> Result<Session, AppError> {
        let email = normalize_email(&request.email);
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(db)
            .await?;

        let Some(user) = user else {
            // Même coût qu'un mauvais mot de passe
            password::verify_password(&request.password, &password::dummy_hash(config.password_hash_rounds))?;
            return Err(invalid_credentials());
        };

        if !password::verify_password(&request.password, &user.password_hash)? {
            return Err(invalid_credentials());
        }

        if user.is_blocked {
            warn!(user_id = user.id, "blocked user tried to log in");
            return Err(AppError::Forbidden(
                "Your account has been blocked. Please contact support.".to_string(),
            ));
        }

        if user.state.as_deref().is_some_and(eligibility::is_restricted_state) {
            return Err(AppError::Forbidden(
                "Login is not available in your state due to government regulations.".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let mut active: users::ActiveModel = user.into();
        active.last_signed_in = Set(now);
        active.updated_at = Set(now);
        let user = active.update(db).await?;

        let token = jwt::generate_token(user.id, &user.open_id, &config.jwt_secret, config.session_ttl_days)?;
        Ok(Session { user, token })
    }

    /// Crée un token de reset si le compte existe. Le résultat vu par
    /// l'appelant est le même dans les deux cas.
    pub async fn forgot_password(
        db: &DatabaseConnection,
        config: &AppConfig,
        request: &ForgotPasswordRequest,
    ) -> Result<(), AppError> {
        let email = normalize_email(&request.email);
        ForgotPasswordRequest { email: email.clone() }.validate()?;

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(db)
            .await?;

        let Some(user) = user else {
            return Ok(());
        };

        let now = Utc::now().naive_utc();
        let token = password::generate_reset_token();

        password_reset_tokens::ActiveModel {
            user_id: Set(user.id),
            token: Set(token.clone()),
            expires_at: Set(now + Duration::minutes(config.reset_token_ttl_minutes)),
            used: Set(false),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        // Pas d'envoi d'email: le token n'est disponible que dans les logs
        info!(user_id = user.id, %token, "password reset token issued");
        Ok(())
    }

    pub async fn reset_password(
        db: &DatabaseConnection,
        config: &AppConfig,
        request: &ResetPasswordRequest,
    ) -> Result<(), AppError> {
        request.validate()?;
        let password_hash = password::hash_password(&request.new_password, config.password_hash_rounds)?;
        Self::consume_reset_token(db, &request.token, &password_hash, Utc::now().naive_utc()).await
    }

    async fn consume_reset_token(
        db: &DatabaseConnection,
        token: &str,
        password_hash: &str,
        now: NaiveDateTime,
    ) -> Result<(), AppError> {
        let txn = db.begin().await?;

        let reset = password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::Token.eq(token))
            .one(&txn)
            .await?
            .filter(|t| t.is_usable_at(now))
            .ok_or_else(|| AppError::bad_request(INVALID_RESET_TOKEN))?;

        let consumed = password_reset_tokens::Entity::update_many()
            .col_expr(password_reset_tokens::Column::Used, Expr::value(true))
            .filter(password_reset_tokens::Column::Id.eq(reset.id))
            .filter(password_reset_tokens::Column::Used.eq(false))
            .exec(&txn)
            .await?;
        if consumed.rows_affected == 0 {
            return Err(AppError::bad_request(INVALID_RESET_TOKEN));
        }

        let user = users::Entity::find_by_id(reset.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(user_id = reset.user_id, "password reset");
        Ok(())
    }

    pub async fn change_password(
        db: &DatabaseConnection,
        config: &AppConfig,
        user_id: i32,
        request: &ChangePasswordRequest,
    ) -> Result<(), AppError> {
        request.validate()?;
        let user = find_user(db, user_id).await?;

        if !password::verify_password(&request.current_password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Current password is incorrect.".to_string()));
        }

        let password_hash = password::hash_password(&request.new_password, config.password_hash_rounds)?;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await?;

        Ok(())
    }

    pub async fn profile(db: &DatabaseConnection, user_id: i32) -> Result<UserProfile, AppError> {
        let user = find_user(db, user_id).await?;
        Ok(UserProfile::from(&user))
    }

    /// auth.me: None si la session pointe vers un compte disparu
    pub async fn me(db: &DatabaseConnection, user_id: i32) -> Result<Option<UserProfile>, AppError> {
        let user = users::Entity::find_by_id(user_id).one(db).await?;
        Ok(user.as_ref().map(UserProfile::from))
    }

    pub async fn update_profile(
        db: &DatabaseConnection,
        user_id: i32,
        request: &UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        request.validate()?;
        let user = find_user(db, user_id).await?;

        let mut active: users::ActiveModel = user.into();
        if let Some(name) = &request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(phone) = &request.phone {
            active.phone = Set(clean_optional(Some(phone)));
        }
        active.updated_at = Set(Utc::now().naive_utc());

        let user = active.update(db).await?;
        Ok(UserProfile::from(&user))
    }
}

async fn find_user(db: &DatabaseConnection, user_id: i32) -> Result<users::Model, AppError> {
    users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
}

fn duplicate_email() -> AppError {
    AppError::Conflict("User with this email already exists.".to_string())
}

/// "" ou espaces => None
fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use chrono::{Datelike, NaiveDate};

    /// Date de naissance qui donne exactement 18 ans aujourd'hui
    fn eighteenth_birthday_today() -> NaiveDate {
        let today = Utc::now().date_naive();
        today
            .with_year(today.year() - 18)
            // 29 février: né le 28 février d'une année non bissextile
            .or_else(|| today.pred_opt().and_then(|d| d.with_year(d.year() - 18)))
            .unwrap()
    }

    fn register_request(email: &str, state: &str, dob: NaiveDate) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "correct horse".to_string(),
            name: "Rohit Sharma".to_string(),
            phone: Some("  ".to_string()),
            date_of_birth: dob.format("%Y-%m-%d").to_string(),
            state: state.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn registered(db: &DatabaseConnection, config: &AppConfig) -> Session {
        let request = register_request("player@example.com", "Maharashtra", eighteenth_birthday_today());
        AuthService::register(db, config, &request).await.unwrap()
    }

    #[actix_web::test]
    async fn test_register_adult_today_then_duplicate() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();

        let session = registered(&db, &config).await;
        assert_eq!(session.user.email, "player@example.com");
        assert_eq!(session.user.phone, None);
        assert!(session.user.password_hash.starts_with("$pbkdf2-sha256$"));

        let claims = jwt::verify_token(&session.token, &config.jwt_secret).unwrap();
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(claims.open_id, session.user.open_id);

        // Même email, casse et espaces différents
        let again = register_request("  Player@Example.COM ", "Maharashtra", eighteenth_birthday_today());
        assert!(matches!(
            AuthService::register(&db, &config, &again).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[actix_web::test]
    async fn test_padded_email_is_normalized_before_validation() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();

        let request = register_request("  Kohli@Example.COM ", "Delhi", eighteenth_birthday_today());
        let session = AuthService::register(&db, &config, &request).await.unwrap();
        assert_eq!(session.user.email, "kohli@example.com");

        let login = AuthService::login(&db, &config, &login_request(" KOHLI@example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);

        let forgot = ForgotPasswordRequest { email: "\tkohli@EXAMPLE.com  ".to_string() };
        AuthService::forgot_password(&db, &config, &forgot).await.unwrap();
        assert_eq!(password_reset_tokens::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_register_restricted_state_wins_over_invalid_input() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();

        let mut request = register_request("not-an-email", "telangana", eighteenth_birthday_today());
        request.password = "short".to_string();

        assert!(matches!(
            AuthService::register(&db, &config, &request).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[actix_web::test]
    async fn test_register_underage_rejected() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();

        let turns_18_tomorrow = eighteenth_birthday_today().succ_opt().unwrap();
        let request = register_request("kid@example.com", "Karnataka", turns_18_tomorrow);

        match AuthService::register(&db, &config, &request).await {
            Err(AppError::Forbidden(message)) => {
                assert_eq!(message, "You must be 18 years or older to register.")
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn test_register_invalid_input() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();

        let mut request = register_request("a@example.com", "Goa", eighteenth_birthday_today());
        request.password = "short".to_string();
        assert!(matches!(
            AuthService::register(&db, &config, &request).await,
            Err(AppError::Validation(_))
        ));

        let mut request = register_request("a@example.com", "Goa", eighteenth_birthday_today());
        request.date_of_birth = "15/01/1990".to_string();
        assert!(matches!(
            AuthService::register(&db, &config, &request).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[actix_web::test]
    async fn test_login_errors_are_identical() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();
        registered(&db, &config).await;

        let unknown = AuthService::login(&db, &config, &login_request("ghost@example.com", "correct horse"))
            .await
            .unwrap_err();
        let wrong = AuthService::login(&db, &config, &login_request("player@example.com", "wrong horse"))
            .await
            .unwrap_err();

        assert!(matches!(unknown, AppError::Unauthorized(_)));
        assert!(matches!(wrong, AppError::Unauthorized(_)));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.to_string(), INVALID_CREDENTIALS);
    }

    #[actix_web::test]
    async fn test_unknown_email_costs_a_hash_verification() {
        let db = test_support::memory_db().await;
        let config = AppConfig {
            password_hash_rounds: 20_000,
            ..test_support::test_config()
        };
        registered(&db, &config).await;

        let started = std::time::Instant::now();
        AuthService::login(&db, &config, &login_request("player@example.com", "wrong horse"))
            .await
            .unwrap_err();
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        AuthService::login(&db, &config, &login_request("ghost@example.com", "wrong horse"))
            .await
            .unwrap_err();
        let unknown_email = started.elapsed();

        // Sans dérivation l'écart serait de plusieurs ordres de grandeur
        assert!(
            unknown_email * 5 >= wrong_password,
            "unknown email answered in {unknown_email:?}, wrong password in {wrong_password:?}"
        );
    }

    #[actix_web::test]
    async fn test_login_success_and_blocked() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();
        let session = registered(&db, &config).await;

        let logged_in = AuthService::login(&db, &config, &login_request(" PLAYER@example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, session.user.id);
        assert!(logged_in.user.last_signed_in >= session.user.last_signed_in);

        let mut active: users::ActiveModel = logged_in.user.into();
        active.is_blocked = Set(true);
        active.update(&db).await.unwrap();

        assert!(matches!(
            AuthService::login(&db, &config, &login_request("player@example.com", "correct horse")).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[actix_web::test]
    async fn test_login_from_restricted_state_forbidden() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();
        let session = registered(&db, &config).await;

        let mut active: users::ActiveModel = session.user.into();
        active.state = Set(Some("Assam".to_string()));
        active.update(&db).await.unwrap();

        assert!(matches!(
            AuthService::login(&db, &config, &login_request("player@example.com", "correct horse")).await,
            Err(AppError::Forbidden(_))
        ));
    }

    async fn issued_token(db: &DatabaseConnection) -> String {
        password_reset_tokens::Entity::find()
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .token
    }

    #[actix_web::test]
    async fn test_reset_token_single_use() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();
        registered(&db, &config).await;

        let forgot = ForgotPasswordRequest { email: "player@example.com".to_string() };
        AuthService::forgot_password(&db, &config, &forgot).await.unwrap();
        let token = issued_token(&db).await;
        assert_eq!(token.len(), 64);

        let reset = ResetPasswordRequest {
            token: token.clone(),
            new_password: "brand new secret".to_string(),
        };
        AuthService::reset_password(&db, &config, &reset).await.unwrap();

        // Deuxième utilisation refusée
        match AuthService::reset_password(&db, &config, &reset).await {
            Err(AppError::BadRequest(message)) => assert_eq!(message, INVALID_RESET_TOKEN),
            other => panic!("expected BadRequest, got {other:?}"),
        }

        assert!(AuthService::login(&db, &config, &login_request("player@example.com", "brand new secret"))
            .await
            .is_ok());
        assert!(AuthService::login(&db, &config, &login_request("player@example.com", "correct horse"))
            .await
            .is_err());
    }

    #[actix_web::test]
    async fn test_expired_reset_token_rejected() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();
        registered(&db, &config).await;

        let forgot = ForgotPasswordRequest { email: "player@example.com".to_string() };
        AuthService::forgot_password(&db, &config, &forgot).await.unwrap();
        let token = issued_token(&db).await;

        let later = Utc::now().naive_utc() + Duration::minutes(config.reset_token_ttl_minutes + 1);
        assert!(matches!(
            AuthService::consume_reset_token(&db, &token, "$pbkdf2-sha256$unused", later).await,
            Err(AppError::BadRequest(_))
        ));

        let unknown = ResetPasswordRequest {
            token: "does-not-exist".to_string(),
            new_password: "brand new secret".to_string(),
        };
        assert!(matches!(
            AuthService::reset_password(&db, &config, &unknown).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[actix_web::test]
    async fn test_forgot_password_unknown_email_is_silent() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();

        let forgot = ForgotPasswordRequest { email: "ghost@example.com".to_string() };
        AuthService::forgot_password(&db, &config, &forgot).await.unwrap();
        assert_eq!(password_reset_tokens::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_change_password_and_profile() {
        let db = test_support::memory_db().await;
        let config = test_support::test_config();
        let session = registered(&db, &config).await;
        let user_id = session.user.id;

        let wrong = ChangePasswordRequest {
            current_password: "nope nope".to_string(),
            new_password: "another secret".to_string(),
        };
        assert!(matches!(
            AuthService::change_password(&db, &config, user_id, &wrong).await,
            Err(AppError::Unauthorized(_))
        ));

        let right = ChangePasswordRequest {
            current_password: "correct horse".to_string(),
            new_password: "another secret".to_string(),
        };
        AuthService::change_password(&db, &config, user_id, &right).await.unwrap();

        let update = UpdateProfileRequest {
            name: Some(" Virat ".to_string()),
            phone: Some("+91 98765 43210".to_string()),
        };
        let profile = AuthService::update_profile(&db, user_id, &update).await.unwrap();
        assert_eq!(profile.name, "Virat");
        assert_eq!(profile.phone.as_deref(), Some("+91 98765 43210"));

        assert_eq!(AuthService::profile(&db, user_id).await.unwrap().name, "Virat");
        assert!(AuthService::me(&db, 9999).await.unwrap().is_none());
        assert!(matches!(AuthService::profile(&db, 9999).await, Err(AppError::NotFound(_))));
    }
}
