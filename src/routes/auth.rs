use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::OptionalAuthUser;
use crate::models::dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, SessionUser, SuccessResponse,
};
use crate::models::users;
use crate::services::auth_service::{self, AuthService, Session};
use crate::utils::cookies;

fn session_response(
    mut response: actix_web::HttpResponseBuilder,
    session: Session,
    message: &str,
    config: &AppConfig,
) -> HttpResponse {
    response
        .cookie(cookies::session_cookie(session.token, config))
        .json(AuthResponse {
            success: true,
            message: Some(message.to_string()),
            user: session_user(&session.user),
        })
}

fn session_user(user: &users::Model) -> SessionUser {
    SessionUser {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

/// GET /auth/me - Profil de la session courante, null si pas connecté
#[get("/me")]
pub async fn me(
    auth_user: OptionalAuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let profile = match auth_user.0 {
        Some(user) => AuthService::me(db.get_ref(), user.user_id).await?,
        None => None,
    };
    Ok(HttpResponse::Ok().json(profile))
}

/// POST /auth/logout - Efface le cookie de session
#[post("/logout")]
pub async fn logout(config: web::Data<AppConfig>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cookies::cleared_session_cookie(&config))
        .json(SuccessResponse::ok())
}

/// POST /auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let session = AuthService::register(db.get_ref(), &config, &body).await?;
    Ok(session_response(HttpResponse::Created(), session, "Registration successful", &config))
}

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let session = AuthService::login(db.get_ref(), &config, &body).await?;
    Ok(session_response(HttpResponse::Ok(), session, "Login successful", &config))
}

/// POST /auth/forgot-password - Même réponse que le compte existe ou non
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    AuthService::forgot_password(db.get_ref(), &config, &body).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok(auth_service::RESET_REQUESTED)))
}

/// POST /auth/reset-password - Nouveau mot de passe avec un token de reset
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    AuthService::reset_password(db.get_ref(), &config, &body).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Password has been reset successfully.")))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(me)
            .service(logout)
            .service(register)
            .service(login)
            .service(forgot_password)
            .service(reset_password),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use actix_web::{http::StatusCode, test, App};
    use chrono::{Datelike, Utc};
    use serde_json::{json, Value};

    fn adult_birth_date() -> String {
        let today = Utc::now().date_naive();
        format!("{}-01-01", today.year() - 30)
    }

    fn register_body(email: &str, state: &str) -> Value {
        json!({
            "email": email,
            "password": "correct horse",
            "name": "Smriti Mandhana",
            "dateOfBirth": adult_birth_date(),
            "state": state,
        })
    }

    #[actix_web::test]
    async fn test_register_sets_cookie_and_rejects_duplicate() {
        let db = test_support::memory_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(test_support::test_config()))
                .configure(auth_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(register_body("fan@example.com", "Maharashtra"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == cookies::SESSION_COOKIE)
            .expect("session cookie");
        assert!(!cookie.value().is_empty());
        assert_eq!(cookie.http_only(), Some(true));

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["email"], "fan@example.com");

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(register_body("fan@example.com", "Maharashtra"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_register_restricted_state_forbidden() {
        let db = test_support::memory_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(test_support::test_config()))
                .configure(auth_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(register_body("fan@example.com", "Sikkim"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("not available in your state"));
    }

    #[actix_web::test]
    async fn test_me_with_and_without_session() {
        let db = test_support::memory_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(test_support::test_config()))
                .configure(auth_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/auth/me").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body.is_null());

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(register_body("fan@example.com", "Goa"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == cookies::SESSION_COOKIE)
            .unwrap()
            .into_owned();

        let req = test::TestRequest::get().uri("/auth/me").cookie(cookie).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["email"], "fan@example.com");
        assert_eq!(body["state"], "Goa");
        assert!(body.get("passwordHash").is_none());

        let req = test::TestRequest::post().uri("/auth/logout").to_request();
        let resp = test::call_service(&app, req).await;
        let cleared = resp
            .response()
            .cookies()
            .find(|c| c.name() == cookies::SESSION_COOKIE)
            .unwrap();
        assert_eq!(cleared.value(), "");
    }

    #[actix_web::test]
    async fn test_login_failure_is_unauthorized() {
        let db = test_support::memory_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(test_support::test_config()))
                .configure(auth_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "ghost@example.com", "password": "whatever1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], auth_service::INVALID_CREDENTIALS);
    }
}
