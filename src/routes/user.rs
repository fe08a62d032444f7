use actix_web::{get, patch, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{ChangePasswordRequest, MessageResponse, UpdateProfileRequest};
use crate::services::auth_service::AuthService;
use crate::services::team_service::TeamService;

/// GET /user/profile - Profil de l'utilisateur connecté (PROTÉGÉE)
#[get("/profile")]
pub async fn profile(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let current = AuthService::profile(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(current))
}

/// PATCH /user/profile - Modifier nom / téléphone (PROTÉGÉE)
#[patch("/profile")]
pub async fn update_profile(
    auth_user: AuthUser,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let updated = AuthService::update_profile(db.get_ref(), auth_user.user_id, &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// POST /user/change-password - Changer son mot de passe (PROTÉGÉE)
#[post("/change-password")]
pub async fn change_password(
    auth_user: AuthUser,
    body: web::Json<ChangePasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    AuthService::change_password(db.get_ref(), &config, auth_user.user_id, &body).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Password changed successfully")))
}

/// GET /user/teams - Équipes de l'utilisateur, les plus récentes d'abord (PROTÉGÉE)
#[get("/teams")]
pub async fn my_teams(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let teams = TeamService::my_teams(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(teams))
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .service(profile)
            .service(update_profile)
            .service(change_password)
            .service(my_teams),
    );
}
