use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{CreateTeamRequest, PlayerSelectionRequest, SuccessResponse};
use crate::services::cricket_api::CricketDataSource;
use crate::services::team_service::TeamService;

/// POST /teams - Créer son équipe pour un match (PROTÉGÉE)
#[post("")]
pub async fn create(
    auth_user: AuthUser,
    body: web::Json<CreateTeamRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let team = TeamService::create_team(db.get_ref(), auth_user.user_id, &body).await?;
    Ok(HttpResponse::Created().json(team))
}

/// GET /teams/match/{matchApiId} - Son équipe pour ce match, ou null
#[get("/match/{match_api_id}")]
pub async fn get_for_match(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let team = TeamService::team_for_match(db.get_ref(), auth_user.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(team))
}

#[get("/{id}/players")]
pub async fn get_players(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let players = TeamService::players(db.get_ref(), auth_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(players))
}

/// POST /teams/{id}/players - Ajouter un joueur du squad
#[post("/{id}/players")]
pub async fn add_player(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<PlayerSelectionRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let selected =
        TeamService::add_player(db.get_ref(), auth_user.user_id, path.into_inner(), &body.player_api_id).await?;
    Ok(HttpResponse::Created().json(selected))
}

#[delete("/{id}/players/{player_api_id}")]
pub async fn remove_player(
    auth_user: AuthUser,
    path: web::Path<(i32, String)>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let (team_id, player_api_id) = path.into_inner();
    TeamService::remove_player(db.get_ref(), auth_user.user_id, team_id, &player_api_id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

#[put("/{id}/captain")]
pub async fn set_captain(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<PlayerSelectionRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let team =
        TeamService::set_captain(db.get_ref(), auth_user.user_id, path.into_inner(), &body.player_api_id).await?;
    Ok(HttpResponse::Ok().json(team))
}

#[put("/{id}/vice-captain")]
pub async fn set_vice_captain(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<PlayerSelectionRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let team =
        TeamService::set_vice_captain(db.get_ref(), auth_user.user_id, path.into_inner(), &body.player_api_id)
            .await?;
    Ok(HttpResponse::Ok().json(team))
}

/// POST /teams/{id}/submit - Valide et verrouille l'équipe
#[post("/{id}/submit")]
pub async fn submit(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let team = TeamService::submit(db.get_ref(), auth_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(team))
}

/// GET /teams/{id}/points - Points actuels d'après l'API (rien n'est enregistré)
#[get("/{id}/points")]
pub async fn points(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    source: web::Data<dyn CricketDataSource>,
) -> Result<HttpResponse, AppError> {
    let scored =
        TeamService::team_points(db.get_ref(), source.get_ref(), auth_user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(scored))
}

pub fn teams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teams")
            .service(create)
            .service(get_for_match)
            .service(get_players)
            .service(add_player)
            .service(remove_player)
            .service(set_captain)
            .service(set_vice_captain)
            .service(submit)
            .service(points),
    );
}
