// Matchs: listes et détails en direct depuis l'API cricket,
// plus le miroir local (getById) et le squad synchronisé (players).

use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::services::cricket_api::CricketDataSource;
use crate::services::match_service::MatchService;

type Source = web::Data<dyn CricketDataSource>;

/// GET /matches/current - Matchs en cours + à venir
#[get("/current")]
pub async fn current(source: Source) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(source.current_matches().await?))
}

#[get("/live")]
pub async fn live(source: Source) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(source.live_matches().await?))
}

#[get("/upcoming")]
pub async fn upcoming(source: Source) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(source.upcoming_matches().await?))
}

#[get("/completed")]
pub async fn completed(source: Source) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(source.completed_matches().await?))
}

/// GET /matches/api/{id} - Infos d'un match par id API
#[get("/api/{id}")]
pub async fn get_by_api_id(source: Source, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(source.match_info(&path).await?))
}

/// GET /matches/api/{id}/scorecard - null si pas encore disponible
#[get("/api/{id}/scorecard")]
pub async fn scorecard(source: Source, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(source.scorecard(&path).await?))
}

#[get("/api/{id}/fantasy-points")]
pub async fn fantasy_points(source: Source, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(source.fantasy_points(&path).await?))
}

/// GET /matches/api/{id}/players - Squad avec prix et camp (synchronise le miroir local)
#[get("/api/{id}/players")]
pub async fn players(
    source: Source,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let squad = MatchService::sync_squad(db.get_ref(), source.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(squad))
}

/// GET /matches/{id} - Match du miroir local
#[get("/{id}")]
pub async fn get_by_id(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let fixture = MatchService::find(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(fixture))
}

pub fn matches_routes(cfg: &mut web::ServiceConfig) {
    // "/{id}" en dernier pour ne pas capturer "/current", "/live", ...
    cfg.service(
        web::scope("/matches")
            .service(current)
            .service(live)
            .service(upcoming)
            .service(completed)
            .service(get_by_api_id)
            .service(scorecard)
            .service(fantasy_points)
            .service(players)
            .service(get_by_id),
    );
}
