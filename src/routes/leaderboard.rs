use actix_web::{get, web, HttpResponse};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::error::AppError;
use crate::models::dto::{GlobalLeaderboardEntry, LeaderboardQuery, MatchLeaderboardEntry};
use crate::models::{user_teams, users};

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 500;

/// limit absent => 100, sinon borné à 1..=500
pub fn effective_limit(requested: Option<u64>) -> u64 {
    requested.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// GET /leaderboard/global?limit= - Utilisateurs par points totaux
#[get("/global")]
pub async fn global(
    query: web::Query<LeaderboardQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let entries: Vec<GlobalLeaderboardEntry> = users::Entity::find()
        .order_by_desc(users::Column::TotalPoints)
        .order_by_asc(users::Column::Id)
        .limit(effective_limit(query.limit))
        .all(db.get_ref())
        .await?
        .into_iter()
        .map(|user| GlobalLeaderboardEntry {
            id: user.id,
            name: user.name,
            total_points: user.total_points,
            matches_played: user.matches_played,
        })
        .collect();

    Ok(HttpResponse::Ok().json(entries))
}

/// GET /leaderboard/match/{matchApiId}?limit= - Équipes soumises du match
#[get("/match/{match_api_id}")]
pub async fn by_match(
    path: web::Path<String>,
    query: web::Query<LeaderboardQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let entries: Vec<MatchLeaderboardEntry> = user_teams::Entity::find()
        .filter(user_teams::Column::MatchApiId.eq(path.as_str()))
        .filter(user_teams::Column::IsSubmitted.eq(true))
        .order_by_desc(user_teams::Column::TotalPoints)
        .order_by_asc(user_teams::Column::Id)
        .limit(effective_limit(query.limit))
        .find_also_related(users::Entity)
        .all(db.get_ref())
        .await?
        .into_iter()
        .map(|(team, user)| MatchLeaderboardEntry {
            id: team.id,
            user_id: team.user_id,
            team_name: team.team_name,
            total_points: team.total_points,
            rank: team.rank,
            user_name: user.map(|u| u.name),
        })
        .collect();

    Ok(HttpResponse::Ok().json(entries))
}

pub fn leaderboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leaderboard")
            .service(global)
            .service(by_match),
    );
}
