// Outils partagés par les tests: BD SQLite en mémoire, config fixe,
// données de match et fausse API cricket.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::Value;

use crate::config::{AppConfig, DEFAULT_CRICKET_API_BASE_URL};
use crate::db;
use crate::error::AppError;
use crate::models::cricket::{
    CricketMatch, FantasyMatchPoints, MatchStatus, PlayerRole, SquadTeam, API_STATUS_NOT_STARTED,
};
use crate::models::{match_players, matches, players, users};
use crate::services::cricket_api::CricketDataSource;

/// Une seule connexion: chaque connexion SQLite ":memory:" a sa propre base
pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    db::sync_schema(&db).await.unwrap();
    db
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret-do-not-use".to_string(),
        session_ttl_days: 7,
        session_cookie_secure: false,
        // Hash rapide pour les tests
        password_hash_rounds: 1_000,
        reset_token_ttl_minutes: 60,
        cricket_api_base_url: DEFAULT_CRICKET_API_BASE_URL.to_string(),
        cricket_api_key: String::new(),
        sync_schema: true,
    }
}

/// Compte minimal pour les tests des équipes (mot de passe inutilisable)
pub async fn seed_user(db: &DatabaseConnection, email: &str) -> users::Model {
    let now = Utc::now().naive_utc();
    users::ActiveModel {
        open_id: Set(uuid::Uuid::new_v4().to_string()),
        email: Set(email.to_string()),
        password_hash: Set("!".to_string()),
        name: Set(email.split('@').next().unwrap_or(email).to_string()),
        phone: Set(None),
        date_of_birth: Set(None),
        state: Set(Some("Maharashtra".to_string())),
        is_verified: Set(true),
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
    .unwrap()
}

/// Match "India vs Australia" pas encore commencé (dans 2 jours)
pub fn upcoming_fixture(id: &str) -> CricketMatch {
    let start = Utc::now().naive_utc() + Duration::days(2);
    CricketMatch {
        id: id.to_string(),
        name: "India vs Australia, 1st T20I".to_string(),
        match_type: "t20".to_string(),
        status: API_STATUS_NOT_STARTED.to_string(),
        venue: "Wankhede Stadium, Mumbai".to_string(),
        date: start.format("%Y-%m-%d").to_string(),
        date_time_gmt: start.format("%Y-%m-%dT%H:%M:%S").to_string(),
        teams: vec!["India".to_string(), "Australia".to_string()],
        ..Default::default()
    }
}

/// Insère un match dont le début est décalé de `starts_in_hours` (négatif = passé)
pub async fn seed_match(
    db: &DatabaseConnection,
    api_id: &str,
    status: MatchStatus,
    starts_in_hours: i64,
) -> matches::Model {
    let now = Utc::now().naive_utc();
    matches::ActiveModel {
        api_id: Set(api_id.to_string()),
        title: Set("IND vs AUS".to_string()),
        team1: Set("IND".to_string()),
        team2: Set("AUS".to_string()),
        venue: Set(None),
        match_type: Set("T20".to_string()),
        status: Set(status.as_str().to_string()),
        start_time: Set(now + Duration::hours(starts_in_hours)),
        end_time: Set(None),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

/// Composition d'un camp: 1 WK, 4 BAT, 2 AR, 4 BOWL
const SIDE_LAYOUT: [(PlayerRole, &str, usize); 4] = [
    (PlayerRole::WicketKeeper, "wk", 1),
    (PlayerRole::Batsman, "bat", 4),
    (PlayerRole::AllRounder, "ar", 2),
    (PlayerRole::Bowler, "bowl", 4),
];

/// Squad de 22 joueurs à 8 crédits, ids "ind-bat-1", "aus-bowl-3", ...
pub async fn seed_squad(db: &DatabaseConnection, match_api_id: &str) {
    for side in ["IND", "AUS"] {
        for (role, tag, count) in SIDE_LAYOUT {
            for n in 1..=count {
                let api_id = format!("{}-{}-{}", side.to_lowercase(), tag, n);
                seed_player(db, match_api_id, &api_id, role, side, Decimal::from(8)).await;
            }
        }
    }
}

pub async fn seed_player(
    db: &DatabaseConnection,
    match_api_id: &str,
    api_id: &str,
    role: PlayerRole,
    side: &str,
    credits: Decimal,
) {
    players::ActiveModel {
        api_id: Set(api_id.to_string()),
        name: Set(api_id.to_uppercase()),
        role: Set(role.as_str().to_string()),
        country: Set(Some(side.to_string())),
        credits: Set(credits),
        image_url: Set(None),
        total_points: Set(0),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .unwrap();

    match_players::ActiveModel {
        match_api_id: Set(match_api_id.to_string()),
        player_api_id: Set(api_id.to_string()),
        team_name: Set(side.to_string()),
        points_scored: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

/// Onze valide dans le squad de seed_squad (7 IND, 4 AUS)
pub fn valid_eleven() -> Vec<&'static str> {
    vec![
        "ind-wk-1", "ind-bat-1", "ind-bat-2", "ind-bat-3", "ind-ar-1", "ind-bowl-1",
        "ind-bowl-2", "aus-bowl-1", "aus-bat-1", "aus-ar-1", "aus-bowl-2",
    ]
}

/// API cricket en mémoire
#[derive(Default)]
pub struct FakeCricketSource {
    matches: Vec<CricketMatch>,
    squads: HashMap<String, Vec<SquadTeam>>,
    fantasy: HashMap<String, FantasyMatchPoints>,
    scorecards: HashMap<String, Value>,
}

impl FakeCricketSource {
    pub fn with_matches(mut self, matches: Vec<CricketMatch>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_squad(mut self, match_id: &str, squad: Vec<SquadTeam>) -> Self {
        self.squads.insert(match_id.to_string(), squad);
        self
    }

    pub fn with_fantasy(mut self, points: FantasyMatchPoints) -> Self {
        self.fantasy.insert(points.match_id.clone(), points);
        self
    }

    pub fn with_scorecard(mut self, match_id: &str, scorecard: Value) -> Self {
        self.scorecards.insert(match_id.to_string(), scorecard);
        self
    }
}

#[async_trait]
impl CricketDataSource for FakeCricketSource {
    async fn current_matches(&self) -> Result<Vec<CricketMatch>, AppError> {
        Ok(self.matches.clone())
    }

    async fn match_info(&self, match_id: &str) -> Result<CricketMatch, AppError> {
        self.matches
            .iter()
            .find(|m| m.id == match_id)
            .cloned()
            .ok_or_else(|| AppError::Upstream("Failed to fetch match information".to_string()))
    }

    async fn scorecard(&self, match_id: &str) -> Result<Option<Value>, AppError> {
        Ok(self.scorecards.get(match_id).cloned())
    }

    async fn fantasy_points(&self, match_id: &str) -> Result<FantasyMatchPoints, AppError> {
        self.fantasy
            .get(match_id)
            .cloned()
            .ok_or_else(|| AppError::Upstream("Failed to fetch fantasy points".to_string()))
    }

    async fn match_squad(&self, match_id: &str) -> Result<Vec<SquadTeam>, AppError> {
        Ok(self.squads.get(match_id).cloned().unwrap_or_default())
    }
}
