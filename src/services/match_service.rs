// ============================================================================
// SERVICE : MATCHS ET SQUADS
// ============================================================================
//
// Description:
//   Miroir local des matchs et squads de l'API cricket. Les équipes
//   fantasy référencent ces lignes (clé = id API), d'où la synchronisation
//   avant toute construction d'équipe.
//
// Points d'attention:
//   - Un nouveau joueur coûte DEFAULT_PLAYER_CREDITS, un joueur déjà connu
//     garde son prix
//   - Le camp d'un joueur est propre au match (match_players.team_name)
//
// ============================================================================

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::*;
use tracing::{error, info};

use crate::error::AppError;
use crate::models::cricket::{CricketMatch, MatchFormat, PlayerRole, SquadTeam};
use crate::models::dto::MatchPlayerView;
use crate::models::{match_players, matches, players};
use crate::services::cricket_api::CricketDataSource;

pub struct MatchService;

/// Prix d'un joueur jamais vu auparavant
pub fn default_player_credits() -> Decimal {
    Decimal::new(80, 1)
}

impl MatchService {
    /// GET /matches/{id}: le match tel que mirroré localement
    pub async fn find<C: ConnectionTrait>(conn: &C, match_api_id: &str) -> Result<matches::Model, AppError> {
        matches::Entity::find_by_id(match_api_id.to_string())
            .one(conn)
            .await?
            .ok_or_else(|| AppError::not_found("Match not found"))
    }

    /// Insère ou met à jour la ligne `matches` à partir des infos de l'API
    pub async fn mirror_match<C: ConnectionTrait>(
        conn: &C,
        info: &CricketMatch,
    ) -> Result<matches::Model, AppError> {
        let start_time = start_time_of(info).ok_or_else(|| {
            error!(match_id = %info.id, date = %info.date_time_gmt, "unreadable match start time");
            AppError::Upstream("Failed to fetch match information".to_string())
        })?;

        let team = |i: usize| info.teams.get(i).cloned().unwrap_or_else(|| "TBA".to_string());
        let venue = Some(info.venue.trim().to_string()).filter(|v| !v.is_empty());
        let status = info.local_status().as_str().to_string();
        let match_type = MatchFormat::from_api(&info.match_type).as_str().to_string();

        let existing = matches::Entity::find_by_id(info.id.clone()).one(conn).await?;

        let saved = match existing {
            Some(row) => {
                let mut active: matches::ActiveModel = row.into();
                active.title = Set(info.name.clone());
                active.team1 = Set(team(0));
                active.team2 = Set(team(1));
                active.venue = Set(venue);
                active.match_type = Set(match_type);
                active.status = Set(status);
                active.start_time = Set(start_time);
                active.update(conn).await?
            }
            None => {
                matches::ActiveModel {
                    api_id: Set(info.id.clone()),
                    title: Set(info.name.clone()),
                    team1: Set(team(0)),
                    team2: Set(team(1)),
                    venue: Set(venue),
                    match_type: Set(match_type),
                    status: Set(status),
                    start_time: Set(start_time),
                    end_time: Set(None),
                    created_at: Set(Utc::now().naive_utc()),
                }
                .insert(conn)
                .await?
            }
        };

        Ok(saved)
    }

    /// GET /matches/api/{id}/players
    ///
    /// Récupère infos + squad depuis l'API, met à jour le miroir local
    /// (match, joueurs, match_players) et renvoie le squad avec prix et camp.
    pub async fn sync_squad(
        db: &DatabaseConnection,
        source: &dyn CricketDataSource,
        match_api_id: &str,
    ) -> Result<Vec<MatchPlayerView>, AppError> {
        // Appels réseau (en parallèle) avant d'ouvrir la transaction
        let (info, squads) = tokio::try_join!(
            source.match_info(match_api_id),
            source.match_squad(match_api_id),
        )?;

        let txn = db.begin().await?;
        let mirrored = Self::mirror_match(&txn, &info).await?;
        let mut synced = 0usize;

        for squad in &squads {
            for player in &squad.players {
                upsert_player(&txn, player, squad).await?;
                upsert_match_player(&txn, &mirrored.api_id, &player.id, &squad.team_name).await?;
                synced += 1;
            }
        }
        txn.commit().await?;

        info!(match_id = %mirrored.api_id, players = synced, "squad synchronised");

        Self::squad(db, &mirrored.api_id).await
    }

    /// Squad local d'un match, trié par camp puis par nom
    pub async fn squad<C: ConnectionTrait>(conn: &C, match_api_id: &str) -> Result<Vec<MatchPlayerView>, AppError> {
        let rows = match_players::Entity::find()
            .filter(match_players::Column::MatchApiId.eq(match_api_id))
            .find_also_related(players::Entity)
            .all(conn)
            .await?;

        let mut squad: Vec<MatchPlayerView> = rows
            .into_iter()
            .filter_map(|(entry, player)| player.map(|p| to_view(entry, p)))
            .collect();
        squad.sort_by(|a, b| a.team_name.cmp(&b.team_name).then_with(|| a.name.cmp(&b.name)));

        Ok(squad)
    }

    /// Un joueur du squad d'un match, None s'il n'y figure pas
    pub async fn squad_player<C: ConnectionTrait>(
        conn: &C,
        match_api_id: &str,
        player_api_id: &str,
    ) -> Result<Option<MatchPlayerView>, AppError> {
        let row = match_players::Entity::find()
            .filter(match_players::Column::MatchApiId.eq(match_api_id))
            .filter(match_players::Column::PlayerApiId.eq(player_api_id))
            .find_also_related(players::Entity)
            .one(conn)
            .await?;

        Ok(row.and_then(|(entry, player)| player.map(|p| to_view(entry, p))))
    }
}

fn to_view(entry: match_players::Model, player: players::Model) -> MatchPlayerView {
    MatchPlayerView {
        api_id: player.api_id,
        name: player.name,
        role: PlayerRole::parse(&player.role),
        team_name: entry.team_name,
        credits: player.credits,
        points_scored: entry.points_scored,
    }
}

/// dateTimeGMT, sinon la date seule (minuit UTC)
fn start_time_of(info: &CricketMatch) -> Option<NaiveDateTime> {
    info.start_time().or_else(|| {
        NaiveDate::parse_from_str(info.date.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

async fn upsert_player<C: ConnectionTrait>(
    conn: &C,
    player: &crate::models::cricket::SquadPlayer,
    squad: &SquadTeam,
) -> Result<(), AppError> {
    let role = PlayerRole::parse(player.role.as_deref().unwrap_or_default());
    let existing = players::Entity::find_by_id(player.id.clone()).one(conn).await?;

    match existing {
        Some(row) => {
            // Le prix reste celui déjà en base
            let mut active: players::ActiveModel = row.into();
            active.name = Set(player.name.clone());
            active.role = Set(role.as_str().to_string());
            if player.player_img.is_some() {
                active.image_url = Set(player.player_img.clone());
            }
            active.update(conn).await?;
        }
        None => {
            players::ActiveModel {
                api_id: Set(player.id.clone()),
                name: Set(player.name.clone()),
                role: Set(role.as_str().to_string()),
                country: Set(player.country.clone().or_else(|| Some(squad.team_name.clone()))),
                credits: Set(default_player_credits()),
                image_url: Set(player.player_img.clone()),
                total_points: Set(0),
                created_at: Set(Utc::now().naive_utc()),
            }
            .insert(conn)
            .await?;
        }
    }

    Ok(())
}

async fn upsert_match_player<C: ConnectionTrait>(
    conn: &C,
    match_api_id: &str,
    player_api_id: &str,
    side: &str,
) -> Result<(), AppError> {
    let existing = match_players::Entity::find()
        .filter(match_players::Column::MatchApiId.eq(match_api_id))
        .filter(match_players::Column::PlayerApiId.eq(player_api_id))
        .one(conn)
        .await?;

    match existing {
        Some(row) if row.team_name == side => {}
        Some(row) => {
            let mut active: match_players::ActiveModel = row.into();
            active.team_name = Set(side.to_string());
            active.update(conn).await?;
        }
        None => {
            match_players::ActiveModel {
                match_api_id: Set(match_api_id.to_string()),
                player_api_id: Set(player_api_id.to_string()),
                team_name: Set(side.to_string()),
                points_scored: Set(0),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
    }

    Ok(())
}
