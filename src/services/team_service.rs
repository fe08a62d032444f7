// ============================================================================
// SERVICE : ÉQUIPES FANTASY
// ============================================================================
//
// Description:
//   Création d'une équipe par match, ajout/retrait de joueurs, capitaine et
//   vice-capitaine, soumission. Les règles de composition sont dans
//   team_rules, ce service s'occupe de la BD et du cycle de vie.
//
// Cycle de vie:
//   Draft -> Submitted (terminal)
//
// Points d'attention:
//   - Chaque modification tourne dans une transaction qui commence par
//     lock_draft(): UPDATE user_teams ... WHERE id = ? AND user_id = ?
//     AND is_submitted = false. Ça sérialise les appels concurrents sur une
//     même équipe et bloque toute modification après soumission.
//   - Une équipe d'un autre utilisateur est traitée comme inexistante
//   - Le match doit être 'upcoming' et pas encore commencé
//   - Ne jamais utiliser `db` pendant qu'une transaction est ouverte,
//     toujours passer `&txn`
//
// ============================================================================

use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::models::dto::CreateTeamRequest;
use crate::models::{matches, team_players, user_teams};
use crate::services::cricket_api::CricketDataSource;
use crate::services::match_service::MatchService;
use crate::services::scoring::{self, TeamPoints};
use crate::services::team_rules::{self, RosterEntry, RuleViolation};

pub const DEFAULT_TEAM_NAME: &str = "My Team";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Leadership {
    Captain,
    ViceCaptain,
}

pub struct TeamService;

impl TeamService {
    pub async fn create_team(
        db: &DatabaseConnection,
        user_id: i32,
        request: &CreateTeamRequest,
    ) -> Result<user_teams::Model, AppError> {
        request.validate()?;

        let fixture = MatchService::find(db, &request.match_api_id).await?;
        ensure_open(&fixture, now())?;

        if Self::team_for_match(db, user_id, &fixture.api_id).await?.is_some() {
            return Err(duplicate_team());
        }

        let team_name = request
            .team_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_TEAM_NAME);

        let now = now();
        let team = user_teams::ActiveModel {
            user_id: Set(user_id),
            match_api_id: Set(fixture.api_id.clone()),
            team_name: Set(team_name.to_string()),
            captain_api_id: Set(None),
            vice_captain_api_id: Set(None),
            total_points: Set(0),
            rank: Set(None),
            is_submitted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, duplicate_team))?;

        info!(team_id = team.id, user_id, match_id = %team.match_api_id, "team created");
        Ok(team)
    }

    /// teams.getForMatch: None si l'utilisateur n'a pas encore d'équipe
    pub async fn team_for_match<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        match_api_id: &str,
    ) -> Result<Option<user_teams::Model>, AppError> {
        let team = user_teams::Entity::find()
            .filter(user_teams::Column::UserId.eq(user_id))
            .filter(user_teams::Column::MatchApiId.eq(match_api_id))
            .one(conn)
            .await?;
        Ok(team)
    }

    /// L'équipe si elle appartient à `user_id`, NotFound sinon
    pub async fn owned_team<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        team_id: i32,
    ) -> Result<user_teams::Model, AppError> {
        user_teams::Entity::find_by_id(team_id)
            .one(conn)
            .await?
            .filter(|team| team.user_id == user_id)
            .ok_or_else(|| AppError::not_found("Team not found"))
    }

    pub async fn players(
        db: &DatabaseConnection,
        user_id: i32,
        team_id: i32,
    ) -> Result<Vec<team_players::Model>, AppError> {
        let team = Self::owned_team(db, user_id, team_id).await?;
        roster(db, team.id).await
    }

    pub async fn add_player(
        db: &DatabaseConnection,
        user_id: i32,
        team_id: i32,
        player_api_id: &str,
    ) -> Result<team_players::Model, AppError> {
        let txn = db.begin().await?;
        let team = lock_draft(&txn, user_id, team_id).await?;
        let fixture = MatchService::find(&txn, &team.match_api_id).await?;
        ensure_open(&fixture, now())?;

        // Équipe complète: refus avant même de chercher le joueur
        let current = roster(&txn, team.id).await?;
        if current.len() >= team_rules::MAX_PLAYERS {
            return Err(RuleViolation::RosterFull.into());
        }

        let candidate = MatchService::squad_player(&txn, &team.match_api_id, player_api_id)
            .await?
            .ok_or_else(|| AppError::not_found("Player is not in this match's squad"))?;

        let entries: Vec<RosterEntry> = current.iter().map(RosterEntry::from).collect();
        let entry = RosterEntry {
            player_api_id: candidate.api_id.clone(),
            role: candidate.role,
            side: candidate.team_name.clone(),
            credits: candidate.credits,
        };
        team_rules::check_addition(&entries, &entry)?;

        let selected = team_players::ActiveModel {
            team_id: Set(team.id),
            player_api_id: Set(candidate.api_id),
            player_name: Set(candidate.name),
            role: Set(candidate.role.as_str().to_string()),
            side: Set(candidate.team_name),
            credits: Set(candidate.credits),
            is_captain: Set(false),
            is_vice_captain: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::from_unique_violation(e, || RuleViolation::AlreadySelected.into()))?;

        txn.commit().await?;
        Ok(selected)
    }

    /// Idempotent: retirer un joueur absent ne fait rien
    pub async fn remove_player(
        db: &DatabaseConnection,
        user_id: i32,
        team_id: i32,
        player_api_id: &str,
    ) -> Result<(), AppError> {
        let txn = db.begin().await?;
        let team = lock_draft(&txn, user_id, team_id).await?;
        let fixture = MatchService::find(&txn, &team.match_api_id).await?;
        ensure_open(&fixture, now())?;

        let Some(selected) = find_selected(&txn, team.id, player_api_id).await? else {
            txn.commit().await?;
            return Ok(());
        };

        if selected.is_captain || selected.is_vice_captain {
            let mut active: user_teams::ActiveModel = team.into();
            if selected.is_captain {
                active.captain_api_id = Set(None);
            }
            if selected.is_vice_captain {
                active.vice_captain_api_id = Set(None);
            }
            active.update(&txn).await?;
        }

        selected.delete(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn set_captain(
        db: &DatabaseConnection,
        user_id: i32,
        team_id: i32,
        player_api_id: &str,
    ) -> Result<user_teams::Model, AppError> {
        set_leader(db, user_id, team_id, player_api_id, Leadership::Captain).await
    }

    pub async fn set_vice_captain(
        db: &DatabaseConnection,
        user_id: i32,
        team_id: i32,
        player_api_id: &str,
    ) -> Result<user_teams::Model, AppError> {
        set_leader(db, user_id, team_id, player_api_id, Leadership::ViceCaptain).await
    }

    /// Draft -> Submitted, une seule fois
    pub async fn submit(
        db: &DatabaseConnection,
        user_id: i32,
        team_id: i32,
    ) -> Result<user_teams::Model, AppError> {
        let txn = db.begin().await?;
        let team = lock_draft(&txn, user_id, team_id).await?;
        let fixture = MatchService::find(&txn, &team.match_api_id).await?;
        ensure_open(&fixture, now())?;

        let current = roster(&txn, team.id).await?;
        let entries: Vec<RosterEntry> = current.iter().map(RosterEntry::from).collect();
        team_rules::check_submission(
            &entries,
            team.captain_api_id.as_deref(),
            team.vice_captain_api_id.as_deref(),
        )?;

        let mut active: user_teams::ActiveModel = team.into();
        active.is_submitted = Set(true);
        active.updated_at = Set(now());
        let team = active.update(&txn).await?;

        txn.commit().await?;

        info!(team_id = team.id, user_id, "team submitted");
        Ok(team)
    }

    /// user.myTeams, les plus récentes d'abord
    pub async fn my_teams(db: &DatabaseConnection, user_id: i32) -> Result<Vec<user_teams::Model>, AppError> {
        let teams = user_teams::Entity::find()
            .filter(user_teams::Column::UserId.eq(user_id))
            .order_by_desc(user_teams::Column::CreatedAt)
            .order_by_desc(user_teams::Column::Id)
            .all(db)
            .await?;
        Ok(teams)
    }

    /// Points actuels de l'équipe d'après le résumé fantasy de l'API.
    /// Lecture seule: rien n'est écrit en base.
    pub async fn team_points(
        db: &DatabaseConnection,
        source: &dyn CricketDataSource,
        user_id: i32,
        team_id: i32,
    ) -> Result<TeamPoints, AppError> {
        let team = Self::owned_team(db, user_id, team_id).await?;
        let current = roster(db, team.id).await?;
        let summary = source.fantasy_points(&team.match_api_id).await?;
        Ok(scoring::score_team(&team, &current, &summary))
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn duplicate_team() -> AppError {
    AppError::Conflict("You already have a team for this match.".to_string())
}

fn ensure_open(fixture: &matches::Model, now: NaiveDateTime) -> Result<(), AppError> {
    if !fixture.is_open_at(now) {
        return Err(AppError::bad_request(
            "This match has already started. Teams can no longer be changed.",
        ));
    }
    Ok(())
}

/// Première instruction de toute modification: écrit sur la ligne de
/// l'équipe seulement si elle est à l'utilisateur et encore en draft.
async fn lock_draft(
    txn: &DatabaseTransaction,
    user_id: i32,
    team_id: i32,
) -> Result<user_teams::Model, AppError> {
    let result = user_teams::Entity::update_many()
        .col_expr(user_teams::Column::UpdatedAt, Expr::value(now()))
        .filter(user_teams::Column::Id.eq(team_id))
        .filter(user_teams::Column::UserId.eq(user_id))
        .filter(user_teams::Column::IsSubmitted.eq(false))
        .exec(txn)
        .await?;

    let team = TeamService::owned_team(txn, user_id, team_id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::bad_request(
            "Team has already been submitted and can no longer be changed.",
        ));
    }

    Ok(team)
}

async fn roster<C: ConnectionTrait>(conn: &C, team_id: i32) -> Result<Vec<team_players::Model>, AppError> {
    let players = team_players::Entity::find()
        .filter(team_players::Column::TeamId.eq(team_id))
        .order_by_asc(team_players::Column::Id)
        .all(conn)
        .await?;
    Ok(players)
}

async fn find_selected<C: ConnectionTrait>(
    conn: &C,
    team_id: i32,
    player_api_id: &str,
) -> Result<Option<team_players::Model>, AppError> {
    let selected = team_players::Entity::find()
        .filter(team_players::Column::TeamId.eq(team_id))
        .filter(team_players::Column::PlayerApiId.eq(player_api_id))
        .one(conn)
        .await?;
    Ok(selected)
}

async fn set_leader(
    db: &DatabaseConnection,
    user_id: i32,
    team_id: i32,
    player_api_id: &str,
    role: Leadership,
) -> Result<user_teams::Model, AppError> {
    let txn = db.begin().await?;
    let team = lock_draft(&txn, user_id, team_id).await?;
    let fixture = MatchService::find(&txn, &team.match_api_id).await?;
    ensure_open(&fixture, now())?;

    let selected = find_selected(&txn, team.id, player_api_id)
        .await?
        .ok_or_else(|| AppError::bad_request("Player is not in this team."))?;

    let holds_other_role = match role {
        Leadership::Captain => selected.is_vice_captain,
        Leadership::ViceCaptain => selected.is_captain,
    };
    if holds_other_role {
        return Err(RuleViolation::SameLeadership.into());
    }

    let flag = match role {
        Leadership::Captain => team_players::Column::IsCaptain,
        Leadership::ViceCaptain => team_players::Column::IsViceCaptain,
    };

    // Un seul capitaine (ou vice-capitaine) par équipe
    team_players::Entity::update_many()
        .col_expr(flag, Expr::value(false))
        .filter(team_players::Column::TeamId.eq(team.id))
        .exec(&txn)
        .await?;
    team_players::Entity::update_many()
        .col_expr(flag, Expr::value(true))
        .filter(team_players::Column::Id.eq(selected.id))
        .exec(&txn)
        .await?;

    let mut active: user_teams::ActiveModel = team.into();
    match role {
        Leadership::Captain => active.captain_api_id = Set(Some(selected.player_api_id.clone())),
        Leadership::ViceCaptain => active.vice_captain_api_id = Set(Some(selected.player_api_id.clone())),
    }
    active.updated_at = Set(now());
    let team = active.update(&txn).await?;

    txn.commit().await?;
    Ok(team)
}
