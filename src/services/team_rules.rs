// ============================================================================
// RÈGLES DE COMPOSITION D'UNE ÉQUIPE FANTASY
// ============================================================================
//
// Description:
//   Fonctions pures, sans accès BD. Appelées par TeamService à chaque ajout
//   de joueur et à la soumission, pour que les règles tiennent quel que soit
//   le client (le frontend les applique aussi, mais ne fait pas foi).
//
// Règles:
//   - 11 joueurs exactement à la soumission
//   - 100 crédits maximum
//   - 7 joueurs maximum du même camp réel
//   - Minimums par rôle: 1 WK, 3 BAT, 3 BOWL, 1 AR
//   - Capitaine et vice-capitaine: tous deux choisis, distincts, dans l'équipe
//
// ============================================================================

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::cricket::PlayerRole;
use crate::models::team_players;

pub const MAX_PLAYERS: usize = 11;
pub const MAX_FROM_ONE_SIDE: usize = 7;

/// Budget total en crédits
pub fn max_credits() -> Decimal {
    Decimal::from(100)
}

pub fn minimum_for(role: PlayerRole) -> usize {
    match role {
        PlayerRole::WicketKeeper => 1,
        PlayerRole::Batsman => 3,
        PlayerRole::Bowler => 3,
        PlayerRole::AllRounder => 1,
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleViolation {
    #[error("Team already has {} players.", MAX_PLAYERS)]
    RosterFull,

    #[error("Player is already in this team.")]
    AlreadySelected,

    #[error("Not enough credits: {needed} needed, {remaining} remaining.")]
    OverBudget { needed: Decimal, remaining: Decimal },

    #[error("A team may hold at most {} players from {side}.", MAX_FROM_ONE_SIDE)]
    TooManyFromSide { side: String },

    #[error("Adding another {role} would leave too few slots for the minimum role requirements.")]
    RoleQuotaUnreachable { role: PlayerRole },

    #[error("Team must have exactly {} players.", MAX_PLAYERS)]
    WrongPlayerCount { count: usize },

    #[error("Team needs at least {min} {role} player(s).")]
    RoleShortfall { role: PlayerRole, min: usize },

    #[error("Select both a captain and a vice-captain before submitting.")]
    MissingLeadership,

    #[error("Captain and vice-captain must be different players.")]
    SameLeadership,

    #[error("Captain and vice-captain must both be in the team.")]
    LeaderNotInTeam,
}

/// Vue minimale d'un joueur pour appliquer les règles
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub player_api_id: String,
    pub role: PlayerRole,
    pub side: String,
    pub credits: Decimal,
}

impl From<&team_players::Model> for RosterEntry {
    fn from(row: &team_players::Model) -> Self {
        RosterEntry {
            player_api_id: row.player_api_id.clone(),
            role: PlayerRole::parse(&row.role),
            side: row.side.clone(),
            credits: row.credits,
        }
    }
}

fn credits_used(roster: &[RosterEntry]) -> Decimal {
    roster.iter().map(|p| p.credits).sum()
}

fn count_side(roster: &[RosterEntry], side: &str) -> usize {
    roster.iter().filter(|p| p.side == side).count()
}

fn count_role(roster: &[RosterEntry], role: PlayerRole) -> usize {
    roster.iter().filter(|p| p.role == role).count()
}

/// Nombre de places encore nécessaires pour atteindre tous les minimums
fn missing_role_slots(roster: &[RosterEntry]) -> usize {
    PlayerRole::ALL
        .iter()
        .map(|role| minimum_for(*role).saturating_sub(count_role(roster, *role)))
        .sum()
}

/// Vérifie qu'on peut ajouter `candidate` à l'équipe actuelle
pub fn check_addition(roster: &[RosterEntry], candidate: &RosterEntry) -> Result<(), RuleViolation> {
    if roster.len() >= MAX_PLAYERS {
        return Err(RuleViolation::RosterFull);
    }

    if roster.iter().any(|p| p.player_api_id == candidate.player_api_id) {
        return Err(RuleViolation::AlreadySelected);
    }

    let remaining = max_credits() - credits_used(roster);
    if candidate.credits > remaining {
        return Err(RuleViolation::OverBudget {
            needed: candidate.credits,
            remaining,
        });
    }

    if count_side(roster, &candidate.side) >= MAX_FROM_ONE_SIDE {
        return Err(RuleViolation::TooManyFromSide {
            side: candidate.side.clone(),
        });
    }

    let mut next = roster.to_vec();
    next.push(candidate.clone());
    if missing_role_slots(&next) > MAX_PLAYERS - next.len() {
        return Err(RuleViolation::RoleQuotaUnreachable {
            role: candidate.role,
        });
    }

    Ok(())
}

/// Vérifie une équipe complète avant soumission
pub fn check_submission(
    roster: &[RosterEntry],
    captain: Option<&str>,
    vice_captain: Option<&str>,
) -> Result<(), RuleViolation> {
    if roster.len() != MAX_PLAYERS {
        return Err(RuleViolation::WrongPlayerCount { count: roster.len() });
    }

    let used = credits_used(roster);
    if used > max_credits() {
        return Err(RuleViolation::OverBudget {
            needed: used,
            remaining: max_credits(),
        });
    }

    for entry in roster {
        if count_side(roster, &entry.side) > MAX_FROM_ONE_SIDE {
            return Err(RuleViolation::TooManyFromSide {
                side: entry.side.clone(),
            });
        }
    }

    for role in PlayerRole::ALL {
        let min = minimum_for(role);
        if count_role(roster, role) < min {
            return Err(RuleViolation::RoleShortfall { role, min });
        }
    }

    let (captain, vice_captain) = match (captain, vice_captain) {
        (Some(c), Some(vc)) => (c, vc),
        _ => return Err(RuleViolation::MissingLeadership),
    };

    if captain == vice_captain {
        return Err(RuleViolation::SameLeadership);
    }

    let in_roster = |id: &str| roster.iter().any(|p| p.player_api_id == id);
    if !in_roster(captain) || !in_roster(vice_captain) {
        return Err(RuleViolation::LeaderNotInTeam);
    }

    Ok(())
}
