// Points d'une équipe fantasy à partir du résumé fantasy de l'API.
// Rien n'est persisté: le calcul sert à l'affichage (GET /teams/{id}/points).

use std::collections::HashMap;

use serde::Serialize;

use crate::models::cricket::FantasyMatchPoints;
use crate::models::{team_players, user_teams};

pub const CAPTAIN_MULTIPLIER: f64 = 2.0;
pub const VICE_CAPTAIN_MULTIPLIER: f64 = 1.5;

pub fn multiplier(player: &team_players::Model) -> f64 {
    if player.is_captain {
        CAPTAIN_MULTIPLIER
    } else if player.is_vice_captain {
        VICE_CAPTAIN_MULTIPLIER
    } else {
        1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPointsLine {
    pub player_api_id: String,
    pub name: String,
    pub base_points: f64,
    pub multiplier: f64,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPoints {
    pub team_id: i32,
    pub match_api_id: String,
    pub total_points: f64,
    pub players: Vec<PlayerPointsLine>,
}

/// Un joueur absent du résumé (n'a pas joué) marque 0
pub fn score_team(
    team: &user_teams::Model,
    roster: &[team_players::Model],
    summary: &FantasyMatchPoints,
) -> TeamPoints {
    let by_player: HashMap<&str, f64> = summary
        .players
        .iter()
        .map(|p| (p.player_id.as_str(), p.points))
        .collect();

    let players: Vec<PlayerPointsLine> = roster
        .iter()
        .map(|p| {
            let base_points = by_player.get(p.player_api_id.as_str()).copied().unwrap_or(0.0);
            let multiplier = multiplier(p);
            PlayerPointsLine {
                player_api_id: p.player_api_id.clone(),
                name: p.player_name.clone(),
                base_points,
                multiplier,
                points: base_points * multiplier,
            }
        })
        .collect();

    TeamPoints {
        team_id: team.id,
        match_api_id: team.match_api_id.clone(),
        total_points: players.iter().map(|p| p.points).sum(),
        players,
    }
}
