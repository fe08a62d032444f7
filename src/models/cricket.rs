// ============================================================================
// MODÈLE : DONNÉES CRICKET
// ============================================================================
//
// Description:
//   - Enums métier stockés en texte dans la BD (rôle, statut, format)
//   - Structures des réponses de l'API cricket (cricapi v1)
//
// Points d'attention:
//   - Les réponses API sont enveloppées: { status, data, reason }
//   - Les champs absents ou null de l'API prennent leur valeur par défaut
//   - Les ids de l'API sont des chaînes opaques
//
// ============================================================================

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerRole {
    Batsman,
    Bowler,
    AllRounder,
    WicketKeeper,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 4] = [
        PlayerRole::WicketKeeper,
        PlayerRole::Batsman,
        PlayerRole::AllRounder,
        PlayerRole::Bowler,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Batsman => "batsman",
            PlayerRole::Bowler => "bowler",
            PlayerRole::AllRounder => "all-rounder",
            PlayerRole::WicketKeeper => "wicket-keeper",
        }
    }

    /// Accepte les valeurs stockées ("all-rounder") et celles de l'API
    /// ("WK-Batsman", "Bowling Allrounder", ...). Inconnu => batsman.
    pub fn parse(raw: &str) -> PlayerRole {
        let role = raw.trim().to_ascii_lowercase();
        if role.starts_with("wk") || role.contains("keeper") {
            PlayerRole::WicketKeeper
        } else if role.contains("allrounder") || role.contains("all-rounder") || role.contains("all rounder") {
            PlayerRole::AllRounder
        } else if role.contains("bowl") {
            PlayerRole::Bowler
        } else {
            PlayerRole::Batsman
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
        }
    }

    /// Valeur stockée en BD. Une valeur inconnue est traitée comme live
    /// (donc verrouillée pour les équipes).
    pub fn parse(raw: &str) -> MatchStatus {
        match raw {
            "upcoming" => MatchStatus::Upcoming,
            "completed" => MatchStatus::Completed,
            _ => MatchStatus::Live,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFormat {
    T20,
    Odi,
    Test,
}

impl MatchFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFormat::T20 => "T20",
            MatchFormat::Odi => "ODI",
            MatchFormat::Test => "Test",
        }
    }

    pub fn from_api(raw: &str) -> MatchFormat {
        match raw.trim().to_ascii_lowercase().as_str() {
            "odi" => MatchFormat::Odi,
            "test" => MatchFormat::Test,
            _ => MatchFormat::T20,
        }
    }
}

// Statuts de l'API utilisés pour filtrer les listes de matchs
pub const API_STATUS_LIVE: &str = "Live";
pub const API_STATUS_NOT_STARTED: &str = "Match not started";
pub const API_STATUS_COMPLETED: &str = "Completed";

/// Enveloppe commune des réponses cricapi
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: Option<String>,
    pub data: Option<T>,
    pub reason: Option<String>,
}

/// null dans la réponse API => valeur par défaut, comme un champ absent
fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamInfo {
    #[serde(deserialize_with = "de_null_default")]
    pub name: String,
    #[serde(deserialize_with = "de_null_default")]
    pub img: String,
    #[serde(deserialize_with = "de_null_default")]
    pub shortname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InningScore {
    #[serde(deserialize_with = "de_null_default")]
    pub r: u32,
    #[serde(deserialize_with = "de_null_default")]
    pub w: u32,
    #[serde(deserialize_with = "de_null_default")]
    pub o: f64,
    #[serde(deserialize_with = "de_null_default")]
    pub inning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CricketMatch {
    #[serde(deserialize_with = "de_null_default")]
    pub id: String,
    #[serde(deserialize_with = "de_null_default")]
    pub name: String,
    #[serde(deserialize_with = "de_null_default")]
    pub match_type: String,
    #[serde(deserialize_with = "de_null_default")]
    pub status: String,
    #[serde(deserialize_with = "de_null_default")]
    pub venue: String,
    #[serde(deserialize_with = "de_null_default")]
    pub date: String,
    #[serde(rename = "dateTimeGMT", deserialize_with = "de_null_default")]
    pub date_time_gmt: String,
    #[serde(deserialize_with = "de_null_default")]
    pub teams: Vec<String>,
    #[serde(deserialize_with = "de_null_default")]
    pub team_info: Vec<TeamInfo>,
    #[serde(deserialize_with = "de_null_default")]
    pub score: Vec<InningScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_status: Option<String>,
    #[serde(deserialize_with = "de_null_default")]
    pub match_started: bool,
    #[serde(deserialize_with = "de_null_default")]
    pub match_ended: bool,
}

impl CricketMatch {
    pub fn is_live(&self) -> bool {
        self.status == API_STATUS_LIVE || self.match_status.is_some()
    }

    pub fn is_upcoming(&self) -> bool {
        self.status == API_STATUS_NOT_STARTED
    }

    pub fn is_completed(&self) -> bool {
        self.status == API_STATUS_COMPLETED
    }

    /// Statut local dérivé du statut texte de l'API
    pub fn local_status(&self) -> MatchStatus {
        if self.is_completed() || self.match_ended {
            MatchStatus::Completed
        } else if self.is_upcoming() && !self.match_started {
            MatchStatus::Upcoming
        } else {
            MatchStatus::Live
        }
    }

    /// dateTimeGMT est au format "2024-01-15T14:00:00" (UTC, sans offset)
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        let raw = self.date_time_gmt.trim().trim_end_matches('Z');
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BattingPoints {
    #[serde(deserialize_with = "de_null_default")]
    pub runs: u32,
    #[serde(deserialize_with = "de_null_default")]
    pub fours: u32,
    #[serde(deserialize_with = "de_null_default")]
    pub sixes: u32,
    #[serde(deserialize_with = "de_null_default")]
    pub strike_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BowlingPoints {
    #[serde(deserialize_with = "de_null_default")]
    pub wickets: u32,
    #[serde(deserialize_with = "de_null_default")]
    pub economy: f64,
    #[serde(deserialize_with = "de_null_default")]
    pub maidens: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldingPoints {
    #[serde(deserialize_with = "de_null_default")]
    pub catches: u32,
    #[serde(deserialize_with = "de_null_default")]
    pub run_outs: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FantasyPlayerPoints {
    #[serde(deserialize_with = "de_null_default")]
    pub player_id: String,
    #[serde(deserialize_with = "de_null_default")]
    pub name: String,
    #[serde(deserialize_with = "de_null_default")]
    pub points: f64,
    #[serde(deserialize_with = "de_null_default")]
    pub batting: BattingPoints,
    #[serde(deserialize_with = "de_null_default")]
    pub bowling: BowlingPoints,
    #[serde(deserialize_with = "de_null_default")]
    pub fielding: FieldingPoints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FantasyMatchPoints {
    #[serde(deserialize_with = "de_null_default")]
    pub match_id: String,
    #[serde(deserialize_with = "de_null_default")]
    pub players: Vec<FantasyPlayerPoints>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SquadPlayer {
    #[serde(deserialize_with = "de_null_default")]
    pub id: String,
    #[serde(deserialize_with = "de_null_default")]
    pub name: String,
    pub role: Option<String>,
    pub country: Option<String>,
    pub player_img: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SquadTeam {
    #[serde(deserialize_with = "de_null_default")]
    pub team_name: String,
    pub shortname: Option<String>,
    pub img: Option<String>,
    #[serde(deserialize_with = "de_null_default")]
    pub players: Vec<SquadPlayer>,
}
