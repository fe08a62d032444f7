// ============================================================================
// MODÈLE : MATCHES
// ============================================================================
//
// Description:
//   Miroir local des matchs de l'API cricket. La clé primaire est l'id
//   opaque de l'API (pas d'id entier interne), pour que les équipes et les
//   squads référencent le même identifiant que le frontend.
//
// Points d'attention:
//   - status: 'upcoming', 'live', 'completed' (voir MatchStatus)
//   - match_type: 'T20', 'ODI', 'Test' (voir MatchFormat)
//   - Les équipes ne sont modifiables que si status = 'upcoming'
//     et start_time dans le futur
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use crate::models::cricket::MatchStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub api_id: String,
    pub title: String,
    pub team1: String,
    pub team2: String,
    pub venue: Option<String>,
    pub match_type: String,
    pub status: String,
    pub start_time: DateTime,
    pub end_time: Option<DateTime>,
    pub created_at: DateTime,
}

impl Model {
    /// Vrai tant qu'on peut encore construire/modifier une équipe
    pub fn is_open_at(&self, now: DateTime) -> bool {
        MatchStatus::parse(&self.status) == MatchStatus::Upcoming && self.start_time > now
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::match_players::Entity")]
    MatchPlayers,

    #[sea_orm(has_many = "super::user_teams::Entity")]
    UserTeams,
}

impl Related<super::match_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchPlayers.def()
    }
}

impl Related<super::user_teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserTeams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
