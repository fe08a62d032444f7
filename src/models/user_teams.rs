// ============================================================================
// MODÈLE : USER TEAMS
// ============================================================================
//
// Description:
//   Équipe fantasy d'un utilisateur pour un match (au plus une par couple
//   user_id / match_api_id, index unique créé par db::sync_schema).
//
// Cycle de vie:
//   Draft (is_submitted = false) -> Submitted (is_submitted = true, terminal)
//
// Points d'attention:
//   - captain_api_id / vice_captain_api_id reflètent les flags de team_players
//   - Toute modification commence par un UPDATE ... WHERE is_submitted = false
//     sur cette ligne (verrou de ligne + blocage après soumission)
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "user_teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub match_api_id: String,
    pub team_name: String,
    pub captain_api_id: Option<String>,
    pub vice_captain_api_id: Option<String>,
    pub total_points: i32,
    pub rank: Option<i32>,
    pub is_submitted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::matches::Entity",
        from = "Column::MatchApiId",
        to = "super::matches::Column::ApiId",
        on_delete = "Cascade"
    )]
    Match,

    #[sea_orm(has_many = "super::team_players::Entity")]
    TeamPlayers,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl Related<super::team_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamPlayers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
